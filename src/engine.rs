//! The snake simulation, free of any terminal or timer dependency.
//!
//! A host calls [`SnakeEngine::tick`] once per timer period and
//! [`SnakeEngine::set_direction`] on input, then reads a [`Snapshot`] to draw.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::{HashSet, VecDeque};

pub const INITIAL_LENGTH: usize = 3;
const START_CELL: Cell = Cell { col: 5, row: 5 };

/// A grid coordinate. Signed so that a head stepping off the board is still representable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Cell { col, row }
    }

    pub fn step(self, heading: Heading) -> Cell {
        let (dc, dr) = heading.delta();
        Cell::new(self.col + dc, self.row + dr)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    pub fn opposite(self) -> Heading {
        match self {
            Heading::Up => Heading::Down,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }

    fn delta(self) -> (i32, i32) {
        match self {
            Heading::Up => (0, -1),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
            Heading::Right => (1, 0),
        }
    }
}

/// Board dimensions in cells, plus how many host columns one cell spans.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board {
    pub width: u16,
    pub height: u16,
    pub cell_size: u16,
}

impl Board {
    /// Whether the starting snake and one food cell fit.
    pub fn is_playable(&self) -> bool {
        usize::from(self.width) >= INITIAL_LENGTH && self.height >= 1 && self.area() > INITIAL_LENGTH
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..i32::from(self.width)).contains(&cell.col)
            && (0..i32::from(self.height)).contains(&cell.row)
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let width = i32::from(self.width);
        (0..i32::from(self.height)).flat_map(move |row| (0..width).map(move |col| Cell::new(col, row)))
    }

    /// Top-left corner of `cell` in host units: `cell_size` columns per cell, one row per cell.
    pub fn origin(&self, cell: Cell) -> (u16, u16) {
        (cell.col as u16 * self.cell_size, cell.row as u16)
    }

    pub fn extent(&self) -> (u16, u16) {
        (self.width * self.cell_size, self.height)
    }

    fn area(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    Body,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Running,
    GameOver(Collision),
    /// The snake covers the whole board; there is nowhere left to put food.
    Won,
}

impl EngineState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, EngineState::Running)
    }
}

/// What a host needs to draw one frame. Borrows the engine, so it cannot outlive the next tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Snapshot<'a> {
    pub state: EngineState,
    /// Head first.
    pub snake: &'a VecDeque<Cell>,
    /// `None` only once the game is won.
    pub food: Option<Cell>,
    pub score: u32,
}

#[derive(Debug)]
pub struct SnakeEngine<R = StdRng> {
    board: Board,
    snake: VecDeque<Cell>,
    food: Option<Cell>,
    heading: Heading,
    pending: Heading,
    score: u32,
    state: EngineState,
    rng: R,
}

impl SnakeEngine<StdRng> {
    /// Builds a fresh game whose food placement is seeded from OS entropy.
    pub fn new(width: u16, height: u16, cell_size: u16) -> Self {
        Self::with_rng(width, height, cell_size, StdRng::from_entropy())
    }
}

impl<R: Rng> SnakeEngine<R> {
    /// Builds a fresh game on a `width` x `height` board, drawing food cells from `rng`.
    ///
    /// # Panics
    ///
    /// If the board cannot hold the starting snake plus one food cell.
    pub fn with_rng(width: u16, height: u16, cell_size: u16, mut rng: R) -> Self {
        let board = Board {
            width,
            height,
            cell_size,
        };
        assert!(
            board.is_playable(),
            "Board {}x{} is too small to start a game",
            width,
            height
        );

        let head = Cell::new(
            START_CELL
                .col
                .clamp(INITIAL_LENGTH as i32 - 1, i32::from(width) - 1),
            START_CELL.row.min(i32::from(height) - 1),
        );
        let snake: VecDeque<Cell> = (0..INITIAL_LENGTH as i32)
            .map(|i| Cell::new(head.col - i, head.row))
            .collect();
        let food = Self::pick_food(board, &snake, &mut rng);

        SnakeEngine {
            board,
            snake,
            food,
            heading: Heading::Right,
            pending: Heading::Right,
            score: 0,
            state: EngineState::Running,
            rng,
        }
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            state: self.state,
            snake: &self.snake,
            food: self.food,
            score: self.score,
        }
    }

    /// Queues a turn for the next tick. Reversals and calls after the game ended are ignored.
    pub fn set_direction(&mut self, requested: Heading) {
        if self.state.is_terminal() {
            return;
        }
        // Against the heading of the last move, not the queued one.
        if requested == self.heading.opposite() {
            debug!("Ignoring reversal from {:?} to {:?}", self.heading, requested);
            return;
        }
        self.pending = requested;
    }

    pub fn tick(&mut self) -> Snapshot<'_> {
        if !self.state.is_terminal() {
            self.advance();
        }
        self.snapshot()
    }

    fn head(&self) -> Cell {
        self.snake[0]
    }

    fn advance(&mut self) {
        self.heading = self.pending;
        let new_head = self.head().step(self.heading);
        let grows = self.food == Some(new_head);

        if let Some(collision) = self.collision_at(new_head, grows) {
            info!(
                "Game over: {:?} collision at {:?}, final score {}",
                collision, new_head, self.score
            );
            self.state = EngineState::GameOver(collision);
            return;
        }

        self.snake.push_front(new_head);

        if !grows {
            self.snake.pop_back();
            return;
        }

        self.score += 1;
        self.food = Self::pick_food(self.board, &self.snake, &mut self.rng);
        match self.food {
            Some(food) => debug!("Ate food, score {}, next food at {:?}", self.score, food),
            None => {
                info!("Board filled, final score {}", self.score);
                self.state = EngineState::Won;
            }
        }
    }

    fn collision_at(&self, cell: Cell, grows: bool) -> Option<Collision> {
        if !self.board.contains(cell) {
            return Some(Collision::Wall);
        }

        // The tail moves out of the way this tick unless the snake is growing.
        let obstacles = if grows {
            self.snake.len()
        } else {
            self.snake.len() - 1
        };
        if self.snake.iter().take(obstacles).any(|&c| c == cell) {
            return Some(Collision::Body);
        }

        None
    }

    fn pick_food(board: Board, snake: &VecDeque<Cell>, rng: &mut R) -> Option<Cell> {
        let occupied: HashSet<Cell> = snake.iter().copied().collect();
        let free: Vec<Cell> = board.cells().filter(|c| !occupied.contains(c)).collect();
        free.choose(rng).copied()
    }
}
