use crate::engine::{Board, Collision, EngineState, Heading, SnakeEngine};
use crate::high_score::HighScore;
use crate::render::{BoardView, Theme};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use log::{info, warn};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const HEADER_ROWS: u16 = 3;
const BORDER: u16 = 2;

#[derive(Debug)]
pub enum Session {
    ReadyToStart,
    Playing(SnakeEngine),
    Paused(SnakeEngine),
    Over {
        engine: SnakeEngine,
        outcome: EngineState,
    },
    Exit,
}

pub struct Game {
    pub session: Session,
    board: Board,
    high_score: HighScore,
    theme: Theme,
    // Set by `render`; the engine only ticks while the whole board is on screen.
    fits: bool,
}

pub fn heading_for(code: KeyCode) -> Option<Heading> {
    match code {
        KeyCode::Up | KeyCode::Char('w') => Some(Heading::Up),
        KeyCode::Down | KeyCode::Char('s') => Some(Heading::Down),
        KeyCode::Left | KeyCode::Char('a') => Some(Heading::Left),
        KeyCode::Right | KeyCode::Char('d') => Some(Heading::Right),
        _ => None,
    }
}

fn headline(outcome: EngineState) -> &'static str {
    match outcome {
        EngineState::Won => "YOU WIN",
        EngineState::GameOver(Collision::Wall) => "GAME OVER (hit the wall)",
        EngineState::GameOver(Collision::Body) => "GAME OVER (bit yourself)",
        EngineState::Running => "GAME OVER",
    }
}

/// Lets through at most one key press per tick.
#[derive(Debug, Default)]
pub struct InputGate {
    pressed: bool,
}

impl InputGate {
    pub fn is_open(&self) -> bool {
        !self.pressed
    }

    pub fn admit(&mut self, key: KeyEvent) -> Option<KeyEvent> {
        if self.pressed || key.kind != KeyEventKind::Press {
            return None;
        }
        self.pressed = true;
        Some(key)
    }

    pub fn reset(&mut self) {
        self.pressed = false;
    }
}

impl Game {
    pub fn new(board: Board, high_score: HighScore) -> Self {
        Game {
            session: Session::ReadyToStart,
            board,
            high_score,
            theme: Theme::default(),
            fits: true,
        }
    }

    /// Terminal columns and rows needed to show the header and the framed board.
    pub fn required_size(&self) -> (u16, u16) {
        let (width, height) = self.board.extent();
        (width + BORDER, height + BORDER + HEADER_ROWS)
    }

    fn finish(&mut self, engine: SnakeEngine) -> Session {
        let outcome = engine.state();
        let final_score = engine.score();
        info!("Round over ({:?}) with score {}", outcome, final_score);
        if self.high_score.record(final_score) {
            info!("New high score {}", final_score);
        }
        Session::Over { engine, outcome }
    }

    pub fn handle_input(&mut self, key: KeyEvent) {
        let session = std::mem::replace(&mut self.session, Session::Exit);

        self.session = match (session, key.code) {
            (_, KeyCode::Esc) => Session::Exit,
            (Session::ReadyToStart, KeyCode::Char('q')) => Session::Exit,
            (Session::ReadyToStart, KeyCode::Char(' ')) => {
                info!("Starting round on {}x{} board", self.board.width, self.board.height);
                Session::Playing(SnakeEngine::new(
                    self.board.width,
                    self.board.height,
                    self.board.cell_size,
                ))
            }
            (Session::Playing(engine), KeyCode::Char(' ')) => Session::Paused(engine),
            (Session::Paused(engine), KeyCode::Char(' ')) => Session::Playing(engine),
            (Session::Playing(engine) | Session::Paused(engine), KeyCode::Char('q')) => {
                self.finish(engine)
            }
            (Session::Playing(mut engine), code) => {
                if let Some(heading) = heading_for(code) {
                    engine.set_direction(heading);
                }
                Session::Playing(engine)
            }
            (Session::Over { .. }, KeyCode::Char(' ') | KeyCode::Char('q')) => {
                Session::ReadyToStart
            }
            (session, _) => session,
        };
    }

    pub fn update(&mut self) {
        if !self.fits {
            return;
        }

        let finished = match &mut self.session {
            Session::Playing(engine) => engine.tick().state.is_terminal(),
            _ => false,
        };

        if finished {
            if let Session::Playing(engine) = std::mem::replace(&mut self.session, Session::Exit) {
                self.session = self.finish(engine);
            }
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let (need_width, need_height) = self.required_size();
        let fits = area.width >= need_width && area.height >= need_height;
        if fits != self.fits {
            if !fits {
                warn!(
                    "Terminal {}x{} is smaller than the {}x{} the board needs",
                    area.width, area.height, need_width, need_height
                );
            }
            self.fits = fits;
        }

        if !fits {
            frame.render_widget(
                Paragraph::new(format!(
                    "Terminal too small: need {}x{}, have {}x{}\nResize to continue, ESC to quit",
                    need_width, need_height, area.width, area.height
                ))
                .alignment(Alignment::Center),
                area,
            );
            return;
        }

        let score_text = match &self.session {
            Session::Playing(engine) | Session::Paused(engine) => format!(
                "SNAKE    High Score: {}    Score: {}",
                self.high_score.best(),
                engine.score()
            ),
            _ => format!("SNAKE    High Score: {}", self.high_score.best()),
        };

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(HEADER_ROWS), Constraint::Min(0)])
            .split(area);

        frame.render_widget(
            Paragraph::new(score_text)
                .alignment(Alignment::Left)
                .block(Block::default().borders(Borders::ALL)),
            layout[0],
        );

        let (width, height) = self.board.extent();
        let arena = Rect {
            width: width + BORDER,
            height: height + BORDER,
            ..layout[1]
        };

        match &self.session {
            Session::ReadyToStart => {
                frame.render_widget(
                    Paragraph::new("Press SPACE to start")
                        .alignment(Alignment::Center)
                        .block(Block::default().borders(Borders::ALL)),
                    arena,
                );
            }
            Session::Playing(engine) => self.render_board(frame, arena, engine, "Playing"),
            Session::Paused(engine) => {
                self.render_board(frame, arena, engine, "Paused. Press SPACE to continue")
            }
            Session::Over { engine, outcome } => {
                self.render_board(frame, arena, engine, "");
                frame.render_widget(
                    Paragraph::new(format!(
                        "{}\nFinal Score: {}\nPress SPACE to play again",
                        headline(*outcome),
                        engine.snapshot().score
                    ))
                    .style(Style::default().fg(self.theme.text))
                    .alignment(Alignment::Center),
                    Block::default().borders(Borders::ALL).inner(arena),
                );
            }
            Session::Exit => {}
        }
    }

    fn render_board(&self, frame: &mut Frame, arena: Rect, engine: &SnakeEngine, title: &str) {
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(arena);

        frame.render_widget(block, arena);
        frame.render_widget(
            BoardView {
                board: engine.board(),
                snapshot: engine.snapshot(),
                theme: &self.theme,
            },
            inner,
        );
    }
}
