mod engine;
mod game;
mod high_score;
mod render;
mod settings;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use game::{Game, InputGate, Session};
use high_score::HighScore;
use log::info;
use ratatui::{backend::CrosstermBackend, Terminal};
use settings::Settings;
use simplelog::{Config, WriteLogger};
use std::fs::File;
use std::io;
use std::time::Instant;

fn main() -> Result<(), io::Error> {
    let settings = Settings::from_args();

    // Set up logging before anything else; stdout belongs to the terminal UI
    WriteLogger::init(
        settings.log_level,
        Config::default(),
        File::create(&settings.log_file)?,
    )
    .map_err(io::Error::other)?;

    info!("Starting gridsnake with {:?}", settings);

    let mut game = Game::new(
        settings.board(),
        HighScore::load(&settings.high_score_file),
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut game, &settings);

    // Cleanup terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("Exiting gridsnake");
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    game: &mut Game,
    settings: &Settings,
) -> Result<(), io::Error> {
    let tick_rate = settings.tick_rate();
    let mut last_tick = Instant::now();

    // One key per tick, so each tick applies at most one turn
    let mut gate = InputGate::default();
    loop {
        terminal.draw(|f| game.render(f))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if gate.is_open() && event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if let Some(key) = gate.admit(key) {
                    game.handle_input(key);
                }
            }
        } else if !gate.is_open() {
            std::thread::sleep(timeout);
        }

        if last_tick.elapsed() >= tick_rate {
            game.update();
            last_tick = Instant::now();
            gate.reset();
        }

        if let Session::Exit = game.session {
            return Ok(());
        }
    }
}
