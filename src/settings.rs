use crate::engine::Board;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use simplelog::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "gridsnake")]
#[command(version, about = "Snake on a walled grid, played in the terminal")]
pub struct Settings {
    /// Board width in cells
    #[arg(long, default_value_t = 21, value_parser = clap::value_parser!(u16).range(3..=200))]
    pub width: u16,

    /// Board height in cells
    #[arg(long, default_value_t = 21, value_parser = clap::value_parser!(u16).range(1..=200))]
    pub height: u16,

    /// Terminal columns per cell
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u16).range(1..=4))]
    pub cell_size: u16,

    /// Milliseconds between ticks
    #[arg(long, default_value_t = 200, value_parser = clap::value_parser!(u64).range(20..=5000))]
    pub tick_ms: u64,

    /// File holding the best score across runs
    #[arg(long, default_value = ".gridsnake_high_score.txt")]
    pub high_score_file: PathBuf,

    /// File the log is written to; the terminal is taken by the game
    #[arg(long, default_value = "gridsnake.log")]
    pub log_file: PathBuf,

    /// One of off, error, warn, info, debug, trace
    #[arg(long, default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,
}

impl Settings {
    /// Parses the command line, exiting with a usage error on values the engine cannot play.
    pub fn from_args() -> Self {
        let settings = Self::parse();
        if let Err(message) = settings.validate() {
            Self::command().error(ErrorKind::ValueValidation, message).exit();
        }
        settings
    }

    fn validate(&self) -> Result<(), String> {
        if self.board().is_playable() {
            Ok(())
        } else {
            Err(format!(
                "a {}x{} board leaves no room for food",
                self.width, self.height
            ))
        }
    }

    pub fn board(&self) -> Board {
        Board {
            width: self.width,
            height: self.height,
            cell_size: self.cell_size,
        }
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::try_parse_from(["gridsnake"]).unwrap();

        assert_eq!(settings.width, 21);
        assert_eq!(settings.height, 21);
        assert_eq!(settings.cell_size, 2);
        assert_eq!(settings.tick_rate(), Duration::from_millis(200));
        assert_eq!(settings.log_level, LevelFilter::Info);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_custom_values() {
        let settings = Settings::try_parse_from([
            "gridsnake",
            "--width",
            "30",
            "--height",
            "12",
            "--tick-ms",
            "100",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(settings.board().width, 30);
        assert_eq!(settings.board().height, 12);
        assert_eq!(settings.tick_rate(), Duration::from_millis(100));
        assert_eq!(settings.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_every_flag_is_described_in_help() {
        let command = Settings::command();
        for arg in command.get_arguments() {
            if matches!(arg.get_id().as_str(), "help" | "version") {
                continue;
            }
            assert!(arg.get_help().is_some(), "--{} has no help text", arg.get_id());
        }
    }

    #[test]
    fn test_rejects_narrow_board() {
        assert!(Settings::try_parse_from(["gridsnake", "--width", "2"]).is_err());
        assert!(Settings::try_parse_from(["gridsnake", "--height", "0"]).is_err());
    }

    #[test]
    fn test_board_without_room_for_food() {
        let settings =
            Settings::try_parse_from(["gridsnake", "--width", "3", "--height", "1"]).unwrap();
        assert!(settings.validate().is_err());
    }
}
