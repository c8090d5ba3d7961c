use log::{error, info, warn};
use std::fs;
use std::io;
use std::path::PathBuf;

/// Best score across runs, kept in a flat text file. All file errors are logged and swallowed.
#[derive(Debug)]
pub struct HighScore {
    path: PathBuf,
    best: u32,
}

impl HighScore {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let best = match fs::read_to_string(&path) {
            Ok(contents) => contents.trim().parse().unwrap_or_else(|e| {
                warn!("Ignoring corrupt high score file {}: {}", path.display(), e);
                0
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No high score yet at {}", path.display());
                0
            }
            Err(e) => {
                error!("Error loading high score: {}", e);
                0
            }
        };

        HighScore { path, best }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Returns true when `score` beats the stored best.
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        self.save();
        true
    }

    fn save(&self) {
        if let Err(e) = fs::write(&self.path, self.best.to_string()) {
            error!("Error saving high score: {}", e);
        }
    }
}
