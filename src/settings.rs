use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::{Result, WormError};
use crate::game::GRID_SIZE;

pub const TICK_INTERVAL_MS: u64 = 200;

const MIN_GRID_SIZE: u16 = 2;
const MAX_GRID_SIZE: u16 = 100;
const MIN_TICK_MS: u64 = 10;
const MAX_TICK_MS: u64 = 5000;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "worm", version, about = "Steer the worm to the food, stay off the walls")]
pub struct Settings {
    /// Width and height of the square board, in cells
    #[arg(long, default_value_t = GRID_SIZE)]
    pub grid_size: u16,

    /// Milliseconds between worm steps
    #[arg(long, default_value_t = TICK_INTERVAL_MS)]
    pub tick_ms: u64,

    /// Seed for target placement, for reproducible rounds
    #[arg(long)]
    pub seed: Option<u64>,

    /// Append log lines to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings { grid_size: GRID_SIZE, tick_ms: TICK_INTERVAL_MS, seed: None, log_file: None }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.grid_size < MIN_GRID_SIZE || self.grid_size > MAX_GRID_SIZE {
            return Err(WormError::Settings(format!(
                "grid size must be between {} and {}, got {}",
                MIN_GRID_SIZE, MAX_GRID_SIZE, self.grid_size
            )));
        }

        if self.tick_ms < MIN_TICK_MS || self.tick_ms > MAX_TICK_MS {
            return Err(WormError::Settings(format!(
                "tick interval must be between {} and {} ms, got {}",
                MIN_TICK_MS, MAX_TICK_MS, self.tick_ms
            )));
        }

        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_classic_game() {
        let settings = Settings::try_parse_from(&["worm"]).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.grid_size, 32);
        assert_eq!(settings.tick_interval(), Duration::from_millis(200));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_parses_all_flags() {
        let settings = Settings::try_parse_from(&[
            "worm", "--grid-size", "10", "--tick-ms", "50", "--seed", "99", "--log-file", "worm.log",
        ])
        .unwrap();
        assert_eq!(settings.grid_size, 10);
        assert_eq!(settings.tick_ms, 50);
        assert_eq!(settings.seed, Some(99));
        assert_eq!(settings.log_file, Some(PathBuf::from("worm.log")));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let tiny = Settings { grid_size: 1, ..Settings::default() };
        assert!(matches!(tiny.validate(), Err(WormError::Settings(_))));

        let huge = Settings { grid_size: 101, ..Settings::default() };
        assert!(matches!(huge.validate(), Err(WormError::Settings(_))));

        let frantic = Settings { tick_ms: 1, ..Settings::default() };
        assert!(matches!(frantic.validate(), Err(WormError::Settings(_))));
    }

    #[test]
    fn test_rejects_unknown_flag() {
        assert!(Settings::try_parse_from(&["worm", "--difficulty", "hard"]).is_err());
    }
}
