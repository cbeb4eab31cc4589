use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WormError {
    #[error("There was a problem talking to the terminal: {0}")]
    Terminal(#[from] crossterm::ErrorKind),
    #[error("The terminal is {width}x{height} but the board needs {need_width}x{need_height}; enlarge it or pass a smaller --grid-size")]
    TerminalTooSmall { width: u16, height: u16, need_width: u16, need_height: u16 },
    #[error("Could not open log file {}: {source}", .path.display())]
    LogFile { path: PathBuf, source: std::io::Error },
    #[error("Invalid settings: {0}")]
    Settings(String),
    #[error("A {0}x{0} grid is too small, it needs room for the worm and a target")]
    GridTooSmall(u16),
    #[error(transparent)]
    IO(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WormError>;
