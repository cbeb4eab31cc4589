use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};
use rand::Rng;

use crate::error::Result;
use crate::game::{Phase, TickOutcome, WormGame};
use crate::log;
use crate::term::is_ctrl_c;
use crate::ticker::Ticker;
use crate::worm::{Cell, Direction::{self, *}};

const WELCOME: &[&str] = &[
    "Welcome to Worm Game (Early Alpha) v0.1.05!",
    "",
    "Use WASD or the arrow keys to control the worm.",
    "Avoid the walls and collect the food.",
    "CTRL+C to quit",
    "",
    "Press any key to start the game.",
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellState {
    Empty,
    Worm,
    Target,
    Dead,
}

/// Display surface and input source the loop drives.
pub trait Frontend {
    fn draw_board(&mut self, grid_size: u16) -> Result<()>;
    fn paint(&mut self, cell: Cell, state: CellState) -> Result<()>;
    fn show_score(&mut self, score: u32) -> Result<()>;
    /// Shows `lines` until a key is pressed. Returns `false` if that key asks
    /// to quit.
    fn inform(&mut self, lines: &[&str]) -> Result<bool>;
    fn confirm(&mut self, lines: &[&str]) -> Result<bool>;
    fn poll_key(&mut self, timeout: Duration) -> Result<Option<KeyEvent>>;
    fn flush(&mut self) -> Result<()>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Steer(Direction),
    Quit,
}

pub fn map_key(ev: &KeyEvent) -> Option<Input> {
    if is_ctrl_c(ev) {
        return Some(Input::Quit);
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Some(Input::Steer(Up)),
        KeyCode::Char('a') | KeyCode::Left => Some(Input::Steer(Left)),
        KeyCode::Char('s') | KeyCode::Down => Some(Input::Steer(Down)),
        KeyCode::Char('d') | KeyCode::Right => Some(Input::Steer(Right)),
        _ => None,
    }
}

/// Owns the game and drives it: one tick per period, keys in between, and
/// the restart-or-quit prompt after a crash.
pub struct App<F: Frontend, R: Rng> {
    game: WormGame<R>,
    frontend: F,
    ticker: Ticker,
}

impl<F: Frontend, R: Rng> App<F, R> {
    pub fn new(game: WormGame<R>, frontend: F, period: Duration) -> Self {
        App { game, frontend, ticker: Ticker::new(period) }
    }

    pub fn run(&mut self) -> Result<()> {
        self.redraw()?;

        if !self.frontend.inform(WELCOME)? {
            log!("quit at the welcome screen");
            self.game.quit();
            return Ok(());
        }

        self.game.start();
        log!("game started, target at {:?}", self.game.target());
        self.ticker.arm(Instant::now());

        while self.game.phase() != Phase::Terminated {
            let wait = self.ticker.time_until_due(Instant::now()).unwrap_or(Duration::ZERO);

            if let Some(ev) = self.frontend.poll_key(wait)? {
                match map_key(&ev) {
                    Some(Input::Quit) => {
                        log!("quit with score {}", self.game.score());
                        self.game.quit();
                        self.ticker.disarm();
                        break;
                    }
                    Some(Input::Steer(direction)) => self.game.set_direction(direction),
                    None => {}
                }
            }

            if self.ticker.take_due(Instant::now()) {
                self.step()?;
            }
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn game(&self) -> &WormGame<R> {
        &self.game
    }

    pub fn into_frontend(self) -> F {
        self.frontend
    }

    ///////////////////////////////////////////////////////////////////////////

    fn step(&mut self) -> Result<()> {
        match self.game.tick() {
            TickOutcome::Inactive | TickOutcome::Stayed => {}
            TickOutcome::Moved { from, to } => {
                self.frontend.paint(from, CellState::Empty)?;
                self.frontend.paint(to, CellState::Worm)?;
            }
            TickOutcome::Ate { from, to, target, score } => {
                log!("ate at {:?}, score {}, next target at {:?}", to, score, target);
                self.frontend.paint(from, CellState::Empty)?;
                self.frontend.paint(to, CellState::Worm)?;
                self.frontend.paint(target, CellState::Target)?;
                self.frontend.show_score(score)?;
            }
            TickOutcome::Crashed { at, score } => {
                log!("crashed at {:?} heading {:?}, score {}", at, self.game.direction(), score);
                self.frontend.paint(at, CellState::Dead)?;
                self.frontend.flush()?;
                return self.game_over(score);
            }
        }

        self.frontend.flush()?;
        self.ticker.arm(Instant::now());
        Ok(())
    }

    fn game_over(&mut self, score: u32) -> Result<()> {
        let scored = format!("You scored {}!", score);
        let lines = ["Game Over", "", scored.as_str(), "Do you want to play again?", "", "(y/n)"];

        if self.frontend.confirm(&lines)? {
            self.game.restart();
            log!("restarted, target at {:?}", self.game.target());
            self.redraw()?;
            self.ticker.arm(Instant::now());
        } else {
            log!("quit after game over");
            self.game.quit();
        }

        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        self.frontend.draw_board(self.game.size())?;
        self.frontend.paint(self.game.target(), CellState::Target)?;
        self.frontend.paint(self.game.worm_position(), CellState::Worm)?;
        self.frontend.show_score(self.game.score())?;
        self.frontend.flush()
    }
}
