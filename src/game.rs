use rand::Rng;

use crate::error::{Result, WormError};
use crate::worm::{Cell, Direction, MoveResult, Worm};

pub const GRID_SIZE: u16 = 32;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Created but not started yet (the welcome dialog is up).
    Idle,
    Running,
    /// The worm hit a wall; waiting for restart or quit.
    GameOver,
    Terminated,
}

/// What a single tick changed, so the caller can update only the affected
/// cells of the display.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game is not running; nothing happened.
    Inactive,
    /// No heading chosen yet.
    Stayed,
    Moved { from: Cell, to: Cell },
    Ate { from: Cell, to: Cell, target: Cell, score: u32 },
    Crashed { at: Cell, score: u32 },
}

/// Single-player worm state machine: one worm cell, one target cell and a
/// score on a fixed square grid.
pub struct WormGame<R: Rng> {
    size: u16,
    worm: Worm,
    target: Cell,
    score: u32,
    phase: Phase,
    rng: R,
}

impl<R: Rng> WormGame<R> {
    pub fn new(size: u16, rng: R) -> Result<Self> {
        if size < 2 {
            return Err(WormError::GridTooSmall(size));
        }

        let center = Self::center_of(size);
        let mut game = WormGame {
            size,
            worm: Worm::new(center),
            target: center,
            score: 0,
            phase: Phase::Idle,
            rng,
        };
        game.target = game.spawn_target();
        Ok(game)
    }

    pub fn start(&mut self) {
        if self.phase == Phase::Idle {
            self.phase = Phase::Running;
        }
    }

    /// Takes effect on the next tick.
    pub fn set_direction(&mut self, direction: Direction) {
        self.worm.set_direction(direction);
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != Phase::Running {
            return TickOutcome::Inactive;
        }

        match self.worm.move_step(self.size) {
            MoveResult::Stayed => TickOutcome::Stayed,
            MoveResult::Crashed => {
                self.phase = Phase::GameOver;
                TickOutcome::Crashed { at: self.worm.position(), score: self.score }
            }
            MoveResult::Moved { from, to } => {
                if to != self.target {
                    return TickOutcome::Moved { from, to };
                }

                self.score += 1;
                self.target = self.spawn_target();
                TickOutcome::Ate { from, to, target: self.target, score: self.score }
            }
        }
    }

    /// Starts a fresh round: worm back in the center and stopped, score zeroed,
    /// new target.
    pub fn restart(&mut self) {
        self.worm = Worm::new(Self::center_of(self.size));
        self.score = 0;
        self.target = self.spawn_target();
        self.phase = Phase::Running;
    }

    pub fn quit(&mut self) {
        self.phase = Phase::Terminated;
    }

    pub fn size(&self) -> u16 {
        self.size
    }

    pub fn worm_position(&self) -> Cell {
        self.worm.position()
    }

    pub fn direction(&self) -> Direction {
        self.worm.direction()
    }

    pub fn target(&self) -> Cell {
        self.target
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    ///////////////////////////////////////////////////////////////////////////

    fn center_of(size: u16) -> Cell {
        Cell::new(size / 2, size / 2)
    }

    // Rejection sampling: with at least 2x2 cells a draw off the worm always exists
    fn spawn_target(&mut self) -> Cell {
        let worm = self.worm.position();
        loop {
            let cell = Cell::new(self.rng.gen_range(0..self.size), self.rng.gen_range(0..self.size));
            if cell != worm {
                return cell;
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn place_worm(&mut self, cell: Cell) {
        self.worm = Worm::new(cell);
    }

    #[cfg(test)]
    pub(crate) fn place_target(&mut self, cell: Cell) {
        self.target = cell;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn create_game(size: u16) -> WormGame<StdRng> {
        let mut game = WormGame::new(size, StdRng::seed_from_u64(42)).unwrap();
        game.start();
        game
    }

    #[test]
    fn test_new_game_is_idle_in_the_center() {
        let game = WormGame::new(GRID_SIZE, StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.worm_position(), Cell::new(16, 16));
        assert_eq!(game.direction(), Direction::Still);
        assert_eq!(game.score(), 0);
        assert_ne!(game.target(), game.worm_position());
    }

    #[test]
    fn test_rejects_degenerate_grid() {
        assert!(matches!(WormGame::new(1, StdRng::seed_from_u64(1)), Err(WormError::GridTooSmall(1))));
        assert!(matches!(WormGame::new(0, StdRng::seed_from_u64(1)), Err(WormError::GridTooSmall(0))));
    }

    #[test]
    fn test_idle_game_does_not_tick() {
        let mut game = WormGame::new(GRID_SIZE, StdRng::seed_from_u64(7)).unwrap();
        game.set_direction(Direction::Up);
        assert_eq!(game.tick(), TickOutcome::Inactive);
        assert_eq!(game.worm_position(), Cell::new(16, 16));
    }

    #[test]
    fn test_still_direction_never_moves_or_dies() {
        let mut game = create_game(GRID_SIZE);
        for _ in 0..100 {
            assert_eq!(game.tick(), TickOutcome::Stayed);
        }
        assert_eq!(game.worm_position(), Cell::new(16, 16));
        assert_eq!(game.phase(), Phase::Running);
    }

    #[test]
    fn test_direction_applies_on_next_tick() {
        let mut game = create_game(GRID_SIZE);
        game.place_target(Cell::new(0, 0));
        game.set_direction(Direction::Right);
        assert_eq!(game.worm_position(), Cell::new(16, 16));
        assert_eq!(game.tick(), TickOutcome::Moved { from: Cell::new(16, 16), to: Cell::new(16, 17) });
        assert_eq!(game.worm_position(), Cell::new(16, 17));
    }

    #[test]
    fn test_eating_target_scores_and_respawns() {
        let mut game = create_game(GRID_SIZE);
        game.place_target(Cell::new(16, 17));
        game.set_direction(Direction::Right);

        match game.tick() {
            TickOutcome::Ate { from, to, target, score } => {
                assert_eq!(from, Cell::new(16, 16));
                assert_eq!(to, Cell::new(16, 17));
                assert_eq!(score, 1);
                assert_eq!(target, game.target());
                assert_ne!(target, to);
            }
            other => panic!("expected Ate, got {:?}", other),
        }
        assert_eq!(game.score(), 1);
    }

    #[test]
    fn test_crash_at_top_edge_keeps_score() {
        let mut game = create_game(GRID_SIZE);
        game.place_worm(Cell::new(0, 16));
        game.place_target(Cell::new(31, 31));
        game.set_direction(Direction::Up);

        // Score something first so we can see it is reported unchanged
        game.score = 3;

        assert_eq!(game.tick(), TickOutcome::Crashed { at: Cell::new(0, 16), score: 3 });
        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.score(), 3);
        assert_eq!(game.tick(), TickOutcome::Inactive);
    }

    #[test]
    fn test_restart_resets_round() {
        let mut game = create_game(GRID_SIZE);
        game.place_worm(Cell::new(31, 2));
        game.place_target(Cell::new(0, 0));
        game.score = 9;
        game.set_direction(Direction::Down);
        game.tick();
        assert_eq!(game.phase(), Phase::GameOver);

        game.restart();
        assert_eq!(game.phase(), Phase::Running);
        assert_eq!(game.score(), 0);
        assert_eq!(game.worm_position(), Cell::new(16, 16));
        assert_eq!(game.direction(), Direction::Still);
        assert_ne!(game.target(), game.worm_position());
    }

    #[test]
    fn test_quit_terminates() {
        let mut game = create_game(GRID_SIZE);
        game.quit();
        assert_eq!(game.phase(), Phase::Terminated);
        game.set_direction(Direction::Left);
        assert_eq!(game.tick(), TickOutcome::Inactive);
    }

    #[test]
    fn test_target_never_spawns_on_worm_in_tiny_grid() {
        // 2x2 grid: worm and target must always be different cells
        let mut game = create_game(2);
        for round in 0..200 {
            let dir = if round % 2 == 0 { Direction::Left } else { Direction::Right };
            game.set_direction(dir);
            game.tick();
            if game.phase() == Phase::GameOver {
                game.restart();
            }
            assert_ne!(game.target(), game.worm_position());
        }
    }

    #[test]
    fn test_walk_to_wall_counts_every_step() {
        let mut game = create_game(GRID_SIZE);
        game.set_direction(Direction::Up);

        let mut ticks = 0;
        loop {
            ticks += 1;
            if let TickOutcome::Crashed { at, .. } = game.tick() {
                assert_eq!(at, Cell::new(0, 16));
                break;
            }
            assert_ne!(game.target(), game.worm_position());
        }
        assert_eq!(ticks, 17);
    }
}
