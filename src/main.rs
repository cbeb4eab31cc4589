mod app;
mod error;
mod game;
mod logger;
mod settings;
mod term;
mod ticker;
mod worm;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::app::App;
use crate::error::Result;
use crate::game::WormGame;
use crate::settings::Settings;
use crate::term::TermManager;

fn main() {
    let settings = Settings::parse();

    if let Err(e) = run(&settings) {
        eprintln!("worm: {}", e);
        std::process::exit(1);
    }
}

fn run(settings: &Settings) -> Result<()> {
    settings.validate()?;

    if let Some(path) = &settings.log_file {
        logger::init_logger(path, Some("worm".to_string()))?;
    }
    log!("starting with {:?}", settings);

    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let game = WormGame::new(settings.grid_size, rng)?;

    let mut term = TermManager::new(settings.grid_size)?;
    if let Err(e) = term.setup() {
        let _ = term.restore();
        return Err(e);
    }

    let mut app = App::new(game, term, settings.tick_interval());
    let outcome = app.run();

    // Restore before reporting the loop's result
    let restored = app.into_frontend().restore();
    log!("exiting: {:?}", outcome.as_ref().err());
    outcome.and(restored)
}
