use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;

use snake::game::SnakeGame;
use snake::term::TermManager;
use snake::TermInt;

const BOARD_WIDTH: TermInt = 40;
const BOARD_HEIGHT: TermInt = 20;

fn main() -> Result<()> {
    init_tracing();

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    info!(seed, "seeding food placement");

    // Dropping the manager hands the terminal back, on every exit path
    let term = TermManager::setup(BOARD_WIDTH, BOARD_HEIGHT)?;
    let rng = StdRng::seed_from_u64(seed);

    let mut game = SnakeGame::new(BOARD_WIDTH as i16, BOARD_HEIGHT as i16, term, rng);
    game.run()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
