use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use torus_snake::audio::default_output;
use torus_snake::input::spawn_listener;
use torus_snake::logging::init_logging;
use torus_snake::{driver, CliRenderer, Game, GameConfig, GameError, KeyboardInput, Renderer};

fn main() -> Result<(), GameError> {
    let config = GameConfig::default();
    config.validate()?;
    init_logging(&config)?;
    info!("starting snake, ticking every {:?}", config.tick_interval);

    let mut game = Game::new(&config)?;
    game.start()?;

    let mut renderer = CliRenderer::new();
    renderer.init()?;

    // Intents flow from the keyboard thread to the tick loop
    let running = Arc::new(AtomicBool::new(true));
    let (intents_tx, intents_rx) = mpsc::channel();
    let listener = spawn_listener(KeyboardInput::new(), intents_tx, running.clone());
    let mut audio = default_output();

    let result = driver::run(
        &mut game,
        &mut renderer,
        audio.as_mut(),
        &intents_rx,
        &running,
        config.tick_interval,
    );

    running.store(false, Ordering::Release);
    let cleanup = renderer.cleanup();
    let listener = listener.join();

    let outcome = driver::settle(result, listener, cleanup);
    if outcome.is_ok() {
        info!("bye");
    }
    outcome
}
