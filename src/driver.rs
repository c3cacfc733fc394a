use crate::audio::{AudioCue, Cue};
use crate::error::{GameError, Result};
use crate::game::{Game, TickOutcome};
use crate::renderer::{Input, Renderer};
use log::{error, info};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::thread;
use std::time::{Duration, Instant};

/// Run the fixed-rate game loop until `running` is cleared.
///
/// Each iteration drains the pending intents, advances the game one tick,
/// plays the eat cue when needed and redraws. Ticks are scheduled against a
/// deadline so slow frames do not stretch the interval; when a frame overruns
/// the schedule restarts from now instead of bursting.
pub fn run<R, A>(
    game: &mut Game,
    renderer: &mut R,
    audio: &mut A,
    intents: &Receiver<Input>,
    running: &AtomicBool,
    interval: Duration,
) -> Result<()>
where
    R: Renderer,
    A: AudioCue + ?Sized,
{
    renderer.render(game)?;
    let mut deadline = Instant::now();

    while running.load(Ordering::Acquire) {
        for input in intents.try_iter() {
            apply(game, input, running)?;
        }
        if !running.load(Ordering::Acquire) {
            break;
        }

        let report = game.tick()?;
        if report.outcome == TickOutcome::Ate {
            audio.play(Cue::Eat);
        }
        renderer.render(game)?;

        deadline += interval;
        let now = Instant::now();
        if deadline > now {
            thread::sleep(deadline - now);
        } else {
            deadline = now;
        }
    }

    info!("game loop stopped with score {}", game.score());
    Ok(())
}

/// Fold the loop result, the listener's exit and terminal teardown into the
/// process result. Every failure is logged; the loop's own error wins, then
/// the listener's, then teardown's.
pub fn settle(
    run: Result<()>,
    listener: thread::Result<io::Result<()>>,
    cleanup: io::Result<()>,
) -> Result<()> {
    let listener = match listener {
        Ok(polled) => polled.map_err(GameError::from),
        Err(_) => Err(GameError::ListenerPanicked),
    };
    let cleanup = cleanup.map_err(GameError::from);

    for e in [&run, &listener, &cleanup].into_iter().filter_map(|r| r.as_ref().err()) {
        error!("stopping: {}", e);
    }
    run.and(listener).and(cleanup)
}

fn apply(game: &mut Game, input: Input, running: &AtomicBool) -> Result<()> {
    match input {
        Input::Direction(direction) => {
            game.set_direction(direction);
        }
        Input::Restart => {
            game.start()?;
        }
        Input::Quit => {
            running.store(false, Ordering::Release);
        }
    }
    Ok(())
}
