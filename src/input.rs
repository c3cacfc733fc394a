use crate::renderer::{Input, InputSource};
use log::{debug, error};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Poll `source` on a background thread and forward every intent.
///
/// The thread stops once `running` is cleared (checked after each poll
/// returns), when the receiving side hangs up, or after forwarding a quit.
/// A quit or a failing source also clears `running` so the tick loop winds
/// down without waiting for the next drain. A failing source is returned
/// through the join handle so the process does not exit as if quit.
pub fn spawn_listener<S>(
    mut source: S,
    sender: Sender<Input>,
    running: Arc<AtomicBool>,
) -> JoinHandle<io::Result<()>>
where
    S: InputSource + 'static,
{
    thread::spawn(move || {
        while running.load(Ordering::Acquire) {
            match source.poll() {
                Ok(Some(input)) => {
                    if sender.send(input).is_err() {
                        break;
                    }
                    if input == Input::Quit {
                        running.store(false, Ordering::Release);
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    error!("input polling failed: {}", e);
                    running.store(false, Ordering::Release);
                    return Err(e);
                }
            }
        }
        debug!("input listener stopped");
        Ok(())
    })
}
