/// Sound effects the game asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Eat,
}

impl Cue {
    pub fn name(&self) -> &'static str {
        match self {
            Cue::Eat => "eat",
        }
    }
}

/// Fire-and-forget sound output. Failures stay inside the implementation.
pub trait AudioCue {
    fn play(&mut self, cue: Cue);
}

/// Plays nothing.
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioCue for SilentAudio {
    fn play(&mut self, _cue: Cue) {}
}

/// The best available output: tones when the `audio` feature is on and a
/// device opens, silence otherwise.
pub fn default_output() -> Box<dyn AudioCue> {
    #[cfg(feature = "audio")]
    {
        if let Some(audio) = ToneAudio::open() {
            return Box::new(audio);
        }
    }
    Box::new(SilentAudio)
}

#[cfg(feature = "audio")]
pub use tone::ToneAudio;

#[cfg(feature = "audio")]
mod tone {
    use super::{AudioCue, Cue};
    use log::{debug, warn};
    use rodio::source::{SineWave, Source};
    use rodio::{OutputStream, OutputStreamHandle, Sink};
    use std::time::Duration;

    /// Short synthesized tones on the default output device.
    pub struct ToneAudio {
        // Dropping the stream silences every sink
        _stream: OutputStream,
        handle: OutputStreamHandle,
    }

    impl ToneAudio {
        /// `None` when no output device can be opened.
        pub fn open() -> Option<Self> {
            match OutputStream::try_default() {
                Ok((stream, handle)) => Some(Self {
                    _stream: stream,
                    handle,
                }),
                Err(e) => {
                    warn!("audio disabled: {}", e);
                    None
                }
            }
        }
    }

    impl AudioCue for ToneAudio {
        fn play(&mut self, cue: Cue) {
            let (frequency, length) = match cue {
                Cue::Eat => (880.0, Duration::from_millis(90)),
            };
            match Sink::try_new(&self.handle) {
                Ok(sink) => {
                    sink.append(SineWave::new(frequency).take_duration(length).amplify(0.2));
                    sink.detach();
                }
                Err(e) => debug!("dropped {} cue: {}", cue.name(), e),
            }
        }
    }
}
