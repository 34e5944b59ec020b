use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::game::{EventSink, SimulationEvent};

/// Sound effects the game knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    Eat,
    PowerUp,
    PowerDown,
    GameOver,
}

impl Sound {
    pub const ALL: [Sound; 4] = [Sound::Eat, Sound::PowerUp, Sound::PowerDown, Sound::GameOver];

    pub fn file_name(&self) -> &'static str {
        match self {
            Sound::Eat => "eat.mp3",
            Sound::PowerUp => "power-up.mp3",
            Sound::PowerDown => "power-down.mp3",
            Sound::GameOver => "game-over.mp3",
        }
    }

    /// Which sound, if any, an event triggers
    pub fn for_event(event: &SimulationEvent) -> Option<Sound> {
        match event {
            SimulationEvent::FoodEaten { .. } => Some(Sound::Eat),
            SimulationEvent::PowerUpStarted { .. } => Some(Sound::PowerUp),
            SimulationEvent::PowerUpEnded => Some(Sound::PowerDown),
            SimulationEvent::GameOver { .. } => Some(Sound::GameOver),
            SimulationEvent::PowerUpSpawned { .. } => None,
        }
    }
}

/// Fire-and-forget sound notifications.
///
/// Mixing and decoding are out of scope: a sound "plays" by ringing the
/// terminal bell when enabled. Sounds whose asset file is missing are skipped,
/// and output errors are logged and dropped so a tick never fails because of
/// audio.
pub struct SoundBoard {
    loaded: HashSet<Sound>,
    output: Option<Box<dyn Write + Send>>,
}

impl SoundBoard {
    /// Look up assets in `sounds_dir`; `output` receives bells if given
    pub fn new(sounds_dir: Option<&Path>, output: Option<Box<dyn Write + Send>>) -> Self {
        let loaded = match sounds_dir {
            Some(dir) => Sound::ALL
                .into_iter()
                .filter(|sound| {
                    let path: PathBuf = dir.join(sound.file_name());
                    let exists = path.is_file();
                    if !exists {
                        log::warn!("Sound asset {:?} not found, {:?} stays silent", path, sound);
                    }
                    exists
                })
                .collect(),
            None => Sound::ALL.into_iter().collect(),
        };

        Self { loaded, output }
    }

    pub fn play(&mut self, sound: Sound) {
        if !self.loaded.contains(&sound) {
            return;
        }

        log::debug!("Playing {:?}", sound);
        if let Some(output) = self.output.as_mut() {
            if let Err(err) = output.write_all(b"\x07").and_then(|_| output.flush()) {
                log::warn!("Error playing {:?}: {}", sound, err);
            }
        }
    }
}

impl EventSink for SoundBoard {
    fn notify(&mut self, event: &SimulationEvent) {
        if let Some(sound) = Sound::for_event(event) {
            self.play(sound);
        }
    }
}
