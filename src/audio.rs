//! Sound triggers.
//!
//! The terminal frontend has no mixer: a hit rings the terminal bell and the
//! background loop is only announced in the log.  When `CROWD_RUSH_SOUNDS`
//! points at a clip directory every clip must be present there, otherwise
//! startup fails before the first frame.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::entities::GameEvent;
use crate::error::GameError;

/// Environment variable naming the clip directory.
pub const SOUND_DIR_VAR: &str = "CROWD_RUSH_SOUNDS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clip {
    /// Enemy destroyed by a bullet
    Hit,
    /// Looping background track, started once
    Background,
}

impl Clip {
    pub const ALL: [Clip; 2] = [Clip::Hit, Clip::Background];

    pub fn file_name(&self) -> &'static str {
        match self {
            Clip::Hit => "hit.wav",
            Clip::Background => "background.wav",
        }
    }
}

#[derive(Debug, Default)]
pub struct AudioManager {
    /// Resolved clip files; empty when running without a clip directory.
    clips: HashMap<Clip, PathBuf>,
    muted: bool,
}

impl AudioManager {
    /// Bell-only audio, no assets required.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve every clip under `dir`, failing on the first one missing.
    pub fn load(dir: &Path) -> Result<Self, GameError> {
        let mut clips = HashMap::new();
        for clip in Clip::ALL {
            let path = dir.join(clip.file_name());
            if !path.is_file() {
                return Err(GameError::MissingAsset {
                    clip: clip.file_name(),
                    path,
                });
            }
            clips.insert(clip, path);
        }
        log::info!("Loaded {} sound clips from {}", clips.len(), dir.display());
        Ok(Self {
            clips,
            muted: false,
        })
    }

    /// `load` from `CROWD_RUSH_SOUNDS` if set, bell-only otherwise.
    pub fn from_env() -> Result<Self, GameError> {
        match std::env::var_os(SOUND_DIR_VAR) {
            Some(dir) => Self::load(Path::new(&dir)),
            None => Ok(Self::new()),
        }
    }

    pub fn clip_path(&self, clip: Clip) -> Option<&Path> {
        self.clips.get(&clip).map(PathBuf::as_path)
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Flip mute, returning the new setting.
    pub fn toggle_muted(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Fire-and-forget one-shot.
    pub fn play_sound<W: Write>(&self, out: &mut W, clip: Clip) -> std::io::Result<()> {
        if self.muted {
            return Ok(());
        }
        log::trace!("play {:?}", clip);
        if clip == Clip::Hit {
            write!(out, "\x07")?;
        }
        Ok(())
    }

    /// Start a looping clip.
    pub fn play_loop(&self, clip: Clip) {
        if self.muted {
            return;
        }
        match self.clip_path(clip) {
            Some(path) => log::info!("looping {:?} from {}", clip, path.display()),
            None => log::debug!("looping {:?} (no clip directory)", clip),
        }
    }

    /// Map one frame's events to sound triggers: one hit per kill.
    pub fn handle_events<W: Write>(&self, out: &mut W, events: &[GameEvent]) -> std::io::Result<()> {
        for _ in events.iter().filter(|e| **e == GameEvent::EnemyKilled) {
            self.play_sound(out, Clip::Hit)?;
        }
        Ok(())
    }
}
