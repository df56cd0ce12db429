use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop the game before (or while leaving) the frame loop.
///
/// Gameplay itself never errors: squad underflow, empty waves and lane
/// clamping are all handled by guards inside the simulation.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("sound clip `{clip}` not found at {}", path.display())]
    MissingAsset { clip: &'static str, path: PathBuf },
}
