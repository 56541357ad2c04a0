use thiserror::Error;

/// Failures raised while resolving scripts and frames.
///
/// None of these cross the public playback-control boundary: the player
/// logs them and degrades to a no-op that preserves the last valid state.
#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("animation not found: {name}")]
    AnimationNotFound { name: String },
    #[error("script {script:?} entry {entry} matched no catalog frame")]
    FrameNotFound { script: String, entry: usize },
}
