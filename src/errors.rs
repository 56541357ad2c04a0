use thiserror::Error;

/// Failures while resolving a sheet from its manifest.
///
/// All of these are fatal to the load: they are logged and the playback
/// gate stays closed, so mutators keep waiting.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("manifest parse failed: {0}")]
    Manifest(#[from] serde_json::Error),
    #[error("sheet image decode failed: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Loader(#[from] anyhow::Error),
}
