//! # Flipbook Engine
//!
//! `flipbook-engine` plays back named, scriptable frame sequences cut from
//! a packed sprite sheet, drawn onto a fixed-size 2D surface at a
//! host-driven rendering cadence.
//!
//! ## Core Features
//!
//! *   **Playhead state machine**: script selection, direction, run
//!     counting and frame advancement, replaced wholesale on every play.
//! *   **Timing-gated scheduling**: the host feeds timestamps; the engine
//!     throttles to a minimum inter-frame interval scaled by tempo.
//! *   **Visibility-driven pausing**: off-view ticks skip drawing without
//!     consuming the run budget.
//! *   **Frame geometry**: aspect-preserving fit-and-center or native
//!     placement, with trim correction for packed sprites.
//!
//! ## Usage
//!
//! The core entry point is the [`Projector`], which owns the sheet model,
//! the playhead and the tick clock behind a one-shot load gate.
//!
//! ```rust,no_run
//! use flipbook_engine::{DefaultAssetLoader, Projector};
//! use flipbook_core::{AlwaysVisible, FitMode};
//! use flipbook_raster::RasterSurface;
//! use std::sync::Arc;
//!
//! # async fn demo() {
//! let projector = Projector::new(
//!     RasterSurface::new(128, 128),
//!     Box::new(AlwaysVisible),
//!     Arc::new(DefaultAssetLoader),
//!     FitMode::Contain,
//! );
//! projector.load("assets/hero.json").await;
//! projector.play("walk").await;
//! # }
//! ```

/// The engine coordinator and its one-shot load gate.
pub mod projector;

pub mod errors;

pub use errors::EngineError;
pub use projector::Projector;

pub use flipbook_core::{
    AlwaysVisible, Cadence, FitMode, Hooks, PlayOptions, ScriptEntry, ScriptSelector, Surface,
    Visibility,
};
pub use flipbook_raster::RasterSurface;

use anyhow::Result;
use tracing::instrument;

/// A trait for abstracting access to the sheet manifest and its backing
/// image.
///
/// This allows the engine to be embedded where direct file system access
/// is restricted or virtualized (loading assets from a network or an
/// archive).
pub trait AssetLoader: Send + Sync {
    /// Loads the raw bytes of an asset from the given path.
    fn load_bytes(&self, path: &str) -> Result<Vec<u8>>;
}

/// The default implementation of `AssetLoader` using `std::fs`.
pub struct DefaultAssetLoader;

impl AssetLoader for DefaultAssetLoader {
    /// Loads bytes directly from the local filesystem, falling back to
    /// `assets/` when the path does not resolve as given.
    #[instrument(level = "debug", skip(self), fields(path = path))]
    fn load_bytes(&self, path: &str) -> Result<Vec<u8>> {
        if let Ok(bytes) = std::fs::read(path) {
            return Ok(bytes);
        }
        let alt = format!("assets/{}", path);
        std::fs::read(&alt).map_err(|e| {
            anyhow::anyhow!(
                "Asset not found: {} (checked '{}' and '{}'): {}",
                path,
                path,
                alt,
                e
            )
        })
    }
}
