//! # flipbook-core
//!
//! Renderer-agnostic playback core for packed sprite-sheet animations:
//! the frame catalog and named scripts, the playhead state machine, the
//! timing-gated tick loop, and the pure frame-geometry resolver. Drawing
//! and visibility go through the [`Surface`] and [`Visibility`] seams so
//! the core never depends on a pixel library.
//!
//! The host drives everything: it resolves a [`sheet::SpriteSheet`] from
//! manifest data, wraps it in a [`player::Player`], and feeds the
//! [`clock::Clock`] timestamps from its own animation callback.

pub mod clock;
pub mod errors;
pub mod geometry;
pub mod playhead;
pub mod player;
pub mod sheet;
pub mod surface;
pub mod types;

pub use clock::{Cadence, Clock};
pub use errors::PlaybackError;
pub use playhead::{Hooks, PlayOptions, Playhead};
pub use player::{Player, ScriptSelector};
pub use sheet::{AnimationScript, ScriptEntry, SpriteFrame, SpriteSheet, ALL_SCRIPT};
pub use surface::{AlwaysVisible, SheetImage, Surface, Visibility};
pub use types::{FitMode, Rect, Size};
