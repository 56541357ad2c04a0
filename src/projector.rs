//! The engine coordinator.
//!
//! A [`Projector`] owns the resolved sheet model, the playhead and the
//! tick clock, and hides them behind a one-shot load gate: every public
//! playback mutator suspends cooperatively until the asset load has
//! finished, then runs to completion synchronously. If two mutators are
//! in flight after the gate opens, the later one to execute wins — a
//! documented caller contract, not something enforced here.
//!
//! Shared state lives behind `Arc<Mutex<…>>` so the load task and the
//! mutators can interleave on a single-threaded host executor; the lock
//! is never held across an await.

use std::path::Path;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{error, info};

use flipbook_core::{
    Cadence, Clock, FitMode, PlayOptions, Player, ScriptEntry, ScriptSelector, SheetImage,
    SpriteSheet, Surface, Visibility,
};
use flipbook_data::model::SheetManifest;

use crate::errors::EngineError;
use crate::AssetLoader;

struct Inner<S: Surface> {
    player: Option<Player>,
    surface: S,
    visibility: Box<dyn Visibility>,
    clock: Clock,
    fit: FitMode,
}

/// Plays one animated sprite onto one fixed-size surface.
pub struct Projector<S: Surface> {
    inner: Arc<Mutex<Inner<S>>>,
    loader: Arc<dyn AssetLoader>,
    loaded_tx: watch::Sender<bool>,
    loaded_rx: watch::Receiver<bool>,
}

impl<S: Surface> Projector<S> {
    /// Creates a projector over `surface`. Nothing plays until
    /// [`Projector::load`] resolves a sheet; until then every mutator
    /// waits on the load gate.
    pub fn new(
        surface: S,
        visibility: Box<dyn Visibility>,
        loader: Arc<dyn AssetLoader>,
        fit: FitMode,
    ) -> Self {
        let (loaded_tx, loaded_rx) = watch::channel(false);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                player: None,
                surface,
                visibility,
                clock: Clock::new(),
                fit,
            })),
            loader,
            loaded_tx,
            loaded_rx,
        }
    }

    /// Fetches and resolves the sheet manifest and its backing image,
    /// then opens the load gate. A fetch, parse or decode failure is
    /// fatal to this instance: it is logged and the gate stays closed,
    /// so mutators keep waiting indefinitely.
    pub async fn load(&self, manifest_path: &str) {
        match self.try_load(manifest_path) {
            Ok(frames) => {
                info!(manifest = manifest_path, frames, "sheet loaded");
                let _ = self.loaded_tx.send(true);
            }
            Err(err) => {
                error!(manifest = manifest_path, %err, "sheet load failed; playback stays gated");
            }
        }
    }

    fn try_load(&self, manifest_path: &str) -> Result<usize, EngineError> {
        let bytes = self.loader.load_bytes(manifest_path)?;
        let manifest: SheetManifest = serde_json::from_slice(&bytes)?;

        // The image location is relative to the manifest.
        let image_path = match Path::new(manifest_path).parent() {
            Some(dir) if !dir.as_os_str().is_empty() => {
                dir.join(&manifest.meta.image).to_string_lossy().into_owned()
            }
            _ => manifest.meta.image.clone(),
        };
        let image_bytes = self.loader.load_bytes(&image_path)?;
        let decoded = image::load_from_memory(&image_bytes)?.to_rgba8();

        let mut sheet = SpriteSheet::from_manifest(&manifest);
        sheet.auto_script();
        let frames = sheet.frames().len();

        let mut inner = self.inner.lock().unwrap();
        let inner = &mut *inner;
        inner.surface.install_sheet(SheetImage {
            width: decoded.width(),
            height: decoded.height(),
            pixels: decoded.into_raw(),
        });
        inner.player = Some(Player::new(sheet, inner.fit));
        Ok(frames)
    }

    pub fn is_loaded(&self) -> bool {
        *self.loaded_rx.borrow()
    }

    /// Suspends until the load gate opens. There is no timeout: a stalled
    /// load parks every mutator.
    async fn ready(&self) {
        let mut rx = self.loaded_rx.clone();
        let _ = rx.wait_for(|loaded| *loaded).await;
    }

    /// Registers a script under `name`, resolving entries against the
    /// catalog by index or name.
    pub async fn add_script(&self, name: &str, entries: &[ScriptEntry]) {
        self.ready().await;
        let mut inner = self.inner.lock().unwrap();
        if let Some(player) = inner.player.as_mut() {
            player.sheet.add_script(name, entries);
        }
    }

    /// Plays the named script with default options.
    pub async fn play(&self, script: &str) {
        self.play_with(ScriptSelector::Named(script.to_string()), PlayOptions::default())
            .await;
    }

    /// Replaces the playhead for the selected script and starts the tick
    /// loop when the new playhead is live.
    pub async fn play_with(&self, selector: ScriptSelector, options: PlayOptions) {
        self.ready().await;
        let mut inner = self.inner.lock().unwrap();
        let inner = &mut *inner;
        if let Some(player) = inner.player.as_mut() {
            if player.play_with(selector, options) {
                inner.clock.start();
            }
        }
    }

    /// Resumes the current playhead without touching script or position.
    pub async fn resume(&self) {
        self.ready().await;
        let mut inner = self.inner.lock().unwrap();
        let inner = &mut *inner;
        if let Some(player) = inner.player.as_mut() {
            if player.resume() {
                inner.clock.start();
            }
        }
    }

    /// Stops playback; the in-flight tick is not preempted, the next one
    /// observes the stop and halts the loop.
    pub async fn stop(&self) {
        self.ready().await;
        let mut inner = self.inner.lock().unwrap();
        if let Some(player) = inner.player.as_mut() {
            player.stop();
        }
    }

    /// Advances one frame in script order.
    pub async fn next(&self) {
        self.ready().await;
        let mut inner = self.inner.lock().unwrap();
        let inner = &mut *inner;
        if let Some(player) = inner.player.as_mut() {
            player.next(&mut inner.surface);
        }
    }

    /// Steps one frame against script order.
    pub async fn previous(&self) {
        self.ready().await;
        let mut inner = self.inner.lock().unwrap();
        let inner = &mut *inner;
        if let Some(player) = inner.player.as_mut() {
            player.previous(&mut inner.surface);
        }
    }

    /// Seeks to any integer position (normalized into the script).
    pub async fn go_to(&self, n: i64) {
        self.ready().await;
        let mut inner = self.inner.lock().unwrap();
        let inner = &mut *inner;
        if let Some(player) = inner.player.as_mut() {
            player.go_to(n, &mut inner.surface);
        }
    }

    /// Toggles playback direction.
    pub async fn reverse(&self) {
        self.ready().await;
        let mut inner = self.inner.lock().unwrap();
        if let Some(player) = inner.player.as_mut() {
            player.reverse();
        }
    }

    /// Sets the speed multiplier. Callers guarantee `tempo > 0`.
    pub async fn set_tempo(&self, tempo: f64) {
        self.ready().await;
        let mut inner = self.inner.lock().unwrap();
        if let Some(player) = inner.player.as_mut() {
            player.set_tempo(tempo);
        }
    }

    /// One host animation tick at `now` (milliseconds, monotonic). Not
    /// gated: before the load resolves this is a no-op that asks the host
    /// to keep ticking.
    pub fn tick(&self, now: f64) -> Cadence {
        let mut inner = self.inner.lock().unwrap();
        let inner = &mut *inner;
        if !inner.clock.is_running() {
            return Cadence::Halt;
        }
        let Some(player) = inner.player.as_mut() else {
            return Cadence::Continue;
        };
        inner
            .clock
            .tick(now, player, &mut inner.surface, inner.visibility.as_ref())
    }

    pub fn is_playing(&self) -> bool {
        let inner = self.inner.lock().unwrap();
        inner
            .player
            .as_ref()
            .map(|p| p.playhead.play)
            .unwrap_or(false)
    }

    /// Runs `f` against the surface, e.g. to export the target.
    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let inner = self.inner.lock().unwrap();
        f(&inner.surface)
    }
}
