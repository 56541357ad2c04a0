//! The playback state machine.
//!
//! A [`Player`] owns the sheet and the current [`Playhead`] and exposes
//! the small fixed set of operations that may mutate playback: script
//! selection, stepping, seeking, direction and tempo. Drawing goes
//! through the [`Surface`] seam; whether an operation *starts* the tick
//! loop is reported back to the caller, which owns the clock.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::errors::PlaybackError;
use crate::geometry;
use crate::playhead::{PlayOptions, Playhead};
use crate::sheet::{AnimationScript, ScriptEntry, SpriteSheet, ALL_SCRIPT};
use crate::surface::Surface;
use crate::types::{FitMode, Rect};

/// Which script a `play` call targets.
pub enum ScriptSelector {
    /// Keep the script the playhead already references (options-only form).
    Current,
    /// Look the script up by registered name.
    Named(String),
    /// Resolve an inline entry list through the script builder.
    Entries(Vec<ScriptEntry>),
}

/// Name given to scripts built from inline entry lists.
const INLINE_SCRIPT: &str = "inline";

pub struct Player {
    pub sheet: SpriteSheet,
    pub playhead: Playhead,
    fit: FitMode,
}

impl Player {
    /// Wraps a resolved sheet. The initial playhead idles over the `"all"`
    /// script when one is registered, or an empty placeholder otherwise.
    pub fn new(sheet: SpriteSheet, fit: FitMode) -> Self {
        let script = sheet.script(ALL_SCRIPT).unwrap_or_else(|| {
            Arc::new(AnimationScript {
                name: ALL_SCRIPT.to_string(),
                frames: Vec::new(),
            })
        });
        Self {
            sheet,
            playhead: Playhead::idle(script),
            fit,
        }
    }

    /// The no-argument `play`: Idle becomes Playing, and a naturally
    /// exhausted run is reset to a single pass so resuming replays once.
    /// Script and frame position are untouched.
    ///
    /// Returns true when the tick loop should (re)start.
    pub fn resume(&mut self) -> bool {
        let ph = &mut self.playhead;
        ph.play = true;
        if ph.run == 0 {
            ph.run = 1;
        }
        ph.fire_play();
        ph.run != 0 && !ph.script.is_empty()
    }

    /// The scripted `play`: resolves the target script, replaces the
    /// playhead wholesale (options merge over defaults, never over the
    /// prior playhead) and fires `on_play` whether or not a new loop
    /// starts.
    ///
    /// A name that resolves to nothing falls back to `"all"`; if no
    /// script at all can be resolved the current playhead is forced to
    /// the exhausted state and no playback starts.
    ///
    /// Returns true when the tick loop should start.
    pub fn play_with(&mut self, selector: ScriptSelector, options: PlayOptions) -> bool {
        let script = match selector {
            ScriptSelector::Current => Some(self.playhead.script.clone()),
            ScriptSelector::Named(name) => self.sheet.script(&name).or_else(|| {
                warn!(
                    "{}; falling back to {ALL_SCRIPT:?}",
                    PlaybackError::AnimationNotFound { name: name.clone() }
                );
                self.sheet.script(ALL_SCRIPT)
            }),
            ScriptSelector::Entries(entries) => {
                Some(Arc::new(self.sheet.build_script(INLINE_SCRIPT, &entries)))
            }
        };
        let script = match script {
            Some(s) if !s.is_empty() => s,
            _ => {
                warn!("no script to play; playback not started");
                self.playhead.run = 0;
                self.playhead.play = false;
                return false;
            }
        };

        self.playhead = Playhead::new(script, options);
        let start = self.playhead.run != 0 && self.playhead.play;
        self.playhead.fire_play();
        start
    }

    /// Halts advancement and fires `on_stop`. Idempotent: stopping an
    /// already stopped playhead still fires the callback.
    pub fn stop(&mut self) {
        self.playhead.play = false;
        self.playhead.fire_stop();
    }

    /// Advances one frame forward, wrapping to the start and consuming a
    /// run on wraparound. An advance that exhausts the run while playing
    /// stops instead of drawing.
    pub fn next(&mut self, surface: &mut dyn Surface) {
        let len = self.playhead.script.len() as i64;
        if len == 0 {
            return;
        }
        self.playhead.current_frame += 1;
        if self.playhead.current_frame >= len {
            self.playhead.current_frame = 0;
            if self.playhead.run > 0 {
                self.playhead.run -= 1;
            }
        }
        self.finish_step(surface);
    }

    /// Mirror of [`Player::next`] in the opposite direction.
    pub fn previous(&mut self, surface: &mut dyn Surface) {
        let len = self.playhead.script.len() as i64;
        if len == 0 {
            return;
        }
        self.playhead.current_frame -= 1;
        if self.playhead.current_frame < 0 {
            self.playhead.current_frame = len - 1;
            if self.playhead.run > 0 {
                self.playhead.run -= 1;
            }
        }
        self.finish_step(surface);
    }

    /// Seeks to any integer position, normalized by floored modulo into
    /// the script. Touches neither the run budget nor the play flag.
    pub fn go_to(&mut self, n: i64, surface: &mut dyn Surface) {
        let len = self.playhead.script.len() as i64;
        if len == 0 {
            return;
        }
        self.playhead.current_frame = n.rem_euclid(len);
        self.draw_current(surface);
    }

    /// Toggles direction only; frame position and run are untouched.
    pub fn reverse(&mut self) {
        self.playhead.reversed = !self.playhead.reversed;
    }

    /// Sets the speed multiplier. Validity (> 0) is a caller contract.
    pub fn set_tempo(&mut self, tempo: f64) {
        self.playhead.tempo = tempo;
    }

    fn finish_step(&mut self, surface: &mut dyn Surface) {
        if self.playhead.play && self.playhead.run == 0 {
            self.stop();
            return;
        }
        self.draw_current(surface);
    }

    /// Resolves and draws the frame under the playhead, recomputing the
    /// throttle delay from the upcoming entry (a per-entry delay elapses
    /// before that entry is shown). Drawing the same catalog sprite twice
    /// skips the surface mutation but still fires `on_frame`.
    fn draw_current(&mut self, surface: &mut dyn Surface) {
        let script = self.playhead.script.clone();
        let len = script.len() as i64;
        let idx = self.playhead.current_frame;
        let Some(step) = script.frames.get(idx as usize) else {
            return;
        };

        let upcoming = if self.playhead.reversed {
            (idx - 1).rem_euclid(len)
        } else {
            (idx + 1).rem_euclid(len)
        };
        let gate = script.frames[upcoming as usize]
            .delay
            .unwrap_or(self.playhead.delay);
        self.playhead.next_delay = gate / self.playhead.tempo;

        let Some(frame) = step.sprite.as_ref() else {
            warn!(
                script = %script.name,
                position = idx,
                "script entry has no catalog frame; skipping draw"
            );
            return;
        };

        if self.playhead.current_sprite != Some(frame.index) {
            let dest = surface.size();
            let spec = geometry::resolve(frame, step.offset, dest, self.fit);
            surface.clear_region(Rect::from_size(dest));
            surface.blit(spec.src, spec.dst);
            self.playhead.current_sprite = Some(frame.index);
            debug!(
                script = %script.name,
                position = idx,
                sprite = frame.index,
                "frame drawn"
            );
        }
        if let Some(hook) = self.playhead.hooks.on_frame.as_mut() {
            hook(frame);
        }
    }
}
