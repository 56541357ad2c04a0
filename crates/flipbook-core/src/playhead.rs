//! The live playback state.
//!
//! A [`Playhead`] is replaced wholesale on every scripted `play` — options
//! merge over *defaults*, never over the previous playhead — and is
//! mutated in place only by the player's fixed set of operations.

use std::sync::Arc;

use crate::sheet::{AnimationScript, SpriteFrame};

/// Default inter-frame delay in milliseconds when neither the playhead
/// options nor the frame override it.
pub const DEFAULT_DELAY_MS: f64 = 50.0;

pub type PlaybackHook = Box<dyn FnMut()>;
pub type FrameHook = Box<dyn FnMut(&SpriteFrame)>;

/// Host callbacks carried by the playhead. Replaced along with it.
#[derive(Default)]
pub struct Hooks {
    pub on_play: Option<PlaybackHook>,
    pub on_stop: Option<PlaybackHook>,
    pub on_frame: Option<FrameHook>,
    pub on_out_of_view: Option<PlaybackHook>,
}

/// Caller-supplied playback options. Unset fields take the documented
/// defaults; the overlay order is defaults < selected script < explicit
/// options < derived fields (the starting frame sentinel).
#[derive(Default)]
pub struct PlayOptions {
    /// Default inter-frame delay in milliseconds.
    pub delay: Option<f64>,
    /// Speed multiplier applied to every delay. Callers guarantee > 0.
    pub tempo: Option<f64>,
    /// Remaining full passes; -1 plays forever.
    pub run: Option<i32>,
    /// Play the script back to front.
    pub reversed: Option<bool>,
    /// Start advancing immediately (default true).
    pub play: Option<bool>,
    pub hooks: Hooks,
}

/// The mutable playback state for one script.
pub struct Playhead {
    pub play: bool,
    /// Default delay in milliseconds for frames without their own.
    pub delay: f64,
    /// Speed multiplier; caller-guaranteed > 0, not enforced here.
    pub tempo: f64,
    /// Remaining full passes. -1 = infinite, 0 = exhausted.
    pub run: i32,
    pub reversed: bool,
    pub script: Arc<AnimationScript>,
    /// Timestamp of the last tick that produced an advance.
    pub last_time: f64,
    /// Milliseconds until the next eligible advance.
    pub next_delay: f64,
    /// Catalog index of the sprite last drawn to the surface.
    pub current_sprite: Option<usize>,
    /// Index into the script. -1 before the first forward advance,
    /// `script.len()` before the first reversed advance.
    pub current_frame: i64,
    pub hooks: Hooks,
}

impl Playhead {
    /// Builds a brand-new playhead for `script`, merging `options` over
    /// the defaults and deriving the starting frame sentinel.
    pub fn new(script: Arc<AnimationScript>, options: PlayOptions) -> Self {
        let delay = options.delay.unwrap_or(DEFAULT_DELAY_MS);
        let tempo = options.tempo.unwrap_or(1.0);
        let reversed = options.reversed.unwrap_or(false);
        let current_frame = if reversed { script.len() as i64 } else { -1 };
        Self {
            play: options.play.unwrap_or(true),
            delay,
            tempo,
            run: options.run.unwrap_or(-1),
            reversed,
            script,
            last_time: 0.0,
            next_delay: delay / tempo,
            current_sprite: None,
            current_frame,
            hooks: options.hooks,
        }
    }

    /// An idle playhead over `script`: nothing advances until the host
    /// asks for playback.
    pub fn idle(script: Arc<AnimationScript>) -> Self {
        Self::new(
            script,
            PlayOptions {
                play: Some(false),
                ..PlayOptions::default()
            },
        )
    }

    pub fn fire_play(&mut self) {
        if let Some(hook) = self.hooks.on_play.as_mut() {
            hook();
        }
    }

    pub fn fire_stop(&mut self) {
        if let Some(hook) = self.hooks.on_stop.as_mut() {
            hook();
        }
    }

    pub fn fire_out_of_view(&mut self) {
        if let Some(hook) = self.hooks.on_out_of_view.as_mut() {
            hook();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::AnimationScript;

    fn script(len: usize) -> Arc<AnimationScript> {
        Arc::new(AnimationScript {
            name: "s".into(),
            frames: (0..len)
                .map(|_| crate::sheet::ScriptFrame {
                    sprite: None,
                    delay: None,
                    offset: None,
                })
                .collect(),
        })
    }

    #[test]
    fn test_defaults() {
        let ph = Playhead::new(script(3), PlayOptions::default());
        assert!(ph.play);
        assert_eq!(ph.delay, DEFAULT_DELAY_MS);
        assert_eq!(ph.tempo, 1.0);
        assert_eq!(ph.run, -1);
        assert!(!ph.reversed);
        assert_eq!(ph.current_frame, -1);
        assert_eq!(ph.current_sprite, None);
    }

    #[test]
    fn test_reversed_start_sentinel_is_script_length() {
        let ph = Playhead::new(
            script(3),
            PlayOptions {
                reversed: Some(true),
                ..PlayOptions::default()
            },
        );
        assert_eq!(ph.current_frame, 3);
    }

    #[test]
    fn test_initial_next_delay_is_tempo_scaled() {
        let ph = Playhead::new(
            script(3),
            PlayOptions {
                delay: Some(100.0),
                tempo: Some(2.0),
                ..PlayOptions::default()
            },
        );
        assert_eq!(ph.next_delay, 50.0);
    }
}
