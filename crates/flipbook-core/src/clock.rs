//! The timing-gated tick loop.
//!
//! The host delivers a recurring animation callback with a monotonically
//! increasing timestamp; the loop's self-rescheduling is inverted into a
//! [`Cadence`] return value. Continuation is the default — the host keeps
//! scheduling ticks while it sees [`Cadence::Continue`] — and the loop
//! cancels itself by returning [`Cadence::Halt`] on the same tick that
//! observed playback stopping.
//!
//! "Is it time" (the wall-clock throttle) is kept separate from "should
//! we actually render" (the visibility gate) so playback pauses
//! transparently while off-view without consuming the run budget.

use crate::player::Player;
use crate::surface::{Surface, Visibility};

/// What the host should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Schedule the next tick.
    Continue,
    /// The loop is over; stop scheduling.
    Halt,
}

/// Tracks whether the tick loop is live.
#[derive(Debug, Default)]
pub struct Clock {
    running: bool,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the loop; the next `tick` call is live.
    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// One host tick at timestamp `now` (milliseconds).
    ///
    /// A tick that arrives before `next_delay` has elapsed skips
    /// silently. A qualifying tick advances the playhead only when the
    /// surface is rendered and in view and the run budget is not
    /// exhausted; an off-view tick fires `on_out_of_view` instead and
    /// preserves the budget. Whatever happened above, a playhead that is
    /// no longer playing halts the loop.
    pub fn tick(
        &mut self,
        now: f64,
        player: &mut Player,
        surface: &mut dyn Surface,
        visibility: &dyn Visibility,
    ) -> Cadence {
        if !self.running {
            return Cadence::Halt;
        }

        if now - player.playhead.last_time >= player.playhead.next_delay {
            if visibility.is_rendered() && visibility.is_in_view() {
                if player.playhead.run != 0 {
                    if player.playhead.reversed {
                        player.previous(surface);
                    } else {
                        player.next(surface);
                    }
                    player.playhead.last_time = now;
                }
            } else {
                player.playhead.fire_out_of_view();
            }
        }

        if !player.playhead.play {
            self.running = false;
            return Cadence::Halt;
        }
        Cadence::Continue
    }
}
