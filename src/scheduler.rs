//! Fixed-rate animation clock.
//!
//! A single timer fires at the base rate. Animations and effects request
//! their own frame rate, which is mapped onto the base rate with an integer
//! divider: an animation at `fps` runs on every `base / fps`-th tick.
//!
//! The caller owns the timer and calls [`Engine::on_tick`] on every
//! firing.
//!
//! [`Engine::on_tick`]: crate::Engine::on_tick

use embassy_time::Duration;

/// Default rate of the animation timer
pub const BASE_RATE_HZ: u8 = 60;

/// Tick counter plus the divider arithmetic
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    base_hz: u8,
    tick_count: u32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(BASE_RATE_HZ)
    }
}

impl FrameClock {
    /// Create a clock. A zero base rate is treated as 1 Hz.
    pub const fn new(base_hz: u8) -> Self {
        Self {
            base_hz: if base_hz == 0 { 1 } else { base_hz },
            tick_count: 0,
        }
    }

    pub const fn base_hz(&self) -> u8 {
        self.base_hz
    }

    /// Interval between two timer firings
    pub const fn period(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.base_hz as u64)
    }

    pub const fn tick_count(&self) -> u32 {
        self.tick_count
    }

    /// Number of base ticks between two frames at `fps`.
    ///
    /// Rates above the base rate run every tick, a zero rate is treated as 1.
    pub const fn divider(&self, fps: u8) -> u32 {
        let fps = if fps == 0 {
            1
        } else if fps > self.base_hz {
            self.base_hz
        } else {
            fps
        };
        (self.base_hz / fps) as u32
    }

    /// Whether something running at `fps` is due on the current tick
    pub const fn is_due(&self, fps: u8) -> bool {
        self.tick_count % self.divider(fps) == 0
    }

    /// Move to the next base tick
    pub fn advance(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
    }
}
