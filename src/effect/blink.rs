use embassy_time::{Duration, Instant};

use super::Effect;
use crate::color::Rgb;
use crate::grid::ColorGrid;
use crate::profile::AnimationContext;

/// Blink a single LED a fixed number of times
#[derive(Debug, Clone)]
pub struct BlinkEffect {
    index: usize,
    color: Rgb,
    interval: Duration,
    /// Blinks left, counting the one currently shown
    remaining: u8,
    lit: bool,
    toggled_at: Instant,
}

impl BlinkEffect {
    pub const fn new(index: usize, color: Rgb, count: u8, interval: Duration) -> Self {
        Self {
            index,
            color,
            interval,
            remaining: count,
            lit: false,
            toggled_at: Instant::MIN,
        }
    }

    pub const fn index(&self) -> usize {
        self.index
    }

    pub const fn remaining(&self) -> u8 {
        self.remaining
    }
}

impl Effect for BlinkEffect {
    fn init(&mut self, ctx: &AnimationContext<'_>, grid: &mut ColorGrid) {
        self.lit = self.remaining > 0;
        self.toggled_at = ctx.now;
        if self.lit {
            grid.set_index(self.index, self.color);
        }
    }

    fn tick(&mut self, ctx: &AnimationContext<'_>, grid: &mut ColorGrid) -> bool {
        if self.remaining == 0 {
            return false;
        }

        if ctx.now.saturating_duration_since(self.toggled_at) >= self.interval {
            self.toggled_at = ctx.now;
            self.lit = !self.lit;
            if !self.lit {
                self.remaining -= 1;
            }
        }

        if self.lit {
            grid.set_index(self.index, self.color);
        }
        self.remaining > 0
    }
}
