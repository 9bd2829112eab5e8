use super::{Animation, AnimationContext};
use crate::color::{Rgb, scale_percent};
use crate::grid::ColorGrid;

const LOCKED_COLOR: Rgb = Rgb {
    r: 255,
    g: 20,
    b: 20,
};

const RISE_STEP: u8 = 2;
const FALL_STEP: u8 = 1;

/// Whole matrix pulsing red while the keyboard is locked
#[derive(Debug, Clone, Default)]
pub struct LockedAnimation {
    intensity: u8,
    rising: bool,
}

impl LockedAnimation {
    pub const fn new() -> Self {
        Self {
            intensity: 0,
            rising: true,
        }
    }

    pub const fn intensity(&self) -> u8 {
        self.intensity
    }
}

impl Animation for LockedAnimation {
    fn init(&mut self, _ctx: &AnimationContext<'_>, _grid: &mut ColorGrid) {
        self.intensity = 0;
        self.rising = true;
    }

    fn tick(&mut self, _ctx: &AnimationContext<'_>, grid: &mut ColorGrid) {
        if self.rising {
            self.intensity = (self.intensity + RISE_STEP).min(100);
            if self.intensity >= 100 {
                self.rising = false;
            }
        } else {
            self.intensity = self.intensity.saturating_sub(FALL_STEP);
            if self.intensity == 0 {
                self.rising = true;
            }
        }
        grid.fill(scale_percent(LOCKED_COLOR, self.intensity));
    }
}
