use core::f32::consts::PI;

use super::{Animation, AnimationContext, SunnyAnimation};
use crate::color::{Rgb, scale_percent};
use crate::grid::{COLUMNS, ColorGrid, ROWS};

const CLOUD_COLOR: Rgb = Rgb {
    r: 130,
    g: 200,
    b: 200,
};

const DEFAULT_CLOUD_DENSITY: u8 = 100;
/// Wave period in steps, half a sine turn
const WAVE_PERIOD: u16 = 180;
const WAVE_COLUMN_SHIFT: u16 = 6;

/// Half-wave brightness (0-100) for a step in degrees
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn wave(step: u16) -> u16 {
    let radians = f32::from(step) * PI / 180.0;
    libm::roundf(libm::sinf(radians) * 100.0).max(0.0) as u16
}

/// Clouds rolling over the sun; thick enough clouds hide it entirely
#[derive(Debug, Clone)]
pub struct CloudyAnimation {
    sun: SunnyAnimation,
    density: u8,
    period: u16,
}

impl Default for CloudyAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl CloudyAnimation {
    pub const fn new() -> Self {
        Self {
            sun: SunnyAnimation::new(),
            density: DEFAULT_CLOUD_DENSITY,
            period: 0,
        }
    }

    pub fn set_density(&mut self, density: u8) {
        self.density = density.min(100);
    }

    /// Rows covered by cloud, counted from the top
    pub fn cloud_rows(&self) -> usize {
        ROWS * (usize::from(self.density) + 12) / 100
    }
}

impl Animation for CloudyAnimation {
    fn init(&mut self, ctx: &AnimationContext<'_>, grid: &mut ColorGrid) {
        self.sun.init(ctx, grid);
        self.density = DEFAULT_CLOUD_DENSITY;
    }

    fn tick(&mut self, ctx: &AnimationContext<'_>, grid: &mut ColorGrid) {
        let max_row = self.cloud_rows();
        if max_row < ROWS {
            self.sun.tick(ctx, grid);
        }

        if self.density == 0 {
            return;
        }

        for column in 0..COLUMNS {
            let shift = u16::try_from(column).unwrap_or(0) * WAVE_COLUMN_SHIFT;
            let brightness = usize::from(wave((self.period + shift) % WAVE_PERIOD));
            for row in 0..max_row.min(ROWS) {
                let scale = (brightness * (max_row - row) * 20 / 100).min(100);
                let scale = u8::try_from(scale).unwrap_or(100);
                grid.set(column, row, scale_percent(CLOUD_COLOR, scale));
            }
        }
        self.period = (self.period + 1) % WAVE_PERIOD;
    }
}
