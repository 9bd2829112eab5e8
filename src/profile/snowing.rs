use heapless::Vec;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use super::{Animation, AnimationContext};
use crate::color::WHITE;
use crate::grid::{COLUMNS, ColorGrid, ROWS};

const MAX_SNOWFLAKES: usize = 30;
const DEFAULT_SNOW_INTENSITY: u8 = 50;
const SNOW_SEED: u64 = 0x534E_4F57;

#[derive(Debug, Clone, Copy)]
struct Snowflake {
    column: i16,
    row: i16,
    /// Ticks left until the next step down
    timer: u8,
    /// Ticks between steps
    fall_speed: u8,
}

/// Slowly falling white flakes, spawned above the top row
#[derive(Debug, Clone)]
pub struct SnowingAnimation {
    flakes: Vec<Snowflake, MAX_SNOWFLAKES>,
    /// Ticks until the next spawn
    spawn_timer: u8,
    intensity: u8,
    rng: SmallRng,
}

impl Default for SnowingAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl SnowingAnimation {
    pub fn new() -> Self {
        Self {
            flakes: Vec::new(),
            spawn_timer: 0,
            intensity: DEFAULT_SNOW_INTENSITY,
            rng: SmallRng::seed_from_u64(SNOW_SEED),
        }
    }

    pub fn set_intensity(&mut self, intensity: u8) {
        self.intensity = intensity.min(100);
    }

    pub fn flake_count(&self) -> usize {
        self.flakes.len()
    }
}

impl Animation for SnowingAnimation {
    fn init(&mut self, _ctx: &AnimationContext<'_>, _grid: &mut ColorGrid) {
        self.flakes.clear();
        self.intensity = DEFAULT_SNOW_INTENSITY;
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn tick(&mut self, _ctx: &AnimationContext<'_>, grid: &mut ColorGrid) {
        grid.clear();

        for flake in &mut self.flakes {
            grid.set_signed(flake.column, flake.row, WHITE);
            flake.timer = flake.timer.saturating_sub(1);
            if flake.timer == 0 {
                flake.row += 1;
                flake.timer = flake.fall_speed;
            }
        }

        self.flakes.retain(|flake| flake.row < ROWS as i16);

        self.spawn_timer = self.spawn_timer.saturating_sub(1);
        if self.spawn_timer == 0 {
            let flake = Snowflake {
                column: self.rng.gen_range(0..COLUMNS) as i16,
                row: -1,
                timer: 0,
                fall_speed: self.rng.gen_range(6..9),
            };
            self.flakes.push(flake).ok();

            // Never zero: intensity is capped at 100
            let spread = (105 - self.intensity) / 3;
            self.spawn_timer = self.rng.gen_range(0..spread) + 3;
        }
    }
}
