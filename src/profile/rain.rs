//! Falling raindrops with fading trails

use embassy_time::{Duration, Instant};
use heapless::Vec;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use super::{Animation, AnimationContext};
use crate::color::{BLACK, Rgb, scale_percent};
use crate::grid::{COLUMNS, ColorGrid, ROWS};

const RAIN_COLOR: Rgb = Rgb {
    r: 30,
    g: 30,
    b: 255,
};

const MAX_RAINDROPS: usize = 40;
const TRAIL_LENGTH: i16 = 6;
const MOVE_INTERVAL: Duration = Duration::from_millis(55);
/// Drops are dropped once their trail has left the matrix
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const FINISHED_ROW: i16 = ROWS as i16 + TRAIL_LENGTH + 1;

const DEFAULT_RAIN_INTENSITY: u8 = 50;
const RAIN_SEED: u64 = 0x5241_494E;

#[derive(Debug, Clone, Copy)]
struct Raindrop {
    column: i16,
    row: i16,
}

/// Rain effect - drops spawn on the top row and fall with a trail
#[derive(Debug, Clone)]
pub struct RainAnimation {
    drops: Vec<Raindrop, MAX_RAINDROPS>,
    next_spawn: Instant,
    last_moved: Instant,
    /// Spawn rate, 0-100
    intensity: u8,
    rng: SmallRng,
}

impl Default for RainAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl RainAnimation {
    pub fn new() -> Self {
        Self {
            drops: Vec::new(),
            next_spawn: Instant::MIN,
            last_moved: Instant::MIN,
            intensity: DEFAULT_RAIN_INTENSITY,
            rng: SmallRng::seed_from_u64(RAIN_SEED),
        }
    }

    pub fn set_intensity(&mut self, intensity: u8) {
        self.intensity = intensity.min(100);
    }

    pub fn drop_count(&self) -> usize {
        self.drops.len()
    }

    fn draw(&self, grid: &mut ColorGrid) {
        grid.fill(BLACK);
        for drop in &self.drops {
            for row in 0..=drop.row.min(ROWS as i16 - 1) {
                let distance = drop.row - row;
                if distance > TRAIL_LENGTH {
                    continue;
                }
                let brightness = 100 - distance * 100 / TRAIL_LENGTH;
                let brightness = u8::try_from(brightness).unwrap_or(0);
                grid.set_signed(drop.column, row, scale_percent(RAIN_COLOR, brightness));
            }
        }
    }

    /// Delay until the next spawn; higher intensity spawns more often
    fn spawn_delay(&mut self) -> Duration {
        let jitter = self.rng.gen_range(30..80u64);
        let factor = 120 - u64::from(self.intensity);
        Duration::from_millis(jitter * factor * 5 / 200)
    }
}

impl Animation for RainAnimation {
    fn init(&mut self, ctx: &AnimationContext<'_>, _grid: &mut ColorGrid) {
        self.drops.clear();
        self.next_spawn = ctx.now;
        self.last_moved = Instant::MIN;
        self.intensity = DEFAULT_RAIN_INTENSITY;
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn tick(&mut self, ctx: &AnimationContext<'_>, grid: &mut ColorGrid) {
        let now = ctx.now;
        if now.saturating_duration_since(self.last_moved) > MOVE_INTERVAL {
            for drop in &mut self.drops {
                drop.row += 1;
            }
            self.draw(grid);
            self.last_moved = now;
        }

        self.drops.retain(|drop| drop.row < FINISHED_ROW);

        if self.next_spawn <= now {
            let column = self.rng.gen_range(0..COLUMNS) as i16;
            self.drops.push(Raindrop { column, row: 0 }).ok();
            self.next_spawn = now + self.spawn_delay();
        }
    }
}
