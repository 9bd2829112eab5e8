//! Rain with occasional lightning strikes

use embassy_time::{Duration, Instant};
use rand::{Rng, SeedableRng, rngs::SmallRng};

use super::{Animation, AnimationContext, RainAnimation};
use crate::color::{WHITE, scale_percent};
use crate::grid::{COLUMNS, ColorGrid};

const DEFAULT_STORM_INTENSITY: u8 = 50;
const LIGHTNING_FADE: i16 = 5;
const STORM_SEED: u64 = 0x5354_4F52;

#[derive(Debug, Clone, Copy)]
struct Lightning {
    column: usize,
    intensity: i16,
    max_flashes: u8,
    flash: u8,
    next_flash: Instant,
    lit: bool,
}

impl Lightning {
    const fn idle() -> Self {
        Self {
            column: 0,
            intensity: 0,
            max_flashes: 0,
            flash: 0,
            next_flash: Instant::MIN,
            lit: false,
        }
    }

    const fn is_done(&self) -> bool {
        self.flash >= self.max_flashes
    }
}

/// Storm effect - rain plus a flickering column of lightning
#[derive(Debug, Clone)]
pub struct StormAnimation {
    rain: RainAnimation,
    lightning: Lightning,
    next_strike: Instant,
    /// Strike rate, 0-100
    intensity: u8,
    rng: SmallRng,
}

impl Default for StormAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl StormAnimation {
    pub fn new() -> Self {
        Self {
            rain: RainAnimation::new(),
            lightning: Lightning::idle(),
            next_strike: Instant::MIN,
            intensity: DEFAULT_STORM_INTENSITY,
            rng: SmallRng::seed_from_u64(STORM_SEED),
        }
    }

    pub fn set_intensity(&mut self, intensity: u8) {
        self.intensity = intensity.min(100);
    }

    pub fn set_rain_intensity(&mut self, intensity: u8) {
        self.rain.set_intensity(intensity);
    }

    fn strike(&mut self, now: Instant) {
        self.lightning = Lightning {
            column: self.rng.gen_range(0..COLUMNS),
            intensity: self.lightning.intensity,
            max_flashes: self.rng.gen_range(1..=6),
            flash: 0,
            next_flash: now,
            lit: false,
        };
        let base = self.rng.gen_range(2000..11_000u64);
        let factor = 125 - u64::from(self.intensity);
        self.next_strike = now + Duration::from_millis(base * factor / 50);
    }

    fn advance_lightning(&mut self, now: Instant) {
        let lightning = &mut self.lightning;
        lightning.intensity = (lightning.intensity - LIGHTNING_FADE).max(0);
        if lightning.intensity < 10 && lightning.is_done() {
            lightning.intensity = 0;
        }

        if !lightning.is_done() && lightning.next_flash <= now {
            lightning.flash += 1;
            lightning.lit = !lightning.lit;
            lightning.intensity = self.rng.gen_range(71..=100);
            let hold = if lightning.lit {
                self.rng.gen_range(150..850u64)
            } else {
                self.rng.gen_range(30..70u64)
            };
            lightning.next_flash = now + Duration::from_millis(hold);
        }
    }
}

impl Animation for StormAnimation {
    fn init(&mut self, ctx: &AnimationContext<'_>, grid: &mut ColorGrid) {
        self.rain.init(ctx, grid);
        self.lightning = Lightning::idle();
        self.next_strike = ctx.now;
        self.intensity = DEFAULT_STORM_INTENSITY;
    }

    fn tick(&mut self, ctx: &AnimationContext<'_>, grid: &mut ColorGrid) {
        self.rain.tick(ctx, grid);

        if ctx.now >= self.next_strike {
            self.strike(ctx.now);
        }
        self.advance_lightning(ctx.now);

        let lightning = &self.lightning;
        if lightning.lit || (lightning.intensity > 0 && lightning.is_done()) {
            let intensity = u8::try_from(lightning.intensity).unwrap_or(100);
            grid.fill_column(lightning.column, scale_percent(WHITE, intensity));
        }
    }
}
