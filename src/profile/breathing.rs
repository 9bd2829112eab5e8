//! Reactive profile: every key press lights up and slowly fades

use heapless::Vec;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use super::{Animation, AnimationContext};
use crate::color::{
    BLUE, GREEN, ORANGE, PINK, PURPLE, RED, Rgb, TURQUOISE, YELLOW, scale_percent,
};
use crate::grid::ColorGrid;
use crate::keys::KeyPosition;

const MAX_TAPS: usize = 25;
const FADE_STEP: i16 = 8;
const BREATHING_SEED: u64 = 0x4252_4541;

const PALETTE: [Rgb; 8] = [RED, GREEN, BLUE, PINK, PURPLE, YELLOW, ORANGE, TURQUOISE];

#[derive(Debug, Clone, Copy)]
struct Tap {
    key: KeyPosition,
    color: Rgb,
    brightness: i16,
}

#[derive(Debug, Clone)]
pub struct BreathingAnimation {
    taps: Vec<Tap, MAX_TAPS>,
    rng: SmallRng,
}

impl Default for BreathingAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl BreathingAnimation {
    pub fn new() -> Self {
        Self {
            taps: Vec::new(),
            rng: SmallRng::seed_from_u64(BREATHING_SEED),
        }
    }

    /// Taps still fading out
    pub fn active_taps(&self) -> usize {
        self.taps.len()
    }
}

impl Animation for BreathingAnimation {
    fn init(&mut self, _ctx: &AnimationContext<'_>, _grid: &mut ColorGrid) {
        self.taps.clear();
    }

    fn tick(&mut self, _ctx: &AnimationContext<'_>, grid: &mut ColorGrid) {
        grid.clear();
        for tap in &mut self.taps {
            let brightness = u8::try_from(tap.brightness.max(0)).unwrap_or(100);
            grid.set(
                usize::from(tap.key.column),
                usize::from(tap.key.row),
                scale_percent(tap.color, brightness),
            );
            tap.brightness -= FADE_STEP;
        }
        self.taps.retain(|tap| tap.brightness > 0);
    }

    fn on_key_press(&mut self, key: KeyPosition, _grid: &mut ColorGrid) {
        let color = PALETTE[self.rng.gen_range(0..PALETTE.len())];
        self.taps
            .push(Tap {
                key,
                color,
                brightness: 100,
            })
            .ok();
    }
}
