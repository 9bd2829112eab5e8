use rand::{Rng, SeedableRng, rngs::SmallRng};

use super::{Animation, AnimationContext, FrameRate};
use crate::color::{WHITE, scale_percent};
use crate::grid::ColorGrid;

pub(crate) const STARS_FPS: u8 = 6;
const STARS_SEED: u64 = 0x5354_4152;

/// (column, row, base brightness)
const STARS: [(usize, usize, u16); 9] = [
    (1, 0, 40),
    (1, 2, 100),
    (5, 1, 30),
    (11, 3, 60),
    (6, 4, 100),
    (13, 1, 85),
    (8, 0, 15),
    (8, 2, 50),
    (3, 3, 10),
];

/// Fixed night sky with twinkling stars
#[derive(Debug, Clone)]
pub struct StarsAnimation {
    rng: SmallRng,
}

impl Default for StarsAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl StarsAnimation {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::seed_from_u64(STARS_SEED),
        }
    }
}

impl Animation for StarsAnimation {
    const FRAME_RATE: FrameRate = FrameRate::Fixed(STARS_FPS);

    fn tick(&mut self, _ctx: &AnimationContext<'_>, grid: &mut ColorGrid) {
        grid.clear();
        for (column, row, base) in STARS {
            let flicker = self.rng.gen_range(70..130u16);
            let brightness = (base * flicker / 100).min(100);
            let brightness = u8::try_from(brightness).unwrap_or(100);
            grid.set(column, row, scale_percent(WHITE, brightness));
        }
    }
}
