use super::{Animation, AnimationContext};
use crate::color::{YELLOW, scale_percent};
use crate::grid::{ColorGrid, LED_COUNT};

/// Angle of each LED as seen from the sun in the top-left corner
#[rustfmt::skip]
const SUN_ANGLES: [u16; LED_COUNT] = [
     0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
    90, 40, 37, 34, 31, 28, 25, 22, 19, 17, 15, 13, 11, 10,
    90, 50, 47, 44, 41, 38, 35, 32, 29, 27, 25, 23, 21, 19,
    90, 67, 64, 61, 58, 55, 52, 49, 46, 43, 40, 37, 34, 30,
    90, 77, 74, 71, 68, 65, 62, 59, 56, 53, 50, 47, 44, 40,
];

/// Degrees per ray, five rays around the sun
const RAY_SPAN: u16 = 72;
const HALF_RAY: u16 = RAY_SPAN / 2;

/// Sun in the corner with slowly rotating rays
#[derive(Debug, Clone, Default)]
pub struct SunnyAnimation {
    rotation: u16,
}

impl SunnyAnimation {
    pub const fn new() -> Self {
        Self { rotation: 0 }
    }

    fn ray_brightness(&self, index: usize) -> u8 {
        let angle = (SUN_ANGLES[index] + self.rotation) % 360;
        let brightness = (angle % RAY_SPAN).abs_diff(HALF_RAY) * 100 / HALF_RAY;
        u8::try_from(brightness.min(100)).unwrap_or(100)
    }
}

impl Animation for SunnyAnimation {
    fn tick(&mut self, _ctx: &AnimationContext<'_>, grid: &mut ColorGrid) {
        for index in 0..LED_COUNT {
            grid[index] = scale_percent(YELLOW, self.ray_brightness(index));
        }
        grid[0] = YELLOW;
        self.rotation = (self.rotation + 1) % 360;
    }
}
