use super::{Animation, AnimationContext};
use crate::color::{Hsv, hsv2rgb};
use crate::grid::{COLUMNS, ColorGrid};

const FLOW_SATURATION: u8 = 255;
const FLOW_VALUE: u8 = 125;
const HUE_SPACING: u8 = 11;

/// Columns past this hue skip straight to [`HUE_RESUME`]
const HUE_SKIP_FROM: u8 = 179;
const HUE_RESUME: u8 = 240;

/// Rainbow that scrolls sideways, one hue per column
#[derive(Debug, Clone)]
pub struct RainbowFlowAnimation {
    hues: [u8; COLUMNS],
}

impl Default for RainbowFlowAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl RainbowFlowAnimation {
    pub fn new() -> Self {
        let mut hues = [0; COLUMNS];
        let mut hue = 0u8;
        for slot in &mut hues {
            *slot = hue;
            hue = hue.wrapping_add(HUE_SPACING);
        }
        Self { hues }
    }
}

impl Animation for RainbowFlowAnimation {
    fn tick(&mut self, _ctx: &AnimationContext<'_>, grid: &mut ColorGrid) {
        for (column, hue) in self.hues.iter_mut().enumerate() {
            let color = hsv2rgb(Hsv {
                hue: *hue,
                sat: FLOW_SATURATION,
                val: FLOW_VALUE,
            });
            grid.fill_column(column, color);

            if *hue == HUE_SKIP_FROM {
                *hue = HUE_RESUME;
            }
            *hue = hue.wrapping_add(1);
        }
    }
}
