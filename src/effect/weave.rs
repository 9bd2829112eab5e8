use super::Effect;
use crate::color::{Rgb, scale_percent};
use crate::grid::{COLUMNS, ColorGrid, ROWS};
use crate::profile::AnimationContext;

const TRAIL_LENGTH: usize = 4;

/// One-shot sweep across the matrix.
///
/// Even rows travel left to right, odd rows right to left, each dragging a
/// fading trail. The effect ends on the first dark frame after every trail
/// has left the matrix.
#[derive(Debug, Clone)]
pub struct WeaveEffect {
    color: Rgb,
    head: usize,
}

impl WeaveEffect {
    pub const fn new(color: Rgb) -> Self {
        Self { color, head: 0 }
    }

    pub const fn color(&self) -> Rgb {
        self.color
    }

    fn column_for(row: usize, position: usize) -> usize {
        if row % 2 == 0 {
            position
        } else {
            COLUMNS - 1 - position
        }
    }
}

impl Effect for WeaveEffect {
    fn init(&mut self, _ctx: &AnimationContext<'_>, _grid: &mut ColorGrid) {
        self.head = 0;
    }

    #[allow(clippy::cast_possible_truncation)]
    fn tick(&mut self, _ctx: &AnimationContext<'_>, grid: &mut ColorGrid) -> bool {
        grid.clear();
        for distance in 0..=TRAIL_LENGTH {
            let Some(position) = self.head.checked_sub(distance) else {
                break;
            };
            if position >= COLUMNS {
                continue;
            }
            let brightness = (100 - distance * 100 / (TRAIL_LENGTH + 1)) as u8;
            let color = scale_percent(self.color, brightness);
            for row in 0..ROWS {
                grid.set(Self::column_for(row, position), row, color);
            }
        }

        self.head += 1;
        self.head <= COLUMNS + TRAIL_LENGTH
    }
}
