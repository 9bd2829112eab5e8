//! Fixed-size colour matrix shared by every stage of the pipeline.

use core::ops::{Index, IndexMut};

use crate::color::{BLACK, Rgb};

/// Number of LED columns on the keyboard matrix
pub const COLUMNS: usize = 14;
/// Number of LED rows on the keyboard matrix
pub const ROWS: usize = 5;
/// Total LED count
pub const LED_COUNT: usize = COLUMNS * ROWS;

/// Matrix of per-key colours, indexed `row * COLUMNS + column`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorGrid {
    leds: [Rgb; LED_COUNT],
}

impl Default for ColorGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorGrid {
    /// Create a grid with every LED off
    pub const fn new() -> Self {
        Self {
            leds: [BLACK; LED_COUNT],
        }
    }

    /// Linear index of a matrix position, if it lies on the matrix
    pub const fn index_of(column: usize, row: usize) -> Option<usize> {
        if column < COLUMNS && row < ROWS {
            Some(row * COLUMNS + column)
        } else {
            None
        }
    }

    /// Reset every LED to background
    pub fn clear(&mut self) {
        self.fill(BLACK);
    }

    pub fn fill(&mut self, color: Rgb) {
        self.leds = [color; LED_COUNT];
    }

    /// Colour at a matrix position, background when off the matrix
    pub fn get(&self, column: usize, row: usize) -> Rgb {
        Self::index_of(column, row)
            .and_then(|index| self.leds.get(index).copied())
            .unwrap_or(BLACK)
    }

    /// Set a matrix position. Positions off the matrix are ignored.
    pub fn set(&mut self, column: usize, row: usize, color: Rgb) {
        if let Some(index) = Self::index_of(column, row) {
            self.set_index(index, color);
        }
    }

    /// Set a signed position, ignoring anything outside the matrix.
    ///
    /// Particles (raindrops, snowflakes) spawn above the top row, so their
    /// coordinates may be negative.
    pub fn set_signed(&mut self, column: i16, row: i16, color: Rgb) {
        let (Ok(column), Ok(row)) = (usize::try_from(column), usize::try_from(row)) else {
            return;
        };
        self.set(column, row, color);
    }

    /// Set a linear index. Indices past the end are ignored.
    pub fn set_index(&mut self, index: usize, color: Rgb) {
        if let Some(led) = self.leds.get_mut(index) {
            *led = color;
        }
    }

    /// Paint a whole column
    pub fn fill_column(&mut self, column: usize, color: Rgb) {
        for row in 0..ROWS {
            self.set(column, row, color);
        }
    }

    pub fn as_slice(&self) -> &[Rgb] {
        &self.leds
    }

    pub fn as_mut_slice(&mut self) -> &mut [Rgb] {
        &mut self.leds
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Rgb> {
        self.leds.iter()
    }
}

impl Index<usize> for ColorGrid {
    type Output = Rgb;

    fn index(&self, index: usize) -> &Self::Output {
        &self.leds[index]
    }
}

impl IndexMut<usize> for ColorGrid {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.leds[index]
    }
}
