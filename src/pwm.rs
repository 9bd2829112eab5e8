//! Software PWM over a column-multiplexed matrix.
//!
//! One column is driven at a time. Each call to [`PwmRenderer::step`] moves
//! to the next column and sets the three channel lines of every row
//! according to a sub-cycle counter. After a full pass over the columns the
//! counter advances; it runs through 255 values, so a channel of value `v`
//! is lit for `v / 255` of the time.
//!
//! The red, green and blue windows of an LED are staggered so that at most
//! one of them is usually on, which spreads the peak current.

use embedded_hal::digital::{OutputPin, PinState};

use crate::grid::{COLUMNS, ColorGrid, ROWS};
use crate::shared::FrameCell;

/// Last counter value; the counter wraps back to 0 after it
pub const PWM_COUNTER_MAX: u8 = 254;

/// Colour line of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineChannel {
    Red,
    Green,
    Blue,
}

impl LineChannel {
    pub const ALL: [Self; 3] = [Self::Red, Self::Green, Self::Blue];
}

/// Physical lines of the LED matrix
///
/// Implement this trait to support different boards.
pub trait MatrixLines {
    /// Select or release a column
    fn set_column(&mut self, column: usize, active: bool);

    /// Drive one colour line of a row
    fn set_channel(&mut self, row: usize, channel: LineChannel, high: bool);
}

/// Level that activates a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    #[default]
    ActiveHigh,
    ActiveLow,
}

impl Polarity {
    const fn state(self, active: bool) -> PinState {
        match (self, active) {
            (Self::ActiveHigh, true) | (Self::ActiveLow, false) => PinState::High,
            _ => PinState::Low,
        }
    }
}

/// [`MatrixLines`] over plain GPIO pins
pub struct PinLines<C, R> {
    columns: [C; COLUMNS],
    /// Red, green and blue pin of every row
    rows: [[R; 3]; ROWS],
    column_polarity: Polarity,
    row_polarity: Polarity,
}

impl<C: OutputPin, R: OutputPin> PinLines<C, R> {
    pub fn new(columns: [C; COLUMNS], rows: [[R; 3]; ROWS]) -> Self {
        Self {
            columns,
            rows,
            column_polarity: Polarity::ActiveHigh,
            row_polarity: Polarity::ActiveHigh,
        }
    }

    #[must_use]
    pub fn with_polarity(mut self, columns: Polarity, rows: Polarity) -> Self {
        self.column_polarity = columns;
        self.row_polarity = rows;
        self
    }

    /// Give the pins back
    pub fn release(self) -> ([C; COLUMNS], [[R; 3]; ROWS]) {
        (self.columns, self.rows)
    }
}

impl<C: OutputPin, R: OutputPin> MatrixLines for PinLines<C, R> {
    fn set_column(&mut self, column: usize, active: bool) {
        if let Some(pin) = self.columns.get_mut(column) {
            pin.set_state(self.column_polarity.state(active)).ok();
        }
    }

    fn set_channel(&mut self, row: usize, channel: LineChannel, high: bool) {
        let pin = self.rows.get_mut(row).and_then(|lines| match channel {
            LineChannel::Red => lines.get_mut(0),
            LineChannel::Green => lines.get_mut(1),
            LineChannel::Blue => lines.get_mut(2),
        });
        if let Some(pin) = pin {
            pin.set_state(self.row_polarity.state(high)).ok();
        }
    }
}

/// Start of a channel window, moved back when it would run past 255
pub const fn window_start(start: u16, value: u8) -> u16 {
    let value = value as u16;
    if start + value > 0xFF { 0xFF - value } else { start }
}

/// Whether a channel with `value` and window `start` is on at `count`
pub const fn channel_on(value: u8, start: u16, count: u8) -> bool {
    let start = window_start(start, value);
    let count = count as u16;
    start <= count && count < start + value as u16
}

/// Column scanner driving [`MatrixLines`] from the published frame
pub struct PwmRenderer<'a, L: MatrixLines> {
    lines: L,
    source: &'a FrameCell,
    snapshot: ColorGrid,
    counter: u8,
    /// Position within the current pass
    position: usize,
    /// Column left selected by the previous step
    driven: Option<usize>,
    anti_bleed: bool,
}

impl<'a, L: MatrixLines> PwmRenderer<'a, L> {
    pub fn new(lines: L, source: &'a FrameCell) -> Self {
        Self {
            lines,
            source,
            snapshot: ColorGrid::new(),
            counter: 0,
            position: 0,
            driven: None,
            anti_bleed: true,
        }
    }

    /// Scan even columns on even counter values and odd ones on odd values,
    /// so neighbouring columns are never driven back to back. On by default.
    #[must_use]
    pub fn with_anti_bleed(mut self, enabled: bool) -> Self {
        self.anti_bleed = enabled;
        self
    }

    pub const fn counter(&self) -> u8 {
        self.counter
    }

    pub const fn lines(&self) -> &L {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut L {
        &mut self.lines
    }

    const fn columns_per_pass(&self) -> usize {
        if !self.anti_bleed {
            COLUMNS
        } else if self.counter % 2 == 0 {
            COLUMNS.div_ceil(2)
        } else {
            COLUMNS / 2
        }
    }

    const fn column_at(&self, position: usize) -> usize {
        if self.anti_bleed {
            position * 2 + (self.counter % 2) as usize
        } else {
            position
        }
    }

    /// Drive the next column. Never blocks.
    ///
    /// Returns the column that was scanned.
    pub fn step(&mut self) -> usize {
        if let Some(previous) = self.driven.take() {
            self.lines.set_column(previous, false);
        }

        if self.position == 0 {
            self.snapshot = self.source.snapshot();
        }

        let column = self.column_at(self.position);
        let mut any_lit = false;
        for row in 0..ROWS {
            let led = self.snapshot.get(column, row);
            let starts = [0, u16::from(led.r), u16::from(led.r) + u16::from(led.g)];
            let values = [led.r, led.g, led.b];
            for ((channel, start), value) in LineChannel::ALL.into_iter().zip(starts).zip(values) {
                let on = channel_on(value, start, self.counter);
                self.lines.set_channel(row, channel, on);
                any_lit |= on;
            }
        }

        if any_lit {
            self.lines.set_column(column, true);
            self.driven = Some(column);
        }

        self.position += 1;
        if self.position >= self.columns_per_pass() {
            self.position = 0;
            self.counter = if self.counter >= PWM_COUNTER_MAX {
                0
            } else {
                self.counter + 1
            };
        }
        column
    }
}
