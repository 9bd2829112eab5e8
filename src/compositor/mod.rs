//! Merges the profile output, effects and status indicators into the frame
//! the renderer shows.
//!
//! Every pass runs the same fixed sequence:
//!
//! 1. a running one-shot is shown as is and ends the pass
//! 2. pick the source: the profile output when the lighting is on and no
//!    number is being shown, else all off
//! 3. stop here while locked
//! 4. blend overlays
//! 5. scale by brightness
//! 6. stamp status indicators
//! 7. stamp the numeric readout

mod indicators;
mod numeric;

pub use indicators::{
    BLUETOOTH_COLOR, BLUETOOTH_CONNECTING_STAGES, BluetoothBlink, CAPS_LOCK_COLOR, CAPS_LOCK_INDEX, GAMING_ARROW_COLOR,
    GAMING_ARROW_INDICES, IndicatorTimings, bluetooth_index,
};
pub use numeric::{
    DigitToken, FALLBACK_INDEX, MAX_DIGIT_TOKENS, MINUS_INDEX, NumericDisplay, ZERO_INDEX,
};

use embassy_time::Instant;

use crate::color::{Rgb, WHITE, scale_percent};
use crate::effect::{OneShotLayer, OverlayLayer};
use crate::grid::ColorGrid;
use crate::state::{DeviceState, MAX_BRIGHTNESS};

/// Colour of the numeric readout
pub const DIGIT_COLOR: Rgb = WHITE;

/// Inputs to a compositor pass
#[derive(Clone, Copy)]
pub struct Layers<'a> {
    pub base: &'a ColorGrid,
    pub one_shot: &'a OneShotLayer,
    pub overlays: &'a OverlayLayer,
}

#[derive(Debug, Clone)]
pub struct Compositor {
    frame: ColorGrid,
    bluetooth: BluetoothBlink,
    numeric: NumericDisplay,
    timings: IndicatorTimings,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(IndicatorTimings::default())
    }
}

impl Compositor {
    pub const fn new(timings: IndicatorTimings) -> Self {
        Self {
            frame: ColorGrid::new(),
            bluetooth: BluetoothBlink::new(),
            numeric: NumericDisplay::new(),
            timings,
        }
    }

    pub const fn timings(&self) -> &IndicatorTimings {
        &self.timings
    }

    /// Output of the last pass
    pub const fn frame(&self) -> &ColorGrid {
        &self.frame
    }

    pub const fn numeric(&self) -> &NumericDisplay {
        &self.numeric
    }

    /// Start a numeric readout
    pub fn show_number(&mut self, value: i32, now: Instant) {
        self.numeric.show(value, now);
    }

    /// Drop a running readout
    pub fn cancel_number(&mut self) {
        self.numeric.cancel();
    }

    /// A new bluetooth stage starts with its LED lit
    pub fn restart_bluetooth_blink(&mut self, now: Instant) {
        self.bluetooth.restart(now);
    }

    /// Run one pass and return the composited frame
    pub fn compose(&mut self, state: &DeviceState, layers: Layers<'_>, now: Instant) -> &ColorGrid {
        if let Some(frame) = layers.one_shot.frame() {
            self.frame = *frame;
            return &self.frame;
        }

        if state.is_lit() && (state.locked || !self.numeric.is_armed()) {
            self.frame = *layers.base;
        } else {
            self.frame.clear();
        }

        if state.locked {
            return &self.frame;
        }

        layers.overlays.blend(&mut self.frame);

        let brightness = state.brightness.percent();
        if brightness < MAX_BRIGHTNESS {
            for led in self.frame.as_mut_slice() {
                *led = scale_percent(*led, brightness);
            }
        }

        indicators::stamp_indicators(
            &mut self.frame,
            state,
            &mut self.bluetooth,
            &self.timings,
            now,
        );

        self.numeric
            .stamp(&mut self.frame, DIGIT_COLOR, self.timings.numeric_blink, now);

        &self.frame
    }
}
