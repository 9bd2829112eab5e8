//! Status LEDs stamped over the output every pass.

use embassy_time::{Duration, Instant};

use crate::color::Rgb;
use crate::grid::ColorGrid;
use crate::state::DeviceState;

pub const CAPS_LOCK_INDEX: usize = 28;
pub const CAPS_LOCK_COLOR: Rgb = Rgb {
    r: 255,
    g: 25,
    b: 25,
};

pub const BLUETOOTH_COLOR: Rgb = Rgb {
    r: 0,
    g: 255,
    b: 30,
};
/// Stages above this are broadcasting rather than connecting
pub const BLUETOOTH_CONNECTING_STAGES: u8 = 4;

pub const GAMING_ARROW_INDICES: [usize; 4] = [54, 66, 67, 68];
pub const GAMING_ARROW_COLOR: Rgb = Rgb { r: 110, g: 5, b: 5 };

/// Blink and display timings of the status indicators
#[derive(Debug, Clone, Copy)]
pub struct IndicatorTimings {
    /// Bluetooth blink rate while connecting (stages 1-4)
    pub bluetooth_connecting: Duration,
    /// Bluetooth blink rate while broadcasting (stages above 4)
    pub bluetooth_broadcasting: Duration,
    /// On and off time of each numeric display token
    pub numeric_blink: Duration,
    /// Blinks of the bluetooth LED once connected
    pub bluetooth_connected_blinks: u8,
    /// Blink rate of the bluetooth connected confirmation
    pub bluetooth_connected_blink: Duration,
}

impl Default for IndicatorTimings {
    fn default() -> Self {
        Self {
            bluetooth_connecting: Duration::from_millis(500),
            bluetooth_broadcasting: Duration::from_millis(250),
            numeric_blink: Duration::from_millis(350),
            bluetooth_connected_blinks: 3,
            bluetooth_connected_blink: Duration::from_millis(120),
        }
    }
}

impl IndicatorTimings {
    pub const fn bluetooth_rate(&self, stage: u8) -> Duration {
        if stage <= BLUETOOTH_CONNECTING_STAGES {
            self.bluetooth_connecting
        } else {
            self.bluetooth_broadcasting
        }
    }
}

/// LED showing a bluetooth stage; stages cycle through indices 1-4
pub const fn bluetooth_index(stage: u8) -> usize {
    (stage.saturating_sub(1) % BLUETOOTH_CONNECTING_STAGES + 1) as usize
}

/// On/off phase of the bluetooth LED
#[derive(Debug, Clone, Copy)]
pub struct BluetoothBlink {
    lit: bool,
    toggled_at: Instant,
}

impl Default for BluetoothBlink {
    fn default() -> Self {
        Self::new()
    }
}

impl BluetoothBlink {
    pub const fn new() -> Self {
        Self {
            lit: false,
            toggled_at: Instant::MIN,
        }
    }

    /// Start a new stage lit
    pub fn restart(&mut self, now: Instant) {
        self.lit = true;
        self.toggled_at = now;
    }

    pub const fn is_lit(&self) -> bool {
        self.lit
    }

    fn advance(&mut self, now: Instant, rate: Duration) {
        if now.saturating_duration_since(self.toggled_at) > rate {
            self.lit = !self.lit;
            self.toggled_at = now;
        }
    }
}

/// Stamp caps lock, bluetooth and gaming indicators
pub(crate) fn stamp_indicators(
    grid: &mut ColorGrid,
    state: &DeviceState,
    bluetooth: &mut BluetoothBlink,
    timings: &IndicatorTimings,
    now: Instant,
) {
    if state.caps_lock {
        grid.set_index(CAPS_LOCK_INDEX, CAPS_LOCK_COLOR);
    }

    let stage = state.bluetooth_stage;
    if stage > 0 {
        bluetooth.advance(now, timings.bluetooth_rate(stage));
        if bluetooth.is_lit() {
            grid.set_index(bluetooth_index(stage), BLUETOOTH_COLOR);
        }
    }

    if state.gaming_mode {
        for index in GAMING_ARROW_INDICES {
            grid.set_index(index, GAMING_ARROW_COLOR);
        }
    }
}
