//! Device-wide flags and settings mutated by the host.

use embassy_time::{Duration, Instant};

/// Lowest brightness the host can select
pub const MIN_BRIGHTNESS: u8 = 10;
/// Full brightness, no scaling applied
pub const MAX_BRIGHTNESS: u8 = 100;
/// Step used by brightness up/down
pub const BRIGHTNESS_STEP: u8 = 20;

/// Power source reported by the host
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum PowerPlan {
    Battery = 0,
    #[default]
    Usb = 1,
}

impl PowerPlan {
    pub const fn from_raw(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Battery),
            1 => Some(Self::Usb),
            _ => None,
        }
    }
}

/// Key inactivity after which the lighting blanks, per power plan
#[derive(Debug, Clone, Copy)]
pub struct IdleTimeouts {
    pub battery: Duration,
    pub usb: Duration,
}

impl Default for IdleTimeouts {
    fn default() -> Self {
        Self {
            battery: Duration::from_secs(180),
            usb: Duration::from_secs(1200),
        }
    }
}

impl IdleTimeouts {
    pub const fn for_plan(&self, plan: PowerPlan) -> Duration {
        match plan {
            PowerPlan::Battery => self.battery,
            PowerPlan::Usb => self.usb,
        }
    }
}

/// Brightness percentage, always within `MIN_BRIGHTNESS..=MAX_BRIGHTNESS`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brightness(u8);

impl Default for Brightness {
    fn default() -> Self {
        Self(MAX_BRIGHTNESS)
    }
}

impl Brightness {
    pub const fn new(percent: u8) -> Self {
        Self(clamp_brightness(percent))
    }

    pub const fn percent(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn up(self) -> Self {
        Self::new(self.0.saturating_add(BRIGHTNESS_STEP))
    }

    #[must_use]
    pub const fn down(self) -> Self {
        Self::new(self.0.saturating_sub(BRIGHTNESS_STEP))
    }
}

const fn clamp_brightness(percent: u8) -> u8 {
    if percent < MIN_BRIGHTNESS {
        MIN_BRIGHTNESS
    } else if percent > MAX_BRIGHTNESS {
        MAX_BRIGHTNESS
    } else {
        percent
    }
}

/// Flags read by the compositor every pass
#[derive(Debug, Clone, Copy)]
pub struct DeviceState {
    /// Lighting switched on by the host
    pub enabled: bool,
    /// Blanked after key inactivity
    pub idle: bool,
    pub locked: bool,
    pub gaming_mode: bool,
    pub caps_lock: bool,
    pub brightness: Brightness,
    pub power_plan: PowerPlan,
    /// 0 when inactive, otherwise the pairing/broadcasting stage
    pub bluetooth_stage: u8,
    pub last_keypress: Instant,
}

impl DeviceState {
    pub fn new(enabled: bool, brightness: u8, power_plan: PowerPlan, now: Instant) -> Self {
        Self {
            enabled,
            idle: false,
            locked: false,
            gaming_mode: false,
            caps_lock: false,
            brightness: Brightness::new(brightness),
            power_plan,
            bluetooth_stage: 0,
            last_keypress: now,
        }
    }

    /// Whether the profile output should be shown
    pub const fn is_lit(&self) -> bool {
        self.enabled && !self.idle
    }
}
