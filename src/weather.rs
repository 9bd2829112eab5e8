//! Live weather snapshot pushed by the host.
//!
//! The snapshot is opaque to the compositor; only the live weather profile
//! and the time/temperature readouts look inside it.

use embassy_time::{Duration, Instant};

/// Snapshots older than this are considered stale
pub const WEATHER_STALE_AFTER: Duration = Duration::from_secs(650);

/// Encoded size of a [`WeatherSnapshot`] on the wire
pub const WEATHER_PAYLOAD_LEN: usize = 19;

/// Wall clock time of day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl ClockTime {
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour,
            minute,
            second,
        }
    }

    /// Minutes since midnight
    pub const fn minute_of_day(self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }

    const fn second_of_day(self) -> u64 {
        self.hour as u64 * 3600 + self.minute as u64 * 60 + self.second as u64
    }

    /// This time advanced by `elapsed`, wrapping at midnight
    #[allow(clippy::cast_possible_truncation)]
    pub const fn advanced_by(self, elapsed: Duration) -> Self {
        let total = self.second_of_day() + elapsed.as_secs();
        Self {
            hour: ((total / 3600) % 24) as u8,
            minute: ((total / 60) % 60) as u8,
            second: (total % 60) as u8,
        }
    }
}

/// Weather conditions as reported by the host.
///
/// Intensities are percentages (0-100).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeatherSnapshot {
    pub time: ClockTime,
    pub sunrise: ClockTime,
    pub sunset: ClockTime,
    pub temperature: i8,
    pub temperature_min: i8,
    pub temperature_max: i8,
    pub sun_intensity: u8,
    pub cloud_density: u8,
    pub wind_intensity: u8,
    pub rain_intensity: u8,
    pub storm_intensity: u8,
    pub snow_intensity: u8,
    pub mist: bool,
}

impl WeatherSnapshot {
    /// True when the snapshot time lies strictly between sunrise and sunset
    pub const fn is_daytime(&self) -> bool {
        let now = self.time.minute_of_day();
        now > self.sunrise.minute_of_day() && now < self.sunset.minute_of_day()
    }

    /// Decode the fixed wire layout.
    ///
    /// Three clock times (h, m, s), three signed temperatures, six
    /// intensities and a mist flag.
    #[allow(clippy::cast_possible_wrap)]
    pub const fn from_bytes(bytes: &[u8; WEATHER_PAYLOAD_LEN]) -> Self {
        Self {
            time: ClockTime::new(bytes[0], bytes[1], bytes[2]),
            sunrise: ClockTime::new(bytes[3], bytes[4], bytes[5]),
            sunset: ClockTime::new(bytes[6], bytes[7], bytes[8]),
            temperature: bytes[9] as i8,
            temperature_min: bytes[10] as i8,
            temperature_max: bytes[11] as i8,
            sun_intensity: bytes[12],
            cloud_density: bytes[13],
            wind_intensity: bytes[14],
            rain_intensity: bytes[15],
            storm_intensity: bytes[16],
            snow_intensity: bytes[17],
            mist: bytes[18] != 0,
        }
    }
}

/// Last snapshot together with the instant it arrived
#[derive(Debug, Clone, Copy, Default)]
pub struct WeatherState {
    snapshot: Option<WeatherSnapshot>,
    updated_at: Option<Instant>,
}

impl WeatherState {
    pub const fn new() -> Self {
        Self {
            snapshot: None,
            updated_at: None,
        }
    }

    pub fn set(&mut self, snapshot: WeatherSnapshot, now: Instant) {
        self.snapshot = Some(snapshot);
        self.updated_at = Some(now);
    }

    /// Latest snapshot regardless of age
    pub const fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.snapshot.as_ref()
    }

    /// Snapshot only while it is younger than [`WEATHER_STALE_AFTER`]
    pub fn fresh(&self, now: Instant) -> Option<&WeatherSnapshot> {
        let updated_at = self.updated_at?;
        if now.saturating_duration_since(updated_at) < WEATHER_STALE_AFTER {
            self.snapshot.as_ref()
        } else {
            None
        }
    }

    pub fn is_fresh(&self, now: Instant) -> bool {
        self.fresh(now).is_some()
    }

    /// Current wall clock time extrapolated from the snapshot
    pub fn current_time(&self, now: Instant) -> Option<ClockTime> {
        let updated_at = self.updated_at?;
        let snapshot = self.fresh(now)?;
        Some(
            snapshot
                .time
                .advanced_by(now.saturating_duration_since(updated_at)),
        )
    }
}
