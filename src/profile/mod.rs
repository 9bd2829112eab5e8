//! Profile system with a compile-time known animation table
//!
//! All profiles are stored in an enum to avoid heap allocations.
//! Each profile implements the `Animation` trait, overriding only the
//! callbacks it needs.

mod breathing;
mod cloudy;
mod live_weather;
mod locked;
mod rain;
mod rainbow_flow;
mod snowing;
mod stars;
mod storm;
mod sunny;

pub use breathing::BreathingAnimation;
pub use cloudy::CloudyAnimation;
pub use live_weather::{LiveWeatherAnimation, STALE_WEATHER_INDEX, WeatherScene, WeatherSceneKind};
pub use locked::LockedAnimation;
pub use rain::RainAnimation;
pub use rainbow_flow::RainbowFlowAnimation;
pub use snowing::SnowingAnimation;
pub use stars::StarsAnimation;
pub use storm::StormAnimation;
pub use sunny::SunnyAnimation;

use embassy_time::Instant;

use crate::grid::ColorGrid;
use crate::keys::KeyPosition;
use crate::weather::WeatherState;

/// Frame rate most animations run at
pub const DEFAULT_FPS: u8 = 30;

const PROFILE_NAME_RAIN: &str = "rain";
const PROFILE_NAME_STORM: &str = "storm";
const PROFILE_NAME_RAINBOW_FLOW: &str = "rainbow_flow";
const PROFILE_NAME_BREATHING: &str = "breathing";
const PROFILE_NAME_SNOWING: &str = "snowing";
const PROFILE_NAME_STARS: &str = "stars";
const PROFILE_NAME_SUNNY: &str = "sunny";
const PROFILE_NAME_LIVE_WEATHER: &str = "live_weather";

const PROFILE_ID_RAIN: u8 = 0;
const PROFILE_ID_STORM: u8 = 1;
const PROFILE_ID_RAINBOW_FLOW: u8 = 2;
const PROFILE_ID_BREATHING: u8 = 3;
const PROFILE_ID_SNOWING: u8 = 4;
const PROFILE_ID_STARS: u8 = 5;
const PROFILE_ID_SUNNY: u8 = 6;
const PROFILE_ID_LIVE_WEATHER: u8 = 7;

/// Number of selectable profiles
pub const PROFILE_COUNT: usize = 8;

/// Requested animation rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRate {
    /// Fixed frames per second
    Fixed(u8),
    /// Computed by the animation every scheduler pass
    Reactive,
}

/// Read-only view of the engine handed to animation callbacks
#[derive(Debug, Clone, Copy)]
pub struct AnimationContext<'a> {
    pub now: Instant,
    pub weather: &'a WeatherState,
}

pub trait Animation {
    /// Rate the scheduler ticks this animation at
    const FRAME_RATE: FrameRate = FrameRate::Fixed(DEFAULT_FPS);

    /// Prepare for a fresh run. The grid has already been cleared.
    fn init(&mut self, _ctx: &AnimationContext<'_>, _grid: &mut ColorGrid) {}

    /// Render a single frame
    fn tick(&mut self, ctx: &AnimationContext<'_>, grid: &mut ColorGrid);

    /// React to a key press
    fn on_key_press(&mut self, _key: KeyPosition, _grid: &mut ColorGrid) {}

    /// Rate used when `FRAME_RATE` is [`FrameRate::Reactive`]
    fn reactive_fps(&self) -> u8 {
        DEFAULT_FPS
    }
}

/// Known profile ids that can be requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ProfileId {
    Rain = PROFILE_ID_RAIN,
    Storm = PROFILE_ID_STORM,
    RainbowFlow = PROFILE_ID_RAINBOW_FLOW,
    Breathing = PROFILE_ID_BREATHING,
    Snowing = PROFILE_ID_SNOWING,
    Stars = PROFILE_ID_STARS,
    Sunny = PROFILE_ID_SUNNY,
    LiveWeather = PROFILE_ID_LIVE_WEATHER,
}

/// Table order, also the wire index of each profile
pub const PROFILE_TABLE: [ProfileId; PROFILE_COUNT] = [
    ProfileId::Rain,
    ProfileId::Storm,
    ProfileId::RainbowFlow,
    ProfileId::Breathing,
    ProfileId::Snowing,
    ProfileId::Stars,
    ProfileId::Sunny,
    ProfileId::LiveWeather,
];

impl ProfileId {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            PROFILE_ID_RAIN => Self::Rain,
            PROFILE_ID_STORM => Self::Storm,
            PROFILE_ID_RAINBOW_FLOW => Self::RainbowFlow,
            PROFILE_ID_BREATHING => Self::Breathing,
            PROFILE_ID_SNOWING => Self::Snowing,
            PROFILE_ID_STARS => Self::Stars,
            PROFILE_ID_SUNNY => Self::Sunny,
            PROFILE_ID_LIVE_WEATHER => Self::LiveWeather,
            _ => return None,
        })
    }

    pub fn to_slot(self) -> ProfileSlot {
        match self {
            Self::Rain => ProfileSlot::Rain(RainAnimation::new()),
            Self::Storm => ProfileSlot::Storm(StormAnimation::new()),
            Self::RainbowFlow => ProfileSlot::RainbowFlow(RainbowFlowAnimation::new()),
            Self::Breathing => ProfileSlot::Breathing(BreathingAnimation::new()),
            Self::Snowing => ProfileSlot::Snowing(SnowingAnimation::new()),
            Self::Stars => ProfileSlot::Stars(StarsAnimation::new()),
            Self::Sunny => ProfileSlot::Sunny(SunnyAnimation::new()),
            Self::LiveWeather => ProfileSlot::LiveWeather(LiveWeatherAnimation::new()),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rain => PROFILE_NAME_RAIN,
            Self::Storm => PROFILE_NAME_STORM,
            Self::RainbowFlow => PROFILE_NAME_RAINBOW_FLOW,
            Self::Breathing => PROFILE_NAME_BREATHING,
            Self::Snowing => PROFILE_NAME_SNOWING,
            Self::Stars => PROFILE_NAME_STARS,
            Self::Sunny => PROFILE_NAME_SUNNY,
            Self::LiveWeather => PROFILE_NAME_LIVE_WEATHER,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            PROFILE_NAME_RAIN => Some(Self::Rain),
            PROFILE_NAME_STORM => Some(Self::Storm),
            PROFILE_NAME_RAINBOW_FLOW => Some(Self::RainbowFlow),
            PROFILE_NAME_BREATHING => Some(Self::Breathing),
            PROFILE_NAME_SNOWING => Some(Self::Snowing),
            PROFILE_NAME_STARS => Some(Self::Stars),
            PROFILE_NAME_SUNNY => Some(Self::Sunny),
            PROFILE_NAME_LIVE_WEATHER => Some(Self::LiveWeather),
            _ => None,
        }
    }
}

/// Profile slot - enum containing all possible animations
#[derive(Debug, Clone)]
pub enum ProfileSlot {
    Rain(RainAnimation),
    Storm(StormAnimation),
    RainbowFlow(RainbowFlowAnimation),
    Breathing(BreathingAnimation),
    Snowing(SnowingAnimation),
    Stars(StarsAnimation),
    Sunny(SunnyAnimation),
    LiveWeather(LiveWeatherAnimation),
    /// Substituted for the selected profile while the device is locked
    Locked(LockedAnimation),
}

impl ProfileSlot {
    /// Requested rate, as declared by the animation
    pub fn frame_rate(&self) -> FrameRate {
        match self {
            Self::Rain(_) => RainAnimation::FRAME_RATE,
            Self::Storm(_) => StormAnimation::FRAME_RATE,
            Self::RainbowFlow(_) => RainbowFlowAnimation::FRAME_RATE,
            Self::Breathing(_) => BreathingAnimation::FRAME_RATE,
            Self::Snowing(_) => SnowingAnimation::FRAME_RATE,
            Self::Stars(_) => StarsAnimation::FRAME_RATE,
            Self::Sunny(_) => SunnyAnimation::FRAME_RATE,
            Self::LiveWeather(_) => LiveWeatherAnimation::FRAME_RATE,
            Self::Locked(_) => LockedAnimation::FRAME_RATE,
        }
    }

    /// Frames per second for this pass, resolving reactive rates
    pub fn fps(&self) -> u8 {
        match self.frame_rate() {
            FrameRate::Fixed(fps) => fps,
            FrameRate::Reactive => match self {
                Self::LiveWeather(animation) => animation.reactive_fps(),
                _ => DEFAULT_FPS,
            },
        }
    }

    pub fn init(&mut self, ctx: &AnimationContext<'_>, grid: &mut ColorGrid) {
        match self {
            Self::Rain(animation) => animation.init(ctx, grid),
            Self::Storm(animation) => animation.init(ctx, grid),
            Self::RainbowFlow(animation) => animation.init(ctx, grid),
            Self::Breathing(animation) => animation.init(ctx, grid),
            Self::Snowing(animation) => animation.init(ctx, grid),
            Self::Stars(animation) => animation.init(ctx, grid),
            Self::Sunny(animation) => animation.init(ctx, grid),
            Self::LiveWeather(animation) => animation.init(ctx, grid),
            Self::Locked(animation) => animation.init(ctx, grid),
        }
    }

    pub fn tick(&mut self, ctx: &AnimationContext<'_>, grid: &mut ColorGrid) {
        match self {
            Self::Rain(animation) => animation.tick(ctx, grid),
            Self::Storm(animation) => animation.tick(ctx, grid),
            Self::RainbowFlow(animation) => animation.tick(ctx, grid),
            Self::Breathing(animation) => animation.tick(ctx, grid),
            Self::Snowing(animation) => animation.tick(ctx, grid),
            Self::Stars(animation) => animation.tick(ctx, grid),
            Self::Sunny(animation) => animation.tick(ctx, grid),
            Self::LiveWeather(animation) => animation.tick(ctx, grid),
            Self::Locked(animation) => animation.tick(ctx, grid),
        }
    }

    pub fn on_key_press(&mut self, key: KeyPosition, grid: &mut ColorGrid) {
        match self {
            Self::Breathing(animation) => animation.on_key_press(key, grid),
            Self::Rain(_)
            | Self::Storm(_)
            | Self::RainbowFlow(_)
            | Self::Snowing(_)
            | Self::Stars(_)
            | Self::Sunny(_)
            | Self::LiveWeather(_)
            | Self::Locked(_) => {}
        }
    }

    /// Get the profile ID for external observation
    ///
    /// The locked animation has no table entry.
    pub fn id(&self) -> Option<ProfileId> {
        Some(match self {
            Self::Rain(_) => ProfileId::Rain,
            Self::Storm(_) => ProfileId::Storm,
            Self::RainbowFlow(_) => ProfileId::RainbowFlow,
            Self::Breathing(_) => ProfileId::Breathing,
            Self::Snowing(_) => ProfileId::Snowing,
            Self::Stars(_) => ProfileId::Stars,
            Self::Sunny(_) => ProfileId::Sunny,
            Self::LiveWeather(_) => ProfileId::LiveWeather,
            Self::Locked(_) => return None,
        })
    }
}

/// Selectable profiles plus the locked override
#[derive(Debug, Clone)]
pub struct ProfileTable {
    slots: [ProfileSlot; PROFILE_COUNT],
    locked: ProfileSlot,
    current: usize,
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ProfileTable {
    pub fn new(current: usize) -> Self {
        Self {
            slots: PROFILE_TABLE.map(ProfileId::to_slot),
            locked: ProfileSlot::Locked(LockedAnimation::new()),
            current: current % PROFILE_COUNT,
        }
    }

    pub const fn len(&self) -> usize {
        PROFILE_COUNT
    }

    pub const fn is_empty(&self) -> bool {
        PROFILE_COUNT == 0
    }

    /// Index of the selected profile, unaffected by the locked override
    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// Select by index, wrapping modulo the table length
    pub fn select(&mut self, index: usize) {
        self.current = index % PROFILE_COUNT;
    }

    /// Profile that renders right now
    pub fn active(&self, locked: bool) -> &ProfileSlot {
        if locked {
            return &self.locked;
        }
        self.slots.get(self.current).unwrap_or(&self.locked)
    }

    pub fn active_mut(&mut self, locked: bool) -> &mut ProfileSlot {
        if locked {
            return &mut self.locked;
        }
        match self.slots.get_mut(self.current) {
            Some(slot) => slot,
            None => &mut self.locked,
        }
    }
}
