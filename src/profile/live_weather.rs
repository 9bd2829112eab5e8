//! Profile that mirrors the weather snapshot pushed by the host.
//!
//! The scene is picked on init from the latest snapshot. Switching to a
//! different scene starts it fresh, re-picking the same one keeps its
//! particles and only refreshes the intensities.

use super::stars::STARS_FPS;
use super::{
    Animation, AnimationContext, CloudyAnimation, DEFAULT_FPS, FrameRate, RainAnimation,
    SnowingAnimation, StarsAnimation, StormAnimation,
};
use crate::color::YELLOW;
use crate::grid::ColorGrid;
use crate::weather::WeatherSnapshot;

/// LED lit while no fresh snapshot is available
pub const STALE_WEATHER_INDEX: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherSceneKind {
    Snow,
    Storm,
    Rain,
    Night,
    Day,
}

impl WeatherSceneKind {
    /// Highest priority condition wins: snow, storm, rain, then time of day
    pub const fn for_snapshot(snapshot: &WeatherSnapshot) -> Self {
        if snapshot.snow_intensity > 0 {
            Self::Snow
        } else if snapshot.storm_intensity > 0 {
            Self::Storm
        } else if snapshot.rain_intensity > 0 {
            Self::Rain
        } else if snapshot.is_daytime() {
            Self::Day
        } else {
            Self::Night
        }
    }
}

#[derive(Debug, Clone)]
pub enum WeatherScene {
    Snow(SnowingAnimation),
    Storm(StormAnimation),
    Rain(RainAnimation),
    Night(StarsAnimation),
    Day(CloudyAnimation),
}

impl WeatherScene {
    fn new(kind: WeatherSceneKind) -> Self {
        match kind {
            WeatherSceneKind::Snow => Self::Snow(SnowingAnimation::new()),
            WeatherSceneKind::Storm => Self::Storm(StormAnimation::new()),
            WeatherSceneKind::Rain => Self::Rain(RainAnimation::new()),
            WeatherSceneKind::Night => Self::Night(StarsAnimation::new()),
            WeatherSceneKind::Day => Self::Day(CloudyAnimation::new()),
        }
    }

    pub const fn kind(&self) -> WeatherSceneKind {
        match self {
            Self::Snow(_) => WeatherSceneKind::Snow,
            Self::Storm(_) => WeatherSceneKind::Storm,
            Self::Rain(_) => WeatherSceneKind::Rain,
            Self::Night(_) => WeatherSceneKind::Night,
            Self::Day(_) => WeatherSceneKind::Day,
        }
    }

    const fn fps(&self) -> u8 {
        match self {
            Self::Night(_) => STARS_FPS,
            _ => DEFAULT_FPS,
        }
    }

    fn init(&mut self, ctx: &AnimationContext<'_>, grid: &mut ColorGrid) {
        match self {
            Self::Snow(animation) => animation.init(ctx, grid),
            Self::Storm(animation) => animation.init(ctx, grid),
            Self::Rain(animation) => animation.init(ctx, grid),
            Self::Night(animation) => animation.init(ctx, grid),
            Self::Day(animation) => animation.init(ctx, grid),
        }
    }

    fn tick(&mut self, ctx: &AnimationContext<'_>, grid: &mut ColorGrid) {
        match self {
            Self::Snow(animation) => animation.tick(ctx, grid),
            Self::Storm(animation) => animation.tick(ctx, grid),
            Self::Rain(animation) => animation.tick(ctx, grid),
            Self::Night(animation) => animation.tick(ctx, grid),
            Self::Day(animation) => animation.tick(ctx, grid),
        }
    }

    fn apply_intensities(&mut self, snapshot: &WeatherSnapshot) {
        match self {
            Self::Snow(animation) => animation.set_intensity(snapshot.snow_intensity),
            Self::Storm(animation) => {
                animation.set_intensity(snapshot.storm_intensity);
                animation.set_rain_intensity(snapshot.rain_intensity);
            }
            Self::Rain(animation) => animation.set_intensity(snapshot.rain_intensity),
            Self::Night(_) => {}
            Self::Day(animation) => animation.set_density(snapshot.cloud_density),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LiveWeatherAnimation {
    scene: Option<WeatherScene>,
}

impl LiveWeatherAnimation {
    pub const fn new() -> Self {
        Self { scene: None }
    }

    pub fn scene(&self) -> Option<&WeatherScene> {
        self.scene.as_ref()
    }
}

impl Animation for LiveWeatherAnimation {
    const FRAME_RATE: FrameRate = FrameRate::Reactive;

    fn init(&mut self, ctx: &AnimationContext<'_>, grid: &mut ColorGrid) {
        let Some(snapshot) = ctx.weather.snapshot() else {
            return;
        };
        let kind = WeatherSceneKind::for_snapshot(snapshot);

        if self.scene.as_ref().map(WeatherScene::kind) != Some(kind) {
            self.scene
                .insert(WeatherScene::new(kind))
                .init(ctx, grid);
        }
        if let Some(scene) = &mut self.scene {
            scene.apply_intensities(snapshot);
        }
    }

    fn tick(&mut self, ctx: &AnimationContext<'_>, grid: &mut ColorGrid) {
        match (&mut self.scene, ctx.weather.is_fresh(ctx.now)) {
            (Some(scene), true) => scene.tick(ctx, grid),
            _ => {
                grid.clear();
                grid.set_index(STALE_WEATHER_INDEX, YELLOW);
            }
        }
    }

    fn reactive_fps(&self) -> u8 {
        self.scene.as_ref().map_or(DEFAULT_FPS, WeatherScene::fps)
    }
}
