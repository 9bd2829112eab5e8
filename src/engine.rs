use embassy_time::Instant;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::{GREEN, YELLOW};
use crate::compositor::{BLUETOOTH_COLOR, Compositor, IndicatorTimings, Layers, bluetooth_index};
use crate::effect::{BlinkEffect, EffectSlot, OneShotLayer, OverlayLayer, WeaveEffect};
use crate::grid::ColorGrid;
use crate::intake::{Command, Response};
use crate::keys::{KeyPosition, PressedKeys};
use crate::profile::{AnimationContext, ProfileId, ProfileTable};
use crate::scheduler::{BASE_RATE_HZ, FrameClock};
use crate::shared::FrameCell;
use crate::state::{Brightness, DeviceState, IdleTimeouts, PowerPlan};
use crate::weather::{WeatherSnapshot, WeatherState};

/// Configuration for the lighting engine
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Rate `on_tick` is called at
    pub base_rate_hz: u8,
    /// Lighting on at start-up
    pub enabled: bool,
    pub brightness: u8,
    /// Index of the profile selected at start-up
    pub profile: usize,
    pub power_plan: PowerPlan,
    pub indicators: IndicatorTimings,
    pub idle_timeouts: IdleTimeouts,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_rate_hz: BASE_RATE_HZ,
            enabled: true,
            brightness: 100,
            profile: 0,
            power_plan: PowerPlan::default(),
            indicators: IndicatorTimings::default(),
            idle_timeouts: IdleTimeouts::default(),
        }
    }
}

/// Lighting engine - owns every piece of lighting state
pub struct Engine<'a> {
    // External dependencies and configuration
    output: &'a FrameCell,
    idle_timeouts: IdleTimeouts,

    // Internal state
    clock: FrameClock,
    state: DeviceState,
    weather: WeatherState,
    profiles: ProfileTable,
    /// Output of the active profile
    base: ColorGrid,
    one_shot: OneShotLayer,
    overlays: OverlayLayer,
    keys: PressedKeys,

    // Internal dependencies
    compositor: Compositor,
}

impl<'a> Engine<'a> {
    /// Create the engine and run the init of the selected profile
    pub fn new(output: &'a FrameCell, config: &EngineConfig, now: Instant) -> Self {
        let mut engine = Self {
            output,
            idle_timeouts: config.idle_timeouts,
            clock: FrameClock::new(config.base_rate_hz),
            state: DeviceState::new(config.enabled, config.brightness, config.power_plan, now),
            weather: WeatherState::new(),
            profiles: ProfileTable::new(config.profile),
            base: ColorGrid::new(),
            one_shot: OneShotLayer::new(),
            overlays: OverlayLayer::new(),
            keys: PressedKeys::new(),
            compositor: Compositor::new(config.indicators),
        };
        engine.execute_init(now);
        engine
    }

    /// Process one scheduler tick
    ///
    /// Call this at the configured base rate.
    pub fn on_tick(&mut self, now: Instant) {
        self.update_idle(now);

        let ctx = AnimationContext {
            now,
            weather: &self.weather,
        };
        let active = self.profiles.active_mut(self.state.locked);
        if self.state.is_lit() && self.clock.is_due(active.fps()) {
            active.tick(&ctx, &mut self.base);
        }

        self.one_shot.tick(&ctx, &self.clock);
        self.overlays.tick(&ctx, &self.clock);

        self.keys
            .drain(|key| active.on_key_press(key, &mut self.base));

        let layers = Layers {
            base: &self.base,
            one_shot: &self.one_shot,
            overlays: &self.overlays,
        };
        let frame = self.compositor.compose(&self.state, layers, now);
        self.output.publish(frame);

        self.one_shot.retire();
        self.overlays.retire();
        self.clock.advance();
    }

    fn update_idle(&mut self, now: Instant) {
        if self.state.idle {
            return;
        }
        let timeout = self.idle_timeouts.for_plan(self.state.power_plan);
        if now.saturating_duration_since(self.state.last_keypress) >= timeout {
            #[cfg(feature = "esp32-log")]
            println!("[Engine.update_idle] no key presses, blanking");
            self.state.idle = true;
            self.base.clear();
        }
    }

    /// Clear the profile output and run the init of the active profile
    fn execute_init(&mut self, now: Instant) {
        self.base.clear();
        let ctx = AnimationContext {
            now,
            weather: &self.weather,
        };
        self.profiles
            .active_mut(self.state.locked)
            .init(&ctx, &mut self.base);
    }

    /// Apply a decoded host command
    pub fn execute(&mut self, command: Command, now: Instant) -> Response {
        match command {
            Command::ToggleLeds => self.toggle_leds(),
            Command::NextProfile => self.next_profile(now),
            Command::PrevProfile => self.prev_profile(now),
            Command::SetProfile(index) => self.switch_profile(usize::from(index), now),
            Command::GetProfile => return Response::Byte(self.profile_index()),
            Command::GetProfileCount => return Response::Byte(self.profile_count()),
            Command::KeyPressed(key) => self.press_key(key, now),
            Command::CapsLock(on) => self.set_caps(on),
            Command::BluetoothConnecting(stage) => self.set_bluetooth_stage(stage, now),
            Command::BluetoothConnected => self.clear_bluetooth(now),
            Command::BrightnessDown => self.brightness_down(),
            Command::BrightnessUp => self.brightness_up(),
            Command::SetBrightness(brightness) => self.set_brightness(brightness),
            Command::GetBrightness => return Response::Byte(self.brightness()),
            Command::GamingMode(on) => self.set_gaming_mode(on),
            Command::SetLocked(locked) => self.set_locked(locked, now),
            Command::Reset => return Response::Reset,
            Command::PowerPlan(plan) => self.set_power_plan(plan, now),
            Command::UpdateWeather(snapshot) => self.set_weather(snapshot, now),
            Command::ShowTemperature => self.display_temperature(now),
            Command::ShowTime => self.display_time(now),
        }
        Response::None
    }

    pub fn toggle_leds(&mut self) {
        self.set_enabled(!self.state.enabled);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.state.enabled = enabled;
    }

    /// Select a profile by index, wrapping modulo the table length
    pub fn switch_profile(&mut self, index: usize, now: Instant) {
        self.profiles.select(index);
        #[cfg(feature = "esp32-log")]
        println!(
            "[Engine.switch_profile] switching to {:?}",
            self.active_profile()
        );
        self.execute_init(now);
    }

    pub fn next_profile(&mut self, now: Instant) {
        self.switch_profile(self.profiles.current_index() + 1, now);
    }

    pub fn prev_profile(&mut self, now: Instant) {
        let count = self.profiles.len();
        self.switch_profile(self.profiles.current_index() + count - 1, now);
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn profile_index(&self) -> u8 {
        self.profiles.current_index() as u8
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn profile_count(&self) -> u8 {
        self.profiles.len() as u8
    }

    /// Selected profile; unaffected by the locked override
    pub fn active_profile(&self) -> Option<ProfileId> {
        self.profiles.active(false).id()
    }

    /// Key press in the packed wire format
    pub fn key_pressed(&mut self, packed: u8, now: Instant) {
        self.press_key(KeyPosition::from_packed(packed), now);
    }

    /// Record a key press. Wakes the lighting if it went idle.
    pub fn press_key(&mut self, key: KeyPosition, now: Instant) {
        self.state.last_keypress = now;
        if self.state.idle {
            self.execute_init(now);
            self.state.idle = false;
        }

        if self.keys.push(key).is_err() {
            #[cfg(feature = "esp32-log")]
            println!("[Engine.press_key] queue full, dropping {:?}", key);
        }
    }

    pub fn set_caps(&mut self, on: bool) {
        self.state.caps_lock = on;
    }

    /// Show a pairing stage; 0 hides the indicator
    pub fn set_bluetooth_stage(&mut self, stage: u8, now: Instant) {
        self.state.bluetooth_stage = stage;
        self.compositor.restart_bluetooth_blink(now);
    }

    /// Pairing finished: hide the indicator and confirm with a short blink
    pub fn clear_bluetooth(&mut self, now: Instant) {
        let stage = core::mem::take(&mut self.state.bluetooth_stage);
        if stage == 0 {
            return;
        }
        let timings = self.compositor.timings();
        let blink = BlinkEffect::new(
            bluetooth_index(stage),
            BLUETOOTH_COLOR,
            timings.bluetooth_connected_blinks,
            timings.bluetooth_connected_blink,
        );
        self.register_overlay(blink.into(), now).ok();
    }

    pub fn brightness_up(&mut self) {
        self.state.brightness = self.state.brightness.up();
    }

    pub fn brightness_down(&mut self) {
        self.state.brightness = self.state.brightness.down();
    }

    /// Set brightness in percent, clamped to the supported range
    pub fn set_brightness(&mut self, percent: u8) {
        self.state.brightness = Brightness::new(percent);
    }

    pub fn brightness(&self) -> u8 {
        self.state.brightness.percent()
    }

    pub fn set_gaming_mode(&mut self, on: bool) {
        self.state.gaming_mode = on;
    }

    /// Switch the locked override and restart whichever profile is now active
    pub fn set_locked(&mut self, locked: bool, now: Instant) {
        #[cfg(feature = "esp32-log")]
        println!("[Engine.set_locked] locked: {:?}", locked);
        self.state.locked = locked;
        if locked {
            self.compositor.cancel_number();
        }
        self.execute_init(now);
    }

    /// Change the power source; plays a sweep in the colour of the new plan
    pub fn set_power_plan(&mut self, plan: PowerPlan, now: Instant) {
        self.state.power_plan = plan;
        let color = match plan {
            PowerPlan::Usb => GREEN,
            PowerPlan::Battery => YELLOW,
        };
        self.register_one_shot(WeaveEffect::new(color).into(), now);
    }

    /// Store a weather snapshot, restarting the live weather profile if it
    /// is showing
    pub fn set_weather(&mut self, snapshot: WeatherSnapshot, now: Instant) {
        #[cfg(feature = "esp32-log")]
        println!("[Engine.set_weather] {:?}", snapshot);
        self.weather.set(snapshot, now);

        let showing_weather = !self.state.locked
            && self.profiles.active(false).id() == Some(ProfileId::LiveWeather);
        if showing_weather {
            self.execute_init(now);
        }
    }

    /// Blink `value` digit by digit on the number row. Ignored while locked.
    pub fn display_number(&mut self, value: i32, now: Instant) {
        if self.state.locked {
            return;
        }
        self.compositor.show_number(value, now);
    }

    /// Show the current time as HHMM. Ignored without fresh weather data.
    pub fn display_time(&mut self, now: Instant) {
        if let Some(time) = self.weather.current_time(now) {
            let value = i32::from(time.hour) * 100 + i32::from(time.minute);
            self.display_number(value, now);
        }
    }

    /// Show the reported temperature. Ignored without fresh weather data.
    pub fn display_temperature(&mut self, now: Instant) {
        if let Some(snapshot) = self.weather.fresh(now) {
            let value = i32::from(snapshot.temperature);
            self.display_number(value, now);
        }
    }

    /// Start an effect that replaces the whole output, cancelling the
    /// running one
    pub fn register_one_shot(&mut self, effect: EffectSlot, now: Instant) {
        let ctx = AnimationContext {
            now,
            weather: &self.weather,
        };
        self.one_shot.register(effect, &ctx);
    }

    /// Start an overlay effect
    ///
    /// Returns the effect if the overlay list is full.
    pub fn register_overlay(&mut self, effect: EffectSlot, now: Instant) -> Result<(), EffectSlot> {
        let ctx = AnimationContext {
            now,
            weather: &self.weather,
        };
        self.overlays.register(effect, &ctx)
    }

    pub const fn state(&self) -> &DeviceState {
        &self.state
    }

    pub const fn weather(&self) -> &WeatherState {
        &self.weather
    }

    pub const fn profiles(&self) -> &ProfileTable {
        &self.profiles
    }

    /// Output of the active profile
    pub const fn base(&self) -> &ColorGrid {
        &self.base
    }

    /// Frame produced by the last tick
    pub const fn frame(&self) -> &ColorGrid {
        self.compositor.frame()
    }

    pub const fn one_shot(&self) -> &OneShotLayer {
        &self.one_shot
    }

    pub const fn overlays(&self) -> &OverlayLayer {
        &self.overlays
    }

    pub const fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub const fn pressed_keys(&self) -> &PressedKeys {
        &self.keys
    }

    pub const fn clock(&self) -> &FrameClock {
        &self.clock
    }
}
