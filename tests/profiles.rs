mod tests {
    use embassy_time::Instant;
    use keylight_composer::color::{BLACK, YELLOW, is_background, scale_percent};
    use keylight_composer::grid::{COLUMNS, ColorGrid, ROWS};
    use keylight_composer::keys::KeyPosition;
    use keylight_composer::profile::{
        Animation, AnimationContext, BreathingAnimation, CloudyAnimation, FrameRate,
        LiveWeatherAnimation, LockedAnimation, PROFILE_COUNT, ProfileId, ProfileSlot,
        ProfileTable, RainAnimation, STALE_WEATHER_INDEX, SnowingAnimation, StarsAnimation,
        SunnyAnimation, WeatherSceneKind,
    };
    use keylight_composer::weather::{ClockTime, WeatherSnapshot, WeatherState};

    const RAIN_COLOR: keylight_composer::Rgb = keylight_composer::Rgb {
        r: 30,
        g: 30,
        b: 255,
    };

    fn ctx(weather: &WeatherState, millis: u64) -> AnimationContext<'_> {
        AnimationContext {
            now: Instant::from_millis(millis),
            weather,
        }
    }

    fn snapshot(hour: u8) -> WeatherSnapshot {
        WeatherSnapshot {
            time: ClockTime::new(hour, 0, 0),
            sunrise: ClockTime::new(6, 0, 0),
            sunset: ClockTime::new(20, 0, 0),
            ..WeatherSnapshot::default()
        }
    }

    #[test]
    fn test_profile_id_round_trip() {
        for (index, id) in [
            ProfileId::Rain,
            ProfileId::Storm,
            ProfileId::RainbowFlow,
            ProfileId::Breathing,
            ProfileId::Snowing,
            ProfileId::Stars,
            ProfileId::Sunny,
            ProfileId::LiveWeather,
        ]
        .into_iter()
        .enumerate()
        {
            assert_eq!(ProfileId::from_raw(index as u8), Some(id));
            assert_eq!(ProfileId::parse_from_str(id.as_str()), Some(id));
            assert_eq!(id.to_slot().id(), Some(id));
        }
        assert_eq!(ProfileId::from_raw(8), None);
        assert_eq!(ProfileId::parse_from_str("aurora"), None);
    }

    #[test]
    fn test_table_selection_wraps() {
        let mut table = ProfileTable::new(2);
        assert_eq!(table.len(), PROFILE_COUNT);
        table.select(9);
        assert_eq!(table.current_index(), 1);
        assert_eq!(table.active(false).id(), Some(ProfileId::Storm));
        assert_eq!(ProfileTable::new(8).current_index(), 0);
    }

    #[test]
    fn test_locked_override_keeps_selection() {
        let table = ProfileTable::new(3);
        assert!(matches!(table.active(true), ProfileSlot::Locked(_)));
        assert_eq!(table.active(true).id(), None);
        assert_eq!(table.current_index(), 3);
    }

    #[test]
    fn test_frame_rates() {
        assert_eq!(ProfileId::Stars.to_slot().fps(), 6);
        assert_eq!(ProfileId::Rain.to_slot().fps(), 30);
        assert_eq!(
            ProfileId::LiveWeather.to_slot().frame_rate(),
            FrameRate::Reactive
        );
        assert_eq!(ProfileId::LiveWeather.to_slot().fps(), 30);
    }

    #[test]
    fn test_locked_pulses() {
        let weather = WeatherState::new();
        let mut grid = ColorGrid::new();
        let mut locked = LockedAnimation::new();
        locked.init(&ctx(&weather, 0), &mut grid);

        locked.tick(&ctx(&weather, 0), &mut grid);
        assert_eq!(locked.intensity(), 2);
        assert_eq!(grid.get(0, 0), keylight_composer::Rgb { r: 5, g: 0, b: 0 });

        for _ in 0..49 {
            locked.tick(&ctx(&weather, 0), &mut grid);
        }
        assert_eq!(locked.intensity(), 100);
        locked.tick(&ctx(&weather, 0), &mut grid);
        assert_eq!(locked.intensity(), 99);
    }

    #[test]
    fn test_sunny_rays() {
        let weather = WeatherState::new();
        let mut grid = ColorGrid::new();
        let mut sunny = SunnyAnimation::new();
        sunny.tick(&ctx(&weather, 0), &mut grid);

        assert_eq!(grid[0], YELLOW);
        // Angle 0 sits between two rays
        assert_eq!(grid[1], YELLOW);
        // Angle 90 is half way into a ray
        assert_eq!(grid[14], scale_percent(YELLOW, 50));
    }

    #[test]
    fn test_stars_stay_in_place() {
        let weather = WeatherState::new();
        let mut grid = ColorGrid::new();
        let mut stars = StarsAnimation::new();
        stars.tick(&ctx(&weather, 0), &mut grid);

        assert!(!is_background(grid.get(1, 0)));
        assert!(!is_background(grid.get(3, 3)));
        assert_eq!(grid.get(0, 0), BLACK);
        assert_eq!(grid.iter().filter(|led| !is_background(**led)).count(), 9);
    }

    #[test]
    fn test_rain_drop_falls() {
        let weather = WeatherState::new();
        let mut grid = ColorGrid::new();
        let mut rain = RainAnimation::new();
        rain.init(&ctx(&weather, 0), &mut grid);

        rain.tick(&ctx(&weather, 0), &mut grid);
        assert_eq!(rain.drop_count(), 1);

        rain.tick(&ctx(&weather, 100), &mut grid);
        assert!((0..COLUMNS).any(|column| grid.get(column, 1) == RAIN_COLOR));
    }

    #[test]
    fn test_rain_buffer_is_bounded() {
        let weather = WeatherState::new();
        let mut grid = ColorGrid::new();
        let mut rain = RainAnimation::new();
        rain.init(&ctx(&weather, 0), &mut grid);
        rain.set_intensity(100);
        for step in 0..200 {
            rain.tick(&ctx(&weather, 1_000 + step * 50), &mut grid);
        }
        assert!(rain.drop_count() <= 40);
    }

    #[test]
    fn test_snow_buffer_is_bounded() {
        let weather = WeatherState::new();
        let mut grid = ColorGrid::new();
        let mut snow = SnowingAnimation::new();
        snow.init(&ctx(&weather, 0), &mut grid);
        snow.set_intensity(100);
        for _ in 0..1_000 {
            snow.tick(&ctx(&weather, 0), &mut grid);
            assert!(snow.flake_count() <= 30);
        }
    }

    #[test]
    fn test_breathing_tap_fades_out() {
        let weather = WeatherState::new();
        let mut grid = ColorGrid::new();
        let mut breathing = BreathingAnimation::new();
        breathing.init(&ctx(&weather, 0), &mut grid);

        breathing.on_key_press(KeyPosition::new(2, 1), &mut grid);
        assert_eq!(breathing.active_taps(), 1);

        breathing.tick(&ctx(&weather, 0), &mut grid);
        assert!(!is_background(grid.get(2, 1)));

        for _ in 0..11 {
            breathing.tick(&ctx(&weather, 0), &mut grid);
        }
        assert_eq!(breathing.active_taps(), 1);
        breathing.tick(&ctx(&weather, 0), &mut grid);
        assert_eq!(breathing.active_taps(), 0);
    }

    #[test]
    fn test_cloud_rows() {
        let mut cloudy = CloudyAnimation::new();
        assert_eq!(cloudy.cloud_rows(), ROWS);
        cloudy.set_density(50);
        assert_eq!(cloudy.cloud_rows(), 3);
        cloudy.set_density(0);
        assert_eq!(cloudy.cloud_rows(), 0);
    }

    #[test]
    fn test_clear_sky_shows_the_sun() {
        let weather = WeatherState::new();
        let mut grid = ColorGrid::new();
        let mut cloudy = CloudyAnimation::new();
        cloudy.set_density(0);
        cloudy.tick(&ctx(&weather, 0), &mut grid);
        assert_eq!(grid[0], YELLOW);
    }

    #[test]
    fn test_weather_scene_priority() {
        let mut weather = snapshot(12);
        assert_eq!(WeatherSceneKind::for_snapshot(&weather), WeatherSceneKind::Day);
        weather.time = ClockTime::new(22, 0, 0);
        assert_eq!(WeatherSceneKind::for_snapshot(&weather), WeatherSceneKind::Night);
        weather.rain_intensity = 40;
        assert_eq!(WeatherSceneKind::for_snapshot(&weather), WeatherSceneKind::Rain);
        weather.storm_intensity = 40;
        assert_eq!(WeatherSceneKind::for_snapshot(&weather), WeatherSceneKind::Storm);
        weather.snow_intensity = 40;
        assert_eq!(WeatherSceneKind::for_snapshot(&weather), WeatherSceneKind::Snow);
    }

    #[test]
    fn test_live_weather_scene_and_rate() {
        let mut weather = WeatherState::new();
        weather.set(snapshot(22), Instant::from_millis(0));
        let mut grid = ColorGrid::new();
        let mut live = LiveWeatherAnimation::new();

        live.init(&ctx(&weather, 0), &mut grid);
        assert_eq!(
            live.scene().map(|scene| scene.kind()),
            Some(WeatherSceneKind::Night)
        );
        assert_eq!(live.reactive_fps(), 6);

        weather.set(snapshot(12), Instant::from_millis(1_000));
        live.init(&ctx(&weather, 1_000), &mut grid);
        assert_eq!(
            live.scene().map(|scene| scene.kind()),
            Some(WeatherSceneKind::Day)
        );
        assert_eq!(live.reactive_fps(), 30);
    }

    #[test]
    fn test_live_weather_fallback_when_stale() {
        let mut weather = WeatherState::new();
        weather.set(snapshot(12), Instant::from_millis(0));
        let mut grid = ColorGrid::new();
        let mut live = LiveWeatherAnimation::new();
        live.init(&ctx(&weather, 0), &mut grid);

        live.tick(&ctx(&weather, 651_000), &mut grid);
        assert_eq!(grid[STALE_WEATHER_INDEX], YELLOW);
        assert_eq!(grid.iter().filter(|led| !is_background(**led)).count(), 1);
    }

    #[test]
    fn test_live_weather_without_data() {
        let weather = WeatherState::new();
        let mut grid = ColorGrid::new();
        let mut live = LiveWeatherAnimation::new();
        live.init(&ctx(&weather, 0), &mut grid);
        assert!(live.scene().is_none());

        live.tick(&ctx(&weather, 0), &mut grid);
        assert_eq!(grid[STALE_WEATHER_INDEX], YELLOW);
    }
}
