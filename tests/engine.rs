mod tests {
    use embassy_time::{Duration, Instant};
    use keylight_composer::color::{BLACK, BLUE, GREEN, RED, YELLOW, is_background, scale_percent};
    use keylight_composer::compositor::{
        BLUETOOTH_COLOR, CAPS_LOCK_COLOR, CAPS_LOCK_INDEX, DIGIT_COLOR, DigitToken,
        GAMING_ARROW_COLOR, GAMING_ARROW_INDICES, IndicatorTimings, MINUS_INDEX, bluetooth_index,
    };
    use keylight_composer::effect::{BlinkEffect, EffectSlot};
    use keylight_composer::grid::ColorGrid;
    use keylight_composer::keys::KeyPosition;
    use keylight_composer::profile::{
        ProfileId, ProfileSlot, STALE_WEATHER_INDEX, WeatherSceneKind,
    };
    use keylight_composer::weather::{ClockTime, WeatherSnapshot};
    use keylight_composer::{Engine, EngineConfig, FrameCell, PowerPlan, Rgb, WeaveEffect};

    const SUNNY: usize = 6;
    const BREATHING: usize = 3;
    const LIVE_WEATHER: usize = 7;

    fn at(millis: u64) -> Instant {
        Instant::from_millis(millis)
    }

    fn engine_with(frame: &FrameCell, profile: usize) -> Engine<'_> {
        let config = EngineConfig {
            profile,
            ..EngineConfig::default()
        };
        Engine::new(frame, &config, at(0))
    }

    fn is_dark(grid: &ColorGrid) -> bool {
        grid.iter().all(|led| is_background(*led))
    }

    fn weather(hour: u8, minute: u8) -> WeatherSnapshot {
        WeatherSnapshot {
            time: ClockTime::new(hour, minute, 0),
            sunrise: ClockTime::new(6, 0, 0),
            sunset: ClockTime::new(20, 0, 0),
            temperature: -7,
            ..WeatherSnapshot::default()
        }
    }

    #[test]
    fn test_switch_profile_wraps() {
        let frame = FrameCell::new();
        let mut engine = engine_with(&frame, 2);
        engine.switch_profile(9, at(0));
        assert_eq!(engine.profile_index(), 1);
        assert_eq!(engine.profile_count(), 8);

        engine.switch_profile(0, at(0));
        engine.prev_profile(at(0));
        assert_eq!(engine.profile_index(), 7);
        engine.next_profile(at(0));
        assert_eq!(engine.profile_index(), 0);
    }

    #[test]
    fn test_switch_profile_clears_base() {
        let frame = FrameCell::new();
        let mut engine = engine_with(&frame, SUNNY);
        engine.on_tick(at(0));
        assert_ne!(engine.base(), &ColorGrid::new());

        engine.switch_profile(BREATHING, at(10));
        assert_eq!(engine.base(), &ColorGrid::new());
        assert_eq!(engine.active_profile(), Some(ProfileId::Breathing));
    }

    #[test]
    fn test_brightness_is_clamped() {
        let frame = FrameCell::new();
        let mut engine = engine_with(&frame, 0);
        engine.set_brightness(0);
        assert_eq!(engine.brightness(), 10);
        engine.set_brightness(250);
        assert_eq!(engine.brightness(), 100);

        engine.brightness_up();
        assert_eq!(engine.brightness(), 100);
        for _ in 0..10 {
            engine.brightness_down();
        }
        assert_eq!(engine.brightness(), 10);
        engine.brightness_up();
        assert_eq!(engine.brightness(), 30);
    }

    #[test]
    fn test_brightness_scales_output() {
        let frame = FrameCell::new();
        let mut engine = engine_with(&frame, SUNNY);
        engine.set_brightness(50);
        engine.on_tick(at(0));

        assert_eq!(engine.frame()[0], scale_percent(YELLOW, 50));
        assert_eq!(frame.snapshot(), *engine.frame());
    }

    #[test]
    fn test_disabled_output_is_off() {
        let frame = FrameCell::new();
        let mut engine = engine_with(&frame, SUNNY);
        engine.toggle_leds();
        engine.on_tick(at(0));
        assert_eq!(engine.frame(), &ColorGrid::new());

        engine.toggle_leds();
        engine.on_tick(at(17));
        engine.on_tick(at(33));
        assert_eq!(engine.frame()[0], YELLOW);
    }

    #[test]
    fn test_status_indicators() {
        let frame = FrameCell::new();
        let mut engine = engine_with(&frame, SUNNY);
        engine.set_brightness(10);
        engine.set_caps(true);
        engine.set_gaming_mode(true);
        engine.on_tick(at(0));

        // Indicators are not dimmed
        assert_eq!(engine.frame()[CAPS_LOCK_INDEX], CAPS_LOCK_COLOR);
        for index in GAMING_ARROW_INDICES {
            assert_eq!(engine.frame()[index], GAMING_ARROW_COLOR);
        }
    }

    #[test]
    fn test_locked_skips_post_processing() {
        let frame = FrameCell::new();
        let mut engine = engine_with(&frame, SUNNY);
        engine.set_caps(true);
        engine.set_brightness(50);
        engine.set_locked(true, at(0));
        engine.on_tick(at(0));

        let locked = Rgb { r: 5, g: 0, b: 0 };
        assert_eq!(engine.frame()[CAPS_LOCK_INDEX], locked);
        assert_eq!(engine.frame()[0], locked);
        assert_eq!(engine.profile_index(), SUNNY as u8);

        engine.set_locked(false, at(10));
        assert_eq!(engine.base(), &ColorGrid::new());
        engine.on_tick(at(17));
        assert_eq!(engine.frame()[CAPS_LOCK_INDEX], CAPS_LOCK_COLOR);
    }

    #[test]
    fn test_number_is_not_shown_while_locked() {
        let frame = FrameCell::new();
        let mut engine = engine_with(&frame, SUNNY);
        engine.display_number(42, at(0));
        assert!(engine.compositor().numeric().is_armed());

        engine.set_locked(true, at(0));
        assert!(!engine.compositor().numeric().is_armed());
        engine.on_tick(at(0));
        engine.display_number(5, at(10));
        assert!(!engine.compositor().numeric().is_armed());

        for tick in 1..120 {
            engine.on_tick(at(tick * 17));
        }
        assert!(!is_dark(engine.frame()));

        engine.set_locked(false, at(2_100));
        engine.on_tick(at(2_117));
        assert_eq!(engine.frame()[0], YELLOW);
    }

    #[test]
    fn test_one_shot_hides_indicators() {
        let frame = FrameCell::new();
        let mut engine = engine_with(&frame, SUNNY);
        engine.set_caps(true);
        engine.set_gaming_mode(true);
        engine.set_brightness(50);
        engine.set_power_plan(PowerPlan::Battery, at(0));
        engine.on_tick(at(0));

        assert!(engine.one_shot().is_active());
        // Row 2 starts on the left, so the sweep covers the caps lock LED
        assert_eq!(engine.frame()[CAPS_LOCK_INDEX], YELLOW);
        for index in GAMING_ARROW_INDICES {
            assert_ne!(engine.frame()[index], GAMING_ARROW_COLOR);
        }
        assert_eq!(engine.frame().get(2, 2), BLACK);
    }

    #[test]
    fn test_pressed_keys_queue() {
        let frame = FrameCell::new();
        let mut engine = engine_with(&frame, 0);
        for column in 0..36u8 {
            engine.press_key(KeyPosition::new(column % 14, column / 14), at(0));
        }
        let keys = engine.pressed_keys();
        assert_eq!(keys.len(), 35);
        assert_eq!(keys.as_slice()[0], KeyPosition::new(0, 0));
        assert_eq!(keys.as_slice()[34], KeyPosition::new(6, 2));

        engine.on_tick(at(0));
        assert!(engine.pressed_keys().is_empty());
    }

    #[test]
    fn test_key_press_reaches_profile() {
        let frame = FrameCell::new();
        let mut engine = engine_with(&frame, BREATHING);
        engine.key_pressed(0x21, at(0));

        engine.on_tick(at(0));
        engine.on_tick(at(17));
        engine.on_tick(at(33));
        assert_ne!(engine.base().get(2, 1), BLACK);
    }

    #[test]
    fn test_idle_timeout_and_wake() {
        let frame = FrameCell::new();
        let mut engine = engine_with(&frame, SUNNY);
        engine.on_tick(at(0));
        assert!(!engine.state().idle);

        engine.on_tick(at(1_200_000));
        assert!(engine.state().idle);
        assert_eq!(engine.base(), &ColorGrid::new());
        assert_eq!(engine.frame(), &ColorGrid::new());

        engine.press_key(KeyPosition::new(0, 0), at(1_200_100));
        assert!(!engine.state().idle);
    }

    #[test]
    fn test_battery_idle_timeout() {
        let frame = FrameCell::new();
        let mut engine = engine_with(&frame, SUNNY);
        engine.set_power_plan(PowerPlan::Battery, at(0));
        engine.on_tick(at(179_000));
        assert!(!engine.state().idle);
        engine.on_tick(at(180_000));
        assert!(engine.state().idle);
    }

    #[test]
    fn test_power_plan_plays_weave() {
        let frame = FrameCell::new();
        let mut engine = engine_with(&frame, SUNNY);
        engine.set_power_plan(PowerPlan::Usb, at(0));
        engine.on_tick(at(0));

        assert!(engine.one_shot().is_active());
        assert_eq!(engine.frame().get(0, 0), GREEN);
        assert_eq!(engine.frame().get(1, 0), BLACK);

        for tick in 1..200 {
            engine.on_tick(at(tick * 17));
        }
        assert!(!engine.one_shot().is_active());
        assert_eq!(engine.frame()[0], YELLOW);
    }

    #[test]
    fn test_one_shot_cancels_previous() {
        let frame = FrameCell::new();
        let mut engine = engine_with(&frame, SUNNY);
        engine.register_one_shot(WeaveEffect::new(GREEN).into(), at(0));
        engine.on_tick(at(0));
        engine.register_one_shot(WeaveEffect::new(BLUE).into(), at(17));
        engine.on_tick(at(17));
        engine.on_tick(at(33));

        assert_eq!(engine.frame().get(0, 0), BLUE);
        assert_eq!(engine.frame().get(13, 1), BLUE);
    }

    #[test]
    fn test_overlay_paints_over_profile() {
        let frame = FrameCell::new();
        let mut engine = engine_with(&frame, SUNNY);
        let blink = BlinkEffect::new(5, RED, 2, Duration::from_millis(100));
        engine.register_overlay(blink.into(), at(0)).unwrap();
        engine.on_tick(at(0));

        assert_eq!(engine.frame()[5], RED);
        assert_eq!(engine.frame()[0], YELLOW);
    }

    #[test]
    fn test_overlay_list_is_bounded() {
        let frame = FrameCell::new();
        let mut engine = engine_with(&frame, 0);
        for index in 0..10 {
            let blink = BlinkEffect::new(index, RED, 2, Duration::from_millis(100));
            assert!(engine.register_overlay(blink.into(), at(0)).is_ok());
        }
        let blink = BlinkEffect::new(10, RED, 2, Duration::from_millis(100));
        assert!(matches!(
            engine.register_overlay(blink.into(), at(0)),
            Err(EffectSlot::Blink(_))
        ));
        assert_eq!(engine.overlays().len(), 10);
    }

    #[test]
    fn test_bluetooth_rates() {
        let timings = IndicatorTimings::default();
        assert_eq!(timings.bluetooth_rate(4), Duration::from_millis(500));
        assert_eq!(timings.bluetooth_rate(5), Duration::from_millis(250));
        assert_eq!(bluetooth_index(1), 1);
        assert_eq!(bluetooth_index(4), 4);
        assert_eq!(bluetooth_index(5), 1);
        assert_eq!(bluetooth_index(8), 4);
    }

    #[test]
    fn test_bluetooth_broadcasting_blinks_faster() {
        let frame = FrameCell::new();
        let mut engine = engine_with(&frame, 0);
        engine.toggle_leds();
        engine.set_bluetooth_stage(5, at(0));

        engine.on_tick(at(0));
        assert_eq!(engine.frame()[1], BLUETOOTH_COLOR);
        engine.on_tick(at(200));
        assert_eq!(engine.frame()[1], BLUETOOTH_COLOR);
        engine.on_tick(at(260));
        assert_eq!(engine.frame()[1], BLACK);
    }

    #[test]
    fn test_bluetooth_connecting_blinks_slower() {
        let frame = FrameCell::new();
        let mut engine = engine_with(&frame, 0);
        engine.toggle_leds();
        engine.set_bluetooth_stage(4, at(0));

        engine.on_tick(at(260));
        assert_eq!(engine.frame()[4], BLUETOOTH_COLOR);
        engine.on_tick(at(510));
        assert_eq!(engine.frame()[4], BLACK);
    }

    #[test]
    fn test_bluetooth_connected_confirms() {
        let frame = FrameCell::new();
        let mut engine = engine_with(&frame, 0);
        engine.toggle_leds();
        engine.set_bluetooth_stage(3, at(0));
        engine.clear_bluetooth(at(100));

        assert_eq!(engine.state().bluetooth_stage, 0);
        assert_eq!(engine.overlays().len(), 1);
        engine.on_tick(at(100));
        assert_eq!(engine.frame()[3], BLUETOOTH_COLOR);

        engine.clear_bluetooth(at(110));
        assert_eq!(engine.overlays().len(), 1);
    }

    #[test]
    fn test_display_negative_number() {
        let frame = FrameCell::new();
        let mut engine = engine_with(&frame, SUNNY);
        engine.display_number(-7, at(0));
        assert_eq!(
            engine.compositor().numeric().tokens(),
            &[DigitToken::Digit(7), DigitToken::Minus]
        );

        engine.on_tick(at(0));
        assert_eq!(engine.frame()[7], DIGIT_COLOR);
        // The profile is hidden while the number is shown
        assert_eq!(engine.frame()[0], BLACK);

        engine.on_tick(at(350));
        assert!(is_dark(engine.frame()));

        engine.on_tick(at(700));
        assert_eq!(engine.frame()[MINUS_INDEX], DIGIT_COLOR);
        assert_eq!(engine.frame()[7], BLACK);

        engine.on_tick(at(1_050));
        assert!(!engine.compositor().numeric().is_armed());

        engine.on_tick(at(1_067));
        assert_eq!(engine.frame()[0], YELLOW);
    }

    #[test]
    fn test_digit_playback_order() {
        let frame = FrameCell::new();
        let mut engine = engine_with(&frame, 0);
        engine.display_number(-42, at(0));
        let numeric = engine.compositor().numeric();

        assert_eq!(numeric.token_at(0), Some(DigitToken::Digit(4)));
        assert_eq!(numeric.token_at(1), Some(DigitToken::Digit(2)));
        assert_eq!(numeric.token_at(2), Some(DigitToken::Minus));
        assert_eq!(numeric.token_at(3), None);
    }

    #[test]
    fn test_digit_positions() {
        assert_eq!(DigitToken::Digit(1).led_index(), 1);
        assert_eq!(DigitToken::Digit(9).led_index(), 9);
        assert_eq!(DigitToken::Digit(0).led_index(), 10);
        assert_eq!(DigitToken::Minus.led_index(), 11);
        assert_eq!(DigitToken::Digit(12).led_index(), 0);
    }

    #[test]
    fn test_display_time_and_temperature() {
        let frame = FrameCell::new();
        let mut engine = engine_with(&frame, 0);
        engine.display_time(at(0));
        assert!(!engine.compositor().numeric().is_armed());

        engine.set_weather(weather(12, 34), at(0));
        engine.display_time(at(60_000));
        assert_eq!(
            engine.compositor().numeric().tokens(),
            &[
                DigitToken::Digit(5),
                DigitToken::Digit(3),
                DigitToken::Digit(2),
                DigitToken::Digit(1)
            ]
        );

        engine.display_temperature(at(61_000));
        assert_eq!(
            engine.compositor().numeric().tokens(),
            &[DigitToken::Digit(7), DigitToken::Minus]
        );
    }

    #[test]
    fn test_stale_weather_is_not_displayed() {
        let frame = FrameCell::new();
        let mut engine = engine_with(&frame, 0);
        engine.set_weather(weather(12, 34), at(0));
        engine.display_temperature(at(650_000));
        assert!(!engine.compositor().numeric().is_armed());
    }

    #[test]
    fn test_weather_update_restarts_live_profile() {
        let frame = FrameCell::new();
        let mut engine = engine_with(&frame, LIVE_WEATHER);
        let mut snapshot = weather(12, 0);
        snapshot.rain_intensity = 60;
        engine.set_weather(snapshot, at(0));

        let ProfileSlot::LiveWeather(live) = engine.profiles().active(false) else {
            panic!("live weather profile expected");
        };
        assert_eq!(
            live.scene().map(|scene| scene.kind()),
            Some(WeatherSceneKind::Rain)
        );

        engine.on_tick(at(651_000));
        assert_eq!(engine.base()[STALE_WEATHER_INDEX], YELLOW);
    }
}
