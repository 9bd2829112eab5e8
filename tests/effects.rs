mod tests {
    use embassy_time::{Duration, Instant};
    use keylight_composer::color::{BLACK, BLUE, GREEN, RED, is_background, scale_percent};
    use keylight_composer::effect::{
        BlinkEffect, Effect, EffectSlot, OneShotLayer, OverlayLayer, WeaveEffect,
    };
    use keylight_composer::grid::{COLUMNS, ColorGrid};
    use keylight_composer::profile::AnimationContext;
    use keylight_composer::scheduler::FrameClock;
    use keylight_composer::weather::WeatherState;

    fn ctx(weather: &WeatherState, millis: u64) -> AnimationContext<'_> {
        AnimationContext {
            now: Instant::from_millis(millis),
            weather,
        }
    }

    fn blink(index: usize, count: u8) -> EffectSlot {
        BlinkEffect::new(index, RED, count, Duration::from_millis(100)).into()
    }

    #[test]
    fn test_weave_sweeps_and_finishes() {
        let weather = WeatherState::new();
        let mut grid = ColorGrid::new();
        let mut weave = WeaveEffect::new(GREEN);
        weave.init(&ctx(&weather, 0), &mut grid);

        assert!(weave.tick(&ctx(&weather, 0), &mut grid));
        assert_eq!(grid.get(0, 0), GREEN);
        assert_eq!(grid.get(COLUMNS - 1, 1), GREEN);
        assert_eq!(grid.get(1, 0), BLACK);

        assert!(weave.tick(&ctx(&weather, 0), &mut grid));
        assert_eq!(grid.get(1, 0), GREEN);
        assert_eq!(grid.get(0, 0), scale_percent(GREEN, 80));
        assert_eq!(grid.get(2, 0), BLACK);

        let mut ticks = 2;
        while weave.tick(&ctx(&weather, 0), &mut grid) {
            ticks += 1;
        }
        assert_eq!(ticks, COLUMNS + 4);
        // The closing frame has nothing left on it
        assert!(grid.iter().all(|led| is_background(*led)));
    }

    #[test]
    fn test_blink_counts_down() {
        let weather = WeatherState::new();
        let mut grid = ColorGrid::new();
        let mut effect = BlinkEffect::new(5, RED, 2, Duration::from_millis(100));
        effect.init(&ctx(&weather, 0), &mut grid);
        assert_eq!(grid[5], RED);

        assert!(effect.tick(&ctx(&weather, 50), &mut grid));
        assert!(effect.tick(&ctx(&weather, 100), &mut grid));
        assert_eq!(effect.remaining(), 1);
        assert!(effect.tick(&ctx(&weather, 200), &mut grid));
        assert!(!effect.tick(&ctx(&weather, 300), &mut grid));
        assert_eq!(effect.remaining(), 0);
    }

    #[test]
    fn test_one_shot_replaces_previous() {
        let weather = WeatherState::new();
        let clock = FrameClock::default();
        let mut layer = OneShotLayer::new();
        assert!(!layer.is_active());
        assert!(layer.frame().is_none());

        layer.register(WeaveEffect::new(GREEN).into(), &ctx(&weather, 0));
        layer.tick(&ctx(&weather, 0), &clock);
        layer.register(WeaveEffect::new(BLUE).into(), &ctx(&weather, 10));

        assert!(layer.is_active());
        assert!(matches!(
            layer.effect(),
            Some(EffectSlot::Weave(weave)) if weave.color() == BLUE
        ));
        // Registering starts from an all-off buffer
        assert_eq!(layer.frame(), Some(&ColorGrid::new()));
    }

    #[test]
    fn test_one_shot_keeps_last_frame_until_retired() {
        let weather = WeatherState::new();
        let clock = FrameClock::default();
        let mut layer = OneShotLayer::new();
        layer.register(blink(3, 1), &ctx(&weather, 0));

        layer.tick(&ctx(&weather, 50), &clock);
        layer.retire();
        assert!(layer.is_active());

        // Finished, but the final frame is still there to be composited
        layer.tick(&ctx(&weather, 100), &clock);
        assert!(layer.is_active());
        assert!(layer.frame().is_some());
        layer.retire();
        assert!(!layer.is_active());
    }

    #[test]
    fn test_overlay_capacity() {
        let weather = WeatherState::new();
        let mut overlays: OverlayLayer<2> = OverlayLayer::new();
        assert!(overlays.register(blink(1, 3), &ctx(&weather, 0)).is_ok());
        assert!(overlays.register(blink(2, 3), &ctx(&weather, 0)).is_ok());

        let rejected = overlays.register(blink(3, 3), &ctx(&weather, 0));
        assert!(matches!(
            rejected,
            Err(EffectSlot::Blink(effect)) if effect.index() == 3
        ));
        assert_eq!(overlays.len(), 2);
    }

    #[test]
    fn test_overlay_retire_preserves_order() {
        let weather = WeatherState::new();
        let clock = FrameClock::default();
        let mut overlays: OverlayLayer = OverlayLayer::new();
        overlays.register(blink(1, 5), &ctx(&weather, 0)).unwrap();
        overlays.register(blink(2, 1), &ctx(&weather, 0)).unwrap();
        overlays.register(blink(3, 5), &ctx(&weather, 0)).unwrap();

        // The single-blink overlay turns off and finishes
        overlays.tick(&ctx(&weather, 100), &clock);
        overlays.retire();

        let indices: Vec<usize> = overlays
            .effects()
            .map(|effect| match effect {
                EffectSlot::Blink(blink) => blink.index(),
                EffectSlot::Weave(_) => usize::MAX,
            })
            .collect();
        assert_eq!(indices, vec![1, 3]);
    }

    #[test]
    fn test_overlay_blend_skips_background() {
        let weather = WeatherState::new();
        let mut overlays: OverlayLayer = OverlayLayer::new();
        overlays.register(blink(4, 2), &ctx(&weather, 0)).unwrap();

        let mut grid = ColorGrid::new();
        grid.fill(BLUE);
        overlays.blend(&mut grid);

        assert_eq!(grid[4], RED);
        assert_eq!(grid[3], BLUE);
        assert_eq!(grid[5], BLUE);
    }
}
