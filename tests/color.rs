mod tests {
    use keylight_composer::color::{BLACK, Rgb, YELLOW, is_background, scale_percent};
    use keylight_composer::grid::{COLUMNS, ColorGrid, LED_COUNT, ROWS};

    const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    #[test]
    fn test_scale_percent_truncates() {
        assert_eq!(
            scale_percent(WHITE, 50),
            Rgb {
                r: 127,
                g: 127,
                b: 127
            }
        );
        assert_eq!(
            scale_percent(YELLOW, 50),
            Rgb {
                r: 90,
                g: 127,
                b: 0
            }
        );
        assert_eq!(scale_percent(WHITE, 0), BLACK);
    }

    #[test]
    fn test_scale_percent_clamps_above_100() {
        assert_eq!(scale_percent(WHITE, 100), WHITE);
        assert_eq!(scale_percent(WHITE, 250), WHITE);
    }

    #[test]
    fn test_is_background() {
        assert!(is_background(BLACK));
        assert!(!is_background(Rgb { r: 0, g: 0, b: 1 }));
    }

    #[test]
    fn test_grid_layout() {
        assert_eq!(LED_COUNT, 70);
        assert_eq!(ColorGrid::index_of(0, 0), Some(0));
        assert_eq!(ColorGrid::index_of(13, 4), Some(69));
        assert_eq!(ColorGrid::index_of(0, 2), Some(28));
        assert_eq!(ColorGrid::index_of(COLUMNS, 0), None);
        assert_eq!(ColorGrid::index_of(0, ROWS), None);
    }

    #[test]
    fn test_grid_ignores_writes_off_the_matrix() {
        let mut grid = ColorGrid::new();
        grid.set(COLUMNS, 0, WHITE);
        grid.set_signed(-1, 0, WHITE);
        grid.set_signed(3, -1, WHITE);
        grid.set_index(LED_COUNT, WHITE);
        assert!(grid.iter().all(|led| is_background(*led)));

        grid.set_signed(3, 1, WHITE);
        assert_eq!(grid.get(3, 1), WHITE);
        assert_eq!(grid[17], WHITE);
    }

    #[test]
    fn test_grid_fill_column() {
        let mut grid = ColorGrid::new();
        grid.fill_column(5, YELLOW);
        for row in 0..ROWS {
            assert_eq!(grid.get(5, row), YELLOW);
            assert_eq!(grid.get(4, row), BLACK);
        }
        grid.clear();
        assert_eq!(grid, ColorGrid::new());
    }
}
