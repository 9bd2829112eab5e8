//! Colour type and the percentage math the lighting engine uses.
//!
//! Every dimming step in the engine works in whole percent and truncates
//! toward zero, so `scale_percent(c, 50)` of `255` is `127`.

pub use smart_leds::hsv::hsv2rgb;
use smart_leds::{RGB8, hsv::Hsv as HSV};

pub type Rgb = RGB8;
pub type Hsv = HSV;

/// Background colour, treated as "transparent" by overlays
pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
pub const WHITE: Rgb = Rgb {
    r: 200,
    g: 255,
    b: 255,
};
pub const RED: Rgb = Rgb { r: 255, g: 25, b: 0 };
pub const GREEN: Rgb = Rgb { r: 0, g: 255, b: 30 };
pub const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
pub const PINK: Rgb = Rgb { r: 200, g: 0, b: 255 };
pub const PURPLE: Rgb = Rgb { r: 50, g: 0, b: 255 };
pub const YELLOW: Rgb = Rgb { r: 180, g: 255, b: 0 };
pub const ORANGE: Rgb = Rgb {
    r: 255,
    g: 140,
    b: 0,
};
pub const TURQUOISE: Rgb = Rgb {
    r: 0,
    g: 255,
    b: 255,
};

/// Multiply every channel by `percent / 100`, truncating toward zero.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn scale_percent(color: Rgb, percent: u8) -> Rgb {
    let percent = (if percent > 100 { 100 } else { percent }) as u16;
    Rgb {
        r: (color.r as u16 * percent / 100) as u8,
        g: (color.g as u16 * percent / 100) as u8,
        b: (color.b as u16 * percent / 100) as u8,
    }
}

/// Returns true for the background colour (all channels off)
#[inline]
pub const fn is_background(color: Rgb) -> bool {
    color.r == 0 && color.g == 0 && color.b == 0
}
