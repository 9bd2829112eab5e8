//! Blinking readout of a number, one digit LED at a time.

use embassy_time::{Duration, Instant};
use heapless::Vec;

use crate::color::Rgb;
use crate::grid::ColorGrid;

/// Enough for every digit of an `i32` plus the sign
pub const MAX_DIGIT_TOKENS: usize = 11;

pub const ZERO_INDEX: usize = 10;
pub const MINUS_INDEX: usize = 11;
/// Shown for anything that is not a single decimal digit
pub const FALLBACK_INDEX: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitToken {
    Digit(u8),
    Minus,
}

impl DigitToken {
    /// LED showing this token: the number row, with 0 after 9
    pub const fn led_index(self) -> usize {
        match self {
            Self::Digit(0) => ZERO_INDEX,
            Self::Digit(digit @ 1..=9) => digit as usize,
            Self::Digit(_) => FALLBACK_INDEX,
            Self::Minus => MINUS_INDEX,
        }
    }
}

/// Digits are stored least significant first, the sign last.
/// Playback shows the digits most significant first, then the sign.
#[derive(Debug, Clone, Default)]
pub struct NumericDisplay {
    tokens: Vec<DigitToken, MAX_DIGIT_TOKENS>,
    /// Position in playback order, `None` when idle
    step: Option<usize>,
    lit: bool,
    toggled_at: Option<Instant>,
}

impl NumericDisplay {
    pub const fn new() -> Self {
        Self {
            tokens: Vec::new(),
            step: None,
            lit: false,
            toggled_at: None,
        }
    }

    /// Arm the display with `value`, starting lit
    pub fn show(&mut self, value: i32, now: Instant) {
        self.tokens.clear();
        let mut magnitude = value.unsigned_abs();
        loop {
            #[allow(clippy::cast_possible_truncation)]
            let digit = (magnitude % 10) as u8;
            self.tokens.push(DigitToken::Digit(digit)).ok();
            magnitude /= 10;
            if magnitude == 0 {
                break;
            }
        }
        if value < 0 {
            self.tokens.push(DigitToken::Minus).ok();
        }

        self.step = Some(0);
        self.lit = true;
        self.toggled_at = Some(now);
    }

    /// Disarm without finishing playback
    pub fn cancel(&mut self) {
        self.tokens.clear();
        self.step = None;
        self.lit = false;
        self.toggled_at = None;
    }

    pub const fn is_armed(&self) -> bool {
        self.step.is_some()
    }

    /// Stored tokens, least significant digit first
    pub fn tokens(&self) -> &[DigitToken] {
        &self.tokens
    }

    fn digit_count(&self) -> usize {
        self.tokens
            .iter()
            .filter(|token| matches!(token, DigitToken::Digit(_)))
            .count()
    }

    /// Token shown at a playback step
    pub fn token_at(&self, step: usize) -> Option<DigitToken> {
        let digits = self.digit_count();
        if step < digits {
            self.tokens.get(digits - 1 - step).copied()
        } else {
            self.tokens.get(step).copied()
        }
    }

    /// Token on screen right now, if lit
    pub fn current(&self) -> Option<DigitToken> {
        if !self.lit {
            return None;
        }
        self.token_at(self.step?)
    }

    /// Advance the blink and stamp the current token
    pub fn stamp(&mut self, grid: &mut ColorGrid, color: Rgb, interval: Duration, now: Instant) {
        let (Some(step), Some(toggled_at)) = (self.step, self.toggled_at) else {
            return;
        };

        if now.saturating_duration_since(toggled_at) >= interval {
            self.lit = !self.lit;
            self.toggled_at = Some(now);
            if !self.lit {
                let next = step + 1;
                if next >= self.tokens.len() {
                    self.step = None;
                    self.tokens.clear();
                    return;
                }
                self.step = Some(next);
            }
        }

        if let Some(token) = self.current() {
            grid.set_index(token.led_index(), color);
        }
    }
}
