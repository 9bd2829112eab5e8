//! Transient effects layered over the profile output
//!
//! All effects are stored in an enum to avoid heap allocations.
//! Each effect implements the `Effect` trait.

mod blink;
mod layer;
mod weave;

pub use blink::BlinkEffect;
pub use layer::{MAX_OVERLAYS, OneShotLayer, OverlayLayer};
pub use weave::WeaveEffect;

use crate::grid::ColorGrid;
use crate::profile::{AnimationContext, DEFAULT_FPS};

pub trait Effect {
    /// Frames per second this effect is ticked at
    const FRAME_RATE: u8 = DEFAULT_FPS;

    /// Prepare for a fresh run. The grid has already been cleared.
    fn init(&mut self, _ctx: &AnimationContext<'_>, _grid: &mut ColorGrid) {}

    /// Render a single frame
    ///
    /// Returns `false` once the effect is finished. The frame rendered by
    /// that call is still shown once.
    fn tick(&mut self, ctx: &AnimationContext<'_>, grid: &mut ColorGrid) -> bool;
}

/// Effect slot - enum containing all possible effects
#[derive(Debug, Clone)]
pub enum EffectSlot {
    /// Sweep across the whole matrix
    Weave(WeaveEffect),
    /// Single LED blinking a fixed number of times
    Blink(BlinkEffect),
}

impl From<WeaveEffect> for EffectSlot {
    fn from(effect: WeaveEffect) -> Self {
        Self::Weave(effect)
    }
}

impl From<BlinkEffect> for EffectSlot {
    fn from(effect: BlinkEffect) -> Self {
        Self::Blink(effect)
    }
}

impl EffectSlot {
    pub const fn fps(&self) -> u8 {
        match self {
            Self::Weave(_) => WeaveEffect::FRAME_RATE,
            Self::Blink(_) => BlinkEffect::FRAME_RATE,
        }
    }

    pub fn init(&mut self, ctx: &AnimationContext<'_>, grid: &mut ColorGrid) {
        match self {
            Self::Weave(effect) => effect.init(ctx, grid),
            Self::Blink(effect) => effect.init(ctx, grid),
        }
    }

    pub fn tick(&mut self, ctx: &AnimationContext<'_>, grid: &mut ColorGrid) -> bool {
        match self {
            Self::Weave(effect) => effect.tick(ctx, grid),
            Self::Blink(effect) => effect.tick(ctx, grid),
        }
    }
}
