//! Effect lifecycles: one exclusive one-shot and a bounded overlay list.

use heapless::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use super::EffectSlot;
use crate::color::is_background;
use crate::grid::ColorGrid;
use crate::profile::AnimationContext;
use crate::scheduler::FrameClock;

/// Overlays that can run at the same time
pub const MAX_OVERLAYS: usize = 10;

/// Effect that replaces the whole output while it runs
#[derive(Debug, Clone, Default)]
pub struct OneShotLayer {
    effect: Option<EffectSlot>,
    frame: ColorGrid,
    finished: bool,
}

impl OneShotLayer {
    pub const fn new() -> Self {
        Self {
            effect: None,
            frame: ColorGrid::new(),
            finished: false,
        }
    }

    /// Install an effect, cancelling the one currently running
    pub fn register(&mut self, effect: EffectSlot, ctx: &AnimationContext<'_>) {
        self.frame.clear();
        let effect = self.effect.insert(effect);
        effect.init(ctx, &mut self.frame);
        self.finished = false;
    }

    pub const fn is_active(&self) -> bool {
        self.effect.is_some()
    }

    pub fn effect(&self) -> Option<&EffectSlot> {
        self.effect.as_ref()
    }

    /// Output of the running effect
    pub fn frame(&self) -> Option<&ColorGrid> {
        self.effect.as_ref().map(|_| &self.frame)
    }

    pub fn tick(&mut self, ctx: &AnimationContext<'_>, clock: &FrameClock) {
        let Some(effect) = &mut self.effect else {
            return;
        };
        if self.finished || !clock.is_due(effect.fps()) {
            return;
        }
        if !effect.tick(ctx, &mut self.frame) {
            self.finished = true;
        }
    }

    /// Drop the effect once its last frame has been composited
    pub fn retire(&mut self) {
        if self.finished {
            self.effect = None;
            self.finished = false;
        }
    }
}

#[derive(Debug, Clone)]
struct OverlayEntry {
    effect: EffectSlot,
    frame: ColorGrid,
    finished: bool,
}

/// Effects painted over the profile output wherever they are not background
///
/// N is the number of overlays that can run at the same time
#[derive(Debug, Clone, Default)]
pub struct OverlayLayer<const N: usize = MAX_OVERLAYS> {
    entries: Vec<OverlayEntry, N>,
}

impl<const N: usize> OverlayLayer<N> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Start an overlay
    ///
    /// Returns the effect if the list is already full.
    pub fn register(
        &mut self,
        effect: EffectSlot,
        ctx: &AnimationContext<'_>,
    ) -> Result<(), EffectSlot> {
        if self.entries.is_full() {
            #[cfg(feature = "esp32-log")]
            println!("[OverlayLayer.register] overlay list full, effect dropped");
            return Err(effect);
        }

        let mut entry = OverlayEntry {
            effect,
            frame: ColorGrid::new(),
            finished: false,
        };
        entry.effect.init(ctx, &mut entry.frame);
        self.entries.push(entry).map_err(|entry| entry.effect)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn effects(&self) -> impl Iterator<Item = &EffectSlot> {
        self.entries.iter().map(|entry| &entry.effect)
    }

    /// Tick every overlay that is due, each on a freshly cleared frame
    pub fn tick(&mut self, ctx: &AnimationContext<'_>, clock: &FrameClock) {
        for entry in &mut self.entries {
            if entry.finished || !clock.is_due(entry.effect.fps()) {
                continue;
            }
            entry.frame.clear();
            if !entry.effect.tick(ctx, &mut entry.frame) {
                entry.finished = true;
            }
        }
    }

    /// Copy every non-background overlay pixel onto `grid`, in registration order
    pub fn blend(&self, grid: &mut ColorGrid) {
        for entry in &self.entries {
            for (target, color) in grid.as_mut_slice().iter_mut().zip(entry.frame.iter()) {
                if !is_background(*color) {
                    *target = *color;
                }
            }
        }
    }

    /// Remove finished overlays, keeping the order of the rest
    pub fn retire(&mut self) {
        self.entries.retain(|entry| !entry.finished);
    }
}
