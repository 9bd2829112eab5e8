//! State shared between the animation timer, the command intake and the
//! scanning loop.
//!
//! Everything is guarded by `critical-section`, so the same code works from
//! interrupt handlers, executor tasks and threads.

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::Instant;

use crate::engine::Engine;
use crate::grid::ColorGrid;
use crate::intake::{Command, Response};

/// Frame handed from the compositor to the renderer.
///
/// The frame is only ever replaced or copied out as a whole.
pub struct FrameCell {
    inner: Mutex<RefCell<ColorGrid>>,
}

impl FrameCell {
    /// Create a cell holding an all-off frame.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(ColorGrid::new())),
        }
    }

    /// Replace the frame.
    pub fn publish(&self, frame: &ColorGrid) {
        critical_section::with(|cs| {
            *self.inner.borrow(cs).borrow_mut() = *frame;
        });
    }

    /// Copy of the latest frame.
    pub fn snapshot(&self) -> ColorGrid {
        critical_section::with(|cs| *self.inner.borrow(cs).borrow())
    }
}

impl Default for FrameCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Engine guarded by a critical section.
///
/// Every call runs start to finish inside one critical section, so the
/// scheduler never observes a command half applied.
pub struct SharedEngine<'a> {
    inner: Mutex<RefCell<Engine<'a>>>,
}

impl<'a> SharedEngine<'a> {
    pub const fn new(engine: Engine<'a>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(engine)),
        }
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with<R>(&self, f: impl FnOnce(&mut Engine<'a>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow(cs).borrow_mut()))
    }

    /// Animation timer entry point.
    pub fn on_tick(&self, now: Instant) {
        self.with(|engine| engine.on_tick(now));
    }

    /// Apply a decoded command.
    pub fn execute(&self, command: Command, now: Instant) -> Response {
        self.with(|engine| engine.execute(command, now))
    }
}
