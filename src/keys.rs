//! Bounded queue of key presses waiting for the next scheduler pass.

use heapless::Vec;

/// Maximum number of presses buffered between two scheduler passes
pub const PRESSED_KEYS_CAPACITY: usize = 35;

/// Matrix position of a pressed key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPosition {
    pub column: u8,
    pub row: u8,
}

impl KeyPosition {
    pub const fn new(column: u8, row: u8) -> Self {
        Self { column, row }
    }

    /// Unpack the wire format: column in the high nibble, row in the low one
    pub const fn from_packed(packed: u8) -> Self {
        Self {
            column: (packed >> 4) & 0x0F,
            row: packed & 0x0F,
        }
    }

    pub const fn packed(self) -> u8 {
        ((self.column & 0x0F) << 4) | (self.row & 0x0F)
    }
}

/// Presses in arrival order
///
/// N is the number of presses the queue can hold
#[derive(Debug, Default)]
pub struct PressedKeys<const N: usize = PRESSED_KEYS_CAPACITY> {
    inner: Vec<KeyPosition, N>,
}

impl<const N: usize> PressedKeys<N> {
    pub const fn new() -> Self {
        Self { inner: Vec::new() }
    }

    /// Queue a press
    ///
    /// Returns the press if the queue is full; it is not retried.
    pub fn push(&mut self, key: KeyPosition) -> Result<(), KeyPosition> {
        self.inner.push(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn as_slice(&self) -> &[KeyPosition] {
        &self.inner
    }

    /// Hand every queued press to `dispatch` in arrival order, then empty the queue
    pub fn drain(&mut self, mut dispatch: impl FnMut(KeyPosition)) {
        for key in &self.inner {
            dispatch(*key);
        }
        self.inner.clear();
    }
}
