#![no_std]

pub mod color;
pub mod compositor;
pub mod effect;
pub mod engine;
pub mod grid;
pub mod intake;
pub mod keys;
pub mod profile;
pub mod pwm;
pub mod scheduler;
pub mod shared;
pub mod state;
pub mod weather;

pub use compositor::{Compositor, IndicatorTimings};
pub use effect::{BlinkEffect, Effect, EffectSlot, OneShotLayer, OverlayLayer, WeaveEffect};
pub use engine::{Engine, EngineConfig};
pub use grid::{COLUMNS, ColorGrid, LED_COUNT, ROWS};
pub use intake::{ByteSource, Command, DecodeError, Response, decode, decode_or_discard};
pub use keys::{KeyPosition, PressedKeys};
pub use profile::{Animation, FrameRate, ProfileId, ProfileSlot, ProfileTable};
pub use pwm::{LineChannel, MatrixLines, PinLines, Polarity, PwmRenderer};
pub use scheduler::{BASE_RATE_HZ, FrameClock};
pub use shared::{FrameCell, SharedEngine};
pub use state::{Brightness, DeviceState, IdleTimeouts, PowerPlan};
pub use weather::{ClockTime, WeatherSnapshot, WeatherState};

pub use color::{Hsv, Rgb};
pub use embassy_time::{Duration, Instant};
