//! Command intake
//!
//! Decodes the byte protocol spoken by the host into [`Command`]s. Each
//! command is an opcode byte followed by a fixed-size payload. Payload bytes
//! are read with a timeout; a command whose payload does not arrive in time
//! is dropped without touching any state.

use embassy_time::Duration;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::keys::KeyPosition;
use crate::state::PowerPlan;
use crate::weather::{WEATHER_PAYLOAD_LEN, WeatherSnapshot};

/// Timeout for single-byte payloads
pub const PAYLOAD_TIMEOUT: Duration = Duration::from_secs(10);
/// Timeout for the weather payload
pub const WEATHER_TIMEOUT: Duration = Duration::from_secs(5);

const OP_TOGGLE_LEDS: u8 = 1;
const OP_NEXT_PROFILE: u8 = 2;
const OP_PREV_PROFILE: u8 = 3;
const OP_SET_PROFILE: u8 = 4;
const OP_GET_PROFILE: u8 = 5;
const OP_GET_PROFILE_COUNT: u8 = 6;
const OP_KEY_PRESSED: u8 = 7;
const OP_CAPS_ON: u8 = 8;
const OP_CAPS_OFF: u8 = 9;
const OP_BLUETOOTH_CONNECTING: u8 = 10;
const OP_BLUETOOTH_CONNECTED: u8 = 11;
const OP_BRIGHTNESS_DOWN: u8 = 12;
const OP_BRIGHTNESS_UP: u8 = 13;
const OP_SET_BRIGHTNESS: u8 = 14;
const OP_GET_BRIGHTNESS: u8 = 15;
const OP_GAMING_ON: u8 = 16;
const OP_GAMING_OFF: u8 = 17;
const OP_SET_LOCKED: u8 = 18;
const OP_RESET: u8 = 19;
const OP_POWER_PLAN: u8 = 20;
const OP_UPDATE_WEATHER: u8 = 21;
const OP_SHOW_TEMPERATURE: u8 = 22;
const OP_SHOW_TIME: u8 = 23;

/// Source of payload bytes, typically a UART
pub trait ByteSource {
    /// Fill `buf`, waiting at most `timeout`.
    ///
    /// Returns the number of bytes actually read.
    fn read_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> usize;
}

/// Decoded host request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleLeds,
    NextProfile,
    PrevProfile,
    SetProfile(u8),
    GetProfile,
    GetProfileCount,
    KeyPressed(KeyPosition),
    CapsLock(bool),
    BluetoothConnecting(u8),
    BluetoothConnected,
    BrightnessDown,
    BrightnessUp,
    SetBrightness(u8),
    GetBrightness,
    GamingMode(bool),
    SetLocked(bool),
    /// Reboot into the bootloader
    Reset,
    PowerPlan(PowerPlan),
    UpdateWeather(WeatherSnapshot),
    ShowTemperature,
    ShowTime,
}

/// What the intake loop should send back or do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    None,
    /// Single reply byte for query commands
    Byte(u8),
    /// The host asked for a device reset
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    UnknownOpcode(u8),
    /// Payload did not arrive before the timeout
    ShortPayload {
        opcode: u8,
        expected: usize,
        received: usize,
    },
    /// Payload byte outside the accepted range
    InvalidPayload { opcode: u8, value: u8 },
}

fn read_exact<S: ByteSource, const N: usize>(
    source: &mut S,
    opcode: u8,
    timeout: Duration,
) -> Result<[u8; N], DecodeError> {
    let mut buf = [0u8; N];
    let received = source.read_timeout(&mut buf, timeout);
    if received < N {
        return Err(DecodeError::ShortPayload {
            opcode,
            expected: N,
            received,
        });
    }
    Ok(buf)
}

fn read_byte<S: ByteSource>(source: &mut S, opcode: u8) -> Result<u8, DecodeError> {
    let [byte] = read_exact::<S, 1>(source, opcode, PAYLOAD_TIMEOUT)?;
    Ok(byte)
}

/// Decode the command introduced by `opcode`, reading its payload from
/// `source`
pub fn decode<S: ByteSource>(opcode: u8, source: &mut S) -> Result<Command, DecodeError> {
    let command = match opcode {
        OP_TOGGLE_LEDS => Command::ToggleLeds,
        OP_NEXT_PROFILE => Command::NextProfile,
        OP_PREV_PROFILE => Command::PrevProfile,
        OP_SET_PROFILE => Command::SetProfile(read_byte(source, opcode)?),
        OP_GET_PROFILE => Command::GetProfile,
        OP_GET_PROFILE_COUNT => Command::GetProfileCount,
        OP_KEY_PRESSED => Command::KeyPressed(KeyPosition::from_packed(read_byte(source, opcode)?)),
        OP_CAPS_ON => Command::CapsLock(true),
        OP_CAPS_OFF => Command::CapsLock(false),
        OP_BLUETOOTH_CONNECTING => Command::BluetoothConnecting(read_byte(source, opcode)?),
        OP_BLUETOOTH_CONNECTED => Command::BluetoothConnected,
        OP_BRIGHTNESS_DOWN => Command::BrightnessDown,
        OP_BRIGHTNESS_UP => Command::BrightnessUp,
        OP_SET_BRIGHTNESS => Command::SetBrightness(read_byte(source, opcode)?),
        OP_GET_BRIGHTNESS => Command::GetBrightness,
        OP_GAMING_ON => Command::GamingMode(true),
        OP_GAMING_OFF => Command::GamingMode(false),
        OP_SET_LOCKED => Command::SetLocked(read_byte(source, opcode)? != 0),
        OP_RESET => Command::Reset,
        OP_POWER_PLAN => {
            let value = read_byte(source, opcode)?;
            let plan = PowerPlan::from_raw(value)
                .ok_or(DecodeError::InvalidPayload { opcode, value })?;
            Command::PowerPlan(plan)
        }
        OP_UPDATE_WEATHER => {
            let payload =
                read_exact::<S, WEATHER_PAYLOAD_LEN>(source, opcode, WEATHER_TIMEOUT)?;
            Command::UpdateWeather(WeatherSnapshot::from_bytes(&payload))
        }
        OP_SHOW_TEMPERATURE => Command::ShowTemperature,
        OP_SHOW_TIME => Command::ShowTime,
        _ => return Err(DecodeError::UnknownOpcode(opcode)),
    };
    Ok(command)
}

/// Decode a command, logging and swallowing anything malformed
pub fn decode_or_discard<S: ByteSource>(opcode: u8, source: &mut S) -> Option<Command> {
    match decode(opcode, source) {
        Ok(command) => Some(command),
        Err(_error) => {
            #[cfg(feature = "esp32-log")]
            println!("[intake.decode_or_discard] command discarded: {:?}", _error);
            None
        }
    }
}
