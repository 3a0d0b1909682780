//! Attach-time capability discovery.
//!
//! Two exchanges run once when a session is attached: identify (which
//! model is on the other end) and the combined info request (firmware,
//! name, sensor/fan/LED counts). The resulting descriptor is immutable
//! and decides how many logical endpoints the session exposes.

use crate::error::{HydroError, Result};
use crate::protocol::fields::{self, FirmwareVersion};
use crate::protocol::frame::{self, SubCommand};
use crate::transport::Transport;

// =============================================================================
// Device Identity
// =============================================================================

/// Known Hydro cooler models, by raw identify code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceId {
    H80i,
    H100i,
    H110i,
    H110iExtreme,
}

impl DeviceId {
    /// Map a raw identify byte to a known model. Unrecognized codes are
    /// rejected, never guessed.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0x3b => Some(DeviceId::H80i),
            0x3c => Some(DeviceId::H100i),
            0x41 => Some(DeviceId::H110i),
            0x42 => Some(DeviceId::H110iExtreme),
            _ => None,
        }
    }

    pub const fn raw(self) -> u8 {
        match self {
            DeviceId::H80i => 0x3b,
            DeviceId::H100i => 0x3c,
            DeviceId::H110i => 0x41,
            DeviceId::H110iExtreme => 0x42,
        }
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DeviceId::H80i => "H80i",
            DeviceId::H100i => "H100i",
            DeviceId::H110i => "H110i",
            DeviceId::H110iExtreme => "H110i Extreme",
        };
        write!(f, "{}", name)
    }
}

// =============================================================================
// Descriptor
// =============================================================================

/// What the device advertised at attach time. Built once, read-only after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub device_id: DeviceId,
    pub firmware: FirmwareVersion,
    /// Device name, at most 8 ASCII characters.
    pub name: String,
    pub temp_sensor_count: u8,
    pub fan_count: u8,
    pub led_count: u8,
}

/// A validated zero-based sensor or fan index.
///
/// Only constructible through the descriptor, so an out-of-range index can
/// never travel into a wire frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorIndex(u8);

impl SensorIndex {
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl DeviceDescriptor {
    /// Validate a temperature-sensor index against the advertised count.
    pub fn temp_sensor(&self, index: u8) -> Result<SensorIndex> {
        if index >= self.temp_sensor_count {
            return Err(HydroError::IndexOutOfRange {
                kind: "temperature sensor",
                index,
                count: self.temp_sensor_count,
            });
        }
        Ok(SensorIndex(index))
    }

    /// Validate a fan index against the advertised count.
    pub fn fan(&self, index: u8) -> Result<SensorIndex> {
        if index >= self.fan_count {
            return Err(HydroError::IndexOutOfRange {
                kind: "fan",
                index,
                count: self.fan_count,
            });
        }
        Ok(SensorIndex(index))
    }
}

impl std::fmt::Display for DeviceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Corsair {} \"{}\" (id {:#04x}), firmware {}",
            self.device_id,
            self.name,
            self.device_id.raw(),
            self.firmware
        )?;
        write!(
            f,
            "  {} temperature sensor(s), {} fan(s), {} LED(s)",
            self.temp_sensor_count, self.fan_count, self.led_count
        )
    }
}

// =============================================================================
// Discovery
// =============================================================================

/// Run capability discovery against a freshly opened transport.
///
/// # Errors
/// `UnsupportedDevice` if the identify response carries a model code
/// outside the known set; transport and protocol errors pass through.
pub fn discover<T: Transport>(transport: &mut T) -> Result<DeviceDescriptor> {
    // Identify: the model code comes back under the 0x06 tag.
    let request = frame::encode(&[SubCommand::new(frame::TAG_IDENTIFY, &[])])?;
    let response = transport.exchange(&request)?;
    let raw_id = fields::read_model_id(&response)?;
    let device_id = DeviceId::from_raw(raw_id).ok_or(HydroError::UnsupportedDevice { id: raw_id })?;

    // Combined info request: version, name, temp/fan/LED counts in one frame.
    let request = frame::encode(&[
        SubCommand::new(frame::TAG_FIRMWARE, &[]),
        SubCommand::new(frame::TAG_NAME, &[]),
        SubCommand::new(frame::TAG_TEMP_COUNT, &[]),
        SubCommand::new(frame::TAG_FAN_COUNT, &[]),
        SubCommand::new(frame::TAG_TEMP_CLASS, &[]),
    ])?;
    let response = transport.exchange(&request)?;

    let firmware = fields::read_version(&response)?;
    let name = fields::read_name(&response)?;
    let (temp_sensor_count, fan_count, led_count) = fields::read_counts(&response)?;

    Ok(DeviceDescriptor {
        device_id,
        firmware,
        name,
        temp_sensor_count,
        fan_count,
        led_count,
    })
}

// =============================================================================
// Tests
// =============================================================================
