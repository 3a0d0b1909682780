//! Custom error types for Corsair Hydro devices.
//!
//! Three layers mirror the way failures actually happen: transport faults
//! (USB/HID), protocol faults (desynchronized or unsupported firmware
//! responses), and caller faults (bad arguments, rejected before any
//! exchange touches the device).

use thiserror::Error;

/// Failures of the USB/HID round trip.
///
/// Every transport failure is fatal for the current operation and is
/// surfaced verbatim; the driver never retries on its own.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The command frame was not accepted within the timeout.
    #[error("Timed out writing command frame to device")]
    WriteTimeout,

    /// No response frame arrived within the timeout.
    #[error("Timed out waiting for device response")]
    ReadTimeout,

    /// The device disappeared mid-exchange.
    #[error("Device disconnected")]
    DeviceGone,

    /// Underlying HID communication error.
    #[error("HID communication error: {0}")]
    Hid(#[from] hidapi::HidError),
}

/// Malformed or unexpected wire data.
///
/// These indicate a desynchronized exchange or firmware this driver does
/// not understand. No partial state is committed when one is raised.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Sub-commands would not fit in a 64-byte frame.
    #[error("Encoded command length {len} exceeds frame capacity (63 bytes)")]
    FrameOverflow { len: usize },

    /// An expected field tag was absent from the response.
    #[error("Missing expected field {tag:#04x} in device response")]
    MissingField { tag: u8 },

    /// An echoed acknowledgment byte was not 0x06.
    #[error("Unexpected acknowledgment {got:#04x} for tag {tag:#04x} (expected 0x06)")]
    UnexpectedAck { tag: u8, got: u8 },
}

/// Main error type for Hydro device operations.
#[derive(Error, Debug)]
pub enum HydroError {
    /// Device not found during enumeration.
    #[error("Corsair Hydro cooler not found. Check USB connection and permissions.")]
    DeviceNotFound,

    /// Transport failure (write/read timeout, disconnect).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Protocol failure (bad frame, missing field, bad ack).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The device answered the identify command with an unknown model code.
    #[error("Unsupported device model {id:#04x}. Known: 0x3b, 0x3c, 0x41, 0x42.")]
    UnsupportedDevice { id: u8 },

    /// A sensor or fan index outside the counts the device advertised.
    #[error("{kind} index {index} out of range (device has {count})")]
    IndexOutOfRange {
        kind: &'static str,
        index: u8,
        count: u8,
    },

    /// Generic invalid input error.
    #[error("Invalid input: {0}")]
    InvalidArgument(String),
}

/// Result type alias for Hydro operations.
pub type Result<T> = std::result::Result<T, HydroError>;
