//! Corsair Hydro Rust Driver
//!
//! A Rust driver for Corsair Hydro series liquid coolers (H80i, H100i,
//! H110i, H110i Extreme) over their 64-byte USB HID protocol.
//!
//! # Features
//!
//! - Capability discovery: firmware, name, sensor/fan/LED counts
//! - Read temperatures (millidegrees), fan RPM and PWM duty
//! - Control PWM duty and the named fan-curve modes
//! - RGB lighting: mode, static colors, temperature-reactive profile
//! - Custom fan profile and external-temperature override
//!
//! # Example
//!
//! ```no_run
//! use corsair_hydro_rust::device::HydroDevice;
//! use corsair_hydro_rust::protocol::PwmMode;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Open the first cooler and run capability discovery
//!     let hydro = HydroDevice::open()?;
//!     println!("Connected! {}", hydro.descriptor());
//!
//!     // Read current readings
//!     let status = hydro.status()?;
//!     println!("{}", status);
//!
//!     // Pin fan 0 to a fixed duty
//!     hydro.write_pwm_mode(0, PwmMode::Fixed)?;
//!     hydro.write_pwm_duty(0, 180)?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod device;
pub mod error;
pub mod protocol;
pub mod storage;
pub mod transport;
pub mod utils;

// Re-exports for convenience
pub use device::{DeviceDescriptor, HydroDevice};
pub use error::{HydroError, Result};
pub use protocol::{FanCurve, LedColor, LedTempProfile, PwmMode};
pub use transport::{HidTransport, Transport};
