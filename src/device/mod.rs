//! Device abstraction layer for Corsair Hydro coolers.
//!
//! Capability discovery, the session type, and status aggregation.

pub mod descriptor;
pub mod hydro;
pub mod status;

pub use descriptor::{DeviceDescriptor, DeviceId, SensorIndex};
pub use hydro::HydroDevice;
pub use status::{FanStatus, HydroStatus};
