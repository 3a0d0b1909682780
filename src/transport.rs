//! Blocking write-then-read transport to one Hydro device.
//!
//! The protocol is strictly request/response: every operation writes one
//! 64-byte frame and reads one 64-byte frame back, with a bounded timeout.
//! The [`Transport`] trait is the seam the session talks through; tests
//! substitute a scripted implementation.

use hidapi::{HidApi, HidDevice};

use crate::error::{HydroError, Result, TransportError};
use crate::protocol::frame::{CORSAIR_VID, FRAME_LENGTH, Frame, HYDRO_PID};

/// Default HID read timeout in milliseconds.
const READ_TIMEOUT_MS: i32 = 2000;

/// One blocking 64-byte exchange: write the command frame, then read the
/// response frame. The write always happens before the read; once a frame
/// is written the read is always attempted.
pub trait Transport {
    fn exchange(&mut self, out: &Frame) -> std::result::Result<Frame, TransportError>;
}

// =============================================================================
// HidTransport
// =============================================================================

/// Transport over a hidapi device handle.
pub struct HidTransport {
    device: HidDevice,
}

impl HidTransport {
    /// Open the first connected Hydro cooler.
    ///
    /// # Errors
    /// Returns `DeviceNotFound` if no Hydro cooler is connected.
    pub fn open() -> Result<Self> {
        let api = HidApi::new().map_err(TransportError::Hid)?;

        for info in api.device_list() {
            if info.vendor_id() == CORSAIR_VID && info.product_id() == HYDRO_PID {
                let device = info.open_device(&api).map_err(TransportError::Hid)?;
                return Ok(Self { device });
            }
        }

        Err(HydroError::DeviceNotFound)
    }

    /// Open a Hydro cooler by path.
    ///
    /// Useful when multiple coolers are connected.
    pub fn open_path(path: &std::ffi::CStr) -> Result<Self> {
        let api = HidApi::new().map_err(TransportError::Hid)?;
        let device = api.open_path(path).map_err(TransportError::Hid)?;
        Ok(Self { device })
    }

    /// List all connected Hydro coolers.
    ///
    /// Returns a vector of (path, serial_number) tuples.
    pub fn list_devices() -> Result<Vec<(String, Option<String>)>> {
        let api = HidApi::new().map_err(TransportError::Hid)?;

        let devices: Vec<_> = api
            .device_list()
            .filter(|info| info.vendor_id() == CORSAIR_VID && info.product_id() == HYDRO_PID)
            .map(|info| {
                (
                    info.path().to_string_lossy().into_owned(),
                    info.serial_number().map(String::from),
                )
            })
            .collect();

        Ok(devices)
    }
}

impl Transport for HidTransport {
    fn exchange(&mut self, out: &Frame) -> std::result::Result<Frame, TransportError> {
        let written = self.device.write(out)?;
        if written < FRAME_LENGTH {
            return Err(TransportError::WriteTimeout);
        }

        let mut buf = [0u8; FRAME_LENGTH];
        let read = self.device.read_timeout(&mut buf, READ_TIMEOUT_MS)?;
        if read == 0 {
            return Err(TransportError::ReadTimeout);
        }
        Ok(buf)
    }
}

impl std::fmt::Debug for HidTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HidTransport").finish_non_exhaustive()
    }
}
