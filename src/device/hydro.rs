//! Corsair Hydro session: the public operation surface.
//!
//! One session owns one transport and the descriptor discovered at attach
//! time. The protocol allows no pipelining, so the transport sits behind a
//! mutex and every operation performs exactly one serialized exchange.
//! Index arguments are validated against the descriptor before any frame
//! is built; a bad index never reaches the wire.

use std::sync::Mutex;

use crate::device::descriptor::{self, DeviceDescriptor, SensorIndex};
use crate::error::{HydroError, Result};
use crate::protocol::fields::{
    self, FanCurve, LED_COLOR_SLOTS, LedColor, LedTempProfile, PwmMode, pack_led_colors,
};
use crate::protocol::frame::{self, Frame, SubCommand};
use crate::transport::{HidTransport, Transport};

/// Highest LED lighting mode the firmware accepts.
pub const LED_MODE_MAX: u8 = 0xcf;

// =============================================================================
// HydroDevice
// =============================================================================

/// An attached Corsair Hydro cooler.
///
/// # Example
///
/// ```no_run
/// use corsair_hydro_rust::device::HydroDevice;
///
/// let hydro = HydroDevice::open()?;
/// println!("{}", hydro.descriptor());
///
/// let milli_c = hydro.read_temperature(0)?;
/// println!("Coolant: {:.3} C", milli_c as f64 / 1000.0);
///
/// hydro.write_pwm_duty(0, 180)?;
/// # Ok::<(), corsair_hydro_rust::error::HydroError>(())
/// ```
pub struct HydroDevice<T: Transport = HidTransport> {
    transport: Mutex<T>,
    descriptor: DeviceDescriptor,
}

impl HydroDevice<HidTransport> {
    /// Open the first connected Hydro cooler and run capability discovery.
    pub fn open() -> Result<Self> {
        Self::attach(HidTransport::open()?)
    }

    /// Open a Hydro cooler by HID path and run capability discovery.
    pub fn open_path(path: &std::ffi::CStr) -> Result<Self> {
        Self::attach(HidTransport::open_path(path)?)
    }

    /// List all connected Hydro coolers as (path, serial) tuples.
    pub fn list_devices() -> Result<Vec<(String, Option<String>)>> {
        HidTransport::list_devices()
    }
}

impl<T: Transport> HydroDevice<T> {
    /// Attach to a device over an opened transport.
    ///
    /// Runs identify and the combined info exchange; fails with
    /// `UnsupportedDevice` before a session exists if the model code is
    /// not in the known set.
    pub fn attach(mut transport: T) -> Result<Self> {
        let descriptor = descriptor::discover(&mut transport)?;
        Ok(Self {
            transport: Mutex::new(transport),
            descriptor,
        })
    }

    /// What the device advertised at attach time.
    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    // =========================================================================
    // Temperature Sensors
    // =========================================================================

    /// Read temperature sensor `index`, in millidegrees Celsius.
    pub fn read_temperature(&self, index: u8) -> Result<u32> {
        let idx = self.descriptor.temp_sensor(index)?;
        let response = self.exchange(&[
            SubCommand::new(frame::TAG_TEMP_CLASS, &[]),
            SubCommand::new(frame::TAG_TEMP_READ, &[idx.raw()]),
        ])?;
        Ok(fields::read_temperature(&response)?)
    }

    // =========================================================================
    // Fans
    // =========================================================================

    /// Read fan `index` speed in RPM.
    pub fn read_fan_rpm(&self, index: u8) -> Result<u16> {
        let idx = self.descriptor.fan(index)?;
        let response = self.fan_exchange(frame::TAG_RPM_READ, idx)?;
        Ok(fields::read_rpm(&response)?)
    }

    /// Read fan `index` PWM duty (0-255).
    pub fn read_pwm_duty(&self, index: u8) -> Result<u8> {
        let idx = self.descriptor.fan(index)?;
        let response = self.fan_exchange(frame::TAG_DUTY_READ, idx)?;
        Ok(fields::read_duty(&response)?)
    }

    /// Set fan `index` PWM duty (0-255).
    pub fn write_pwm_duty(&self, index: u8, duty: u8) -> Result<()> {
        let idx = self.descriptor.fan(index)?;
        let response = self.exchange(&[
            SubCommand::new(frame::TAG_FAN_CLASS, &[]),
            SubCommand::new(frame::TAG_DUTY_WRITE, &[idx.raw(), duty]),
        ])?;
        fields::check_write_acks(&response, &[frame::TAG_FAN_CLASS, frame::TAG_DUTY_WRITE])?;
        Ok(())
    }

    /// Read fan `index` PWM mode.
    pub fn read_pwm_mode(&self, index: u8) -> Result<PwmMode> {
        let idx = self.descriptor.fan(index)?;
        let response = self.fan_exchange(frame::TAG_MODE_READ, idx)?;
        Ok(fields::read_pwm_mode(&response)?)
    }

    /// Set fan `index` PWM mode. Only the named curves 1..6 are writable;
    /// `PwmMode::Unset` is rejected before any exchange.
    pub fn write_pwm_mode(&self, index: u8, mode: PwmMode) -> Result<()> {
        let idx = self.descriptor.fan(index)?;
        let raw = mode.to_raw().ok_or_else(|| {
            HydroError::InvalidArgument("PWM mode 0 (unset) cannot be written".into())
        })?;
        let response = self.exchange(&[
            SubCommand::new(frame::TAG_FAN_CLASS, &[]),
            SubCommand::new(frame::TAG_MODE_WRITE, &[idx.raw(), raw]),
        ])?;
        fields::check_write_acks(&response, &[frame::TAG_FAN_CLASS, frame::TAG_MODE_WRITE])?;
        Ok(())
    }

    // =========================================================================
    // LED Lighting
    // =========================================================================

    /// Read the LED lighting mode (0..=0xcf).
    pub fn read_led_mode(&self) -> Result<u8> {
        let response = self.exchange(&[SubCommand::new(frame::TAG_LED_MODE_READ, &[])])?;
        Ok(fields::read_led_mode(&response)?)
    }

    /// Set the LED lighting mode (0..=0xcf).
    pub fn write_led_mode(&self, mode: u8) -> Result<()> {
        if mode > LED_MODE_MAX {
            return Err(HydroError::InvalidArgument(format!(
                "LED mode {:#04x} out of range (max {:#04x})",
                mode, LED_MODE_MAX
            )));
        }
        let response = self.exchange(&[SubCommand::new(frame::TAG_LED_MODE_WRITE, &[mode])])?;
        fields::check_write_acks(&response, &[frame::TAG_LED_MODE_WRITE])?;
        Ok(())
    }

    /// Read the 4 static LED colors.
    pub fn read_led_colors(&self) -> Result<[LedColor; LED_COLOR_SLOTS]> {
        let response = self.exchange(&[SubCommand::new(frame::TAG_LED_COLORS_READ, &[])])?;
        Ok(fields::read_led_colors(&response)?)
    }

    /// Set the 4 static LED colors.
    pub fn write_led_colors(&self, colors: &[LedColor; LED_COLOR_SLOTS]) -> Result<()> {
        let payload = pack_led_colors(colors);
        let response = self.exchange(&[SubCommand::new(frame::TAG_LED_COLORS_WRITE, &payload)])?;
        fields::check_write_acks(&response, &[frame::TAG_LED_COLORS_WRITE])?;
        Ok(())
    }

    // =========================================================================
    // Profiles
    // =========================================================================

    /// Read the custom fan profile (5 RPM thresholds + 5 duty values).
    pub fn read_fan_curve(&self) -> Result<FanCurve> {
        let response = self.exchange(&[SubCommand::new(frame::TAG_FAN_CURVE_READ, &[])])?;
        Ok(fields::read_fan_curve(&response)?)
    }

    /// Write the custom fan profile.
    pub fn write_fan_curve(&self, curve: &FanCurve) -> Result<()> {
        let payload = curve.to_payload();
        let response = self.exchange(&[SubCommand::new(frame::TAG_FAN_CURVE_WRITE, &payload)])?;
        fields::check_write_acks(&response, &[frame::TAG_FAN_CURVE_WRITE])?;
        Ok(())
    }

    /// Read the LED temperature profile (3 thresholds + 3 colors).
    pub fn read_led_temp_profile(&self) -> Result<LedTempProfile> {
        let response = self.exchange(&[SubCommand::new(frame::TAG_LED_TEMP_READ, &[])])?;
        Ok(fields::read_led_temp_profile(&response)?)
    }

    /// Write the LED temperature profile.
    pub fn write_led_temp_profile(&self, profile: &LedTempProfile) -> Result<()> {
        let payload = profile.to_payload();
        let response = self.exchange(&[SubCommand::new(frame::TAG_LED_TEMP_WRITE, &payload)])?;
        fields::check_write_acks(&response, &[frame::TAG_LED_TEMP_WRITE])?;
        Ok(())
    }

    // =========================================================================
    // External Temperature Override
    // =========================================================================

    /// Read the external temperature override the LED profile reacts to.
    pub fn read_external_temp(&self) -> Result<u16> {
        let response = self.exchange(&[SubCommand::new(frame::TAG_EXT_TEMP_READ, &[])])?;
        Ok(fields::read_external_temp(&response)?)
    }

    /// Push an external temperature into the device (e.g. host CPU temp),
    /// overriding the internal sensor for the LED temperature profile.
    pub fn write_external_temp(&self, temp: u16) -> Result<()> {
        let payload = fields::pack_external_temp(temp);
        let response = self.exchange(&[SubCommand::new(frame::TAG_EXT_TEMP_WRITE, &payload)])?;
        fields::check_write_acks(&response, &[frame::TAG_EXT_TEMP_WRITE])?;
        Ok(())
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Fan-family read: class echo sub-command plus the index-selecting tag.
    fn fan_exchange(&self, tag: u8, idx: SensorIndex) -> Result<Frame> {
        self.exchange(&[
            SubCommand::new(frame::TAG_FAN_CLASS, &[]),
            SubCommand::new(tag, &[idx.raw()]),
        ])
    }

    fn exchange(&self, subcommands: &[SubCommand<'_>]) -> Result<Frame> {
        let request = frame::encode(subcommands)?;
        let mut transport = self
            .transport
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(transport.exchange(&request)?)
    }
}

impl<T: Transport> std::fmt::Debug for HydroDevice<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HydroDevice")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ProtocolError, TransportError};
    use crate::protocol::frame::ACK;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex as StdMutex};

    /// Scripted transport: pops canned responses, records every request.
    struct MockTransport {
        responses: VecDeque<Frame>,
        sent: Arc<StdMutex<Vec<Frame>>>,
    }

    impl MockTransport {
        fn new(responses: Vec<Frame>) -> (Self, Arc<StdMutex<Vec<Frame>>>) {
            let sent = Arc::new(StdMutex::new(Vec::new()));
            (
                Self {
                    responses: responses.into(),
                    sent: sent.clone(),
                },
                sent,
            )
        }
    }

    impl Transport for MockTransport {
        fn exchange(&mut self, out: &Frame) -> std::result::Result<Frame, TransportError> {
            self.sent.lock().unwrap().push(*out);
            self.responses
                .pop_front()
                .ok_or(TransportError::ReadTimeout)
        }
    }

    fn reply(subs: &[SubCommand<'_>]) -> Frame {
        frame::encode(subs).unwrap()
    }

    fn identify_reply(model: u8) -> Frame {
        reply(&[SubCommand::new(frame::TAG_TEMP_CLASS, &[model])])
    }

    fn info_reply(version: [u8; 3], name: &[u8; 8], counts: (u8, u8, u8)) -> Frame {
        reply(&[
            SubCommand::new(frame::TAG_FIRMWARE, &version),
            SubCommand::new(frame::TAG_NAME, name),
            SubCommand::new(frame::TAG_TEMP_COUNT, &[counts.0]),
            SubCommand::new(frame::TAG_FAN_COUNT, &[counts.1]),
            SubCommand::new(frame::TAG_TEMP_CLASS, &[counts.2]),
        ])
    }

    /// An attached H110i with 2 temp sensors, 3 fans, 4 LEDs, plus the
    /// given scripted responses for the operations under test.
    fn attached(
        extra: Vec<Frame>,
    ) -> (HydroDevice<MockTransport>, Arc<StdMutex<Vec<Frame>>>) {
        let mut responses = vec![
            identify_reply(0x41),
            info_reply([3, 18, 0], b"HYDROUS\0", (2, 3, 4)),
        ];
        responses.extend(extra);
        let (transport, sent) = MockTransport::new(responses);
        let hydro = HydroDevice::attach(transport).unwrap();
        (hydro, sent)
    }

    #[test]
    fn test_attach_builds_descriptor() {
        let (hydro, sent) = attached(vec![]);
        let descriptor = hydro.descriptor();
        assert_eq!(descriptor.device_id.raw(), 0x41);
        assert_eq!(
            (
                descriptor.firmware.major,
                descriptor.firmware.minor,
                descriptor.firmware.patch
            ),
            (1, 2, 3)
        );
        assert_eq!(descriptor.name, "HYDROUS");
        assert_eq!(descriptor.temp_sensor_count, 2);
        assert_eq!(descriptor.fan_count, 3);
        assert_eq!(descriptor.led_count, 4);
        // Identify frame: length 1, sole identify tag.
        let frames = sent.lock().unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(&frames[0][..2], &[1, frame::TAG_IDENTIFY]);
    }

    #[test]
    fn test_attach_rejects_unknown_model() {
        let (transport, _) = MockTransport::new(vec![identify_reply(0x99)]);
        let result = HydroDevice::attach(transport);
        assert!(matches!(
            result,
            Err(HydroError::UnsupportedDevice { id: 0x99 })
        ));
    }

    #[test]
    fn test_read_temperature() {
        let (hydro, sent) = attached(vec![reply(&[
            SubCommand::new(frame::TAG_TEMP_CLASS, &[ACK]),
            SubCommand::new(frame::TAG_TEMP_READ, &[0x00, 0x19]),
        ])]);
        assert_eq!(hydro.read_temperature(1).unwrap(), 25_000);
        let frames = sent.lock().unwrap();
        // Class echo then sensor select with the validated index.
        assert_eq!(
            &frames[2][..4],
            &[3, frame::TAG_TEMP_CLASS, frame::TAG_TEMP_READ, 1]
        );
    }

    #[test]
    fn test_out_of_range_index_issues_no_exchange() {
        let (hydro, sent) = attached(vec![]);
        let before = sent.lock().unwrap().len();

        assert!(matches!(
            hydro.read_temperature(2),
            Err(HydroError::IndexOutOfRange { index: 2, .. })
        ));
        assert!(hydro.read_fan_rpm(3).is_err());
        assert!(hydro.write_pwm_duty(3, 128).is_err());

        assert_eq!(sent.lock().unwrap().len(), before);
    }

    #[test]
    fn test_write_pwm_duty_frame_and_acks() {
        let (hydro, sent) = attached(vec![reply(&[
            SubCommand::new(frame::TAG_FAN_CLASS, &[ACK]),
            SubCommand::new(frame::TAG_DUTY_WRITE, &[ACK]),
        ])]);
        hydro.write_pwm_duty(2, 200).unwrap();
        let frames = sent.lock().unwrap();
        assert_eq!(
            &frames[2][..5],
            &[4, frame::TAG_FAN_CLASS, frame::TAG_DUTY_WRITE, 2, 200]
        );
    }

    #[test]
    fn test_write_rejected_on_bad_ack() {
        let (hydro, _) = attached(vec![reply(&[
            SubCommand::new(frame::TAG_FAN_CLASS, &[ACK]),
            SubCommand::new(frame::TAG_DUTY_WRITE, &[0x07]),
        ])]);
        assert!(matches!(
            hydro.write_pwm_duty(0, 100),
            Err(HydroError::Protocol(ProtocolError::UnexpectedAck {
                tag: frame::TAG_DUTY_WRITE,
                got: 0x07,
            }))
        ));
    }

    #[test]
    fn test_write_pwm_mode_raw_code() {
        let (hydro, sent) = attached(vec![reply(&[
            SubCommand::new(frame::TAG_FAN_CLASS, &[ACK]),
            SubCommand::new(frame::TAG_MODE_WRITE, &[ACK]),
        ])]);
        hydro.write_pwm_mode(0, PwmMode::Balanced).unwrap();
        let frames = sent.lock().unwrap();
        // Balanced (host 4) goes out as raw 0x0a.
        assert_eq!(
            &frames[2][..5],
            &[4, frame::TAG_FAN_CLASS, frame::TAG_MODE_WRITE, 0, 0x0a]
        );
    }

    #[test]
    fn test_write_pwm_mode_unset_rejected() {
        let (hydro, sent) = attached(vec![]);
        let before = sent.lock().unwrap().len();
        assert!(matches!(
            hydro.write_pwm_mode(0, PwmMode::Unset),
            Err(HydroError::InvalidArgument(_))
        ));
        assert_eq!(sent.lock().unwrap().len(), before);
    }

    #[test]
    fn test_led_mode_range() {
        let (hydro, sent) = attached(vec![]);
        let before = sent.lock().unwrap().len();
        assert!(matches!(
            hydro.write_led_mode(0xd0),
            Err(HydroError::InvalidArgument(_))
        ));
        assert_eq!(sent.lock().unwrap().len(), before);
    }

    #[test]
    fn test_fan_curve_round_trip_through_session() {
        let curve = FanCurve {
            rpm: [500, 800, 1100, 1400, 1800],
            duty: [30, 70, 120, 180, 255],
        };
        let (hydro, _) = attached(vec![
            reply(&[SubCommand::new(frame::TAG_FAN_CURVE_WRITE, &[ACK])]),
            reply(&[SubCommand::new(
                frame::TAG_FAN_CURVE_READ,
                &curve.to_payload(),
            )]),
        ]);
        hydro.write_fan_curve(&curve).unwrap();
        assert_eq!(hydro.read_fan_curve().unwrap(), curve);
    }

    #[test]
    fn test_transport_failure_propagates() {
        // DeviceGone must pass through unchanged, no retry behind the scenes.
        struct GoneTransport;
        impl Transport for GoneTransport {
            fn exchange(&mut self, _out: &Frame) -> std::result::Result<Frame, TransportError> {
                Err(TransportError::DeviceGone)
            }
        }
        let result = HydroDevice::attach(GoneTransport);
        assert!(matches!(
            result,
            Err(HydroError::Transport(TransportError::DeviceGone))
        ));
    }
}
