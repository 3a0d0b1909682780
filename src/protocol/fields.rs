//! Typed accessors over decoded response fields.
//!
//! The frame codec yields raw `[tag][payload]` fields; this layer gives
//! them meaning: firmware versions, counts, millidegree temperatures, RPM,
//! duty cycles and the PWM-mode code table, plus the whole-device LED and
//! profile blocks. All multi-byte packing goes through `byteorder` so no
//! call site does its own shift-and-mask arithmetic.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::protocol::frame::{self, ACK, Field, Frame};

// =============================================================================
// Firmware Version
// =============================================================================

/// Firmware version reported in the info stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl std::fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

// =============================================================================
// PWM Mode
// =============================================================================

/// Host-visible fan-curve selector.
///
/// The device speaks raw mode codes; the mapping below is fixed and
/// deliberately lossy: raw 0x02 and 0x04 both collapse onto [`PwmMode::Fixed`],
/// and writes always emit 0x02. Firmware treats both codes as fixed-speed
/// variants, so the collapse is preserved for compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmMode {
    /// Fallback for raw codes outside the known table. Not writable.
    Unset,
    Fixed,
    Default,
    Quiet,
    Balanced,
    Performance,
    Custom,
}

impl PwmMode {
    /// Map a raw device mode code to the host enumeration.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0x02 | 0x04 => PwmMode::Fixed,
            0x06 => PwmMode::Default,
            0x08 => PwmMode::Quiet,
            0x0a => PwmMode::Balanced,
            0x0c => PwmMode::Performance,
            0x0e => PwmMode::Custom,
            _ => PwmMode::Unset,
        }
    }

    /// Inverse mapping for writes. `Unset` has no device code.
    pub fn to_raw(self) -> Option<u8> {
        match self {
            PwmMode::Unset => None,
            PwmMode::Fixed => Some(0x02),
            PwmMode::Default => Some(0x06),
            PwmMode::Quiet => Some(0x08),
            PwmMode::Balanced => Some(0x0a),
            PwmMode::Performance => Some(0x0c),
            PwmMode::Custom => Some(0x0e),
        }
    }

    /// Host-facing numeric value (0 = unset, 1..6 the named curves).
    pub const fn host_value(self) -> u8 {
        match self {
            PwmMode::Unset => 0,
            PwmMode::Fixed => 1,
            PwmMode::Default => 2,
            PwmMode::Quiet => 3,
            PwmMode::Balanced => 4,
            PwmMode::Performance => 5,
            PwmMode::Custom => 6,
        }
    }

    /// Parse the host-facing numeric value. Only 1..6 name writable curves.
    pub fn from_host_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(PwmMode::Fixed),
            2 => Some(PwmMode::Default),
            3 => Some(PwmMode::Quiet),
            4 => Some(PwmMode::Balanced),
            5 => Some(PwmMode::Performance),
            6 => Some(PwmMode::Custom),
            _ => None,
        }
    }
}

impl std::fmt::Display for PwmMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PwmMode::Unset => "Unset",
            PwmMode::Fixed => "Fixed",
            PwmMode::Default => "Default",
            PwmMode::Quiet => "Quiet",
            PwmMode::Balanced => "Balanced",
            PwmMode::Performance => "Performance",
            PwmMode::Custom => "Custom",
        };
        write!(f, "{} ({})", name, self.host_value())
    }
}

// =============================================================================
// LED and Profile Blocks
// =============================================================================

/// One 24-bit RGB value, packed `[r][g][b]` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl LedColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl std::fmt::Display for LedColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Number of static LED colors the device holds.
pub const LED_COLOR_SLOTS: usize = 4;

/// Points in the custom fan profile (RPM threshold -> duty).
pub const FAN_CURVE_POINTS: usize = 5;

/// Points in the LED temperature profile (temp threshold -> color).
pub const LED_TEMP_POINTS: usize = 3;

/// Custom fan profile: 5 RPM thresholds with matching duty values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanCurve {
    /// RPM thresholds, ascending.
    pub rpm: [u16; FAN_CURVE_POINTS],
    /// Duty values (0-255) applied at each threshold.
    pub duty: [u8; FAN_CURVE_POINTS],
}

impl FanCurve {
    /// Pack into the 15-byte wire payload (5 u16-LE RPM + 5 duty bytes).
    pub fn to_payload(&self) -> [u8; 15] {
        let mut buf = [0u8; 15];
        for (i, rpm) in self.rpm.iter().enumerate() {
            LittleEndian::write_u16(&mut buf[i * 2..i * 2 + 2], *rpm);
        }
        buf[10..15].copy_from_slice(&self.duty);
        buf
    }

    fn from_payload(payload: &[u8]) -> Self {
        let mut rpm = [0u16; FAN_CURVE_POINTS];
        for (i, slot) in rpm.iter_mut().enumerate() {
            *slot = LittleEndian::read_u16(&payload[i * 2..i * 2 + 2]);
        }
        let mut duty = [0u8; FAN_CURVE_POINTS];
        duty.copy_from_slice(&payload[10..15]);
        Self { rpm, duty }
    }
}

/// LED temperature profile: three temperature thresholds, each with a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedTempProfile {
    /// Temperature thresholds in whole degrees Celsius, ascending.
    pub temps: [u8; LED_TEMP_POINTS],
    pub colors: [LedColor; LED_TEMP_POINTS],
}

impl LedTempProfile {
    /// Pack into the 15-byte wire payload (3 u16-BE temps + 3 RGB triples).
    /// The high temperature byte is reserved and always zero.
    pub fn to_payload(&self) -> [u8; 15] {
        let mut buf = [0u8; 15];
        for (i, temp) in self.temps.iter().enumerate() {
            BigEndian::write_u16(&mut buf[i * 2..i * 2 + 2], *temp as u16);
        }
        for (i, color) in self.colors.iter().enumerate() {
            let at = 6 + i * 3;
            buf[at] = color.r;
            buf[at + 1] = color.g;
            buf[at + 2] = color.b;
        }
        buf
    }

    fn from_payload(payload: &[u8]) -> Self {
        let mut temps = [0u8; LED_TEMP_POINTS];
        for (i, slot) in temps.iter_mut().enumerate() {
            *slot = (BigEndian::read_u16(&payload[i * 2..i * 2 + 2]) & 0xff) as u8;
        }
        let mut colors = [LedColor::new(0, 0, 0); LED_TEMP_POINTS];
        for (i, slot) in colors.iter_mut().enumerate() {
            let at = 6 + i * 3;
            *slot = LedColor::new(payload[at], payload[at + 1], payload[at + 2]);
        }
        Self { temps, colors }
    }
}

/// Pack the 4 static LED colors into the 12-byte wire payload.
pub fn pack_led_colors(colors: &[LedColor; LED_COLOR_SLOTS]) -> [u8; 12] {
    let mut buf = [0u8; 12];
    for (i, color) in colors.iter().enumerate() {
        buf[i * 3] = color.r;
        buf[i * 3 + 1] = color.g;
        buf[i * 3 + 2] = color.b;
    }
    buf
}

fn unpack_led_colors(payload: &[u8]) -> [LedColor; LED_COLOR_SLOTS] {
    let mut colors = [LedColor::new(0, 0, 0); LED_COLOR_SLOTS];
    for (i, slot) in colors.iter_mut().enumerate() {
        *slot = LedColor::new(payload[i * 3], payload[i * 3 + 1], payload[i * 3 + 2]);
    }
    colors
}

// =============================================================================
// Field Lookup
// =============================================================================

fn find_field(frame: &Frame, tag: u8) -> Result<Field<'_>, ProtocolError> {
    frame::fields(frame)
        .find(|f| f.tag == tag)
        .ok_or(ProtocolError::MissingField { tag })
}

fn expect_ack(field: &Field<'_>) -> Result<(), ProtocolError> {
    if field.payload[0] != ACK {
        return Err(ProtocolError::UnexpectedAck {
            tag: field.tag,
            got: field.payload[0],
        });
    }
    Ok(())
}

/// Validate the echoed command-class acknowledgment (tag 0x06 or 0x08).
fn check_class_ack(frame: &Frame, class_tag: u8) -> Result<(), ProtocolError> {
    expect_ack(&find_field(frame, class_tag)?)
}

/// Validate every acknowledgment a write response must echo.
///
/// Each listed tag must be present with ack byte 0x06; a missing tag means
/// the exchange desynchronized before the device confirmed the write.
pub fn check_write_acks(frame: &Frame, tags: &[u8]) -> Result<(), ProtocolError> {
    for &tag in tags {
        expect_ack(&find_field(frame, tag)?)?;
    }
    Ok(())
}

// =============================================================================
// Identify / Info Accessors
// =============================================================================

/// Raw model code from the identify response (carried under tag 0x06).
pub fn read_model_id(frame: &Frame) -> Result<u8, ProtocolError> {
    Ok(find_field(frame, frame::TAG_TEMP_CLASS)?.payload[0])
}

/// Firmware version from the info response.
///
/// Byte 0 is the patch level; byte 1 packs major and minor with the
/// firmware's own arithmetic (`major = b / 0x0F`, `minor = b % 0x10`),
/// kept exactly as the device defines it. Byte 2 is reserved.
pub fn read_version(frame: &Frame) -> Result<FirmwareVersion, ProtocolError> {
    let field = find_field(frame, frame::TAG_FIRMWARE)?;
    let packed = field.payload[1];
    Ok(FirmwareVersion {
        major: packed / 0x0F,
        minor: packed % 0x10,
        patch: field.payload[0],
    })
}

/// Device name: 8 ASCII bytes, NUL padded.
pub fn read_name(frame: &Frame) -> Result<String, ProtocolError> {
    let field = find_field(frame, frame::TAG_NAME)?;
    let end = field
        .payload
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(field.payload.len());
    Ok(String::from_utf8_lossy(&field.payload[..end])
        .trim_end()
        .to_string())
}

/// Sensor, fan and LED counts from the info response.
pub fn read_counts(frame: &Frame) -> Result<(u8, u8, u8), ProtocolError> {
    let temps = find_field(frame, frame::TAG_TEMP_COUNT)?.payload[0];
    let fans = find_field(frame, frame::TAG_FAN_COUNT)?.payload[0];
    let leds = find_field(frame, frame::TAG_TEMP_CLASS)?.payload[0];
    Ok((temps, fans, leds))
}

// =============================================================================
// Sensor / Fan Accessors
// =============================================================================

/// Temperature in millidegrees Celsius.
///
/// Scaling: `raw * 1000 / 256`, raw being the u16-LE field payload.
pub fn read_temperature(frame: &Frame) -> Result<u32, ProtocolError> {
    check_class_ack(frame, frame::TAG_TEMP_CLASS)?;
    let field = find_field(frame, frame::TAG_TEMP_READ)?;
    let raw = LittleEndian::read_u16(field.payload) as u32;
    Ok(raw * 1000 / 256)
}

/// Fan speed in RPM (raw u16-LE, unscaled).
pub fn read_rpm(frame: &Frame) -> Result<u16, ProtocolError> {
    check_class_ack(frame, frame::TAG_FAN_CLASS)?;
    let field = find_field(frame, frame::TAG_RPM_READ)?;
    Ok(LittleEndian::read_u16(field.payload))
}

/// PWM duty, 0-255.
pub fn read_duty(frame: &Frame) -> Result<u8, ProtocolError> {
    check_class_ack(frame, frame::TAG_FAN_CLASS)?;
    Ok(find_field(frame, frame::TAG_DUTY_READ)?.payload[0])
}

/// PWM mode, mapped from the raw device code.
pub fn read_pwm_mode(frame: &Frame) -> Result<PwmMode, ProtocolError> {
    check_class_ack(frame, frame::TAG_FAN_CLASS)?;
    let raw = find_field(frame, frame::TAG_MODE_READ)?.payload[0];
    Ok(PwmMode::from_raw(raw))
}

// =============================================================================
// LED / Profile Accessors
// =============================================================================

/// LED lighting mode, 0..=0xcf.
pub fn read_led_mode(frame: &Frame) -> Result<u8, ProtocolError> {
    Ok(find_field(frame, frame::TAG_LED_MODE_READ)?.payload[0])
}

/// The 4 static LED colors.
pub fn read_led_colors(frame: &Frame) -> Result<[LedColor; LED_COLOR_SLOTS], ProtocolError> {
    let field = find_field(frame, frame::TAG_LED_COLORS_READ)?;
    Ok(unpack_led_colors(field.payload))
}

/// The custom fan profile block.
pub fn read_fan_curve(frame: &Frame) -> Result<FanCurve, ProtocolError> {
    let field = find_field(frame, frame::TAG_FAN_CURVE_READ)?;
    Ok(FanCurve::from_payload(field.payload))
}

/// The LED temperature profile block.
pub fn read_led_temp_profile(frame: &Frame) -> Result<LedTempProfile, ProtocolError> {
    let field = find_field(frame, frame::TAG_LED_TEMP_READ)?;
    Ok(LedTempProfile::from_payload(field.payload))
}

/// The external temperature override (u16 BE, unit left to the caller).
pub fn read_external_temp(frame: &Frame) -> Result<u16, ProtocolError> {
    let field = find_field(frame, frame::TAG_EXT_TEMP_READ)?;
    Ok(BigEndian::read_u16(field.payload))
}

/// Pack an external temperature override for writing.
pub fn pack_external_temp(temp: u16) -> [u8; 2] {
    let mut buf = [0u8; 2];
    BigEndian::write_u16(&mut buf, temp);
    buf
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::frame::{SubCommand, encode};

    fn response(subs: &[SubCommand<'_>]) -> Frame {
        encode(subs).unwrap()
    }

    #[test]
    fn test_temperature_scaling() {
        // raw 0x1900 (high 0x19, low 0x00) -> 25.000 degC
        let frame = response(&[
            SubCommand::new(frame::TAG_TEMP_CLASS, &[ACK]),
            SubCommand::new(frame::TAG_TEMP_READ, &[0x00, 0x19]),
        ]);
        assert_eq!(read_temperature(&frame).unwrap(), 25_000);
    }

    #[test]
    fn test_rpm_little_endian() {
        let frame = response(&[
            SubCommand::new(frame::TAG_FAN_CLASS, &[ACK]),
            SubCommand::new(frame::TAG_RPM_READ, &[0xB0, 0x04]),
        ]);
        assert_eq!(read_rpm(&frame).unwrap(), 1200);
    }

    #[test]
    fn test_unexpected_ack_byte() {
        let frame = response(&[
            SubCommand::new(frame::TAG_FAN_CLASS, &[0x07]),
            SubCommand::new(frame::TAG_RPM_READ, &[0xB0, 0x04]),
        ]);
        assert!(matches!(
            read_rpm(&frame),
            Err(ProtocolError::UnexpectedAck { tag: 0x08, got: 0x07 })
        ));
    }

    #[test]
    fn test_missing_field() {
        let frame = response(&[SubCommand::new(frame::TAG_FAN_CLASS, &[ACK])]);
        assert!(matches!(
            read_rpm(&frame),
            Err(ProtocolError::MissingField { tag: 0x09 })
        ));
    }

    #[test]
    fn test_pwm_mode_mapping_is_lossy() {
        // Raw 0x04 collapses onto Fixed; the round trip re-emits 0x02,
        // not 0x04. This loss is deliberate.
        let mode = PwmMode::from_raw(0x04);
        assert_eq!(mode, PwmMode::Fixed);
        assert_eq!(mode.to_raw(), Some(0x02));
        assert_ne!(mode.to_raw(), Some(0x04));
    }

    #[test]
    fn test_pwm_mode_table() {
        assert_eq!(PwmMode::from_raw(0x06), PwmMode::Default);
        assert_eq!(PwmMode::from_raw(0x0e), PwmMode::Custom);
        assert_eq!(PwmMode::from_raw(0x42), PwmMode::Unset);
        assert_eq!(PwmMode::Unset.to_raw(), None);
        for host in 1..=6u8 {
            let mode = PwmMode::from_host_value(host).unwrap();
            assert_eq!(mode.host_value(), host);
        }
        assert!(PwmMode::from_host_value(0).is_none());
        assert!(PwmMode::from_host_value(7).is_none());
    }

    #[test]
    fn test_version_packing() {
        // patch=3, packed=18: 18 / 0x0F = 1, 18 % 0x10 = 2 -> 1.2.3
        let frame = response(&[SubCommand::new(frame::TAG_FIRMWARE, &[3, 18, 0])]);
        let version = read_version(&frame).unwrap();
        assert_eq!((version.major, version.minor, version.patch), (1, 2, 3));
        assert_eq!(version.to_string(), "1.2.3");
    }

    #[test]
    fn test_name_trims_padding() {
        let frame = response(&[SubCommand::new(frame::TAG_NAME, b"H110i\0\0\0")]);
        assert_eq!(read_name(&frame).unwrap(), "H110i");
    }

    #[test]
    fn test_counts() {
        let frame = response(&[
            SubCommand::new(frame::TAG_TEMP_COUNT, &[2]),
            SubCommand::new(frame::TAG_FAN_COUNT, &[3]),
            SubCommand::new(frame::TAG_TEMP_CLASS, &[4]),
        ]);
        assert_eq!(read_counts(&frame).unwrap(), (2, 3, 4));
    }

    #[test]
    fn test_fan_curve_payload_round_trip() {
        let curve = FanCurve {
            rpm: [600, 900, 1200, 1500, 2000],
            duty: [40, 80, 130, 190, 255],
        };
        let payload = curve.to_payload();
        assert_eq!(FanCurve::from_payload(&payload), curve);
        // RPM thresholds are little-endian on the wire.
        assert_eq!(&payload[0..2], &[0x58, 0x02]);
    }

    #[test]
    fn test_led_temp_profile_payload() {
        let profile = LedTempProfile {
            temps: [30, 40, 50],
            colors: [
                LedColor::new(0, 255, 0),
                LedColor::new(255, 255, 0),
                LedColor::new(255, 0, 0),
            ],
        };
        let payload = profile.to_payload();
        // Temps are big-endian with a reserved zero high byte.
        assert_eq!(&payload[0..2], &[0x00, 30]);
        assert_eq!(LedTempProfile::from_payload(&payload), profile);
    }

    #[test]
    fn test_led_colors_packing() {
        let colors = [
            LedColor::new(255, 0, 0),
            LedColor::new(0, 255, 0),
            LedColor::new(0, 0, 255),
            LedColor::new(16, 32, 48),
        ];
        let payload = pack_led_colors(&colors);
        assert_eq!(&payload[0..3], &[255, 0, 0]);
        assert_eq!(unpack_led_colors(&payload), colors);
    }

    #[test]
    fn test_external_temp_big_endian() {
        let frame = response(&[SubCommand::new(frame::TAG_EXT_TEMP_READ, &[0x00, 0x28])]);
        assert_eq!(read_external_temp(&frame).unwrap(), 40);
        assert_eq!(pack_external_temp(40), [0x00, 0x28]);
    }

    #[test]
    fn test_write_acks() {
        let frame = response(&[
            SubCommand::new(frame::TAG_FAN_CLASS, &[ACK]),
            SubCommand::new(frame::TAG_DUTY_WRITE, &[ACK]),
        ]);
        assert!(check_write_acks(&frame, &[frame::TAG_FAN_CLASS, frame::TAG_DUTY_WRITE]).is_ok());

        let bad = response(&[
            SubCommand::new(frame::TAG_FAN_CLASS, &[ACK]),
            SubCommand::new(frame::TAG_DUTY_WRITE, &[0x01]),
        ]);
        assert!(matches!(
            check_write_acks(&bad, &[frame::TAG_FAN_CLASS, frame::TAG_DUTY_WRITE]),
            Err(ProtocolError::UnexpectedAck { tag: 0x0b, got: 0x01 })
        ));
    }
}
