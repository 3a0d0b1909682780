//! 64-byte frame codec for the Hydro HID protocol.
//!
//! Every exchange is one fixed 64-byte frame in each direction. A frame
//! carries a one-byte length header followed by one or more sub-commands,
//! each `[tag][payload]`, zero-padded to the full report length. Zero acts
//! both as padding and as the response-stream terminator.

use crate::error::ProtocolError;

// =============================================================================
// Constants
// =============================================================================

/// HID report length for reads and writes.
pub const FRAME_LENGTH: usize = 64;

/// Corsair Vendor ID.
pub const CORSAIR_VID: u16 = 0x1B1C;

/// Hydro series (H80i/H100i/H110i) Product ID.
pub const HYDRO_PID: u16 = 0x0C04;

/// One 64-byte frame, either direction.
pub type Frame = [u8; FRAME_LENGTH];

// =============================================================================
// Tags
// =============================================================================

/// Identify device; the response echoes the model code under [`TAG_TEMP_CLASS`].
pub const TAG_IDENTIFY: u8 = 0x01;
/// Firmware version (response: patch byte + packed major/minor + reserved).
pub const TAG_FIRMWARE: u8 = 0x02;
/// Device name, 8 ASCII bytes.
pub const TAG_NAME: u8 = 0x03;
/// Temperature-sensor count.
pub const TAG_TEMP_COUNT: u8 = 0x04;
/// Fan count.
pub const TAG_FAN_COUNT: u8 = 0x05;
/// Command class for the temperature family; doubles as the LED count in the
/// identify/info stream.
pub const TAG_TEMP_CLASS: u8 = 0x06;
/// Request: select sensor index. Response: raw temperature, u16 LE.
pub const TAG_TEMP_READ: u8 = 0x07;
/// Command class for the fan/PWM family.
pub const TAG_FAN_CLASS: u8 = 0x08;
/// Request: select fan index. Response: RPM, u16 LE.
pub const TAG_RPM_READ: u8 = 0x09;
/// PWM duty read (0-255).
pub const TAG_DUTY_READ: u8 = 0x0a;
/// PWM duty write; response is an ack echo.
pub const TAG_DUTY_WRITE: u8 = 0x0b;
/// PWM mode raw-code read.
pub const TAG_MODE_READ: u8 = 0x0c;
/// PWM mode raw-code write; response is an ack echo.
pub const TAG_MODE_WRITE: u8 = 0x0d;
/// LED mode read (one byte, 0..=0xcf).
pub const TAG_LED_MODE_READ: u8 = 0x0e;
/// LED mode write; ack echo.
pub const TAG_LED_MODE_WRITE: u8 = 0x0f;
/// LED static colors read (4 RGB triples, 12 bytes).
pub const TAG_LED_COLORS_READ: u8 = 0x10;
/// LED static colors write; ack echo.
pub const TAG_LED_COLORS_WRITE: u8 = 0x11;
/// Custom fan profile read (5 u16-LE RPM thresholds + 5 duty bytes).
pub const TAG_FAN_CURVE_READ: u8 = 0x12;
/// Custom fan profile write; ack echo.
pub const TAG_FAN_CURVE_WRITE: u8 = 0x13;
/// LED temperature profile read (3 u16-BE temps + 3 RGB triples).
pub const TAG_LED_TEMP_READ: u8 = 0x14;
/// LED temperature profile write; ack echo.
pub const TAG_LED_TEMP_WRITE: u8 = 0x15;
/// External temperature override read (u16 BE).
pub const TAG_EXT_TEMP_READ: u8 = 0x16;
/// External temperature override write; ack echo.
pub const TAG_EXT_TEMP_WRITE: u8 = 0x17;

/// Acknowledgment byte echoed by the device for class and write tags.
pub const ACK: u8 = 0x06;

/// Response payload width for a tag, or `None` for tags this driver does
/// not know. Widths are fixed per tag; the stream is not self-describing.
pub fn response_payload_width(tag: u8) -> Option<usize> {
    match tag {
        TAG_IDENTIFY => Some(0),
        TAG_FIRMWARE => Some(3),
        TAG_NAME => Some(8),
        TAG_TEMP_COUNT | TAG_FAN_COUNT | TAG_TEMP_CLASS => Some(1),
        TAG_TEMP_READ | TAG_RPM_READ => Some(2),
        TAG_FAN_CLASS | TAG_DUTY_READ | TAG_DUTY_WRITE => Some(1),
        TAG_MODE_READ | TAG_MODE_WRITE => Some(1),
        TAG_LED_MODE_READ | TAG_LED_MODE_WRITE => Some(1),
        TAG_LED_COLORS_READ => Some(12),
        TAG_LED_COLORS_WRITE => Some(1),
        TAG_FAN_CURVE_READ | TAG_LED_TEMP_READ => Some(15),
        TAG_FAN_CURVE_WRITE | TAG_LED_TEMP_WRITE => Some(1),
        TAG_EXT_TEMP_READ => Some(2),
        TAG_EXT_TEMP_WRITE => Some(1),
        _ => None,
    }
}

// =============================================================================
// Encoding
// =============================================================================

/// One `[tag][payload]` unit packed into a request frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubCommand<'a> {
    pub tag: u8,
    pub payload: &'a [u8],
}

impl<'a> SubCommand<'a> {
    pub const fn new(tag: u8, payload: &'a [u8]) -> Self {
        Self { tag, payload }
    }

    /// Encoded size in bytes (tag + payload).
    pub fn encoded_len(&self) -> usize {
        1 + self.payload.len()
    }
}

/// Build a command frame from an ordered sequence of sub-commands.
///
/// Writes the one-byte length header, the concatenated sub-commands, and
/// zero padding up to 64 bytes.
///
/// # Errors
/// `FrameOverflow` if the sub-commands total more than 63 bytes, leaving
/// no room for the header. Nothing is ever silently truncated.
pub fn encode(subcommands: &[SubCommand<'_>]) -> Result<Frame, ProtocolError> {
    let len: usize = subcommands.iter().map(SubCommand::encoded_len).sum();
    if len > FRAME_LENGTH - 1 {
        return Err(ProtocolError::FrameOverflow { len });
    }

    let mut buf = [0u8; FRAME_LENGTH];
    buf[0] = len as u8;
    let mut cursor = 1;
    for sub in subcommands {
        buf[cursor] = sub.tag;
        cursor += 1;
        buf[cursor..cursor + sub.payload.len()].copy_from_slice(sub.payload);
        cursor += sub.payload.len();
    }

    Ok(buf)
}

// =============================================================================
// Decoding
// =============================================================================

/// One `[tag][payload]` unit decoded from a response frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    pub tag: u8,
    pub payload: &'a [u8],
}

/// Lazy, single-pass iterator over the fields of a response frame.
///
/// Stops at a zero tag byte, at the end of the buffer, or when the
/// declared payload would read past byte 63. A tag with no known payload
/// width is skipped one byte at a time until a known tag resynchronizes
/// the walk. Malformed input exhausts the iterator; it never panics.
pub struct Fields<'a> {
    buf: &'a Frame,
    cursor: usize,
}

/// Iterate the fields of a response frame.
///
/// The length header at byte 0 is skipped; termination relies on the zero
/// tag byte and the end of the buffer. A legitimate zero payload byte that
/// lands where a tag is expected is indistinguishable from the terminator;
/// that is a fragility of the wire protocol itself, inherited here.
pub fn fields(frame: &Frame) -> Fields<'_> {
    Fields {
        buf: frame,
        cursor: 1,
    }
}

impl<'a> Iterator for Fields<'a> {
    type Item = Field<'a>;

    fn next(&mut self) -> Option<Field<'a>> {
        loop {
            if self.cursor >= FRAME_LENGTH {
                return None;
            }
            let tag = self.buf[self.cursor];
            if tag == 0 {
                self.cursor = FRAME_LENGTH;
                return None;
            }
            let Some(width) = response_payload_width(tag) else {
                // Unknown tag: skip one byte and resync on the next.
                self.cursor += 1;
                continue;
            };
            let start = self.cursor + 1;
            if start + width > FRAME_LENGTH {
                self.cursor = FRAME_LENGTH;
                return None;
            }
            self.cursor = start + width;
            return Some(Field {
                tag,
                payload: &self.buf[start..start + width],
            });
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
