//! Parsing utilities for CLI arguments.
//!
//! Reusable parsers for the value formats the CLI accepts: hex colors,
//! fan-curve point lists, and LED temperature profiles.

use crate::config::CurvePreset;
use crate::error::{HydroError, Result};
use crate::protocol::fields::{
    FAN_CURVE_POINTS, FanCurve, LED_COLOR_SLOTS, LED_TEMP_POINTS, LedColor, LedTempProfile,
};

// =============================================================================
// Color Parsing
// =============================================================================

/// Parse a hex color string into an [`LedColor`].
///
/// Accepts formats: `#RRGGBB` or `RRGGBB`
///
/// # Example
/// ```
/// use corsair_hydro_rust::utils::parsing::parse_hex_color;
///
/// let color = parse_hex_color("#FF5500").unwrap();
/// assert_eq!((color.r, color.g, color.b), (255, 85, 0));
/// ```
pub fn parse_hex_color(hex: &str) -> Result<LedColor> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(HydroError::InvalidArgument(format!(
            "Invalid color hex: {}",
            hex
        )));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map_err(|_| HydroError::InvalidArgument(format!("Invalid color hex: {}", hex)))
    };
    Ok(LedColor::new(
        channel(0..2)?,
        channel(2..4)?,
        channel(4..6)?,
    ))
}

/// Parse the 4 static LED colors from a comma-separated list of hex values.
pub fn parse_led_colors(spec: &str) -> Result<[LedColor; LED_COLOR_SLOTS]> {
    let parts: Vec<&str> = spec.split(',').map(str::trim).collect();
    if parts.len() != LED_COLOR_SLOTS {
        return Err(HydroError::InvalidArgument(format!(
            "Expected {} comma-separated colors, got {}",
            LED_COLOR_SLOTS,
            parts.len()
        )));
    }
    let mut colors = [LedColor::new(0, 0, 0); LED_COLOR_SLOTS];
    for (slot, part) in colors.iter_mut().zip(&parts) {
        *slot = parse_hex_color(part)?;
    }
    Ok(colors)
}

// =============================================================================
// Fan Curve Parsing
// =============================================================================

/// Parse a fan curve from five `rpm:duty` points.
///
/// # Example
/// ```
/// use corsair_hydro_rust::utils::parsing::parse_fan_curve;
///
/// let curve = parse_fan_curve("600:40,900:80,1200:130,1500:190,2000:255").unwrap();
/// assert_eq!(curve.rpm[0], 600);
/// assert_eq!(curve.duty[4], 255);
/// ```
pub fn parse_fan_curve(spec: &str) -> Result<FanCurve> {
    let parts: Vec<&str> = spec.split(',').map(str::trim).collect();
    if parts.len() != FAN_CURVE_POINTS {
        return Err(HydroError::InvalidArgument(format!(
            "Expected {} rpm:duty points, got {}",
            FAN_CURVE_POINTS,
            parts.len()
        )));
    }

    let mut rpm = [0u16; FAN_CURVE_POINTS];
    let mut duty = [0u8; FAN_CURVE_POINTS];
    for (i, part) in parts.iter().enumerate() {
        let (rpm_str, duty_str) = part.split_once(':').ok_or_else(|| {
            HydroError::InvalidArgument(format!("Point '{}' is not in rpm:duty form", part))
        })?;
        rpm[i] = rpm_str.parse().map_err(|_| {
            HydroError::InvalidArgument(format!("Invalid RPM value '{}'", rpm_str))
        })?;
        duty[i] = duty_str.parse().map_err(|_| {
            HydroError::InvalidArgument(format!("Invalid duty value '{}' (0-255)", duty_str))
        })?;
    }

    Ok(FanCurve { rpm, duty })
}

/// Parse a curve preset name or an explicit point list.
pub fn parse_curve_spec(spec: &str) -> Result<CurvePreset> {
    if spec.contains(':') {
        Ok(CurvePreset::Custom(parse_fan_curve(spec)?))
    } else {
        CurvePreset::parse(spec)
    }
}

// =============================================================================
// LED Temperature Profile Parsing
// =============================================================================

/// Parse an LED temperature profile from three `temp:color` points,
/// e.g. `30:#00FF00,40:#FFA000,50:#FF0000`.
pub fn parse_led_temp_profile(spec: &str) -> Result<LedTempProfile> {
    let parts: Vec<&str> = spec.split(',').map(str::trim).collect();
    if parts.len() != LED_TEMP_POINTS {
        return Err(HydroError::InvalidArgument(format!(
            "Expected {} temp:color points, got {}",
            LED_TEMP_POINTS,
            parts.len()
        )));
    }

    let mut temps = [0u8; LED_TEMP_POINTS];
    let mut colors = [LedColor::new(0, 0, 0); LED_TEMP_POINTS];
    for (i, part) in parts.iter().enumerate() {
        let (temp_str, color_str) = part.split_once(':').ok_or_else(|| {
            HydroError::InvalidArgument(format!("Point '{}' is not in temp:color form", part))
        })?;
        temps[i] = temp_str.parse().map_err(|_| {
            HydroError::InvalidArgument(format!("Invalid temperature '{}'", temp_str))
        })?;
        colors[i] = parse_hex_color(color_str)?;
    }

    Ok(LedTempProfile { temps, colors })
}

// =============================================================================
// Tests
// =============================================================================
