//! Built-in profiles for Hydro coolers.
//!
//! Pre-defined fan curves and LED schemes the CLI can apply directly;
//! user-defined ones live in [`crate::storage`].

use crate::error::{HydroError, Result};
use crate::protocol::fields::{FanCurve, LED_COLOR_SLOTS, LedColor, LedTempProfile};

// =============================================================================
// Fan Curve Presets
// =============================================================================

/// Pre-defined custom fan profile.
#[derive(Debug, Clone, PartialEq)]
pub enum CurvePreset {
    /// Low duty until the coolant warms up; quiet under light load.
    Silent,
    /// Middle ground between noise and cooling.
    Balanced,
    /// Aggressive ramp, full duty early.
    Performance,
    /// User-supplied curve.
    Custom(FanCurve),
}

impl CurvePreset {
    /// Resolve this preset to a device-writable curve.
    pub fn to_fan_curve(&self) -> FanCurve {
        match self {
            CurvePreset::Silent => CURVE_SILENT,
            CurvePreset::Balanced => CURVE_BALANCED,
            CurvePreset::Performance => CURVE_PERFORMANCE,
            CurvePreset::Custom(curve) => *curve,
        }
    }

    /// Parse a preset name. `custom` is not parseable here; it comes from
    /// explicit curve points on the command line.
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "silent" => Ok(CurvePreset::Silent),
            "balanced" => Ok(CurvePreset::Balanced),
            "performance" => Ok(CurvePreset::Performance),
            _ => Err(HydroError::InvalidArgument(format!(
                "Unknown curve preset '{}'. Use: silent, balanced, performance",
                name
            ))),
        }
    }
}

/// Silent curve: fans stay slow until the loop is clearly warm.
pub const CURVE_SILENT: FanCurve = FanCurve {
    rpm: [600, 800, 1000, 1300, 1700],
    duty: [40, 70, 110, 170, 255],
};

/// Balanced curve.
pub const CURVE_BALANCED: FanCurve = FanCurve {
    rpm: [800, 1000, 1300, 1600, 2000],
    duty: [70, 110, 150, 200, 255],
};

/// Performance curve: full duty early.
pub const CURVE_PERFORMANCE: FanCurve = FanCurve {
    rpm: [1000, 1400, 1800, 2200, 2500],
    duty: [120, 170, 210, 240, 255],
};

// =============================================================================
// LED Presets
// =============================================================================

/// LED lighting configuration: a mode plus the 4 static colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedPreset {
    pub mode: u8,
    pub colors: [LedColor; LED_COLOR_SLOTS],
}

impl LedPreset {
    pub const WHITE: Self = Self {
        mode: 0x00,
        colors: [LedColor::new(255, 255, 255); LED_COLOR_SLOTS],
    };

    pub const CORSAIR_YELLOW: Self = Self {
        mode: 0x00,
        colors: [LedColor::new(255, 200, 0); LED_COLOR_SLOTS],
    };

    /// Four-color cycle through the slots.
    pub const CYCLE: Self = Self {
        mode: 0x80,
        colors: [
            LedColor::new(255, 0, 0),
            LedColor::new(0, 255, 0),
            LedColor::new(0, 0, 255),
            LedColor::new(255, 255, 255),
        ],
    };

    /// Parse a built-in scheme name.
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "white" => Ok(Self::WHITE),
            "corsair" => Ok(Self::CORSAIR_YELLOW),
            "cycle" => Ok(Self::CYCLE),
            _ => Err(HydroError::InvalidArgument(format!(
                "Unknown LED preset '{}'. Use: white, corsair, cycle",
                name
            ))),
        }
    }
}

/// Default LED temperature profile: green, amber, red as the loop heats up.
pub const LED_TEMP_DEFAULT: LedTempProfile = LedTempProfile {
    temps: [30, 40, 50],
    colors: [
        LedColor::new(0, 255, 0),
        LedColor::new(255, 160, 0),
        LedColor::new(255, 0, 0),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_parse() {
        assert_eq!(CurvePreset::parse("silent").unwrap(), CurvePreset::Silent);
        assert_eq!(
            CurvePreset::parse("PERFORMANCE").unwrap(),
            CurvePreset::Performance
        );
        assert!(CurvePreset::parse("turbo").is_err());
    }

    #[test]
    fn test_led_preset_parse() {
        assert_eq!(LedPreset::parse("white").unwrap(), LedPreset::WHITE);
        assert_eq!(LedPreset::parse("Cycle").unwrap(), LedPreset::CYCLE);
        assert!(LedPreset::parse("rainbow").is_err());
    }

    #[test]
    fn test_presets_are_monotonic() {
        for preset in [
            CurvePreset::Silent,
            CurvePreset::Balanced,
            CurvePreset::Performance,
        ] {
            let curve = preset.to_fan_curve();
            assert!(curve.rpm.windows(2).all(|w| w[0] < w[1]));
            assert!(curve.duty.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
