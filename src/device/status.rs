//! Aggregated device status with a display table.

use crate::device::hydro::HydroDevice;
use crate::error::Result;
use crate::protocol::fields::PwmMode;
use crate::transport::Transport;

/// One fan's readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanStatus {
    pub rpm: u16,
    /// PWM duty, 0-255.
    pub duty: u8,
    pub mode: PwmMode,
}

/// A snapshot of every sensor and fan the descriptor advertises.
#[derive(Debug, Clone, PartialEq)]
pub struct HydroStatus {
    /// Temperatures in millidegrees Celsius, one per sensor.
    pub temps_milli_c: Vec<u32>,
    pub fans: Vec<FanStatus>,
}

impl<T: Transport> HydroDevice<T> {
    /// Read every temperature sensor and fan in descriptor order.
    ///
    /// Exchanges run one after another; a failure on any endpoint aborts
    /// the snapshot.
    pub fn status(&self) -> Result<HydroStatus> {
        let descriptor = self.descriptor();

        let mut temps_milli_c = Vec::with_capacity(descriptor.temp_sensor_count as usize);
        for i in 0..descriptor.temp_sensor_count {
            temps_milli_c.push(self.read_temperature(i)?);
        }

        let mut fans = Vec::with_capacity(descriptor.fan_count as usize);
        for i in 0..descriptor.fan_count {
            fans.push(FanStatus {
                rpm: self.read_fan_rpm(i)?,
                duty: self.read_pwm_duty(i)?,
                mode: self.read_pwm_mode(i)?,
            });
        }

        Ok(HydroStatus {
            temps_milli_c,
            fans,
        })
    }
}

impl std::fmt::Display for HydroStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Wide enough for the longest mode name, "Performance (5)".
        const INNER: usize = 46;
        let border = format!("+{}+", "-".repeat(INNER));

        writeln!(f, "{}", border)?;
        writeln!(f, "|{:^INNER$}|", "Corsair Hydro Status")?;
        writeln!(f, "{}", border)?;
        for (i, milli_c) in self.temps_milli_c.iter().enumerate() {
            let line = format!("  Temp {}:  {:>7.3} C", i + 1, *milli_c as f64 / 1000.0);
            writeln!(f, "|{:<INNER$}|", line)?;
        }
        writeln!(f, "{}", border)?;
        for (i, fan) in self.fans.iter().enumerate() {
            let line = format!(
                "  Fan {}: {:>5} RPM  duty {:>3}  {}",
                i + 1,
                fan.rpm,
                fan.duty,
                fan.mode
            );
            writeln!(f, "|{:<INNER$}|", line)?;
        }
        writeln!(f, "{}", border)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_contains_readings() {
        let status = HydroStatus {
            temps_milli_c: vec![25_000, 31_500],
            fans: vec![FanStatus {
                rpm: 1200,
                duty: 128,
                mode: PwmMode::Balanced,
            }],
        };
        let text = status.to_string();
        assert!(text.contains("25.000"));
        assert!(text.contains("31.500"));
        assert!(text.contains("1200"));
        assert!(text.contains("Balanced"));
    }

    #[test]
    fn test_status_display_box_stays_aligned() {
        // The longest mode names must not push past the right border.
        let status = HydroStatus {
            temps_milli_c: vec![25_000],
            fans: vec![
                FanStatus {
                    rpm: 2500,
                    duty: 255,
                    mode: PwmMode::Performance,
                },
                FanStatus {
                    rpm: 800,
                    duty: 90,
                    mode: PwmMode::Custom,
                },
            ],
        };
        let text = status.to_string();
        let widths: Vec<usize> = text.lines().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|&w| w == widths[0]), "{:?}", widths);
        assert!(text.lines().all(|l| l.ends_with('+') || l.ends_with('|')));
        assert!(text.contains("Performance (5)"));
    }
}
