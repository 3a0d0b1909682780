//! Corsair Hydro Control CLI
//!
//! Command-line interface for monitoring and controlling Corsair Hydro
//! series liquid coolers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use corsair_hydro_rust::config::{LED_TEMP_DEFAULT, LedPreset};
use corsair_hydro_rust::device::HydroDevice;
use corsair_hydro_rust::protocol::PwmMode;
use corsair_hydro_rust::storage::{LedScheme, ProfileStore};
use corsair_hydro_rust::utils::parsing::{
    parse_curve_spec, parse_led_colors, parse_led_temp_profile,
};
use corsair_hydro_rust::utils::sensors::SystemSensors;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Corsair Hydro Control Tool
#[derive(Parser, Debug)]
#[command(name = "corsair-hydro-cli")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List connected Hydro coolers
    List,

    /// Show device identity and capabilities
    Info,

    /// Show current readings for every sensor and fan
    Status,

    /// Continuously monitor device status
    Monitor {
        /// Update interval in seconds
        #[arg(short = 'n', long, default_value = "2")]
        interval: u64,
    },

    /// Read one temperature sensor
    Temp {
        /// Zero-based sensor index
        index: u8,
    },

    /// Read one fan (RPM, duty, mode)
    Fan {
        /// Zero-based fan index
        index: u8,
    },

    /// Set a fan's PWM duty
    SetDuty {
        /// Zero-based fan index
        index: u8,
        /// Duty value (0-255)
        duty: u8,
    },

    /// Set a fan's PWM mode
    SetMode {
        /// Zero-based fan index
        index: u8,
        /// Mode (1=Fixed, 2=Default, 3=Quiet, 4=Balanced, 5=Performance, 6=Custom)
        #[arg(value_parser = clap::value_parser!(u8).range(1..=6))]
        mode: u8,
    },

    /// Show the LED lighting mode
    LedMode,

    /// Set the LED lighting mode
    SetLedMode {
        /// Mode code (0-207)
        #[arg(value_parser = clap::value_parser!(u8).range(0..=0xcf))]
        mode: u8,
    },

    /// Show the 4 static LED colors
    LedColors,

    /// Set the 4 static LED colors
    SetLedColors {
        /// Comma-separated hex colors, e.g. "#FF0000,#00FF00,#0000FF,#FFFFFF"
        colors: String,
    },

    /// Apply a built-in LED scheme (mode + colors)
    SetLedPreset {
        /// Preset name (white, corsair, cycle)
        name: String,
    },

    /// Show the custom fan profile
    FanCurve,

    /// Write the custom fan profile
    SetFanCurve {
        /// Preset (silent, balanced, performance) or five rpm:duty points,
        /// e.g. "600:40,900:80,1200:130,1500:190,2000:255"
        spec: String,
    },

    /// Show the LED temperature profile
    LedTempProfile,

    /// Write the LED temperature profile
    SetLedTempProfile {
        /// "default" or three temp:color points, e.g. "30:#00FF00,40:#FFA000,50:#FF0000"
        spec: String,
    },

    /// Show the external temperature override
    ExtTemp,

    /// Set the external temperature override
    SetExtTemp {
        /// Temperature in whole degrees Celsius
        temp: u16,
    },

    /// List host temperature sensors visible to sync-temp
    Sensors,

    /// Continuously push the host CPU temperature into the override
    SyncTemp {
        /// Update interval in seconds
        #[arg(short = 'n', long, default_value = "2")]
        interval: u64,
    },

    /// Manage saved profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand, Debug)]
enum ProfileAction {
    /// List saved profiles
    List,

    /// Save a fan curve under a name
    SaveCurve { name: String, spec: String },

    /// Apply a saved fan curve
    ApplyCurve { name: String },

    /// Save an LED scheme (mode + colors) under a name
    SaveLed {
        name: String,
        #[arg(value_parser = clap::value_parser!(u8).range(0..=0xcf))]
        mode: u8,
        colors: String,
    },

    /// Apply a saved LED scheme
    ApplyLed { name: String },
}

// =============================================================================
// Main
// =============================================================================

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::List => cmd_list(),
        Command::Info => cmd_info(),
        Command::Status => cmd_status(),
        Command::Monitor { interval } => cmd_monitor(interval),
        Command::Temp { index } => cmd_temp(index),
        Command::Fan { index } => cmd_fan(index),
        Command::SetDuty { index, duty } => cmd_set_duty(index, duty),
        Command::SetMode { index, mode } => cmd_set_mode(index, mode),
        Command::LedMode => cmd_led_mode(),
        Command::SetLedMode { mode } => cmd_set_led_mode(mode),
        Command::LedColors => cmd_led_colors(),
        Command::SetLedColors { colors } => cmd_set_led_colors(&colors),
        Command::SetLedPreset { name } => cmd_set_led_preset(&name),
        Command::FanCurve => cmd_fan_curve(),
        Command::SetFanCurve { spec } => cmd_set_fan_curve(&spec),
        Command::LedTempProfile => cmd_led_temp_profile(),
        Command::SetLedTempProfile { spec } => cmd_set_led_temp_profile(&spec),
        Command::ExtTemp => cmd_ext_temp(),
        Command::SetExtTemp { temp } => cmd_set_ext_temp(temp),
        Command::Sensors => cmd_sensors(),
        Command::SyncTemp { interval } => cmd_sync_temp(interval),
        Command::Profile { action } => cmd_profile(action),
    }
}

fn open_device() -> Result<HydroDevice> {
    HydroDevice::open().context("Failed to open Hydro cooler")
}

// =============================================================================
// Command Implementations
// =============================================================================

fn cmd_list() -> Result<()> {
    let devices = HydroDevice::list_devices().context("Failed to enumerate HID devices")?;

    if devices.is_empty() {
        println!("No Corsair Hydro coolers found.");
        return Ok(());
    }

    println!("Found {} Hydro cooler(s):", devices.len());
    for (i, (path, serial)) in devices.iter().enumerate() {
        match serial {
            Some(s) => println!("  [{}] {} (serial: {})", i, path, s),
            None => println!("  [{}] {}", i, path),
        }
    }
    Ok(())
}

fn cmd_info() -> Result<()> {
    let hydro = open_device()?;
    println!("{}", hydro.descriptor());
    Ok(())
}

fn cmd_status() -> Result<()> {
    let hydro = open_device()?;
    let status = hydro.status().context("Failed to read status")?;
    print!("{}", status);
    Ok(())
}

fn cmd_monitor(interval_secs: u64) -> Result<()> {
    let hydro = open_device()?;

    // Setup Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("Failed to set Ctrl+C handler")?;

    println!("🌡️  Monitoring {} (Ctrl+C to stop)...\n", hydro.descriptor());

    while running.load(Ordering::SeqCst) {
        match hydro.status() {
            Ok(status) => {
                // Clear screen and move cursor to top
                print!("\x1B[2J\x1B[1;1H");
                print!("{}", status);
            }
            Err(e) => eprintln!("⚠️  Read failed: {}", e),
        }
        std::thread::sleep(Duration::from_secs(interval_secs));
    }

    println!("\nStopped.");
    Ok(())
}

fn cmd_temp(index: u8) -> Result<()> {
    let hydro = open_device()?;
    let milli_c = hydro
        .read_temperature(index)
        .context("Failed to read temperature")?;
    println!("Temp {}: {:.3} °C", index, milli_c as f64 / 1000.0);
    Ok(())
}

fn cmd_fan(index: u8) -> Result<()> {
    let hydro = open_device()?;
    let rpm = hydro.read_fan_rpm(index).context("Failed to read RPM")?;
    let duty = hydro.read_pwm_duty(index).context("Failed to read duty")?;
    let mode = hydro.read_pwm_mode(index).context("Failed to read mode")?;
    println!("Fan {}: {} RPM, duty {}/255, mode {}", index, rpm, duty, mode);
    Ok(())
}

fn cmd_set_duty(index: u8, duty: u8) -> Result<()> {
    let hydro = open_device()?;
    hydro
        .write_pwm_duty(index, duty)
        .context("Failed to set duty")?;
    println!("✅ Fan {} duty set to {}/255", index, duty);
    Ok(())
}

fn cmd_set_mode(index: u8, mode: u8) -> Result<()> {
    let hydro = open_device()?;
    // clap already restricts the range to 1..=6.
    let mode = PwmMode::from_host_value(mode)
        .ok_or_else(|| anyhow::anyhow!("Invalid PWM mode {}", mode))?;
    hydro
        .write_pwm_mode(index, mode)
        .context("Failed to set PWM mode")?;
    println!("✅ Fan {} mode set to {}", index, mode);
    Ok(())
}

fn cmd_led_mode() -> Result<()> {
    let hydro = open_device()?;
    let mode = hydro.read_led_mode().context("Failed to read LED mode")?;
    println!("LED mode: {:#04x}", mode);
    Ok(())
}

fn cmd_set_led_mode(mode: u8) -> Result<()> {
    let hydro = open_device()?;
    hydro.write_led_mode(mode).context("Failed to set LED mode")?;
    println!("✅ LED mode set to {:#04x}", mode);
    Ok(())
}

fn cmd_led_colors() -> Result<()> {
    let hydro = open_device()?;
    let colors = hydro
        .read_led_colors()
        .context("Failed to read LED colors")?;
    for (i, color) in colors.iter().enumerate() {
        println!("LED color {}: {}", i + 1, color);
    }
    Ok(())
}

fn cmd_set_led_colors(spec: &str) -> Result<()> {
    let colors = parse_led_colors(spec)?;
    let hydro = open_device()?;
    hydro
        .write_led_colors(&colors)
        .context("Failed to set LED colors")?;
    println!("✅ LED colors set.");
    Ok(())
}

fn cmd_set_led_preset(name: &str) -> Result<()> {
    let preset = LedPreset::parse(name)?;
    let hydro = open_device()?;
    hydro
        .write_led_mode(preset.mode)
        .context("Failed to set LED mode")?;
    hydro
        .write_led_colors(&preset.colors)
        .context("Failed to set LED colors")?;
    println!("✅ Applied LED preset '{}'", name.to_lowercase());
    Ok(())
}

fn cmd_fan_curve() -> Result<()> {
    let hydro = open_device()?;
    let curve = hydro.read_fan_curve().context("Failed to read fan curve")?;
    println!("Custom fan profile:");
    for (rpm, duty) in curve.rpm.iter().zip(&curve.duty) {
        println!("  {:>5} RPM -> duty {}", rpm, duty);
    }
    Ok(())
}

fn cmd_set_fan_curve(spec: &str) -> Result<()> {
    let curve = parse_curve_spec(spec)?.to_fan_curve();
    let hydro = open_device()?;
    hydro
        .write_fan_curve(&curve)
        .context("Failed to write fan curve")?;
    println!("✅ Custom fan profile written.");
    Ok(())
}

fn cmd_led_temp_profile() -> Result<()> {
    let hydro = open_device()?;
    let profile = hydro
        .read_led_temp_profile()
        .context("Failed to read LED temperature profile")?;
    println!("LED temperature profile:");
    for (temp, color) in profile.temps.iter().zip(&profile.colors) {
        println!("  {:>3} °C -> {}", temp, color);
    }
    Ok(())
}

fn cmd_set_led_temp_profile(spec: &str) -> Result<()> {
    let profile = if spec.eq_ignore_ascii_case("default") {
        LED_TEMP_DEFAULT
    } else {
        parse_led_temp_profile(spec)?
    };
    let hydro = open_device()?;
    hydro
        .write_led_temp_profile(&profile)
        .context("Failed to write LED temperature profile")?;
    println!("✅ LED temperature profile written.");
    Ok(())
}

fn cmd_ext_temp() -> Result<()> {
    let hydro = open_device()?;
    let temp = hydro
        .read_external_temp()
        .context("Failed to read external temperature override")?;
    println!("External temperature override: {} °C", temp);
    Ok(())
}

fn cmd_set_ext_temp(temp: u16) -> Result<()> {
    let hydro = open_device()?;
    hydro
        .write_external_temp(temp)
        .context("Failed to set external temperature override")?;
    println!("✅ External temperature override set to {} °C", temp);
    Ok(())
}

fn cmd_sensors() -> Result<()> {
    let sensors = SystemSensors::new();
    let all = sensors.list_all();
    if all.is_empty() {
        println!("No host temperature sensors found.");
        return Ok(());
    }
    for (label, temp) in all {
        println!("  {:<30} {:.1} °C", label, temp);
    }
    Ok(())
}

fn cmd_sync_temp(interval_secs: u64) -> Result<()> {
    let hydro = open_device()?;
    let mut sensors = SystemSensors::new();

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("Failed to set Ctrl+C handler")?;

    println!(
        "📡 Pushing host CPU temperature every {}s (Ctrl+C to stop)...",
        interval_secs
    );

    while running.load(Ordering::SeqCst) {
        sensors.refresh();
        match sensors.find_cpu_temp() {
            Some(cpu_temp) => {
                let temp = cpu_temp.round().clamp(0.0, u16::MAX as f32) as u16;
                match hydro.write_external_temp(temp) {
                    Ok(()) => println!("CPU {} °C -> override", temp),
                    Err(e) => eprintln!("⚠️  Write failed: {}", e),
                }
            }
            None => eprintln!("⚠️  No CPU temperature sensor found"),
        }
        std::thread::sleep(Duration::from_secs(interval_secs));
    }

    println!("\nStopped.");
    Ok(())
}

fn cmd_profile(action: ProfileAction) -> Result<()> {
    match action {
        ProfileAction::List => {
            let store = ProfileStore::load()?;
            if store.fan_curves.is_empty() && store.led_schemes.is_empty() {
                println!("No saved profiles.");
                return Ok(());
            }
            if !store.fan_curves.is_empty() {
                println!("Fan curves:");
                let mut names: Vec<_> = store.fan_curves.keys().collect();
                names.sort();
                for name in names {
                    println!("  {}", name);
                }
            }
            if !store.led_schemes.is_empty() {
                println!("LED schemes:");
                let mut names: Vec<_> = store.led_schemes.keys().collect();
                names.sort();
                for name in names {
                    println!("  {}", name);
                }
            }
            Ok(())
        }
        ProfileAction::SaveCurve { name, spec } => {
            let curve = parse_curve_spec(&spec)?.to_fan_curve();
            let mut store = ProfileStore::load()?;
            store.fan_curves.insert(name.clone(), curve);
            store.save()?;
            println!("✅ Saved fan curve '{}'", name);
            Ok(())
        }
        ProfileAction::ApplyCurve { name } => {
            let store = ProfileStore::load()?;
            let curve = store
                .fan_curves
                .get(&name)
                .with_context(|| format!("No saved fan curve named '{}'", name))?;
            let hydro = open_device()?;
            hydro
                .write_fan_curve(curve)
                .context("Failed to write fan curve")?;
            println!("✅ Applied fan curve '{}'", name);
            Ok(())
        }
        ProfileAction::SaveLed { name, mode, colors } => {
            let colors = parse_led_colors(&colors)?;
            let mut store = ProfileStore::load()?;
            store.led_schemes.insert(name.clone(), LedScheme { mode, colors });
            store.save()?;
            println!("✅ Saved LED scheme '{}'", name);
            Ok(())
        }
        ProfileAction::ApplyLed { name } => {
            let store = ProfileStore::load()?;
            let scheme = store
                .led_schemes
                .get(&name)
                .with_context(|| format!("No saved LED scheme named '{}'", name))?;
            let hydro = open_device()?;
            hydro
                .write_led_mode(scheme.mode)
                .context("Failed to set LED mode")?;
            hydro
                .write_led_colors(&scheme.colors)
                .context("Failed to set LED colors")?;
            println!("✅ Applied LED scheme '{}'", name);
            Ok(())
        }
    }
}
