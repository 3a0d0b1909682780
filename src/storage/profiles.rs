//! Profile storage and persistence.
//!
//! Saves and loads named fan curves and LED schemes to/from disk.
//! Cross-platform: uses the appropriate config directory for each OS.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{HydroError, Result};
use crate::protocol::fields::{FanCurve, LED_COLOR_SLOTS, LedColor};

// =============================================================================
// Config Path
// =============================================================================

const APP_NAME: &str = "corsair-hydro";
const CONFIG_FILE: &str = "profiles.json";

/// Get the configuration directory path.
/// - Linux: ~/.config/corsair-hydro/
/// - Windows: %APPDATA%\corsair-hydro\
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|p| p.join(APP_NAME))
        .ok_or_else(|| HydroError::InvalidArgument("Could not find config directory".into()))
}

/// Get the full path to the profiles file.
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE))
}

// =============================================================================
// Stored Profiles
// =============================================================================

/// An LED lighting scheme: a mode plus the 4 static colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedScheme {
    pub mode: u8,
    pub colors: [LedColor; LED_COLOR_SLOTS],
}

/// Every user-saved profile, persisted as one JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileStore {
    #[serde(default)]
    pub fan_curves: HashMap<String, FanCurve>,
    #[serde(default)]
    pub led_schemes: HashMap<String, LedScheme>,
}

impl ProfileStore {
    /// Load the store from disk. A missing file yields an empty store.
    pub fn load() -> Result<Self> {
        let path = get_config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path).map_err(|e| {
            HydroError::InvalidArgument(format!("Failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            HydroError::InvalidArgument(format!("Malformed profile store {}: {}", path.display(), e))
        })
    }

    /// Save the store to disk, creating the config directory if needed.
    pub fn save(&self) -> Result<()> {
        let dir = get_config_dir()?;
        std::fs::create_dir_all(&dir).map_err(|e| {
            HydroError::InvalidArgument(format!("Failed to create {}: {}", dir.display(), e))
        })?;
        let path = get_config_path()?;
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| HydroError::InvalidArgument(format!("Failed to serialize store: {}", e)))?;
        std::fs::write(&path, text).map_err(|e| {
            HydroError::InvalidArgument(format!("Failed to write {}: {}", path.display(), e))
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_json_round_trip() {
        let mut store = ProfileStore::default();
        store.fan_curves.insert(
            "quiet-night".into(),
            FanCurve {
                rpm: [500, 700, 900, 1100, 1400],
                duty: [30, 60, 90, 140, 200],
            },
        );
        store.led_schemes.insert(
            "warm".into(),
            LedScheme {
                mode: 0x10,
                colors: [LedColor::new(255, 160, 0); LED_COLOR_SLOTS],
            },
        );

        let json = serde_json::to_string(&store).unwrap();
        let loaded: ProfileStore = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, store);
    }

    #[test]
    fn test_empty_document_defaults() {
        let loaded: ProfileStore = serde_json::from_str("{}").unwrap();
        assert!(loaded.fan_curves.is_empty());
        assert!(loaded.led_schemes.is_empty());
    }

    #[test]
    fn test_config_path_ends_with_app_name() {
        if let Ok(dir) = get_config_dir() {
            assert!(dir.ends_with(APP_NAME));
        }
    }
}
