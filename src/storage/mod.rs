//! Profile storage and persistence module.
//!
//! Handles saving and loading named fan curves and LED schemes to disk.

pub mod profiles;

// Re-export commonly used items
pub use profiles::{LedScheme, ProfileStore, get_config_dir, get_config_path};
