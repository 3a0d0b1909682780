//! HID protocol implementation for Corsair Hydro coolers.
//!
//! This module contains the 64-byte frame codec (sub-command encoder and
//! tagged-field decoder) and the typed field accessors layered on top of it.

pub mod fields;
pub mod frame;

pub use fields::*;
pub use frame::*;
