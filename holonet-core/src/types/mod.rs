//! Domain types for HOLONET.
//!
//! - [`swapi`]: records exactly as the upstream returns them, plus envelopes
//! - [`catalog`]: the denormalized model served to the UI

pub mod catalog;
pub mod swapi;

pub use catalog::*;
pub use swapi::*;
