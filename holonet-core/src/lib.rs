//! # HOLONET Core
//!
//! Core types, errors, and traits shared by every HOLONET crate.
//!
//! - **Types**: raw SWAPI records and the denormalized catalog model
//! - **Errors**: the error taxonomy surfaced by clients and handlers
//! - **Constants**: upstream defaults, cache keys and TTLs
//! - **Traits**: the [`Upstream`] seam between the aggregator and the HTTP client
//!
//! ## Example
//!
//! ```rust
//! use holonet_core::{CharacterSummary, HolonetError};
//!
//! let summary = CharacterSummary::from_uid("1", "Luke Skywalker");
//! assert!(summary.image_url.ends_with("/1.jpg"));
//! assert!(HolonetError::upstream_status(404, "Not Found").is_not_found());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{HolonetError, Result};
pub use traits::*;
pub use types::*;
