//! # HOLONET SWAPI
//!
//! Upstream client for the Star Wars API and the aggregator that turns a raw
//! character record into a fully resolved [`Character`](holonet_core::Character).
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use holonet_swapi::{CharacterAssembler, SwapiClient, SwapiConfig};
//!
//! let client = Arc::new(SwapiClient::with_config(SwapiConfig::default())?);
//! let record = client.get_character("1").await?;
//! let luke = CharacterAssembler::new(client).to_detail(record).await;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod client;
mod transformer;

pub use client::{extract_id_from_url, ListingCache, SwapiClient, SwapiConfig};
pub use transformer::{to_list_summary, CharacterAssembler, Lookup, SkipReason};
