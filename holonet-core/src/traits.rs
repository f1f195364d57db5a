//! Common traits for HOLONET.
//!
//! The aggregator and the HTTP handlers depend on [`Upstream`] rather than on
//! the concrete HTTP client, so either side can be exercised in isolation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    CharacterPage, CharacterRecord, CharacterRef, FilmRecord, PlanetRecord, SpeciesRecord,
    StarshipRecord, VehicleRecord,
};

// ═══════════════════════════════════════════════════════════════════════════════
// UPSTREAM TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface to the character/planet/film/species/vehicle/starship API.
///
/// Implementations might use:
/// - the live SWAPI over HTTP
/// - a fixture set (for testing)
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Fetches one character by numeric id.
    async fn get_character(&self, id: &str) -> Result<CharacterRecord>;

    /// Fetches one planet by numeric id.
    async fn get_planet(&self, id: &str) -> Result<PlanetRecord>;

    /// Fetches one film by numeric id.
    async fn get_film(&self, id: &str) -> Result<FilmRecord>;

    /// Fetches one species by numeric id.
    async fn get_species(&self, id: &str) -> Result<SpeciesRecord>;

    /// Fetches one vehicle by numeric id.
    async fn get_vehicle(&self, id: &str) -> Result<VehicleRecord>;

    /// Fetches one starship by numeric id.
    async fn get_starship(&self, id: &str) -> Result<StarshipRecord>;

    /// Fetches one page of the character listing.
    async fn get_page(&self, page: u32, page_size: u32) -> Result<CharacterPage>;

    /// Returns every character across all pages.
    ///
    /// Expensive (one round-trip per page); implementations are expected to
    /// cache the result.
    async fn get_all_characters(&self) -> Result<Arc<Vec<CharacterRef>>>;

    /// Drops the cached full listing. Returns true if one was cached.
    fn clear_listing_cache(&self) -> bool;
}
