//! The catalog model served to the UI.
//!
//! Everything here is built fresh per request from upstream records and
//! serialized straight into the response envelope.

use serde::{Deserialize, Serialize};

use crate::constants::CHARACTER_IMAGE_URL_TEMPLATE;
use crate::types::swapi::{
    CharacterRef, FilmRecord, PlanetRecord, SpeciesRecord, StarshipRecord, VehicleRecord,
};

/// Portrait URL of a character. No existence check is made.
pub fn character_image_url(id: &str) -> String {
    CHARACTER_IMAGE_URL_TEMPLATE.replace("{id}", id)
}

/// Cheap projection of a character for list views.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSummary {
    /// Upstream uid
    pub id: String,
    /// Display name
    pub name: String,
    /// Portrait URL
    pub image_url: String,
}

impl CharacterSummary {
    /// Builds a summary, deriving the image URL from the id.
    pub fn from_uid(id: impl Into<String>, name: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            image_url: character_image_url(&id),
            name: name.into(),
            id,
        }
    }
}

impl From<&CharacterRef> for CharacterSummary {
    fn from(character: &CharacterRef) -> Self {
        Self::from_uid(character.uid.clone(), character.name.clone())
    }
}

/// A fully resolved character.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Upstream uid
    pub id: String,
    /// Display name
    pub name: String,
    /// Height in centimetres
    pub height: String,
    /// Mass in kilograms
    pub mass: String,
    /// Hair colour
    pub hair_color: String,
    /// Skin colour
    pub skin_color: String,
    /// Eye colour
    pub eye_color: String,
    /// Birth year, e.g. "19BBY"
    pub birth_year: String,
    /// Gender, or "n/a"
    pub gender: String,
    /// Resolved homeworld; absent when unknown or unreachable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homeworld: Option<Planet>,
    /// Resolved films, in upstream order
    pub films: Vec<Film>,
    /// Resolved species, in upstream order
    pub species: Vec<Species>,
    /// Resolved vehicles, in upstream order
    pub vehicles: Vec<Vehicle>,
    /// Resolved starships, in upstream order
    pub starships: Vec<Starship>,
    /// Portrait URL
    pub image_url: String,
    /// Upstream creation timestamp
    pub created: String,
    /// Upstream last-edit timestamp
    pub edited: String,
}

/// A resolved homeworld.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Planet {
    /// Upstream uid
    pub id: String,
    /// Planet name
    pub name: String,
    /// Climate description
    pub climate: String,
    /// Terrain description
    pub terrain: String,
    /// Population count, or "unknown"
    pub population: String,
    /// Diameter in kilometres
    pub diameter: String,
    /// Gravity, e.g. "1 standard"
    pub gravity: String,
}

impl From<PlanetRecord> for Planet {
    fn from(p: PlanetRecord) -> Self {
        Self {
            id: p.uid,
            name: p.name,
            climate: p.climate,
            terrain: p.terrain,
            population: p.population,
            diameter: p.diameter,
            gravity: p.gravity,
        }
    }
}

/// A resolved film.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Film {
    /// Upstream uid
    pub id: String,
    /// Film title
    pub title: String,
    /// Episode number
    pub episode_id: u32,
    /// Director
    pub director: String,
    /// Producers, comma separated
    pub producer: String,
    /// Release date (YYYY-MM-DD)
    pub release_date: String,
}

impl From<FilmRecord> for Film {
    fn from(f: FilmRecord) -> Self {
        Self {
            id: f.uid,
            title: f.title,
            episode_id: f.episode_id,
            director: f.director,
            producer: f.producer,
            release_date: f.release_date,
        }
    }
}

/// A resolved species.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    /// Upstream uid
    pub id: String,
    /// Species name
    pub name: String,
    /// Classification, e.g. "mammal"
    pub classification: String,
    /// Designation, e.g. "sentient"
    pub designation: String,
    /// Average height in centimetres
    pub average_height: String,
    /// Language spoken
    pub language: String,
    /// Planet URL, kept unresolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homeworld: Option<String>,
}

impl From<SpeciesRecord> for Species {
    fn from(s: SpeciesRecord) -> Self {
        Self {
            id: s.uid,
            name: s.name,
            classification: s.classification,
            designation: s.designation,
            average_height: s.average_height,
            language: s.language,
            homeworld: s.homeworld.filter(|h| !h.is_empty()),
        }
    }
}

/// A resolved vehicle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Upstream uid
    pub id: String,
    /// Vehicle name
    pub name: String,
    /// Model designation
    pub model: String,
    /// Manufacturer
    pub manufacturer: String,
    /// Vehicle class
    pub vehicle_class: String,
    /// Crew size
    pub crew: String,
    /// Passenger capacity
    pub passengers: String,
    /// Cost in galactic credits
    pub cost_in_credits: String,
}

impl From<VehicleRecord> for Vehicle {
    fn from(v: VehicleRecord) -> Self {
        Self {
            id: v.uid,
            name: v.name,
            model: v.model,
            manufacturer: v.manufacturer,
            vehicle_class: v.vehicle_class,
            crew: v.crew,
            passengers: v.passengers,
            cost_in_credits: v.cost_in_credits,
        }
    }
}

/// A resolved starship.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Starship {
    /// Upstream uid
    pub id: String,
    /// Starship name
    pub name: String,
    /// Model designation
    pub model: String,
    /// Manufacturer
    pub manufacturer: String,
    /// Starship class
    pub starship_class: String,
    /// Crew size
    pub crew: String,
    /// Passenger capacity
    pub passengers: String,
    /// Cost in galactic credits
    pub cost_in_credits: String,
    /// Hyperdrive class
    pub hyperdrive_rating: String,
}

impl From<StarshipRecord> for Starship {
    fn from(s: StarshipRecord) -> Self {
        Self {
            id: s.uid,
            name: s.name,
            model: s.model,
            manufacturer: s.manufacturer,
            starship_class: s.starship_class,
            crew: s.crew,
            passengers: s.passengers,
            cost_in_credits: s.cost_in_credits,
            hyperdrive_rating: s.hyperdrive_rating,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PAGINATION
// ═══════════════════════════════════════════════════════════════════════════════

/// One page of the upstream character listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CharacterPage {
    /// Characters on this page
    pub results: Vec<CharacterRef>,
    /// Whether the upstream reports a next page
    pub has_next: bool,
    /// Total characters upstream
    pub total_records: u64,
    /// Total pages at the requested size
    pub total_pages: u64,
}

/// Pagination metadata attached to every list response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page (1-based)
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Total matching items
    pub total: u64,
    /// Number of pages
    pub total_pages: u64,
    /// Whether a later page exists
    pub has_next: bool,
    /// Whether an earlier page exists
    pub has_prev: bool,
}

impl Pagination {
    /// Metadata for a page taken straight from the upstream listing.
    pub fn from_upstream(page: u32, limit: u32, upstream: &CharacterPage) -> Self {
        Self {
            page,
            limit,
            total: upstream.total_records,
            total_pages: upstream.total_pages,
            has_next: upstream.has_next,
            has_prev: page > 1,
        }
    }

    /// Metadata for a page sliced locally out of `total` items.
    ///
    /// `limit` must be non-zero.
    pub fn for_slice(page: u32, limit: u32, total: u64) -> Self {
        let end = u64::from(page) * u64::from(limit);
        Self {
            page,
            limit,
            total,
            total_pages: total.div_ceil(u64::from(limit)),
            has_next: end < total,
            has_prev: page > 1,
        }
    }
}

/// A page of items plus its pagination metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Items on this page
    pub data: Vec<T>,
    /// Pagination metadata
    pub pagination: Pagination,
}
