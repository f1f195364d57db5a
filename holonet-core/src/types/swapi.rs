//! Raw SWAPI records and response envelopes.
//!
//! Every field defaults when absent: the upstream is a fixed external
//! contract, but it is not always complete (detail `properties` omit the
//! `uid`, for instance), and a missing scalar should never fail a decode.

use serde::{Deserialize, Deserializer, Serialize};

/// A record that carries an upstream `uid`.
///
/// Detail envelopes put the uid next to `properties` instead of inside it;
/// the client uses this to copy it in.
pub trait SwapiRecord {
    /// The record's uid, possibly empty.
    fn uid(&self) -> &str;

    /// Sets the uid if the record does not carry one.
    fn fill_uid(&mut self, uid: &str);
}

macro_rules! impl_swapi_record {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SwapiRecord for $ty {
                fn uid(&self) -> &str {
                    &self.uid
                }

                fn fill_uid(&mut self, uid: &str) {
                    if self.uid.is_empty() {
                        self.uid = uid.to_string();
                    }
                }
            }
        )*
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// ENVELOPES
// ═══════════════════════════════════════════════════════════════════════════════

/// Envelope of every detail endpoint: `{ message, result: { properties, uid } }`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetailEnvelope<T> {
    /// Upstream status message ("ok")
    #[serde(default)]
    pub message: String,
    /// The wrapped record
    pub result: DetailResult<T>,
}

/// The `result` object of a [`DetailEnvelope`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetailResult<T> {
    /// The record itself
    pub properties: T,
    /// Upstream uid of the record
    #[serde(default)]
    pub uid: String,
    /// Short description of the resource class
    #[serde(default)]
    pub description: String,
}

impl<T: SwapiRecord> DetailEnvelope<T> {
    /// Unwraps the record, copying the envelope uid into it when missing.
    pub fn into_record(self) -> T {
        let DetailResult { mut properties, uid, .. } = self.result;
        properties.fill_uid(&uid);
        properties
    }
}

/// Envelope of every list endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListEnvelope<T> {
    /// Upstream status message ("ok")
    #[serde(default)]
    pub message: String,
    /// Total records across all pages
    #[serde(default)]
    pub total_records: u64,
    /// Total pages at the requested page size
    #[serde(default)]
    pub total_pages: u64,
    /// URL of the previous page
    #[serde(default)]
    pub previous: Option<String>,
    /// URL of the next page; `None` on the last page
    #[serde(default)]
    pub next: Option<String>,
    /// Records on this page
    #[serde(default)]
    pub results: Vec<T>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// PRIMARY ENTITY
// ═══════════════════════════════════════════════════════════════════════════════

/// Deserializes an explicit `null` as the field's default.
///
/// `#[serde(default)]` only covers absent fields; the upstream also sends
/// `null` for unknown values.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A character as listed on `/people`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterRef {
    /// Upstream uid (numeric string)
    #[serde(deserialize_with = "null_as_default")]
    pub uid: String,
    /// Display name
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Detail URL
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

/// A character as returned by `/people/{id}`.
///
/// Any field may be absent or `null`; both decode to the default.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterRecord {
    /// Upstream uid
    #[serde(deserialize_with = "null_as_default")]
    pub uid: String,
    /// Display name
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Height in centimetres
    #[serde(deserialize_with = "null_as_default")]
    pub height: String,
    /// Mass in kilograms
    #[serde(deserialize_with = "null_as_default")]
    pub mass: String,
    /// Hair colour
    #[serde(deserialize_with = "null_as_default")]
    pub hair_color: String,
    /// Skin colour
    #[serde(deserialize_with = "null_as_default")]
    pub skin_color: String,
    /// Eye colour
    #[serde(deserialize_with = "null_as_default")]
    pub eye_color: String,
    /// Birth year, e.g. "19BBY"
    #[serde(deserialize_with = "null_as_default")]
    pub birth_year: String,
    /// Gender, or "n/a"
    #[serde(deserialize_with = "null_as_default")]
    pub gender: String,
    /// Planet URL, or empty when unknown
    #[serde(deserialize_with = "null_as_default")]
    pub homeworld: String,
    /// Film URLs
    #[serde(deserialize_with = "null_as_default")]
    pub films: Vec<String>,
    /// Species URLs
    #[serde(deserialize_with = "null_as_default")]
    pub species: Vec<String>,
    /// Vehicle URLs
    #[serde(deserialize_with = "null_as_default")]
    pub vehicles: Vec<String>,
    /// Starship URLs
    #[serde(deserialize_with = "null_as_default")]
    pub starships: Vec<String>,
    /// Upstream creation timestamp
    #[serde(deserialize_with = "null_as_default")]
    pub created: String,
    /// Upstream last-edit timestamp
    #[serde(deserialize_with = "null_as_default")]
    pub edited: String,
    /// Canonical URL of this record
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// SECONDARY ENTITIES
// ═══════════════════════════════════════════════════════════════════════════════

/// A planet as returned by `/planets/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetRecord {
    /// Upstream uid
    pub uid: String,
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
    /// Orbital period in days
    pub orbital_period: String,
    /// Rotation period in hours
    pub rotation_period: String,
    /// Percentage of surface water
    pub surface_water: String,
    /// Canonical URL
    pub url: String,
}

/// A film as returned by `/films/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilmRecord {
    /// Upstream uid
    pub uid: String,
    /// Film title
    pub title: String,
    /// Episode number; 0 when unknown
    #[serde(deserialize_with = "null_as_default")]
    pub episode_id: u32,
    /// Opening crawl text
    pub opening_crawl: String,
    /// Director
    pub director: String,
    /// Producers, comma separated
    pub producer: String,
    /// Release date (YYYY-MM-DD)
    pub release_date: String,
    /// Canonical URL
    pub url: String,
}

/// A species as returned by `/species/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeciesRecord {
    /// Upstream uid
    pub uid: String,
    /// Species name
    pub name: String,
    /// Classification, e.g. "mammal"
    pub classification: String,
    /// Designation, e.g. "sentient"
    pub designation: String,
    /// Average height in centimetres
    pub average_height: String,
    /// Average lifespan in years
    pub average_lifespan: String,
    /// Language spoken
    pub language: String,
    /// Planet URL; the upstream sends `null` for some species
    pub homeworld: Option<String>,
    /// Canonical URL
    pub url: String,
}

/// A vehicle as returned by `/vehicles/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleRecord {
    /// Upstream uid
    pub uid: String,
    /// Vehicle name
    pub name: String,
    /// Model designation
    pub model: String,
    /// Manufacturer
    pub manufacturer: String,
    /// Vehicle class, e.g. "wheeled"
    pub vehicle_class: String,
    /// Crew size
    pub crew: String,
    /// Passenger capacity
    pub passengers: String,
    /// Cost in galactic credits
    pub cost_in_credits: String,
    /// Canonical URL
    pub url: String,
}

/// A starship as returned by `/starships/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarshipRecord {
    /// Upstream uid
    pub uid: String,
    /// Starship name
    pub name: String,
    /// Model designation
    pub model: String,
    /// Manufacturer
    pub manufacturer: String,
    /// Starship class, e.g. "Starfighter"
    pub starship_class: String,
    /// Crew size
    pub crew: String,
    /// Passenger capacity
    pub passengers: String,
    /// Cost in galactic credits
    pub cost_in_credits: String,
    /// Hyperdrive class
    pub hyperdrive_rating: String,
    /// Megalights per hour
    #[serde(rename = "MGLT")]
    pub mglt: String,
    /// Canonical URL
    pub url: String,
}

impl_swapi_record!(
    CharacterRef,
    CharacterRecord,
    PlanetRecord,
    FilmRecord,
    SpeciesRecord,
    VehicleRecord,
    StarshipRecord,
);
