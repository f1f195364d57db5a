//! Character aggregation.
//!
//! Turns a raw character record into a [`Character`] by resolving every
//! cross-reference URL it carries. Each reference is looked up on its own:
//! a reference that cannot be parsed or fetched is dropped from the output
//! and logged, it never fails the character as a whole.

use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, instrument, warn};

use holonet_core::error::Result;
use holonet_core::traits::Upstream;
use holonet_core::types::{
    character_image_url, Character, CharacterRecord, CharacterRef, CharacterSummary, Film, Planet,
    Species, Starship, Vehicle,
};

use crate::client::extract_id_from_url;

/// Why a cross-reference was left out of a resolved character.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The URL carries no numeric id.
    Unresolvable {
        /// The offending reference
        url: String,
    },
    /// The upstream lookup failed.
    Failed {
        /// The reference that was looked up
        url: String,
        /// The upstream error, rendered
        reason: String,
    },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Unresolvable { url } => write!(f, "no id in '{}'", url),
            SkipReason::Failed { url, reason } => write!(f, "'{}': {}", url, reason),
        }
    }
}

/// Outcome of a single cross-reference lookup.
#[derive(Clone, Debug, PartialEq)]
pub enum Lookup<T> {
    /// The reference was fetched and projected.
    Resolved(T),
    /// The reference was left out.
    Skipped(SkipReason),
}

impl<T> Lookup<T> {
    /// Returns the resolved value, if any.
    pub fn resolved(self) -> Option<T> {
        match self {
            Lookup::Resolved(value) => Some(value),
            Lookup::Skipped(_) => None,
        }
    }
}

/// Projects a listing entry for list views.
pub fn to_list_summary(character: &CharacterRef) -> CharacterSummary {
    CharacterSummary::from(character)
}

/// Builds fully resolved characters on top of an [`Upstream`].
#[derive(Clone)]
pub struct CharacterAssembler {
    upstream: Arc<dyn Upstream>,
}

impl CharacterAssembler {
    /// Creates an assembler fetching through `upstream`.
    pub fn new(upstream: Arc<dyn Upstream>) -> Self {
        Self { upstream }
    }

    /// Resolves every reference of `record` and assembles the character.
    ///
    /// The homeworld and the four reference lists are resolved concurrently,
    /// and so are the items within each list. Resolved items keep the order
    /// of the input reference list.
    #[instrument(skip(self, record), fields(id = %record.uid))]
    pub async fn to_detail(&self, record: CharacterRecord) -> Character {
        let up = self.upstream.as_ref();

        let (homeworld, films, species, vehicles, starships): (
            Option<Planet>,
            Vec<Film>,
            Vec<Species>,
            Vec<Vehicle>,
            Vec<Starship>,
        ) = futures::join!(
            resolve_homeworld(up, &record.homeworld),
            resolve_list("film", &record.films, |id| async move { up.get_film(&id).await }),
            resolve_list("species", &record.species, |id| async move { up.get_species(&id).await }),
            resolve_list("vehicle", &record.vehicles, |id| async move { up.get_vehicle(&id).await }),
            resolve_list("starship", &record.starships, |id| async move { up.get_starship(&id).await }),
        );

        debug!(
            films = films.len(),
            species = species.len(),
            vehicles = vehicles.len(),
            starships = starships.len(),
            homeworld = homeworld.is_some(),
            "Assembled character"
        );

        Character {
            image_url: character_image_url(&record.uid),
            id: record.uid,
            name: record.name,
            height: record.height,
            mass: record.mass,
            hair_color: record.hair_color,
            skin_color: record.skin_color,
            eye_color: record.eye_color,
            birth_year: record.birth_year,
            gender: record.gender,
            homeworld,
            films,
            species,
            vehicles,
            starships,
            created: record.created,
            edited: record.edited,
        }
    }
}

async fn resolve_homeworld(up: &dyn Upstream, url: &str) -> Option<Planet> {
    if url.is_empty() {
        return None;
    }

    let outcome: Lookup<Planet> = lookup(url, |id| async move { up.get_planet(&id).await }).await;
    match outcome {
        Lookup::Resolved(planet) => Some(planet),
        Lookup::Skipped(reason) => {
            warn!(%reason, "Skipping homeworld");
            None
        }
    }
}

/// Looks up every reference of one list concurrently and keeps the
/// resolved ones, in input order.
async fn resolve_list<R, T, F, Fut>(kind: &'static str, urls: &[String], fetch: F) -> Vec<T>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<R>>,
    T: From<R>,
{
    let lookups = join_all(urls.iter().map(|url| lookup(url, &fetch))).await;
    collect_resolved(kind, lookups)
}

async fn lookup<R, T, F, Fut>(url: &str, fetch: F) -> Lookup<T>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<R>>,
    T: From<R>,
{
    let Some(id) = extract_id_from_url(url) else {
        return Lookup::Skipped(SkipReason::Unresolvable { url: url.to_string() });
    };

    match fetch(id.to_string()).await {
        Ok(record) => Lookup::Resolved(T::from(record)),
        Err(e) => Lookup::Skipped(SkipReason::Failed {
            url: url.to_string(),
            reason: e.to_string(),
        }),
    }
}

fn collect_resolved<T>(kind: &'static str, lookups: Vec<Lookup<T>>) -> Vec<T> {
    lookups
        .into_iter()
        .filter_map(|outcome| match outcome {
            Lookup::Resolved(value) => Some(value),
            Lookup::Skipped(reason) => {
                warn!(kind, %reason, "Skipping reference");
                None
            }
        })
        .collect()
}
