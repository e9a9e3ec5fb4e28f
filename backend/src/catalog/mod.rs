//! Joined artist/artwork catalog.
//!
//! - `reconcile`: Join-key filtering and duplicate column stripping
//! - `index`: Artist identifier → artworks index
//! - `query`: Artist search and artwork lookup
//! - `pipeline`: Text → [`Catalog`] load pipeline
//!
//! A [`Catalog`] is built once by the pipeline and never mutated; reloading
//! produces a new one.

pub mod index;
pub mod pipeline;
pub mod query;
pub mod reconcile;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::models::{ArtistProfile, ArtistSummary, ArtworkCard, Record, Schema, CONSTITUENT_ID};

pub use index::{split_ids, ArtworkIndex};
pub use pipeline::LoadStats;
pub use query::{SearchOutcome, MAX_SEARCH_RESULTS, MIN_QUERY_CHARS};
pub use reconcile::{reconcile, Reconciled};

/// Rows shown by a table preview unless asked otherwise.
pub const PREVIEW_ROWS: usize = 50;

/// The two source datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Artists,
    Artworks,
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dataset::Artists => write!(f, "artists"),
            Dataset::Artworks => write!(f, "artworks"),
        }
    }
}

impl FromStr for Dataset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "artists" => Ok(Dataset::Artists),
            "artworks" => Ok(Dataset::Artworks),
            other => Err(format!("unknown dataset '{}' (expected artists or artworks)", other)),
        }
    }
}

/// An artist with the cards of every indexed artwork.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistDetail {
    pub profile: ArtistProfile,
    pub artworks: Vec<ArtworkCard>,
}

/// First rows of a dataset for generic table rendering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePreview {
    pub dataset: Dataset,
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
    pub total: usize,
}

/// Artists, cleaned artworks and the index joining them.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub(crate) artists: Vec<Arc<Record>>,
    pub(crate) artworks: Vec<Arc<Record>>,
    pub(crate) artist_schema: Arc<Schema>,
    pub(crate) artwork_schema: Arc<Schema>,
    pub(crate) index: ArtworkIndex,
    pub(crate) indexed_artists: Vec<Arc<Record>>,
    pub(crate) stats: LoadStats,
}

impl Catalog {
    /// Build a catalog from the raw text of both datasets.
    pub fn load(artists_text: &str, artworks_text: &str) -> Self {
        pipeline::load_text(artists_text, artworks_text)
    }

    /// Every parsed artist, including those without artworks.
    pub fn artists(&self) -> &[Arc<Record>] {
        &self.artists
    }

    /// Joinable artworks after column stripping.
    pub fn artworks(&self) -> &[Arc<Record>] {
        &self.artworks
    }

    pub fn index(&self) -> &ArtworkIndex {
        &self.index
    }

    /// Artists with at least one indexed artwork, in artist order.
    pub fn indexed_artists(&self) -> &[Arc<Record>] {
        &self.indexed_artists
    }

    pub fn artist_columns(&self) -> &[String] {
        self.artist_schema.columns()
    }

    pub fn artwork_columns(&self) -> &[String] {
        self.artwork_schema.columns()
    }

    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }

    /// Search indexed artists by name, bio or nationality.
    pub fn search(&self, query: &str) -> SearchOutcome<'_> {
        query::search(&self.indexed_artists, query)
    }

    /// Artworks of an artist; empty when the artist is unknown.
    pub fn artworks_for(&self, artist_id: &str) -> &[Arc<Record>] {
        query::artworks_for(&self.index, artist_id)
    }

    /// First artist with this exact `ConstituentID`.
    pub fn artist(&self, artist_id: &str) -> Option<&Record> {
        self.artists
            .iter()
            .map(Arc::as_ref)
            .find(|artist| artist.get(CONSTITUENT_ID) == Some(artist_id))
    }

    /// Search results as display summaries; `None` when the query is too short.
    pub fn search_summaries(&self, query: &str) -> Option<Vec<ArtistSummary>> {
        match self.search(query) {
            SearchOutcome::NoQuery => None,
            SearchOutcome::Matches(found) => Some(
                found
                    .into_iter()
                    .map(|artist| {
                        let count = self.index.count(artist.get_or_empty(CONSTITUENT_ID));
                        ArtistSummary::from_record(artist, count)
                    })
                    .collect(),
            ),
        }
    }

    /// Profile and artwork cards of a known artist.
    pub fn artist_detail(&self, artist_id: &str) -> Option<ArtistDetail> {
        let artist = self.artist(artist_id)?;
        let artworks = self.artworks_for(artist_id);

        Some(ArtistDetail {
            profile: ArtistProfile::from_record(artist, artworks.len()),
            artworks: artworks.iter().map(|a| ArtworkCard::from_record(a)).collect(),
        })
    }

    /// Column list and first `limit` rows of a dataset.
    pub fn preview(&self, dataset: Dataset, limit: usize) -> TablePreview {
        let (schema, records) = match dataset {
            Dataset::Artists => (&self.artist_schema, &self.artists),
            Dataset::Artworks => (&self.artwork_schema, &self.artworks),
        };

        TablePreview {
            dataset,
            columns: schema.columns().to_vec(),
            rows: records.iter().take(limit).map(|r| r.as_ref().clone()).collect(),
            total: records.len(),
        }
    }
}
