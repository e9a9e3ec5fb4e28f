//! Load pipeline: raw text → parsed tables → reconciled artworks → index.
//!
//! # Example
//!
//! ```rust,ignore
//! use artjoin::catalog::pipeline::load_files;
//!
//! let catalog = load_files("Artists.csv", "artworks_sampled.csv")?;
//! println!("{} artists with artworks", catalog.indexed_artists().len());
//! ```

use chrono::Utc;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use super::index;
use super::reconcile::reconcile;
use super::Catalog;
use crate::api::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::error::LoadResult;
use crate::models::Record;
use crate::parser::{decode_bytes, parse, read_text, Table};

/// What a load did, for status displays.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadStats {
    /// Unique identifier of this load
    pub load_id: Uuid,
    /// RFC 3339 timestamp of this load
    pub loaded_at: String,
    pub artist_rows: usize,
    /// Artwork rows before join-key filtering
    pub artwork_rows_parsed: usize,
    /// Artwork rows kept after join-key filtering
    pub artwork_rows_kept: usize,
    /// Rows dropped by the parser for a wrong field count, per dataset
    pub malformed_artist_rows: usize,
    pub malformed_artwork_rows: usize,
    /// Columns removed from artworks because artists already carry them
    pub stripped_columns: Vec<String>,
    pub artwork_columns: Vec<String>,
    /// Distinct artist identifiers in the index
    pub indexed_ids: usize,
    /// Artists with at least one indexed artwork
    pub indexed_artists: usize,
}

impl LoadStats {
    /// One-line human summary.
    pub fn summary(&self) -> String {
        format!(
            "Successfully processed {} artists and {} artworks",
            self.artist_rows, self.artwork_rows_kept
        )
    }
}

/// Build a catalog from the raw text of both datasets.
pub fn load_text(artists_text: &str, artworks_text: &str) -> Catalog {
    build_catalog(parse(artists_text), parse(artworks_text))
}

/// Build a catalog from raw file bytes, detecting each file's encoding.
pub fn load_bytes(artists: &[u8], artworks: &[u8]) -> Catalog {
    load_text(&decode_bytes(artists), &decode_bytes(artworks))
}

/// Read both files and build a catalog.
pub fn load_files<A: AsRef<Path>, W: AsRef<Path>>(artists: A, artworks: W) -> LoadResult<Catalog> {
    log_info(format!("📖 Reading {}", artists.as_ref().display()));
    let artists_text = read_text(artists)?;
    log_info(format!("📖 Reading {}", artworks.as_ref().display()));
    let artworks_text = read_text(artworks)?;

    Ok(load_text(&artists_text, &artworks_text))
}

/// Reconcile and index two parsed tables.
pub fn build_catalog(artists: Table, artworks: Table) -> Catalog {
    log_info(format!("Initial artworks rows: {}", artworks.len()));
    log_info(format!("Initial artists rows: {}", artists.len()));
    if artists.dropped_rows + artworks.dropped_rows > 0 {
        log_warning(format!(
            "Skipped malformed rows: {} artists, {} artworks",
            artists.dropped_rows, artworks.dropped_rows
        ));
    }

    let reconciled = reconcile(&artists, &artworks);
    log_info(format!(
        "Artworks after filtering empty ConstituentID: {}",
        reconciled.artworks.len()
    ));
    log_info(format!(
        "Duplicate columns to remove from artworks: [{}]",
        reconciled.stripped_columns.join(", ")
    ));
    log_info_indent(
        format!("Remaining artwork columns: [{}]", reconciled.schema.columns().join(", ")),
        1,
    );

    let artist_records: Vec<Arc<Record>> = artists.records.into_iter().map(Arc::new).collect();
    let artwork_records: Vec<Arc<Record>> =
        reconciled.artworks.into_iter().map(Arc::new).collect();

    let (index, indexed_artists) = index::build(&artwork_records, &artist_records);
    log_info(format!("Artist to artworks map created: {} artists with artworks", index.len()));
    log_info(format!("Artists with artworks in collection: {}", indexed_artists.len()));

    let stats = LoadStats {
        load_id: Uuid::new_v4(),
        loaded_at: Utc::now().to_rfc3339(),
        artist_rows: artist_records.len(),
        artwork_rows_parsed: artworks.records.len(),
        artwork_rows_kept: artwork_records.len(),
        malformed_artist_rows: artists.dropped_rows,
        malformed_artwork_rows: artworks.dropped_rows,
        stripped_columns: reconciled.stripped_columns,
        artwork_columns: reconciled.schema.columns().to_vec(),
        indexed_ids: index.len(),
        indexed_artists: indexed_artists.len(),
    };
    log_success(stats.summary());

    Catalog {
        artists: artist_records,
        artworks: artwork_records,
        artist_schema: artists.schema,
        artwork_schema: reconciled.schema,
        index,
        indexed_artists,
        stats,
    }
}
