//! # Artjoin - join, index and search artist and artwork collections
//!
//! Artjoin loads an artists CSV and an artworks CSV, joins them on
//! `ConstituentID` and answers the questions a collection browser asks:
//! which artists match a query, and which artworks belong to an artist.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV text   │────▶│   Parser    │────▶│  Reconcile  │────▶│    Index    │
//! │ (2 datasets)│     │  (records)  │     │ (join key)  │     │ id → works  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └──────┬──────┘
//!                                                                    │
//!                                                             ┌──────▼──────┐
//!                                                             │   Query     │
//!                                                             └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use artjoin::Catalog;
//!
//! let catalog = Catalog::load(
//!     "ConstituentID,DisplayName\n1,Anni Albers\n",
//!     "ConstituentID,Title\n1,With Verticals\n",
//! );
//!
//! assert_eq!(catalog.search("albers").matches().len(), 1);
//! assert_eq!(catalog.artworks_for("1").len(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types of the I/O and HTTP layers
//! - [`config`] - Environment and CLI configuration
//! - [`models`] - Schema, Record and view models
//! - [`parser`] - CSV dialect and encoding detection
//! - [`catalog`] - Reconciliation, index, queries and load pipeline
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Configuration
pub mod config;

// Parsing
pub mod parser;

// Join, index and query
pub mod catalog;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{LoadError, LoadResult, ServerError, ServerResult, ShapeError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{ArtistProfile, ArtistSummary, ArtworkCard, Record, Schema, CONSTITUENT_ID};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{decode_bytes, parse, parse_file, parse_records, split_line, Table};

// =============================================================================
// Re-exports - Catalog
// =============================================================================

pub use catalog::pipeline::{build_catalog, load_bytes, load_files, load_text};
pub use catalog::{
    ArtistDetail, ArtworkIndex, Catalog, Dataset, LoadStats, SearchOutcome, TablePreview,
    MAX_SEARCH_RESULTS, PREVIEW_ROWS,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::ViewerConfig;

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
