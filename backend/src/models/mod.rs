//! Domain models for the artist/artwork catalog.
//!
//! This module contains the data structures shared by every pipeline stage:
//!
//! - [`Schema`] - Ordered, de-duplicated column list of one dataset
//! - [`Record`] - One row, typed against its dataset's [`Schema`]
//! - [`ArtistSummary`] - Search result line for an artist
//! - [`ArtistProfile`] - Artist detail header
//! - [`ArtworkCard`] - Display-ready artwork fields with fallbacks

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::ShapeError;

/// Join key shared by the artist and artwork datasets.
pub const CONSTITUENT_ID: &str = "ConstituentID";

// =============================================================================
// Schema
// =============================================================================

/// Column names of a dataset, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    /// Build a schema from column names, dropping repeated names.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (schema, _) = Self::from_header(columns);
        schema
    }

    /// Schema with no columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a schema from raw header fields.
    ///
    /// Returns the schema plus, for every header field, the column slot it
    /// writes into. A repeated name maps onto the slot of its first
    /// occurrence, so a later field overwrites an earlier one.
    pub fn from_header<I, S>(fields: I) -> (Self, Vec<usize>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut columns: Vec<String> = Vec::new();
        let mut slots = Vec::new();

        for field in fields {
            let name = field.into();
            match columns.iter().position(|c| *c == name) {
                Some(slot) => slots.push(slot),
                None => {
                    slots.push(columns.len());
                    columns.push(name);
                }
            }
        }

        (Self { columns }, slots)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column, if present.
    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.position(column).is_some()
    }

    /// Schema without the given columns, plus the kept positions of `self`.
    pub fn without(&self, dropped: &HashSet<String>) -> (Schema, Vec<usize>) {
        let kept: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| !dropped.contains(*c))
            .map(|(i, _)| i)
            .collect();

        let columns = kept.iter().map(|&i| self.columns[i].clone()).collect();
        (Schema { columns }, kept)
    }
}

// =============================================================================
// Record
// =============================================================================

/// One dataset row. Every value is a raw string; no type inference.
///
/// A record always holds exactly one value per schema column.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: Arc<Schema>,
    values: Vec<String>,
}

impl Record {
    /// Create a record, rejecting values that do not match the schema shape.
    pub fn new(schema: Arc<Schema>, values: Vec<String>) -> Result<Self, ShapeError> {
        if values.len() != schema.len() {
            return Err(ShapeError {
                expected: schema.len(),
                found: values.len(),
            });
        }
        Ok(Self { schema, values })
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Value of a column, `None` if the dataset has no such column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.schema
            .position(column)
            .map(|i| self.values[i].as_str())
    }

    /// Value of a column, treating a missing column as an empty string.
    pub fn get_or_empty(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    /// Value of a column only when it is present and non-empty.
    pub fn non_empty(&self, column: &str) -> Option<&str> {
        self.get(column).filter(|v| !v.is_empty())
    }

    /// The raw join key field.
    pub fn constituent_id(&self) -> Option<&str> {
        self.get(CONSTITUENT_ID)
    }

    /// `(column, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.schema
            .columns()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }

    /// Copy of this record restricted to `positions`, typed against `schema`.
    pub(crate) fn project(&self, schema: Arc<Schema>, positions: &[usize]) -> Record {
        let values = positions.iter().map(|&i| self.values[i].clone()).collect();
        Record { schema, values }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

// =============================================================================
// View models
// =============================================================================

/// One line of an artist search result.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArtistSummary {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    /// `(Begin-End)`, only when both dates are known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifespan: Option<String>,
    pub artwork_count: usize,
}

impl ArtistSummary {
    pub fn from_record(artist: &Record, artwork_count: usize) -> Self {
        let lifespan = match (artist.non_empty("BeginDate"), artist.non_empty("EndDate")) {
            (Some(begin), Some(end)) => Some(format!("({}-{})", begin, end)),
            _ => None,
        };

        Self {
            id: artist.get_or_empty(CONSTITUENT_ID).to_string(),
            name: display_name(artist),
            nationality: artist.non_empty("Nationality").map(String::from),
            lifespan,
            artwork_count,
        }
    }
}

/// Header of an artist detail view.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArtistProfile {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub born: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub died: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub artwork_count: usize,
}

impl ArtistProfile {
    pub fn from_record(artist: &Record, artwork_count: usize) -> Self {
        // Dates are shown as a pair or not at all.
        let (born, died) = match (artist.non_empty("BeginDate"), artist.non_empty("EndDate")) {
            (Some(begin), Some(end)) => (Some(begin.to_string()), Some(end.to_string())),
            _ => (None, None),
        };

        Self {
            id: artist.get_or_empty(CONSTITUENT_ID).to_string(),
            name: display_name(artist),
            nationality: artist.non_empty("Nationality").map(String::from),
            born,
            died,
            gender: artist.non_empty("Gender").map(String::from),
            artwork_count,
        }
    }
}

/// Display-ready artwork fields.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkCard {
    pub title: String,
    pub date: String,
    pub medium: String,
    pub dimensions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl ArtworkCard {
    pub fn from_record(artwork: &Record) -> Self {
        let field = |column: &str, fallback: &str| {
            artwork.non_empty(column).unwrap_or(fallback).to_string()
        };

        Self {
            title: field("Title", "Untitled"),
            date: field("Date", "Unknown Date"),
            medium: field("Medium", "Unknown Medium"),
            dimensions: field("Dimensions", "Unknown Dimensions"),
            image_url: artwork
                .non_empty("ThumbnailURL")
                .or_else(|| artwork.non_empty("ImageURL"))
                .map(String::from),
            department: artwork.non_empty("Department").map(String::from),
        }
    }
}

fn display_name(artist: &Record) -> String {
    artist
        .non_empty("DisplayName")
        .unwrap_or("Unknown Artist")
        .to_string()
}
