//! Schema reconciliation between the artist and artwork datasets.
//!
//! Artworks that cannot be joined are filtered out, then every column the
//! artwork side shares with the artist side is stripped from the artworks,
//! except the join key.

use std::collections::HashSet;
use std::sync::Arc;

use crate::models::{Record, Schema, CONSTITUENT_ID};
use crate::parser::Table;

/// Cleaned artworks plus what reconciliation removed.
#[derive(Debug, Clone)]
pub struct Reconciled {
    /// Artwork schema after column stripping
    pub schema: Arc<Schema>,
    /// Joinable artworks, each typed against `schema`
    pub artworks: Vec<Record>,
    /// Shared non-key columns removed from the artworks, in artist order
    pub stripped_columns: Vec<String>,
    /// Artworks discarded for lacking a join key
    pub unjoinable: usize,
}

/// True when the record carries a non-blank `ConstituentID`.
pub fn has_join_key(record: &Record) -> bool {
    record
        .constituent_id()
        .is_some_and(|id| !id.trim().is_empty())
}

/// Reconcile parsed artworks against the artist schema.
///
/// Artists are only read for their columns. A side without rows contributes
/// no columns, so nothing is stripped when either side is empty.
pub fn reconcile(artists: &Table, artworks: &Table) -> Reconciled {
    let joinable: Vec<&Record> = artworks.records.iter().filter(|r| has_join_key(r)).collect();
    let unjoinable = artworks.records.len() - joinable.len();

    let artwork_columns: &[String] = if joinable.is_empty() {
        &[]
    } else {
        artworks.schema.columns()
    };

    let stripped_columns = shared_columns(artists.effective_columns(), artwork_columns);
    let dropped: HashSet<String> = stripped_columns.iter().cloned().collect();

    let (schema, positions) = artworks.schema.without(&dropped);
    let schema = Arc::new(schema);

    let artworks = joinable
        .into_iter()
        .map(|record| record.project(Arc::clone(&schema), &positions))
        .collect();

    Reconciled {
        schema,
        artworks,
        stripped_columns,
        unjoinable,
    }
}

/// Columns present on both sides, minus the join key.
pub fn shared_columns(artist_columns: &[String], artwork_columns: &[String]) -> Vec<String> {
    artist_columns
        .iter()
        .filter(|c| c.as_str() != CONSTITUENT_ID)
        .filter(|c| artwork_columns.contains(c))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_shared_columns_stripped_key_kept() {
        let artists = parse("ConstituentID,DisplayName,Nationality\n1,Anni Albers,American");
        let artworks = parse("ConstituentID,DisplayName,Title\n1,Anni Albers,Study");

        let result = reconcile(&artists, &artworks);

        assert_eq!(result.schema.columns(), &["ConstituentID", "Title"]);
        assert_eq!(result.stripped_columns, vec!["DisplayName"]);
        assert_eq!(result.artworks[0].get("Title"), Some("Study"));
        assert_eq!(result.artworks[0].get("DisplayName"), None);
        assert_eq!(result.artworks[0].constituent_id(), Some("1"));
    }

    #[test]
    fn test_artists_untouched() {
        let artists = parse("ConstituentID,DisplayName\n1,Anni Albers");
        let artworks = parse("ConstituentID,DisplayName,Title\n1,A.,Study");

        let _ = reconcile(&artists, &artworks);

        assert_eq!(artists.records[0].get("DisplayName"), Some("Anni Albers"));
        assert_eq!(artworks.records[0].get("DisplayName"), Some("A."));
    }

    #[test]
    fn test_unjoinable_artworks_removed() {
        let artists = parse("ConstituentID,DisplayName\n1,Anni Albers");
        let artworks = parse("ConstituentID,Title\n1,Kept\n,Empty\n   ,Blank");

        let result = reconcile(&artists, &artworks);

        assert_eq!(result.artworks.len(), 1);
        assert_eq!(result.unjoinable, 2);
        assert_eq!(result.artworks[0].get("Title"), Some("Kept"));
    }

    #[test]
    fn test_missing_key_column_removes_everything() {
        let artists = parse("ConstituentID,Title\n1,x");
        let artworks = parse("ObjectID,Title\n10,Study");

        let result = reconcile(&artists, &artworks);

        assert!(result.artworks.is_empty());
        assert_eq!(result.unjoinable, 1);
        assert!(result.stripped_columns.is_empty());
    }

    #[test]
    fn test_empty_artists_strip_nothing() {
        let artists = parse("ConstituentID,DisplayName\n");
        let artworks = parse("ConstituentID,DisplayName,Title\n1,A.,Study");

        let result = reconcile(&artists, &artworks);

        assert!(result.stripped_columns.is_empty());
        assert_eq!(result.schema.columns(), &["ConstituentID", "DisplayName", "Title"]);
    }

    #[test]
    fn test_key_only_overlap() {
        let cols = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        assert!(shared_columns(&cols(&["ConstituentID"]), &cols(&["ConstituentID"])).is_empty());
        assert_eq!(
            shared_columns(&cols(&["ConstituentID", "Gender", "Date"]), &cols(&["Date", "Gender"])),
            cols(&["Gender", "Date"])
        );
    }
}
