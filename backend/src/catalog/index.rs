//! One-to-many index from artist identifier to artwork records.
//!
//! An artwork credited to several artists (`ConstituentID = "12, 34"`) is
//! listed under every identifier. Buckets hold shared references, so the
//! record itself is stored once.

use std::collections::HashMap;
use std::sync::Arc;

use crate::models::Record;

/// Artist identifier → artworks, in artwork dataset order.
#[derive(Debug, Clone, Default)]
pub struct ArtworkIndex {
    buckets: HashMap<String, Vec<Arc<Record>>>,
}

impl ArtworkIndex {
    /// Build an index over the given artworks.
    pub fn build(artworks: &[Arc<Record>]) -> Self {
        let mut index = Self::default();
        index.rebuild(artworks);
        index
    }

    /// Replace the whole index content. No previous entry survives.
    pub fn rebuild(&mut self, artworks: &[Arc<Record>]) {
        self.buckets.clear();

        for artwork in artworks {
            let ids = artwork.constituent_id().unwrap_or("");
            for id in split_ids(ids) {
                self.buckets
                    .entry(id.to_string())
                    .or_default()
                    .push(Arc::clone(artwork));
            }
        }
    }

    /// Artworks of an artist; empty for an unknown identifier.
    pub fn get(&self, artist_id: &str) -> &[Arc<Record>] {
        self.buckets
            .get(artist_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, artist_id: &str) -> bool {
        self.buckets.contains_key(artist_id)
    }

    /// Number of artworks listed under an identifier.
    pub fn count(&self, artist_id: &str) -> usize {
        self.get(artist_id).len()
    }

    /// Number of distinct identifiers.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Trimmed, non-empty identifiers of a comma-separated `ConstituentID`.
pub fn split_ids(field: &str) -> impl Iterator<Item = &str> {
    field.split(',').map(str::trim).filter(|id| !id.is_empty())
}

/// Artists whose `ConstituentID` is an index key, in artist order.
///
/// Matching is exact: artist identifiers are not trimmed.
pub fn indexed_artists(index: &ArtworkIndex, artists: &[Arc<Record>]) -> Vec<Arc<Record>> {
    artists
        .iter()
        .filter(|artist| artist.constituent_id().is_some_and(|id| index.contains(id)))
        .cloned()
        .collect()
}

/// Build the index and the indexed artist subset together.
pub fn build(
    artworks: &[Arc<Record>],
    artists: &[Arc<Record>],
) -> (ArtworkIndex, Vec<Arc<Record>>) {
    let index = ArtworkIndex::build(artworks);
    let indexed = indexed_artists(&index, artists);
    (index, indexed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_records;

    fn shared(text: &str) -> Vec<Arc<Record>> {
        parse_records(text).into_iter().map(Arc::new).collect()
    }

    #[test]
    fn test_multi_artist_artwork_in_every_bucket() {
        let artworks = shared("ConstituentID,Title\n\"12, 34\",Duet\n12,Solo");
        let index = ArtworkIndex::build(&artworks);

        let titles = |id: &str| -> Vec<String> {
            index
                .get(id)
                .iter()
                .map(|a| a.get_or_empty("Title").to_string())
                .collect()
        };

        assert_eq!(titles("12"), vec!["Duet", "Solo"]);
        assert_eq!(titles("34"), vec!["Duet"]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_buckets_share_records() {
        let artworks = shared("ConstituentID,Title\n\"1,2\",Duet");
        let index = ArtworkIndex::build(&artworks);

        assert!(Arc::ptr_eq(&index.get("1")[0], &index.get("2")[0]));
        assert!(Arc::ptr_eq(&index.get("1")[0], &artworks[0]));
    }

    #[test]
    fn test_empty_tokens_skipped() {
        let ids: Vec<&str> = split_ids(" 7 ,, 8 ,").collect();
        assert_eq!(ids, vec!["7", "8"]);

        let artworks = shared("ConstituentID,Title\n\"7,\",Study\n,Orphan");
        let index = ArtworkIndex::build(&artworks);

        assert!(!index.contains(""));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_unknown_lookup_is_empty() {
        let index = ArtworkIndex::build(&shared("ConstituentID,Title\n1,Study"));

        assert!(index.get("does-not-exist").is_empty());
        assert_eq!(index.count("does-not-exist"), 0);
    }

    #[test]
    fn test_rebuild_clears_previous_state() {
        let mut index = ArtworkIndex::build(&shared("ConstituentID,Title\n1,Old"));
        index.rebuild(&shared("ConstituentID,Title\n2,New"));

        assert!(!index.contains("1"));
        assert_eq!(index.count("2"), 1);
    }

    #[test]
    fn test_indexed_artists_keep_order() {
        let artworks = shared("ConstituentID,Title\n3,A\n1,B");
        let artists = shared("ConstituentID,DisplayName\n1,One\n2,Two\n3,Three");

        let (_, indexed) = build(&artworks, &artists);

        let names: Vec<&str> = indexed.iter().map(|a| a.get_or_empty("DisplayName")).collect();
        assert_eq!(names, vec!["One", "Three"]);
    }

    #[test]
    fn test_artist_ids_match_exactly() {
        use crate::models::Schema;

        let index = ArtworkIndex::build(&shared("ConstituentID,Title\n99,A"));
        let schema = Arc::new(Schema::new(["ConstituentID"]));
        let padded = Record::new(Arc::clone(&schema), vec![" 99".into()]).unwrap();
        let clean = Record::new(schema, vec!["99".into()]).unwrap();

        let indexed = indexed_artists(&index, &[Arc::new(padded), Arc::new(clean)]);

        assert_eq!(indexed.len(), 1);
        assert_eq!(indexed[0].constituent_id(), Some("99"));
    }
}
