//! Read-only queries over a built index.

use std::sync::Arc;

use super::index::ArtworkIndex;
use crate::models::Record;

/// Shortest query that is searched at all.
pub const MIN_QUERY_CHARS: usize = 2;

/// Result cap for artist search.
pub const MAX_SEARCH_RESULTS: usize = 20;

/// Artist fields matched against the query.
pub const SEARCH_FIELDS: [&str; 3] = ["DisplayName", "ArtistBio", "Nationality"];

/// Outcome of an artist search.
///
/// `NoQuery` (query too short) is distinct from `Matches` with nothing in it.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<'a> {
    NoQuery,
    Matches(Vec<&'a Record>),
}

impl<'a> SearchOutcome<'a> {
    pub fn is_no_query(&self) -> bool {
        matches!(self, SearchOutcome::NoQuery)
    }

    /// Matched artists; empty for `NoQuery`.
    pub fn matches(&self) -> &[&'a Record] {
        match self {
            SearchOutcome::NoQuery => &[],
            SearchOutcome::Matches(found) => found,
        }
    }
}

/// Trim and lower-case a raw query; `None` when it is too short to search.
pub fn normalize_query(raw: &str) -> Option<String> {
    let query = raw.trim().to_lowercase();
    (query.chars().count() >= MIN_QUERY_CHARS).then_some(query)
}

/// Substring search over indexed artists, in their order, capped at
/// [`MAX_SEARCH_RESULTS`]. A missing field counts as an empty string.
pub fn search<'a>(indexed_artists: &'a [Arc<Record>], raw_query: &str) -> SearchOutcome<'a> {
    let query = match normalize_query(raw_query) {
        Some(q) => q,
        None => return SearchOutcome::NoQuery,
    };

    let found = indexed_artists
        .iter()
        .map(Arc::as_ref)
        .filter(|artist| matches_query(artist, &query))
        .take(MAX_SEARCH_RESULTS)
        .collect();

    SearchOutcome::Matches(found)
}

/// True when any searchable field contains the lower-cased query.
pub fn matches_query(artist: &Record, query: &str) -> bool {
    SEARCH_FIELDS
        .iter()
        .any(|field| artist.get_or_empty(field).to_lowercase().contains(query))
}

/// Artworks indexed under an artist; empty when the identifier is unknown.
pub fn artworks_for<'a>(index: &'a ArtworkIndex, artist_id: &str) -> &'a [Arc<Record>] {
    index.get(artist_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::index;
    use crate::parser::parse_records;

    fn shared(text: &str) -> Vec<Arc<Record>> {
        parse_records(text).into_iter().map(Arc::new).collect()
    }

    fn names<'a>(outcome: &SearchOutcome<'a>) -> Vec<&'a str> {
        outcome
            .matches()
            .iter()
            .map(|&a| a.get_or_empty("DisplayName"))
            .collect()
    }

    fn fixture() -> (ArtworkIndex, Vec<Arc<Record>>) {
        let artists = shared(
            "ConstituentID,DisplayName,ArtistBio,Nationality\n\
             1,Anni Albers,\"American, 1899-1994\",American\n\
             2,Josef Albers,\"American, born Germany\",German\n\
             3,Ruth Asawa,\"American, 1926-2013\",American\n\
             99,Anni Albers Twin,,Unknown",
        );
        let artworks = shared("ConstituentID,Title\n1,Study\n\"2, 3\",Duet");
        index::build(&artworks, &artists)
    }

    #[test]
    fn test_short_query_is_no_query() {
        let (_, indexed) = fixture();

        assert!(search(&indexed, "a").is_no_query());
        assert!(search(&indexed, "").is_no_query());
        assert!(search(&indexed, "  a  ").is_no_query());
    }

    #[test]
    fn test_zero_matches_is_not_no_query() {
        let (_, indexed) = fixture();
        let outcome = search(&indexed, "zz");

        assert!(!outcome.is_no_query());
        assert!(outcome.matches().is_empty());
    }

    #[test]
    fn test_case_insensitive_substring() {
        let (_, indexed) = fixture();

        assert_eq!(names(&search(&indexed, "ALBERS")), vec!["Anni Albers", "Josef Albers"]);
        assert_eq!(names(&search(&indexed, "german")), vec!["Josef Albers"]);
        assert_eq!(names(&search(&indexed, "1926")), vec!["Ruth Asawa"]);
    }

    #[test]
    fn test_unindexed_artist_never_returned() {
        let (_, indexed) = fixture();

        assert!(names(&search(&indexed, "anni albers twin")).is_empty());
        assert!(!names(&search(&indexed, "an")).contains(&"Anni Albers Twin"));
    }

    #[test]
    fn test_results_capped_in_order() {
        let mut artists = String::from("ConstituentID,DisplayName\n");
        let mut artworks = String::from("ConstituentID,Title\n");
        for i in 0..30 {
            artists.push_str(&format!("{i},Artist {i}\n"));
            artworks.push_str(&format!("{i},Work {i}\n"));
        }
        let (_, indexed) = index::build(&shared(&artworks), &shared(&artists));

        let found = names(&search(&indexed, "artist"));
        let expected: Vec<String> = (0..MAX_SEARCH_RESULTS)
            .map(|i| format!("Artist {i}"))
            .collect();

        assert_eq!(found.len(), MAX_SEARCH_RESULTS);
        assert_eq!(found, expected);
    }

    #[test]
    fn test_missing_search_fields() {
        let artists = shared("ConstituentID,Nationality\n1,Swiss");
        let artworks = shared("ConstituentID,Title\n1,Study");
        let (_, indexed) = index::build(&artworks, &artists);

        assert_eq!(search(&indexed, "swiss").matches().len(), 1);
    }

    #[test]
    fn test_artworks_for() {
        let (index, _) = fixture();

        assert_eq!(artworks_for(&index, "3").len(), 1);
        assert_eq!(artworks_for(&index, "3")[0].get("Title"), Some("Duet"));
        assert!(artworks_for(&index, "does-not-exist").is_empty());
    }
}
