//! REST API types for frontend integration.

use serde::Serialize;
use serde_json::{json, Value};

use crate::catalog::{Catalog, LoadStats};
use crate::models::{ArtistSummary, Record};

/// Shown by the front end when a search finds nobody.
pub const NO_MATCHES_MESSAGE: &str = "No artists found with artworks in collection";

/// Response sent after the catalog has been (re)built.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadResponse {
    /// Always "ready"
    pub status: String,
    /// Human summary of the load
    pub message: String,
    pub stats: LoadStats,
}

impl From<&Catalog> for LoadResponse {
    fn from(catalog: &Catalog) -> Self {
        let stats = catalog.stats().clone();
        LoadResponse {
            status: "ready".to_string(),
            message: stats.summary(),
            stats,
        }
    }
}

/// Artist search result.
///
/// `noQuery` means the query was too short to run; `results` may be empty.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SearchResponse {
    NoQuery,
    Results {
        query: String,
        artists: Vec<ArtistSummary>,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl SearchResponse {
    /// Run a search against the catalog.
    pub fn for_query(catalog: &Catalog, query: &str) -> Self {
        match catalog.search_summaries(query) {
            None => SearchResponse::NoQuery,
            Some(artists) => {
                let message = artists.is_empty().then(|| NO_MATCHES_MESSAGE.to_string());
                SearchResponse::Results {
                    query: query.trim().to_string(),
                    artists,
                    message,
                }
            }
        }
    }
}

/// Raw artwork records of one artist.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworksResponse {
    pub artist_id: String,
    pub count: usize,
    pub artworks: Vec<Record>,
}

/// Column lists of both datasets.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaResponse {
    pub artists: Vec<String>,
    pub artworks: Vec<String>,
}

impl From<&Catalog> for SchemaResponse {
    fn from(catalog: &Catalog) -> Self {
        SchemaResponse {
            artists: catalog.artist_columns().to_vec(),
            artworks: catalog.artwork_columns().to_vec(),
        }
    }
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "status": "error",
        "error": error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::load(
            "ConstituentID,DisplayName,Nationality\n1,Anni Albers,American\n2,Ruth Asawa,American\n",
            "ConstituentID,Title\n1,Study\n\"1,2\",Duet\n",
        )
    }

    #[test]
    fn test_no_query_state() {
        let catalog = catalog();
        let response = SearchResponse::for_query(&catalog, "a");

        assert_eq!(serde_json::to_value(response).unwrap(), json!({ "state": "noQuery" }));
    }

    #[test]
    fn test_results_state() {
        let catalog = catalog();
        let response = SearchResponse::for_query(&catalog, " anni ");

        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({
                "state": "results",
                "query": "anni",
                "artists": [{
                    "id": "1",
                    "name": "Anni Albers",
                    "nationality": "American",
                    "artworkCount": 2
                }]
            })
        );
    }

    #[test]
    fn test_empty_results_carry_message() {
        let catalog = catalog();
        let response = SearchResponse::for_query(&catalog, "zz");
        let value = serde_json::to_value(response).unwrap();

        assert_eq!(value["state"], "results");
        assert_eq!(value["artists"], json!([]));
        assert_eq!(value["message"], NO_MATCHES_MESSAGE);
    }

    #[test]
    fn test_load_response() {
        let response = LoadResponse::from(&catalog());

        assert_eq!(response.status, "ready");
        assert_eq!(response.message, "Successfully processed 2 artists and 2 artworks");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["stats"]["indexedArtists"], 2);
    }

    #[test]
    fn test_error_response() {
        let value = error_response("No catalog loaded");
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"], "No catalog loaded");
    }
}
