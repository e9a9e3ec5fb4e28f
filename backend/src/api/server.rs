//! HTTP Server for the artjoin API.
//!
//! # API Endpoints
//!
//! | Method | Path                          | Description                               |
//! |--------|-------------------------------|-------------------------------------------|
//! | GET    | `/health`                     | Health check                              |
//! | POST   | `/api/load`                   | Upload `artists` + `artworks` CSV files   |
//! | POST   | `/api/reload`                 | Reload from the configured files          |
//! | GET    | `/api/stats`                  | Statistics of the current load            |
//! | GET    | `/api/schema`                 | Column lists of both datasets             |
//! | GET    | `/api/artists?q=`             | Search artists with artworks              |
//! | GET    | `/api/artists/{id}`           | Artist profile and artwork cards          |
//! | GET    | `/api/artists/{id}/artworks`  | Raw artwork records of an artist          |
//! | GET    | `/api/tables/{dataset}`       | First rows of a dataset                   |
//! | GET    | `/api/logs`                   | SSE stream for real-time logs             |
//!
//! The catalog is swapped whole on every load: a request sees either the
//! previous catalog or the new one.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde::Deserialize;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio::sync::RwLock;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use super::logs::{log_error, log_info, log_success, log_warning, LOG_BROADCASTER};
use super::types::{error_response, ArtworksResponse, LoadResponse, SchemaResponse, SearchResponse};
use crate::catalog::pipeline::{load_bytes, load_files};
use crate::catalog::{ArtistDetail, Catalog, Dataset, LoadStats, TablePreview, PREVIEW_ROWS};
use crate::config::ViewerConfig;
use crate::error::{LoadError, ServerError, ServerResult};

/// Largest accepted `/api/load` request body.
pub const UPLOAD_LIMIT_BYTES: usize = 256 * 1024 * 1024;

/// Error half of every handler result.
type ApiError = (StatusCode, Json<Value>);

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    catalog: Arc<RwLock<Option<Catalog>>>,
    config: Arc<ViewerConfig>,
}

impl AppState {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(None)),
            config: Arc::new(config),
        }
    }

    /// Replace the current catalog in one step.
    pub async fn install(&self, catalog: Catalog) {
        *self.catalog.write().await = Some(catalog);
    }

    /// Build a catalog from the configured files and install it.
    pub async fn reload_from_config(&self) -> ServerResult<LoadResponse> {
        let config = Arc::clone(&self.config);
        let catalog = build_off_runtime(move || {
            load_files(&config.artists_path, &config.artworks_path)
        })
        .await??;
        let response = LoadResponse::from(&catalog);
        self.install(catalog).await;
        Ok(response)
    }

    /// Run `f` against the current catalog.
    async fn read<T>(&self, f: impl FnOnce(&Catalog) -> ServerResult<T>) -> ServerResult<T> {
        let guard = self.catalog.read().await;
        let catalog = guard.as_ref().ok_or(ServerError::NotLoaded)?;
        f(catalog)
    }
}

/// Run a catalog build on the blocking pool.
async fn build_off_runtime<T, F>(build: F) -> ServerResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(build)
        .await
        .map_err(|e| ServerError::Internal(format!("Catalog build failed: {}", e)))
}

/// Build the router over the given state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    let static_dir = state.config.static_dir.clone();

    let app = Router::new()
        .route("/health", get(health))
        .route(
            "/api/load",
            post(load_upload).layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES)),
        )
        .route("/api/reload", post(reload))
        .route("/api/stats", get(stats))
        .route("/api/schema", get(schema))
        .route("/api/artists", get(search_artists))
        .route("/api/artists/{id}", get(artist_detail))
        .route("/api/artists/{id}/artworks", get(artist_artworks))
        .route("/api/tables/{dataset}", get(table_preview))
        .route("/api/logs", get(sse_logs));

    // Front-end assets take over `/` when configured.
    let app = match static_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app.route("/", get(health)),
    };

    app.with_state(state).layer(cors)
}

/// Start the HTTP server
pub async fn start_server(config: ViewerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let port = config.port;
    let state = AppState::new(config);

    // Serving without data is fine: a catalog can be uploaded later.
    match state.reload_from_config().await {
        Ok(loaded) => log_success(loaded.message),
        Err(e) => log_warning(format!("Starting without a catalog: {}", e)),
    }

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 Artjoin server running on http://localhost:{}", port);
    println!("   POST /api/load              - Upload artists + artworks CSV");
    println!("   GET  /api/artists?q=        - Search artists");
    println!("   GET  /api/artists/{{id}}      - Artist detail");
    println!("   GET  /api/logs              - SSE log stream");
    println!("   GET  /health                - Health check");
    println!();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn reject(err: ServerError) -> ApiError {
    let status = match &err {
        ServerError::BadRequest(_) | ServerError::Load(LoadError::MissingInput(_)) => {
            StatusCode::BAD_REQUEST
        }
        ServerError::NotLoaded => StatusCode::SERVICE_UNAVAILABLE,
        ServerError::NotFound(_) => StatusCode::NOT_FOUND,
        ServerError::Load(_) | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        log_error(err.to_string());
    }
    (status, Json(error_response(&err.to_string())))
}

/// Health check endpoint
async fn health(State(state): State<AppState>) -> Json<Value> {
    let loaded = state.catalog.read().await.is_some();
    Json(json!({
        "status": "ok",
        "service": "artjoin",
        "version": env!("CARGO_PKG_VERSION"),
        "catalogLoaded": loaded,
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        // Lagged receivers just skip what they missed
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Upload both datasets as multipart fields `artists` and `artworks`
async fn load_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<LoadResponse>, ApiError> {
    let mut artists: Option<Vec<u8>> = None;
    let mut artworks: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| reject(ServerError::BadRequest(format!("Multipart error: {}", e))))?
    {
        let name = field.name().unwrap_or("").to_string();
        let slot = match name.as_str() {
            "artists" => &mut artists,
            "artworks" => &mut artworks,
            _ => continue,
        };

        let file_name = field.file_name().unwrap_or("unnamed").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| reject(ServerError::BadRequest(format!("Read error: {}", e))))?;
        log_info(format!("📄 Received {}: {} ({} bytes)", name, file_name, bytes.len()));
        *slot = Some(bytes.to_vec());
    }

    let artists = artists
        .ok_or_else(|| reject(LoadError::MissingInput("artists file".into()).into()))?;
    let artworks = artworks
        .ok_or_else(|| reject(LoadError::MissingInput("artworks file".into()).into()))?;

    let catalog = build_off_runtime(move || load_bytes(&artists, &artworks))
        .await
        .map_err(reject)?;
    let response = LoadResponse::from(&catalog);
    state.install(catalog).await;

    Ok(Json(response))
}

/// Reload from the configured file paths
async fn reload(State(state): State<AppState>) -> Result<Json<LoadResponse>, ApiError> {
    state.reload_from_config().await.map(Json).map_err(reject)
}

async fn stats(State(state): State<AppState>) -> Result<Json<LoadStats>, ApiError> {
    state
        .read(|catalog| Ok(catalog.stats().clone()))
        .await
        .map(Json)
        .map_err(reject)
}

async fn schema(State(state): State<AppState>) -> Result<Json<SchemaResponse>, ApiError> {
    state
        .read(|catalog| Ok(SchemaResponse::from(catalog)))
        .await
        .map(Json)
        .map_err(reject)
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

async fn search_artists(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    state
        .read(|catalog| Ok(SearchResponse::for_query(catalog, &params.q)))
        .await
        .map(Json)
        .map_err(reject)
}

async fn artist_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ArtistDetail>, ApiError> {
    state
        .read(|catalog| {
            catalog
                .artist_detail(&id)
                .ok_or_else(|| ServerError::NotFound(format!("artist '{}'", id)))
        })
        .await
        .map(Json)
        .map_err(reject)
}

async fn artist_artworks(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ArtworksResponse>, ApiError> {
    state
        .read(|catalog| {
            let artworks: Vec<_> = catalog
                .artworks_for(&id)
                .iter()
                .map(|a| a.as_ref().clone())
                .collect();
            Ok(ArtworksResponse {
                artist_id: id.clone(),
                count: artworks.len(),
                artworks,
            })
        })
        .await
        .map(Json)
        .map_err(reject)
}

#[derive(Debug, Deserialize)]
struct PreviewParams {
    limit: Option<usize>,
}

async fn table_preview(
    State(state): State<AppState>,
    Path(dataset): Path<Dataset>,
    Query(params): Query<PreviewParams>,
) -> Result<Json<TablePreview>, ApiError> {
    let limit = params.limit.unwrap_or(PREVIEW_ROWS);
    state
        .read(|catalog| Ok(catalog.preview(dataset, limit)))
        .await
        .map(Json)
        .map_err(reject)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    const ARTISTS: &str = "ConstituentID,DisplayName,Nationality\n1,Anni Albers,American\n2,Ruth Asawa,American\n3,Nobody,\n";
    const ARTWORKS: &str = "ConstituentID,Title,Nationality\n\"1, 2\",Duet,x\n2,Wire,y\n";

    async fn loaded_state() -> AppState {
        let state = AppState::new(ViewerConfig::default());
        state.install(Catalog::load(ARTISTS, ARTWORKS)).await;
        state
    }

    #[tokio::test]
    async fn test_not_loaded() {
        let state = AppState::new(ViewerConfig::default());

        let err = stats(State(state)).await.unwrap_err();
        assert_eq!(err.0, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.1 .0["status"], "error");
    }

    #[tokio::test]
    async fn test_search_handler() {
        let state = loaded_state().await;

        let Json(response) = search_artists(
            State(state.clone()),
            Query(SearchParams { q: "asawa".into() }),
        )
        .await
        .unwrap();
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["state"], "results");
        assert_eq!(value["artists"][0]["artworkCount"], 2);

        let Json(response) = search_artists(State(state), Query(SearchParams { q: "a".into() }))
            .await
            .unwrap();
        assert!(matches!(response, SearchResponse::NoQuery));
    }

    #[tokio::test]
    async fn test_artist_detail_handler() {
        let state = loaded_state().await;

        let Json(detail) = artist_detail(State(state.clone()), Path("3".into()))
            .await
            .unwrap();
        assert_eq!(detail.profile.name, "Nobody");
        assert!(detail.artworks.is_empty());

        let err = artist_detail(State(state), Path("404".into())).await.unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_artworks_handler_unknown_is_empty() {
        let state = loaded_state().await;

        let Json(found) = artist_artworks(State(state.clone()), Path("1".into()))
            .await
            .unwrap();
        assert_eq!(found.count, 1);
        assert_eq!(found.artworks[0].get("Nationality"), None);

        let Json(none) = artist_artworks(State(state), Path("does-not-exist".into()))
            .await
            .unwrap();
        assert_eq!(none.count, 0);
    }

    #[tokio::test]
    async fn test_install_replaces_catalog() {
        let state = loaded_state().await;
        state
            .install(Catalog::load(ARTISTS, "ConstituentID,Title\n3,Only\n"))
            .await;

        let Json(current) = stats(State(state.clone())).await.unwrap();
        assert_eq!(current.indexed_artists, 1);

        let Json(preview) = table_preview(
            State(state),
            Path(Dataset::Artworks),
            Query(PreviewParams { limit: None }),
        )
        .await
        .unwrap();
        assert_eq!(preview.total, 1);
        assert_eq!(preview.columns, vec!["ConstituentID", "Title"]);
    }

    #[tokio::test]
    async fn test_reload_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = ViewerConfig::default()
            .with_artists(Some(dir.path().join("none.csv")))
            .with_artworks(Some(dir.path().join("none.csv")));
        let state = AppState::new(config);

        let err = reload(State(state)).await.unwrap_err();
        assert_eq!(err.0, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_reload_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let artists = dir.path().join("Artists.csv");
        let artworks = dir.path().join("artworks_sampled.csv");
        std::fs::write(&artists, ARTISTS).unwrap();
        std::fs::write(&artworks, ARTWORKS).unwrap();

        let state = AppState::new(
            ViewerConfig::default()
                .with_artists(Some(artists))
                .with_artworks(Some(artworks)),
        );

        let Json(loaded) = reload(State(state.clone())).await.unwrap();
        assert_eq!(loaded.stats.artwork_rows_kept, 2);

        let Json(columns) = schema(State(state)).await.unwrap();
        assert_eq!(columns.artworks, vec!["ConstituentID", "Title"]);
    }

    const BOUNDARY: &str = "artjoin-test-boundary";

    fn multipart_body(files: &[(&str, &str)]) -> String {
        let mut body = String::new();
        for (name, content) in files {
            body.push_str(&format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"{name}\"; filename=\"{name}.csv\"\r\n\
                 Content-Type: text/csv\r\n\r\n\
                 {content}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        body
    }

    async fn post_upload(state: AppState, body: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/load")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_upload_larger_than_default_body_limit() {
        let mut artists = String::from("ConstituentID,DisplayName,Nationality,ArtistBio\n");
        for i in 0..60_000 {
            artists.push_str(&format!("{i},Artist number {i},American,\"American, born 1900\"\n"));
        }
        let body = multipart_body(&[
            ("artists", artists.as_str()),
            ("artworks", "ConstituentID,Title\n7,Study\n"),
        ]);
        assert!(body.len() > 2 * 1024 * 1024);

        let state = AppState::new(ViewerConfig::default());
        let (status, value) = post_upload(state.clone(), body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["status"], "ready");
        assert_eq!(value["message"], "Successfully processed 60000 artists and 1 artworks");

        let Json(current) = stats(State(state)).await.unwrap();
        assert_eq!(current.indexed_artists, 1);
    }

    #[tokio::test]
    async fn test_upload_missing_artists_file() {
        let body = multipart_body(&[("artworks", "ConstituentID,Title\n1,Study\n")]);
        let state = AppState::new(ViewerConfig::default());

        let (status, value) = post_upload(state.clone(), body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["status"], "error");
        assert!(value["error"].as_str().unwrap().contains("artists file"));
        assert!(state.catalog.read().await.is_none());
    }
}
