//! Web API module for InteriorRec.
//!
//! This module exposes the interactive design session to the browser-side
//! 3D view: it accepts the UI events (select, drag, like/dislike, replace,
//! option choice, design load) and returns the resulting view model.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET|PUT /api/room` - Room geometry
//! - `POST /api/generate` - Run a generation round for the current room
//! - `GET /api/options` - Candidates awaiting a choice
//! - `POST /api/options/{index}/select` - Activate one candidate
//! - `GET /api/view`, `PUT /api/design` - View model / load a design
//! - `POST|DELETE /api/selection`, `POST /api/selection/ack` - Selection
//! - `POST /api/drag/begin|move|end` - Drag gesture
//! - `POST /api/items/{id}/like|dislike`, `DELETE /api/items/{id}/feedback`
//! - `POST /api/items/{id}/like/toggle|dislike/toggle` - Feedback toggles
//! - `DELETE /api/search-prompt` - Dismiss the guided-search prompt
//! - `POST /api/items/{id}/search` - Search panel for an item
//! - `POST /api/items/{id}/replace` - Substitute an item with a candidate
//! - `GET /api/assets/{id}` - Model bytes, or a placeholder descriptor

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::config::Config;
use crate::models::{CatalogItem, RoomDesign, RoomGeometry, Scene, WorldPoint};
use crate::services::{
    fetch_scenes, generate_options, run_search, thumbnail_url, AssetLoader, AssetSlot,
    DesignBackend, HttpAssetLoader, HttpBackend,
};
use crate::session::{
    DragCommit, DragStart, GenerationOutcome, OptionSummary, Replacement, Session, SessionView,
    GENERATION_FAILED_MESSAGE,
};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the web API.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    config: Arc<Config>,
    /// The one interactive session
    session: Arc<Mutex<Session>>,
    /// Generation/recommendation service
    backend: Arc<dyn DesignBackend>,
    /// Model loader
    assets: Arc<dyn AssetLoader>,
}

impl AppState {
    /// Creates application state talking to the configured HTTP services.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let timeout = config.backend.request_timeout();
        let backend = HttpBackend::new(config.backend.base_url.clone(), timeout)?;
        let assets = HttpAssetLoader::new(config.model_base_url().to_string(), timeout)?;
        Ok(Self::with_services(config, Arc::new(backend), Arc::new(assets)))
    }

    /// Creates application state with explicit service implementations.
    pub fn with_services(
        config: Config,
        backend: Arc<dyn DesignBackend>,
        assets: Arc<dyn AssetLoader>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            session: Arc::new(Mutex::new(Session::default())),
            backend,
            assets,
        }
    }

    /// Handle to the session.
    #[must_use]
    pub fn session(&self) -> Arc<Mutex<Session>> {
        Arc::clone(&self.session)
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Current health status (e.g., "healthy").
    pub status: String,
    /// Application version.
    pub version: String,
}

/// Response to every interaction event.
#[derive(Debug, Serialize)]
pub struct EventResponse {
    /// Whether the event changed anything.
    pub changed: bool,
    /// View model after the event.
    pub view: SessionView,
}

/// Body naming one item.
#[derive(Debug, Deserialize)]
pub struct ItemRequest {
    /// Item id.
    pub item_id: String,
}

/// Drag move body: either a delta or an absolute floor position.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DragMoveRequest {
    /// Shift by `(dx, dz)`.
    Delta {
        /// X delta.
        dx: f64,
        /// Z delta.
        dz: f64,
    },
    /// Move to `(x, z)`.
    To {
        /// World x.
        x: f64,
        /// World z.
        z: f64,
    },
}

/// Generation round response.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// Status of the round ("ready").
    pub status: String,
    /// Epoch of the round.
    pub epoch: u64,
    /// Candidates to choose from.
    pub options: Vec<OptionSummary>,
}

/// Option list response.
#[derive(Debug, Serialize)]
pub struct OptionListResponse {
    /// Candidates to choose from.
    pub options: Vec<OptionSummary>,
}

/// Search request body.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Free text typed by the user.
    #[serde(default)]
    pub query: String,
}

/// Catalogue entry with its thumbnail resolved.
#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    /// The entry.
    #[serde(flatten)]
    pub item: CatalogItem,
    /// Thumbnail URL; absent means "no preview".
    pub thumbnail_url: Option<String>,
}

/// Search panel response.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Text/semantic matches.
    pub matches: Vec<CatalogEntry>,
    /// Similar items.
    pub similar: Vec<CatalogEntry>,
    /// Similar items that fit the rest of the scene.
    pub goes_with: Vec<CatalogEntry>,
    /// Whole scenes that go with the item.
    pub scenes: Vec<Vec<CatalogEntry>>,
}

/// Replacement response.
#[derive(Debug, Serialize)]
pub struct ReplaceResponse {
    /// "replaced", "not_found" or "duplicate_id".
    pub outcome: String,
    /// Whether selection waits for an unmount acknowledgement.
    pub reselect_pending: bool,
    /// View model after the replacement.
    pub view: SessionView,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Error message.
    pub error: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

fn entries(base_url: &str, items: Vec<CatalogItem>) -> Vec<CatalogEntry> {
    items
        .into_iter()
        .map(|item| CatalogEntry {
            thumbnail_url: thumbnail_url(base_url, item.image_id.as_deref()),
            item,
        })
        .collect()
}

fn scene_entries(base_url: &str, scenes: Vec<Scene>) -> Vec<Vec<CatalogEntry>> {
    scenes.into_iter().map(|s| entries(base_url, s)).collect()
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Applies `event` to the session and returns the resulting view.
async fn apply<F>(state: &AppState, event: F) -> Json<EventResponse>
where
    F: FnOnce(&mut Session) -> bool,
{
    let mut session = state.session.lock().await;
    let changed = event(&mut session);
    Json(EventResponse {
        changed,
        view: session.view(),
    })
}

async fn get_room(State(state): State<AppState>) -> Json<RoomGeometry> {
    Json(state.session.lock().await.room().clone())
}

async fn put_room(
    State(state): State<AppState>,
    Json(room): Json<RoomGeometry>,
) -> ApiResult<EventResponse> {
    room.validate().map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::with_details("Invalid room geometry", e.to_string())),
        )
    })?;

    Ok(apply(&state, |s| {
        s.set_room(room);
        true
    })
    .await)
}

/// Runs a generation round. The session lock is not held while waiting.
async fn generate(State(state): State<AppState>) -> ApiResult<GenerateResponse> {
    let ticket = state
        .session
        .lock()
        .await
        .begin_generation(&state.config.design.room_type, &state.config.design.styles);

    let result = generate_options(state.backend.as_ref(), &ticket.requests).await;
    let details = result.as_ref().err().map(ToString::to_string);

    let mut session = state.session.lock().await;
    match session.complete_generation(ticket.epoch, result) {
        GenerationOutcome::Ready(_) => Ok(Json(GenerateResponse {
            status: "ready".to_string(),
            epoch: ticket.epoch,
            options: session.options().summaries(),
        })),
        GenerationOutcome::Failed => Err((
            StatusCode::BAD_GATEWAY,
            Json(ApiError::with_details(
                GENERATION_FAILED_MESSAGE,
                details.unwrap_or_default(),
            )),
        )),
        GenerationOutcome::Stale => Err((
            StatusCode::CONFLICT,
            Json(ApiError::new("Generation superseded by a newer request")),
        )),
    }
}

async fn list_options(State(state): State<AppState>) -> Json<OptionListResponse> {
    Json(OptionListResponse {
        options: state.session.lock().await.options().summaries(),
    })
}

async fn select_option(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Json<EventResponse> {
    apply(&state, |s| s.select_option(index)).await
}

async fn get_view(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.session.lock().await.view())
}

async fn load_design(
    State(state): State<AppState>,
    Json(design): Json<RoomDesign>,
) -> Json<EventResponse> {
    apply(&state, |s| {
        s.load_design(design);
        true
    })
    .await
}

async fn select_item(
    State(state): State<AppState>,
    Json(request): Json<ItemRequest>,
) -> Json<EventResponse> {
    apply(&state, |s| s.select(&request.item_id)).await
}

async fn unselect_item(State(state): State<AppState>) -> Json<EventResponse> {
    apply(&state, Session::unselect).await
}

async fn acknowledge_unmount(
    State(state): State<AppState>,
    Json(request): Json<ItemRequest>,
) -> Json<EventResponse> {
    apply(&state, |s| s.acknowledge_unmount(&request.item_id).is_some()).await
}

async fn begin_drag(
    State(state): State<AppState>,
    Json(request): Json<ItemRequest>,
) -> Json<EventResponse> {
    apply(&state, |s| {
        matches!(
            s.begin_drag(&request.item_id),
            Some(DragStart::Started | DragStart::SelectedInstead)
        )
    })
    .await
}

async fn move_drag(
    State(state): State<AppState>,
    Json(request): Json<DragMoveRequest>,
) -> Json<EventResponse> {
    apply(&state, |s| match request {
        DragMoveRequest::Delta { dx, dz } => s.drag_by(WorldPoint::new(dx, 0.0, dz)),
        DragMoveRequest::To { x, z } => s.drag_to(WorldPoint::new(x, 0.0, z)),
    })
    .await
}

async fn end_drag(State(state): State<AppState>) -> Json<EventResponse> {
    apply(&state, |s| matches!(s.end_drag(), DragCommit::Committed(_))).await
}

async fn like_item(State(state): State<AppState>, Path(item_id): Path<String>) -> Json<EventResponse> {
    apply(&state, |s| {
        s.like(&item_id);
        true
    })
    .await
}

async fn dislike_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Json<EventResponse> {
    apply(&state, |s| {
        s.dislike(&item_id);
        true
    })
    .await
}

async fn clear_feedback(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Json<EventResponse> {
    apply(&state, |s| {
        s.clear_feedback(&item_id);
        true
    })
    .await
}

async fn toggle_like(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Json<EventResponse> {
    apply(&state, |s| {
        s.toggle_like(&item_id);
        true
    })
    .await
}

async fn toggle_dislike(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Json<EventResponse> {
    apply(&state, |s| {
        s.toggle_dislike(&item_id);
        true
    })
    .await
}

async fn dismiss_prompt(State(state): State<AppState>) -> Json<EventResponse> {
    apply(&state, Session::dismiss_prompt).await
}

/// Runs the search-panel retrievers for an item. Failures show up as empty lists.
async fn search_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Json(request): Json<SearchRequest>,
) -> Json<SearchResponse> {
    let query = state.session.lock().await.scene_query(&item_id);
    let results = run_search(
        state.backend.as_ref(),
        &query,
        &request.query,
        state.config.backend.search_k,
    )
    .await;

    let base = &state.config.assets.thumbnail_base_url;
    Json(SearchResponse {
        matches: entries(base, results.matches),
        similar: entries(base, results.similar),
        goes_with: entries(base, results.goes_with),
        scenes: scene_entries(base, results.scenes),
    })
}

/// Substitutes an item, then fetches scene suggestions in the background.
async fn replace_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Json(candidate): Json<CatalogItem>,
) -> Json<ReplaceResponse> {
    let mut session = state.session.lock().await;
    let (outcome, reselect_pending) = match session.replace(&item_id, &candidate) {
        Replacement::Replaced {
            reselect_pending,
            scene_query,
            ..
        } => {
            let backend = Arc::clone(&state.backend);
            let shared = state.session();
            tokio::spawn(async move {
                let scenes = fetch_scenes(backend.as_ref(), &scene_query).await;
                if !shared.lock().await.store_suggestions(&scene_query, scenes) {
                    debug!("Scene suggestions arrived after the design or replacement changed");
                }
            });
            ("replaced", reselect_pending)
        }
        Replacement::NotFound => ("not_found", false),
        Replacement::DuplicateId => ("duplicate_id", false),
    };

    Json(ReplaceResponse {
        outcome: outcome.to_string(),
        reselect_pending,
        view: session.view(),
    })
}

/// Serves model bytes, or a placeholder descriptor with 404.
async fn get_asset(State(state): State<AppState>, Path(item_id): Path<String>) -> Response {
    match state.assets.load(&item_id).await {
        Ok(asset) => ([(header::CONTENT_TYPE, asset.content_type)], asset.bytes).into_response(),
        Err(e) => (
            StatusCode::NOT_FOUND,
            Json(AssetSlot::resolve(&item_id, &Err(e))),
        )
            .into_response(),
    }
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    // Permissive CORS: the server runs locally next to the frontend dev server.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Room and generation
        .route("/api/room", get(get_room).put(put_room))
        .route("/api/generate", post(generate))
        .route("/api/options", get(list_options))
        .route("/api/options/{index}/select", post(select_option))
        // Active design
        .route("/api/view", get(get_view))
        .route("/api/design", put(load_design))
        // Selection and drag
        .route("/api/selection", post(select_item).delete(unselect_item))
        .route("/api/selection/ack", post(acknowledge_unmount))
        .route("/api/drag/begin", post(begin_drag))
        .route("/api/drag/move", post(move_drag))
        .route("/api/drag/end", post(end_drag))
        // Feedback and replacement
        .route("/api/items/{id}/like", post(like_item))
        .route("/api/items/{id}/dislike", post(dislike_item))
        .route("/api/items/{id}/feedback", delete(clear_feedback))
        .route("/api/items/{id}/like/toggle", post(toggle_like))
        .route("/api/items/{id}/dislike/toggle", post(toggle_dislike))
        .route("/api/search-prompt", delete(dismiss_prompt))
        .route("/api/items/{id}/search", post(search_item))
        .route("/api/items/{id}/replace", post(replace_item))
        // Assets
        .route("/api/assets/{id}", get(get_asset))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the web server.
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(config: Config, addr: SocketAddr) -> anyhow::Result<()> {
    let state = AppState::new(config)?;
    let app = create_router(state);

    info!("Starting InteriorRec web server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
