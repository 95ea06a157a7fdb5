use crate::aggregator::{fetch_snapshot, AggregatorConfig};
use crate::content::PortfolioContent;
use crate::github::GitHubClient;
use crate::render::render_page;
use crate::view::{self, LanguageFilter, SortKey, ViewState};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

/// Health check status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub checks: HealthChecks,
}

/// Individual health checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthChecks {
    pub github_token: CheckResult,
}

/// Result of an individual check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Liveness probe response (minimal, just indicates the process is running)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub status: String,
}

/// Shared state for all routes
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<GitHubClient>,
    pub aggregator: AggregatorConfig,
    pub content: Arc<PortfolioContent>,
    pub page_size: usize,
    pub start_time: Instant,
}

/// Query parameters shared by `/` and `/api/repos`. Kept as strings so a
/// malformed value falls back to its default instead of rejecting the page.
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub q: Option<String>,
    pub language: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
}

impl ViewQuery {
    /// Apply the query's filters to a fresh state. The page is left at 1;
    /// see [`ViewQuery::requested_page`].
    pub fn base_state(&self) -> ViewState {
        let mut state = ViewState::default();
        if let Some(q) = &self.q {
            state = state.with_search(q.trim());
        }
        if let Some(language) = &self.language {
            state = state.with_language(LanguageFilter::parse(language));
        }
        if let Some(sort) = &self.sort {
            match sort.parse::<SortKey>() {
                Ok(key) => state = state.with_sort(key),
                Err(e) => debug!(error = %e, "Ignoring sort parameter"),
            }
        }
        state
    }

    pub fn requested_page(&self) -> Option<usize> {
        self.page.as_deref().and_then(|p| p.trim().parse().ok())
    }

    /// Resolve the full view state against a repository list.
    pub fn resolve(&self, repos: &[crate::types::GitHubRepo], page_size: usize) -> ViewState {
        let state = self.base_state();
        match self.requested_page() {
            Some(page) => {
                let matches = view::filter_and_sort(repos, &state).len();
                state.go_to_page(page, view::total_pages(matches, page_size))
            }
            None => state,
        }
    }
}

/// Build the router without binding it, so tests can drive it directly.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(portfolio_page))
        .route("/api/snapshot", get(snapshot_json))
        .route("/api/repos", get(repos_json))
        .route("/healthz", get(health_check))
        .route("/livez", get(liveness_check))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Start the portfolio HTTP server
pub async fn start_server(app_state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let app = create_router(app_state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Portfolio server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}

async fn portfolio_page(State(state): State<AppState>, Query(query): Query<ViewQuery>) -> Html<String> {
    let snapshot = fetch_snapshot(&state.client, &state.aggregator).await;
    let view_state = query.resolve(&snapshot.repositories, state.page_size);
    let page = view::derive_page(&snapshot.repositories, &view_state, state.page_size);

    Html(render_page(&snapshot, &state.content, &page))
}

async fn snapshot_json(State(state): State<AppState>) -> Response {
    let snapshot = fetch_snapshot(&state.client, &state.aggregator).await;
    Json(snapshot).into_response()
}

async fn repos_json(State(state): State<AppState>, Query(query): Query<ViewQuery>) -> Response {
    let snapshot = fetch_snapshot(&state.client, &state.aggregator).await;
    let view_state = query.resolve(&snapshot.repositories, state.page_size);
    let page = view::derive_page(&snapshot.repositories, &view_state, state.page_size);

    Json(page).into_response()
}

/// Configuration health. Does not call GitHub, so probes never spend rate
/// limit.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let github_token = if state.client.has_token() {
        CheckResult {
            status: HealthStatus::Healthy,
            message: None,
        }
    } else {
        CheckResult {
            status: HealthStatus::Degraded,
            message: Some("No GitHub token configured, pages will render empty".to_string()),
        }
    };

    let response = HealthResponse {
        status: github_token.status.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        checks: HealthChecks { github_token },
    };

    (StatusCode::OK, Json(response))
}

async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(LivenessResponse {
            status: "alive".to_string(),
        }),
    )
}
