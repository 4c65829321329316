//! HTTP server for the waste charts.
//!
//! Serves charts and tables from a [`WasteReport`] built once at start-up.
//! The report is shared read-only across requests; nothing mutates it.
//!
//! # API Endpoints
//!
//! | Method | Path                                    | Description                         |
//! |--------|-----------------------------------------|-------------------------------------|
//! | GET    | `/`                                     | Index page                          |
//! | GET    | `/health`                               | Health check                        |
//! | GET    | `/{chart}`                              | Chart embedded in an HTML page      |
//! | GET    | `/api/charts/{chart}`                   | Raw SVG chart                       |
//! | GET    | `/api/totals`                           | Yearly province totals              |
//! | GET    | `/api/averages`                         | Classified province averages        |
//! | GET    | `/api/categories`                       | Provinces per category              |
//!
//! `total_annual_waste_specific` accepts `?provinces=A,B` to override the
//! configured selection.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, Method, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::Value;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use super::page;
use super::types::{error_response, AveragesResponse, CategoriesResponse, HealthResponse};
use crate::chart::{self, ChartKind};
use crate::config::{parse_province_list, Config};
use crate::error::{ChartError, ServerResult};
use crate::models::YearProvinceTotal;
use crate::transform::WasteReport;

type ApiError = (StatusCode, Json<Value>);

/// Shared, read-only request state.
#[derive(Clone)]
pub struct AppState {
    report: Arc<WasteReport>,
    highlight: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(report: WasteReport, highlight: Vec<String>) -> Self {
        Self {
            report: Arc::new(report),
            highlight: Arc::new(highlight),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartQuery {
    /// Comma-separated province list
    provinces: Option<String>,
}

/// Build the router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/totals", get(totals))
        .route("/api/averages", get(averages))
        .route("/api/categories", get(categories))
        .route("/api/charts/{chart}", get(chart_svg))
        .route("/{chart}", get(chart_html))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Build the report from `config.data_path`, then serve it on `0.0.0.0:<port>`.
pub async fn start_server(config: &Config) -> ServerResult<()> {
    let report = WasteReport::load(&config.data_path)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    info!("wastemap server running on http://localhost:{}", config.port);
    for kind in ChartKind::ALL {
        info!("   GET /{}", kind.slug());
    }
    info!("   GET /api/totals | /api/averages | /api/categories");

    serve(listener, AppState::new(report, config.highlight.clone())).await
}

/// Serve on an already bound listener until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> ServerResult<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(%e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(page::index(&state.report))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::from(state.report.as_ref()))
}

async fn totals(State(state): State<AppState>) -> Json<Vec<YearProvinceTotal>> {
    Json(state.report.tables().totals.clone())
}

async fn averages(State(state): State<AppState>) -> Json<AveragesResponse> {
    Json(AveragesResponse::from(state.report.as_ref()))
}

async fn categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse::from(state.report.as_ref()))
}

async fn chart_html(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<ChartQuery>,
) -> Result<Html<String>, ApiError> {
    let (kind, svg) = render_chart(&state, &slug, &query)?;
    Ok(Html(page::chart_page(kind, &svg)))
}

async fn chart_svg(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<ChartQuery>,
) -> Result<Response, ApiError> {
    let (_, svg) = render_chart(&state, &slug, &query)?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}

fn render_chart(
    state: &AppState,
    slug: &str,
    query: &ChartQuery,
) -> Result<(ChartKind, String), ApiError> {
    let kind: ChartKind = slug.parse().map_err(|e: ChartError| {
        (StatusCode::NOT_FOUND, Json(error_response(&e.to_string())))
    })?;

    let highlight = match query.provinces.as_deref() {
        Some(raw) => parse_province_list(raw),
        None => state.highlight.as_ref().clone(),
    };

    let svg = chart::render(kind, &state.report, &highlight).map_err(|e| {
        error!(chart = %kind, %e, "chart rendering failed");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(error_response(&e.to_string())))
    })?;
    Ok((kind, svg))
}
