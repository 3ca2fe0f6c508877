//! Query server for jurisdiction lookups.
//!
//! Provides HTTP API for address lookups, coordinate lookups and
//! address suggestions.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use quickahj::geocode::NominatimClient;
use quickahj::models::GeocodedAddress;
use quickahj::{ResolutionPipeline, Settings, SupportedState};

mod lookup;
use lookup::{execute_lookup, execute_point, status_for, LookupResponse, PointParams};

#[derive(Parser, Debug)]
#[command(name = "query")]
#[command(about = "Jurisdiction lookup server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: String,

    /// Settings file (TOML)
    #[arg(short, long, default_value = "quickahj.toml")]
    settings: PathBuf,

    /// Override the Nominatim endpoint from the settings file
    #[arg(long)]
    nominatim_url: Option<String>,
}

/// Application state shared across handlers
struct AppState {
    geocoder: NominatimClient,
    pipeline: ResolutionPipeline,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("QuickAHJ Query Server");

    let mut settings = Settings::load_or_default(&args.settings)?;
    if let Some(url) = args.nominatim_url {
        settings.nominatim_url = url;
        settings.validate()?;
    }

    info!("Geocoding via {}", settings.nominatim_url);
    let geocoder =
        NominatimClient::from_settings(&settings).context("Failed to build geocoder client")?;

    let pipeline = ResolutionPipeline::from_settings(&settings);
    info!(
        "Data sources: {:?}, nationwide fallback: {}",
        settings.active_data_sources(),
        settings.nationwide_fallback
    );

    let state = Arc::new(AppState { geocoder, pipeline });

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/ahj", get(ahj_handler))
        .route("/v1/ahj/point", get(point_handler))
        .route("/v1/suggest", get(suggest_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        supported_states: SupportedState::all().iter().map(|s| s.name()).collect(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    supported_states: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
struct TextQueryParams {
    text: String,
}

/// Geocode an address and resolve its jurisdiction
async fn ahj_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TextQueryParams>,
) -> Result<Response, (StatusCode, String)> {
    let response = execute_lookup(&state.geocoder, &state.pipeline, &params.text)
        .await
        .map_err(|e| {
            error!("Lookup failed for '{}': {}", params.text, e);
            (status_for(&e), e.to_string())
        })?;

    Ok(coverage_response(response))
}

/// Resolve a point the caller has already geocoded
async fn point_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PointParams>,
) -> Response {
    coverage_response(execute_point(&state.pipeline, params.into_address()))
}

fn coverage_response(response: LookupResponse) -> Response {
    let status = if response.coverage {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    (status, Json(response)).into_response()
}

#[derive(Serialize)]
struct SuggestResponse {
    suggestions: Vec<GeocodedAddress>,
}

/// Address suggestions while typing
async fn suggest_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TextQueryParams>,
) -> Result<Json<SuggestResponse>, (StatusCode, String)> {
    let suggestions = state.geocoder.suggest(&params.text).await.map_err(|e| {
        error!("Suggestion lookup failed: {}", e);
        (status_for(&e), e.to_string())
    })?;

    Ok(Json(SuggestResponse { suggestions }))
}
