use crate::choropleth;
use crate::config::AppConfig;
use crate::data;
use crate::error::DashboardError;
use crate::processing;
use crate::render::{self, DashboardView};
use crate::types::{CountyTable, StateMedian};
use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use geojson::FeatureCollection;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub struct AppState {
    pub config: AppConfig,
    pub client: reqwest::Client,
}

pub type SharedState = Arc<AppState>;

#[derive(Deserialize)]
pub struct StateParams {
    state: Option<String>,
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = match &self {
            DashboardError::UnknownState(_) => StatusCode::NOT_FOUND,
            DashboardError::NoStates => StatusCode::UNPROCESSABLE_ENTITY,
            DashboardError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_GATEWAY,
        };
        error!("Render failed: {}", self);
        (status, self.to_string()).into_response()
    }
}

pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        .route("/", get(dashboard_handler))
        .route("/api/states", get(states_handler))
        .route("/api/counties", get(counties_handler))
        .route("/api/map", get(map_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

pub async fn start_server(config: AppConfig) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = build_router(AppState {
        config,
        client: reqwest::Client::new(),
    });

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn dashboard_handler(
    State(state): State<SharedState>,
    Query(params): Query<StateParams>,
) -> Result<Html<String>, DashboardError> {
    let dataset = data::load_dataset(&state.client, &state.config.input).await?;
    let view = DashboardView::build(dataset, params.state.as_deref(), &state.config)?;
    Ok(Html(render::render_dashboard(&view)?))
}

async fn states_handler(
    State(state): State<SharedState>,
) -> Result<Json<Vec<StateMedian>>, DashboardError> {
    let dataset = data::load_dataset(&state.client, &state.config.input).await?;
    Ok(Json(processing::state_medians(&dataset.records)))
}

async fn counties_handler(
    State(state): State<SharedState>,
    Query(params): Query<StateParams>,
) -> Result<Json<CountyTable>, DashboardError> {
    let dataset = data::load_dataset(&state.client, &state.config.input).await?;
    let selected = match params.state {
        Some(name) => name,
        None => processing::state_names(&dataset.records)
            .into_iter()
            .next()
            .ok_or(DashboardError::NoStates)?,
    };
    processing::county_table(&dataset.records, &selected)
        .map(Json)
        .ok_or(DashboardError::UnknownState(selected))
}

async fn map_handler(
    State(state): State<SharedState>,
) -> Result<Json<FeatureCollection>, DashboardError> {
    let mut dataset = data::load_dataset(&state.client, &state.config.input).await?;
    let medians = processing::state_medians(&dataset.records);
    choropleth::enrich_features(&mut dataset.states, &medians);
    Ok(Json(dataset.states))
}
