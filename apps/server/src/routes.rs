use crate::error::HttpApiError;
use crate::state::AppState;
use axum::extract::{Path, Request, State};
use axum::http::header::{HeaderName, HeaderValue};
use axum::http::{Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use content::{Fact, TriviaQuestion};
use serde::{Deserialize, Serialize};
use sim_core::{DecisionCategory, EntityArchetype, PlayerId, Scenario};
use sim_runtime::{AnalyticsView, CreatedPlayer, DecisionOutcome, GameStateView, LeaderboardEntry};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/", get(service_banner))
        .route("/api/players", post(create_player))
        .route("/api/state/{player_id}", get(get_state))
        .route("/api/decision", post(submit_decision))
        .route("/api/players/{player_id}/advance-phase", post(advance_phase))
        .route("/api/leaderboard", get(leaderboard))
        .route("/api/analytics/{player_id}", get(analytics))
        .route("/api/archetypes", get(archetypes))
        .route("/api/scenarios/{category}", get(scenarios_in_category))
        .route("/api/content/facts", get(facts))
        .route("/api/content/trivia", get(trivia))
        .layer(middleware::from_fn(cors_middleware))
        .with_state(state)
}

async fn cors_middleware(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = Response::new(axum::body::Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        apply_cors_headers(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors_headers(response.headers_mut());
    response
}

fn apply_cors_headers(headers: &mut axum::http::HeaderMap) {
    headers.insert(
        HeaderName::from_static("access-control-allow-origin"),
        HeaderValue::from_static("*"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-methods"),
        HeaderValue::from_static("GET,POST,OPTIONS"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-headers"),
        HeaderValue::from_static("*"),
    );
}

#[derive(Debug, Serialize)]
struct Banner {
    service: &'static str,
    version: &'static str,
    ruleset: &'static str,
    title: String,
    description: String,
    players: usize,
}

async fn service_banner(State(state): State<AppState>) -> Json<Banner> {
    Json(Banner {
        service: "magnate",
        version: env!("CARGO_PKG_VERSION"),
        ruleset: state.ruleset.key(),
        title: state.pack.title.clone(),
        description: state.pack.description.clone(),
        players: state.service.player_count(),
    })
}

#[derive(Debug, Deserialize)]
struct CreatePlayerRequest {
    player_name: String,
    entity_name: String,
    #[serde(default)]
    archetype: Option<String>,
}

async fn create_player(
    State(state): State<AppState>,
    Json(req): Json<CreatePlayerRequest>,
) -> Result<(StatusCode, Json<CreatedPlayer>), HttpApiError> {
    let created = state.service.create_entity(
        &req.player_name,
        &req.entity_name,
        req.archetype.as_deref(),
    )?;
    state.persist(created.player_id).await;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_state(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
) -> Result<Json<GameStateView>, HttpApiError> {
    Ok(Json(state.service.get_state(player_id)?))
}

#[derive(Debug, Deserialize)]
struct DecisionRequest {
    player_id: PlayerId,
    choice_index: usize,
}

async fn submit_decision(
    State(state): State<AppState>,
    Json(req): Json<DecisionRequest>,
) -> Result<Json<DecisionOutcome>, HttpApiError> {
    let outcome = state.service.submit_decision(req.player_id, req.choice_index)?;
    state.persist_decision(req.player_id).await;
    Ok(Json(outcome))
}

async fn advance_phase(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
) -> Result<Json<GameStateView>, HttpApiError> {
    let view = state.service.advance_phase(player_id)?;
    state.persist(player_id).await;
    Ok(Json(view))
}

async fn leaderboard(State(state): State<AppState>) -> Json<Vec<LeaderboardEntry>> {
    Json(state.service.leaderboard())
}

async fn analytics(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
) -> Result<Json<AnalyticsView>, HttpApiError> {
    Ok(Json(state.service.analytics(player_id)?))
}

async fn archetypes(State(state): State<AppState>) -> Json<Vec<EntityArchetype>> {
    Json(state.service.catalog().archetypes.clone())
}

async fn scenarios_in_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Scenario>>, HttpApiError> {
    let category = DecisionCategory::parse(&category).ok_or_else(|| {
        HttpApiError::bad_request("unknown_category", format!("unknown category {category:?}"))
    })?;
    let scenarios = state
        .service
        .catalog()
        .scenarios_in(category)
        .cloned()
        .collect();
    Ok(Json(scenarios))
}

async fn facts(State(state): State<AppState>) -> Json<Vec<Fact>> {
    Json(state.pack.facts.clone())
}

async fn trivia(State(state): State<AppState>) -> Json<Vec<TriviaQuestion>> {
    Json(state.pack.trivia.clone())
}
