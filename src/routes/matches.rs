use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::config::MatchingSettings;
use crate::core::{KeywordCatalog, MatchRun, Matcher};
use crate::models::{ErrorResponse, HealthResponse, MatchesQuery, RankRequest, RankResponse};
use crate::services::{load_match_snapshot, SelectionStore, StoreError};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SelectionStore>,
    pub matcher: Matcher,
    pub matching: MatchingSettings,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/rank", web::post().to(rank_matches))
        .route("/matches/{party_id}", web::get().to(find_matches));
}

pub(crate) fn error_response(status: actix_web::http::StatusCode, error: &str, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

pub(crate) fn store_error_response(e: StoreError) -> HttpResponse {
    use actix_web::http::StatusCode;
    match e {
        StoreError::PartyNotFound(_) => error_response(StatusCode::NOT_FOUND, "Party not found", e.to_string()),
        StoreError::InvalidSelection(_) => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, "Invalid keyword selection", e.to_string())
        }
        _ => error_response(StatusCode::INTERNAL_SERVER_ERROR, "Store error", e.to_string()),
    }
}

fn rank_response(viewer_id: String, run: MatchRun) -> RankResponse {
    RankResponse {
        viewer_id,
        matches: run.matches,
        summary: run.summary,
        total_candidates: run.total_candidates,
        excluded_count: run.excluded,
    }
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Rank counterparties supplied in the request body
///
/// POST /api/v1/matches/rank
///
/// Request body:
/// ```json
/// {
///   "viewer": { "partyId": "e1", "kind": "employer", "keywordSelections": [{ "keywordId": 1, "priority": 1 }] },
///   "counterparties": [{ "partyId": "s1", "kind": "jobSeeker", "keywordSelections": [{ "keywordId": 1 }] }],
///   "keywords": [{ "id": 1, "text": "Welding", "category": "Skills" }],
///   "view": "active",
///   "limit": 20
/// }
/// ```
async fn rank_matches(
    state: web::Data<AppState>,
    req: web::Json<RankRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for rank request: field_errors={:?}", errors);
        return error_response(
            actix_web::http::StatusCode::BAD_REQUEST,
            "Validation failed",
            errors.to_string(),
        );
    }

    let RankRequest {
        viewer,
        counterparties,
        keywords,
        view,
        limit,
    } = req.into_inner();
    let viewer_id = viewer.party_id.clone();
    let catalog = KeywordCatalog::from_keywords(keywords);
    let limit = state.matching.effective_limit(limit);

    tracing::info!(
        "Ranking {} counterparties for {} (view: {:?})",
        counterparties.len(),
        viewer_id,
        view
    );

    match state
        .matcher
        .find_matches_from_records(viewer, counterparties, &catalog, view, limit)
    {
        Ok(run) => HttpResponse::Ok().json(rank_response(viewer_id, run)),
        Err(e) => {
            tracing::warn!("Rejected rank request for {}: {}", viewer_id, e);
            error_response(
                actix_web::http::StatusCode::UNPROCESSABLE_ENTITY,
                "Invalid keyword selection",
                e.to_string(),
            )
        }
    }
}

/// Rank stored counterparties for a registered party
///
/// GET /api/v1/matches/{partyId}?view=active&limit=20
async fn find_matches(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<MatchesQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return error_response(
            actix_web::http::StatusCode::BAD_REQUEST,
            "Validation failed",
            errors.to_string(),
        );
    }

    let party_id = path.into_inner();
    let limit = state.matching.effective_limit(query.limit);

    let snapshot = match load_match_snapshot(state.store.as_ref(), &party_id).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!("Failed to load match data for {}: {}", party_id, e);
            return store_error_response(e);
        }
    };

    let run = state.matcher.find_matches(
        &snapshot.viewer,
        snapshot.counterparties,
        &snapshot.catalog,
        query.view,
        limit,
    );

    let mut response = rank_response(party_id, run);
    response.total_candidates += snapshot.failed;
    response.excluded_count += snapshot.failed;

    tracing::info!(
        "Returning {} matches for {} (from {} candidates)",
        response.matches.len(),
        response.viewer_id,
        response.total_candidates
    );

    HttpResponse::Ok().json(response)
}
