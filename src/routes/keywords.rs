use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{directory_categories, filter_directory};
use crate::models::{
    CatalogResponse, DirectoryQuery, DirectoryResponse, ReplaceKeywordsRequest, SelectionResponse,
};
use crate::routes::matches::{error_response, store_error_response, AppState};
use crate::services::load_directory;

/// Configure catalog, selection and directory routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/keywords", web::get().to(get_catalog))
        .route("/parties/{party_id}/keywords", web::get().to(get_selection))
        .route("/parties/{party_id}/keywords", web::put().to(replace_selection))
        .route("/directory", web::get().to(get_directory));
}

/// GET /api/v1/keywords
async fn get_catalog(state: web::Data<AppState>) -> impl Responder {
    match state.store.catalog().await {
        Ok(catalog) => HttpResponse::Ok().json(CatalogResponse {
            total: catalog.len(),
            groups: catalog.grouped(),
        }),
        Err(e) => {
            tracing::error!("Failed to load keyword catalog: {}", e);
            store_error_response(e)
        }
    }
}

/// GET /api/v1/parties/{partyId}/keywords
async fn get_selection(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let party_id = path.into_inner();

    match state.store.selections(&party_id).await {
        Ok(selection) => {
            let sparse = selection.is_sparse(state.matcher.rules().min_recommended_keywords);
            HttpResponse::Ok().json(SelectionResponse {
                party_id,
                keyword_selections: selection,
                sparse,
            })
        }
        Err(e) => store_error_response(e),
    }
}

/// Replace a party's whole keyword selection
///
/// PUT /api/v1/parties/{partyId}/keywords
///
/// Request body:
/// ```json
/// { "keywordSelections": [{ "keywordId": 1, "priority": 1 }, { "keywordId": 4 }] }
/// ```
///
/// Selections without a priority get the store's default tier.
async fn replace_selection(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<ReplaceKeywordsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(
            actix_web::http::StatusCode::BAD_REQUEST,
            "Validation failed",
            errors.to_string(),
        );
    }

    let party_id = path.into_inner();
    let records = req.into_inner().keyword_selections;

    match state.store.replace_selections(&party_id, &records).await {
        Ok(selection) => {
            let sparse = selection.is_sparse(state.matcher.rules().min_recommended_keywords);
            tracing::info!(
                "Saved {} keywords for {}{}",
                selection.len(),
                party_id,
                if sparse { " (below recommended minimum)" } else { "" }
            );
            HttpResponse::Ok().json(SelectionResponse {
                party_id,
                keyword_selections: selection,
                sparse,
            })
        }
        Err(e) => {
            tracing::warn!("Failed to replace keywords for {}: {}", party_id, e);
            store_error_response(e)
        }
    }
}

/// GET /api/v1/directory?kind=employer&search=steel&category=Skills
async fn get_directory(
    state: web::Data<AppState>,
    query: web::Query<DirectoryQuery>,
) -> impl Responder {
    let entries = match load_directory(state.store.as_ref(), query.kind).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!("Failed to load {} directory: {}", query.kind, e);
            return store_error_response(e);
        }
    };

    let categories = directory_categories(&entries);
    let entries = filter_directory(entries, query.search.as_deref(), query.category.as_deref());

    HttpResponse::Ok().json(DirectoryResponse {
        total: entries.len(),
        entries,
        categories,
    })
}
