// HTTP API tests for Keymatch

use actix_web::{http::StatusCode, test, web, App};
use keymatch::config::MatchingSettings;
use keymatch::core::Matcher;
use keymatch::models::{
    Category, Keyword, KeywordId, PartyKind, PartyRecord, Priority, ProfileFields, SelectionRecord,
};
use keymatch::routes::{self, matches::AppState};
use keymatch::services::{InMemoryStore, SeedData};
use serde_json::{json, Value};
use std::sync::Arc;

fn keywords() -> Vec<Keyword> {
    [
        (1, "Welding", "Skills"),
        (2, "Forklift license", "Skills"),
        (3, "Dormitory", "Benefits"),
        (4, "Night shift", "Schedule"),
    ]
    .into_iter()
    .map(|(id, text, category)| Keyword {
        id: KeywordId(id),
        text: text.to_string(),
        category: Category::from(category),
    })
    .collect()
}

fn party(id: &str, kind: PartyKind, name: &str, selections: &[(i64, Option<Priority>)]) -> PartyRecord {
    PartyRecord {
        party_id: id.to_string(),
        kind,
        keyword_selections: selections
            .iter()
            .map(|(k, p)| SelectionRecord::new(*k, *p))
            .collect(),
        profile: ProfileFields {
            name: Some(name.to_string()),
            ..Default::default()
        },
    }
}

fn app_state() -> AppState {
    let store = InMemoryStore::from_seed(SeedData {
        keywords: keywords(),
        parties: vec![
            party(
                "acme",
                PartyKind::Employer,
                "Acme Steel",
                &[(1, Some(Priority::Required)), (3, Some(Priority::Preferred))],
            ),
            party("busan", PartyKind::Employer, "Busan Logistics", &[(2, Some(Priority::Required))]),
            party("minh", PartyKind::JobSeeker, "Minh Tran", &[(1, None), (3, None)]),
            party("ana", PartyKind::JobSeeker, "Ana Cruz", &[(1, None)]),
            party("joko", PartyKind::JobSeeker, "Joko Santoso", &[(4, None)]),
        ],
    }, Priority::Preferred)
    .unwrap();

    AppState {
        store: Arc::new(store),
        matcher: Matcher::with_default_rules(),
        matching: MatchingSettings::default(),
    }
}

macro_rules! init_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(app_state()))
                .configure(routes::configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health_check() {
    let app = init_app!();

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_store_backed_matches_for_employer() {
    let app = init_app!();

    let req = test::TestRequest::get().uri("/api/v1/matches/acme").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let matches = body["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0]["counterpartyId"], "minh");
    assert_eq!(matches[0]["matchRate"], 100);
    assert_eq!(matches[0]["eligibility"], "fast_track");
    assert_eq!(matches[0]["profile"]["name"], "Minh Tran");
    assert_eq!(matches[1]["counterpartyId"], "ana");
    assert_eq!(matches[1]["matchRate"], 50);
    assert_eq!(body["totalCandidates"], 3);
    assert_eq!(body["summary"]["fastTrackCount"], 1);
}

#[actix_web::test]
async fn test_matches_respect_view_and_limit() {
    let app = init_app!();

    let req = test::TestRequest::get()
        .uri("/api/v1/matches/minh?view=qualified&limit=1")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let matches = body["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["counterpartyId"], "acme");
    assert_eq!(matches[0]["meetsAllRequired"], true);
}

#[actix_web::test]
async fn test_matches_reject_out_of_range_limit() {
    let app = init_app!();

    for uri in ["/api/v1/matches/acme?limit=0", "/api/v1/matches/acme?limit=501"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[actix_web::test]
async fn test_matches_for_unknown_party_is_not_found() {
    let app = init_app!();

    let req = test::TestRequest::get().uri("/api/v1/matches/nobody").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_rank_inline_records() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/rank")
        .set_json(json!({
            "viewer": {
                "partyId": "e1",
                "kind": "employer",
                "keywordSelections": [
                    { "keywordId": 1, "priority": 1 },
                    { "keywordId": 2, "priority": 1 },
                    { "keywordId": 3, "priority": 2 },
                    { "keywordId": 4, "priority": "preferred" }
                ]
            },
            "counterparties": [
                { "partyId": "s1", "kind": "jobSeeker", "keywordSelections": [{ "keywordId": 1 }, { "keywordId": 3 }] },
                { "partyId": "s2", "kind": "jobSeeker", "keywordSelections": [{ "keywordId": 1 }, { "keywordId": 2 }, { "keywordId": 3 }] }
            ],
            "keywords": [
                { "id": 1, "text": "Welding", "category": "Skills" },
                { "id": 2, "text": "Forklift license", "category": "Skills" },
                { "id": 3, "text": "Dormitory", "category": "Benefits" },
                { "id": 4, "keyword": "Night shift", "category": "Schedule" }
            ]
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let matches = body["matches"].as_array().unwrap();
    assert_eq!(matches[0]["counterpartyId"], "s2");
    assert_eq!(matches[0]["matchRate"], 75);
    assert_eq!(matches[1]["counterpartyId"], "s1");
    assert_eq!(matches[1]["matchRate"], 15);
    assert_eq!(matches[1]["missingRequired"][0]["text"], "Forklift license");
}

#[actix_web::test]
async fn test_rank_rejects_conflicting_viewer_tiers() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/rank")
        .set_json(json!({
            "viewer": {
                "partyId": "e1",
                "kind": "employer",
                "keywordSelections": [
                    { "keywordId": 1, "priority": 1 },
                    { "keywordId": 1, "priority": 2 }
                ]
            },
            "counterparties": [],
            "keywords": [{ "id": 1, "text": "Welding", "category": "Skills" }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_rank_requires_keywords() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/rank")
        .set_json(json!({
            "viewer": { "partyId": "e1", "kind": "employer" },
            "keywords": []
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_replace_keywords_then_rematch() {
    let app = init_app!();

    let req = test::TestRequest::put()
        .uri("/api/v1/parties/joko/keywords")
        .set_json(json!({ "keywordSelections": [{ "keywordId": 1 }, { "keywordId": 3 }] }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["partyId"], "joko");
    assert_eq!(body["keywordSelections"].as_array().unwrap().len(), 2);
    assert_eq!(body["keywordSelections"][0]["priority"], 2);
    assert_eq!(body["sparse"], true);

    let req = test::TestRequest::get().uri("/api/v1/matches/acme").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<&str> = body["matches"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|m| m["counterpartyId"].as_str())
        .collect();
    // Ties keep store order
    assert_eq!(ids, vec!["joko", "minh", "ana"]);
}

#[actix_web::test]
async fn test_replace_keywords_rejects_unknown_keyword() {
    let app = init_app!();

    let req = test::TestRequest::put()
        .uri("/api/v1/parties/ana/keywords")
        .set_json(json!({ "keywordSelections": [{ "keywordId": 999 }] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Previous selection is untouched
    let req = test::TestRequest::get().uri("/api/v1/parties/ana/keywords").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["keywordSelections"][0]["keywordId"], 1);
}

#[actix_web::test]
async fn test_catalog_is_grouped() {
    let app = init_app!();

    let req = test::TestRequest::get().uri("/api/v1/keywords").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total"], 4);
    let categories: Vec<&str> = body["groups"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|g| g["category"].as_str())
        .collect();
    assert_eq!(categories, vec!["Benefits", "Schedule", "Skills"]);
}

#[actix_web::test]
async fn test_directory_search_and_category() {
    let app = init_app!();

    let req = test::TestRequest::get()
        .uri("/api/v1/directory?kind=employer&search=busan")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["entries"][0]["partyId"], "busan");

    let req = test::TestRequest::get()
        .uri("/api/v1/directory?kind=jobSeeker&category=Benefits")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["entries"][0]["partyId"], "minh");
}
