use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use moodwell_api::config::Config;
use moodwell_api::services::emotion::EmotionAnalyzer;
use moodwell_api::store::{seed_default_habits, LocalStore, WellnessStore};
use moodwell_api::{build_router, AppState};

fn test_config() -> Config {
    Config::from_lookup(|_| None).unwrap()
}

fn app_with_store(store: Arc<dyn WellnessStore>) -> Router {
    build_router(AppState {
        store,
        // no API key: every classification takes the keyword path
        analyzer: Arc::new(EmotionAnalyzer::new(None)),
        config: Arc::new(test_config()),
    })
}

fn app() -> Router {
    app_with_store(Arc::new(LocalStore::in_memory()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn health_reports_service_and_store() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "moodwell-api");

    let (status, body) = send(&app, "GET", "/readyz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["store"], "local");
    assert_eq!(body["checks"]["emotion_ai"], "keywords_only");
}

#[tokio::test]
async fn classify_falls_back_to_keywords_without_credentials() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/emotion/classify",
        Some(json!({ "text": "I am so happy and excited today!" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["emotion"], "happy");
    assert_eq!(body["method"], "keywords");
    assert_eq!(body["confidence"], 0.5);
    assert!(body["analysis"]
        .as_str()
        .unwrap()
        .ends_with("(AI analysis temporarily unavailable)"));
}

#[tokio::test]
async fn preview_of_empty_text_is_neutral() {
    let app = app();
    let (status, body) = send(&app, "POST", "/api/emotion/preview", Some(json!({ "text": "" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["emotion"], "neutral");
    assert_eq!(body["confidence"], 0.5);
}

#[tokio::test]
async fn journal_entry_is_classified_stored_and_listed() {
    let app = app();

    let (status, first) = send(
        &app,
        "POST",
        "/api/journal",
        Some(json!({ "content": "Work was stressful and I felt nervous all day" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["emotion"], "anxious");
    assert!(first["analysis"].as_str().unwrap().contains("keyword analysis"));

    let (_, second) = send(
        &app,
        "POST",
        "/api/journal",
        Some(json!({ "content": "A peaceful walk by the lake" })),
    )
    .await;
    assert_eq!(second["emotion"], "calm");

    let (status, list) = send(&app, "GET", "/api/journal", None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], second["id"], "newest first");

    let (_, filtered) = send(&app, "GET", "/api/journal?emotion=anxious", None).await;
    assert_eq!(filtered.as_array().unwrap().len(), 1);

    let (_, searched) = send(&app, "GET", "/api/journal?search=LAKE", None).await;
    assert_eq!(searched.as_array().unwrap()[0]["id"], second["id"]);

    let uri = format!("/api/journal/{}", first["id"].as_str().unwrap());
    let (status, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["content"], first["content"]);
}

#[tokio::test]
async fn blank_journal_content_is_rejected() {
    let app = app();
    let (status, body) = send(&app, "POST", "/api/journal", Some(json!({ "content": "   " }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], 422);
}

#[tokio::test]
async fn unknown_or_malformed_journal_id_is_not_found() {
    let app = app();
    let (status, _) = send(&app, "GET", "/api/journal/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/api/journal/{}", uuid::Uuid::new_v4());
    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn journal_export_is_an_attachment() {
    let app = app();
    send(&app, "POST", "/api/journal", Some(json!({ "content": "hello" }))).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/journal/export")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"journal-entries-"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let entries: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn journal_stats_summarize_entries() {
    let app = app();
    for content in ["so sad today", "lonely and sad", "great day"] {
        send(&app, "POST", "/api/journal", Some(json!({ "content": content }))).await;
    }

    let (status, stats) = send(&app, "GET", "/api/journal/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_entries"], 3);
    assert_eq!(stats["most_common_emotion"], "sad");
    assert_eq!(stats["entries_this_week"], 3);
}

#[tokio::test]
async fn mood_upsert_keeps_one_entry_per_day() {
    let app = app();
    let (status, _) = send(
        &app,
        "POST",
        "/api/moods",
        Some(json!({ "date": "2024-01-01", "emotion": "sad", "intensity": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, updated) = send(
        &app,
        "POST",
        "/api/moods",
        Some(json!({ "date": "2024-01-01", "emotion": "happy", "intensity": 8, "notes": "better" })),
    )
    .await;
    assert_eq!(updated["intensity"], 8);

    let (_, list) = send(&app, "GET", "/api/moods", None).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["intensity"], 8);
    assert_eq!(list[0]["emotion"], "happy");

    let (_, stats) = send(&app, "GET", "/api/moods/stats", None).await;
    assert_eq!(stats["total_entries"], 1);
    assert_eq!(stats["average_intensity"], 8.0);
}

#[tokio::test]
async fn mood_intensity_is_validated() {
    let app = app();
    let (status, _) = send(
        &app,
        "POST",
        "/api/moods",
        Some(json!({ "emotion": "calm", "intensity": 11 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn mood_list_honors_date_range() {
    let app = app();
    for date in ["2024-01-01", "2024-01-15", "2024-02-01"] {
        send(
            &app,
            "POST",
            "/api/moods",
            Some(json!({ "date": date, "emotion": "calm", "intensity": 5 })),
        )
        .await;
    }

    let (_, list) = send(
        &app,
        "GET",
        "/api/moods?start_date=2024-01-10&end_date=2024-01-31",
        None,
    )
    .await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["date"], "2024-01-15");
}

#[tokio::test]
async fn habit_lifecycle() {
    let app = app();

    let (status, habit) = send(
        &app,
        "POST",
        "/api/habits",
        Some(json!({ "name": "Gratitude list", "category": "mindfulness" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = habit["id"].as_str().unwrap().to_string();

    let toggle = format!("/api/habits/{id}/toggle");
    let (_, toggled) = send(&app, "POST", &toggle, Some(json!({ "date": "2024-03-01" }))).await;
    assert_eq!(toggled["completed_dates"], json!(["2024-03-01"]));

    let (_, toggled) = send(&app, "POST", &toggle, Some(json!({ "date": "2024-03-01" }))).await;
    assert_eq!(toggled["completed_dates"], json!([]));

    let (_, toggled) = send(&app, "POST", &toggle, None).await;
    assert_eq!(toggled["completed_dates"].as_array().unwrap().len(), 1);

    let (_, list) = send(&app, "GET", "/api/habits", None).await;
    assert_eq!(list[0]["completed_today"], true);

    let uri = format!("/api/habits/{id}");
    let (status, updated) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({ "description": "Three things, every evening" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Gratitude list");
    assert_eq!(updated["description"], "Three things, every evening");

    let (status, deleted) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["deleted"], true);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "POST", &toggle, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn habit_name_is_required() {
    let app = app();
    let (status, _) = send(&app, "POST", "/api/habits", Some(json!({ "name": "" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn default_habits_are_seeded_once() {
    let store: Arc<dyn WellnessStore> = Arc::new(LocalStore::in_memory());
    assert_eq!(seed_default_habits(store.as_ref()).await.unwrap(), 3);
    assert_eq!(seed_default_habits(store.as_ref()).await.unwrap(), 0);

    let app = app_with_store(store);
    let (_, list) = send(&app, "GET", "/api/habits", None).await;
    let names: Vec<_> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Drink Water", "5-Minute Meditation", "Stretching"]);
    assert_eq!(list[0]["category"], "self-care");
}
