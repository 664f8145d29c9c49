use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use levelup_back::{
    config::AppConfig,
    dao::{models::GamerEntity, store::memory::MemoryStore},
    routes,
    services::directory_service::seed_directories,
    state::AppState,
};

async fn app() -> Router {
    let config = AppConfig::new(
        vec![
            GamerEntity {
                id: 1,
                uid: "alice".into(),
                bio: "Board game collector".into(),
            },
            GamerEntity {
                id: 2,
                uid: "bob".into(),
                bio: "Weekend dungeon master".into(),
            },
        ],
        AppConfig::builtin().game_types().to_vec(),
    );
    let store = MemoryStore::new();
    seed_directories(&store, &config).await.unwrap();
    routes::router(AppState::with_store(Arc::new(store)).await)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    caller: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(uid) = caller {
        request = request.header(header::AUTHORIZATION, uid);
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn game_payload(title: &str, game_type: i64) -> Value {
    json!({
        "title": title,
        "maker": "Z-Man Games",
        "numberOfPlayers": 4,
        "skillLevel": 2,
        "gameType": game_type,
    })
}

async fn create_game(app: &Router, caller: &str, title: &str, game_type: i64) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/games",
        Some(caller),
        Some(game_payload(title, game_type)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

async fn create_event(app: &Router, caller: &str, game: i64) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/events",
        Some(caller),
        Some(json!({
            "description": "Friday night session",
            "date": "2024-05-18",
            "time": "19:30",
            "game": game,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn created_game_is_retrievable_with_expanded_relations() {
    let app = app().await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/games",
        Some("alice"),
        Some(game_payload("Pandemic", 1)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "Pandemic");
    assert_eq!(created["game_type"], 1);

    let uri = format!("/games/{}", created["id"]);
    let (status, game) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["gamer"]["id"], 1);
    assert_eq!(game["gamer"]["bio"], "Board game collector");
    assert_eq!(game["game_type"]["label"], "Board game");
    assert_eq!(game["number_of_players"], 4);
    assert!(game["event_count"].is_null());
}

#[tokio::test]
async fn invalid_game_payload_reports_field_errors() {
    let app = app().await;
    let mut payload = game_payload(&"x".repeat(51), 1);
    payload["maker"] = json!("   ");

    let (status, body) = send(&app, Method::POST, "/games", Some("alice"), Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["title"][0],
        "Ensure this field has no more than 50 characters."
    );
    assert_eq!(body["maker"][0], "This field may not be blank.");
}

#[tokio::test]
async fn unknown_game_type_is_rejected_on_create() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/games",
        Some("alice"),
        Some(game_payload("Pandemic", 42)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["game_type"][0],
        "Invalid pk \"42\" - object does not exist."
    );
}

#[tokio::test]
async fn listing_requires_a_known_caller() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/games", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["message"],
        "Authentication credentials were not provided."
    );

    let (status, body) = send(&app, Method::GET, "/games", Some("mallory"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn game_listing_filters_by_type_and_counts_events() {
    let app = app().await;
    let board = create_game(&app, "alice", "Catan", 1).await;
    create_game(&app, "alice", "Uno", 2).await;
    create_event(&app, "bob", board).await;

    let (status, games) = send(&app, Method::GET, "/games?type=1", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    let games = games.as_array().unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0]["title"], "Catan");
    assert_eq!(games[0]["event_count"], 1);
    assert_eq!(games[0]["user_event_count"], 0);

    let (_, games) = send(&app, Method::GET, "/games", Some("alice"), None).await;
    assert_eq!(games.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn signup_and_leave_track_attendance() {
    let app = app().await;
    let game = create_game(&app, "alice", "Catan", 1).await;
    let event = create_event(&app, "alice", game).await;

    let signup = format!("/events/{event}/signup");
    let (status, body) = send(&app, Method::POST, &signup, Some("bob"), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Gamer added");

    let (_, events) = send(&app, Method::GET, "/events", Some("bob"), None).await;
    assert_eq!(events[0]["joined"], 1);
    assert_eq!(events[0]["attendees_count"], 1);
    assert_eq!(events[0]["organizer"]["id"], 1);
    assert_eq!(events[0]["game"]["gamer"], 1);
    assert_eq!(events[0]["time"], "19:30:00");

    let leave = format!("/events/{event}/leave");
    let (status, _) = send(&app, Method::DELETE, &leave, Some("bob"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::DELETE, &leave, Some("bob"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let detail = format!("/events/{event}");
    let (_, event) = send(&app, Method::GET, &detail, Some("bob"), None).await;
    assert_eq!(event["joined"], 0);
    assert_eq!(event["attendees_count"], 0);
}

#[tokio::test]
async fn deleting_a_game_removes_its_events() {
    let app = app().await;
    let game = create_game(&app, "alice", "Catan", 1).await;
    let event = create_event(&app, "alice", game).await;

    let (status, _) = send(&app, Method::DELETE, &format!("/games/{game}"), None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &format!("/events/{event}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_event_date_is_a_field_error() {
    let app = app().await;
    let game = create_game(&app, "alice", "Catan", 1).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/events",
        Some("alice"),
        Some(json!({
            "description": "Broken",
            "date": "18/05/2024",
            "time": "19:30",
            "game": game,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["date"][0].is_string());
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/games")
        .header(header::AUTHORIZATION, "alice")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn healthcheck_reports_ok_with_a_store() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/healthcheck", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn game_types_are_listed_from_the_directory() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/gametypes", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);

    let (status, _) = send(&app, Method::GET, "/gametypes/99", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn absent_fields_are_reported_as_required() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/games",
        Some("alice"),
        Some(json!({
            "title": "Pandemic",
            "maker": "Z-Man Games",
            "numberOfPlayers": 4,
            "gameType": 1,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"skill_level": ["This field is required."]}));

    let (status, body) = send(
        &app,
        Method::POST,
        "/events",
        Some("alice"),
        Some(json!({
            "description": "Friday night session",
            "date": "2024-05-18",
            "time": "19:30",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"game": ["This field is required."]}));
}

#[tokio::test]
async fn unparsable_type_filter_is_a_message_error() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/games?type=abc", Some("alice"), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}
