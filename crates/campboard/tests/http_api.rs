//! End-to-end tests for the camp API, driving the router in-process.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use campboard::http::HttpServer;
use campboard::{NewActivity, NewCamper, NewSignup, Storage};

/// Campers 1 (Ava, 12) and 2 (Ben, 9); activities 1 (Archery) and 2 (Canoeing).
fn seeded_storage() -> Storage {
    let storage = Storage::open_in_memory().expect("in-memory storage");
    storage.create_camper(&NewCamper::new("Ava", 12)).unwrap();
    storage.create_camper(&NewCamper::new("Ben", 9)).unwrap();
    storage
        .create_activity(&NewActivity::new("Archery", 2))
        .unwrap();
    storage
        .create_activity(&NewActivity::new("Canoeing", 3))
        .unwrap();
    storage
}

fn app(storage: Storage) -> Router {
    HttpServer::build_router(storage)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    send_raw(app, method, uri, body.map(|body| body.to_string())).await
}

/// Send `body` verbatim as a JSON request, whether or not it parses.
async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<String>,
) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_index_is_empty() {
    let app = app(Storage::open_in_memory().unwrap());
    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_create_camper() {
    let app = app(Storage::open_in_memory().unwrap());
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/campers",
        Some(json!({"name": "Ava", "age": 12})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"id": 1, "name": "Ava", "age": 12}));
}

#[tokio::test]
async fn test_create_camper_bad_age() {
    let app = app(Storage::open_in_memory().unwrap());
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/campers",
        Some(json!({"name": "Ava", "age": 5})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"errors": ["Camper age must be between 8 and 18"]}));

    let (_, list) = send_json(&app, Method::GET, "/campers", None).await;
    assert_eq!(list, json!({"campers": []}));
}

#[tokio::test]
async fn test_create_camper_missing_name() {
    let app = app(Storage::open_in_memory().unwrap());
    let (status, body) =
        send_json(&app, Method::POST, "/campers", Some(json!({"age": 10}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"errors": ["Camper must have a name"]}));
}

#[tokio::test]
async fn test_create_camper_malformed_body() {
    let app = app(Storage::open_in_memory().unwrap());
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/campers",
        Some(json!({"name": "Ava", "age": "twelve"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_list_campers() {
    let app = app(seeded_storage());
    let (status, body) = send_json(&app, Method::GET, "/campers", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"campers": [
            {"id": 1, "name": "Ava", "age": 12},
            {"id": 2, "name": "Ben", "age": 9}
        ]})
    );
}

#[tokio::test]
async fn test_get_camper_detail() {
    let storage = seeded_storage();
    storage.create_signup(&NewSignup::new(1, 2, 9)).unwrap();
    let app = app(storage);

    let (status, body) = send_json(&app, Method::GET, "/campers/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"camper": {
            "id": 1,
            "name": "Ava",
            "age": 12,
            "signups": [{"id": 1, "time": 9, "activity_id": 2}]
        }})
    );
    assert!(body["camper"]["signups"][0].get("activity").is_none());
}

#[tokio::test]
async fn test_get_camper_missing() {
    let app = app(seeded_storage());

    for uri in ["/campers/99", "/campers/not-a-number"] {
        let (status, body) = send_json(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body, json!({"error": "Camper not found"}));
    }
}

#[tokio::test]
async fn test_update_missing_camper_with_malformed_body() {
    let app = app(seeded_storage());
    let (status, bytes) =
        send_raw(&app, Method::PATCH, "/campers/42", Some("not json".to_string())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"error": "Camper not found"}));
}

#[tokio::test]
async fn test_update_camper_malformed_body() {
    let app = app(seeded_storage());
    let (status, bytes) =
        send_raw(&app, Method::PATCH, "/campers/1", Some("not json".to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["errors"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_update_camper() {
    let app = app(seeded_storage());

    let (status, body) = send_json(
        &app,
        Method::PATCH,
        "/campers/1",
        Some(json!({"name": "Avery", "age": 13})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "name": "Avery", "age": 13}));

    let (status, body) =
        send_json(&app, Method::PATCH, "/campers/1", Some(json!({"age": 14}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "name": "Avery", "age": 14}));
}

#[tokio::test]
async fn test_update_camper_invalid_age_keeps_record() {
    let app = app(seeded_storage());

    let (status, body) = send_json(
        &app,
        Method::PATCH,
        "/campers/1",
        Some(json!({"name": "Changed", "age": 19})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"errors": ["Camper age must be between 8 and 18"]}));

    let (_, body) = send_json(&app, Method::GET, "/campers/1", None).await;
    assert_eq!(body["camper"]["name"], json!("Ava"));
    assert_eq!(body["camper"]["age"], json!(12));
}

#[tokio::test]
async fn test_update_camper_missing() {
    let app = app(seeded_storage());
    let (status, body) =
        send_json(&app, Method::PATCH, "/campers/42", Some(json!({"age": 10}))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Camper not found"}));
}

#[tokio::test]
async fn test_list_activities() {
    let app = app(seeded_storage());
    let (status, body) = send_json(&app, Method::GET, "/activities", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"id": 1, "name": "Archery", "difficulty": 2},
            {"id": 2, "name": "Canoeing", "difficulty": 3}
        ])
    );
}

#[tokio::test]
async fn test_delete_activity_cascades() {
    let storage = seeded_storage();
    storage.create_signup(&NewSignup::new(1, 2, 9)).unwrap();
    storage.create_signup(&NewSignup::new(2, 2, 10)).unwrap();
    storage.create_signup(&NewSignup::new(1, 1, 11)).unwrap();
    let app = app(storage);

    let (status, body) = send(&app, Method::DELETE, "/activities/2", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (_, ava) = send_json(&app, Method::GET, "/campers/1", None).await;
    assert_eq!(
        ava["camper"]["signups"],
        json!([{"id": 3, "time": 11, "activity_id": 1}])
    );
    let (_, ben) = send_json(&app, Method::GET, "/campers/2", None).await;
    assert_eq!(ben["camper"]["signups"], json!([]));

    let (_, activities) = send_json(&app, Method::GET, "/activities", None).await;
    assert_eq!(activities.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_delete_activity_missing() {
    let app = app(seeded_storage());
    let (status, body) = send_json(&app, Method::DELETE, "/activities/99", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Activity not found"}));
}

#[tokio::test]
async fn test_delete_activity_non_integer_id() {
    let app = app(seeded_storage());
    let (status, body) = send_json(&app, Method::DELETE, "/activities/abc", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Activity not found"}));

    let (_, activities) = send_json(&app, Method::GET, "/activities", None).await;
    assert_eq!(activities.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_delete_camper_cascades() {
    let storage = seeded_storage();
    storage.create_signup(&NewSignup::new(1, 1, 9)).unwrap();
    let app = app(storage);

    let (status, _) = send(&app, Method::DELETE, "/campers/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send_json(&app, Method::GET, "/campers/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send_json(&app, Method::DELETE, "/campers/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Camper not found"}));
}

#[tokio::test]
async fn test_create_signup() {
    let app = app(seeded_storage());
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/signups",
        Some(json!({"camper_id": 1, "activity_id": 2, "time": 10})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({
            "id": 1,
            "camper_id": 1,
            "activity_id": 2,
            "time": 10,
            "activity": {"id": 2, "name": "Canoeing", "difficulty": 3},
            "camper": {"id": 1, "name": "Ava", "age": 12}
        })
    );
}

#[tokio::test]
async fn test_create_signup_without_time() {
    let app = app(seeded_storage());
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/signups",
        Some(json!({"camper_id": 2, "activity_id": 1})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["time"], Value::Null);
    assert_eq!(body["camper"]["name"], json!("Ben"));
    assert_eq!(body["activity"]["name"], json!("Archery"));

    let (_, ben) = send_json(&app, Method::GET, "/campers/2", None).await;
    assert_eq!(
        ben["camper"]["signups"],
        json!([{"id": 1, "time": null, "activity_id": 1}])
    );
}

#[tokio::test]
async fn test_create_signup_missing_reference() {
    let app = app(seeded_storage());

    let bodies = [
        json!({"camper_id": 1, "activity_id": 99, "time": 10}),
        json!({"camper_id": 99, "activity_id": 1, "time": 10}),
        json!({"activity_id": 1, "time": 10}),
    ];
    for request in bodies {
        let (status, body) =
            send_json(&app, Method::POST, "/signups", Some(request.clone())).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{request}");
        assert_eq!(body, json!({"error": "Camper or Activity not found"}));
    }

    let (_, ava) = send_json(&app, Method::GET, "/campers/1", None).await;
    assert_eq!(ava["camper"]["signups"], json!([]));
}

#[tokio::test]
async fn test_create_signup_bad_time() {
    let app = app(seeded_storage());

    for time in [-1, 24] {
        let (status, body) = send_json(
            &app,
            Method::POST,
            "/signups",
            Some(json!({"camper_id": 1, "activity_id": 1, "time": time})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"errors": ["Signup time must be between 0 and 23"]}));
    }

    let (_, ava) = send_json(&app, Method::GET, "/campers/1", None).await;
    assert_eq!(ava["camper"]["signups"], json!([]));
}

#[tokio::test]
async fn test_unknown_route() {
    let app = app(seeded_storage());
    let (status, _) = send(&app, Method::GET, "/signups", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = send(&app, Method::GET, "/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
