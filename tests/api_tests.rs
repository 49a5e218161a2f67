use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use sensorlink::web::{auth::API_KEY_HEADER, create_app, models::StoredReading, ReadingStore, WebConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app(api_key: Option<&str>) -> Router {
    let config = WebConfig::default().with_api_key(api_key.map(str::to_string));
    create_app(&config, Arc::new(ReadingStore::new()))
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("Request should complete");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Body should be JSON")
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Root greeting and health stay open
#[tokio::test]
async fn test_root_and_health() {
    let app = app(Some("secret"));

    let (status, body) = call(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "Hello": "World" }));

    let (status, body) = call(&app, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["readings"], 0);
}

/// Insert then fetch a reading by id
#[tokio::test]
async fn test_insert_and_get_reading() {
    let app = app(None);

    let (status, body) = call(
        &app,
        post_json(
            "/sensor-data",
            json!({ "temperature": 21.5, "co2": 640, "noise_db": 38.2 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "Data inserted");

    let id = body["id"].as_str().expect("Insert should return an id").to_string();
    let (status, body) = call(&app, get(&format!("/sensor-data/{}", id))).await;
    assert_eq!(status, StatusCode::OK);

    let reading: StoredReading = serde_json::from_value(body).unwrap();
    assert_eq!(reading.id.to_string(), id);
    assert_eq!(reading.temperature, 21.5);
    assert_eq!(reading.co2, Some(640));
    assert_eq!(reading.light_lux, None);
}

/// Malformed bodies are rejected
#[tokio::test]
async fn test_insert_requires_temperature() {
    let app = app(None);

    let (status, body) = call(&app, post_json("/sensor-data", json!({ "co2": 500 }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("temperature"));

    let not_json = Request::builder()
        .method(Method::POST)
        .uri("/sensor-data")
        .header("content-type", "application/json")
        .body(Body::from("{temperature: 21"))
        .unwrap();
    let (status, body) = call(&app, not_json).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = call(&app, get("/sensor-data")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

/// Range queries filter by timestamp and keep chronological order
#[tokio::test]
async fn test_list_readings_in_range() {
    let app = app(None);

    for (temperature, timestamp) in [
        (23.0, "2024-05-01T12:00:00Z"),
        (20.0, "2024-05-01T10:00:00Z"),
        (25.0, "2024-05-02T09:00:00Z"),
    ] {
        let (status, _) = call(
            &app,
            post_json(
                "/sensor-data",
                json!({ "temperature": temperature, "timestamp": timestamp }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = call(&app, get("/sensor-data")).await;
    assert_eq!(status, StatusCode::OK);
    let temperatures: Vec<f64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["temperature"].as_f64().unwrap())
        .collect();
    assert_eq!(temperatures, vec![20.0, 23.0, 25.0]);

    let (status, body) = call(
        &app,
        get("/sensor-data?start=2024-05-01T11:00:00Z&end=2024-05-01T23:59:59Z"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["temperature"], 23.0);
}

/// Aggregates cover only the readings that carry each metric
#[tokio::test]
async fn test_reading_stats() {
    let app = app(None);

    for body in [
        json!({ "temperature": 20.0, "co2": 400 }),
        json!({ "temperature": 24.0, "co2": 800, "light_lux": 120.0 }),
        json!({ "temperature": 22.0 }),
    ] {
        call(&app, post_json("/sensor-data", body)).await;
    }

    let (status, body) = call(&app, get("/sensor-data/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["temperature"]["mean"], 22.0);
    assert_eq!(body["temperature"]["max"], 24.0);
    assert_eq!(body["co2"]["mean"], 600.0);
    assert_eq!(body["light_lux"]["max"], 120.0);
    assert_eq!(body["noise_db"], Value::Null);
}

/// A start after the end is a bad request
#[tokio::test]
async fn test_inverted_range_rejected() {
    let app = app(None);

    for uri in [
        "/sensor-data?start=2024-05-02T00:00:00Z&end=2024-05-01T00:00:00Z",
        "/sensor-data/stats?start=2024-05-02T00:00:00Z&end=2024-05-01T00:00:00Z",
    ] {
        let (status, body) = call(&app, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("start"));
    }
}

/// Deleting removes the reading; a second delete is a 404
#[tokio::test]
async fn test_delete_reading() {
    let app = app(None);

    let (_, body) = call(&app, post_json("/sensor-data", json!({ "temperature": 19.0 }))).await;
    let id = body["id"].as_str().unwrap().to_string();
    let uri = format!("/sensor-data/{}", id);

    let delete = || {
        Request::builder()
            .method(Method::DELETE)
            .uri(&uri)
            .body(Body::empty())
            .unwrap()
    };

    let (status, body) = call(&app, delete()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Data deleted");

    let (status, _) = call(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, delete()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Unknown ids are a 404, malformed ids a client error
#[tokio::test]
async fn test_unknown_reading() {
    let app = app(None);

    let (status, body) = call(
        &app,
        get("/sensor-data/6f1c2d1e-8a51-4c4e-9d53-0d6c0e3b7a10"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));

    let (status, body) = call(&app, get("/sensor-data/not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

/// Unparsable range bounds get a JSON error body
#[tokio::test]
async fn test_malformed_range_rejected() {
    let app = app(None);

    let (status, body) = call(&app, get("/sensor-data?start=yesterday")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

/// Reading routes need the shared secret when one is configured
#[tokio::test]
async fn test_api_key_required() {
    let app = app(Some("secret"));

    let (status, body) = call(&app, get("/sensor-data")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let wrong = Request::builder()
        .uri("/sensor-data")
        .header(API_KEY_HEADER, "guess")
        .body(Body::empty())
        .unwrap();
    let (status, _) = call(&app, wrong).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut insert = post_json("/sensor-data", json!({ "temperature": 20.0 }));
    insert
        .headers_mut()
        .insert(API_KEY_HEADER, "secret".parse().unwrap());
    let (status, _) = call(&app, insert).await;
    assert_eq!(status, StatusCode::CREATED);

    let authorized = Request::builder()
        .uri("/sensor-data")
        .header(API_KEY_HEADER, "secret")
        .body(Body::empty())
        .unwrap();
    let (status, body) = call(&app, authorized).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

/// An empty configured key leaves the API open
#[tokio::test]
async fn test_empty_api_key_disables_gate() {
    let app = app(Some(""));

    let (status, _) = call(&app, post_json("/sensor-data", json!({ "temperature": 20.0 }))).await;
    assert_eq!(status, StatusCode::CREATED);
}
