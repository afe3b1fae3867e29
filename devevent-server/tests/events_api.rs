//! End-to-end tests for the JSON API over the memory store.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use devevent_server::db::MemoryConnector;
use devevent_server::media::{ImageUpload, MediaUploader, UploadError};
use devevent_server::{build_router, AppState};

const BOUNDARY: &str = "devevent-test-boundary";

struct StubUploader;

#[async_trait]
impl MediaUploader for StubUploader {
    async fn upload(&self, image: ImageUpload) -> Result<String, UploadError> {
        Ok(format!("https://media.test/DevEvent/{}", image.file_name))
    }
}

fn app() -> Router {
    let state = AppState::new(
        Arc::new(MemoryConnector::default()),
        Arc::new(StubUploader),
    );
    build_router(Arc::new(state))
}

fn event_fields(title: &str) -> Vec<(&'static str, String)> {
    vec![
        ("title", title.to_string()),
        ("description", "Monthly React talks and networking".to_string()),
        ("overview", "Two talks, then pizza".to_string()),
        ("venue", "Tech Hub".to_string()),
        ("location", "Berlin, Germany".to_string()),
        ("date", "March 5, 2026".to_string()),
        ("time", "18:30".to_string()),
        ("mode", "offline".to_string()),
        ("audience", "Frontend developers".to_string()),
        ("organizer", "React Berlin".to_string()),
        ("agenda", r#"["Doors open","Talks","Networking"]"#.to_string()),
        ("tags", r#"["react","frontend"]"#.to_string()),
    ]
}

fn multipart(fields: &[(&'static str, String)], with_image: bool) -> Request<Body> {
    let image = with_image.then(|| b"PNGDATA".to_vec());
    multipart_with_image(fields, image)
}

fn multipart_with_image(
    fields: &[(&'static str, String)],
    image: Option<Vec<u8>>,
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(bytes) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"image\"; filename=\"cover.png\"\r\n\
                 Content-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::post("/api/events")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn create(app: &Router, title: &str) -> Value {
    let (status, body) = send(app, multipart(&event_fields(title), true)).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["event"].clone()
}

#[tokio::test]
async fn create_then_fetch_by_slug() {
    let app = app();
    let event = create(&app, "React Meetup").await;

    assert_eq!(event["slug"], "react-meetup");
    assert_eq!(event["date"], "2026-03-05");
    assert_eq!(event["image"], "https://media.test/DevEvent/cover.png");
    assert_eq!(event["tags"], json!(["react", "frontend"]));

    let (status, body) = send(&app, get("/api/events/React-Meetup")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"], event);
}

#[tokio::test]
async fn list_is_newest_first() {
    let app = app();
    create(&app, "React Meetup").await;
    create(&app, "Rust Meetup").await;

    let (status, body) = send(&app, get("/api/events")).await;
    assert_eq!(status, StatusCode::OK);
    let slugs: Vec<_> = body["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["slug"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(slugs, vec!["rust-meetup", "react-meetup"]);
}

#[tokio::test]
async fn missing_image_is_400() {
    let (status, body) = send(&app(), multipart(&event_fields("React Meetup"), false)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Image is required");
}

#[tokio::test]
async fn banner_sized_image_is_accepted() {
    let image = vec![0u8; 3 * 1024 * 1024];
    let req = multipart_with_image(&event_fields("React Meetup"), Some(image));

    let (status, body) = send(&app(), req).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
}

#[tokio::test]
async fn oversized_submission_is_413() {
    let image = vec![0u8; 11 * 1024 * 1024];
    let req = multipart_with_image(&event_fields("React Meetup"), Some(image));

    let (status, body) = send(&app(), req).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"], "payload_too_large");
}

#[tokio::test]
async fn malformed_tags_are_400() {
    let mut fields = event_fields("React Meetup");
    fields.retain(|(name, _)| *name != "tags");
    fields.push(("tags", "react, frontend".to_string()));

    let (status, body) = send(&app(), multipart(&fields, true)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid agenda or tags format");
}

#[tokio::test]
async fn invalid_fields_are_400_with_details() {
    let mut fields = event_fields("React Meetup");
    fields.retain(|(name, _)| *name != "time" && *name != "venue");
    fields.push(("time", "25:00".to_string()));

    let app = app();
    let (status, body) = send(&app, multipart(&fields, true)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let fields: Vec<_> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap().to_string())
        .collect();
    assert!(fields.contains(&"time".to_string()));
    assert!(fields.contains(&"venue".to_string()));

    let (_, list) = send(&app, get("/api/events")).await;
    assert_eq!(list["events"], json!([]));
}

#[tokio::test]
async fn duplicate_slug_is_409() {
    let app = app();
    create(&app, "DevOps Days NY!!").await;

    let (status, body) = send(&app, multipart(&event_fields("DevOps Days NY"), true)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn bad_and_unknown_slugs() {
    let app = app();

    let (status, _) = send(&app, get("/api/events/react_meetup")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, get("/api/events/no-such-event")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn similar_events_share_a_tag() {
    let app = app();
    create(&app, "React Meetup").await;
    create(&app, "React Conf").await;

    let (status, body) = send(&app, get("/api/events/react-meetup/similar")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"][0]["slug"], "react-conf");
    assert_eq!(body["events"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, get("/api/events/unknown/similar")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"], json!([]));
}

#[tokio::test]
async fn booking_flow() {
    let app = app();
    let event = create(&app, "React Meetup").await;
    let event_id = event["id"].as_str().unwrap().to_string();
    let booking = json!({
        "eventId": event_id,
        "email": "ada@example.com",
        "slug": "react-meetup"
    });

    let (status, body) = send(&app, json_post("/api/bookings", booking.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Event booked successfully");
    assert_eq!(body["booking"]["email"], "ada@example.com");

    let (status, body) = send(&app, json_post("/api/bookings", booking)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Event already booked");

    let (status, body) = send(&app, get(&format!("/api/bookings?eventId={event_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bookings"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn booking_unknown_event_is_422() {
    let app = app();
    let booking = json!({
        "eventId": Uuid::new_v4().to_string(),
        "email": "ada@example.com",
        "slug": "ghost"
    });

    let (status, body) = send(&app, json_post("/api/bookings", booking)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "referenced event does not exist");

    let (_, list) = send(&app, get("/api/bookings")).await;
    assert_eq!(list["bookings"], json!([]));
}

#[tokio::test]
async fn booking_missing_field_is_204() {
    let app = app();
    let event = create(&app, "React Meetup").await;
    let booking = json!({ "eventId": event["id"], "slug": "react-meetup" });

    let (status, body) = send(&app, json_post("/api/bookings", booking)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn booking_with_foreign_slug_is_400() {
    let app = app();
    let event = create(&app, "React Meetup").await;
    let booking = json!({
        "eventId": event["id"],
        "email": "ada@example.com",
        "slug": "totally-other-event"
    });

    let (status, body) = send(&app, json_post("/api/bookings", booking)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "slug");

    let (_, list) = send(&app, get("/api/bookings")).await;
    assert_eq!(list["bookings"], json!([]));
}

#[tokio::test]
async fn malformed_booking_requests_get_json_errors() {
    let app = app();

    let req = Request::post("/api/bookings")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let (status, body) = send(&app, get("/api/bookings?eventId=not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}
