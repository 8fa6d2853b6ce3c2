mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use ristoword::handlers::health::HEALTH_MESSAGE;
use ristoword::middleware_helpers::REQUEST_ID_HEADER;
use serde_json::json;

use common::{response_json, response_text, TestApp};

#[tokio::test]
async fn health_answers_in_plain_text() {
    let app = TestApp::new();
    let response = app.request(Method::GET, "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(response_text(response).await, HEALTH_MESSAGE);
}

#[tokio::test]
async fn dedicated_pages_are_served() {
    let app = TestApp::new();

    for (uri, title) in [
        ("/cucina", "Cucina"),
        ("/cassa", "Cassa"),
        ("/magazzino", "Magazzino"),
    ] {
        let response = app.request(Method::GET, uri, None).await;
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        assert!(response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        assert!(response_text(response).await.contains(title));
    }
}

#[tokio::test]
async fn other_static_assets_fall_back_to_public_dir() {
    let app = TestApp::new();

    let response = app.request(Method::GET, "/style.css", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.request(Method::GET, "/menu-del-giorno.pdf", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn responses_carry_the_request_id() {
    let app = TestApp::new();

    let response = app.request(Method::GET, "/orders", None).await;
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));

    let request = Request::builder()
        .method(Method::PATCH)
        .uri("/orders/77/status")
        .header(header::CONTENT_TYPE, "application/json")
        .header(REQUEST_ID_HEADER, "cucina-77")
        .body(Body::from(json!({"status": "pronto"}).to_string()))
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).unwrap(),
        "cucina-77"
    );
    let error = response_json(response).await;
    assert_eq!(error["request_id"], "cucina-77");
    assert_eq!(error["message"], "Order 77 not found");
}
