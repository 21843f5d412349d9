mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{json_body, post_as_tenant, setup};

fn item(endpoint: &str) -> Value {
    json!({
        "endpoint": endpoint,
        "params": { "from": "2024-03-01", "to": "2024-03-07" }
    })
}

#[tokio::test]
async fn batch_of_ten_is_accepted() {
    let app = setup(false).await;
    let batch: Vec<Value> = (0..10).map(|_| item("views-total")).collect();
    let res = post_as_tenant(&app, "/api/analytics/bulk", json!(batch)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["results"].as_array().map(Vec::len), Some(10));
}

#[tokio::test]
async fn batch_of_eleven_is_rejected() {
    let app = setup(false).await;
    let batch: Vec<Value> = (0..11).map(|_| item("views-total")).collect();
    let res = post_as_tenant(&app, "/api/analytics/bulk", json!(batch)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json_body(res).await;
    assert_eq!(body["success"], false);
    assert_eq!(
        body["message"],
        "Numero massimo di richieste bulk consentite: 10"
    );
}

#[tokio::test]
async fn non_array_body_is_rejected() {
    let app = setup(false).await;
    let res = post_as_tenant(&app, "/api/analytics/bulk", json!({ "endpoint": "x" })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json_body(res).await;
    assert_eq!(body["message"], "Il body deve essere un array di richieste");
}

#[tokio::test]
async fn invalid_endpoint_is_isolated() {
    let app = setup(false).await;
    let batch = json!([item("views-total"), item("no-such-endpoint")]);
    let res = post_as_tenant(&app, "/api/analytics/bulk", batch).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["success"], true);

    let results = body["results"].as_array().expect("results");
    assert_eq!(results[0]["success"], true);
    assert_eq!(
        results[0]["data"]["data"]["current_views"], 1000,
        "valid item still carries its data"
    );
    assert_eq!(
        results[1],
        json!({
            "endpoint": "no-such-endpoint",
            "success": false,
            "error": "Endpoint non valido"
        })
    );
}

#[tokio::test]
async fn item_validation_failure_does_not_abort_the_batch() {
    let app = setup(false).await;
    let batch = json!([
        { "endpoint": "views-total", "params": {} },
        item("clicks-total"),
    ]);
    let res = post_as_tenant(&app, "/api/analytics/bulk", batch).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;

    let results = body["results"].as_array().expect("results");
    assert_eq!(results[0]["success"], false);
    assert_eq!(
        results[0]["data"]["message"],
        "Parametri from e to richiesti"
    );
    assert_eq!(results[1]["success"], true);
    assert_eq!(results[1]["data"]["data"]["current_clicks"], 150);
}

#[tokio::test]
async fn results_preserve_input_order() {
    let app = setup(false).await;
    let batch = json!([
        item("clicks-total"),
        item("no-such-endpoint"),
        item("views-total"),
    ]);
    let res = post_as_tenant(&app, "/api/analytics/bulk", batch).await;
    let body = json_body(res).await;
    let endpoints: Vec<&str> = body["results"]
        .as_array()
        .expect("results")
        .iter()
        .map(|r| r["endpoint"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(endpoints, vec!["clicks-total", "no-such-endpoint", "views-total"]);
}

#[tokio::test]
async fn realtime_endpoints_are_rejected_per_item() {
    let app = setup(false).await;
    let batch = json!([{ "endpoint": "realtime-visitors", "params": {} }]);
    let res = post_as_tenant(&app, "/api/analytics/bulk", batch).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["results"][0]["error"], "Endpoint non valido");
}
