mod common;

use axum::http::StatusCode;
use common::{TestApp, app, read_json};
use http_helpers::json_request;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn send(app: &TestApp, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(json_request(method, uri, body))
        .await
        .expect("response");
    let status = response.status();
    (status, read_json(response).await)
}

async fn create_org(app: &TestApp) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/v2beta/organizations",
        json!({ "name": "Meta Corp" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["organization_id"]
        .as_str()
        .expect("organization id")
        .to_string()
}

fn keys(body: &Value) -> Vec<String> {
    body["metadata"]
        .as_array()
        .expect("metadata")
        .iter()
        .map(|m| m["key"].as_str().expect("key").to_string())
        .collect()
}

#[tokio::test]
async fn metadata_set_list_and_delete() {
    let app = app();
    let org_id = create_org(&app).await;
    let uri = format!("/v2beta/organizations/{org_id}/metadata");
    let search = format!("{uri}/search");

    let (status, body) = send(
        &app,
        "POST",
        &uri,
        json!({
            "metadata": [
                { "key": "team", "value": "cGxhdGZvcm0=" },
                { "key": "tier", "value": "Z29sZA==" },
                { "key": "region", "value": "ZXU=" },
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["details"]["resource_owner"], org_id.as_str());

    let (status, body) = send(&app, "POST", &search, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["details"]["total_result"], 3);
    assert_eq!(keys(&body), vec!["region", "team", "tier"]);
    assert_eq!(body["metadata"][1]["value"], "cGxhdGZvcm0=");
    assert_eq!(body["metadata"][1]["details"]["resource_owner"], org_id.as_str());

    let (_, body) = send(
        &app,
        "POST",
        &search,
        json!({ "key": { "value": "t", "method": "TEXT_QUERY_METHOD_STARTS_WITH" } }),
    )
    .await;
    assert_eq!(keys(&body), vec!["team", "tier"]);

    let (_, body) = send(
        &app,
        "POST",
        &search,
        json!({ "query": { "offset": 2, "limit": 5 } }),
    )
    .await;
    assert_eq!(keys(&body), vec!["tier"]);
    assert_eq!(body["details"]["total_result"], 3);

    let (status, _) = send(&app, "DELETE", &uri, json!({ "keys": ["team", "region"] })).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, "POST", &search, json!({})).await;
    assert_eq!(keys(&body), vec!["tier"]);
}

#[tokio::test]
async fn metadata_overwrites_existing_keys() {
    let app = app();
    let org_id = create_org(&app).await;
    let uri = format!("/v2beta/organizations/{org_id}/metadata");

    for value in ["b25l", "dHdv"] {
        let (status, _) = send(
            &app,
            "POST",
            &uri,
            json!({ "metadata": [{ "key": "counter", "value": value }] }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, body) = send(&app, "POST", &format!("{uri}/search"), json!({})).await;
    assert_eq!(body["details"]["total_result"], 1);
    assert_eq!(body["metadata"][0]["value"], "dHdv");
}

#[tokio::test]
async fn metadata_rejects_invalid_input() {
    let app = app();
    let org_id = create_org(&app).await;
    let uri = format!("/v2beta/organizations/{org_id}/metadata");

    let (status, body) = send(&app, "POST", &uri, json!({ "metadata": [] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let (status, _) = send(
        &app,
        "POST",
        &uri,
        json!({ "metadata": [{ "key": "ok", "value": "b2s=" }, { "key": " ", "value": "b2s=" }] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/v2beta/organizations/missing/metadata",
        json!({ "metadata": [{ "key": "ok", "value": "b2s=" }] }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &uri, json!({ "keys": [] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        &format!("{uri}/search"),
        json!({ "key": { "value": "ok", "method": -1 } }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, "POST", &format!("{uri}/search"), json!({})).await;
    assert_eq!(body["details"]["total_result"], 0);
}

#[tokio::test]
async fn metadata_delete_with_missing_key_removes_nothing() {
    let app = app();
    let org_id = create_org(&app).await;
    let uri = format!("/v2beta/organizations/{org_id}/metadata");
    send(
        &app,
        "POST",
        &uri,
        json!({ "metadata": [{ "key": "keep", "value": "eWVz" }] }),
    )
    .await;

    let (status, body) = send(&app, "DELETE", &uri, json!({ "keys": ["keep", "absent"] })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "metadata key absent not found");

    let (_, body) = send(&app, "POST", &format!("{uri}/search"), json!({})).await;
    assert_eq!(keys(&body), vec!["keep"]);
}
