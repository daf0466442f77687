mod common;

use axum::http::StatusCode;
use common::{INSTANCE_DOMAIN, TestApp, app, app_with_config, read_json, test_store_config};
use http_helpers::{empty_request, json_request};
use orgservice::store::StoreConfig;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn create_org(app: &TestApp, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/v2beta/organizations", body))
        .await
        .expect("create organization");
    let status = response.status();
    (status, read_json(response).await)
}

async fn create_named(app: &TestApp, name: &str) -> String {
    let (status, body) = create_org(app, json!({ "name": name })).await;
    assert_eq!(status, StatusCode::CREATED, "create {name}: {body}");
    body["organization_id"]
        .as_str()
        .expect("organization id")
        .to_string()
}

async fn search(app: &TestApp, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/v2beta/organizations/search", body))
        .await
        .expect("search organizations");
    let status = response.status();
    (status, read_json(response).await)
}

async fn post_empty(app: &TestApp, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(empty_request("POST", uri))
        .await
        .expect("post");
    let status = response.status();
    (status, read_json(response).await)
}

fn names(body: &Value) -> Vec<String> {
    body["result"]
        .as_array()
        .expect("result")
        .iter()
        .map(|org| org["name"].as_str().expect("name").to_string())
        .collect()
}

fn human(email: &str) -> Value {
    json!({
        "given_name": "Jane",
        "family_name": "Doe",
        "email": email,
    })
}

#[tokio::test]
async fn create_organization_reports_details_and_generated_domain() {
    let app = app();
    let (status, body) = create_org(
        &app,
        json!({ "name": "  Dr. Acme Labs ", "organization_id": "org-acme" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["organization_id"], "org-acme");
    assert_eq!(body["details"]["resource_owner"], "org-acme");
    assert!(body["details"]["sequence"].as_u64().expect("sequence") > 0);
    assert!(body["details"]["creation_date"].is_string());
    assert_eq!(body["created_admins"], json!([]));

    let (status, list) = search(&app, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let org = &list["result"][0];
    assert_eq!(org["name"], "Dr. Acme Labs");
    assert_eq!(org["state"], "ORG_STATE_ACTIVE");
    assert_eq!(
        org["primary_domain"],
        format!("dr-acme-labs.{INSTANCE_DOMAIN}")
    );

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v2beta/organizations/org-acme/domains/search",
            json!({}),
        ))
        .await
        .expect("domains");
    let domains = read_json(response).await;
    assert_eq!(domains["details"]["total_result"], 1);
    assert_eq!(domains["domains"][0]["is_primary"], true);
    assert_eq!(domains["domains"][0]["is_verified"], true);
}

#[tokio::test]
async fn create_organization_rejects_bad_names() {
    let app = app();
    let (status, body) = create_org(&app, json!({ "name": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    create_named(&app, "Acme").await;
    let (status, body) = create_org(&app, json!({ "name": "ACME" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "already_exists");
}

#[tokio::test]
async fn create_organization_with_admins_collapses_linked_humans() {
    let app = app();
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/admin/v1/idps",
            json!({ "name": "corporate-sso" }),
        ))
        .await
        .expect("idp");
    assert_eq!(response.status(), StatusCode::CREATED);
    let idp_id = read_json(response).await["id"]
        .as_str()
        .expect("idp id")
        .to_string();
    let link = json!({ "idp_id": idp_id, "user_id": "ext-1", "user_name": "jane" });

    let mut existing = human("jane@example.com");
    existing["idp_links"] = json!([link.clone()]);
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v2beta/users/human",
            json!({ "human": existing }),
        ))
        .await
        .expect("user");
    assert_eq!(response.status(), StatusCode::CREATED);
    let existing_id = read_json(response).await["user_id"]
        .as_str()
        .expect("user id")
        .to_string();

    let mut linked = human("jane.other@example.com");
    linked["idp_links"] = json!([link]);
    let mut fresh = human("new.admin@example.com");
    fresh["email_verification"] = json!("return_code");
    let (status, body) = create_org(
        &app,
        json!({
            "name": "Admins Inc",
            "admins": [
                { "user_id": existing_id },
                { "human": linked },
                { "human": fresh, "roles": ["ORG_USER_MANAGER"] },
            ],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let created = body["created_admins"].as_array().expect("created admins");
    assert_eq!(created.len(), 2);
    assert_eq!(created[0]["user_id"], existing_id.as_str());
    assert!(created[0].get("email_code").is_none());
    assert_ne!(created[1]["user_id"], existing_id.as_str());
    assert_eq!(created[1]["email_code"].as_str().expect("code").len(), 8);

    let org_id = body["organization_id"].as_str().expect("org id");
    let response = app
        .clone()
        .oneshot(empty_request(
            "GET",
            &format!("/v2beta/organizations/{org_id}/admins"),
        ))
        .await
        .expect("admins");
    let admins = read_json(response).await;
    let admins = admins["admins"].as_array().expect("admins");
    assert_eq!(admins.len(), 2);
    assert_eq!(admins[0]["roles"], json!(["ORG_OWNER"]));
    assert_eq!(admins[1]["roles"], json!(["ORG_USER_MANAGER"]));
}

#[tokio::test]
async fn failed_admin_resolution_creates_nothing() {
    let app = app();
    let (status, body) = create_org(
        &app,
        json!({
            "name": "Half Made",
            "admins": [
                { "human": human("first@example.com") },
                { "user_id": "missing-user" },
            ],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");

    let (status, body) = create_org(&app, json!({ "name": "Half Made", "admins": [{}] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .expect("message")
            .contains("invalid admin type")
    );

    let (_, list) = search(&app, json!({})).await;
    assert_eq!(list["details"]["total_result"], 0);

    // The email of the rolled back admin is still free.
    let (status, _) = create_org(
        &app,
        json!({ "name": "Half Made", "admins": [{ "human": human("first@example.com") }] }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn update_organization_renames() {
    let app = app();
    let org_id = create_named(&app, "Before").await;
    create_named(&app, "Taken").await;

    let uri = format!("/v2beta/organizations/{org_id}");
    let response = app
        .clone()
        .oneshot(json_request("PATCH", &uri, json!({ "name": "After" })))
        .await
        .expect("rename");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["details"]["resource_owner"], org_id.as_str());
    assert!(body["details"]["change_date"].is_string());
    assert!(body["details"].get("creation_date").is_none());
    let renamed_seq = body["details"]["sequence"].as_u64().expect("sequence");

    let response = app
        .clone()
        .oneshot(json_request("PATCH", &uri, json!({ "name": "After" })))
        .await
        .expect("rename to same name");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert!(body["details"]["sequence"].as_u64().expect("sequence") > renamed_seq);
    assert!(body["details"]["change_date"].is_string());

    let response = app
        .clone()
        .oneshot(json_request("PATCH", &uri, json!({ "name": "taken" })))
        .await
        .expect("rename taken");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(json_request("PATCH", &uri, json!({ "name": "" })))
        .await
        .expect("rename empty");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/v2beta/organizations/missing",
            json!({ "name": "Whatever" }),
        ))
        .await
        .expect("rename missing");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let (_, list) = search(
        &app,
        json!({ "queries": [{ "id": org_id }] }),
    )
    .await;
    assert_eq!(names(&list), vec!["After"]);
    assert_eq!(
        list["result"][0]["primary_domain"],
        format!("after.{INSTANCE_DOMAIN}")
    );
}

#[tokio::test]
async fn list_organizations_filters_sorts_and_pages() {
    let app = app();
    create_named(&app, "beta").await;
    create_named(&app, "Alpha").await;
    create_named(&app, "gamma").await;

    let (status, body) = search(
        &app,
        json!({
            "query": { "offset": 0, "limit": 0, "asc": true },
            "sorting_column": "ORGANIZATION_FIELD_NAME_NAME",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sorting_column"], "ORGANIZATION_FIELD_NAME_NAME");
    assert_eq!(names(&body), vec!["Alpha", "beta", "gamma"]);
    assert_eq!(body["details"]["total_result"], 3);
    assert!(body["details"]["processed_sequence"].as_u64().expect("seq") >= 3);

    let (_, body) = search(
        &app,
        json!({
            "query": { "asc": false },
            "sorting_column": "ORGANIZATION_FIELD_NAME_NAME",
        }),
    )
    .await;
    assert_eq!(names(&body), vec!["gamma", "beta", "Alpha"]);

    let (_, body) = search(
        &app,
        json!({
            "query": { "offset": 1, "limit": 1, "asc": true },
            "sorting_column": "ORGANIZATION_FIELD_NAME_NAME",
        }),
    )
    .await;
    assert_eq!(names(&body), vec!["beta"]);
    assert_eq!(body["details"]["total_result"], 3);

    let (_, body) = search(
        &app,
        json!({
            "queries": [{
                "name": { "value": "ALP", "method": "TEXT_QUERY_METHOD_STARTS_WITH_IGNORE_CASE" }
            }],
        }),
    )
    .await;
    assert_eq!(names(&body), vec!["Alpha"]);

    let (_, body) = search(
        &app,
        json!({
            "queries": [{
                "domain": { "value": "ma.orgs.test", "method": 6 }
            }],
        }),
    )
    .await;
    assert_eq!(names(&body), vec!["gamma"]);
}

#[tokio::test]
async fn list_organizations_rejects_unknown_text_method() {
    let app = app();
    create_named(&app, "Acme").await;
    let (status, body) = search(
        &app,
        json!({ "queries": [{ "name": { "value": "Acme", "method": 99 } }] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let (status, body) = search(
        &app,
        json!({ "queries": [{ "name": { "value": "Acme", "method": "TEXT_QUERY_METHOD_BOGUS" } }] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn deactivate_and_reactivate_enforce_state() {
    let app = app();
    let org_id = create_named(&app, "Stateful").await;
    let deactivate = format!("/v2beta/organizations/{org_id}/deactivate");
    let reactivate = format!("/v2beta/organizations/{org_id}/reactivate");

    let (status, _) = post_empty(&app, &reactivate).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = post_empty(&app, &deactivate).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["details"]["resource_owner"], org_id.as_str());

    let (status, body) = post_empty(&app, &deactivate).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "failed_precondition");

    let (_, list) = search(
        &app,
        json!({ "queries": [{ "state": "ORG_STATE_INACTIVE" }] }),
    )
    .await;
    assert_eq!(names(&list), vec!["Stateful"]);

    let (status, _) = post_empty(&app, &reactivate).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post_empty(&app, "/v2beta/organizations/missing/deactivate").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn idempotent_transitions_accept_repeats() {
    let app = app_with_config(StoreConfig {
        idempotent_state_transitions: true,
        ..test_store_config()
    });
    let org_id = create_named(&app, "Relaxed").await;
    let deactivate = format!("/v2beta/organizations/{org_id}/deactivate");

    let (status, first) = post_empty(&app, &deactivate).await;
    assert_eq!(status, StatusCode::OK);
    let (status, second) = post_empty(&app, &deactivate).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["details"]["sequence"], second["details"]["sequence"]);
}

#[tokio::test]
async fn delete_organization_removes_it() {
    let app = app();
    let org_id = create_named(&app, "Doomed").await;
    let uri = format!("/v2beta/organizations/{org_id}");

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &uri))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &uri))
        .await
        .expect("delete again");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(response).await["message"], "Organisation not found");

    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("{uri}/admins")))
        .await
        .expect("admins");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let (status, list) = search(&app, json!({ "queries": [{ "id": org_id }] })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["result"], json!([]));
    assert_eq!(list["details"]["total_result"], 0);

    // The name is free again.
    create_named(&app, "Doomed").await;
}
