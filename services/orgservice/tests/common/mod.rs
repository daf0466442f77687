#![allow(dead_code)]

use orgservice::api::types::FeatureFlags;
use orgservice::app::{AppState, build_router};
use orgservice::model::DomainPolicy;
use orgservice::store::memory::InMemoryStore;
use orgservice::store::{OrganizationStore, StoreConfig};
use std::sync::Arc;

pub type TestApp = axum::routing::RouterIntoService<axum::body::Body, ()>;

pub const INSTANCE_DOMAIN: &str = "orgs.test";

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub fn test_store_config() -> StoreConfig {
    StoreConfig {
        changes_limit: 100,
        change_retention_max_rows: Some(1000),
        instance_id: "instance-test".to_string(),
        instance_domain: INSTANCE_DOMAIN.to_string(),
        idempotent_state_transitions: false,
        domain_policy: DomainPolicy::default(),
    }
}

pub fn app_with_config(config: StoreConfig) -> TestApp {
    let idempotent = config.idempotent_state_transitions;
    let instance_id = config.instance_id.clone();
    let instance_domain = config.instance_domain.clone();
    let store = InMemoryStore::new(config);
    let state = AppState {
        instance_id,
        instance_domain,
        api_version: "v2beta".to_string(),
        features: FeatureFlags {
            durable_storage: store.is_durable(),
            idempotent_state_transitions: idempotent,
        },
        store: Arc::new(store),
    };
    build_router(state).into_service()
}

pub fn app() -> TestApp {
    app_with_config(test_store_config())
}
