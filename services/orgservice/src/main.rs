//! Organization service HTTP entry point.
//!
//! # Purpose
//! Wires configuration, storage and the HTTP router, then serves the API and
//! the metrics endpoint until shutdown.
//!
//! # Notes
//! The `build_state` helper keeps wiring testable and minimizes main setup logic.
use orgservice::api::types::FeatureFlags;
use orgservice::app::{AppState, build_router};
use orgservice::config::OrgServiceConfig;
use orgservice::model::DomainPolicy;
use orgservice::observability;
use orgservice::store::{OrganizationStore, StoreConfig, memory::InMemoryStore};
use std::future::Future;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = OrgServiceConfig::from_env_or_yaml()?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: OrgServiceConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability("orgservice")?;
    let state = build_state(config.clone());
    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        config.metrics_bind,
    ));

    let app = build_router(state.clone());
    let addr = config.bind_addr;
    tracing::info!(
        %addr,
        backend = state.store.backend_name(),
        instance_domain = %state.instance_domain,
        "orgservice listening"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tokio::pin!(shutdown);
    tokio::select! {
        result = axum::serve(listener, app.into_make_service()) => {
            result?;
        }
        _ = &mut shutdown => {}
    }

    metrics_task.abort();
    let _ = metrics_task.await;
    Ok(())
}

fn build_state(config: OrgServiceConfig) -> AppState {
    let store_config = StoreConfig {
        changes_limit: config.changes_limit,
        change_retention_max_rows: config.change_retention_max_rows,
        instance_id: config.instance_id.clone(),
        instance_domain: config.instance_domain.clone(),
        idempotent_state_transitions: config.idempotent_state_transitions,
        domain_policy: DomainPolicy {
            validate_org_domains: config.validate_org_domains,
            ..DomainPolicy::default()
        },
    };
    let store: Arc<dyn OrganizationStore> = Arc::new(InMemoryStore::new(store_config));

    AppState {
        instance_id: config.instance_id,
        instance_domain: config.instance_domain,
        api_version: "v2beta".to_string(),
        features: FeatureFlags {
            durable_storage: store.is_durable(),
            idempotent_state_transitions: config.idempotent_state_transitions,
        },
        store,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn test_config() -> OrgServiceConfig {
        OrgServiceConfig {
            bind_addr: "127.0.0.1:0".parse().expect("bind"),
            metrics_bind: "127.0.0.1:0".parse().expect("metrics"),
            instance_id: "local".to_string(),
            instance_domain: "orgs.test".to_string(),
            changes_limit: 10,
            change_retention_max_rows: Some(20),
            idempotent_state_transitions: true,
            validate_org_domains: true,
        }
    }

    #[tokio::test]
    async fn build_state_memory_backend() {
        let state = build_state(test_config());
        assert_eq!(state.instance_id, "local");
        assert!(!state.features.durable_storage);
        assert!(state.features.idempotent_state_transitions);
        let policy = state.store.domain_policy().await.expect("policy");
        assert!(policy.validate_org_domains);
    }

    #[tokio::test]
    #[serial]
    async fn run_with_shutdown_starts_and_stops() {
        run_with_shutdown(test_config(), async {
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        })
        .await
        .expect("run should stop cleanly");
    }
}
