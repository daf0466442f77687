use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;

// Organization service configuration sourced from environment variables,
// optionally overridden by the YAML file named in ORGSERVICE_CONFIG.
#[derive(Debug, Clone)]
pub struct OrgServiceConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub instance_id: String,
    pub instance_domain: String,
    pub changes_limit: u64,
    pub change_retention_max_rows: Option<i64>,
    pub idempotent_state_transitions: bool,
    pub validate_org_domains: bool,
}

#[derive(Debug, Default, Deserialize)]
struct OrgServiceConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    instance_id: Option<String>,
    instance_domain: Option<String>,
    changes_limit: Option<u64>,
    change_retention_max_rows: Option<i64>,
    idempotent_state_transitions: Option<bool>,
    validate_org_domains: Option<bool>,
}

fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) => value.trim().parse().with_context(|| format!("parse {key}")),
        Err(_) => Ok(default),
    }
}

impl OrgServiceConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("ORGSERVICE_BIND")
            .unwrap_or_else(|_| "0.0.0.0:8443".to_string())
            .parse()
            .with_context(|| "parse ORGSERVICE_BIND")?;
        let metrics_bind = std::env::var("ORGSERVICE_METRICS_BIND")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .with_context(|| "parse ORGSERVICE_METRICS_BIND")?;
        let instance_id =
            std::env::var("ORGSERVICE_INSTANCE_ID").unwrap_or_else(|_| "local".to_string());
        let instance_domain = std::env::var("ORGSERVICE_INSTANCE_DOMAIN")
            .unwrap_or_else(|_| "orgs.localhost".to_string());
        let change_retention_max_rows = match std::env::var("ORGSERVICE_CHANGE_RETENTION_MAX_ROWS")
        {
            Ok(value) => Some(
                value
                    .trim()
                    .parse()
                    .with_context(|| "parse ORGSERVICE_CHANGE_RETENTION_MAX_ROWS")?,
            ),
            Err(_) => None,
        };
        Ok(Self {
            bind_addr,
            metrics_bind,
            instance_id,
            instance_domain,
            changes_limit: env_parse("ORGSERVICE_CHANGES_LIMIT", 1000)?,
            change_retention_max_rows,
            idempotent_state_transitions: env_parse(
                "ORGSERVICE_IDEMPOTENT_STATE_TRANSITIONS",
                false,
            )?,
            validate_org_domains: env_parse("ORGSERVICE_VALIDATE_ORG_DOMAINS", false)?,
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("ORGSERVICE_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read ORGSERVICE_CONFIG: {path}"))?;
            let override_cfg: OrgServiceConfigOverride =
                serde_yaml::from_str(&contents).with_context(|| "parse orgservice config yaml")?;
            config.apply(override_cfg)?;
        }
        Ok(config)
    }

    fn apply(&mut self, override_cfg: OrgServiceConfigOverride) -> Result<()> {
        if let Some(value) = override_cfg.bind_addr {
            self.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
        }
        if let Some(value) = override_cfg.metrics_bind {
            self.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
        }
        if let Some(value) = override_cfg.instance_id {
            self.instance_id = value;
        }
        if let Some(value) = override_cfg.instance_domain {
            self.instance_domain = value;
        }
        if let Some(value) = override_cfg.changes_limit {
            self.changes_limit = value;
        }
        if let Some(value) = override_cfg.change_retention_max_rows {
            self.change_retention_max_rows = Some(value);
        }
        if let Some(value) = override_cfg.idempotent_state_transitions {
            self.idempotent_state_transitions = value;
        }
        if let Some(value) = override_cfg.validate_org_domains {
            self.validate_org_domains = value;
        }
        Ok(())
    }
}
