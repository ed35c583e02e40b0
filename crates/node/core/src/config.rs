//! Figment-based configuration loading.
//!
//! Configuration priority (highest wins):
//! 1. CLI arguments (applied after Figment load)
//! 2. Config file (TOML)
//! 3. Environment variables (`STANDINGS_` prefix, `__` between sections)
//! 4. Defaults

use std::path::Path;

use eyre::{Result, WrapErr};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use standings_service::ServiceConfig;
use standings_store::RankBackend;

use crate::args::{ServiceArgs, StoreArgs};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "STANDINGS_";

/// Store configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Rank index backend.
    pub backend: RankBackend,
    /// Seed for skip-list level selection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Complete node configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Store configuration.
    pub store: StoreConfig,

    /// Service limits.
    pub service: ServiceConfig,
}

impl NodeConfig {
    /// Load configuration from defaults, environment, and config file.
    /// CLI overrides should be applied separately after loading.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::figment(config_path)
            .extract()
            .wrap_err("Failed to load configuration")
    }

    /// The provider stack behind [`load`](Self::load).
    ///
    /// A missing config file is skipped rather than treated as an error.
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(NodeConfig::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        if let Some(path) = config_path {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        figment
    }

    /// Apply CLI overrides. Only flags that were given replace loaded values.
    pub fn apply_overrides(&mut self, store: &StoreArgs, service: &ServiceArgs) {
        if let Some(backend) = store.backend {
            self.store.backend = backend;
        }
        if let Some(seed) = store.seed {
            self.store.seed = Some(seed);
        }
        if let Some(min_delta) = service.min_delta {
            self.service.min_delta = min_delta;
        }
        if let Some(max_delta) = service.max_delta {
            self.service.max_delta = max_delta;
        }
        if let Some(top_limit) = service.top_limit {
            self.service.top_limit = top_limit;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = NodeConfig::default();
        assert_eq!(config.store.backend, RankBackend::Tree);
        assert_eq!(config.store.seed, None);
        assert_eq!(config.service.max_delta, Decimal::from(1000));
        assert_eq!(config.service.top_limit, 100);
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("standings.toml");

        fs::write(
            &config_path,
            r#"
[store]
backend = "skiplist"
seed = 42

[service]
max_delta = 250
"#,
        )
        .unwrap();

        let config = NodeConfig::load(Some(&config_path)).unwrap();
        assert_eq!(config.store.backend, RankBackend::SkipList);
        assert_eq!(config.store.seed, Some(42));
        assert_eq!(config.service.max_delta, Decimal::from(250));
        assert_eq!(config.service.min_delta, Decimal::from(-1000));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = NodeConfig::load(Some(&config_path)).unwrap();
        assert_eq!(config, NodeConfig::default());
    }

    #[test]
    fn test_env_overrides_defaults_and_file_overrides_env() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("STANDINGS_STORE__BACKEND", "skiplist");
            jail.set_env("STANDINGS_SERVICE__TOP_LIMIT", "25");
            jail.set_env("STANDINGS_SERVICE__MIN_DELTA", "-5");
            jail.create_file("standings.toml", "[service]\ntop_limit = 10\n")?;

            let config: NodeConfig = NodeConfig::figment(None).extract()?;
            assert_eq!(config.store.backend, RankBackend::SkipList);
            assert_eq!(config.service.top_limit, 25);
            assert_eq!(config.service.min_delta, Decimal::from(-5));

            let config: NodeConfig =
                NodeConfig::figment(Some(Path::new("standings.toml"))).extract()?;
            assert_eq!(config.service.top_limit, 10);
            assert_eq!(config.store.backend, RankBackend::SkipList);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_backend_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("standings.toml");
        fs::write(&config_path, "[store]\nbackend = \"btree\"\n").unwrap();

        assert!(NodeConfig::load(Some(&config_path)).is_err());
    }

    #[test]
    fn test_cli_overrides_only_given_flags() {
        let mut config = NodeConfig::default();
        config.service.top_limit = 7;

        config.apply_overrides(
            &StoreArgs {
                backend: Some(RankBackend::SkipList),
                seed: None,
            },
            &ServiceArgs {
                max_delta: Some(Decimal::from(10)),
                ..Default::default()
            },
        );
        assert_eq!(config.store.backend, RankBackend::SkipList);
        assert_eq!(config.store.seed, None);
        assert_eq!(config.service.max_delta, Decimal::from(10));
        assert_eq!(config.service.min_delta, Decimal::from(-1000));
        assert_eq!(config.service.top_limit, 7);
    }
}
