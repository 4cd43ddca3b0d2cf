//! Marketplace configuration loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{DEFAULT_RATING_MAX_ATTEMPTS, GeoValidationError, SearchRadius};
use crate::outbound::persistence::PoolConfig;

const DEFAULT_RADIUS_KM: f64 = 10.0;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_POOL_MIN_IDLE: u32 = 2;
const DEFAULT_POOL_CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Settings controlling storage and matching behaviour.
///
/// Every field can be supplied as a CLI flag, a `MARKETPLACE_*` environment
/// variable or a configuration file key.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MARKETPLACE")]
pub struct MarketplaceSettings {
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    pub pool_max_size: Option<u32>,
    /// Idle connections kept open.
    pub pool_min_idle: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub pool_connection_timeout_secs: Option<u64>,
    /// Apply embedded migrations before serving; on unless set to `false`.
    pub run_migrations: Option<bool>,
    /// Radius used when a caller omits one.
    pub default_radius_km: Option<f64>,
    /// Bound on aggregate rating recompute attempts.
    pub rating_max_attempts: Option<u32>,
}

impl MarketplaceSettings {
    /// Pool configuration, when a database URL is set.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref()?.trim();
        if url.is_empty() {
            return None;
        }
        Some(
            PoolConfig::new(url)
                .with_max_size(self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE))
                .with_min_idle(Some(self.pool_min_idle.unwrap_or(DEFAULT_POOL_MIN_IDLE)))
                .with_connection_timeout(Duration::from_secs(
                    self.pool_connection_timeout_secs
                        .unwrap_or(DEFAULT_POOL_CONNECTION_TIMEOUT_SECS),
                )),
        )
    }

    /// Radius applied when callers omit one.
    ///
    /// # Errors
    ///
    /// Fails when the configured value is not a positive finite number.
    pub fn default_radius(&self) -> Result<SearchRadius, GeoValidationError> {
        SearchRadius::from_km(self.default_radius_km.unwrap_or(DEFAULT_RADIUS_KM))
    }

    /// Whether embedded migrations run when the pool is built.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// Recompute attempts per rating submission, at least one.
    pub fn rating_max_attempts(&self) -> u32 {
        self.rating_max_attempts
            .unwrap_or(DEFAULT_RATING_MAX_ATTEMPTS)
            .max(1)
    }
}
