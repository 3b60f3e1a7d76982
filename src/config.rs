//! Configuration Module
//!
//! Process-level settings loaded from environment variables, plus the fixed
//! per-domain store budgets.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const MB: usize = 1024 * 1024;

// == Environment ==
/// Build/deployment mode. Diagnostics only run outside production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Development,
}

impl Environment {
    /// Returns true when diagnostic reporting and the debug surface may run.
    pub fn is_diagnostic(self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" => Ok(Environment::Development),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

// == Store Config ==
/// Limits for a single cache store, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Upper bound on the summed estimated size of all entries
    pub max_size_bytes: usize,
    /// TTL applied when `set` is called without one
    pub default_ttl: Duration,
    /// Period of the background sweep
    pub cleanup_interval: Duration,
    /// Upper bound on the number of entries
    pub max_entries: usize,
}

impl StoreConfig {
    /// Budget for API responses (project pages, offer listings).
    pub fn api() -> Self {
        Self {
            max_size_bytes: 50 * MB,
            default_ttl: Duration::from_secs(5 * 60),
            cleanup_interval: Duration::from_secs(60),
            max_entries: 1000,
        }
    }

    /// Budget for user profiles and group memberships.
    pub fn user() -> Self {
        Self {
            max_size_bytes: 10 * MB,
            default_ttl: Duration::from_secs(15 * 60),
            cleanup_interval: Duration::from_secs(2 * 60),
            max_entries: 500,
        }
    }

    /// Budget for slow-changing reference data (groups, system attributes).
    pub fn static_data() -> Self {
        Self {
            max_size_bytes: 20 * MB,
            default_ttl: Duration::from_secs(60 * 60),
            cleanup_interval: Duration::from_secs(5 * 60),
            max_entries: 200,
        }
    }
}

// == Cache Config ==
/// Store budgets for the three named cache domains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub api: StoreConfig,
    pub user: StoreConfig,
    pub static_data: StoreConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            api: StoreConfig::api(),
            user: StoreConfig::user(),
            static_data: StoreConfig::static_data(),
        }
    }
}

// == Config ==
/// Process configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment mode
    pub environment: Environment,
    /// Port of the diagnostic HTTP surface
    pub debug_port: u16,
    /// Minutes between performance reports in development
    pub report_interval_minutes: u64,
    /// Optional JSON document backing the fixture data source
    pub fixture_path: Option<PathBuf>,
    /// Per-domain store budgets
    pub cache: CacheConfig,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `APP_ENV` - `production` or `development` (default: production)
    /// - `DEBUG_PORT` - Diagnostic HTTP port (default: 3000)
    /// - `REPORT_INTERVAL_MINUTES` - Report period (default: 5)
    /// - `CACHE_FIXTURE_PATH` - JSON fixture for warming (default: none)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            environment: parse_var("APP_ENV").unwrap_or(defaults.environment),
            debug_port: parse_var("DEBUG_PORT").unwrap_or(defaults.debug_port),
            report_interval_minutes: parse_var("REPORT_INTERVAL_MINUTES")
                .filter(|m| *m > 0)
                .unwrap_or(defaults.report_interval_minutes),
            fixture_path: env::var("CACHE_FIXTURE_PATH").ok().map(PathBuf::from),
            cache: CacheConfig::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: Environment::Production,
            debug_port: 3000,
            report_interval_minutes: 5,
            fixture_path: None,
            cache: CacheConfig::default(),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
