// src/config.rs
//! Service configuration.
//!
//! Values are layered, later sources overriding earlier ones:
//! 1. Built-in defaults
//! 2. Optional `certreg.{toml,yaml,json}` in the working directory
//! 3. Environment variables prefixed `CERTREG_`, nested keys separated by
//!    `__` (e.g. `CERTREG_BOOTSTRAP_ADMIN__PASSWORD`)
//!
//! `main` loads `.env` first, so variables defined there take part in step 3.

use crate::error::Result;
use crate::storage::verification_log::DEFAULT_MAX_ENTRIES;
use crate::utils::crypto::random_bytes;
use config::{Config, Environment, File};
use log::warn;
use serde::Deserialize;
use std::net::SocketAddr;

/// Account created at startup so the service can be administered.
#[derive(Clone, Debug, Deserialize)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
    #[serde(default = "default_admin_name")]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// HMAC key for session tokens. A random per-process key is used when
    /// unset, so sessions do not survive a restart.
    #[serde(default)]
    pub jwt_secret: Option<String>,

    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: i64,

    #[serde(default = "default_pbkdf2_iterations")]
    pub pbkdf2_iterations: u32,

    /// Load the demonstration certificates at startup.
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,

    /// Verification history entries kept in memory.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    #[serde(default)]
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl AppConfig {
    /// Loads the configuration from file and environment.
    pub fn load() -> Result<Self> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name("certreg").required(false))
                .add_source(
                    Environment::with_prefix("CERTREG")
                        .prefix_separator("_")
                        .separator("__")
                        .try_parsing(true),
                ),
        )
    }

    fn from_builder(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let cfg = builder.build()?.try_deserialize()?;
        Ok(cfg)
    }

    /// Returns the session signing key, generating a random one if none is
    /// configured.
    pub fn session_secret(&self) -> Result<Vec<u8>> {
        match &self.jwt_secret {
            Some(secret) if !secret.is_empty() => Ok(secret.as_bytes().to_vec()),
            _ => {
                warn!("CERTREG_JWT_SECRET is not set; using a random key, sessions end on restart");
                let mut secret = vec![0u8; 32];
                random_bytes(&mut secret)?;
                Ok(secret)
            }
        }
    }
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

const fn default_session_ttl_secs() -> i64 {
    8 * 60 * 60
}

const fn default_pbkdf2_iterations() -> u32 {
    100_000
}

const fn default_seed_demo_data() -> bool {
    true
}

const fn default_history_limit() -> usize {
    DEFAULT_MAX_ENTRIES
}

fn default_admin_name() -> String {
    "Administrator".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::from_builder(Config::builder()).unwrap();
        assert_eq!(cfg.bind_address, default_bind_address());
        assert_eq!(cfg.session_ttl_secs, 28_800);
        assert_eq!(cfg.pbkdf2_iterations, 100_000);
        assert!(cfg.seed_demo_data);
        assert_eq!(cfg.history_limit, 10_000);
        assert!(cfg.jwt_secret.is_none());
        assert!(cfg.bootstrap_admin.is_none());
    }

    #[test]
    fn test_overrides() {
        let builder = Config::builder()
            .set_override("bind_address", "0.0.0.0:8080")
            .unwrap()
            .set_override("seed_demo_data", false)
            .unwrap()
            .set_override("bootstrap_admin.username", "root")
            .unwrap()
            .set_override("bootstrap_admin.password", "changeme")
            .unwrap();
        let cfg = AppConfig::from_builder(builder).unwrap();

        assert_eq!(cfg.bind_address.port(), 8080);
        assert!(!cfg.seed_demo_data);
        let admin = cfg.bootstrap_admin.unwrap();
        assert_eq!(admin.username, "root");
        assert_eq!(admin.name, "Administrator");
    }

    #[test]
    fn test_session_secret() {
        let mut cfg = AppConfig::from_builder(Config::builder()).unwrap();
        assert_eq!(cfg.session_secret().unwrap().len(), 32);

        cfg.jwt_secret = Some("fixed".into());
        assert_eq!(cfg.session_secret().unwrap(), b"fixed".to_vec());
    }
}
