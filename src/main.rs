// src/main.rs

//! # Certificate Registry - Main Entry Point
//!
//! Issues and verifies academic certificates over a JSON HTTP API.
//!
//! ## Architecture Overview
//! 1. **Registry Layer**: `CertificateRegistry`, the in-memory certificate table
//! 2. **Storage Layer**: verification history and manager accounts
//! 3. **Services Layer**: issuance, verification, admin sessions, API endpoints
//! 4. **Utilities**: identifiers, digests and password hashing
//!
//! ## Configuration
//! See [`config::AppConfig`]. Common environment variables:
//! - `CERTREG_BIND_ADDRESS`: listen address (default `127.0.0.1:3000`)
//! - `CERTREG_JWT_SECRET`: session signing key
//! - `CERTREG_BOOTSTRAP_ADMIN__USERNAME` / `__PASSWORD`: initial super admin
//! - `CERTREG_HISTORY_LIMIT`: verification history entries kept (default 10000)
//! - `RUST_LOG`: log filter (default `info`)

use crate::config::AppConfig;
use crate::models::manager::{ManagerRole, NewManager};
use crate::registry::certificate_registry::CertificateRegistry;
use crate::services::admin_auth::AdminAuth;
use crate::services::api_server::ApiServer;
use crate::services::certificate_service::CertificateService;
use crate::services::verifier::Verifier;
use crate::storage::manager_directory::ManagerDirectory;
use anyhow::Context;
use dotenv::dotenv;
use log::{info, warn};

// Module declarations (organized by functional domain)
mod config;        // Layered configuration
mod error;         // Error types
mod models;        // Data structures
mod registry;      // Certificate registry and seed data
mod services;      // Business logic and API
mod storage;       // History and manager stores
mod utils;         // Identifiers and cryptography

/// Main application entry point
///
/// # Initialization Sequence
/// 1. Load `.env` and initialise logging
/// 2. Load configuration
/// 3. Build the registry and services
/// 4. Start API server
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = AppConfig::load().context("failed to load configuration")?;

    let registry = if cfg.seed_demo_data {
        CertificateRegistry::seeded()
    } else {
        CertificateRegistry::new()
    };
    info!("certificate registry ready with {} records", registry.len());
    let certificates = CertificateService::new(registry);
    let verifier = Verifier::new(certificates.clone(), cfg.history_limit);

    let secret = cfg.session_secret().context("failed to prepare session key")?;
    let admin_auth = AdminAuth::new(
        ManagerDirectory::new(cfg.pbkdf2_iterations),
        &secret,
        chrono::Duration::seconds(cfg.session_ttl_secs),
    );

    match &cfg.bootstrap_admin {
        Some(admin) => {
            admin_auth
                .add_manager(NewManager {
                    name: admin.name.clone(),
                    email: admin.email.clone(),
                    username: admin.username.clone(),
                    password: admin.password.clone(),
                    role: ManagerRole::SuperAdmin,
                })
                .context("failed to create bootstrap admin")?;
        }
        None => warn!("no bootstrap admin configured; administrative endpoints are unusable"),
    }

    let api_server = ApiServer::new(certificates, verifier, admin_auth);
    api_server
        .run(cfg.bind_address)
        .await
        .context("API server failed")?;
    Ok(())
}
