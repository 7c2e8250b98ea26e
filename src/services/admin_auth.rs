// src/services/admin_auth.rs
//! Administrator authentication.
//!
//! Managers log in with a username and password. The password is checked
//! against a salted PBKDF2 hash held by the [`ManagerDirectory`]; on success
//! the caller receives a signed, expiring HS256 session token. Every request
//! to an administrative endpoint presents that token.
//!
//! PBKDF2 work never runs under the directory lock. `login` and
//! `add_manager` are CPU-bound; async callers run them on the blocking pool.

use crate::error::{RegistryError, Result};
use crate::models::manager::{Manager, ManagerRole, NewManager};
use crate::storage::manager_directory::ManagerDirectory;
use crate::utils::crypto::hash_password;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Claims carried by a session token.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Manager id
    pub sub: String,
    pub username: String,
    pub role: ManagerRole,
    /// Issued-at, seconds since the epoch
    pub iat: i64,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}

impl Claims {
    /// Fails with `Forbidden` unless the session belongs to a super admin.
    pub fn require_super_admin(&self) -> Result<()> {
        match self.role {
            ManagerRole::SuperAdmin => Ok(()),
            ManagerRole::Admin => Err(RegistryError::Forbidden("super_admin")),
        }
    }
}

/// Result of a successful login.
#[derive(Serialize, Debug, Clone)]
pub struct Session {
    pub token: String,
    pub manager: Manager,
}

/// A recorded visit to the administrative dashboard.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardVisit {
    pub id: String,
    pub manager_id: String,
    pub visited_at: DateTime<Utc>,
}

/// Login, session validation and manager administration.
#[derive(Clone)]
pub struct AdminAuth {
    directory: Arc<Mutex<ManagerDirectory>>,
    visits: Arc<Mutex<Vec<DashboardVisit>>>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_ttl: Duration,
}

impl AdminAuth {
    /// Creates the service.
    ///
    /// # Arguments
    /// * `directory` - Manager accounts
    /// * `jwt_secret` - HMAC key for session tokens
    /// * `session_ttl` - Lifetime of an issued token
    pub fn new(directory: ManagerDirectory, jwt_secret: &[u8], session_ttl: Duration) -> Self {
        Self {
            directory: Arc::new(Mutex::new(directory)),
            visits: Arc::new(Mutex::new(Vec::new())),
            encoding_key: EncodingKey::from_secret(jwt_secret),
            decoding_key: DecodingKey::from_secret(jwt_secret),
            session_ttl,
        }
    }

    fn directory(&self) -> MutexGuard<'_, ManagerDirectory> {
        self.directory.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn visits(&self) -> MutexGuard<'_, Vec<DashboardVisit>> {
        self.visits.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Authenticates a manager and opens a session.
    ///
    /// # Errors
    /// - `InvalidCredentials` for an unknown username or wrong password
    /// - `Token` if the session token cannot be signed
    ///
    /// # Side Effects
    /// Records a dashboard visit for the manager.
    pub fn login(&self, username: &str, password: &str) -> Result<Session> {
        let check = self.directory().credentials(username);
        let manager = match check.verify(password) {
            Ok(manager) => manager,
            Err(e) => {
                warn!("failed login attempt for username {:?}", username);
                return Err(e);
            }
        };

        let now = Utc::now();
        let claims = Claims {
            sub: manager.id.clone(),
            username: manager.admin_username.clone(),
            role: manager.role,
            iat: now.timestamp(),
            exp: (now + self.session_ttl).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;

        self.record_visit(&manager.id);
        info!("manager {} logged in", manager.admin_username);
        Ok(Session { token, manager })
    }

    /// Validates a session token.
    ///
    /// # Errors
    /// `Unauthorized` if the token is malformed, forged, expired, or names
    /// a manager that no longer exists.
    pub fn authenticate(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            debug!("rejected session token: {}", e);
            RegistryError::Unauthorized
        })?;

        if self.directory().get(&data.claims.sub).is_none() {
            debug!("session token for removed manager {}", data.claims.sub);
            return Err(RegistryError::Unauthorized);
        }
        Ok(data.claims)
    }

    /// Creates a manager account.
    ///
    /// # Errors
    /// - `MissingField` if name, username or password is empty
    /// - `DuplicateUsername` if the username is taken
    /// - `Crypto` / `InvalidConfig` if hashing fails
    pub fn add_manager(&self, input: NewManager) -> Result<Manager> {
        input.validate()?;
        let iterations = self.directory().pbkdf2_iterations();
        let password_hash = hash_password(&input.password, iterations)?;
        let manager = self.directory().insert(input, password_hash)?;
        info!("created manager {} ({:?})", manager.admin_username, manager.role);
        Ok(manager)
    }

    pub fn list_managers(&self) -> Vec<Manager> {
        self.directory().list()
    }

    /// Removes a manager; their open sessions stop validating.
    pub fn remove_manager(&self, id: &str) -> bool {
        let removed = self.directory().remove(id);
        if removed {
            info!("removed manager {}", id);
        }
        removed
    }

    pub fn manager_count(&self) -> usize {
        self.directory().len()
    }

    pub fn record_visit(&self, manager_id: &str) -> DashboardVisit {
        let visit = DashboardVisit {
            id: Uuid::new_v4().to_string(),
            manager_id: manager_id.to_string(),
            visited_at: Utc::now(),
        };
        self.visits().push(visit.clone());
        visit
    }

    pub fn visit_count(&self) -> usize {
        self.visits().len()
    }
}
