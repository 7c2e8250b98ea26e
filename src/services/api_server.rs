// src/services/api_server.rs
//! API Server for the certificate registry.
//!
//! This module provides the JSON-over-HTTP interface used by the web
//! front-end. It is built using Axum and includes endpoints for:
//! - Administrator login
//! - Certificate issuance, listing and deletion (administrators)
//! - Public certificate verification, with history for signed-in users
//! - Verification history search and dashboard statistics
//! - Manager administration (super admins)
//!
//! Administrative endpoints expect `Authorization: Bearer <session token>`.
//! End users are authenticated upstream by the OAuth provider; their id
//! arrives in the `x-user-id` header.

use crate::error::RegistryError;
use crate::models::certificate::NewCertificate;
use crate::models::manager::NewManager;
use crate::models::verification::{ResultFilter, VerificationResult};
use crate::services::admin_auth::{AdminAuth, Claims};
use crate::services::certificate_service::CertificateService;
use crate::services::dashboard::Dashboard;
use crate::services::verifier::Verifier;
use crate::utils::crypto::certificate_hash;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Json, Path, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Header carrying the id of an end user signed in through OAuth.
pub const USER_ID_HEADER: &str = "x-user-id";

const DEFAULT_RECENT_LIMIT: usize = 5;

// API request and response structures

/// Request payload for administrator login
#[derive(Serialize, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

/// Request payload for computing a certificate hash
#[derive(Serialize, Deserialize)]
struct CertificateHashRequest {
    #[serde(rename = "studentID")]
    student_id: String,
    #[serde(rename = "studentName")]
    student_name: String,
    department: String,
}

/// Response containing a certificate hash
#[derive(Serialize, Deserialize)]
struct CertificateHashResponse {
    hash: String,
}

/// Query parameters for the verification history search
#[derive(Deserialize, Default)]
struct HistoryQuery {
    #[serde(default)]
    search: String,
    #[serde(default)]
    result: String,
}

/// Query parameters for endpoints returning the latest N items
#[derive(Deserialize, Default)]
struct LimitQuery {
    limit: Option<usize>,
}

/// JSON body extractor whose failures are reported as [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
struct ApiJson<T>(T);

/// Query string extractor whose failures are reported as [`ApiError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
struct ApiQuery<T>(T);

/// Error wrapper turning a [`RegistryError`] into a JSON response.
pub struct ApiError(RegistryError);

impl From<RegistryError> for ApiError {
    fn from(e: RegistryError) -> Self {
        ApiError(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(RegistryError::InvalidInput(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError(RegistryError::InvalidInput(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            RegistryError::MissingField(_) | RegistryError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
            RegistryError::InvalidCredentials | RegistryError::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            RegistryError::Forbidden(_) => StatusCode::FORBIDDEN,
            RegistryError::DuplicateUsername(_) => StatusCode::CONFLICT,
            RegistryError::Token(_)
            | RegistryError::Crypto
            | RegistryError::Config(_)
            | RegistryError::InvalidConfig(_)
            | RegistryError::Task(_) => {
                error!("request failed: {}", self.0);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// API server state containing all service dependencies
#[derive(Clone)]
pub struct ApiServer {
    /// Certificate issuance and lookup
    certificates: CertificateService,

    /// Verification with history
    verifier: Verifier,

    /// Administrator sessions and accounts
    admin_auth: AdminAuth,

    /// Dashboard aggregates
    dashboard: Dashboard,
}

impl ApiServer {
    /// Creates a new instance of the API server
    ///
    /// # Arguments
    /// * `certificates` - Shared certificate registry
    /// * `verifier` - Verification service over the same registry
    /// * `admin_auth` - Administrator authentication
    pub fn new(certificates: CertificateService, verifier: Verifier, admin_auth: AdminAuth) -> Self {
        let dashboard = Dashboard::new(certificates.clone(), verifier.clone(), admin_auth.clone());
        ApiServer {
            certificates,
            verifier,
            admin_auth,
            dashboard,
        }
    }

    /// Builds the router with every API route.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(Self::health_handler))
            .route("/login", post(Self::login_handler))
            .route(
                "/certificates",
                post(Self::issue_certificate_handler).get(Self::list_certificates_handler),
            )
            .route("/certificates/hash", post(Self::certificate_hash_handler))
            .route(
                "/certificates/:id",
                get(Self::verify_certificate_handler).delete(Self::delete_certificate_handler),
            )
            .route("/verification-history", get(Self::verification_history_handler))
            .route(
                "/users/:user_id/verification-history",
                get(Self::user_history_handler),
            )
            .route("/dashboard/stats", get(Self::dashboard_stats_handler))
            .route(
                "/dashboard/recent-certificates",
                get(Self::recent_certificates_handler),
            )
            .route(
                "/managers",
                get(Self::list_managers_handler).post(Self::create_manager_handler),
            )
            .route("/managers/:id", delete(Self::delete_manager_handler))
            .layer(CorsLayer::permissive())
            .with_state(Arc::new(self.clone()))
    }

    /// Starts the API server and begins listening for requests
    ///
    /// # Arguments
    /// * `addr` - Socket address to bind to (e.g., "127.0.0.1:3000")
    ///
    /// # Errors
    /// Returns the I/O error if binding or serving fails.
    pub async fn run(&self, addr: SocketAddr) -> std::io::Result<()> {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("API server listening on http://{}", listener.local_addr()?);
        axum::serve(listener, app).await
    }

    /// Validates the bearer token of an administrative request.
    fn admin_claims(&self, headers: &HeaderMap) -> Result<Claims, RegistryError> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(RegistryError::Unauthorized)?;
        self.admin_auth.authenticate(token.trim())
    }

    /// Returns the end user named by the `x-user-id` header, if any.
    fn signed_in_user(headers: &HeaderMap) -> Option<&str> {
        headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
    // =====================
    // Session Handlers
    // =====================

    async fn health_handler() -> impl IntoResponse {
        Json(json!({ "status": "ok" }))
    }

    /// Authenticates a manager and returns a session token
    ///
    /// # Endpoint
    /// POST /login
    ///
    /// # Responses
    /// - 200 OK: Returns `{token, manager}`
    /// - 400 Bad Request: Malformed body
    /// - 401 Unauthorized: Invalid credentials
    async fn login_handler(
        State(state): State<Arc<ApiServer>>,
        ApiJson(payload): ApiJson<LoginRequest>,
    ) -> ApiResult<impl IntoResponse> {
        let admin_auth = state.admin_auth.clone();
        let session = tokio::task::spawn_blocking(move || {
            admin_auth.login(&payload.username, &payload.password)
        })
        .await
        .map_err(RegistryError::from)??;
        Ok(Json(session))
    }

    // =====================
    // Certificate Handlers
    // =====================

    /// Issues a new certificate
    ///
    /// # Endpoint
    /// POST /certificates
    ///
    /// # Responses
    /// - 201 Created: Returns the issued record
    /// - 400 Bad Request: A required field is missing or empty
    /// - 401 Unauthorized: Missing or invalid session
    async fn issue_certificate_handler(
        State(state): State<Arc<ApiServer>>,
        headers: HeaderMap,
        ApiJson(payload): ApiJson<NewCertificate>,
    ) -> ApiResult<impl IntoResponse> {
        let claims = state.admin_claims(&headers)?;
        let record = state.certificates.issue(payload)?;
        info!("certificate {} issued by {}", record.id, claims.username);
        Ok((StatusCode::CREATED, Json(record)))
    }

    /// Lists every certificate in issuance order
    ///
    /// # Endpoint
    /// GET /certificates
    async fn list_certificates_handler(
        State(state): State<Arc<ApiServer>>,
        headers: HeaderMap,
    ) -> ApiResult<impl IntoResponse> {
        state.admin_claims(&headers)?;
        Ok(Json(state.certificates.list()))
    }

    /// Verifies a certificate
    ///
    /// # Endpoint
    /// GET /certificates/:id
    ///
    /// # Responses
    /// - 200 OK: `{result: "valid" | "invalid", certificate}`
    /// - 404 Not Found: `{result: "not_found"}`
    ///
    /// The lookup is added to the user's history when `x-user-id` is present.
    async fn verify_certificate_handler(
        State(state): State<Arc<ApiServer>>,
        Path(id): Path<String>,
        headers: HeaderMap,
    ) -> ApiResult<impl IntoResponse> {
        let outcome = state.verifier.verify(&id, Self::signed_in_user(&headers))?;
        let status = match outcome.result {
            VerificationResult::NotFound => StatusCode::NOT_FOUND,
            VerificationResult::Valid | VerificationResult::Invalid => StatusCode::OK,
        };
        Ok((status, Json(outcome)))
    }

    /// Deletes a certificate
    ///
    /// # Endpoint
    /// DELETE /certificates/:id
    ///
    /// # Responses
    /// - 204 No Content: Deleted
    /// - 404 Not Found: No such certificate
    async fn delete_certificate_handler(
        State(state): State<Arc<ApiServer>>,
        Path(id): Path<String>,
        headers: HeaderMap,
    ) -> ApiResult<impl IntoResponse> {
        let claims = state.admin_claims(&headers)?;
        if !state.certificates.delete(&id) {
            return Err(RegistryError::NotFound(format!("certificate {}", id)).into());
        }
        info!("certificate {} deleted by {}", id, claims.username);
        Ok(StatusCode::NO_CONTENT)
    }

    /// Computes the deterministic hash of a student's identity fields
    ///
    /// # Endpoint
    /// POST /certificates/hash
    async fn certificate_hash_handler(
        State(state): State<Arc<ApiServer>>,
        headers: HeaderMap,
        ApiJson(payload): ApiJson<CertificateHashRequest>,
    ) -> ApiResult<impl IntoResponse> {
        state.admin_claims(&headers)?;
        if payload.student_id.trim().is_empty() {
            return Err(RegistryError::MissingField("studentID").into());
        }
        let hash = certificate_hash(&payload.student_id, &payload.student_name, &payload.department);
        Ok(Json(CertificateHashResponse { hash }))
    }

    // =====================
    // History & Dashboard
    // =====================

    /// Searches the verification history
    ///
    /// # Endpoint
    /// GET /verification-history?search=&result=
    async fn verification_history_handler(
        State(state): State<Arc<ApiServer>>,
        headers: HeaderMap,
        ApiQuery(query): ApiQuery<HistoryQuery>,
    ) -> ApiResult<impl IntoResponse> {
        state.admin_claims(&headers)?;
        let filter: ResultFilter = query
            .result
            .parse()
            .map_err(RegistryError::InvalidInput)?;
        Ok(Json(state.verifier.search_history(&query.search, filter)))
    }

    /// Returns a user's most recent verifications
    ///
    /// # Endpoint
    /// GET /users/:user_id/verification-history?limit=
    ///
    /// # Responses
    /// - 200 OK: Newest first
    /// - 401 Unauthorized: `x-user-id` is absent or names another user
    async fn user_history_handler(
        State(state): State<Arc<ApiServer>>,
        Path(user_id): Path<String>,
        headers: HeaderMap,
        ApiQuery(query): ApiQuery<LimitQuery>,
    ) -> ApiResult<impl IntoResponse> {
        if Self::signed_in_user(&headers) != Some(user_id.as_str()) {
            return Err(RegistryError::Unauthorized.into());
        }
        let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
        Ok(Json(state.verifier.recent_for_user(&user_id, limit)))
    }

    async fn dashboard_stats_handler(
        State(state): State<Arc<ApiServer>>,
        headers: HeaderMap,
    ) -> ApiResult<impl IntoResponse> {
        state.admin_claims(&headers)?;
        Ok(Json(state.dashboard.stats()))
    }

    async fn recent_certificates_handler(
        State(state): State<Arc<ApiServer>>,
        headers: HeaderMap,
        ApiQuery(query): ApiQuery<LimitQuery>,
    ) -> ApiResult<impl IntoResponse> {
        state.admin_claims(&headers)?;
        let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
        Ok(Json(state.dashboard.recent_certificates(limit)))
    }

    // =====================
    // Manager Handlers
    // =====================

    async fn list_managers_handler(
        State(state): State<Arc<ApiServer>>,
        headers: HeaderMap,
    ) -> ApiResult<impl IntoResponse> {
        state.admin_claims(&headers)?;
        Ok(Json(state.admin_auth.list_managers()))
    }

    /// Creates a manager account (super admins only)
    ///
    /// # Endpoint
    /// POST /managers
    ///
    /// # Responses
    /// - 201 Created: Returns the manager (without password)
    /// - 403 Forbidden: Caller is not a super admin
    /// - 409 Conflict: Username taken
    async fn create_manager_handler(
        State(state): State<Arc<ApiServer>>,
        headers: HeaderMap,
        ApiJson(payload): ApiJson<NewManager>,
    ) -> ApiResult<impl IntoResponse> {
        state.admin_claims(&headers)?.require_super_admin()?;
        let admin_auth = state.admin_auth.clone();
        let manager = tokio::task::spawn_blocking(move || admin_auth.add_manager(payload))
            .await
            .map_err(RegistryError::from)??;
        Ok((StatusCode::CREATED, Json(manager)))
    }

    /// Removes a manager account (super admins only)
    ///
    /// # Endpoint
    /// DELETE /managers/:id
    async fn delete_manager_handler(
        State(state): State<Arc<ApiServer>>,
        Path(id): Path<String>,
        headers: HeaderMap,
    ) -> ApiResult<impl IntoResponse> {
        state.admin_claims(&headers)?.require_super_admin()?;
        if !state.admin_auth.remove_manager(&id) {
            return Err(RegistryError::NotFound(format!("manager {}", id)).into());
        }
        Ok(StatusCode::NO_CONTENT)
    }
}
