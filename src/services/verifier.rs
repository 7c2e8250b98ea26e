// src/services/verifier.rs
//! Certificate verification service.
//!
//! Looks certificates up in the registry and, for signed-in users, records
//! each lookup in the verification history.

use crate::error::{RegistryError, Result};
use crate::models::certificate::CertificateRecord;
use crate::models::verification::{ResultFilter, VerificationRecord, VerificationResult};
use crate::services::certificate_service::CertificateService;
use crate::storage::verification_log::VerificationLog;
use log::{debug, info};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// What a verification found.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct VerificationOutcome {
    pub result: VerificationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<CertificateRecord>,
}

/// Certificate verifier backed by the shared registry.
///
/// The Verifier provides:
/// - Read-only certificate lookups
/// - Verification history for signed-in users
/// - History search for administrators
#[derive(Clone)]
pub struct Verifier {
    certificates: CertificateService,
    history: Arc<Mutex<VerificationLog>>,
}

impl Verifier {
    /// Constructs a new Verifier over an existing certificate service.
    ///
    /// # Arguments
    /// * `certificates` - Shared certificate registry
    /// * `history_limit` - Number of history entries retained
    pub fn new(certificates: CertificateService, history_limit: usize) -> Self {
        Self {
            certificates,
            history: Arc::new(Mutex::new(VerificationLog::new(history_limit))),
        }
    }

    fn history(&self) -> MutexGuard<'_, VerificationLog> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Verifies a certificate by id.
    ///
    /// # Arguments
    /// * `certificate_id` - User-supplied id; surrounding whitespace is ignored
    /// * `user_id` - Signed-in user, if any
    ///
    /// # Returns
    /// - `Valid` with the record if found and valid
    /// - `Invalid` with the record if found but revoked
    /// - `NotFound` without a record otherwise
    ///
    /// # Errors
    /// `MissingField("certificateId")` if the id is blank.
    ///
    /// # Side Effects
    /// Appends to the verification history when `user_id` is given.
    pub fn verify(&self, certificate_id: &str, user_id: Option<&str>) -> Result<VerificationOutcome> {
        let certificate_id = certificate_id.trim();
        if certificate_id.is_empty() {
            return Err(RegistryError::MissingField("certificateId"));
        }

        let certificate = self.certificates.verify(certificate_id);
        let result = match &certificate {
            Some(record) if record.is_valid => VerificationResult::Valid,
            Some(_) => VerificationResult::Invalid,
            None => VerificationResult::NotFound,
        };
        info!("verification of {}: {}", certificate_id, result);

        if let Some(user_id) = user_id {
            let entry = self.history().record(certificate_id, Some(user_id), result);
            debug!("recorded verification {} for user {}", entry.id, user_id);
        }

        Ok(VerificationOutcome { result, certificate })
    }

    /// A user's most recent verifications, newest first.
    pub fn recent_for_user(&self, user_id: &str, limit: usize) -> Vec<VerificationRecord> {
        self.history().recent_for_user(user_id, limit)
    }

    /// Searches the full history. See [`VerificationLog::search`].
    pub fn search_history(&self, term: &str, filter: ResultFilter) -> Vec<VerificationRecord> {
        self.history().search(term, filter)
    }

    pub fn history_len(&self) -> usize {
        self.history().len()
    }
}
