// src/registry/certificate_registry.rs
//! In-memory certificate registry.
//!
//! Holds the authoritative set of certificate records keyed by id. Lookups
//! are hash-based; a separate key list preserves insertion order for
//! listing. State lives as long as the registry value does; nothing is
//! persisted.

use crate::error::Result;
use crate::models::certificate::{CertificateRecord, NewCertificate};
use crate::registry::seed::seed_certificates;
use crate::utils::identifiers::{blockchain_hash, certificate_id, ipfs_cid};
use chrono::Utc;
use log::{debug, info};
use rand::rngs::OsRng;
use std::collections::HashMap;

/// Keyed table of issued certificates.
///
/// This registry provides:
/// - Single-threaded storage (wrap in a mutex to share, see
///   [`CertificateService`](crate::services::certificate_service::CertificateService))
/// - O(1) average lookup by certificate id
/// - Insertion-ordered listing
///
/// Records are immutable once inserted: there is no update operation and
/// every accessor returns an owned copy.
#[derive(Debug, Default)]
pub struct CertificateRegistry {
    /// Records by id
    certificates: HashMap<String, CertificateRecord>,
    /// Ids in insertion order
    order: Vec<String>,
}

impl CertificateRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry preloaded with the demonstration records.
    pub fn seeded() -> Self {
        let mut registry = Self::new();
        for record in seed_certificates() {
            registry.insert(record);
        }
        debug!("certificate registry seeded with {} records", registry.len());
        registry
    }

    fn insert(&mut self, record: CertificateRecord) {
        if self.certificates.insert(record.id.clone(), record.clone()).is_none() {
            self.order.push(record.id);
        }
    }

    /// Issues a new certificate.
    ///
    /// # Arguments
    /// * `data` - Student name, student id, specialization and graduation year
    ///
    /// # Returns
    /// The stored record, with generated `id`, `ipfs_cid` and
    /// `blockchain_hash`, today's `issue_date` and `is_valid = true`.
    ///
    /// # Errors
    /// `RegistryError::MissingField` if a text field is empty.
    ///
    /// # Behavior
    /// - A generated id that already exists is redrawn
    /// - The graduation year is not range checked
    pub fn issue(&mut self, data: NewCertificate) -> Result<CertificateRecord> {
        data.validate()?;

        let mut rng = OsRng;
        let now = Utc::now();
        let mut id = certificate_id(&mut rng, now);
        while self.contains(&id) {
            id = certificate_id(&mut rng, now);
        }

        let record = CertificateRecord {
            ipfs_cid: ipfs_cid(&mut rng),
            blockchain_hash: blockchain_hash(&mut rng, &data, &id),
            issue_date: now.date_naive(),
            is_valid: true,
            student_name: data.student_name,
            student_id: data.student_id,
            specialization: data.specialization,
            graduation_year: data.graduation_year,
            id,
        };

        self.insert(record.clone());
        info!("issued certificate {} for student {}", record.id, record.student_id);
        Ok(record)
    }

    /// Looks up a certificate by exact id.
    ///
    /// # Returns
    /// - `Some(record)` if found (an owned copy)
    /// - `None` otherwise; no partial or fuzzy matching
    pub fn verify(&self, id: &str) -> Option<CertificateRecord> {
        self.certificates.get(id).cloned()
    }

    /// Returns every record in insertion order.
    pub fn list(&self) -> Vec<CertificateRecord> {
        self.order
            .iter()
            .filter_map(|id| self.certificates.get(id))
            .cloned()
            .collect()
    }

    /// Removes a certificate.
    ///
    /// # Returns
    /// `true` if the certificate was present and removed, `false` if no
    /// certificate had that id.
    pub fn delete(&mut self, id: &str) -> bool {
        if self.certificates.remove(id).is_none() {
            return false;
        }
        self.order.retain(|existing| existing != id);
        info!("deleted certificate {}", id);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.certificates.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }
}
