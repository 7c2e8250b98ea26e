// src/services/certificate_service.rs
//! Shareable handle to the certificate registry.
//!
//! The registry itself is single-threaded. This service wraps it in a mutex
//! so request handlers can share one registry instance; the lock is held only
//! for the duration of each synchronous map operation.

use crate::error::Result;
use crate::models::certificate::{CertificateRecord, NewCertificate};
use crate::registry::certificate_registry::CertificateRegistry;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Thread-safe certificate issuance and lookup.
///
/// Cloning is cheap and every clone refers to the same registry.
#[derive(Clone, Default)]
pub struct CertificateService {
    registry: Arc<Mutex<CertificateRegistry>>,
}

impl CertificateService {
    /// Wraps an explicitly constructed registry.
    pub fn new(registry: CertificateRegistry) -> Self {
        Self {
            registry: Arc::new(Mutex::new(registry)),
        }
    }

    fn registry(&self) -> MutexGuard<'_, CertificateRegistry> {
        // Registry operations never leave partial state; poisoning is ignored.
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// See [`CertificateRegistry::issue`].
    pub fn issue(&self, data: NewCertificate) -> Result<CertificateRecord> {
        self.registry().issue(data)
    }

    /// See [`CertificateRegistry::verify`].
    pub fn verify(&self, id: &str) -> Option<CertificateRecord> {
        self.registry().verify(id)
    }

    pub fn list(&self) -> Vec<CertificateRecord> {
        self.registry().list()
    }

    pub fn delete(&self, id: &str) -> bool {
        self.registry().delete(id)
    }

    pub fn count(&self) -> usize {
        self.registry().len()
    }

    /// Returns up to `limit` certificates, most recently issued first.
    ///
    /// Ordered by issue date, ties broken by reverse insertion order.
    pub fn recent(&self, limit: usize) -> Vec<CertificateRecord> {
        let mut certificates = self.list();
        certificates.reverse();
        certificates.sort_by(|a, b| b.issue_date.cmp(&a.issue_date));
        certificates.truncate(limit);
        certificates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_registry() {
        let service = CertificateService::new(CertificateRegistry::seeded());
        let other = service.clone();

        let issued = service
            .issue(NewCertificate::new("Jane Doe", "STU-1", "CS", 2025))
            .unwrap();
        assert_eq!(other.verify(&issued.id), Some(issued.clone()));
        assert_eq!(other.count(), 4);

        assert!(other.delete(&issued.id));
        assert!(service.verify(&issued.id).is_none());
    }

    #[test]
    fn test_recent_puts_new_issues_first() {
        let service = CertificateService::new(CertificateRegistry::seeded());
        let issued = service
            .issue(NewCertificate::new("Jane Doe", "STU-1", "CS", 2025))
            .unwrap();

        let recent = service.recent(2);
        let ids: Vec<&str> = recent.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, [issued.id.as_str(), "CERT-2024-002"]);
    }

    #[test]
    fn test_issue_from_many_threads() {
        let service = CertificateService::new(CertificateRegistry::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let service = service.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        service
                            .issue(NewCertificate::new("Jane Doe", "STU-1", "CS", 2025))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(service.count(), 200);
    }
}
