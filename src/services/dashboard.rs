// src/services/dashboard.rs
//! Administrative dashboard aggregates.

use crate::models::certificate::CertificateRecord;
use crate::services::admin_auth::AdminAuth;
use crate::services::certificate_service::CertificateService;
use crate::services::verifier::Verifier;
use serde::{Deserialize, Serialize};

/// Headline counters shown on the dashboard.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_certificates: usize,
    pub total_verifications: usize,
    pub total_dashboard_visits: usize,
    pub total_managers: usize,
}

/// Read-only view over the other services.
#[derive(Clone)]
pub struct Dashboard {
    certificates: CertificateService,
    verifier: Verifier,
    admin_auth: AdminAuth,
}

impl Dashboard {
    pub fn new(certificates: CertificateService, verifier: Verifier, admin_auth: AdminAuth) -> Self {
        Self {
            certificates,
            verifier,
            admin_auth,
        }
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats {
            total_certificates: self.certificates.count(),
            total_verifications: self.verifier.history_len(),
            total_dashboard_visits: self.admin_auth.visit_count(),
            total_managers: self.admin_auth.manager_count(),
        }
    }

    /// Most recently issued certificates, newest first.
    pub fn recent_certificates(&self, limit: usize) -> Vec<CertificateRecord> {
        self.certificates.recent(limit)
    }
}
