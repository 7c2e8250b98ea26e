// src/registry/seed.rs
//! Demonstration records loaded into a freshly seeded registry.

use crate::models::certificate::CertificateRecord;
use chrono::NaiveDate;
use once_cell::sync::Lazy;

struct SeedRow {
    id: &'static str,
    student_name: &'static str,
    student_id: &'static str,
    specialization: &'static str,
    graduation_year: i32,
    issued: NaiveDate,
    ipfs_cid: &'static str,
    blockchain_hash: &'static str,
    is_valid: bool,
}

/// Builds a seed date at compile time; an impossible date fails the build.
const fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid seed date"),
    }
}

const SEED_ROWS: [SeedRow; 3] = [
    SeedRow {
        id: "CERT-2024-001",
        student_name: "أحمد محمد علي",
        student_id: "STU-12345",
        specialization: "علوم الحاسب الآلي",
        graduation_year: 2024,
        issued: date(2024, 6, 15),
        ipfs_cid: "QmVt9qRtNURfqmxNsJXvvFhkfb9bP2gVw6SkMkBrVPUqJQ",
        blockchain_hash: "0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef",
        is_valid: true,
    },
    SeedRow {
        id: "CERT-2024-002",
        student_name: "فاطمة أحمد سالم",
        student_id: "STU-12346",
        specialization: "الهندسة الكهربائية",
        graduation_year: 2024,
        issued: date(2024, 6, 20),
        ipfs_cid: "QmXwTQxiNURfqmxNsJXvvFhkfb9bP2gVw6SkMkBrVPUqJQ",
        blockchain_hash: "0xabcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890",
        is_valid: true,
    },
    // Models a revoked or forged certificate.
    SeedRow {
        id: "CERT-2023-FAKE",
        student_name: "محمد علي فارس",
        student_id: "STU-99999",
        specialization: "إدارة الأعمال",
        graduation_year: 2023,
        issued: date(2023, 6, 1),
        ipfs_cid: "QmFakeCIDForTestingPurposes123456789",
        blockchain_hash: "0xfakehash123456789",
        is_valid: false,
    },
];

static SEED_CERTIFICATES: Lazy<Vec<CertificateRecord>> = Lazy::new(|| {
    SEED_ROWS
        .iter()
        .map(|row| CertificateRecord {
            id: row.id.to_string(),
            student_name: row.student_name.to_string(),
            student_id: row.student_id.to_string(),
            specialization: row.specialization.to_string(),
            graduation_year: row.graduation_year,
            issue_date: row.issued,
            ipfs_cid: row.ipfs_cid.to_string(),
            blockchain_hash: row.blockchain_hash.to_string(),
            is_valid: row.is_valid,
        })
        .collect()
});

/// Returns fresh copies of the demonstration certificates, in seed order.
pub fn seed_certificates() -> Vec<CertificateRecord> {
    SEED_CERTIFICATES.clone()
}
