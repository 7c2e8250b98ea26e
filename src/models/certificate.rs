// src/models/certificate.rs
//! Academic certificate data model.
//!
//! Defines the record held by the certificate registry and the input accepted
//! when a new certificate is issued. Field names on the wire follow the
//! camelCase names used by the web front-end (`studentID`, `ipfsCID`, ...).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};

/// A certificate stored in the registry.
///
/// Every field is fixed at issuance. The registry hands out owned copies, so
/// mutating a returned record never affects the stored one.
///
/// # Fields
/// - `id`: registry key, e.g. `CERT-1718000000000-K3J9Q0ZP1`
/// - `student_name`, `student_id`, `specialization`: free text from the issuer
/// - `graduation_year`: calendar year, not range checked
/// - `issue_date`: UTC date of issuance
/// - `ipfs_cid`: simulated content identifier of the certificate document
/// - `blockchain_hash`: simulated anchoring digest, `0x` + 64 hex characters
/// - `is_valid`: `false` marks a revoked or fraudulent certificate
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CertificateRecord {
    pub id: String,

    #[serde(rename = "studentName")]
    pub student_name: String,

    #[serde(rename = "studentID")]
    pub student_id: String,

    pub specialization: String,

    #[serde(rename = "graduationYear")]
    pub graduation_year: i32,

    #[serde(rename = "issueDate")]
    pub issue_date: NaiveDate,

    #[serde(rename = "ipfsCID")]
    pub ipfs_cid: String,

    #[serde(rename = "blockchainHash")]
    pub blockchain_hash: String,

    #[serde(rename = "isValid")]
    pub is_valid: bool,
}

/// Data supplied by an administrator when issuing a certificate.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NewCertificate {
    #[serde(rename = "studentName")]
    pub student_name: String,

    #[serde(rename = "studentID")]
    pub student_id: String,

    pub specialization: String,

    #[serde(rename = "graduationYear")]
    pub graduation_year: i32,
}

#[cfg(test)]
impl NewCertificate {
    pub fn new(
        student_name: impl Into<String>,
        student_id: impl Into<String>,
        specialization: impl Into<String>,
        graduation_year: i32,
    ) -> Self {
        Self {
            student_name: student_name.into(),
            student_id: student_id.into(),
            specialization: specialization.into(),
            graduation_year,
        }
    }
}

impl NewCertificate {
    /// Checks that every text field is present.
    ///
    /// # Errors
    /// `RegistryError::MissingField` naming the first empty field (after
    /// trimming whitespace). The graduation year is accepted as given.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("studentName", &self.student_name),
            ("studentID", &self.student_id),
            ("specialization", &self.specialization),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(RegistryError::MissingField(name));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_blank_fields() {
        let input = NewCertificate::new("Jane Doe", "   ", "CS", 2025);
        assert!(matches!(
            input.validate(),
            Err(RegistryError::MissingField("studentID"))
        ));

        let input = NewCertificate::new("", "STU-1", "", 2025);
        assert!(matches!(
            input.validate(),
            Err(RegistryError::MissingField("studentName"))
        ));
    }

    #[test]
    fn test_validate_accepts_any_year() {
        assert!(NewCertificate::new("Jane Doe", "STU-1", "CS", 1).validate().is_ok());
    }

    #[test]
    fn test_record_uses_front_end_field_names() {
        let record = CertificateRecord {
            id: "CERT-1".into(),
            student_name: "Jane Doe".into(),
            student_id: "STU-1".into(),
            specialization: "CS".into(),
            graduation_year: 2025,
            issue_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            ipfs_cid: "QmTest".into(),
            blockchain_hash: "0xabc".into(),
            is_valid: true,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["studentID"], "STU-1");
        assert_eq!(json["ipfsCID"], "QmTest");
        assert_eq!(json["issueDate"], "2025-06-01");
        assert_eq!(json["isValid"], true);
    }
}
