// src/models/verification.rs
//! Verification history data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of a single certificate lookup.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VerificationResult {
    /// Found and marked valid.
    Valid,
    /// Found but revoked or fraudulent.
    Invalid,
    NotFound,
}

impl VerificationResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationResult::Valid => "valid",
            VerificationResult::Invalid => "invalid",
            VerificationResult::NotFound => "not_found",
        }
    }
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "valid" => Ok(VerificationResult::Valid),
            "invalid" => Ok(VerificationResult::Invalid),
            "not_found" => Ok(VerificationResult::NotFound),
            other => Err(format!("unknown verification result `{}`", other)),
        }
    }
}

/// One entry of the verification history.
///
/// # Fields
/// - `id`: random UUID assigned when the entry is recorded
/// - `certificate_id`: the identifier that was looked up, trimmed
/// - `verified_by`: id of the signed-in user, `None` for anonymous lookups
/// - `result`: what the lookup found
/// - `verified_at`: time of the lookup
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRecord {
    pub id: String,
    pub certificate_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<String>,
    pub result: VerificationResult,
    pub verified_at: DateTime<Utc>,
}

/// Result filter used when searching the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultFilter {
    #[default]
    All,
    Only(VerificationResult),
}

impl ResultFilter {
    pub fn matches(&self, result: VerificationResult) -> bool {
        match self {
            ResultFilter::All => true,
            ResultFilter::Only(wanted) => *wanted == result,
        }
    }
}

impl FromStr for ResultFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(ResultFilter::All),
            other => other.parse().map(ResultFilter::Only),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_wire_names() {
        assert_eq!(
            serde_json::to_string(&VerificationResult::NotFound).unwrap(),
            "\"not_found\""
        );
        assert_eq!("invalid".parse::<VerificationResult>(), Ok(VerificationResult::Invalid));
        assert!("revoked".parse::<VerificationResult>().is_err());
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("all".parse::<ResultFilter>(), Ok(ResultFilter::All));
        assert_eq!("".parse::<ResultFilter>(), Ok(ResultFilter::All));

        let filter: ResultFilter = "valid".parse().unwrap();
        assert!(filter.matches(VerificationResult::Valid));
        assert!(!filter.matches(VerificationResult::NotFound));
    }
}
