// src/storage/verification_log.rs
//! Append-only log of certificate verifications.
//!
//! Every lookup made by a signed-in user is recorded here with its outcome.
//! Administrators can search the whole log; users see their own recent
//! entries. The log holds at most `max_entries` records and drops the oldest
//! ones first.

use crate::models::verification::{ResultFilter, VerificationRecord, VerificationResult};
use chrono::Utc;
use std::collections::VecDeque;
use uuid::Uuid;

/// Default bound on the number of retained entries.
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// In-memory verification history.
///
/// Entries are kept in the order they were recorded. Queries return owned
/// copies, newest first.
#[derive(Debug)]
pub struct VerificationLog {
    entries: VecDeque<VerificationRecord>,
    max_entries: usize,
}

impl VerificationLog {
    /// Creates a log that keeps at most `max_entries` records (minimum 1).
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Appends an entry and returns it.
    ///
    /// # Arguments
    /// * `certificate_id` - The identifier that was looked up
    /// * `verified_by` - User id, or `None` for an anonymous lookup
    /// * `result` - Outcome of the lookup
    pub fn record(
        &mut self,
        certificate_id: &str,
        verified_by: Option<&str>,
        result: VerificationResult,
    ) -> VerificationRecord {
        let entry = VerificationRecord {
            id: Uuid::new_v4().to_string(),
            certificate_id: certificate_id.to_string(),
            verified_by: verified_by.map(str::to_string),
            result,
            verified_at: Utc::now(),
        };
        if self.entries.len() == self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(entry.clone());
        entry
    }

    /// Returns up to `limit` of a user's most recent verifications.
    pub fn recent_for_user(&self, user_id: &str, limit: usize) -> Vec<VerificationRecord> {
        self.entries
            .iter()
            .rev()
            .filter(|entry| entry.verified_by.as_deref() == Some(user_id))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Searches the whole log, newest first.
    ///
    /// # Arguments
    /// * `term` - Case-insensitive substring matched against the certificate
    ///   id and the verifying user; an empty term matches everything
    /// * `filter` - Restricts results to one outcome, or `All`
    pub fn search(&self, term: &str, filter: ResultFilter) -> Vec<VerificationRecord> {
        let needle = term.trim().to_lowercase();
        self.entries
            .iter()
            .rev()
            .filter(|entry| filter.matches(entry.result))
            .filter(|entry| {
                needle.is_empty()
                    || entry.certificate_id.to_lowercase().contains(&needle)
                    || entry
                        .verified_by
                        .as_deref()
                        .is_some_and(|user| user.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
