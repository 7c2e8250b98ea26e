// src/storage/mod.rs
//! In-memory record stores other than the certificate registry.

pub mod manager_directory;
pub mod verification_log;
