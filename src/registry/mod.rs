// src/registry/mod.rs
//! The certificate registry and its seed data.

pub mod certificate_registry;
pub mod seed;
