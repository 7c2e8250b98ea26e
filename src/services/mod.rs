// src/services/mod.rs
//! Business logic and the HTTP API.

pub mod admin_auth;
pub mod api_server;
pub mod certificate_service;
pub mod dashboard;
pub mod verifier;
