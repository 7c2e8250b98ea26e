// src/models/manager.rs
//! Administrator (manager) account data model.
//!
//! A `Manager` is the public view of an administrator account. Password
//! material is kept by the manager directory and never appears here, so a
//! `Manager` can be serialized straight into API responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};

/// Administrative role of a manager.
///
/// `SuperAdmin` may additionally create and remove other managers.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ManagerRole {
    #[default]
    Admin,
    SuperAdmin,
}

/// An administrator account.
///
/// # Fields
/// - `id`: random UUID assigned on creation
/// - `name`, `email`: display information
/// - `admin_username`: login name, unique within the directory
/// - `role`: see [`ManagerRole`]
/// - `created_at`: creation time
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Manager {
    pub id: String,
    pub name: String,
    pub email: String,
    pub admin_username: String,
    pub role: ManagerRole,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a manager. The password is hashed before storage.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewManager {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: ManagerRole,
}

impl NewManager {
    /// Checks that name, username and password are present.
    ///
    /// # Errors
    /// `RegistryError::MissingField` naming the first empty field.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(RegistryError::MissingField("name"));
        }
        if self.username.trim().is_empty() {
            return Err(RegistryError::MissingField("username"));
        }
        if self.password.is_empty() {
            return Err(RegistryError::MissingField("password"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_manager(username: &str, password: &str) -> NewManager {
        NewManager {
            name: "Registrar".into(),
            email: String::new(),
            username: username.into(),
            password: password.into(),
            role: ManagerRole::Admin,
        }
    }

    #[test]
    fn test_validate() {
        assert!(new_manager("registrar", "s3cret").validate().is_ok());
        assert!(matches!(
            new_manager("  ", "s3cret").validate(),
            Err(RegistryError::MissingField("username"))
        ));
        assert!(matches!(
            new_manager("registrar", "").validate(),
            Err(RegistryError::MissingField("password"))
        ));
    }

    #[test]
    fn test_role_defaults_to_admin() {
        let input: NewManager = serde_json::from_str(
            r#"{"name":"R","email":"","username":"r","password":"p"}"#,
        )
        .unwrap();
        assert_eq!(input.role, ManagerRole::Admin);
    }
}
