// src/storage/manager_directory.rs
//! Administrator account storage.
//!
//! Keeps manager profiles together with their salted password hashes.
//! Passwords are checked on the server and never leave this module in any
//! form. Hashing and checking happen outside the directory: callers copy a
//! [`CredentialCheck`] out, release the lock, then run the PBKDF2 work.

use crate::error::{RegistryError, Result};
use crate::models::manager::{Manager, NewManager};
use crate::utils::crypto::{unmatchable_password_hash, verify_password};
use chrono::Utc;
use uuid::Uuid;

struct ManagerAccount {
    manager: Manager,
    password_hash: String,
}

/// A username's stored password hash, detached from the directory.
///
/// Unknown usernames carry a placeholder hash, so checking them costs the
/// same as checking a real account.
pub struct CredentialCheck {
    manager: Option<Manager>,
    password_hash: String,
}

impl CredentialCheck {
    /// Verifies `password` against the stored hash.
    ///
    /// # Returns
    /// The matching manager.
    ///
    /// # Errors
    /// `InvalidCredentials` for an unknown username or a wrong password.
    pub fn verify(self, password: &str) -> Result<Manager> {
        let matches = verify_password(password, &self.password_hash);
        match self.manager {
            Some(manager) if matches => Ok(manager),
            _ => Err(RegistryError::InvalidCredentials),
        }
    }
}

/// In-memory directory of manager accounts, in creation order.
pub struct ManagerDirectory {
    accounts: Vec<ManagerAccount>,
    /// PBKDF2 rounds used for newly hashed passwords
    pbkdf2_iterations: u32,
}

impl ManagerDirectory {
    /// Creates an empty directory.
    ///
    /// # Arguments
    /// * `pbkdf2_iterations` - Work factor for password hashing
    pub fn new(pbkdf2_iterations: u32) -> Self {
        Self {
            accounts: Vec::new(),
            pbkdf2_iterations,
        }
    }

    pub fn pbkdf2_iterations(&self) -> u32 {
        self.pbkdf2_iterations
    }

    /// Stores a manager account whose password has already been hashed.
    ///
    /// # Arguments
    /// * `input` - Validated account data
    /// * `password_hash` - Output of [`hash_password`](crate::utils::crypto::hash_password)
    ///
    /// # Errors
    /// `DuplicateUsername` if the username is taken.
    pub fn insert(&mut self, input: NewManager, password_hash: String) -> Result<Manager> {
        if self.find_by_username(&input.username).is_some() {
            return Err(RegistryError::DuplicateUsername(input.username));
        }

        let manager = Manager {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            email: input.email,
            admin_username: input.username,
            role: input.role,
            created_at: Utc::now(),
        };
        self.accounts.push(ManagerAccount {
            manager: manager.clone(),
            password_hash,
        });
        Ok(manager)
    }

    fn find_by_username(&self, username: &str) -> Option<&ManagerAccount> {
        self.accounts
            .iter()
            .find(|account| account.manager.admin_username == username)
    }

    /// Copies out what is needed to check a login for `username`.
    pub fn credentials(&self, username: &str) -> CredentialCheck {
        match self.find_by_username(username) {
            Some(account) => CredentialCheck {
                manager: Some(account.manager.clone()),
                password_hash: account.password_hash.clone(),
            },
            None => CredentialCheck {
                manager: None,
                password_hash: unmatchable_password_hash(self.pbkdf2_iterations),
            },
        }
    }

    pub fn get(&self, id: &str) -> Option<Manager> {
        self.accounts
            .iter()
            .find(|account| account.manager.id == id)
            .map(|account| account.manager.clone())
    }

    pub fn list(&self) -> Vec<Manager> {
        self.accounts.iter().map(|account| account.manager.clone()).collect()
    }

    /// Removes a manager. Returns `false` if no manager had that id.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.accounts.len();
        self.accounts.retain(|account| account.manager.id != id);
        self.accounts.len() != before
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::manager::ManagerRole;
    use crate::utils::crypto::hash_password;

    fn add(directory: &mut ManagerDirectory, username: &str, password: &str) -> Result<Manager> {
        let hash = hash_password(password, directory.pbkdf2_iterations())?;
        directory.insert(
            NewManager {
                name: "Registrar".into(),
                email: "registrar@example.edu".into(),
                username: username.into(),
                password: password.into(),
                role: ManagerRole::Admin,
            },
            hash,
        )
    }

    #[test]
    fn test_check_credentials() {
        let mut directory = ManagerDirectory::new(1_000);
        let created = add(&mut directory, "registrar", "s3cret").unwrap();

        let found = directory.credentials("registrar").verify("s3cret").unwrap();
        assert_eq!(found, created);

        assert!(matches!(
            directory.credentials("registrar").verify("wrong"),
            Err(RegistryError::InvalidCredentials)
        ));
        assert!(matches!(
            directory.credentials("nobody").verify("s3cret"),
            Err(RegistryError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_unknown_username_uses_full_cost_hash() {
        let directory = ManagerDirectory::new(1_000);
        let check = directory.credentials("nobody");
        assert!(check.manager.is_none());
        assert!(check.password_hash.starts_with("pbkdf2-sha256$1000$"));
    }

    #[test]
    fn test_check_is_detached_from_directory() {
        let mut directory = ManagerDirectory::new(1_000);
        let created = add(&mut directory, "registrar", "s3cret").unwrap();

        let check = directory.credentials("registrar");
        assert!(directory.remove(&created.id));
        assert_eq!(check.verify("s3cret").unwrap(), created);
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let mut directory = ManagerDirectory::new(1_000);
        add(&mut directory, "registrar", "a").unwrap();
        assert!(matches!(
            add(&mut directory, "registrar", "b"),
            Err(RegistryError::DuplicateUsername(_))
        ));
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut directory = ManagerDirectory::new(1_000);
        let created = add(&mut directory, "registrar", "a").unwrap();

        assert!(directory.remove(&created.id));
        assert!(directory.get(&created.id).is_none());
        assert!(!directory.remove(&created.id));
        assert_eq!(directory.len(), 0);
    }
}
