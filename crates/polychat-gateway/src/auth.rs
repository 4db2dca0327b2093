//! Credential store boundary.
//!
//! The gateway talks to a [`CredentialStore`] trait so it never depends on a
//! storage or hashing scheme. [`MemoryCredentialStore`] is the in-process
//! dev fixture: plaintext comparison, sequential ids, three seeded accounts,
//! nothing persisted.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Mutex;

/// Public view of an account. Never carries the password.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub username: String,
}

/// External credential store. `verify` checks a login; `register` creates an
/// account and returns `None` when the email is already taken.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn verify(&self, email: &str, password: &str) -> Option<UserProfile>;
    async fn register(&self, email: &str, password: &str, username: &str) -> Option<UserProfile>;
}

// ─────────────────────────────────────────────
// In-memory mock
// ─────────────────────────────────────────────

#[derive(Clone, Debug)]
struct StoredUser {
    id: String,
    username: String,
    password: String,
}

/// Mock user directory for local development.
pub struct MemoryCredentialStore {
    users: Mutex<HashMap<String, StoredUser>>,
}

impl MemoryCredentialStore {
    /// Store seeded with the three demo accounts.
    pub fn new() -> Self {
        let mut users = HashMap::new();
        for (email, username, password, id) in [
            ("admin@example.com", "Admin", "admin123", "1"),
            ("demo@example.com", "Demo User", "demo123", "2"),
            ("test@example.com", "Test User", "test123", "3"),
        ] {
            users.insert(
                email.to_string(),
                StoredUser {
                    id: id.to_string(),
                    username: username.to_string(),
                    password: password.to_string(),
                },
            );
        }
        MemoryCredentialStore {
            users: Mutex::new(users),
        }
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn verify(&self, email: &str, password: &str) -> Option<UserProfile> {
        let users = self.users.lock().await;
        let user = users.get(email)?;
        if user.password != password {
            return None;
        }
        Some(UserProfile {
            id: user.id.clone(),
            email: email.to_string(),
            username: user.username.clone(),
        })
    }

    async fn register(&self, email: &str, password: &str, username: &str) -> Option<UserProfile> {
        let mut users = self.users.lock().await;
        if users.contains_key(email) {
            return None;
        }

        let id = (users.len() + 1).to_string();
        users.insert(
            email.to_string(),
            StoredUser {
                id: id.clone(),
                username: username.to_string(),
                password: password.to_string(),
            },
        );

        Some(UserProfile {
            id,
            email: email.to_string(),
            username: username.to_string(),
        })
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_verify_seeded_account() {
        let store = MemoryCredentialStore::new();
        let user = store.verify("demo@example.com", "demo123").await.unwrap();
        assert_eq!(user.username, "Demo User");
        assert_eq!(user.id, "2");
    }

    #[tokio::test]
    async fn test_verify_wrong_password() {
        let store = MemoryCredentialStore::new();
        assert!(store.verify("demo@example.com", "wrong").await.is_none());
    }

    #[tokio::test]
    async fn test_verify_unknown_email() {
        let store = MemoryCredentialStore::new();
        assert!(store.verify("nobody@example.com", "x").await.is_none());
    }

    #[tokio::test]
    async fn test_register_new_account() {
        let store = MemoryCredentialStore::new();
        let user = store
            .register("new@example.com", "hunter2", "Newcomer")
            .await
            .unwrap();
        assert_eq!(user.id, "4");
        assert_eq!(user.email, "new@example.com");

        // And the account is immediately usable.
        let verified = store.verify("new@example.com", "hunter2").await.unwrap();
        assert_eq!(verified.username, "Newcomer");
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let store = MemoryCredentialStore::new();
        let result = store.register("demo@example.com", "x", "Imposter").await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_profile_never_carries_password() {
        let user = MemoryCredentialStore::new()
            .verify("admin@example.com", "admin123")
            .await
            .unwrap();
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
    }
}
