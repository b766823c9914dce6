//! Typed access to the persisted session keys

use std::sync::Arc;

use crate::models::UserResponse;
use crate::storage::{keys, Storage, StorageError};

/// Keys removed when a session is torn down
const SESSION_KEYS: [&str; 7] = [
    keys::ACCESS_TOKEN,
    keys::REFRESH_TOKEN,
    keys::USER,
    keys::AUTH,
    keys::WORKSPACE,
    keys::PROJECT,
    keys::ACTIVE_WORKSPACE_ID,
];

#[derive(Clone)]
pub struct Session {
    storage: Arc<dyn Storage>,
}

impl Session {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn access_token(&self) -> Option<String> {
        self.storage
            .get(keys::ACCESS_TOKEN)
            .filter(|token| !token.is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.storage
            .get(keys::REFRESH_TOKEN)
            .filter(|token| !token.is_empty())
    }

    /// Authentication is judged by token presence only, never by validity
    pub fn has_token(&self) -> bool {
        self.access_token().is_some()
    }

    pub fn set_access_token(&self, token: &str) -> Result<(), StorageError> {
        self.storage.set(keys::ACCESS_TOKEN, token)
    }

    /// Persist a token pair; a missing refresh token keeps the stored one
    pub fn store_tokens(&self, access: &str, refresh: Option<&str>) -> Result<(), StorageError> {
        self.storage.set(keys::ACCESS_TOKEN, access)?;
        if let Some(refresh) = refresh {
            self.storage.set(keys::REFRESH_TOKEN, refresh)?;
        }
        Ok(())
    }

    pub fn stored_user(&self) -> Option<UserResponse> {
        let raw = self.storage.get(keys::USER)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Ignoring unreadable stored user: {}", e);
                None
            }
        }
    }

    pub fn store_user(&self, user: &UserResponse) -> Result<(), StorageError> {
        // Serializing a plain struct of strings cannot fail
        let raw = serde_json::to_string(user).unwrap_or_default();
        self.storage.set(keys::USER, &raw)
    }

    /// Remove the token and user keys only
    pub fn clear_credentials(&self) -> Result<(), StorageError> {
        self.storage.remove(keys::ACCESS_TOKEN)?;
        self.storage.remove(keys::REFRESH_TOKEN)?;
        self.storage.remove(keys::USER)
    }

    /// Remove every session key and persisted store snapshot
    pub fn clear(&self) -> Result<(), StorageError> {
        for key in SESSION_KEYS {
            self.storage.remove(key)?;
        }
        Ok(())
    }

    /// Read a persisted JSON snapshot
    pub fn snapshot<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.storage.get(key)?;
        serde_json::from_str(&raw).ok()
    }

    pub fn save_snapshot<T: serde::Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        match serde_json::to_string(value) {
            Ok(raw) => self.storage.set(key, &raw),
            Err(e) => {
                tracing::warn!("Skipping snapshot {}: {}", key, e);
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("has_token", &self.has_token())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn session() -> Session {
        Session::new(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn store_tokens_keeps_refresh_when_absent() {
        let session = session();
        session.store_tokens("a1", Some("r1")).unwrap();
        session.store_tokens("a2", None).unwrap();

        assert_eq!(session.access_token().as_deref(), Some("a2"));
        assert_eq!(session.refresh_token().as_deref(), Some("r1"));
    }

    #[test]
    fn clear_removes_every_session_key() {
        let session = session();
        session.store_tokens("a", Some("r")).unwrap();
        for key in [keys::USER, keys::AUTH, keys::WORKSPACE, keys::PROJECT, keys::ACTIVE_WORKSPACE_ID] {
            session.storage().set(key, "{}").unwrap();
        }

        session.clear().unwrap();

        for key in SESSION_KEYS {
            assert_eq!(session.storage().get(key), None, "{} survived teardown", key);
        }
        assert!(!session.has_token());
    }

    #[test]
    fn empty_token_counts_as_absent() {
        let session = session();
        session.set_access_token("").unwrap();
        assert!(!session.has_token());
    }

    #[test]
    fn stored_user_round_trips() {
        let session = session();
        let user = UserResponse {
            id: "u1".into(),
            email: "ada@example.com".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            roles: vec![],
        };
        session.store_user(&user).unwrap();
        assert_eq!(session.stored_user(), Some(user));
    }
}
