//! Durable client-side state: the logged-in user record and the dark-mode
//! flag, kept in an origin-scoped key-value store.

use crate::models::UserProfile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

const USER_KEY: &str = "user";
const DARK_MODE_KEY: &str = "darkMode";

/// Minimal key-value surface of the browser-local store.
pub trait ClientStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStore(BTreeMap<String, String>);

impl ClientStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.0.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.0.remove(key);
    }
}

/// The persisted session identity: a profile plus the logged-in marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredUser {
    #[serde(flatten)]
    pub profile: UserProfile,
    #[serde(rename = "isLoggedIn")]
    pub is_logged_in: bool,
}

pub fn load_user(store: &dyn ClientStore) -> Option<StoredUser> {
    let raw = store.get(USER_KEY)?;
    match serde_json::from_str::<StoredUser>(&raw) {
        Ok(user) if user.is_logged_in => Some(user),
        Ok(_) => None,
        Err(err) => {
            warn!("record utente memorizzato non valido: {err}");
            None
        }
    }
}

pub fn save_user(store: &mut dyn ClientStore, profile: &UserProfile) {
    let stored = StoredUser {
        profile: profile.clone(),
        is_logged_in: true,
    };
    match serde_json::to_string(&stored) {
        Ok(raw) => store.set(USER_KEY, raw),
        Err(err) => warn!("impossibile serializzare l'utente: {err}"),
    }
}

pub fn clear_user(store: &mut dyn ClientStore) {
    store.remove(USER_KEY);
}

pub fn dark_mode(store: &dyn ClientStore) -> bool {
    store.get(DARK_MODE_KEY).as_deref() == Some("true")
}

pub fn set_dark_mode(store: &mut dyn ClientStore, enabled: bool) {
    store.set(DARK_MODE_KEY, enabled.to_string());
}
