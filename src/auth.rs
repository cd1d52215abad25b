//! Account registration, login and profile updates.
//!
//! Passwords are stored as `sha256(password + salt)` hex digests with a
//! random 16-character alphanumeric salt, one record per username in
//! `users.json`.

use crate::models::{StoreData, UserProfile, UserRecord};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::Local;
use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("Nome utente già in uso")]
    DuplicateUsername,
    #[error("Nome utente o password non validi")]
    InvalidCredentials,
    #[error("Utente non trovato")]
    UnknownUser,
}

pub fn hash_password(password: &str) -> (String, String) {
    let salt: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();
    (digest(password, &salt), salt)
}

pub fn verify_password(password: &str, stored_hash: &str, salt: &str) -> bool {
    digest(password, salt) == stored_hash
}

fn digest(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Creates the account and its empty vote record. The username is taken as
/// given and is immutable from here on.
pub fn register(store: &mut StoreData, username: &str, password: &str) -> Result<UserProfile, AuthError> {
    if store.users.contains_key(username) {
        return Err(AuthError::DuplicateUsername);
    }

    let (password_hash, salt) = hash_password(password);
    let record = UserRecord {
        password_hash,
        salt,
        created_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        is_admin: false,
        nome: String::new(),
        cognome: String::new(),
        avatar: String::new(),
    };
    let profile = record.profile(username);
    store.users.insert(username.to_string(), record);
    store.votes.entry(username.to_string()).or_default();

    Ok(profile)
}

/// Unknown usernames and wrong passwords get the same generic failure so
/// the form can't be used to probe for accounts.
pub fn login(store: &StoreData, username: &str, password: &str) -> Result<UserProfile, AuthError> {
    let record = store
        .users
        .get(username)
        .ok_or(AuthError::InvalidCredentials)?;
    if !verify_password(password, &record.password_hash, &record.salt) {
        return Err(AuthError::InvalidCredentials);
    }
    Ok(record.profile(username))
}

/// Decodes an uploaded avatar data URL. The `data:image/...;base64,`
/// header is stripped when present; anything that does not decode is
/// rejected as a whole.
pub fn decode_avatar_image(data: &str) -> Option<Vec<u8>> {
    let payload = data.split_once(',').map_or(data, |(_, rest)| rest);
    BASE64.decode(payload.trim()).ok()
}

/// Settings update touches display fields only; `username` and `is_admin`
/// stay as created.
pub fn update_profile(
    store: &mut StoreData,
    username: &str,
    nome: Option<&str>,
    cognome: Option<&str>,
    avatar: Option<&str>,
) -> Result<UserProfile, AuthError> {
    let record = store.users.get_mut(username).ok_or(AuthError::UnknownUser)?;
    if let Some(nome) = nome {
        record.nome = nome.to_string();
    }
    if let Some(cognome) = cognome {
        record.cognome = cognome.to_string();
    }
    if let Some(avatar) = avatar {
        record.avatar = avatar.to_string();
    }
    Ok(record.profile(username))
}
