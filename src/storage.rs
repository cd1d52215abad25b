//! Flat-file persistence for the five catalog documents.
//!
//! Each category lives in its own JSON file under the data directory. A
//! missing or unparseable file degrades to its empty default so one broken
//! category never blocks the rest (the load side of the error taxonomy).

use crate::errors::AppError;
use crate::models::StoreData;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;

pub const CLASSES_FILE: &str = "classes.json";
pub const PROJECTS_FILE: &str = "projects.json";
pub const LIKES_FILE: &str = "likes.json";
pub const VOTES_FILE: &str = "votes.json";
pub const USERS_FILE: &str = "users.json";

pub fn resolve_data_dir() -> PathBuf {
    match env::var("APP_DATA_DIR") {
        Ok(path) => PathBuf::from(path),
        Err(_) => PathBuf::from("server"),
    }
}

pub fn resolve_projects_dir() -> PathBuf {
    match env::var("APP_PROJECTS_DIR") {
        Ok(path) => PathBuf::from(path),
        Err(_) => PathBuf::from("progetti"),
    }
}

pub async fn load_store(dir: &Path) -> StoreData {
    StoreData {
        schools: load_category(&dir.join(CLASSES_FILE)).await,
        projects: load_category(&dir.join(PROJECTS_FILE)).await,
        ratings: load_category(&dir.join(LIKES_FILE)).await,
        votes: load_category(&dir.join(VOTES_FILE)).await,
        users: load_category(&dir.join(USERS_FILE)).await,
    }
}

async fn load_category<T: DeserializeOwned + Default>(path: &Path) -> T {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse {}: {err}", path.display());
                T::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => T::default(),
        Err(err) => {
            error!("failed to read {}: {err}", path.display());
            T::default()
        }
    }
}

pub async fn persist_category<T: Serialize>(
    dir: &Path,
    file: &str,
    data: &T,
) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(dir.join(file), payload)
        .await
        .map_err(AppError::internal)?;
    Ok(())
}

pub async fn persist_votes(dir: &Path, store: &StoreData) -> Result<(), AppError> {
    persist_category(dir, VOTES_FILE, &store.votes).await
}

pub async fn persist_ratings(dir: &Path, store: &StoreData) -> Result<(), AppError> {
    persist_category(dir, LIKES_FILE, &store.ratings).await
}

pub async fn persist_users(dir: &Path, store: &StoreData) -> Result<(), AppError> {
    persist_category(dir, USERS_FILE, &store.users).await
}
