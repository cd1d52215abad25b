use crate::models::StoreData;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// Shared server state. Every read-modify-write of the JSON documents goes
/// through the single mutex, which is what keeps concurrent vote and
/// registration requests from clobbering each other's file writes.
#[derive(Clone)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub projects_dir: PathBuf,
    pub store: Arc<Mutex<StoreData>>,
}

impl AppState {
    pub fn new(data_dir: PathBuf, projects_dir: PathBuf, store: StoreData) -> Self {
        Self {
            data_dir,
            projects_dir,
            store: Arc::new(Mutex::new(store)),
        }
    }
}
