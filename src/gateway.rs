//! In-process implementation of the session gateways, backed directly by
//! the server's store. Mirrors what the HTTP surface does, minus the wire.

use crate::models::{ProjectIndex, RatingMap, School};
use crate::ratings;
use crate::session::data::CatalogGateway;
use crate::session::voting::VoteGateway;
use crate::session::GatewayError;
use crate::state::AppState;
use crate::storage;
use async_trait::async_trait;
use std::collections::BTreeMap;

pub struct LocalGateway {
    state: AppState,
}

impl LocalGateway {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl VoteGateway for LocalGateway {
    async fn submit_vote(
        &self,
        username: &str,
        project_id: &str,
        score: u8,
    ) -> Result<(), GatewayError> {
        let mut store = self.state.store.lock().await;
        if !store.users.contains_key(username) {
            return Err(GatewayError::Rejected("Utente non trovato".into()));
        }
        ratings::apply_vote(&mut store, username, project_id, score);
        storage::persist_votes(&self.state.data_dir, &store)
            .await
            .map_err(|err| GatewayError::Network(err.message.clone()))?;
        storage::persist_ratings(&self.state.data_dir, &store)
            .await
            .map_err(|err| GatewayError::Network(err.message))?;
        Ok(())
    }

    async fn fetch_ratings(&self) -> Result<RatingMap, GatewayError> {
        Ok(self.state.store.lock().await.ratings.clone())
    }
}

#[async_trait]
impl CatalogGateway for LocalGateway {
    async fn fetch_schools(&self) -> Result<Vec<School>, GatewayError> {
        Ok(self.state.store.lock().await.schools.clone())
    }

    async fn fetch_projects(&self) -> Result<ProjectIndex, GatewayError> {
        Ok(self.state.store.lock().await.projects.clone())
    }

    async fn fetch_ratings(&self) -> Result<RatingMap, GatewayError> {
        Ok(self.state.store.lock().await.ratings.clone())
    }

    async fn fetch_votes(
        &self,
        username: &str,
    ) -> Result<Option<BTreeMap<String, u8>>, GatewayError> {
        Ok(self.state.store.lock().await.votes.get(username).cloned())
    }

    async fn init_votes(&self, username: &str) -> Result<(), GatewayError> {
        let mut store = self.state.store.lock().await;
        ratings::ensure_vote_record(&mut store, username);
        storage::persist_votes(&self.state.data_dir, &store)
            .await
            .map_err(|err| GatewayError::Network(err.message))
    }
}
