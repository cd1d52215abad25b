//! The load step: fetch the catalog categories up front, each degrading
//! independently, and hand dependent renderers a single ready signal (the
//! returned future) instead of having them poll shared state.

use crate::models::{ProjectIndex, RatingMap, School};
use crate::session::GatewayError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::warn;

#[async_trait]
pub trait CatalogGateway: Send + Sync {
    async fn fetch_schools(&self) -> Result<Vec<School>, GatewayError>;
    async fn fetch_projects(&self) -> Result<ProjectIndex, GatewayError>;
    async fn fetch_ratings(&self) -> Result<RatingMap, GatewayError>;
    /// `None` when the user has no vote record yet.
    async fn fetch_votes(&self, username: &str)
        -> Result<Option<BTreeMap<String, u8>>, GatewayError>;
    /// The `vote = 0` sentinel: creates the user's empty vote record.
    async fn init_votes(&self, username: &str) -> Result<(), GatewayError>;
}

#[derive(Debug, Default)]
pub struct SessionData {
    pub schools: Vec<School>,
    pub projects: ProjectIndex,
    pub ratings: RatingMap,
    pub votes: BTreeMap<String, u8>,
}

impl SessionData {
    /// Loads every category; a failed category falls back to its empty
    /// default with a warning so the rest of the UI still populates.
    /// Per-user votes are only fetched for an authenticated user, and a
    /// missing record is initialized server-side on first login.
    pub async fn load(gateway: &dyn CatalogGateway, username: Option<&str>) -> Self {
        let schools = gateway.fetch_schools().await.unwrap_or_else(|err| {
            warn!("caricamento scuole fallito: {err}");
            Vec::new()
        });
        let projects = gateway.fetch_projects().await.unwrap_or_else(|err| {
            warn!("caricamento progetti fallito: {err}");
            ProjectIndex::new()
        });
        let ratings = gateway.fetch_ratings().await.unwrap_or_else(|err| {
            warn!("caricamento valutazioni fallito: {err}");
            RatingMap::new()
        });

        let votes = match username {
            Some(username) => match gateway.fetch_votes(username).await {
                Ok(Some(votes)) => votes,
                Ok(None) => {
                    if let Err(err) = gateway.init_votes(username).await {
                        warn!("inizializzazione voti fallita per {username}: {err}");
                    }
                    BTreeMap::new()
                }
                Err(err) => {
                    warn!("caricamento voti fallito per {username}: {err}");
                    BTreeMap::new()
                }
            },
            None => BTreeMap::new(),
        };

        Self {
            schools,
            projects,
            ratings,
            votes,
        }
    }
}
