//! The voting coordinator: single source of truth for the current user's
//! votes and the cached aggregate ratings.
//!
//! Every vote UI (inline heart, star popup, floating button) is a thin
//! binding over [`Session::submit_vote`](crate::session::Session::submit_vote);
//! none of them talk to the gateway or keep their own optimistic state.

use crate::models::RatingMap;
use crate::session::GatewayError;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error, PartialEq)]
pub enum VoteError {
    #[error("il voto deve essere compreso tra 1 e 5")]
    ScoreOutOfRange(u8),
    #[error("nessun utente autenticato")]
    NotAuthenticated,
    #[error("contesto del progetto mancante")]
    MissingContext,
    #[error("invio già in corso per questo progetto")]
    SubmissionInFlight,
    #[error("invio del voto non riuscito: {0}")]
    Gateway(String),
}

/// Which binding the vote came from; purely informational.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VoteSource {
    InlineHeart,
    StarPopup,
    FloatingButton,
}

#[async_trait]
pub trait VoteGateway: Send + Sync {
    async fn submit_vote(&self, username: &str, project_id: &str, score: u8)
        -> Result<(), GatewayError>;
    async fn fetch_ratings(&self) -> Result<RatingMap, GatewayError>;
}

/// An optimistic update waiting on the gateway. Holds what is needed to
/// roll the vote map back if the submission fails.
#[derive(Debug)]
pub struct PendingVote {
    project_id: String,
    score: u8,
    previous: Option<u8>,
}

impl PendingVote {
    pub fn project_id(&self) -> &str {
        &self.project_id
    }
}

#[derive(Debug, Default)]
pub struct VotingCoordinator {
    username: Option<String>,
    votes: BTreeMap<String, u8>,
    ratings: RatingMap,
    in_flight: BTreeSet<String>,
}

impl VotingCoordinator {
    pub fn new(username: Option<String>, votes: BTreeMap<String, u8>, ratings: RatingMap) -> Self {
        Self {
            username,
            votes,
            ratings,
            in_flight: BTreeSet::new(),
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// 0 means no vote recorded for the current user.
    pub fn user_vote(&self, project_id: &str) -> u8 {
        self.votes.get(project_id).copied().unwrap_or(0)
    }

    pub fn rating(&self, project_id: &str) -> f64 {
        self.ratings.get(project_id).copied().unwrap_or(0.0)
    }

    /// The string shown next to rating indicators.
    pub fn rating_display(&self, project_id: &str) -> String {
        let rating = self.rating(project_id);
        if rating > 0.0 {
            format!("{rating:.1}")
        } else {
            "0".to_string()
        }
    }

    /// Validates and applies the optimistic update synchronously; the
    /// caller issues the gateway call and settles with
    /// [`complete_vote`](Self::complete_vote). Re-entrant submissions for
    /// the same project are refused while one is in flight.
    pub fn begin_vote(&mut self, project_id: &str, score: u8) -> Result<PendingVote, VoteError> {
        if !(1..=5).contains(&score) {
            return Err(VoteError::ScoreOutOfRange(score));
        }
        if self.username.is_none() {
            return Err(VoteError::NotAuthenticated);
        }
        if !self.in_flight.insert(project_id.to_string()) {
            return Err(VoteError::SubmissionInFlight);
        }

        let previous = self.votes.insert(project_id.to_string(), score);
        Ok(PendingVote {
            project_id: project_id.to_string(),
            score,
            previous,
        })
    }

    /// Settles a pending vote. On success the aggregate cache is replaced
    /// with the authoritative ratings the caller re-fetched; on failure
    /// the optimistic vote is rolled back and the aggregate untouched.
    pub fn complete_vote(
        &mut self,
        pending: PendingVote,
        outcome: Result<RatingMap, GatewayError>,
    ) -> Result<f64, VoteError> {
        self.in_flight.remove(&pending.project_id);
        match outcome {
            Ok(ratings) => {
                self.ratings = ratings;
                info!(
                    "voto registrato: {} = {}",
                    pending.project_id, pending.score
                );
                Ok(self.rating(&pending.project_id))
            }
            Err(err) => {
                match pending.previous {
                    Some(previous) => {
                        self.votes.insert(pending.project_id.clone(), previous);
                    }
                    None => {
                        self.votes.remove(&pending.project_id);
                    }
                }
                warn!("voto annullato per {}: {err}", pending.project_id);
                Err(VoteError::Gateway(err.to_string()))
            }
        }
    }

    /// Full submission: optimistic update, gateway call, authoritative
    /// aggregate re-fetch (never a local average). Returns the refreshed
    /// average for the project. Crate-private so bindings go through
    /// [`Session::submit_vote`](crate::session::Session::submit_vote),
    /// which resolves the project context first.
    pub(crate) async fn submit_vote(
        &mut self,
        project_id: &str,
        score: u8,
        source: VoteSource,
        gateway: &dyn VoteGateway,
    ) -> Result<f64, VoteError> {
        let pending = self.begin_vote(project_id, score)?;
        info!("invio voto da {source:?}: {project_id} = {score}");

        let username = self.username.clone().unwrap_or_default();
        let outcome = match gateway.submit_vote(&username, project_id, score).await {
            Ok(()) => gateway.fetch_ratings().await,
            Err(err) => Err(err),
        };
        self.complete_vote(pending, outcome)
    }
}
