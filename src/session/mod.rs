//! The browser-session core: navigation, catalog render models, project
//! viewer and voting coordinator, tied together by [`Session`].
//!
//! Everything in here is headless application state. The pieces talk to
//! the outside world only through the gateway traits, so the whole session
//! can be driven in-process by tests or against the HTTP surface.

pub mod catalog;
pub mod data;
pub mod nav;
pub mod prefs;
pub mod viewer;
pub mod voting;

use crate::models::{Project, UserProfile};
use data::SessionData;
use nav::{Key, NavigationController};
use thiserror::Error;
use viewer::{derive_context, ProjectViewer, ViewerError};
use voting::{PendingVote, VoteError, VoteGateway, VoteSource, VotingCoordinator};

/// Failures from the external collaborators (data store, vote gateway).
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("errore di rete: {0}")]
    Network(String),
    #[error("richiesta rifiutata: {0}")]
    Rejected(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("progetto non trovato: {0}")]
    UnknownProject(String),
    #[error(transparent)]
    Viewer(#[from] ViewerError),
}

/// The rating widgets bound to the currently open project.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingIndicator {
    pub project_id: String,
    pub average: String,
    pub user_vote: u8,
}

pub struct Session {
    pub nav: NavigationController,
    pub viewer: ProjectViewer,
    pub voting: VotingCoordinator,
    data: SessionData,
    user: Option<UserProfile>,
    status: Option<String>,
}

impl Session {
    pub fn new(data: SessionData, user: Option<UserProfile>) -> Self {
        let voting = VotingCoordinator::new(
            user.as_ref().map(|u| u.username.clone()),
            data.votes.clone(),
            data.ratings.clone(),
        );
        Self {
            nav: NavigationController::new(),
            viewer: ProjectViewer::new(),
            voting,
            data,
            user,
            status: None,
        }
    }

    pub fn data(&self) -> &SessionData {
        &self.data
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// Transient user-facing message from the last settled vote, if any.
    pub fn take_status(&mut self) -> Option<String> {
        self.status.take()
    }

    pub fn find_project(&self, project_id: &str) -> Option<&Project> {
        self.data
            .projects
            .values()
            .flat_map(|classes| classes.values())
            .flatten()
            .find(|p| p.id == project_id)
    }

    pub fn open_school(&mut self, school_id: &str) -> bool {
        match self.data.schools.iter().find(|s| s.id == school_id) {
            Some(school) => {
                self.nav.enter_school(school);
                true
            }
            None => false,
        }
    }

    pub fn open_class(&mut self, class_id: &str) -> bool {
        let class = self
            .data
            .schools
            .iter()
            .flat_map(|s| s.classes.iter())
            .find(|c| c.id == class_id);
        match class {
            Some(class) => {
                self.nav.enter_class(class);
                true
            }
            None => false,
        }
    }

    pub fn open_project(&mut self, project_id: &str) -> Result<(), SessionError> {
        let project = self
            .find_project(project_id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownProject(project_id.to_string()))?;
        self.viewer
            .open(&project, &self.data.schools, self.user.is_some())?;
        Ok(())
    }

    pub fn close_project(&mut self) {
        self.viewer.close();
    }

    /// Escape closes an open viewer; arrows page when no modal is open.
    pub fn handle_key(&mut self, key: Key) {
        if self.viewer.is_open() {
            if key == Key::Escape {
                self.close_project();
            }
            return;
        }
        self.nav.handle_key(key, false);
    }

    pub fn rating_indicator(&self) -> Option<RatingIndicator> {
        self.viewer
            .rating_controls_for()
            .map(|project_id| RatingIndicator {
                project_id: project_id.to_string(),
                average: self.voting.rating_display(project_id),
                user_vote: self.voting.user_vote(project_id),
            })
    }

    /// Context checks plus the coordinator's synchronous optimistic
    /// update. The gateway must never be called when this fails.
    pub fn begin_vote(&mut self, score: u8) -> Result<PendingVote, VoteError> {
        let Some(project_id) = self.viewer.current_id().map(str::to_string) else {
            return Err(VoteError::MissingContext);
        };
        let context = self
            .viewer
            .context()
            .cloned()
            .or_else(|| derive_context(&project_id, &self.data.schools));
        if context.is_none() {
            return Err(VoteError::MissingContext);
        }
        self.voting.begin_vote(&project_id, score)
    }

    /// Settles a pending vote. The vote map and aggregate cache are
    /// session-wide and always updated; the transient status line is only
    /// touched while the voted project is still the open one, so a
    /// response landing after the viewer closed mutates no stale UI.
    pub fn complete_vote(
        &mut self,
        pending: PendingVote,
        outcome: Result<crate::models::RatingMap, GatewayError>,
    ) -> Result<(), VoteError> {
        let project_id = pending.project_id().to_string();
        let result = self.voting.complete_vote(pending, outcome);

        if self.viewer.current_id() == Some(project_id.as_str()) {
            self.status = Some(match &result {
                Ok(_) => "Voto registrato con successo!".to_string(),
                Err(err) => err.to_string(),
            });
        }
        result.map(|_| ())
    }

    /// The single submission path shared by every vote binding.
    pub async fn submit_vote(
        &mut self,
        score: u8,
        source: VoteSource,
        gateway: &dyn VoteGateway,
    ) -> Result<(), VoteError> {
        let pending = self.begin_vote(score)?;
        tracing::info!("invio voto da {source:?}: {} = {score}", pending.project_id());

        let username = self.voting.username().unwrap_or_default().to_string();
        let outcome = match gateway
            .submit_vote(&username, pending.project_id(), score)
            .await
        {
            Ok(()) => gateway.fetch_ratings().await,
            Err(err) => Err(err),
        };
        self.complete_vote(pending, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassRoom, ProjectIndex, RatingMap, School};
    use std::collections::BTreeMap;

    fn fixture() -> SessionData {
        let mut classes = BTreeMap::new();
        classes.insert(
            "classe3C".to_string(),
            vec![Project {
                id: "tenca_classe3C_storia".into(),
                name: "Storia".into(),
                description: String::new(),
                file: None,
                path: None,
                cover_image: None,
            }],
        );
        let mut projects = ProjectIndex::new();
        projects.insert("tenca".to_string(), classes);

        SessionData {
            schools: vec![School {
                id: "tenca".into(),
                name: "Liceo Tenca".into(),
                classes: vec![ClassRoom {
                    id: "tenca_classe3C".into(),
                    name: "Classe 3C".into(),
                    description: String::new(),
                }],
            }],
            projects,
            ratings: RatingMap::from([("tenca_classe3C_storia".to_string(), 4.0)]),
            votes: BTreeMap::new(),
        }
    }

    fn user() -> UserProfile {
        UserProfile {
            username: "anna".into(),
            nome: String::new(),
            cognome: String::new(),
            avatar: String::new(),
            is_admin: false,
        }
    }

    #[test]
    fn open_project_scopes_the_indicator() {
        let mut session = Session::new(fixture(), Some(user()));
        session.open_project("tenca_classe3C_storia").unwrap();
        let indicator = session.rating_indicator().unwrap();
        assert_eq!(indicator.project_id, "tenca_classe3C_storia");
        assert_eq!(indicator.average, "4.0");
        assert_eq!(indicator.user_vote, 0);
    }

    #[test]
    fn unknown_project_is_reported() {
        let mut session = Session::new(fixture(), Some(user()));
        assert_eq!(
            session.open_project("tenca_classe3C_niente").unwrap_err(),
            SessionError::UnknownProject("tenca_classe3C_niente".into())
        );
        assert!(!session.viewer.is_open());
    }

    #[test]
    fn vote_without_open_project_never_reaches_the_gateway() {
        let mut session = Session::new(fixture(), Some(user()));
        assert_eq!(session.begin_vote(5).unwrap_err(), VoteError::MissingContext);
    }

    #[test]
    fn escape_closes_viewer_instead_of_navigating() {
        let mut session = Session::new(fixture(), Some(user()));
        session.nav.go_to_page(1);
        session.open_project("tenca_classe3C_storia").unwrap();

        session.handle_key(Key::Left);
        assert_eq!(session.nav.current_index(), 1);
        assert!(session.viewer.is_open());

        session.handle_key(Key::Escape);
        assert!(!session.viewer.is_open());

        session.handle_key(Key::Left);
        assert_eq!(session.nav.current_index(), 0);
    }

    #[test]
    fn late_response_after_close_touches_no_visible_state() {
        let mut session = Session::new(fixture(), Some(user()));
        session.open_project("tenca_classe3C_storia").unwrap();

        let pending = session.begin_vote(5).unwrap();
        session.close_project();

        session
            .complete_vote(
                pending,
                Ok(RatingMap::from([("tenca_classe3C_storia".to_string(), 4.5)])),
            )
            .unwrap();

        // The caches advanced, but nothing visible was refreshed.
        assert_eq!(session.voting.user_vote("tenca_classe3C_storia"), 5);
        assert_eq!(session.rating_indicator(), None);
        assert_eq!(session.take_status(), None);
    }

    #[test]
    fn settled_vote_updates_the_status_line() {
        let mut session = Session::new(fixture(), Some(user()));
        session.open_project("tenca_classe3C_storia").unwrap();

        let pending = session.begin_vote(3).unwrap();
        session
            .complete_vote(
                pending,
                Ok(RatingMap::from([("tenca_classe3C_storia".to_string(), 3.0)])),
            )
            .unwrap();

        assert_eq!(
            session.take_status().as_deref(),
            Some("Voto registrato con successo!")
        );
        assert_eq!(session.rating_indicator().unwrap().user_vote, 3);
        assert_eq!(session.rating_indicator().unwrap().average, "3.0");
    }

    #[test]
    fn failed_vote_surfaces_transient_error_and_rolls_back() {
        let mut session = Session::new(fixture(), Some(user()));
        session.open_project("tenca_classe3C_storia").unwrap();

        let pending = session.begin_vote(2).unwrap();
        let err = session
            .complete_vote(pending, Err(GatewayError::Network("giù".into())))
            .unwrap_err();
        assert!(matches!(err, VoteError::Gateway(_)));
        assert_eq!(session.voting.user_vote("tenca_classe3C_storia"), 0);
        assert!(session.take_status().is_some());
        // The aggregate was not locally averaged.
        assert_eq!(session.rating_indicator().unwrap().average, "4.0");
    }

    #[test]
    fn school_and_class_selection_drive_navigation() {
        let mut session = Session::new(fixture(), None);
        assert!(session.open_school("tenca"));
        assert_eq!(session.nav.current_index(), 2);
        assert!(session.open_class("tenca_classe3C"));
        assert_eq!(session.nav.current_index(), 3);
        assert!(!session.open_school("sconosciuta"));
    }
}
