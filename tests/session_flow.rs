//! End-to-end session exercises: the headless session core driven against
//! the in-process gateway, with persistence checked on disk.

use biblioteca::models::{ClassRoom, Project, ProjectIndex, School, StoreData};
use biblioteca::session::data::SessionData;
use biblioteca::session::nav::Key;
use biblioteca::session::voting::{VoteError, VoteSource};
use biblioteca::session::Session;
use biblioteca::{auth, AppState, LocalGateway};
use std::collections::BTreeMap;
use std::path::PathBuf;

fn unique_data_dir(label: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "biblioteca_session_{label}_{}_{}",
        std::process::id(),
        nanos
    ));
    std::fs::create_dir_all(&path).unwrap();
    path
}

fn seeded_store() -> StoreData {
    let mut classes = BTreeMap::new();
    classes.insert(
        "classe3C".to_string(),
        vec![Project {
            id: "tenca_classe3C_storia".into(),
            name: "Storia".into(),
            description: "Una storia interattiva".into(),
            file: None,
            path: None,
            cover_image: None,
        }],
    );
    let mut projects = ProjectIndex::new();
    projects.insert("tenca".to_string(), classes);

    StoreData {
        schools: vec![School {
            id: "tenca".into(),
            name: "Liceo Statale \"Carlo Tenca\"".into(),
            classes: vec![ClassRoom {
                id: "tenca_classe3C".into(),
                name: "Classe 3C".into(),
                description: String::new(),
            }],
        }],
        projects,
        ..StoreData::default()
    }
}

#[tokio::test]
async fn full_visit_with_vote() {
    let data_dir = unique_data_dir("vote");
    let mut store = seeded_store();
    let profile = auth::register(&mut store, "anna", "segreta").unwrap();

    let state = AppState::new(data_dir.clone(), PathBuf::from("progetti"), store);
    let gateway = LocalGateway::new(state.clone());

    let data = SessionData::load(&gateway, Some("anna")).await;
    assert_eq!(data.schools.len(), 1);

    let mut session = Session::new(data, Some(profile));
    assert!(session.open_school("tenca"));
    assert!(session.open_class("tenca_classe3C"));
    assert_eq!(
        session.nav.breadcrumb().last().map(|c| c.label.clone()),
        Some("Classe 3C".to_string())
    );

    session.open_project("tenca_classe3C_storia").unwrap();
    assert_eq!(
        session.viewer.display_path(),
        Some("/progetti/tenca_classe3C_storia/index.html")
    );
    assert!(session.viewer.vote_affordance_visible());

    session
        .submit_vote(5, VoteSource::StarPopup, &gateway)
        .await
        .unwrap();
    assert_eq!(session.voting.user_vote("tenca_classe3C_storia"), 5);
    assert_eq!(session.rating_indicator().unwrap().average, "5.0");
    assert_eq!(
        session.take_status().as_deref(),
        Some("Voto registrato con successo!")
    );

    // Both documents were written by the gateway.
    let votes: serde_json::Value =
        serde_json::from_slice(&std::fs::read(data_dir.join("votes.json")).unwrap()).unwrap();
    assert_eq!(votes["anna"]["tenca_classe3C_storia"], 5);
    let likes: serde_json::Value =
        serde_json::from_slice(&std::fs::read(data_dir.join("likes.json")).unwrap()).unwrap();
    assert_eq!(likes["tenca_classe3C_storia"], 5.0);

    // Escape closes the viewer, then arrows page again.
    session.handle_key(Key::Escape);
    assert!(!session.viewer.is_open());
    session.handle_key(Key::Left);
    assert_eq!(session.nav.current_index(), 2);
    assert_eq!(session.nav.page_count(), 3);
}

#[tokio::test]
async fn anonymous_visitor_can_browse_but_not_vote() {
    let data_dir = unique_data_dir("anon");
    let state = AppState::new(data_dir, PathBuf::from("progetti"), seeded_store());
    let gateway = LocalGateway::new(state);

    let data = SessionData::load(&gateway, None).await;
    let mut session = Session::new(data, None);

    session.open_project("tenca_classe3C_storia").unwrap();
    assert!(session.viewer.is_open());
    assert!(!session.viewer.vote_affordance_visible());
    assert_eq!(
        session.begin_vote(4).unwrap_err(),
        VoteError::NotAuthenticated
    );
}

#[tokio::test]
async fn first_login_initializes_the_vote_record() {
    let data_dir = unique_data_dir("init");
    let mut store = seeded_store();
    auth::register(&mut store, "bruno", "pw").unwrap();
    // Simulate an account predating the vote map.
    store.votes.clear();

    let state = AppState::new(data_dir.clone(), PathBuf::from("progetti"), store);
    let gateway = LocalGateway::new(state.clone());

    let data = SessionData::load(&gateway, Some("bruno")).await;
    assert!(data.votes.is_empty());

    let store = state.store.lock().await;
    assert!(store.votes.get("bruno").is_some_and(|v| v.is_empty()));
    let votes: serde_json::Value =
        serde_json::from_slice(&std::fs::read(data_dir.join("votes.json")).unwrap()).unwrap();
    assert!(votes["bruno"].as_object().unwrap().is_empty());
}
