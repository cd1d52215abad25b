use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/server/classes.json", get(handlers::get_classes))
        .route("/server/projects.json", get(handlers::get_projects))
        .route("/server/likes.json", get(handlers::get_likes))
        .route("/server/votes.json", get(handlers::get_votes))
        .route("/api/vote", post(handlers::vote))
        .route("/server/auth", post(handlers::auth))
        .route("/server/update_user", post(handlers::update_user))
        .route("/progetti/*path", get(handlers::project_asset))
        .route("/avatars/:file", get(handlers::avatar_asset))
        .with_state(state)
}
