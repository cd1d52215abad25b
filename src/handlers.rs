use crate::auth;
use crate::errors::AppError;
use crate::models::{
    AuthRequest, AuthResponse, ProjectIndex, RatingMap, UpdateUserRequest, VoteMap, VoteRequest,
    VoteResponse,
};
use crate::ratings;
use crate::session::catalog;
use crate::state::AppState;
use crate::storage;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    http::header,
    response::Html,
    Json,
};
use chrono::Local;
use std::path::{Component, PathBuf};
use tokio::fs;
use tracing::{info, warn};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let store = state.store.lock().await;
    let schools = catalog::school_cards(&store.schools);
    let featured = catalog::featured_cards(catalog::FEATURED, &store.projects);
    Html(render_index(&schools, &featured))
}

pub async fn get_classes(State(state): State<AppState>) -> Json<Vec<crate::models::School>> {
    Json(state.store.lock().await.schools.clone())
}

pub async fn get_projects(State(state): State<AppState>) -> Json<ProjectIndex> {
    Json(state.store.lock().await.projects.clone())
}

pub async fn get_likes(State(state): State<AppState>) -> Json<RatingMap> {
    Json(state.store.lock().await.ratings.clone())
}

pub async fn get_votes(State(state): State<AppState>) -> Json<VoteMap> {
    Json(state.store.lock().await.votes.clone())
}

/// `vote = 0` is the documented sentinel that only makes sure the user's
/// vote record exists; real scores overwrite the previous vote and come
/// back with the freshly recomputed average.
pub async fn vote(
    State(state): State<AppState>,
    Json(payload): Json<VoteRequest>,
) -> Result<Json<VoteResponse>, AppError> {
    let mut store = state.store.lock().await;

    if !store.users.contains_key(&payload.username) {
        return Ok(Json(VoteResponse::failure("Utente non trovato")));
    }

    match payload.vote {
        0 => {
            ratings::ensure_vote_record(&mut store, &payload.username);
            storage::persist_votes(&state.data_dir, &store).await?;
            Ok(Json(VoteResponse::ok(None)))
        }
        score @ 1..=5 => {
            let average =
                ratings::apply_vote(&mut store, &payload.username, &payload.project_id, score as u8);
            storage::persist_votes(&state.data_dir, &store).await?;
            storage::persist_ratings(&state.data_dir, &store).await?;
            info!(
                "voto di {} per {}: {score} (media {average})",
                payload.username, payload.project_id
            );
            Ok(Json(VoteResponse::ok(Some(average))))
        }
        _ => Ok(Json(VoteResponse::failure(
            "Il voto deve essere compreso tra 1 e 5",
        ))),
    }
}

pub async fn auth(
    State(state): State<AppState>,
    Json(payload): Json<AuthRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    match payload.action.as_str() {
        "register" => {
            let mut store = state.store.lock().await;
            match auth::register(&mut store, &payload.username, &payload.password) {
                Ok(user) => {
                    storage::persist_users(&state.data_dir, &store).await?;
                    storage::persist_votes(&state.data_dir, &store).await?;
                    info!("nuovo utente registrato: {}", payload.username);
                    Ok(Json(AuthResponse::ok(user, "Registrazione completata")))
                }
                Err(err) => Ok(Json(AuthResponse::failure(err.to_string()))),
            }
        }
        "login" => {
            let store = state.store.lock().await;
            match auth::login(&store, &payload.username, &payload.password) {
                Ok(user) => Ok(Json(AuthResponse::ok(user, "Login effettuato con successo"))),
                Err(err) => Ok(Json(AuthResponse::failure(err.to_string()))),
            }
        }
        _ => Err(AppError::bad_request("Azione non valida")),
    }
}

/// A base64 `data:image` avatar upload is written to disk and replaced by
/// its served path before the record is touched; a failed save keeps the
/// previous avatar instead of failing the whole update. URLs and plain
/// paths are stored as given.
pub async fn update_user(
    State(state): State<AppState>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let avatar = match payload.avatar.as_deref() {
        Some(data) if data.starts_with("data:image") => {
            match save_avatar(&state, &payload.username, data).await {
                Ok(path) => Some(path),
                Err(err) => {
                    warn!("salvataggio avatar fallito per {}: {}", payload.username, err.message);
                    None
                }
            }
        }
        other => other.map(str::to_string),
    };

    let mut store = state.store.lock().await;
    match auth::update_profile(
        &mut store,
        &payload.username,
        payload.nome.as_deref(),
        payload.cognome.as_deref(),
        avatar.as_deref(),
    ) {
        Ok(user) => {
            storage::persist_users(&state.data_dir, &store).await?;
            Ok(Json(AuthResponse::ok(
                user,
                "Impostazioni aggiornate con successo",
            )))
        }
        Err(err) => Ok(Json(AuthResponse::failure(err.to_string()))),
    }
}

const AVATARS_DIR: &str = "avatars";

async fn save_avatar(state: &AppState, username: &str, data: &str) -> Result<String, AppError> {
    let Some(bytes) = auth::decode_avatar_image(data) else {
        return Err(AppError::bad_request("Immagine avatar non valida"));
    };

    let dir = state.data_dir.join(AVATARS_DIR);
    fs::create_dir_all(&dir).await?;
    let filename = format!("{username}_{}.jpg", Local::now().format("%Y%m%d%H%M%S"));
    fs::write(dir.join(&filename), bytes).await?;

    info!("avatar salvato per {username}: {filename}");
    Ok(format!("/{AVATARS_DIR}/{filename}"))
}

/// Serves a saved avatar image. Only bare file names are accepted.
pub async fn avatar_asset(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<([(header::HeaderName, String); 1], Vec<u8>), AppError> {
    let relative = PathBuf::from(&file);
    let mut components = relative.components();
    if !matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) {
        return Err(AppError::not_found("Percorso non valido"));
    }

    let full = state.data_dir.join(AVATARS_DIR).join(&relative);
    let bytes = match fs::read(&full).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::not_found(format!("File non trovato: {file}")))
        }
        Err(err) => return Err(AppError::internal(err)),
    };

    let content_type = content_type_for(&relative).to_string();
    Ok(([(header::CONTENT_TYPE, content_type)], bytes))
}

/// Serves an embedded project document. The requested path must stay
/// inside the projects directory; anything that walks upward is refused
/// before touching the filesystem.
pub async fn project_asset(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<([(header::HeaderName, String); 1], Vec<u8>), AppError> {
    let relative = PathBuf::from(path.trim_start_matches('/'));
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        return Err(AppError::not_found("Percorso non valido"));
    }

    let full = state.projects_dir.join(&relative);
    let bytes = match fs::read(&full).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::not_found(format!(
                "File non trovato: {}",
                relative.display()
            )))
        }
        Err(err) => return Err(AppError::internal(err)),
    };

    let content_type = content_type_for(&relative).to_string();
    Ok(([(header::CONTENT_TYPE, content_type)], bytes))
}

fn content_type_for(path: &std::path::Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("html") => "text/html; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traversal_components_are_refused() {
        let bad = PathBuf::from("../users.json");
        assert!(!bad.components().all(|c| matches!(c, Component::Normal(_))));
        let good = PathBuf::from("tenca_classe3C_storia/index.html");
        assert!(good.components().all(|c| matches!(c, Component::Normal(_))));
    }

    #[test]
    fn content_types_by_extension() {
        assert_eq!(
            content_type_for(std::path::Path::new("a/index.html")),
            "text/html; charset=utf-8"
        );
        assert_eq!(content_type_for(std::path::Path::new("c.PNG")), "image/png");
        assert_eq!(
            content_type_for(std::path::Path::new("senza_estensione")),
            "application/octet-stream"
        );
    }
}
