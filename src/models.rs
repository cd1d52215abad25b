use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Nested catalog index: `projects[school_id][class_token] -> [Project]`.
pub type ProjectIndex = BTreeMap<String, BTreeMap<String, Vec<Project>>>;

/// Aggregate ratings: `project_id -> average score` (0.0 when unrated).
pub type RatingMap = BTreeMap<String, f64>;

/// Per-user votes: `username -> project_id -> score (1..=5)`.
pub type VoteMap = BTreeMap<String, BTreeMap<String, u8>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct School {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub classes: Vec<ClassRoom>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassRoom {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

/// A stored account, as kept in `users.json`. The password never leaves
/// this record; clients only ever see a [`UserProfile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub password_hash: String,
    pub salt: String,
    pub created_at: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub cognome: String,
    #[serde(default)]
    pub avatar: String,
}

impl UserRecord {
    pub fn profile(&self, username: &str) -> UserProfile {
        UserProfile {
            username: username.to_string(),
            nome: self.nome.clone(),
            cognome: self.cognome.clone(),
            avatar: self.avatar.clone(),
            is_admin: self.is_admin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub cognome: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreData {
    pub schools: Vec<School>,
    pub projects: ProjectIndex,
    pub ratings: RatingMap,
    pub votes: VoteMap,
    pub users: BTreeMap<String, UserRecord>,
}

#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    pub action: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

impl AuthResponse {
    pub fn ok(user: UserProfile, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            user: Some(user),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            user: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoteRequest {
    pub username: String,
    #[serde(rename = "projectId")]
    pub project_id: String,
    pub vote: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoteResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
}

impl VoteResponse {
    pub fn ok(average: Option<f64>) -> Self {
        Self {
            success: true,
            message: None,
            average,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            average: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: String,
    pub nome: Option<String>,
    pub cognome: Option<String>,
    pub avatar: Option<String>,
}
