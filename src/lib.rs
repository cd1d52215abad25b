pub mod app;
pub mod auth;
pub mod errors;
pub mod gateway;
pub mod handlers;
pub mod models;
pub mod ratings;
pub mod session;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use gateway::LocalGateway;
pub use state::AppState;
pub use storage::{load_store, resolve_data_dir, resolve_projects_dir};
