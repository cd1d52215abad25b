//! Project viewer lifecycle: `Closed -> Open -> Closed`.
//!
//! Opening resolves where the embedded document lives and recovers the
//! owning class from the project id when navigation state is missing
//! (featured cards open projects without ever visiting the class page).

use crate::models::{Project, School};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq)]
pub enum ViewerError {
    #[error("impossibile determinare il percorso del progetto")]
    NoDisplayPath,
}

/// Class lineage recovered from a project id. `class_name` may be a
/// synthesized label when the catalog no longer knows the class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassContext {
    pub school_id: String,
    pub class_id: String,
    pub class_name: String,
}

#[derive(Debug)]
struct OpenProject {
    project: Project,
    display_path: String,
    context: Option<ClassContext>,
    vote_affordance: bool,
}

#[derive(Debug, Default)]
pub struct ProjectViewer {
    open: Option<OpenProject>,
    scroll_suspended: bool,
}

/// Best-effort class recovery: split the id into school and class tokens,
/// prefer the catalog entry, otherwise synthesize a minimal context. Only
/// an id without both tokens is unrecoverable.
pub fn derive_context(project_id: &str, schools: &[School]) -> Option<ClassContext> {
    let mut tokens = project_id.splitn(3, '_');
    let school_token = tokens.next().filter(|t| !t.is_empty())?;
    let class_token = tokens.next().filter(|t| !t.is_empty())?;

    if let Some(school) = schools.iter().find(|s| s.id == school_token) {
        if let Some(class) = school.classes.iter().find(|c| c.id.contains(class_token)) {
            return Some(ClassContext {
                school_id: school.id.clone(),
                class_id: class.id.clone(),
                class_name: class.name.clone(),
            });
        }
    }

    debug!("classe non in catalogo per {project_id}, contesto sintetizzato");
    Some(ClassContext {
        school_id: school_token.to_string(),
        class_id: format!("{school_token}_{class_token}"),
        class_name: format!("Classe {}", class_token.trim_start_matches("classe")),
    })
}

/// Display path priority: explicit `file`, explicit `path`, else the
/// conventional location derived from the id.
pub fn resolve_display_path(project: &Project) -> Option<String> {
    let lead = |p: &str| {
        if p.starts_with('/') {
            p.to_string()
        } else {
            format!("/{p}")
        }
    };

    if let Some(file) = project.file.as_deref().filter(|f| !f.is_empty()) {
        return Some(lead(file));
    }
    if let Some(path) = project.path.as_deref().filter(|p| !p.is_empty()) {
        return Some(lead(path));
    }
    if !project.id.is_empty() {
        return Some(format!("/progetti/{}/index.html", project.id));
    }
    None
}

impl ProjectViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn current_id(&self) -> Option<&str> {
        self.open.as_ref().map(|o| o.project.id.as_str())
    }

    pub fn current_project(&self) -> Option<&Project> {
        self.open.as_ref().map(|o| &o.project)
    }

    pub fn context(&self) -> Option<&ClassContext> {
        self.open.as_ref().and_then(|o| o.context.as_ref())
    }

    pub fn display_path(&self) -> Option<&str> {
        self.open.as_ref().map(|o| o.display_path.as_str())
    }

    pub fn scroll_suspended(&self) -> bool {
        self.scroll_suspended
    }

    /// Rating controls are scoped to the open project.
    pub fn rating_controls_for(&self) -> Option<&str> {
        self.current_id()
    }

    /// The floating vote affordance only shows for authenticated users.
    pub fn vote_affordance_visible(&self) -> bool {
        self.open.as_ref().is_some_and(|o| o.vote_affordance)
    }

    /// Opens `project`. Fails (and stays closed) only when no display path
    /// can be resolved; a missing class context is tolerated.
    pub fn open(
        &mut self,
        project: &Project,
        schools: &[School],
        authenticated: bool,
    ) -> Result<(), ViewerError> {
        let Some(display_path) = resolve_display_path(project) else {
            self.close();
            return Err(ViewerError::NoDisplayPath);
        };

        let context = derive_context(&project.id, schools);
        self.open = Some(OpenProject {
            project: project.clone(),
            display_path,
            context,
            vote_affordance: authenticated,
        });
        self.scroll_suspended = true;
        Ok(())
    }

    /// Always lands in `Closed`, whatever the prior state. Safe to call
    /// when already closed.
    pub fn close(&mut self) {
        self.open = None;
        self.scroll_suspended = false;
    }
}
