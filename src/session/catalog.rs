//! Render models for the catalog views: school index cards, the curated
//! featured list, and per-class project grids. Everything here is a pure
//! function of the loaded data, so card icons and colors are deterministic
//! per project across renders.

use crate::models::{ClassRoom, ProjectIndex, School};
use tracing::warn;

/// Hand-maintained ranking shown on the index page, independent of the
/// catalog. Entries that no longer resolve are skipped at render time.
pub const FEATURED: &[(&str, &str)] = &[
    ("lagrange_classe3C_storia", "3C - LAGRANGE"),
    (
        "tenca_classe4A_INTRIGHI_NELLA_MILANO_DELLA_CONTRORIFORMA",
        "4A - TENCA",
    ),
    ("tenca_classe4E_Tutto___compiuto", "4E - TENCA"),
    ("tenca_classe4E_ArchCity", "4E - TENCA"),
    ("tenca_classe3F_l_ultima_sinfonia", "3F - TENCA"),
    ("tenca_classe3E_La_città_senza_prezzo", "3E - TENCA"),
    ("tenca_classe3B_3B-Team_4", "3B - TENCA"),
    ("lagrange_classe3D_Manfagiolo", "3D - LAGRANGE"),
    ("tenca_classe3A_RITORNO_A_CASA_2096", "3A - TENCA"),
    ("lagrange_classe3D_Milano_gratis", "3D - LAGRANGE"),
];

const RANK_ICONS: &[&str] = &[
    "fa-trophy",
    "fa-medal",
    "fa-award",
    "fa-star",
    "fa-crown",
    "fa-certificate",
    "fa-gem",
    "fa-bookmark",
    "fa-heart",
    "fa-thumbs-up",
];

const CARD_COLORS: &[&str] = &[
    "#FF5733", "#33FF57", "#3357FF", "#F033FF", "#FF33A8", "#33FFF5", "#FFBD33",
];

const DEFAULT_ICON: &str = "fa-book-open";
const DEFAULT_COLOR: &str = "#4CAF50";

#[derive(Debug, Clone, PartialEq)]
pub struct SchoolCard {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub accent: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeaturedCard {
    pub rank: usize,
    pub project_id: String,
    pub title: String,
    pub class_label: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectCard {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub color: String,
}

/// Known schools get their display identity from a static lookup; anything
/// else falls back to a generic icon with the catalog name.
pub fn school_cards(schools: &[School]) -> Vec<SchoolCard> {
    schools
        .iter()
        .map(|school| {
            let (icon, title, accent) = match school.id.as_str() {
                "tenca" => ("fa-book", "Liceo Statale \"Carlo Tenca\"", "#FF8C00"),
                "lagrange" => ("fa-laptop-code", "IIS \"Giuseppe Luigi Lagrange\"", "#9ACD32"),
                _ => ("fa-school", school.name.as_str(), DEFAULT_COLOR),
            };
            SchoolCard {
                id: school.id.clone(),
                title: title.to_string(),
                icon: icon.to_string(),
                accent: accent.to_string(),
            }
        })
        .collect()
}

/// Resolves the curated list against the nested catalog. Misses are
/// logged and skipped, never fatal; ranks stay 1-indexed by curated
/// position so a skipped entry leaves a gap instead of reshuffling.
pub fn featured_cards(curated: &[(&str, &str)], projects: &ProjectIndex) -> Vec<FeaturedCard> {
    curated
        .iter()
        .enumerate()
        .filter_map(|(index, (project_id, class_label))| {
            let mut tokens = project_id.splitn(3, '_');
            let (Some(school_token), Some(class_token)) = (tokens.next(), tokens.next()) else {
                warn!("id progetto classificato non valido: {project_id}");
                return None;
            };

            let project = projects
                .get(school_token)
                .and_then(|classes| classes.get(class_token))
                .and_then(|list| list.iter().find(|p| p.id == *project_id));

            let Some(project) = project else {
                warn!("progetto classificato non trovato: {project_id}");
                return None;
            };

            let icon = match &project.cover_image {
                Some(cover) if !cover.is_empty() => cover.clone(),
                _ => RANK_ICONS[index % RANK_ICONS.len()].to_string(),
            };

            Some(FeaturedCard {
                rank: index + 1,
                project_id: project.id.clone(),
                title: project.name.clone(),
                class_label: class_label.to_string(),
                icon,
            })
        })
        .collect()
}

/// Cards for one class's project grid. A `fa-` cover token becomes the
/// icon with a color hashed from the name length; everything else gets
/// the default book icon.
pub fn project_cards(school_id: &str, class: &ClassRoom, projects: &ProjectIndex) -> Vec<ProjectCard> {
    let class_token = class
        .id
        .strip_prefix(&format!("{school_id}_"))
        .unwrap_or(&class.id);

    let list = projects
        .get(school_id)
        .and_then(|classes| classes.get(class_token));

    list.map(|list| {
        list.iter()
            .map(|project| {
                let (icon, color) = match &project.cover_image {
                    Some(cover) if cover.starts_with("fa-") => (
                        cover.clone(),
                        CARD_COLORS[project.name.len() % CARD_COLORS.len()].to_string(),
                    ),
                    _ => (DEFAULT_ICON.to_string(), DEFAULT_COLOR.to_string()),
                };
                ProjectCard {
                    id: project.id.clone(),
                    title: project.name.clone(),
                    icon,
                    color,
                }
            })
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Project;
    use std::collections::BTreeMap;

    fn project(id: &str, name: &str, cover: Option<&str>) -> Project {
        Project {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            file: None,
            path: None,
            cover_image: cover.map(Into::into),
        }
    }

    fn index_with(school: &str, class: &str, list: Vec<Project>) -> ProjectIndex {
        let mut classes = BTreeMap::new();
        classes.insert(class.to_string(), list);
        let mut index = ProjectIndex::new();
        index.insert(school.to_string(), classes);
        index
    }

    #[test]
    fn known_school_uses_static_identity() {
        let schools = vec![
            School {
                id: "tenca".into(),
                name: "tenca".into(),
                classes: vec![],
            },
            School {
                id: "manzoni".into(),
                name: "Istituto Manzoni".into(),
                classes: vec![],
            },
        ];
        let cards = school_cards(&schools);
        assert_eq!(cards[0].icon, "fa-book");
        assert_eq!(cards[0].title, "Liceo Statale \"Carlo Tenca\"");
        assert_eq!(cards[1].icon, "fa-school");
        assert_eq!(cards[1].title, "Istituto Manzoni");
    }

    #[test]
    fn featured_resolves_by_split_id() {
        let index = index_with(
            "tenca",
            "classe4A",
            vec![project("tenca_classe4A_X", "Foo", None)],
        );
        let cards = featured_cards(&[("tenca_classe4A_X", "4A - TENCA")], &index);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "Foo");
        assert_eq!(cards[0].rank, 1);
        assert_eq!(cards[0].icon, "fa-trophy");
    }

    #[test]
    fn featured_miss_is_skipped_not_fatal() {
        let index = index_with("tenca", "classe4A", vec![]);
        let cards = featured_cards(
            &[("tenca_classe4A_missing", "4A"), ("garbage", "?")],
            &index,
        );
        assert!(cards.is_empty());
    }

    #[test]
    fn skipped_entry_leaves_rank_gap() {
        let index = index_with(
            "tenca",
            "classe4A",
            vec![project("tenca_classe4A_X", "Foo", None)],
        );
        let cards = featured_cards(
            &[("tenca_classe4A_missing", "4A"), ("tenca_classe4A_X", "4A")],
            &index,
        );
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].rank, 2);
        assert_eq!(cards[0].icon, "fa-medal");
    }

    #[test]
    fn project_card_color_is_deterministic() {
        let class = ClassRoom {
            id: "tenca_classe3C".into(),
            name: "Classe 3C".into(),
            description: String::new(),
        };
        let index = index_with(
            "tenca",
            "classe3C",
            vec![
                project("tenca_classe3C_a", "Storia", Some("fa-ghost")),
                project("tenca_classe3C_b", "Altro", None),
            ],
        );

        let first = project_cards("tenca", &class, &index);
        let second = project_cards("tenca", &class, &index);
        assert_eq!(first, second);

        assert_eq!(first[0].icon, "fa-ghost");
        assert_eq!(first[0].color, CARD_COLORS["Storia".len() % CARD_COLORS.len()]);
        assert_eq!(first[1].icon, DEFAULT_ICON);
        assert_eq!(first[1].color, DEFAULT_COLOR);
    }

    #[test]
    fn unknown_class_renders_empty_grid() {
        let class = ClassRoom {
            id: "tenca_classe9Z".into(),
            name: "Classe 9Z".into(),
            description: String::new(),
        };
        assert!(project_cards("tenca", &class, &ProjectIndex::new()).is_empty());
    }
}
