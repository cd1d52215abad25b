//! Page-flip navigation: cover, school index, then lazily created school
//! and class pages. Owns the breadcrumb trail.

use crate::models::{ClassRoom, School};

#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Cover,
    SchoolIndex,
    School { id: String, name: String },
    Class { id: String, name: String },
}

impl Page {
    pub fn title(&self) -> &str {
        match self {
            Page::Cover => "Home",
            Page::SchoolIndex => "Scuole",
            Page::School { name, .. } | Page::Class { name, .. } => name,
        }
    }
}

/// One breadcrumb segment. `target` is the page index a click jumps to;
/// the terminal (active) segment has none.
#[derive(Debug, Clone, PartialEq)]
pub struct Crumb {
    pub label: String,
    pub target: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Key {
    Left,
    Right,
    Escape,
}

#[derive(Debug)]
pub struct NavigationController {
    pages: Vec<Page>,
    current: usize,
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationController {
    pub fn new() -> Self {
        Self {
            pages: vec![Page::Cover, Page::SchoolIndex],
            current: 0,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_page(&self) -> &Page {
        &self.pages[self.current]
    }

    pub fn prev_enabled(&self) -> bool {
        self.current > 0
    }

    pub fn next_enabled(&self) -> bool {
        self.current + 1 < self.pages.len()
    }

    /// Moves to `index`; out-of-range indices are ignored. Dynamic pages
    /// deeper than the target are torn down, so navigating back to the
    /// index drops the synthesized school/class pages.
    pub fn go_to_page(&mut self, index: isize) {
        if index < 0 || index as usize >= self.pages.len() {
            return;
        }
        self.current = index as usize;
        let keep = (self.current + 1).max(2);
        self.pages.truncate(keep);
    }

    /// Synthesizes the school page (list of classes) and navigates to it.
    pub fn enter_school(&mut self, school: &School) {
        self.pages.truncate(2);
        self.pages.push(Page::School {
            id: school.id.clone(),
            name: school.name.clone(),
        });
        self.current = 2;
    }

    /// Synthesizes the class page (project grid) below the current school
    /// page. Without a school page there is nowhere to hang it, so the
    /// call is ignored.
    pub fn enter_class(&mut self, class: &ClassRoom) {
        if self.pages.len() < 3 {
            return;
        }
        self.pages.truncate(3);
        self.pages.push(Page::Class {
            id: class.id.clone(),
            name: class.name.clone(),
        });
        self.current = 3;
    }

    pub fn breadcrumb(&self) -> Vec<Crumb> {
        (0..=self.current)
            .map(|index| Crumb {
                label: self.pages[index].title().to_string(),
                target: (index < self.current).then_some(index),
            })
            .collect()
    }

    /// Arrow navigation; a no-op while a modal is open (Escape is handled
    /// by the session, which owns the viewer).
    pub fn handle_key(&mut self, key: Key, modal_open: bool) {
        if modal_open {
            return;
        }
        match key {
            Key::Left => self.go_to_page(self.current as isize - 1),
            Key::Right => self.go_to_page(self.current as isize + 1),
            Key::Escape => {}
        }
    }
}
