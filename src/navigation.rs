//! Navigation state shared by the controller and the view.
//!
//! The state is plain data: it never fetches anything. The controller
//! decides when a transition is allowed and drives the `pub(crate)`
//! mutators below; the view only reads it and edits the search term.

use crate::model::{Node, Page};
use serde::{Deserialize, Serialize};

pub const DEFAULT_HOME_LABEL: &str = "home";

/// Which data source backs the displayed rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ActiveView {
    /// The paginated root listing, with search applied.
    Root,
    /// Children of the directory at the end of the trail, unfiltered.
    Subtree { children: Vec<Node> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawNavigationState")]
pub struct NavigationState {
    trail: Vec<String>,
    view: ActiveView,
    root_content: Vec<Node>,
    total_elements: u64,
    total_pages: u64,
    page: usize,
    page_size: usize,
    search_term: String,
}

/// Unchecked shape of a saved state, validated into [`NavigationState`].
#[derive(Deserialize)]
struct RawNavigationState {
    trail: Vec<String>,
    view: ActiveView,
    #[serde(default)]
    root_content: Vec<Node>,
    #[serde(default)]
    total_elements: u64,
    #[serde(default)]
    total_pages: u64,
    #[serde(default)]
    page: usize,
    page_size: usize,
    #[serde(default)]
    search_term: String,
}

impl TryFrom<RawNavigationState> for NavigationState {
    type Error = String;

    fn try_from(raw: RawNavigationState) -> Result<Self, Self::Error> {
        if raw.trail.is_empty() {
            return Err("trail must start with the home crumb".to_string());
        }
        match (&raw.view, raw.trail.len()) {
            (ActiveView::Root, 1) => {}
            (ActiveView::Root, len) => {
                return Err(format!("root view with a trail of {} crumbs", len));
            }
            (ActiveView::Subtree { .. }, 1) => {
                return Err("subtree view with only the home crumb".to_string());
            }
            (ActiveView::Subtree { .. }, _) => {}
        }
        if raw.page_size == 0 {
            return Err("page_size must be greater than zero".to_string());
        }
        Ok(Self {
            trail: raw.trail,
            view: raw.view,
            root_content: raw.root_content,
            total_elements: raw.total_elements,
            total_pages: raw.total_pages,
            page: raw.page,
            page_size: raw.page_size,
            search_term: raw.search_term,
        })
    }
}

impl NavigationState {
    pub fn new(home_label: &str, page_size: usize) -> Self {
        Self {
            trail: vec![home_label.to_string()],
            view: ActiveView::Root,
            root_content: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            page: 0,
            page_size,
            search_term: String::new(),
        }
    }

    pub fn trail(&self) -> &[String] {
        &self.trail
    }

    pub fn home_label(&self) -> &str {
        &self.trail[0]
    }

    /// Number of directories descended into; 0 at the root.
    pub fn depth(&self) -> usize {
        self.trail.len().saturating_sub(1)
    }

    pub fn view(&self) -> &ActiveView {
        &self.view
    }

    pub fn is_root_view(&self) -> bool {
        matches!(self.view, ActiveView::Root)
    }

    /// Children of the drilled-into directory; empty in the root view.
    pub fn active_children(&self) -> &[Node] {
        match &self.view {
            ActiveView::Root => &[],
            ActiveView::Subtree { children } => children,
        }
    }

    pub fn root_content(&self) -> &[Node] {
        &self.root_content
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Rows the view should show.
    ///
    /// Search only applies to the root listing; a subtree is always shown
    /// in full.
    pub fn displayed_rows(&self) -> Vec<&Node> {
        match &self.view {
            ActiveView::Subtree { children } => children.iter().collect(),
            ActiveView::Root => filter_by_name(&self.root_content, &self.search_term),
        }
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Index of the first crumb equal to `crumb`.
    pub fn crumb_index(&self, crumb: &str) -> Option<usize> {
        self.trail.iter().position(|c| c == crumb)
    }

    /// `/`-joined trail up to and including `index`, used as a cache key.
    pub fn path_key(&self, index: usize) -> String {
        let end = (index + 1).min(self.trail.len());
        self.trail[..end].join("/")
    }

    /// Commit a freshly loaded root page. Back at the root, so the trail
    /// collapses to the home crumb.
    pub(crate) fn apply_root_page(&mut self, page: usize, page_size: usize, listing: Page) {
        if listing.content.len() as u64 > listing.total_elements {
            log::warn!(
                "⚠️ navigation: page {} has {} rows but the backend reports {} in total",
                page,
                listing.content.len(),
                listing.total_elements
            );
        }
        self.total_pages = Page::total_pages_for(listing.total_elements, page_size);
        self.total_elements = listing.total_elements;
        self.root_content = listing.content;
        self.page = page;
        self.page_size = page_size;
        self.trail.truncate(1);
        self.view = ActiveView::Root;
    }

    pub(crate) fn enter_subtree(&mut self, name: &str, children: Vec<Node>) {
        self.trail.push(name.to_string());
        self.view = ActiveView::Subtree { children };
    }

    /// Cut the trail so it ends at `index` and show `children` there.
    pub(crate) fn apply_jump(&mut self, index: usize, children: Vec<Node>) {
        self.trail.truncate(index + 1);
        self.view = ActiveView::Subtree { children };
    }
}

/// Nodes whose name contains `term`, ignoring case. An empty term keeps
/// everything.
pub fn filter_by_name<'a>(nodes: &'a [Node], term: &str) -> Vec<&'a Node> {
    if term.is_empty() {
        return nodes.iter().collect();
    }
    let term_lower = term.to_lowercase();
    nodes
        .iter()
        .filter(|node| node.name.to_lowercase().contains(&term_lower))
        .collect()
}
