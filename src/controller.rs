//! The navigation controller: owns the [`NavigationState`] and the only
//! code path that changes it in response to fetches.
//!
//! Every operation that fetches awaits the result before touching state,
//! and a failed fetch leaves the state exactly as it was. Failures are
//! logged here and handed back to the caller as values.

use crate::error::NavError;
use crate::model::{Node, Page};
use crate::navigation::{NavigationState, DEFAULT_HOME_LABEL};
use crate::service::ListingService;
use crate::session::Session;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub home_label: String,
    pub page_size: usize,
    /// Keep fetched subtrees keyed by their full trail path and serve
    /// breadcrumb jumps from them.
    pub cache_subtrees: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            home_label: DEFAULT_HOME_LABEL.to_string(),
            page_size: 5,
            cache_subtrees: false,
        }
    }
}

pub struct NavigationController<S> {
    service: S,
    session: Session,
    state: NavigationState,
    subtree_cache: Option<HashMap<String, Vec<Node>>>,
}

impl<S: ListingService> NavigationController<S> {
    pub fn new(service: S, session: Session, options: ControllerOptions) -> Self {
        Self {
            service,
            session,
            state: NavigationState::new(&options.home_label, options.page_size),
            subtree_cache: options.cache_subtrees.then(HashMap::new),
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Request the root listing and make it the displayed content.
    pub async fn load_root_page(&mut self, page: usize, page_size: usize) -> Result<Page, NavError> {
        if page_size == 0 {
            return report("load root page", Err(NavError::InvalidPageSize));
        }

        let listing = report(
            "load root page",
            self.service.fetch_page(&self.session, page, page_size).await,
        )?;

        log::info!(
            "📄 controller: root page {} loaded ({} rows, {} total)",
            page,
            listing.content.len(),
            listing.total_elements
        );
        if let Some(cache) = self.subtree_cache.as_mut() {
            cache.clear();
        }
        self.state.apply_root_page(page, page_size, listing);

        Ok(Page {
            content: self.state.root_content().to_vec(),
            total_elements: self.state.total_elements(),
            total_pages: self.state.total_pages(),
        })
    }

    /// Children of the node called `name`, looked up anywhere in the tree.
    pub async fn fetch_node_by_name(&self, name: &str) -> Result<Vec<Node>, NavError> {
        report(
            "fetch node by name",
            self.service.fetch_by_name(&self.session, name).await,
        )
    }

    /// Drill into `node`. Files and empty directories are ignored and
    /// return `Ok(false)`.
    pub async fn descend_into(&mut self, node: &Node) -> Result<bool, NavError> {
        if !node.is_navigable() {
            log::debug!("🧭 controller: '{}' is not navigable, ignoring", node.name);
            return Ok(false);
        }

        let children = self.fetch_children(&node.name).await?;

        let key = format!("{}/{}", self.state.path_key(self.state.depth()), node.name);
        if let Some(cache) = self.subtree_cache.as_mut() {
            cache.insert(key, children.clone());
        }
        self.state.enter_subtree(&node.name, children);
        log::info!("🧭 controller: descended into {}", self.state.trail().join("/"));
        Ok(true)
    }

    /// Jump to the first crumb called `crumb`. Unknown crumbs are ignored.
    pub async fn jump_to_breadcrumb(&mut self, crumb: &str) -> Result<bool, NavError> {
        match self.state.crumb_index(crumb) {
            Some(index) => self.jump_to_breadcrumb_index(index).await,
            None => {
                log::debug!("🧭 controller: '{}' is not on the trail", crumb);
                Ok(false)
            }
        }
    }

    /// Jump to the crumb at `index`. The home crumb reloads the current
    /// root page; any other crumb re-resolves its children by name.
    pub async fn jump_to_breadcrumb_index(&mut self, index: usize) -> Result<bool, NavError> {
        if index >= self.state.trail().len() {
            return Ok(false);
        }

        if index == 0 {
            let (page, page_size) = (self.state.page(), self.state.page_size());
            self.load_root_page(page, page_size).await?;
            return Ok(true);
        }

        let key = self.state.path_key(index);
        let cached = self
            .subtree_cache
            .as_ref()
            .and_then(|cache| cache.get(&key))
            .cloned();

        let children = match cached {
            Some(children) => {
                log::debug!("🧭 controller: serving {} from cache", key);
                children
            }
            None => {
                let name = self.state.trail()[index].clone();
                let children = self.fetch_children(&name).await?;
                if let Some(cache) = self.subtree_cache.as_mut() {
                    cache.insert(key, children.clone());
                }
                children
            }
        };

        self.state.apply_jump(index, children);
        log::info!("🧭 controller: jumped to {}", self.state.trail().join("/"));
        Ok(true)
    }

    /// Client-side filter for the root listing; never fetches.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.state.set_search_term(term);
    }

    pub async fn set_page(&mut self, page: usize) -> Result<(), NavError> {
        let page_size = self.state.page_size();
        self.load_root_page(page, page_size).await.map(|_| ())
    }

    /// Changing the page size always goes back to the first page.
    pub async fn set_page_size(&mut self, page_size: usize) -> Result<(), NavError> {
        self.load_root_page(0, page_size).await.map(|_| ())
    }

    /// Reload the current root page.
    pub async fn reload(&mut self) -> Result<(), NavError> {
        let (page, page_size) = (self.state.page(), self.state.page_size());
        self.load_root_page(page, page_size).await.map(|_| ())
    }

    /// Descend through `names` one level at a time, picking each from the
    /// currently displayed rows. Stops at the first name that is missing
    /// or not navigable.
    pub async fn descend_path(&mut self, names: &[&str]) -> Result<(), NavError> {
        for name in names {
            let node = self
                .state
                .displayed_rows()
                .into_iter()
                .find(|node| node.name == *name)
                .cloned()
                .ok_or_else(|| NavError::NotFound(name.to_string()))?;

            if !self.descend_into(&node).await? {
                return Err(NavError::NotFound(format!("{} is not a non-empty directory", name)));
            }
        }
        Ok(())
    }

    async fn fetch_children(&self, name: &str) -> Result<Vec<Node>, NavError> {
        let children = self.fetch_node_by_name(name).await?;
        if children.is_empty() {
            return report(
                "fetch node by name",
                Err(NavError::NotFound(format!("{} has no children", name))),
            );
        }
        Ok(children)
    }
}

fn report<T>(action: &str, result: Result<T, NavError>) -> Result<T, NavError> {
    if let Err(ref e) = result {
        log::warn!("⚠️ controller: {} failed, state unchanged: {}", action, e);
    }
    result
}
