//! Listing services: where the navigation controller gets its data.
//!
//! [`HttpListingService`] talks to the file-system REST backend;
//! [`FixtureListingService`] serves an in-memory tree with the same
//! contract, for offline use and tests.

use crate::error::{FsNavError, NavError};
use crate::model::{LookupResponse, Node, Page, PageResponse};
use crate::session::Session;
use reqwest::header::ACCEPT;
use std::future::Future;
use std::path::Path;
use std::time::Duration;

/// Read access to the remote tree.
///
/// Implementations must refuse to fetch when the session carries no
/// credential.
pub trait ListingService: Send + Sync {
    /// One page of the root listing.
    fn fetch_page(
        &self,
        session: &Session,
        page: usize,
        page_size: usize,
    ) -> impl Future<Output = Result<Page, NavError>> + Send;

    /// Children of the node called `name`, wherever it sits in the tree.
    ///
    /// When several nodes share the name, which one is returned is up to
    /// the implementation.
    fn fetch_by_name(
        &self,
        session: &Session,
        name: &str,
    ) -> impl Future<Output = Result<Vec<Node>, NavError>> + Send;
}

pub struct HttpListingService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpListingService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FsNavError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl ListingService for HttpListingService {
    async fn fetch_page(
        &self,
        session: &Session,
        page: usize,
        page_size: usize,
    ) -> Result<Page, NavError> {
        let token = session.bearer()?.to_string();
        let url = format!("{}/filesystem", self.base_url);
        log::debug!("🌐 http: GET {} page={} size={}", url, page, page_size);

        let response = self
            .client
            .get(&url)
            .query(&[("page", page), ("size", page_size)])
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| NavError::Network(format!("root page request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NavError::from_status(status.as_u16(), "root page"));
        }

        let body: PageResponse = response
            .json()
            .await
            .map_err(|e| NavError::Protocol(format!("root page: {}", e)))?;
        Ok(body.into())
    }

    async fn fetch_by_name(&self, session: &Session, name: &str) -> Result<Vec<Node>, NavError> {
        let token = session.bearer()?.to_string();
        let url = format!("{}/filesystem/getByname", self.base_url);
        log::debug!("🌐 http: GET {} name={}", url, name);

        let response = self
            .client
            .get(&url)
            .query(&[("name", name)])
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| NavError::Network(format!("lookup of '{}' failed: {}", name, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NavError::from_status(status.as_u16(), name));
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|e| NavError::Protocol(format!("lookup of '{}': {}", name, e)))?;

        body.file_node
            .map(|node| node.child_node)
            .ok_or_else(|| NavError::NotFound(name.to_string()))
    }
}

/// In-memory listing over a fixed list of root nodes.
///
/// Name lookups return the first depth-first match across the roots.
#[derive(Debug, Clone, Default)]
pub struct FixtureListingService {
    roots: Vec<Node>,
}

impl FixtureListingService {
    pub fn new(roots: Vec<Node>) -> Self {
        Self { roots }
    }

    /// Load roots from a JSON array of nodes in the backend's wire shape.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FsNavError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let roots: Vec<Node> = serde_json::from_str(&content)?;
        log::info!(
            "📂 fixture: loaded {} root nodes from {:?}",
            roots.len(),
            path.as_ref()
        );
        Ok(Self::new(roots))
    }

    pub fn roots(&self) -> &[Node] {
        &self.roots
    }
}

impl ListingService for FixtureListingService {
    async fn fetch_page(
        &self,
        session: &Session,
        page: usize,
        page_size: usize,
    ) -> Result<Page, NavError> {
        session.bearer()?;
        if page_size == 0 {
            return Err(NavError::InvalidPageSize);
        }

        let total_elements = self.roots.len() as u64;
        let content = self
            .roots
            .iter()
            .skip(page.saturating_mul(page_size))
            .take(page_size)
            .cloned()
            .collect();

        Ok(Page {
            content,
            total_elements,
            total_pages: Page::total_pages_for(total_elements, page_size),
        })
    }

    async fn fetch_by_name(&self, session: &Session, name: &str) -> Result<Vec<Node>, NavError> {
        session.bearer()?;
        self.roots
            .iter()
            .find_map(|root| root.find_by_name(name))
            .map(|node| node.children().to_vec())
            .ok_or_else(|| NavError::NotFound(name.to_string()))
    }
}
