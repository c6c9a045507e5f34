use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend identifier of a node. The backend has used both numeric and
/// string keys, so both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Number(i64),
    Text(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Number(n) => write!(f, "{}", n),
            NodeId::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Directory { children: Vec<Node> },
    File,
}

/// A single file-system entry as returned by the backend.
///
/// Serializes in the backend's wire shape
/// (`{ id, name, isDirectory, childNode }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "NodeDto", into = "NodeDto")]
pub struct Node {
    pub id: Option<NodeId>,
    pub name: String,
    pub kind: NodeKind,
}

impl Node {
    pub fn new_dir(id: i64, name: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            id: Some(NodeId::Number(id)),
            name: name.into(),
            kind: NodeKind::Directory { children },
        }
    }

    pub fn new_file(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: Some(NodeId::Number(id)),
            name: name.into(),
            kind: NodeKind::File,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Directory { children } => children,
            NodeKind::File => &[],
        }
    }

    /// Only directories with at least one child can be descended into.
    pub fn is_navigable(&self) -> bool {
        !self.children().is_empty()
    }

    pub fn type_label(&self) -> &'static str {
        if self.is_dir() {
            "Folder"
        } else {
            "File"
        }
    }

    /// Depth-first search for the first node called `name`, including `self`.
    pub fn find_by_name(&self, name: &str) -> Option<&Node> {
        if self.name == name {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find_by_name(name))
    }
}

impl From<i64> for NodeId {
    fn from(value: i64) -> Self {
        NodeId::Number(value)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId::Text(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        NodeId::Text(value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<NodeId>,
    name: String,
    #[serde(default)]
    is_directory: bool,
    #[serde(default)]
    child_node: Vec<Node>,
}

impl From<NodeDto> for Node {
    fn from(dto: NodeDto) -> Self {
        let kind = if dto.is_directory {
            NodeKind::Directory {
                children: dto.child_node,
            }
        } else {
            NodeKind::File
        };
        Self {
            id: dto.id,
            name: dto.name,
            kind,
        }
    }
}

impl From<Node> for NodeDto {
    fn from(node: Node) -> Self {
        let (is_directory, child_node) = match node.kind {
            NodeKind::Directory { children } => (true, children),
            NodeKind::File => (false, Vec::new()),
        };
        Self {
            id: node.id,
            name: node.name,
            is_directory,
            child_node,
        }
    }
}

/// One page of the root listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub content: Vec<Node>,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl Page {
    /// `ceil(total_elements / page_size)`; zero when the page size is zero.
    pub fn total_pages_for(total_elements: u64, page_size: usize) -> u64 {
        if page_size == 0 {
            return 0;
        }
        total_elements.div_ceil(page_size as u64)
    }
}

/// Body of `GET /filesystem?page=&size=`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse {
    #[serde(default)]
    pub content: Vec<Node>,
    pub page: PageMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub total_elements: u64,
    pub total_pages: u64,
}

impl From<PageResponse> for Page {
    fn from(response: PageResponse) -> Self {
        Self {
            content: response.content,
            total_elements: response.page.total_elements,
            total_pages: response.page.total_pages,
        }
    }
}

/// Body of `GET /filesystem/getByname?name=`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResponse {
    pub file_node: Option<LookupNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupNode {
    pub name: String,
    #[serde(default)]
    pub child_node: Vec<Node>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_wire_node() {
        let json = r#"{
            "id": 1,
            "name": "docs",
            "isDirectory": true,
            "childNode": [
                { "id": 2, "name": "readme.md", "isDirectory": false, "childNode": [] }
            ]
        }"#;
        let node: Node = serde_json::from_str(json).unwrap();

        assert_eq!(node.id, Some(NodeId::Number(1)));
        assert!(node.is_dir());
        assert!(node.is_navigable());
        assert_eq!(node.children().len(), 1);
        assert_eq!(node.children()[0].type_label(), "File");
        assert!(!node.children()[0].is_navigable());
    }

    #[test]
    fn test_file_children_are_ignored() {
        // A file never exposes children even if the payload carries some.
        let json = r#"{ "id": "f1", "name": "a.txt", "isDirectory": false,
                        "childNode": [{ "id": 9, "name": "ghost" }] }"#;
        let node: Node = serde_json::from_str(json).unwrap();

        assert_eq!(node.kind, NodeKind::File);
        assert!(node.children().is_empty());
        assert_eq!(node.id.unwrap().to_string(), "f1");
    }

    #[test]
    fn test_empty_directory_is_not_navigable() {
        let node = Node::new_dir(3, "empty", vec![]);
        assert!(node.is_dir());
        assert!(!node.is_navigable());
        assert_eq!(node.type_label(), "Folder");
    }

    #[test]
    fn test_node_serializes_in_wire_shape() {
        let node = Node::new_dir(1, "src", vec![Node::new_file(2, "main.rs")]);
        let value = serde_json::to_value(&node).unwrap();

        assert_eq!(value["isDirectory"], true);
        assert_eq!(value["childNode"][0]["name"], "main.rs");
        assert_eq!(value["childNode"][0]["isDirectory"], false);
    }

    #[test]
    fn test_decode_page_response() {
        let json = r#"{
            "content": [
                { "id": 1, "name": "A", "isDirectory": true, "childNode": [] },
                { "id": 2, "name": "B", "isDirectory": false, "childNode": [] }
            ],
            "page": { "size": 5, "number": 0, "totalElements": 7, "totalPages": 2 }
        }"#;
        let page: Page = serde_json::from_str::<PageResponse>(json).unwrap().into();

        assert_eq!(page.content.len(), 2);
        assert_eq!(page.total_elements, 7);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn test_decode_lookup_response() {
        let json = r#"{ "fileNode": { "name": "A", "childNode": [
            { "id": 10, "name": "X", "isDirectory": false }
        ] } }"#;
        let response: LookupResponse = serde_json::from_str(json).unwrap();
        let node = response.file_node.unwrap();

        assert_eq!(node.name, "A");
        assert_eq!(node.child_node[0].name, "X");

        let missing: LookupResponse = serde_json::from_str(r#"{ "fileNode": null }"#).unwrap();
        assert!(missing.file_node.is_none());
    }

    #[test]
    fn test_total_pages_for() {
        assert_eq!(Page::total_pages_for(0, 5), 0);
        assert_eq!(Page::total_pages_for(5, 5), 1);
        assert_eq!(Page::total_pages_for(6, 5), 2);
        assert_eq!(Page::total_pages_for(26, 25), 2);
        assert_eq!(Page::total_pages_for(10, 0), 0);
    }

    #[test]
    fn test_find_by_name_is_depth_first() {
        let tree = Node::new_dir(
            1,
            "root",
            vec![
                Node::new_dir(2, "a", vec![Node::new_file(3, "dup")]),
                Node::new_file(4, "dup"),
            ],
        );

        let found = tree.find_by_name("dup").unwrap();
        assert_eq!(found.id, Some(NodeId::Number(3)));
        assert!(tree.find_by_name("missing").is_none());
    }
}
