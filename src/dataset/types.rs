use std::collections::HashSet;
use std::fmt;

use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_NODE_KIND: &str = "entity";
const DEFAULT_LINK_KIND: &str = "RELATED";

/// Entity category. Drives the node color and glyph.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum NodeKind {
    Person,
    Organization,
    Location,
    Concept,
    Time,
    Event,
    Other(String),
}

impl NodeKind {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "person" => Self::Person,
            "organization" => Self::Organization,
            "location" => Self::Location,
            "concept" => Self::Concept,
            "time" => Self::Time,
            "event" => Self::Event,
            _ => Self::Other(raw.trim().to_owned()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Person => "person",
            Self::Organization => "organization",
            Self::Location => "location",
            Self::Concept => "concept",
            Self::Time => "time",
            Self::Event => "event",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl Default for NodeKind {
    fn default() -> Self {
        Self::Other(DEFAULT_NODE_KIND.to_owned())
    }
}

impl From<String> for NodeKind {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LinkRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default = "default_link_kind")]
    pub kind: String,
    #[serde(default)]
    pub label: Option<String>,
}

fn default_link_kind() -> String {
    DEFAULT_LINK_KIND.to_owned()
}

/// Immutable graph snapshot handed to the engine. A new snapshot replaces
/// the previous one wholesale.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default, alias = "relationships")]
    pub links: Vec<LinkRecord>,
}

impl Dataset {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let mut dataset: Self = serde_json::from_str(raw).context("invalid graph JSON")?;
        dataset.normalize();
        Ok(dataset)
    }

    fn normalize(&mut self) {
        for node in &mut self.nodes {
            if node.name.trim().is_empty() {
                node.name = node.id.clone();
            }
            if node
                .description
                .as_deref()
                .is_some_and(|text| text.trim().is_empty())
            {
                node.description = None;
            }
        }

        for link in &mut self.links {
            if link.kind.trim().is_empty() {
                link.kind = default_link_kind();
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Distinct node kinds in first-seen order.
    pub fn node_kinds(&self) -> Vec<NodeKind> {
        let mut seen = HashSet::new();
        self.nodes
            .iter()
            .filter(|node| seen.insert(&node.kind))
            .map(|node| node.kind.clone())
            .collect()
    }

    pub fn relationship_kinds(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.links
            .iter()
            .filter(|link| seen.insert(link.kind.as_str()))
            .map(|link| link.kind.clone())
            .collect()
    }
}

#[cfg(test)]
impl NodeRecord {
    pub(crate) fn new(id: &str, kind: NodeKind, name: &str) -> Self {
        Self {
            id: id.to_owned(),
            kind,
            name: name.to_owned(),
            description: None,
        }
    }
}

#[cfg(test)]
impl LinkRecord {
    pub(crate) fn new(source: &str, target: &str, kind: &str) -> Self {
        Self {
            id: None,
            source: source.to_owned(),
            target: target.to_owned(),
            kind: kind.to_owned(),
            label: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_graph_payload() {
        let raw = r#"{
            "nodes": [
                {"id": "n1", "name": "Alice", "type": "person", "description": ""},
                {"id": "n2", "type": "Organization"},
                {"id": "n3", "name": "Quantum", "type": "theory"}
            ],
            "links": [
                {"id": "rel-0", "source": "n1", "target": "n2", "type": "works_for"},
                {"source": "n2", "target": "n3"}
            ]
        }"#;

        let dataset = Dataset::from_json_str(raw).expect("valid dataset");
        assert_eq!(dataset.nodes.len(), 3);
        assert_eq!(dataset.nodes[0].kind, NodeKind::Person);
        assert_eq!(dataset.nodes[0].description, None);
        assert_eq!(dataset.nodes[1].kind, NodeKind::Organization);
        assert_eq!(dataset.nodes[1].name, "n2");
        assert_eq!(dataset.nodes[2].kind, NodeKind::Other("theory".to_owned()));
        assert_eq!(dataset.links[1].kind, "RELATED");
    }

    #[test]
    fn accepts_relationships_alias() {
        let raw = r#"{"nodes": [{"id": "a"}], "relationships": [{"source": "a", "target": "a", "type": "is_a"}]}"#;
        let dataset = Dataset::from_json_str(raw).expect("valid dataset");
        assert_eq!(dataset.links.len(), 1);
        assert_eq!(dataset.nodes[0].kind, NodeKind::default());
    }

    #[test]
    fn kinds_are_listed_in_first_seen_order() {
        let dataset = Dataset {
            nodes: vec![
                NodeRecord::new("a", NodeKind::Event, "A"),
                NodeRecord::new("b", NodeKind::Person, "B"),
                NodeRecord::new("c", NodeKind::Event, "C"),
            ],
            links: vec![
                LinkRecord::new("a", "b", "part_of"),
                LinkRecord::new("b", "c", "part_of"),
                LinkRecord::new("a", "c", "is_a"),
            ],
        };

        assert_eq!(dataset.node_kinds(), vec![NodeKind::Event, NodeKind::Person]);
        assert_eq!(dataset.relationship_kinds(), vec!["part_of", "is_a"]);
    }

    #[test]
    fn rejects_non_object_json() {
        assert!(Dataset::from_json_str("[1, 2, 3]").is_err());
    }
}
