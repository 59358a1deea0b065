//! JSON snapshots of a live document tree.
//!
//! A page-side bridge can see attached shadow trees directly, which plain
//! HTML serialization loses. Snapshots keep them as an explicit `shadow`
//! list next to the light `children`:
//!
//! ```json
//! { "tag": "message-content",
//!   "attrs": { "class": "model-response-text" },
//!   "shadow": [ { "tag": "p", "children": [ { "text": "Hello" } ] } ],
//!   "children": [] }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::dom::{ContentNode, NodeKind};
use crate::Result;

/// One node of a document snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotNode {
    Element(SnapshotElement),
    Text { text: String },
}

/// An element node of a document snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotElement {
    pub tag: String,

    /// Attributes in source order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attrs: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SnapshotNode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Vec<SnapshotNode>>,
}

impl SnapshotNode {
    /// Decode a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    #[must_use]
    pub fn element(tag: impl Into<String>) -> Self {
        Self::Element(SnapshotElement {
            tag: tag.into(),
            ..SnapshotElement::default()
        })
    }

    /// Builder: set an attribute (no-op on text nodes).
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Element(el) = &mut self {
            el.attrs.insert(name.into(), value.into());
        }
        self
    }

    /// Builder: append a light child (no-op on text nodes).
    #[must_use]
    pub fn with_child(mut self, child: SnapshotNode) -> Self {
        if let Self::Element(el) = &mut self {
            el.children.push(child);
        }
        self
    }

    /// Builder: append a shadow-tree child (no-op on text nodes).
    #[must_use]
    pub fn with_shadow_child(mut self, child: SnapshotNode) -> Self {
        if let Self::Element(el) = &mut self {
            el.shadow.get_or_insert_with(Vec::new).push(child);
        }
        self
    }
}

impl<'a> ContentNode for &'a SnapshotNode {
    fn kind(&self) -> NodeKind {
        match *self {
            SnapshotNode::Element(_) => NodeKind::Element,
            SnapshotNode::Text { .. } => NodeKind::Text,
        }
    }

    fn tag(&self) -> Option<String> {
        match *self {
            SnapshotNode::Element(el) => Some(el.tag.to_ascii_lowercase()),
            SnapshotNode::Text { .. } => None,
        }
    }

    fn attribute(&self, name: &str) -> Option<String> {
        match *self {
            SnapshotNode::Element(el) => el.attrs.get(name).cloned(),
            SnapshotNode::Text { .. } => None,
        }
    }

    fn attributes(&self) -> Vec<(String, String)> {
        match *self {
            SnapshotNode::Element(el) => el
                .attrs
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            SnapshotNode::Text { .. } => Vec::new(),
        }
    }

    fn child_nodes(&self) -> Vec<Self> {
        match *self {
            SnapshotNode::Element(el) => el.children.iter().collect(),
            SnapshotNode::Text { .. } => Vec::new(),
        }
    }

    fn shadow_children(&self) -> Option<Vec<Self>> {
        match *self {
            SnapshotNode::Element(el) => el.shadow.as_ref().map(|kids| kids.iter().collect()),
            SnapshotNode::Text { .. } => None,
        }
    }

    fn own_text(&self) -> String {
        match *self {
            SnapshotNode::Text { text } => text.clone(),
            SnapshotNode::Element(_) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::text_content;

    #[test]
    fn test_decode_element_and_text() {
        let json = r#"{"tag":"DIV","attrs":{"class":"a b"},"children":[{"text":"hi"}]}"#;
        let node = SnapshotNode::from_json(json);
        assert!(node.is_ok());
        if let Ok(node) = node {
            let root = &node;
            assert_eq!(root.tag(), Some("div".to_string()));
            assert_eq!(root.attribute("class"), Some("a b".to_string()));
            assert_eq!(root.child_nodes().len(), 1);
            assert!(root.shadow_children().is_none());
        }
    }

    #[test]
    fn test_decode_shadow_tree() {
        let json = r#"{"tag":"x-host","shadow":[{"tag":"p","children":[{"text":"inside"}]}]}"#;
        let node = SnapshotNode::from_json(json);
        assert!(matches!(node, Ok(ref n) if text_content(&n) == "inside"));
    }

    #[test]
    fn test_attributes_keep_source_order() {
        let json = r#"{"tag":"span","attrs":{"data-math":"x","class":"math-inline","aria-hidden":"true"}}"#;
        let node = SnapshotNode::from_json(json);
        let names: Vec<String> = node
            .as_ref()
            .map(|n| n.attributes().into_iter().map(|(name, _)| name).collect())
            .unwrap_or_default();
        assert_eq!(names, vec!["data-math", "class", "aria-hidden"]);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(SnapshotNode::from_json(r#"{"attrs":{}}"#).is_err());
        assert!(SnapshotNode::from_json("not json").is_err());
    }

    #[test]
    fn test_builder_matches_decoded() {
        let built = SnapshotNode::element("p").with_child(SnapshotNode::text("x"));
        let decoded = SnapshotNode::from_json(r#"{"tag":"p","children":[{"text":"x"}]}"#);
        assert!(matches!(decoded, Ok(ref d) if *d == built));
    }
}
