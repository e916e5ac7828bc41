//! Structural descriptions of element trees.
//!
//! An [`ElementSpec`] is the declarative form of an [`ElementNode`]: callers
//! can write it by hand, deserialize it from JSON/YAML/TOML, or mix it freely
//! with already-built nodes through [`NodeOrSpec`].

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::element::ElementNode;
use crate::error::{MarkupError, MarkupResult};

/// Declarative description of an element and its subtree.
///
/// `name` is optional here so that a malformed description can be represented
/// and rejected by [`ElementNode::from_spec`] rather than by the deserializer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSpec {
    /// Tag name (e.g., "nav", "a", "textarea").
    #[serde(default, alias = "nodeName", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Literal text content.
    #[serde(default, alias = "nodeValue", skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Attributes in output order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,

    /// Child descriptions or pre-built nodes, in output order.
    #[serde(default, alias = "childNodes", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeOrSpec>,

    /// Render children before the element's own text value.
    #[serde(default, alias = "childrenFirst", skip_serializing_if = "is_false")]
    pub children_first: bool,

    /// Explicit indentation, overriding the depth-derived default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent: Option<String>,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl ElementSpec {
    /// Start a description for the given tag name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<NodeOrSpec>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_children_first(mut self, first: bool) -> Self {
        self.children_first = first;
        self
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = Some(indent.into());
        self
    }
}

/// Either an already-built element or a description to be built on insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeOrSpec {
    Node(ElementNode),
    Spec(ElementSpec),
}

impl NodeOrSpec {
    /// Resolve into an element, running the factory for descriptions.
    pub fn into_node(self) -> MarkupResult<ElementNode> {
        match self {
            NodeOrSpec::Node(node) => Ok(node),
            NodeOrSpec::Spec(spec) => ElementNode::from_spec(spec),
        }
    }
}

impl From<ElementNode> for NodeOrSpec {
    fn from(node: ElementNode) -> Self {
        NodeOrSpec::Node(node)
    }
}

impl From<ElementSpec> for NodeOrSpec {
    fn from(spec: ElementSpec) -> Self {
        NodeOrSpec::Spec(spec)
    }
}

/// Dynamic input boundary: JSON objects are descriptions, anything else is
/// rejected with [`MarkupError::InvalidInput`].
impl TryFrom<Value> for NodeOrSpec {
    type Error = MarkupError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(_) => serde_json::from_value::<ElementSpec>(value)
                .map(NodeOrSpec::Spec)
                .map_err(|e| MarkupError::Config {
                    details: e.to_string(),
                }),
            other => Err(MarkupError::invalid_input(json_kind(&other))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// Built nodes serialize as their description; deserializing always yields a
// description.
impl Serialize for NodeOrSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NodeOrSpec::Node(node) => node.to_spec().serialize(serializer),
            NodeOrSpec::Spec(spec) => spec.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for NodeOrSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ElementSpec::deserialize(deserializer).map(NodeOrSpec::Spec)
    }
}
