//! Render configuration for navigation trees.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::acl::AccessList;

/// Tag name used for wrappers when the configuration does not name one.
pub const DEFAULT_NODE: &str = "nav";

/// Styling for one kind of generated wrapper element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStyle {
    /// Tag name (default: "nav").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,

    /// Id prefix; a level counter is appended for parent and child wrappers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Class prefix; the depth is appended for parent and child wrappers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    /// Extra literal attributes.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
}

impl NodeStyle {
    pub fn node(tag: impl Into<String>) -> Self {
        Self {
            node: Some(tag.into()),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// The configured tag name.
    pub fn tag(&self) -> Option<&str> {
        self.node.as_deref()
    }
}

/// How a navigation tree is turned into markup.
///
/// `RenderConfig::default()` leaves everything unset; [`RenderConfig::standard`]
/// is what a navigation gets when no configuration is supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Outermost wrapper (depth 1 only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<NodeStyle>,

    /// Wrapper around each group of items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeStyle>,

    /// Wrapper around each individual item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child: Option<NodeStyle>,

    /// Class for the link matching the current request path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<String>,

    /// Class for every other link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub off: Option<String>,

    /// Indent unit for generated wrappers, repeated once per depth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent: Option<String>,

    /// Prefix for absolute (`/…`) link targets.
    #[serde(
        default,
        alias = "baseUrl",
        alias = "base-url",
        skip_serializing_if = "Option::is_none"
    )]
    pub base_url: Option<String>,
}

impl RenderConfig {
    /// Every wrapper is a `nav` element and nothing else is styled.
    pub fn standard() -> Self {
        Self {
            top: Some(NodeStyle::node(DEFAULT_NODE)),
            parent: Some(NodeStyle::node(DEFAULT_NODE)),
            child: Some(NodeStyle::node(DEFAULT_NODE)),
            ..Self::default()
        }
    }

    pub fn child_tag(&self) -> Option<&str> {
        self.child.as_ref().and_then(NodeStyle::tag)
    }
}

/// Rules for the bundled [`AccessList`] evaluator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Require every active role to be allowed.
    #[serde(default)]
    pub strict: bool,

    /// Roles known to the access list.
    #[serde(default)]
    pub roles: Vec<String>,

    /// Roles the current request acts as.
    #[serde(default)]
    pub active: Vec<String>,

    #[serde(default)]
    pub allow: Vec<GrantRule>,

    #[serde(default)]
    pub deny: Vec<GrantRule>,
}

/// A single allow or deny rule. No `permissions` means all permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantRule {
    pub role: String,
    pub resource: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

impl AccessConfig {
    /// Build the access list these rules describe.
    pub fn to_access_list(&self) -> AccessList {
        let mut acl = AccessList::new();
        for role in &self.roles {
            acl.add_role(role.as_str());
        }
        for rule in &self.allow {
            match &rule.permissions {
                Some(permissions) => acl.allow_only(&rule.role, &rule.resource, permissions),
                None => acl.allow(&rule.role, &rule.resource),
            };
        }
        for rule in &self.deny {
            match &rule.permissions {
                Some(permissions) => acl.deny_only(&rule.role, &rule.resource, permissions),
                None => acl.deny(&rule.role, &rule.resource),
            };
        }
        acl
    }
}
