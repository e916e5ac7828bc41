//! Navigation tree descriptions and tree mutation helpers.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::acl::Policy;

/// One entry in a navigation tree.
///
/// Only entries with both `name` and `href` are rendered; everything else is
/// optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Link text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Link target: absolute (`/pages`), relative to the parent (`add`),
    /// external (`http…`, `mailto:`), or a fragment (`#`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,

    /// Nested entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,

    /// Access control gating this entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acl: Option<AclSpec>,

    /// Literal attributes for the generated link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<IndexMap<String, String>>,
}

impl NodeSpec {
    /// A renderable link entry.
    pub fn link(name: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            href: Some(href.into()),
            ..Self::default()
        }
    }

    pub fn with_children(mut self, children: Vec<NodeSpec>) -> Self {
        self.children = children;
        self
    }

    pub fn with_child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_acl(mut self, acl: AclSpec) -> Self {
        self.acl = Some(acl);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), value.into());
        self
    }
}

/// Access control metadata for a [`NodeSpec`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AclSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<String>,

    /// Dynamic policy; attached in code, never read from documents.
    #[serde(skip)]
    pub policy: Option<Policy>,
}

impl AclSpec {
    pub fn for_resource(resource: impl Into<String>) -> Self {
        Self {
            resource: Some(resource.into()),
            ..Self::default()
        }
    }

    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = Some(policy);
        self
    }
}

/// Insert `leaf` under every entry named `branch`.
///
/// With `position` set, only entries at that depth (0 = top level) match;
/// otherwise entries at any depth do. The leaf is appended, or prepended when
/// `prepend` is true. Returns a new tree; `tree` itself is left untouched.
/// The inserted copies of `leaf` are not searched themselves, so a leaf named
/// like its branch is inserted once per match rather than recursively.
pub fn insert_leaf(
    tree: &[NodeSpec],
    branch: &str,
    leaf: &NodeSpec,
    position: Option<usize>,
    prepend: bool,
) -> Vec<NodeSpec> {
    insert_at_depth(tree, branch, leaf, position, prepend, 0)
}

fn insert_at_depth(
    tree: &[NodeSpec],
    branch: &str,
    leaf: &NodeSpec,
    position: Option<usize>,
    prepend: bool,
    depth: usize,
) -> Vec<NodeSpec> {
    tree.iter()
        .map(|node| {
            let mut children =
                insert_at_depth(&node.children, branch, leaf, position, prepend, depth + 1);

            let at_position = position.is_none_or(|p| p == depth);
            if at_position && node.name.as_deref() == Some(branch) {
                if prepend {
                    children.insert(0, leaf.clone());
                } else {
                    children.push(leaf.clone());
                }
            }

            NodeSpec {
                name: node.name.clone(),
                href: node.href.clone(),
                children,
                acl: node.acl.clone(),
                attributes: node.attributes.clone(),
            }
        })
        .collect()
}
