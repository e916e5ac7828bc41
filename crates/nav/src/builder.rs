//! Tree builder: compiles a navigation tree into an element tree.
//!
//! The walk is depth-first. Each level produces one wrapper element; each
//! visible entry contributes a link, optionally wrapped in an item element
//! that may in turn hold the wrapper for the entry's children.
//!
//! Mutable counters live in [`BuildState`], which the caller owns and threads
//! through the walk. Independent builds therefore only need independent
//! states, never a shared builder.

use tracing::{debug, trace};
use trovato_markup::ElementNode;

use crate::acl::{AccessControl, RoleSet};
use crate::config::{DEFAULT_NODE, NodeStyle, RenderConfig};
use crate::error::{NavError, NavResult};
use crate::href::{is_active, is_placeholder, resolve_href};
use crate::tree::NodeSpec;

/// Attribute value that cancels navigation for placeholder links.
pub const SUPPRESS_CLICK: &str = "return false;";

/// Counters used to generate unique wrapper ids.
///
/// They never influence which entries are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildState {
    /// Incremented once per level entered.
    pub parent_level: usize,
    /// Incremented once per item wrapper created.
    pub child_level: usize,
}

impl BuildState {
    pub fn new() -> Self {
        Self {
            parent_level: 1,
            child_level: 1,
        }
    }

    /// Reset both counters to 1.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for BuildState {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only inputs of a build pass.
#[derive(Clone, Copy)]
pub struct TreeBuilder<'a> {
    config: &'a RenderConfig,
    acl: Option<&'a dyn AccessControl>,
    roles: Option<&'a RoleSet>,
    strict: bool,
    return_false: bool,
    base_url: Option<&'a str>,
    indent: Option<&'a str>,
    current_path: Option<&'a str>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self {
            config,
            acl: None,
            roles: None,
            strict: false,
            return_false: false,
            base_url: config.base_url.as_deref(),
            indent: config.indent.as_deref(),
            current_path: None,
        }
    }

    pub fn with_acl(mut self, acl: Option<&'a dyn AccessControl>) -> Self {
        self.acl = acl;
        self
    }

    pub fn with_roles(mut self, roles: &'a RoleSet) -> Self {
        self.roles = Some(roles);
        self
    }

    /// Require every role to be allowed instead of any one of them.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Mark placeholder (`#`) links so clicking them does nothing.
    pub fn with_return_false(mut self, return_false: bool) -> Self {
        self.return_false = return_false;
        self
    }

    pub fn with_base_url(mut self, base_url: Option<&'a str>) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_indent(mut self, indent: Option<&'a str>) -> Self {
        self.indent = indent;
        self
    }

    /// The request URI used for active-link styling.
    pub fn with_current_path(mut self, current_path: Option<&'a str>) -> Self {
        self.current_path = current_path;
        self
    }

    /// Build the element tree for `tree`, starting at depth 1.
    pub fn build(&self, state: &mut BuildState, tree: &[NodeSpec]) -> NavResult<ElementNode> {
        self.build_level(state, tree, 1, None)
    }

    /// Build one level of the tree and, recursively, everything below it.
    ///
    /// The returned wrapper may be empty; callers decide whether to render it.
    pub fn build_level(
        &self,
        state: &mut BuildState,
        tree: &[NodeSpec],
        depth: usize,
        parent_href: Option<&str>,
    ) -> NavResult<ElementNode> {
        let (mut wrapper, item_tag) = self.prepare(state, depth);
        state.parent_level += 1;

        for spec in tree {
            if !self.is_allowed(spec)? {
                trace!(node = ?spec.name, depth, "navigation node denied");
                continue;
            }
            let (Some(name), Some(href)) = (spec.name.as_deref(), spec.href.as_deref()) else {
                trace!(node = ?spec.name, depth, "navigation node missing name or href");
                continue;
            };

            let href = resolve_href(href, self.base_url, parent_href);
            let link = self.link(name, &href, spec);

            let Some(item_tag) = item_tag else {
                wrapper.push_child(link);
                continue;
            };

            let mut item = self.item(item_tag, state, depth);
            item.push_child(link);
            state.child_level += 1;

            if !spec.children.is_empty() {
                if self.children_allowed(&spec.children)? {
                    let nested = self.build_level(state, &spec.children, depth + 1, Some(&href))?;
                    if nested.has_children() || nested.value().is_some() {
                        item.push_child(nested);
                    }
                } else {
                    debug!(node = %name, depth, "nested navigation nodes suppressed");
                }
            }

            wrapper.push_child(item);
        }

        Ok(wrapper)
    }

    /// Create the wrapper for a level and resolve the item tag for its entries.
    ///
    /// Depth 1 uses the `top` style when configured, verbatim. Every other
    /// level uses the `parent` style with the level counter appended to the
    /// id and the depth appended to the class. Items are wrapped in the
    /// `child` tag, or in `nav` when the level wrapper itself is a `nav`.
    pub fn prepare(&self, state: &BuildState, depth: usize) -> (ElementNode, Option<&'a str>) {
        let top = if depth == 1 {
            self.config.top.as_ref()
        } else {
            None
        };
        let (style, numbered) = match top {
            Some(top) => (Some(top), false),
            None => (self.config.parent.as_ref(), true),
        };

        let tag = style.and_then(NodeStyle::tag).unwrap_or(DEFAULT_NODE);
        let item_tag = self
            .config
            .child_tag()
            .or((tag == DEFAULT_NODE).then_some(DEFAULT_NODE));

        let mut wrapper = ElementNode::new(tag);
        if let Some(indent) = self.indent {
            wrapper.set_indent(indent.repeat(depth));
        }

        if let Some(style) = style {
            if let Some(id) = &style.id {
                let id = if numbered {
                    format!("{id}-{}", state.parent_level)
                } else {
                    id.clone()
                };
                wrapper.set_attribute("id", id);
            }
            if let Some(class) = &style.class {
                let class = if numbered {
                    format!("{class}-{depth}")
                } else {
                    class.clone()
                };
                wrapper.set_attribute("class", class);
            }
            wrapper.set_attributes(&style.attributes);
        }

        (wrapper, item_tag)
    }

    /// Run the ACL gate for a single entry.
    ///
    /// Entries without an `acl` block are always allowed. With one, an
    /// evaluator must be attached; no registered roles means denied. A policy,
    /// when present, has the final say through the evaluator's policy hook.
    pub fn is_allowed(&self, spec: &NodeSpec) -> NavResult<bool> {
        let Some(acl) = &spec.acl else {
            return Ok(true);
        };
        let Some(evaluator) = self.acl else {
            return Err(NavError::acl_not_configured(spec.name.as_deref()));
        };
        let Some(roles) = self.roles.filter(|roles| !roles.is_empty()) else {
            return Ok(false);
        };

        let resource = acl.resource.as_deref();
        let permission = acl.permission.as_deref();
        let allowed = evaluator.is_allowed(roles, resource, permission, self.strict);

        Ok(match &acl.policy {
            Some(policy) => evaluator.evaluate_policy(permission, policy.evaluate(), resource),
            None => allowed,
        })
    }

    /// Whether a group of nested children may be built at all.
    ///
    /// Without registered roles, any gated child hides the whole group,
    /// ungated siblings included. Otherwise the group is hidden only when
    /// every child is denied.
    fn children_allowed(&self, children: &[NodeSpec]) -> NavResult<bool> {
        let has_roles = self.roles.is_some_and(|roles| !roles.is_empty());
        let mut denied = 0;
        for child in children {
            let allowed = self.is_allowed(child)?;
            if child.acl.is_some() && !has_roles {
                return Ok(false);
            }
            if !allowed {
                denied += 1;
            }
        }
        Ok(denied < children.len())
    }

    fn link(&self, name: &str, href: &str, spec: &NodeSpec) -> ElementNode {
        let mut link = ElementNode::new("a")
            .with_value(name)
            .with_attribute("href", href);

        if self.return_false && is_placeholder(href) {
            link.set_attribute("onclick", SUPPRESS_CLICK);
        }

        let class = self.link_class(href);
        match &spec.attributes {
            Some(attributes) => {
                for (attribute, value) in attributes {
                    match class {
                        Some(class) if attribute == "class" => {
                            link.set_attribute(attribute, format!("{value} {class}"));
                        }
                        _ => {
                            link.set_attribute(attribute, value);
                        }
                    }
                }
            }
            None => {
                if let Some(class) = class {
                    link.set_attribute("class", class);
                }
            }
        }

        link
    }

    fn link_class(&self, href: &str) -> Option<&'a str> {
        if is_active(href, self.current_path) {
            self.config.on.as_deref()
        } else {
            self.config.off.as_deref()
        }
    }

    fn item(&self, tag: &str, state: &BuildState, depth: usize) -> ElementNode {
        let mut item = ElementNode::new(tag);
        if let Some(style) = &self.config.child {
            if let Some(id) = &style.id {
                item.set_attribute("id", format!("{id}-{}", state.child_level));
            }
            if let Some(class) = &style.class {
                item.set_attribute("class", format!("{class}-{depth}"));
            }
            item.set_attributes(&style.attributes);
        }
        item
    }
}
