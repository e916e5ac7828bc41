//! The navigation façade.
//!
//! [`Nav`] owns a navigation tree, its render configuration, the access
//! control evaluator and the roles of the current request. The compiled
//! element tree is memoized: [`Nav::build`] compiles once, [`Nav::rebuild`]
//! resets the level counters and compiles again.

use std::fmt;
use std::sync::Arc;

use tracing::debug;
use trovato_markup::ElementNode;

use crate::acl::{AccessControl, Role, RoleSet};
use crate::builder::{BuildState, TreeBuilder};
use crate::config::RenderConfig;
use crate::error::NavResult;
use crate::tree::{NodeSpec, insert_leaf};

pub struct Nav {
    tree: Vec<NodeSpec>,
    config: RenderConfig,
    acl: Option<Arc<dyn AccessControl>>,
    roles: RoleSet,
    acl_strict: bool,
    return_false: bool,
    indent: Option<String>,
    base_url: Option<String>,
    current_path: Option<String>,
    state: BuildState,
    nav: Option<ElementNode>,
}

impl Nav {
    /// An empty navigation with the standard configuration.
    pub fn new() -> Self {
        Self {
            tree: Vec::new(),
            config: RenderConfig::standard(),
            acl: None,
            roles: RoleSet::new(),
            acl_strict: false,
            return_false: false,
            indent: None,
            base_url: None,
            current_path: None,
            state: BuildState::new(),
            nav: None,
        }
    }

    pub fn with_tree(tree: Vec<NodeSpec>) -> Self {
        let mut nav = Self::new();
        nav.set_tree(tree);
        nav
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.set_config(config);
        self
    }

    // -------------------------------------------------------------------------
    // Tree
    // -------------------------------------------------------------------------

    pub fn set_tree(&mut self, tree: Vec<NodeSpec>) -> &mut Self {
        self.tree = tree;
        self
    }

    pub fn tree(&self) -> &[NodeSpec] {
        &self.tree
    }

    /// Add a top-level entry at the end, or at the start when `prepend` is set.
    pub fn add_branch(&mut self, branch: NodeSpec, prepend: bool) -> &mut Self {
        self.add_branches(vec![branch], prepend)
    }

    /// Add several top-level entries, keeping their order.
    pub fn add_branches(&mut self, mut branches: Vec<NodeSpec>, prepend: bool) -> &mut Self {
        if prepend {
            branches.append(&mut self.tree);
            self.tree = branches;
        } else {
            self.tree.append(&mut branches);
        }
        self
    }

    /// Insert `leaf` under every entry named `branch`. See [`insert_leaf`].
    ///
    /// Resets both level counters. An already built tree is kept until
    /// [`Nav::rebuild`].
    pub fn add_leaf(
        &mut self,
        branch: &str,
        leaf: NodeSpec,
        position: Option<usize>,
        prepend: bool,
    ) -> &mut Self {
        self.tree = insert_leaf(&self.tree, branch, &leaf, position, prepend);
        self.state.reset();
        self
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Replace the render configuration. Its `indent` and `base_url`, when
    /// set, also replace the navigation's own.
    pub fn set_config(&mut self, config: RenderConfig) -> &mut Self {
        if let Some(indent) = &config.indent {
            self.indent = Some(indent.clone());
        }
        if let Some(base_url) = &config.base_url {
            self.base_url = Some(base_url.clone());
        }
        self.config = config;
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn set_indent(&mut self, indent: impl Into<String>) -> &mut Self {
        self.indent = Some(indent.into());
        self
    }

    pub fn indent(&self) -> Option<&str> {
        self.indent.as_deref()
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) -> &mut Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Request URI used for active-link styling; any query string is ignored.
    pub fn set_current_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.current_path = Some(path.into());
        self
    }

    pub fn current_path(&self) -> Option<&str> {
        self.current_path.as_deref()
    }

    pub fn set_return_false(&mut self, return_false: bool) -> &mut Self {
        self.return_false = return_false;
        self
    }

    pub fn is_return_false(&self) -> bool {
        self.return_false
    }

    // -------------------------------------------------------------------------
    // Access control
    // -------------------------------------------------------------------------

    pub fn set_acl(&mut self, acl: impl AccessControl + 'static) -> &mut Self {
        self.acl = Some(Arc::new(acl));
        self
    }

    pub fn acl(&self) -> Option<&dyn AccessControl> {
        self.acl.as_deref()
    }

    pub fn set_acl_strict(&mut self, strict: bool) -> &mut Self {
        self.acl_strict = strict;
        self
    }

    pub fn is_acl_strict(&self) -> bool {
        self.acl_strict
    }

    /// Register a role. A role with the same name replaces the existing one.
    pub fn add_role(&mut self, role: impl Into<Role>) -> &mut Self {
        self.roles.insert(role.into());
        self
    }

    pub fn add_roles<I, R>(&mut self, roles: I) -> &mut Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }

    pub fn has_roles(&self) -> bool {
        !self.roles.is_empty()
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.roles.contains(name)
    }

    pub fn role(&self, name: &str) -> Option<&Role> {
        self.roles.get(name)
    }

    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    // -------------------------------------------------------------------------
    // Level counters
    // -------------------------------------------------------------------------

    pub fn parent_level(&self) -> usize {
        self.state.parent_level
    }

    pub fn set_parent_level(&mut self, level: usize) -> &mut Self {
        self.state.parent_level = level;
        self
    }

    pub fn child_level(&self) -> usize {
        self.state.child_level
    }

    pub fn set_child_level(&mut self, level: usize) -> &mut Self {
        self.state.child_level = level;
        self
    }

    // -------------------------------------------------------------------------
    // Building and rendering
    // -------------------------------------------------------------------------

    /// Compile the tree unless it has already been compiled.
    pub fn build(&mut self) -> NavResult<&mut Self> {
        self.nav()?;
        Ok(self)
    }

    /// Reset the level counters and compile the tree again.
    pub fn rebuild(&mut self) -> NavResult<&mut Self> {
        self.state.reset();
        self.nav = Some(self.compile()?);
        Ok(self)
    }

    /// The compiled root element, building it first if needed.
    pub fn nav(&mut self) -> NavResult<&ElementNode> {
        let nav = match self.nav.take() {
            Some(nav) => nav,
            None => self.compile()?,
        };
        Ok(&*self.nav.insert(nav))
    }

    /// Render the compiled tree; an empty navigation renders as `""`.
    pub fn render(&mut self) -> NavResult<String> {
        let nav = self.nav()?;
        Ok(if nav.has_children() {
            nav.render()
        } else {
            String::new()
        })
    }

    fn compile(&mut self) -> NavResult<ElementNode> {
        let root = TreeBuilder::new(&self.config)
            .with_acl(self.acl.as_deref())
            .with_roles(&self.roles)
            .with_strict(self.acl_strict)
            .with_return_false(self.return_false)
            .with_base_url(self.base_url.as_deref())
            .with_indent(self.indent.as_deref())
            .with_current_path(self.current_path.as_deref())
            .build(&mut self.state, &self.tree)?;

        debug!(
            items = self.tree.len(),
            parent_level = self.state.parent_level,
            child_level = self.state.child_level,
            "navigation built"
        );
        Ok(root)
    }
}

impl Default for Nav {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Nav {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Nav")
            .field("tree", &self.tree)
            .field("config", &self.config)
            .field("acl", &self.acl.as_ref().map(|_| ".."))
            .field("roles", &self.roles)
            .field("acl_strict", &self.acl_strict)
            .field("state", &self.state)
            .field("built", &self.nav.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::acl::AccessList;
    use crate::config::NodeStyle;
    use crate::error::NavError;
    use crate::tree::AclSpec;

    fn pages() -> Vec<NodeSpec> {
        vec![
            NodeSpec::link("Pages", "/pages").with_children(vec![
                NodeSpec::link("Add Page", "add"),
                NodeSpec::link("Edit Page", "edit"),
            ]),
        ]
    }

    fn users() -> NodeSpec {
        NodeSpec::link("Users", "/users").with_children(vec![
            NodeSpec::link("Add User", "add"),
            NodeSpec::link("Edit User", "edit"),
        ])
    }

    #[test]
    fn new_uses_standard_config() {
        let nav = Nav::new();
        assert_eq!(nav.config(), &RenderConfig::standard());
        assert!(nav.tree().is_empty());
        assert_eq!((nav.parent_level(), nav.child_level()), (1, 1));
    }

    #[test]
    fn flags_and_settings() {
        let mut nav = Nav::new();
        nav.set_return_false(true)
            .set_indent("    ")
            .set_base_url("/home")
            .set_acl_strict(true)
            .set_current_path("/home?x=1");

        assert!(nav.is_return_false());
        assert!(nav.is_acl_strict());
        assert_eq!(nav.indent(), Some("    "));
        assert_eq!(nav.base_url(), Some("/home"));
        assert_eq!(nav.current_path(), Some("/home?x=1"));
    }

    #[test]
    fn set_config_copies_indent_and_base_url() {
        let mut nav = Nav::new();
        nav.set_base_url("/old");
        nav.set_config(RenderConfig {
            indent: Some("  ".into()),
            ..RenderConfig::default()
        });
        assert_eq!(nav.indent(), Some("  "));
        assert_eq!(nav.base_url(), Some("/old"));

        nav.set_config(RenderConfig {
            base_url: Some("/home".into()),
            ..RenderConfig::default()
        });
        assert_eq!(nav.base_url(), Some("/home"));
        assert_eq!(nav.indent(), Some("  "));
    }

    #[test]
    fn add_branch_appends_and_prepends() {
        let mut nav = Nav::with_tree(pages());
        nav.add_branch(users(), false);
        nav.add_branch(NodeSpec::link("Home", "/"), true);

        let names: Vec<_> = nav.tree().iter().filter_map(|n| n.name.as_deref()).collect();
        assert_eq!(names, ["Home", "Pages", "Users"]);
        assert!(nav.render().unwrap().contains("/users/add"));
    }

    #[test]
    fn add_leaf_then_rebuild() {
        let mut nav = Nav::with_tree(pages());
        nav.build().unwrap();
        nav.add_leaf("Pages", NodeSpec::link("Remove Page", "remove"), None, false);
        assert_eq!((nav.parent_level(), nav.child_level()), (1, 1));

        // Still memoized until rebuilt.
        assert!(!nav.render().unwrap().contains("/pages/remove"));

        nav.rebuild().unwrap();
        assert!(nav.render().unwrap().contains("/pages/remove"));
    }

    #[test]
    fn build_is_memoized() {
        let mut nav = Nav::with_tree(pages());
        nav.build().unwrap();
        let levels = (nav.parent_level(), nav.child_level());
        nav.build().unwrap();
        assert_eq!((nav.parent_level(), nav.child_level()), levels);

        nav.rebuild().unwrap();
        assert_eq!((nav.parent_level(), nav.child_level()), levels);
    }

    #[test]
    fn nav_returns_built_root() {
        let mut nav = Nav::with_tree(pages());
        let root = nav.nav().unwrap();
        assert_eq!(root.name(), "nav");
        assert!(root.has_children());
    }

    #[test]
    fn empty_navigation_renders_nothing() {
        let mut nav = Nav::new();
        assert_eq!(nav.render().unwrap(), "");
    }

    #[test]
    fn roles_are_keyed_by_name() {
        let mut nav = Nav::new();
        assert!(!nav.has_roles());
        nav.add_role("editor").add_roles(["reader", "editor"]);
        assert!(nav.has_roles());
        assert!(nav.has_role("reader"));
        assert_eq!(nav.roles().len(), 2);
        assert_eq!(nav.role("editor").map(Role::name), Some("editor"));
        assert!(nav.role("guest").is_none());
    }

    #[test]
    fn acl_gated_tree_with_editor_role() {
        let mut acl = AccessList::new();
        acl.allow_only("reader", "page", ["read"])
            .allow("editor", "page")
            .allow("editor", "user");

        let tree = vec![
            NodeSpec::link("Pages", "/pages").with_child(
                NodeSpec::link("Add Page", "add")
                    .with_acl(AclSpec::for_resource("page").with_permission("add")),
            ),
            NodeSpec::link("Users", "/users")
                .with_acl(AclSpec::for_resource("user"))
                .with_child(
                    NodeSpec::link("Edit User", "edit")
                        .with_acl(AclSpec::for_resource("user").with_permission("edit")),
                ),
        ];
        let config = RenderConfig {
            base_url: Some("/home".into()),
            top: Some(NodeStyle::default().with_id("main-nav")),
            ..RenderConfig::default()
        };

        let mut nav = Nav::with_tree(tree).with_config(config);
        nav.set_acl(acl).add_role("editor").set_current_path("/home");

        let menu = nav.render().unwrap();
        assert!(nav.acl().is_some());
        assert!(menu.contains("/home/pages/add"));
        assert!(menu.contains("/home/users/edit"));

        nav.set_acl_strict(true).add_role("reader");
        let strict = nav.rebuild().unwrap().render().unwrap();
        assert!(!strict.contains("/users"));
    }

    #[test]
    fn acl_without_evaluator_is_an_error() {
        let tree = vec![NodeSpec::link("Users", "/users").with_acl(AclSpec::for_resource("user"))];
        let mut nav = Nav::with_tree(tree);
        let err = nav.render().unwrap_err();
        assert!(matches!(err, NavError::AclNotConfigured { .. }));

        // A failed build leaves nothing memoized.
        nav.set_acl(AccessList::new());
        assert_eq!(nav.render().unwrap(), "");
    }
}
