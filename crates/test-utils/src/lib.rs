//! Trovato test utilities.
//!
//! Helpers for integration testing: sample navigation trees, access control
//! fixtures, render configurations and assertion utilities for generated
//! markup.

use std::sync::{Arc, Mutex};

use trovato_markup::ElementNode;
use trovato_nav::{AccessControl, AccessList, RoleSet};

/// A `Pages` branch with `Add Page` and `Edit Page` children.
pub fn pages_tree() -> serde_json::Value {
    serde_json::json!([
        {
            "name": "Pages",
            "href": "/pages",
            "children": [
                {"name": "Add Page", "href": "add"},
                {"name": "Edit Page", "href": "edit"}
            ]
        }
    ])
}

/// A `Users` branch with `Add User` and `Edit User` children.
pub fn users_branch() -> serde_json::Value {
    serde_json::json!({
        "name": "Users",
        "href": "/users",
        "children": [
            {"name": "Add User", "href": "add"},
            {"name": "Edit User", "href": "edit"}
        ]
    })
}

/// Pages and users, every entry gated on a `page` or `user` resource.
pub fn acl_tree() -> serde_json::Value {
    serde_json::json!([
        {
            "name": "Pages",
            "href": "/pages",
            "children": [
                {"name": "Add Page", "href": "add", "acl": {"resource": "page", "permission": "add"}},
                {"name": "Edit Page", "href": "edit", "acl": {"resource": "page", "permission": "edit"}}
            ]
        },
        {
            "name": "Users",
            "href": "/users",
            "acl": {"resource": "user"},
            "children": [
                {"name": "Add User", "href": "add", "acl": {"resource": "user", "permission": "add"}},
                {"name": "Edit User", "href": "edit", "acl": {"resource": "user", "permission": "edit"}}
            ]
        }
    ])
}

/// A configuration touching every option: base URL, on/off classes, styled
/// top/parent/child wrappers and an indent.
pub fn full_config() -> serde_json::Value {
    serde_json::json!({
        "baseUrl": "/home",
        "on": "link-on",
        "off": "link-off",
        "top": {
            "id": "main-nav",
            "class": "main-nav",
            "attributes": {"style": "display: block;"}
        },
        "parent": {
            "id": "top",
            "class": "top",
            "attributes": {"style": "display: block;"}
        },
        "child": {
            "id": "top",
            "class": "top",
            "attributes": {"style": "display: block;"}
        },
        "indent": "    "
    })
}

/// Readers may read pages; editors may do anything with pages and users.
pub fn editorial_acl() -> AccessList {
    let mut acl = AccessList::new();
    acl.add_role("reader")
        .add_role("editor")
        .allow_only("reader", "page", ["read"])
        .allow("editor", "page")
        .allow("editor", "user");
    acl
}

/// An evaluator that answers every question the same way.
#[derive(Debug, Clone, Copy)]
pub struct FixedAcl {
    pub allowed: bool,
}

impl FixedAcl {
    pub fn allow_all() -> Self {
        Self { allowed: true }
    }

    pub fn deny_all() -> Self {
        Self { allowed: false }
    }
}

impl AccessControl for FixedAcl {
    fn is_allowed(
        &self,
        _roles: &RoleSet,
        _resource: Option<&str>,
        _permission: Option<&str>,
        _strict: bool,
    ) -> bool {
        self.allowed
    }
}

/// One call received by a [`RecordingAcl`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclCall {
    pub roles: Vec<String>,
    pub resource: Option<String>,
    pub permission: Option<String>,
    pub strict: bool,
}

/// One policy result folded in by a [`RecordingAcl`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyCall {
    pub permission: Option<String>,
    pub policy_result: bool,
    pub resource: Option<String>,
}

/// Wraps an evaluator and records every check it answers.
///
/// Clones share the same log, so a test can keep one handle and hand the
/// other to the navigation.
#[derive(Clone)]
pub struct RecordingAcl<A> {
    inner: A,
    calls: Arc<Mutex<Vec<AclCall>>>,
    policy_calls: Arc<Mutex<Vec<PolicyCall>>>,
}

impl<A: AccessControl> RecordingAcl<A> {
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            calls: Arc::default(),
            policy_calls: Arc::default(),
        }
    }

    /// Static checks received so far, in order.
    pub fn calls(&self) -> Vec<AclCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Policy hook invocations so far, in order.
    pub fn policy_calls(&self) -> Vec<PolicyCall> {
        self.policy_calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl<A: AccessControl> AccessControl for RecordingAcl<A> {
    fn is_allowed(
        &self,
        roles: &RoleSet,
        resource: Option<&str>,
        permission: Option<&str>,
        strict: bool,
    ) -> bool {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(AclCall {
                roles: roles.names().map(str::to_string).collect(),
                resource: resource.map(str::to_string),
                permission: permission.map(str::to_string),
                strict,
            });
        }
        self.inner.is_allowed(roles, resource, permission, strict)
    }

    fn evaluate_policy(
        &self,
        permission: Option<&str>,
        policy_result: bool,
        resource: Option<&str>,
    ) -> bool {
        if let Ok(mut calls) = self.policy_calls.lock() {
            calls.push(PolicyCall {
                permission: permission.map(str::to_string),
                policy_result,
                resource: resource.map(str::to_string),
            });
        }
        self.inner.evaluate_policy(permission, policy_result, resource)
    }
}

/// Every `(href, text)` pair of the `a` elements under `node`, depth-first.
pub fn links(node: &ElementNode) -> Vec<(String, String)> {
    let mut found = Vec::new();
    collect_links(node, &mut found);
    found
}

fn collect_links(node: &ElementNode, found: &mut Vec<(String, String)>) {
    if node.name() == "a" {
        found.push((
            node.attribute("href").unwrap_or_default().to_string(),
            node.value().unwrap_or_default().to_string(),
        ));
    }
    for child in node.children() {
        collect_links(child, found);
    }
}

/// Assertion helpers for generated markup.
pub mod assert {
    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected markup to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected markup to NOT contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that the markup links to `href`.
    pub fn has_link(markup: &str, href: &str) {
        contains(markup, &format!("href=\"{href}\""));
    }

    /// Assert that the markup does not link to `href`.
    pub fn no_link(markup: &str, href: &str) {
        not_contains(markup, &format!("href=\"{href}\""));
    }
}
