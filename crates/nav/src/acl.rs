//! Access control seam for navigation nodes.
//!
//! The builder never decides access itself: it hands the registered roles and
//! a node's resource/permission pair to an [`AccessControl`] evaluator.
//! [`AccessList`] is the bundled in-memory evaluator; applications with their
//! own permission service implement the trait instead.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

/// An opaque named identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Role {
    name: String,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Roles keyed by name, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSet {
    roles: IndexMap<String, Role>,
}

impl RoleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a role. A role with the same name is replaced in place.
    pub fn insert(&mut self, role: Role) {
        self.roles.insert(role.name.clone(), role);
    }

    pub fn get(&self, name: &str) -> Option<&Role> {
        self.roles.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.roles.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.roles.keys().map(String::as_str)
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<Role> for RoleSet {
    fn extend<I: IntoIterator<Item = Role>>(&mut self, iter: I) {
        for role in iter {
            self.insert(role);
        }
    }
}

/// Evaluates whether a set of roles may see a resource.
pub trait AccessControl: Send + Sync {
    /// Static decision. `strict` requires every role to be allowed; otherwise
    /// any single allowed role is enough.
    fn is_allowed(
        &self,
        roles: &RoleSet,
        resource: Option<&str>,
        permission: Option<&str>,
        strict: bool,
    ) -> bool;

    /// Fold a dynamic policy result into a final decision. The returned value
    /// replaces the static decision.
    fn evaluate_policy(
        &self,
        permission: Option<&str>,
        policy_result: bool,
        resource: Option<&str>,
    ) -> bool {
        let _ = (permission, resource);
        policy_result
    }
}

/// A dynamic access policy attached to a node.
///
/// Either a zero-argument callable or a callable paired with the positional
/// arguments it is invoked with.
#[derive(Clone)]
pub struct Policy {
    check: Arc<dyn Fn() -> bool + Send + Sync>,
}

impl Policy {
    pub fn new<F>(check: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            check: Arc::new(check),
        }
    }

    pub fn with_args<F>(check: F, args: Vec<Value>) -> Self
    where
        F: Fn(&[Value]) -> bool + Send + Sync + 'static,
    {
        Self::new(move || check(&args))
    }

    pub fn evaluate(&self) -> bool {
        (self.check)()
    }
}

impl fmt::Debug for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Policy(..)")
    }
}

// Policies are opaque; two policies are equal only if they share a callable.
impl PartialEq for Policy {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.check, &other.check)
    }
}

/// Permissions granted or denied on one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Grant {
    All,
    Only(HashSet<String>),
}

impl Grant {
    fn covers(&self, permission: Option<&str>) -> bool {
        match (self, permission) {
            (Grant::All, _) => true,
            (Grant::Only(set), Some(permission)) => set.contains(permission),
            (Grant::Only(_), None) => false,
        }
    }

    fn widen(&mut self, permissions: Option<HashSet<String>>) {
        match (self, permissions) {
            (Grant::All, _) => {}
            (grant, None) => *grant = Grant::All,
            (Grant::Only(existing), Some(more)) => existing.extend(more),
        }
    }
}

type RuleTable = HashMap<String, HashMap<String, Grant>>;

/// In-memory role/resource/permission rules.
///
/// - A role must be registered (explicitly or through a rule) to be allowed
///   anything.
/// - A check without a resource only asks whether the role is registered.
/// - Deny rules win over allow rules.
/// - A rule without a permission list covers every permission.
#[derive(Debug, Clone, Default)]
pub struct AccessList {
    roles: HashSet<String>,
    allowed: RuleTable,
    denied: RuleTable,
}

impl AccessList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_role(&mut self, role: impl Into<String>) -> &mut Self {
        self.roles.insert(role.into());
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Allow every permission on `resource`.
    pub fn allow(&mut self, role: &str, resource: &str) -> &mut Self {
        self.add_rule(Rule::Allow, role, resource, None)
    }

    /// Allow only the listed permissions on `resource`.
    pub fn allow_only<I, S>(&mut self, role: &str, resource: &str, permissions: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let permissions = permissions.into_iter().map(Into::into).collect();
        self.add_rule(Rule::Allow, role, resource, Some(permissions))
    }

    /// Deny every permission on `resource`.
    pub fn deny(&mut self, role: &str, resource: &str) -> &mut Self {
        self.add_rule(Rule::Deny, role, resource, None)
    }

    /// Deny only the listed permissions on `resource`.
    pub fn deny_only<I, S>(&mut self, role: &str, resource: &str, permissions: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let permissions = permissions.into_iter().map(Into::into).collect();
        self.add_rule(Rule::Deny, role, resource, Some(permissions))
    }

    fn add_rule(
        &mut self,
        rule: Rule,
        role: &str,
        resource: &str,
        permissions: Option<HashSet<String>>,
    ) -> &mut Self {
        self.roles.insert(role.to_string());
        let table = match rule {
            Rule::Allow => &mut self.allowed,
            Rule::Deny => &mut self.denied,
        };
        let resources = table.entry(role.to_string()).or_default();
        match resources.get_mut(resource) {
            Some(grant) => grant.widen(permissions),
            None => {
                let grant = permissions.map_or(Grant::All, Grant::Only);
                resources.insert(resource.to_string(), grant);
            }
        }
        self
    }

    /// Decision for a single role.
    pub fn is_role_allowed(
        &self,
        role: &str,
        resource: Option<&str>,
        permission: Option<&str>,
    ) -> bool {
        if !self.roles.contains(role) {
            return false;
        }
        let Some(resource) = resource else {
            return true;
        };

        let lookup = |table: &RuleTable| {
            table
                .get(role)
                .and_then(|resources| resources.get(resource))
                .is_some_and(|grant| grant.covers(permission))
        };

        !lookup(&self.denied) && lookup(&self.allowed)
    }
}

#[derive(Clone, Copy)]
enum Rule {
    Allow,
    Deny,
}

impl AccessControl for AccessList {
    fn is_allowed(
        &self,
        roles: &RoleSet,
        resource: Option<&str>,
        permission: Option<&str>,
        strict: bool,
    ) -> bool {
        if roles.is_empty() {
            return false;
        }
        let mut names = roles.names();
        if strict {
            names.all(|role| self.is_role_allowed(role, resource, permission))
        } else {
            names.any(|role| self.is_role_allowed(role, resource, permission))
        }
    }
}
