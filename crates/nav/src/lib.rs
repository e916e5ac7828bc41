//! Trovato Navigation
//!
//! Compiles declarative menu trees into nested markup. Entries are filtered
//! by role-based access control, link targets are resolved against their
//! parents and a base URL, and the link matching the current request is
//! styled as active. The resulting element tree comes from `trovato-markup`.
//!
//! [`Nav`] is the usual entry point; [`TreeBuilder`] is the compiler it uses
//! and can be driven directly with an independent [`BuildState`].

pub mod acl;
pub mod builder;
pub mod config;
pub mod document;
pub mod error;
pub mod href;
pub mod nav;
pub mod tree;

pub use acl::{AccessControl, AccessList, Policy, Role, RoleSet};
pub use builder::{BuildState, TreeBuilder};
pub use config::{AccessConfig, GrantRule, NodeStyle, RenderConfig};
pub use document::{Format, NavDocument};
pub use error::{NavError, NavResult};
pub use nav::Nav;
pub use tree::{AclSpec, NodeSpec, insert_leaf};
