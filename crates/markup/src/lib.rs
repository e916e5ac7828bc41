//! Trovato Markup
//!
//! A small, dependency-light element tree used to emit server-side markup.
//! Nodes carry ordered attributes, optional text, and owned children, and
//! serialize themselves with depth-based indentation. Nothing is escaped:
//! callers are responsible for escaping untrusted names and attribute values.

pub mod element;
pub mod error;
pub mod spec;

pub use element::{ElementNode, INDENT_UNIT};
pub use error::{MarkupError, MarkupResult};
pub use spec::{ElementSpec, NodeOrSpec};
