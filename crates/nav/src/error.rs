//! Navigation error types.

use thiserror::Error;

/// Errors that can occur while loading or building a navigation tree.
///
/// A node that the access-control evaluator denies is not an error; it is
/// simply left out of the output.
#[derive(Debug, Error)]
pub enum NavError {
    /// A node carries ACL metadata but no evaluator is attached.
    #[error(
        "navigation node '{node}' declares an acl block but no access control evaluator is set"
    )]
    AclNotConfigured { node: String },

    /// A navigation document could not be read or parsed.
    #[error("navigation document {path}: {details}")]
    Document { path: String, details: String },

    /// A navigation document has an extension we cannot parse.
    #[error("navigation document {path}: unsupported format, expected .json, .yml, .yaml or .toml")]
    UnsupportedFormat { path: String },
}

impl NavError {
    /// Create an ACL-not-configured error for the named node.
    pub fn acl_not_configured(node: Option<&str>) -> Self {
        Self::AclNotConfigured {
            node: node.unwrap_or("<unnamed>").to_string(),
        }
    }

    /// Create a document error.
    pub fn document(path: impl Into<String>, details: impl ToString) -> Self {
        Self::Document {
            path: path.into(),
            details: details.to_string(),
        }
    }
}

/// Result type alias using NavError.
pub type NavResult<T> = Result<T, NavError>;
