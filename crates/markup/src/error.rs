//! Markup tree error types.

use thiserror::Error;

/// Errors raised while assembling an element tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MarkupError {
    /// A structural description is malformed, e.g. it has no `name`.
    #[error("element config error: {details}")]
    Config { details: String },

    /// An add-child operation received something that is neither an element
    /// nor a structural description.
    #[error(
        "invalid child: expected an element node or an element description object, got {found}"
    )]
    InvalidInput { found: String },
}

impl MarkupError {
    /// Create the error raised when a description lacks its element name.
    pub fn missing_name() -> Self {
        Self::Config {
            details: "at least the 'name' must be set within the element description".to_string(),
        }
    }

    /// Create an invalid input error naming the kind of value received.
    pub fn invalid_input(found: impl Into<String>) -> Self {
        Self::InvalidInput {
            found: found.into(),
        }
    }
}

/// Result type alias using MarkupError.
pub type MarkupResult<T> = Result<T, MarkupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_name_mentions_field() {
        let msg = MarkupError::missing_name().to_string();
        assert!(msg.contains("'name'"));
    }

    #[test]
    fn invalid_input_names_kind() {
        let msg = MarkupError::invalid_input("a number").to_string();
        assert!(msg.contains("got a number"));
    }
}
