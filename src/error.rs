// Error types for template parsing and expansion

use thiserror::Error;

/// Malformed template text. Raised by the parser, never during expansion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Template syntax error at position {position}: {message}")]
pub struct TemplateSyntaxError {
    /// Byte offset into the template string
    pub position: usize,
    pub message: String,
}

impl TemplateSyntaxError {
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Failure while expanding an already parsed template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpandError {
    #[error("Unsupported value shape for variable '{name}': {reason}")]
    UnsupportedValueShape { name: String, reason: String },
}

impl ExpandError {
    pub(crate) fn unsupported(name: &str, reason: impl Into<String>) -> Self {
        ExpandError::UnsupportedValueShape {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Umbrella error for callers that parse and expand in one go
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] TemplateSyntaxError),

    #[error(transparent)]
    Expand(#[from] ExpandError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_message_includes_position() {
        let err = TemplateSyntaxError::new(7, "Unterminated expression");
        assert_eq!(
            err.to_string(),
            "Template syntax error at position 7: Unterminated expression"
        );
    }

    #[test]
    fn test_umbrella_error_is_transparent() {
        let err: Error = ExpandError::unsupported("keys", "nested map").into();
        assert_eq!(
            err.to_string(),
            "Unsupported value shape for variable 'keys': nested map"
        );
    }
}
