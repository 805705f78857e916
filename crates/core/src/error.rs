//! Error model for attribute-backed value objects.

use thiserror::Error;

/// Result type used across the crate.
pub type AttribsResult<T> = Result<T, AttribsError>;

/// Raised when a constructor mapping does not match the class's attribute names.
///
/// `missing` lists required names (no value, no default) in attribute order;
/// `unknown` lists supplied keys the class does not declare, in supplied order.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{class} attributes missing: {}, unknown: {}", symbol_list(.missing), symbol_list(.unknown))]
pub struct ValidationError {
    pub class: String,
    pub missing: Vec<String>,
    pub unknown: Vec<String>,
}

impl ValidationError {
    pub fn new(class: impl Into<String>, missing: Vec<String>, unknown: Vec<String>) -> Self {
        Self {
            class: class.into(),
            missing,
            unknown,
        }
    }
}

/// Crate-level error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AttribsError {
    /// The merged attribute mapping did not match the declared names.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// `append_to` targeted an attribute whose value is not a list.
    #[error("cannot append to `{attribute}`: value is {found}, not a list")]
    NotConcatenable {
        attribute: String,
        found: &'static str,
    },
}

impl AttribsError {
    pub fn not_concatenable(attribute: impl Into<String>, found: &'static str) -> Self {
        Self::NotConcatenable {
            attribute: attribute.into(),
            found,
        }
    }

    /// The validation details, if this is a validation failure.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            AttribsError::Validation(err) => Some(err),
            AttribsError::NotConcatenable { .. } => None,
        }
    }
}

fn symbol_list(names: &[String]) -> String {
    let rendered: Vec<String> = names.iter().map(|n| format!(":{n}")).collect();
    format!("[{}]", rendered.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_lists_missing_and_unknown_as_symbols() {
        let err = ValidationError::new("Widget", vec!["bar".into()], vec![]);
        assert_eq!(err.to_string(), "Widget attributes missing: [:bar], unknown: []");

        let err = ValidationError::new("Widget", vec!["a".into(), "b".into()], vec!["c".into()]);
        assert_eq!(err.to_string(), "Widget attributes missing: [:a, :b], unknown: [:c]");
    }

    #[test]
    fn crate_error_is_transparent_over_validation() {
        let err: AttribsError = ValidationError::new("X", vec![], vec!["foo".into()]).into();
        assert_eq!(err.to_string(), "X attributes missing: [], unknown: [:foo]");
        assert!(err.as_validation().is_some());
    }
}
