//! Error types for rankwise.
//!
//! All errors are strongly typed using thiserror. Validation errors mark a
//! caller handing in operands that do not fit the receiver (wrong variable
//! sets, unknown names). Structural errors mark a model whose shape makes the
//! requested computation meaningless (cycles, incomplete tables).

use thiserror::Error;

/// Argument errors: configuration or variable-set mismatches.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Variable set mismatch: expected {expected:?}, got {actual:?}")]
    VariableSetMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Variables {missing:?} are not part of {context}")]
    NotASubset {
        context: String,
        missing: Vec<String>,
    },

    #[error("Unknown variable '{variable}'")]
    UnknownVariable {
        variable: String,
    },

    #[error("Parent configuration for '{variable}' must assign exactly {expected:?}, got {actual:?}")]
    ParentMismatch {
        variable: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Distribution for '{variable}' must be over exactly that variable, got {actual:?}")]
    WrongDistributionVariables {
        variable: String,
        actual: Vec<String>,
    },

    #[error("Rational number with zero denominator")]
    ZeroDenominator,

    #[error("Rational arithmetic overflows 128 bits")]
    RationalOverflow,

    #[error("Unknown SPN node {id}")]
    UnknownNode {
        id: usize,
    },

    #[error("SPN node {id} is a {actual} node, expected a {expected} node")]
    NodeKindMismatch {
        id: usize,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Transformer returned node {id}, which is not one of the converted children")]
    ForeignChild {
        id: usize,
    },
}

/// Model-shape errors.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("Variable '{variable}' is defined by more than one table")]
    DuplicateVariable {
        variable: String,
    },

    #[error("Parent '{parent}' of '{variable}' is not a variable of the network")]
    MissingParent {
        variable: String,
        parent: String,
    },

    #[error("Cycle detected through variable '{variable}'")]
    Cycle {
        variable: String,
    },

    #[error("Table for '{variable}' is incomplete: {present} of {expected} parent configurations set")]
    IncompleteTable {
        variable: String,
        present: usize,
        expected: usize,
    },

    #[error("Adding node {child} below node {parent} would create a cycle")]
    SpnCycle {
        parent: usize,
        child: usize,
    },
}

/// Top-level error type for rankwise.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Structural error: {0}")]
    Structural(#[from] StructuralError),

    #[error("Limit exceeded: {limit} (max: {max}, actual: {actual})")]
    LimitExceeded {
        limit: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl InferenceError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a structural error.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(self, Self::Structural(_))
    }

    /// Returns true if an enumeration bound was hit.
    #[must_use]
    pub const fn is_limit(&self) -> bool {
        matches!(self, Self::LimitExceeded { .. })
    }
}

/// Result type alias for inference operations.
pub type InferenceResult<T> = Result<T, InferenceError>;

pub(crate) fn sorted_names<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut v: Vec<String> = names.into_iter().cloned().collect();
    v.sort();
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_mismatch_message() {
        let err = ValidationError::VariableSetMismatch {
            expected: vec!["a".to_string(), "b".to_string()],
            actual: vec!["a".to_string()],
        };
        let msg = format!("{err}");
        assert!(msg.contains("mismatch"));
        assert!(msg.contains("\"b\""));
    }

    #[test]
    fn test_structural_error_incomplete() {
        let err = StructuralError::IncompleteTable {
            variable: "a".to_string(),
            present: 3,
            expected: 4,
        };
        let msg = format!("{err}");
        assert!(msg.contains("3 of 4"));
    }

    #[test]
    fn test_inference_error_from_validation() {
        let err: InferenceError = ValidationError::UnknownVariable {
            variable: "x".to_string(),
        }
        .into();
        assert!(err.is_validation());
        assert!(!err.is_structural());
    }

    #[test]
    fn test_inference_error_from_structural() {
        let err: InferenceError = StructuralError::Cycle {
            variable: "a".to_string(),
        }
        .into();
        assert!(err.is_structural());
        assert!(format!("{err}").contains("Cycle"));
    }

    #[test]
    fn test_limit_exceeded() {
        let err = InferenceError::LimitExceeded {
            limit: "enumeration_variables",
            max: 20,
            actual: 25,
        };
        assert!(err.is_limit());
        let msg = format!("{err}");
        assert!(msg.contains("20"));
        assert!(msg.contains("25"));
    }

    #[test]
    fn test_internal() {
        let err = InferenceError::internal("unexpected state");
        assert!(!err.is_validation());
        assert!(format!("{err}").contains("unexpected state"));
    }
}
