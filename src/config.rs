//! Bounds on exponential operations.
//!
//! Exact inference enumerates every world of the relevant variables and the
//! congruence check walks the power set of all outcomes. Both are guarded by
//! an `InferenceConfig` so an oversized query fails fast with
//! `InferenceError::LimitExceeded` instead of running for hours.

use serde::{Deserialize, Serialize};

use crate::error::InferenceError;

/// Enumeration limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Maximum number of variables whose worlds a network query enumerates.
    pub max_enumeration_variables: usize,

    /// Maximum number of outcomes (total configurations) in a congruence
    /// check. The check visits 4^n subset pairs.
    pub max_congruence_outcomes: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            max_enumeration_variables: 20,
            max_congruence_outcomes: 12,
        }
    }
}

impl InferenceConfig {
    /// Fails if enumerating `actual` variables would exceed the bound.
    pub(crate) fn check_enumeration(&self, actual: usize) -> Result<(), InferenceError> {
        if actual > self.max_enumeration_variables {
            return Err(InferenceError::LimitExceeded {
                limit: "enumeration_variables",
                max: self.max_enumeration_variables,
                actual,
            });
        }
        Ok(())
    }

    /// Fails if a congruence scan over `actual` outcomes would exceed the bound.
    pub(crate) fn check_congruence(&self, actual: usize) -> Result<(), InferenceError> {
        if actual > self.max_congruence_outcomes {
            return Err(InferenceError::LimitExceeded {
                limit: "congruence_outcomes",
                max: self.max_congruence_outcomes,
                actual,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = InferenceConfig::default();
        assert_eq!(cfg.max_enumeration_variables, 20);
        assert_eq!(cfg.max_congruence_outcomes, 12);
    }

    #[test]
    fn test_checks() {
        let cfg = InferenceConfig {
            max_enumeration_variables: 3,
            max_congruence_outcomes: 4,
        };
        assert!(cfg.check_enumeration(3).is_ok());
        assert!(cfg.check_enumeration(4).unwrap_err().is_limit());
        assert!(cfg.check_congruence(4).is_ok());
        assert!(cfg.check_congruence(5).is_err());
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let cfg: InferenceConfig =
            serde_json::from_str(r#"{"max_enumeration_variables": 8}"#).unwrap();
        assert_eq!(cfg.max_enumeration_variables, 8);
        assert_eq!(cfg.max_congruence_outcomes, 12);
    }
}
