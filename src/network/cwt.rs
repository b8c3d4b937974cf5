//! Conditional weight tables.
//!
//! A CWT stores, for one variable, a weight distribution over its two values
//! for every configuration of its parents. With the probability semiring it
//! is a conditional probability table; with the rank semiring a conditional
//! ranking table.

use std::collections::{BTreeMap, BTreeSet};

use crate::configuration::Configuration;
use crate::distribution::Distribution;
use crate::error::{sorted_names, InferenceResult, StructuralError, ValidationError};
use crate::semiring::Semiring;

/// Conditional weight table of one variable.
#[derive(Debug, Clone)]
pub struct Cwt<S: Semiring> {
    semiring: S,
    variable: String,
    parents: BTreeSet<String>,
    table: BTreeMap<Configuration, Distribution<S>>,
}

impl<S: Semiring> Cwt<S> {
    /// Creates an empty table for `variable` given `parents`.
    pub fn new<I, P>(semiring: S, variable: impl Into<String>, parents: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            semiring,
            variable: variable.into(),
            parents: parents.into_iter().map(Into::into).collect(),
            table: BTreeMap::new(),
        }
    }

    /// Creates an empty table for a variable without parents.
    pub fn root(semiring: S, variable: impl Into<String>) -> Self {
        Self::new(semiring, variable, std::iter::empty::<String>())
    }

    /// The variable this table defines.
    #[must_use]
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Parent variables in sorted order.
    #[must_use]
    pub fn parents(&self) -> Vec<String> {
        self.parents.iter().cloned().collect()
    }

    /// Parent variables as a set.
    #[must_use]
    pub fn parent_set(&self) -> &BTreeSet<String> {
        &self.parents
    }

    /// Semiring of the table weights.
    #[must_use]
    pub fn semiring(&self) -> S {
        self.semiring
    }

    fn check_parent_config(&self, parent_cfg: &Configuration) -> Result<(), ValidationError> {
        if parent_cfg.is_over(&self.parents) {
            Ok(())
        } else {
            Err(ValidationError::ParentMismatch {
                variable: self.variable.clone(),
                expected: sorted_names(&self.parents),
                actual: sorted_names(parent_cfg.variables()),
            })
        }
    }

    /// Sets the weights of `true` and `false` for `parent_cfg`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ParentMismatch` unless `parent_cfg` assigns
    /// exactly the parents.
    pub fn set_entry(
        &mut self,
        parent_cfg: Configuration,
        true_weight: S::Value,
        false_weight: S::Value,
    ) -> Result<(), ValidationError> {
        let dist = Distribution::singleton(self.semiring, self.variable.clone(), true_weight, false_weight);
        self.set_distribution(parent_cfg, dist)
    }

    /// Sets the weight distribution of the variable for `parent_cfg`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ParentMismatch` for a wrong parent
    /// configuration and `ValidationError::WrongDistributionVariables` unless
    /// `dist` is over exactly this table's variable.
    pub fn set_distribution(
        &mut self,
        parent_cfg: Configuration,
        dist: Distribution<S>,
    ) -> Result<(), ValidationError> {
        self.check_parent_config(&parent_cfg)?;
        if dist.vars().len() != 1 || !dist.vars().contains(&self.variable) {
            return Err(ValidationError::WrongDistributionVariables {
                variable: self.variable.clone(),
                actual: sorted_names(dist.vars()),
            });
        }
        self.table.insert(parent_cfg, dist);
        Ok(())
    }

    /// Builder form of [`Cwt::set_entry`].
    ///
    /// # Errors
    ///
    /// Same as [`Cwt::set_entry`].
    pub fn with_entry(
        mut self,
        parent_cfg: Configuration,
        true_weight: S::Value,
        false_weight: S::Value,
    ) -> Result<Self, ValidationError> {
        self.set_entry(parent_cfg, true_weight, false_weight)?;
        Ok(self)
    }

    /// Number of parent configurations a complete table holds.
    #[must_use]
    pub fn expected_entries(&self) -> usize {
        1usize
            .checked_shl(u32::try_from(self.parents.len()).unwrap_or(u32::MAX))
            .unwrap_or(usize::MAX)
    }

    /// True iff every parent configuration has an entry.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.table.len() == self.expected_entries()
    }

    /// Parent configurations without an entry.
    pub fn missing_entries(&self) -> Vec<Configuration> {
        Configuration::worlds(&self.parents)
            .filter(|cfg| !self.table.contains_key(cfg))
            .collect()
    }

    /// Stored `(parent configuration, distribution)` entries.
    pub fn entries(&self) -> impl Iterator<Item = (&Configuration, &Distribution<S>)> + '_ {
        self.table.iter()
    }

    /// Weight of `value` for the variable given `parent_cfg`.
    ///
    /// # Errors
    ///
    /// Returns `StructuralError::IncompleteTable` if any parent configuration
    /// is missing, and `ValidationError::ParentMismatch` for a wrong parent
    /// configuration.
    pub fn weight(&self, value: bool, parent_cfg: &Configuration) -> InferenceResult<S::Value> {
        if !self.is_complete() {
            return Err(StructuralError::IncompleteTable {
                variable: self.variable.clone(),
                present: self.table.len(),
                expected: self.expected_entries(),
            }
            .into());
        }
        self.check_parent_config(parent_cfg)?;
        let dist = self.table.get(parent_cfg).ok_or_else(|| StructuralError::IncompleteTable {
            variable: self.variable.clone(),
            present: self.table.len(),
            expected: self.expected_entries(),
        })?;
        Ok(dist.weight(&Configuration::singleton(self.variable.clone(), value))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semiring::{Rank, PROBABILITY, RANK};

    #[test]
    fn test_root_table_complete_after_one_entry() {
        let mut t = Cwt::root(PROBABILITY, "b");
        assert!(!t.is_complete());
        t.set_entry(Configuration::new(), 0.001, 0.999).unwrap();
        assert!(t.is_complete());
        assert!((t.weight(true, &Configuration::new()).unwrap() - 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_completeness_requires_all_parent_configs() {
        let mut t = Cwt::new(PROBABILITY, "a", ["b", "e"]);
        assert_eq!(t.expected_entries(), 4);
        t.set_entry(Configuration::from([("b", true), ("e", true)]), 0.95, 0.05).unwrap();
        t.set_entry(Configuration::from([("b", true), ("e", false)]), 0.94, 0.06).unwrap();
        t.set_entry(Configuration::from([("b", false), ("e", true)]), 0.29, 0.71).unwrap();
        assert!(!t.is_complete());
        assert_eq!(t.missing_entries(), vec![Configuration::from([("b", false), ("e", false)])]);

        let err = t
            .weight(true, &Configuration::from([("b", true), ("e", true)]))
            .unwrap_err();
        assert!(err.is_structural());

        // Overwriting an existing entry does not count twice.
        t.set_entry(Configuration::from([("b", true), ("e", true)]), 0.9, 0.1).unwrap();
        assert!(!t.is_complete());

        t.set_entry(Configuration::from([("b", false), ("e", false)]), 0.001, 0.999).unwrap();
        assert!(t.is_complete());
        assert!(t.missing_entries().is_empty());
    }

    #[test]
    fn test_parent_mismatch_rejected() {
        let mut t = Cwt::new(PROBABILITY, "j", ["a"]);
        let err = t
            .set_entry(Configuration::singleton("b", true), 0.9, 0.1)
            .unwrap_err();
        assert!(matches!(err, ValidationError::ParentMismatch { .. }));

        t.set_entry(Configuration::singleton("a", true), 0.9, 0.1).unwrap();
        t.set_entry(Configuration::singleton("a", false), 0.05, 0.95).unwrap();
        let err = t.weight(true, &Configuration::new()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_distribution_over_wrong_variable_rejected() {
        let mut t = Cwt::root(RANK, "h");
        let dist = Distribution::singleton(RANK, "x", Rank::new(0), Rank::new(1));
        let err = t.set_distribution(Configuration::new(), dist).unwrap_err();
        assert!(matches!(err, ValidationError::WrongDistributionVariables { .. }));
    }

    #[test]
    fn test_parents_sorted() {
        let t: Cwt<_> = Cwt::new(RANK, "s", ["f", "b"]);
        assert_eq!(t.parents(), vec!["b".to_string(), "f".to_string()]);
    }
}
