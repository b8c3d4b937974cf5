//! Boolean assignments to named variables.
//!
//! A `Configuration` maps each of its variables to exactly one truth value.
//! It is value-like: the combinators return new configurations and leave the
//! receiver untouched. `restrict` and `is_consistent` are the validation
//! choke-point reused by every higher-level query.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{InferenceError, InferenceResult, ValidationError};

/// A partial assignment of boolean values to variables.
///
/// # Examples
///
/// ```
/// use rankwise::Configuration;
///
/// let cfg = Configuration::new().with("a", true).with("b", false);
/// assert_eq!(cfg.value("a"), Some(true));
/// assert_eq!(cfg.to_string(), "{(a:T)(b:F)}");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    values: BTreeMap<String, bool>,
}

impl Configuration {
    /// Creates the empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration over one variable.
    #[must_use]
    pub fn singleton(variable: impl Into<String>, value: bool) -> Self {
        let mut cfg = Self::new();
        cfg.insert(variable, value);
        cfg
    }

    /// Sets `variable` in place. Intended for building a configuration before
    /// it is handed to a model.
    pub fn insert(&mut self, variable: impl Into<String>, value: bool) {
        self.values.insert(variable.into(), value);
    }

    /// Returns a copy extended with one more assignment.
    #[must_use]
    pub fn with(&self, variable: impl Into<String>, value: bool) -> Self {
        let mut cfg = self.clone();
        cfg.insert(variable, value);
        cfg
    }

    /// Returns a copy extended with all assignments of `other`.
    ///
    /// Where both assign a variable, `other`'s value wins.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        let mut cfg = self.clone();
        cfg.values
            .extend(other.values.iter().map(|(k, v)| (k.clone(), *v)));
        cfg
    }

    /// Value of `variable`, if assigned.
    #[must_use]
    pub fn value(&self, variable: &str) -> Option<bool> {
        self.values.get(variable).copied()
    }

    /// True if `variable` is assigned.
    #[must_use]
    pub fn has_variable(&self, variable: &str) -> bool {
        self.values.contains_key(variable)
    }

    /// Assigned variables in sorted order.
    pub fn variables(&self) -> impl Iterator<Item = &String> + '_ {
        self.values.keys()
    }

    /// Assigned variables as an owned set.
    #[must_use]
    pub fn variable_set(&self) -> BTreeSet<String> {
        self.values.keys().cloned().collect()
    }

    /// True if the assigned variables are exactly `vars`.
    #[must_use]
    pub fn is_over(&self, vars: &BTreeSet<String>) -> bool {
        self.values.len() == vars.len() && self.values.keys().all(|v| vars.contains(v))
    }

    /// Iterates `(variable, value)` pairs in variable order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, bool)> + '_ {
        self.values.iter().map(|(k, v)| (k, *v))
    }

    /// Number of assigned variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True for the empty configuration.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Projects onto `vars`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NotASubset` if some of `vars` are not
    /// assigned by this configuration.
    pub fn restrict<'a, I>(&self, vars: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut values = BTreeMap::new();
        let mut missing = Vec::new();
        for var in vars {
            match self.values.get(var) {
                Some(v) => {
                    values.insert(var.clone(), *v);
                }
                None => missing.push(var.clone()),
            }
        }
        if !missing.is_empty() {
            missing.sort();
            return Err(ValidationError::NotASubset {
                context: format!("configuration {self}"),
                missing,
            });
        }
        Ok(Self { values })
    }

    /// True iff every variable of `other` has the same value here.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownVariable` if `other` assigns a
    /// variable this configuration does not.
    pub fn is_consistent(&self, other: &Self) -> Result<bool, ValidationError> {
        let mut consistent = true;
        for (var, value) in &other.values {
            match self.values.get(var) {
                None => {
                    return Err(ValidationError::UnknownVariable {
                        variable: var.clone(),
                    })
                }
                Some(v) if v != value => consistent = false,
                Some(_) => {}
            }
        }
        Ok(consistent)
    }

    /// The `index`-th total configuration over `vars` in enumeration order:
    /// bit `i` of `index` is the value of `vars[i]`. Variables past the 64th
    /// have no bit in `index` and are always false.
    #[must_use]
    pub fn world(vars: &[String], index: u64) -> Self {
        let values = vars
            .iter()
            .enumerate()
            .map(|(i, var)| (var.clone(), bit(index, i)))
            .collect();
        Self { values }
    }

    /// All 2^n total configurations over `vars`, starting all-false with the
    /// first variable toggling fastest.
    pub fn worlds(vars: &BTreeSet<String>) -> impl Iterator<Item = Self> {
        let ordered: Vec<String> = vars.iter().cloned().collect();
        let count = world_count(ordered.len());
        (0..count).map(move |i| Self::world(&ordered, i))
    }

    /// Every total configuration of every subset of `vars`.
    ///
    /// # Errors
    ///
    /// Same as [`power_set`].
    pub fn all_partial(vars: &BTreeSet<String>) -> InferenceResult<Vec<Self>> {
        let ordered: Vec<String> = vars.iter().cloned().collect();
        Ok(power_set(&ordered)?
            .into_iter()
            .flat_map(|subset| {
                let subset: BTreeSet<String> = subset.into_iter().collect();
                Self::worlds(&subset).collect::<Vec<_>>()
            })
            .collect())
    }
}

fn bit(mask: u64, i: usize) -> bool {
    u32::try_from(i)
        .ok()
        .and_then(|i| mask.checked_shr(i))
        .is_some_and(|shifted| shifted & 1 == 1)
}

/// Number of total configurations over `n` variables, saturating at `u64::MAX`.
#[must_use]
pub fn world_count(n: usize) -> u64 {
    if n < 64 {
        1u64 << n
    } else {
        u64::MAX
    }
}

/// All subsets of `items`, in bitmask order (the empty set first).
///
/// The caller bounds `items`; the result has 2^n entries.
///
/// # Errors
///
/// Returns `InferenceError::LimitExceeded` for 64 or more items, whose
/// subsets cannot be addressed by a `u64` mask.
pub fn power_set<T: Clone>(items: &[T]) -> InferenceResult<Vec<Vec<T>>> {
    let n = items.len();
    let max = u64::BITS as usize - 1;
    if n > max {
        return Err(InferenceError::LimitExceeded {
            limit: "power_set_items",
            max,
            actual: n,
        });
    }
    Ok((0..world_count(n))
        .map(|mask| {
            items
                .iter()
                .enumerate()
                .filter(|(i, _)| bit(mask, *i))
                .map(|(_, item)| item.clone())
                .collect()
        })
        .collect())
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (var, value) in &self.values {
            write!(f, "({var}:{})", if *value { "T" } else { "F" })?;
        }
        write!(f, "}}")
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for Configuration {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<S: Into<String>, const N: usize> From<[(S, bool); N]> for Configuration {
    fn from(pairs: [(S, bool); N]) -> Self {
        pairs.into_iter().collect()
    }
}
