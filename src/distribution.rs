//! Weighted sets of configurations.
//!
//! [`WeightedModel`] is the common read interface of everything that assigns
//! weights to configurations (flat distributions, networks, SPNs).
//! [`Distribution`] is the explicit table form: full configurations over a
//! fixed variable set mapped to weights, with partial configurations
//! marginalized lazily on lookup.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::configuration::Configuration;
use crate::error::{sorted_names, InferenceResult, ValidationError};
use crate::semiring::Semiring;

/// Anything that maps configurations to semiring weights.
pub trait WeightedModel {
    /// Semiring of the weights.
    type Semiring: Semiring;

    /// The semiring instance in use.
    fn semiring(&self) -> Self::Semiring;

    /// Variables over which this model is defined.
    fn variables(&self) -> BTreeSet<String>;

    /// Weight of one configuration.
    fn weight(&self, cfg: &Configuration) -> InferenceResult<<Self::Semiring as Semiring>::Value>;

    /// Weight of a set of configurations.
    ///
    /// The default sums individual weights, which is exact when the
    /// configurations are pairwise disjoint events (e.g. distinct total
    /// configurations).
    fn weight_of_any(
        &self,
        cfgs: &[Configuration],
    ) -> InferenceResult<<Self::Semiring as Semiring>::Value> {
        let s = self.semiring();
        let mut total = s.zero();
        for cfg in cfgs {
            total = s.sum(total, self.weight(cfg)?);
        }
        Ok(total)
    }
}

/// Explicit weight table over a fixed variable set.
///
/// Entries keep insertion order; lookup of a stored configuration is a hash
/// probe.
#[derive(Debug, Clone)]
pub struct Distribution<S: Semiring> {
    semiring: S,
    vars: BTreeSet<String>,
    entries: Vec<(Configuration, S::Value)>,
    index: HashMap<Configuration, usize>,
}

impl<S: Semiring> Distribution<S> {
    /// Creates an empty distribution over `vars`.
    pub fn new<I, V>(semiring: S, vars: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            semiring,
            vars: vars.into_iter().map(Into::into).collect(),
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Distribution over a single variable.
    pub fn singleton(
        semiring: S,
        variable: impl Into<String>,
        true_weight: S::Value,
        false_weight: S::Value,
    ) -> Self {
        let variable = variable.into();
        let mut dist = Self::new(semiring, [variable.clone()]);
        dist.put(Configuration::singleton(variable.clone(), true), true_weight);
        dist.put(Configuration::singleton(variable, false), false_weight);
        dist
    }

    fn put(&mut self, cfg: Configuration, weight: S::Value) {
        if let Some(&i) = self.index.get(&cfg) {
            self.entries[i].1 = weight;
        } else {
            self.index.insert(cfg.clone(), self.entries.len());
            self.entries.push((cfg, weight));
        }
    }

    /// Stores the weight of a full configuration, replacing any earlier value.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::VariableSetMismatch` unless `cfg` assigns
    /// exactly this distribution's variables.
    pub fn set(&mut self, cfg: Configuration, weight: S::Value) -> Result<(), ValidationError> {
        if !cfg.is_over(&self.vars) {
            return Err(ValidationError::VariableSetMismatch {
                expected: sorted_names(&self.vars),
                actual: sorted_names(cfg.variables()),
            });
        }
        self.put(cfg, weight);
        Ok(())
    }

    /// Weight of `cfg`: the stored weight for a full configuration, otherwise
    /// the semiring-sum of every stored configuration consistent with it.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NotASubset` if `cfg` assigns variables
    /// outside this distribution.
    pub fn weight(&self, cfg: &Configuration) -> Result<S::Value, ValidationError> {
        let missing: Vec<String> = cfg
            .variables()
            .filter(|v| !self.vars.contains(*v))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::NotASubset {
                context: "distribution variables".to_string(),
                missing,
            });
        }
        if let Some(&i) = self.index.get(cfg) {
            return Ok(self.entries[i].1);
        }
        let mut total = self.semiring.zero();
        for (stored, w) in &self.entries {
            if stored.is_consistent(cfg)? {
                total = self.semiring.sum(total, *w);
            }
        }
        Ok(total)
    }

    /// Semiring-sum of all stored weights.
    pub fn normalization_factor(&self) -> S::Value {
        self.semiring.sum_all(self.entries.iter().map(|(_, w)| *w))
    }

    /// True if the stored weights sum to `one()`.
    pub fn is_normalized(&self) -> bool {
        self.semiring
            .approx_eq(self.normalization_factor(), self.semiring.one())
    }

    /// Marginal distribution onto `vars`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NotASubset` if `vars` is not a subset of
    /// this distribution's variables.
    pub fn restrict<'a, I>(&self, vars: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let target: BTreeSet<String> = vars.into_iter().cloned().collect();
        let missing: Vec<String> = target.difference(&self.vars).cloned().collect();
        if !missing.is_empty() {
            return Err(ValidationError::NotASubset {
                context: "distribution variables".to_string(),
                missing,
            });
        }
        let mut marginal = Self::new(self.semiring, target.iter().cloned());
        for (cfg, w) in &self.entries {
            let projected = cfg.restrict(&target)?;
            let acc = match marginal.index.get(&projected) {
                Some(&i) => self.semiring.sum(marginal.entries[i].1, *w),
                None => *w,
            };
            marginal.put(projected, acc);
        }
        Ok(marginal)
    }

    /// Stored configurations in insertion order.
    pub fn configurations(&self) -> impl Iterator<Item = &Configuration> + '_ {
        self.entries.iter().map(|(c, _)| c)
    }

    /// Stored `(configuration, weight)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Configuration, S::Value)> + '_ {
        self.entries.iter().map(|(c, w)| (c, *w))
    }

    /// Variables every entry is over.
    #[must_use]
    pub fn vars(&self) -> &BTreeSet<String> {
        &self.vars
    }

    /// Number of entries set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no entry has been set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Semiring> WeightedModel for Distribution<S> {
    type Semiring = S;

    fn semiring(&self) -> S {
        self.semiring
    }

    fn variables(&self) -> BTreeSet<String> {
        self.vars.clone()
    }

    fn weight(&self, cfg: &Configuration) -> InferenceResult<S::Value> {
        Ok(Distribution::weight(self, cfg)?)
    }
}

impl<S: Semiring> fmt::Display for Distribution<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (cfg, w) in &self.entries {
            writeln!(f, "{cfg}: {w}")?;
        }
        Ok(())
    }
}
