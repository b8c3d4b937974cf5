//! Bayesian (and ranking) networks.
//!
//! A [`Network`] is an ordered collection of [`Cwt`]s, one per variable,
//! whose parent pointers form a DAG. Queries are answered exactly: the
//! network is first restricted to the queried variables plus their
//! ancestors, then every world of that subnetwork is enumerated.
//!
//! # Examples
//!
//! ```
//! use rankwise::{Configuration, Cwt, Network, PROBABILITY};
//!
//! let rain = Cwt::root(PROBABILITY, "rain")
//!     .with_entry(Configuration::new(), 0.2, 0.8)?;
//! let wet = Cwt::new(PROBABILITY, "wet", ["rain"])
//!     .with_entry(Configuration::singleton("rain", true), 0.9, 0.1)?
//!     .with_entry(Configuration::singleton("rain", false), 0.1, 0.9)?;
//!
//! let net = Network::new(PROBABILITY, vec![rain, wet])?;
//! let p = net.weight(&Configuration::singleton("wet", true))?;
//! assert!((p - 0.26).abs() < 1e-12);
//! # Ok::<(), rankwise::InferenceError>(())
//! ```

mod cwt;

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

pub use cwt::Cwt;

use crate::config::InferenceConfig;
use crate::configuration::{world_count, Configuration};
use crate::distribution::{Distribution, WeightedModel};
use crate::error::{InferenceResult, StructuralError, ValidationError};
use crate::semiring::Semiring;

/// A directed acyclic network of conditional weight tables.
#[derive(Debug, Clone)]
pub struct Network<S: Semiring> {
    semiring: S,
    cwts: Vec<Cwt<S>>,
    by_variable: HashMap<String, usize>,
    config: InferenceConfig,
}

impl<S: Semiring> Network<S> {
    /// Builds a network, validating that variables are unique, that every
    /// parent is itself a variable, and that the parent graph is acyclic.
    ///
    /// # Errors
    ///
    /// Returns `StructuralError::DuplicateVariable`,
    /// `StructuralError::MissingParent` or `StructuralError::Cycle`.
    pub fn new(semiring: S, cwts: Vec<Cwt<S>>) -> Result<Self, StructuralError> {
        let mut by_variable = HashMap::with_capacity(cwts.len());
        for (i, cwt) in cwts.iter().enumerate() {
            if by_variable.insert(cwt.variable().to_string(), i).is_some() {
                return Err(StructuralError::DuplicateVariable {
                    variable: cwt.variable().to_string(),
                });
            }
        }

        for cwt in &cwts {
            if let Some(parent) = cwt.parent_set().iter().find(|p| !by_variable.contains_key(*p)) {
                return Err(StructuralError::MissingParent {
                    variable: cwt.variable().to_string(),
                    parent: parent.clone(),
                });
            }
        }

        let network = Self {
            semiring,
            cwts,
            by_variable,
            config: InferenceConfig::default(),
        };
        network.check_acyclic()?;
        Ok(network)
    }

    /// Replaces the enumeration limits.
    #[must_use]
    pub fn with_config(mut self, config: InferenceConfig) -> Self {
        self.config = config;
        self
    }

    /// Enumeration limits used by queries.
    #[must_use]
    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Semiring of the network weights.
    #[must_use]
    pub fn semiring(&self) -> S {
        self.semiring
    }

    /// Colored depth-first search over parent edges.
    fn check_acyclic(&self) -> Result<(), StructuralError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            InProgress,
            Done,
        }

        fn visit<S: Semiring>(
            net: &Network<S>,
            i: usize,
            marks: &mut [Mark],
        ) -> Result<(), StructuralError> {
            match marks[i] {
                Mark::Done => return Ok(()),
                Mark::InProgress => {
                    return Err(StructuralError::Cycle {
                        variable: net.cwts[i].variable().to_string(),
                    })
                }
                Mark::Unvisited => {}
            }
            marks[i] = Mark::InProgress;
            for parent in net.cwts[i].parent_set() {
                visit(net, net.by_variable[parent], marks)?;
            }
            marks[i] = Mark::Done;
            Ok(())
        }

        let mut marks = vec![Mark::Unvisited; self.cwts.len()];
        for i in 0..self.cwts.len() {
            visit(self, i, &mut marks)?;
        }
        Ok(())
    }

    /// All tables in construction order.
    #[must_use]
    pub fn cwts(&self) -> &[Cwt<S>] {
        &self.cwts
    }

    /// Table of `variable`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownVariable` if the network has no such
    /// variable.
    pub fn cwt(&self, variable: &str) -> Result<&Cwt<S>, ValidationError> {
        self.by_variable
            .get(variable)
            .map(|&i| &self.cwts[i])
            .ok_or_else(|| ValidationError::UnknownVariable {
                variable: variable.to_string(),
            })
    }

    /// Tables of `vars`, in the order given.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownVariable` for the first unknown name.
    pub fn cwts_for<'a, I>(&self, vars: I) -> Result<Vec<&Cwt<S>>, ValidationError>
    where
        I: IntoIterator<Item = &'a String>,
    {
        vars.into_iter().map(|v| self.cwt(v)).collect()
    }

    /// All variables of the network.
    #[must_use]
    pub fn variables(&self) -> BTreeSet<String> {
        self.cwts.iter().map(|c| c.variable().to_string()).collect()
    }

    /// Number of tables (one per variable).
    #[must_use]
    pub fn len(&self) -> usize {
        self.cwts.len()
    }

    /// True for a network without tables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cwts.is_empty()
    }

    /// Parents of `variable`, sorted.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownVariable` for an unknown variable.
    pub fn parents(&self, variable: &str) -> Result<Vec<String>, ValidationError> {
        Ok(self.cwt(variable)?.parents())
    }

    /// Variables that list `variable` as a parent, in table order.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownVariable` for an unknown variable.
    pub fn children(&self, variable: &str) -> Result<Vec<String>, ValidationError> {
        self.cwt(variable)?;
        Ok(self
            .cwts
            .iter()
            .filter(|c| c.parent_set().contains(variable))
            .map(|c| c.variable().to_string())
            .collect())
    }

    /// Children, children of children, and so on.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownVariable` for an unknown variable.
    pub fn descendants(&self, variable: &str) -> Result<BTreeSet<String>, ValidationError> {
        let mut found = BTreeSet::new();
        for child in self.children(variable)? {
            if found.insert(child.clone()) {
                found.extend(self.descendants(&child)?);
            }
        }
        Ok(found)
    }

    /// True if `candidate` is a descendant of `variable`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownVariable` for an unknown variable.
    pub fn is_descendant(&self, candidate: &str, variable: &str) -> Result<bool, ValidationError> {
        Ok(self.descendants(variable)?.contains(candidate))
    }

    /// Variables that are not descendants of `variable` (including itself).
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownVariable` for an unknown variable.
    pub fn nondescendants(&self, variable: &str) -> Result<BTreeSet<String>, ValidationError> {
        let descendants = self.descendants(variable)?;
        Ok(self
            .variables()
            .into_iter()
            .filter(|v| !descendants.contains(v))
            .collect())
    }

    /// Parents, parents of parents, and so on.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownVariable` for an unknown variable.
    pub fn ancestors(&self, variable: &str) -> Result<BTreeSet<String>, ValidationError> {
        let mut found = BTreeSet::new();
        for parent in self.cwt(variable)?.parent_set() {
            if found.insert(parent.clone()) {
                found.extend(self.ancestors(parent)?);
            }
        }
        Ok(found)
    }

    /// Union of the ancestors of every variable in `vars`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownVariable` for an unknown variable.
    pub fn ancestors_of<'a, I>(&self, vars: I) -> Result<BTreeSet<String>, ValidationError>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut found = BTreeSet::new();
        for var in vars {
            found.extend(self.ancestors(var)?);
        }
        Ok(found)
    }

    /// The variable followed by its sorted parents.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownVariable` for an unknown variable.
    pub fn family(&self, variable: &str) -> Result<Vec<String>, ValidationError> {
        let cwt = self.cwt(variable)?;
        let mut family = vec![variable.to_string()];
        family.extend(cwt.parents());
        Ok(family)
    }

    /// Variables without parents.
    #[must_use]
    pub fn root_nodes(&self) -> Vec<String> {
        self.cwts
            .iter()
            .filter(|c| c.parent_set().is_empty())
            .map(|c| c.variable().to_string())
            .collect()
    }

    /// Variables that are nobody's parent.
    #[must_use]
    pub fn leaf_nodes(&self) -> Vec<String> {
        let parents: BTreeSet<&String> = self.cwts.iter().flat_map(|c| c.parent_set()).collect();
        self.cwts
            .iter()
            .filter(|c| !parents.contains(&c.variable().to_string()))
            .map(|c| c.variable().to_string())
            .collect()
    }

    /// Subnetwork over `vars` and all their ancestors, keeping table order.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownVariable` if some variable is not in
    /// the network.
    pub fn restrict<'a, I>(&self, vars: I) -> InferenceResult<Self>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let vars: Vec<&String> = vars.into_iter().collect();
        let mut relevant = self.ancestors_of(vars.iter().copied())?;
        for var in vars {
            self.cwt(var)?;
            relevant.insert(var.clone());
        }
        let cwts: Vec<Cwt<S>> = self
            .cwts
            .iter()
            .filter(|c| relevant.contains(c.variable()))
            .cloned()
            .collect();
        debug!(
            from = self.cwts.len(),
            to = cwts.len(),
            "restricted network to query variables and ancestors"
        );
        Ok(Self::new(self.semiring, cwts)?.with_config(self.config))
    }

    /// Weight of a total configuration: the semiring-product, over all
    /// tables, of the table variable's weight given its parents' values.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::VariableSetMismatch` unless `world` assigns
    /// exactly the network's variables, and `StructuralError::IncompleteTable`
    /// if a table is incomplete.
    pub fn joint_weight(&self, world: &Configuration) -> InferenceResult<S::Value> {
        let vars = self.variables();
        if !world.is_over(&vars) {
            return Err(ValidationError::VariableSetMismatch {
                expected: vars.into_iter().collect(),
                actual: world.variables().cloned().collect(),
            }
            .into());
        }
        self.product_over_tables(world)
    }

    fn product_over_tables(&self, world: &Configuration) -> InferenceResult<S::Value> {
        let mut w = self.semiring.one();
        for cwt in &self.cwts {
            let value = world
                .value(cwt.variable())
                .ok_or_else(|| ValidationError::UnknownVariable {
                    variable: cwt.variable().to_string(),
                })?;
            let parent_cfg = world.restrict(cwt.parent_set())?;
            w = self.semiring.product(w, cwt.weight(value, &parent_cfg)?);
        }
        Ok(w)
    }

    /// Exact weight of one (possibly partial) configuration.
    ///
    /// # Errors
    ///
    /// See [`Network::weight_of_any`].
    pub fn weight(&self, cfg: &Configuration) -> InferenceResult<S::Value> {
        self.weight_of_any(std::slice::from_ref(cfg))
    }

    /// Exact weight of the event "at least one of `cfgs` holds".
    ///
    /// Restricts the network to the mentioned variables and their ancestors,
    /// enumerates every world of the restriction, and sums the joint weights
    /// of the worlds consistent with some configuration in `cfgs`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownVariable` for a variable outside the
    /// network, `StructuralError::IncompleteTable` for an incomplete table,
    /// and `InferenceError::LimitExceeded` if the restriction has more
    /// variables than the configured enumeration bound.
    pub fn weight_of_any(&self, cfgs: &[Configuration]) -> InferenceResult<S::Value> {
        let mentioned: BTreeSet<String> = cfgs.iter().flat_map(Configuration::variables).cloned().collect();
        let relevant = self.restrict(&mentioned)?;
        let vars: Vec<String> = relevant.variables().into_iter().collect();
        self.config.check_enumeration(vars.len())?;
        debug!(variables = vars.len(), queries = cfgs.len(), "enumerating worlds");

        let contribution = |index: u64| -> InferenceResult<S::Value> {
            let world = Configuration::world(&vars, index);
            for cfg in cfgs {
                if world.is_consistent(cfg)? {
                    return relevant.product_over_tables(&world);
                }
            }
            Ok(self.semiring.zero())
        };

        self.sum_worlds(world_count(vars.len()), contribution)
    }

    #[cfg(not(feature = "parallel"))]
    fn sum_worlds<F>(&self, count: u64, contribution: F) -> InferenceResult<S::Value>
    where
        F: Fn(u64) -> InferenceResult<S::Value>,
    {
        let mut total = self.semiring.zero();
        for index in 0..count {
            total = self.semiring.sum(total, contribution(index)?);
        }
        Ok(total)
    }

    #[cfg(feature = "parallel")]
    fn sum_worlds<F>(&self, count: u64, contribution: F) -> InferenceResult<S::Value>
    where
        F: Fn(u64) -> InferenceResult<S::Value> + Sync + Send,
    {
        use rayon::prelude::*;

        let s = self.semiring;
        (0..count)
            .into_par_iter()
            .map(contribution)
            .try_reduce(|| s.zero(), |a, b| Ok(s.sum(a, b)))
    }

    /// The full joint distribution over all network variables.
    ///
    /// # Errors
    ///
    /// Returns `StructuralError::IncompleteTable` for an incomplete table and
    /// `InferenceError::LimitExceeded` if the network is larger than the
    /// enumeration bound.
    pub fn complete_distribution(&self) -> InferenceResult<Distribution<S>> {
        let vars = self.variables();
        self.config.check_enumeration(vars.len())?;
        let mut dist = Distribution::new(self.semiring, vars.iter().cloned());
        for world in Configuration::worlds(&vars) {
            let w = self.product_over_tables(&world)?;
            dist.set(world, w)?;
        }
        Ok(dist)
    }
}

impl<S: Semiring> WeightedModel for Network<S> {
    type Semiring = S;

    fn semiring(&self) -> S {
        self.semiring
    }

    fn variables(&self) -> BTreeSet<String> {
        Network::variables(self)
    }

    fn weight(&self, cfg: &Configuration) -> InferenceResult<S::Value> {
        Network::weight(self, cfg)
    }

    fn weight_of_any(&self, cfgs: &[Configuration]) -> InferenceResult<S::Value> {
        Network::weight_of_any(self, cfgs)
    }
}
