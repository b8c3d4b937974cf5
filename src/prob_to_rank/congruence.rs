//! Congruence of a probability function and a ranking function.
//!
//! Following definition 1 of Giang and Shenoy, the two are congruent when for
//! all events A and B over the same outcomes, `P(A) >= P(B)` implies
//! `k(A) <= k(B)`. Events are subsets of the total configurations, so the
//! scan visits every pair of the 2^n subsets of the 2^v outcomes.

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::InferenceConfig;
use crate::configuration::{world_count, Configuration};
use crate::distribution::WeightedModel;
use crate::error::{sorted_names, InferenceError, InferenceResult, ValidationError};
use crate::semiring::{ProbabilitySemiring, Rank, RankSemiring, Semiring, PROBABILITY, RANK};

/// A pair of events on which the two functions disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Event A, with `P(A) >= P(B)` but `k(A) > k(B)`.
    pub a: Vec<Configuration>,
    /// Event B.
    pub b: Vec<Configuration>,
    /// `P(A)`.
    pub p_a: f64,
    /// `P(B)`.
    pub p_b: f64,
    /// `k(A)`.
    pub k_a: Rank,
    /// `k(B)`.
    pub k_b: Rank,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let event = |cfgs: &[Configuration]| {
            cfgs.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(
            f,
            "A = [{}], B = [{}], P(A) = {}, P(B) = {}, k(A) = {}, k(B) = {}",
            event(&self.a),
            event(&self.b),
            self.p_a,
            self.p_b,
            self.k_a,
            self.k_b
        )
    }
}

/// Outcome of a congruence check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CongruenceReport {
    /// No pair of events is ordered differently.
    Congruent,
    /// The first violating pair found.
    Violation(Violation),
}

impl CongruenceReport {
    /// True if no violation was found.
    #[must_use]
    pub fn is_congruent(&self) -> bool {
        matches!(self, Self::Congruent)
    }

    /// The violating pair, if any.
    #[must_use]
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Self::Congruent => None,
            Self::Violation(v) => Some(v),
        }
    }
}

/// [`is_congruent_with`] under the default limits.
///
/// # Errors
///
/// See [`is_congruent_with`].
pub fn is_congruent<P, R>(pf: &P, rf: &R) -> InferenceResult<CongruenceReport>
where
    P: WeightedModel<Semiring = ProbabilitySemiring>,
    R: WeightedModel<Semiring = RankSemiring>,
{
    is_congruent_with(&InferenceConfig::default(), pf, rf)
}

/// Checks whether the probability function `pf` and the ranking function
/// `rf` order all events the same way.
///
/// Probabilities within the normalization tolerance count as equal.
///
/// # Errors
///
/// Returns `ValidationError::VariableSetMismatch` if the two models are over
/// different variables, `InferenceError::LimitExceeded` if there are more
/// outcomes than `config.max_congruence_outcomes`, and any error of the
/// models' weight lookups.
pub fn is_congruent_with<P, R>(
    config: &InferenceConfig,
    pf: &P,
    rf: &R,
) -> InferenceResult<CongruenceReport>
where
    P: WeightedModel<Semiring = ProbabilitySemiring>,
    R: WeightedModel<Semiring = RankSemiring>,
{
    let vars = pf.variables();
    let rank_vars = rf.variables();
    if vars != rank_vars {
        return Err(ValidationError::VariableSetMismatch {
            expected: sorted_names(&vars),
            actual: sorted_names(&rank_vars),
        }
        .into());
    }

    let count = usize::try_from(world_count(vars.len())).unwrap_or(usize::MAX);
    config.check_congruence(count)?;
    let addressable = usize::BITS as usize - 1;
    if count > addressable {
        return Err(InferenceError::LimitExceeded {
            limit: "congruence_outcomes",
            max: addressable,
            actual: count,
        });
    }
    let outcomes: Vec<Configuration> = Configuration::worlds(&vars).collect();

    let mut p = Vec::with_capacity(outcomes.len());
    let mut k = Vec::with_capacity(outcomes.len());
    for outcome in &outcomes {
        p.push(pf.weight(outcome)?);
        k.push(rf.weight(outcome)?);
    }

    let (p_events, k_events) = event_weights(&p, &k);
    debug!(outcomes = outcomes.len(), events = p_events.len(), "checking congruence");

    let Some((a, b)) = first_violation(&p_events, &k_events) else {
        return Ok(CongruenceReport::Congruent);
    };
    let violation = Violation {
        a: members(&outcomes, a),
        b: members(&outcomes, b),
        p_a: p_events[a],
        p_b: p_events[b],
        k_a: k_events[a],
        k_b: k_events[b],
    };
    warn!(%violation, "probability and ranking functions are not congruent");
    Ok(CongruenceReport::Violation(violation))
}

/// Weights of every event, indexed by the bitmask of its outcomes.
fn event_weights(p: &[f64], k: &[Rank]) -> (Vec<f64>, Vec<Rank>) {
    let events = 1usize << p.len();
    let mut p_events = vec![PROBABILITY.zero(); events];
    let mut k_events = vec![RANK.zero(); events];
    for mask in 1..events {
        let lowest = mask.trailing_zeros() as usize;
        let rest = mask & (mask - 1);
        p_events[mask] = PROBABILITY.sum(p_events[rest], p[lowest]);
        k_events[mask] = RANK.sum(k_events[rest], k[lowest]);
    }
    (p_events, k_events)
}

fn at_least(a: f64, b: f64) -> bool {
    a > b || PROBABILITY.approx_eq(a, b)
}

fn violation_in_row(a: usize, p: &[f64], k: &[Rank]) -> Option<(usize, usize)> {
    (0..p.len())
        .find(|&b| at_least(p[a], p[b]) && k[a] > k[b])
        .map(|b| (a, b))
}

#[cfg(not(feature = "parallel"))]
fn first_violation(p: &[f64], k: &[Rank]) -> Option<(usize, usize)> {
    (0..p.len()).find_map(|a| violation_in_row(a, p, k))
}

#[cfg(feature = "parallel")]
fn first_violation(p: &[f64], k: &[Rank]) -> Option<(usize, usize)> {
    use rayon::prelude::*;

    (0..p.len())
        .into_par_iter()
        .find_map_first(|a| violation_in_row(a, p, k))
}

fn members(outcomes: &[Configuration], mask: usize) -> Vec<Configuration> {
    outcomes
        .iter()
        .enumerate()
        .filter(|(i, _)| (mask >> i) & 1 == 1)
        .map(|(_, cfg)| cfg.clone())
        .collect()
}
