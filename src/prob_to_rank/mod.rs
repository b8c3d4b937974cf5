//! Probability to ranking-function conversion.
//!
//! Implements the transformation of Giang and Shenoy, "On Transformations
//! between Probability and Spohnian Disbelief Functions" (1999), in two
//! forms: over the outcomes of a flat [`Distribution`] ([`convert`]) and over
//! the children of every sum node of an SPN ([`ProbToRankTransformer`]).
//! [`is_congruent`] checks the result against the source probabilities.

mod congruence;
mod transformer;

pub use congruence::{is_congruent, is_congruent_with, CongruenceReport, Violation};
pub use transformer::ProbToRankTransformer;

use tracing::debug;

use crate::distribution::Distribution;
use crate::error::ValidationError;
use crate::semiring::{ProbabilitySemiring, Rank, RankSemiring, Semiring, PROBABILITY, RANK};

/// Assigns ranks to outcomes with the given probabilities.
///
/// Outcomes are ordered by descending probability (stable for ties) and
/// returned in that order. Walking the list with the remaining mass `m`
/// (initially 1), each outcome gets the current rank, `m` drops by its
/// probability, and the rank grows by one whenever the outcome was more
/// probable than everything left after it.
///
/// Probabilities are compared with [`Semiring::approx_eq`], so outcomes
/// that tie within the normalization tolerance share a rank. Impossible
/// outcomes (probability 0 within the tolerance) get [`Rank::INFINITE`].
///
/// # Examples
///
/// ```
/// use rankwise::prob_to_rank::assign_ranks;
/// use rankwise::Rank;
///
/// let ranked = assign_ranks(vec![("rare", 0.1), ("common", 0.6), ("odd", 0.3), ("never", 0.0)]);
/// assert_eq!(
///     ranked,
///     vec![
///         ("common", Rank::new(0)),
///         ("odd", Rank::new(1)),
///         ("rare", Rank::new(2)),
///         ("never", Rank::INFINITE),
///     ]
/// );
/// ```
#[must_use]
pub fn assign_ranks<T>(mut outcomes: Vec<(T, f64)>) -> Vec<(T, Rank)> {
    outcomes.sort_by(|a, b| b.1.total_cmp(&a.1));
    let mut rank = 0;
    let mut remaining = 1.0;
    let mut previous: Option<(f64, Rank)> = None;
    outcomes
        .into_iter()
        .map(|(outcome, p)| {
            let assigned = match previous {
                _ if PROBABILITY.approx_eq(p, 0.0) => Rank::INFINITE,
                Some((q, tied)) if PROBABILITY.approx_eq(p, q) => tied,
                _ => Rank::new(rank),
            };
            remaining -= p;
            if p > remaining && !PROBABILITY.approx_eq(p, remaining) {
                rank += 1;
            }
            previous = Some((p, assigned));
            (outcome, assigned)
        })
        .collect()
}

/// Converts a probability distribution into a ranking function over the
/// same configurations. Entries keep the order of `dist`.
///
/// # Errors
///
/// Propagates `ValidationError` from building the result, which cannot
/// happen for a well-formed `dist`.
pub fn convert(
    dist: &Distribution<ProbabilitySemiring>,
) -> Result<Distribution<RankSemiring>, ValidationError> {
    let ranked = assign_ranks(dist.iter().enumerate().map(|(i, (_, p))| (i, p)).collect());
    let mut ranks = vec![Rank::INFINITE; dist.len()];
    for (i, rank) in ranked {
        ranks[i] = rank;
    }

    let mut result = Distribution::new(RANK, dist.vars().iter().cloned());
    for ((cfg, _), rank) in dist.iter().zip(ranks) {
        result.set(cfg.clone(), rank)?;
    }
    debug!(outcomes = result.len(), "converted probabilities to ranks");
    Ok(result)
}
