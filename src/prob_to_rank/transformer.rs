use super::assign_ranks;
use crate::semiring::{ProbabilitySemiring, Rank, RankSemiring, RANK};
use crate::spn::{NodeId, SpnTransformer};

/// Turns a probability SPN into a ranking SPN of the same shape.
///
/// The edge weights of each sum node are replaced by ranks assigned with
/// [`assign_ranks`], and the children are reordered from most to least
/// probable. Indicators and product nodes are copied.
///
/// # Examples
///
/// ```
/// use rankwise::prob_to_rank::ProbToRankTransformer;
/// use rankwise::{Configuration, Rank, SpnBuilder, PROBABILITY};
///
/// let mut b = SpnBuilder::new(PROBABILITY);
/// let t = b.indicator("x", true);
/// let f = b.indicator("x", false);
/// let root = b.sum_of([(t, 0.2), (f, 0.8)])?;
/// let ranks = b.build(root)?.convert(&ProbToRankTransformer)?;
///
/// assert_eq!(ranks.weight(&Configuration::singleton("x", false))?, Rank::new(0));
/// assert_eq!(ranks.weight(&Configuration::singleton("x", true))?, Rank::new(1));
/// # Ok::<(), rankwise::InferenceError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbToRankTransformer;

impl SpnTransformer<ProbabilitySemiring, RankSemiring> for ProbToRankTransformer {
    fn target(&self) -> RankSemiring {
        RANK
    }

    fn transform_sum(&self, children: Vec<(NodeId, f64)>) -> Vec<(NodeId, Rank)> {
        assign_ranks(children)
    }
}
