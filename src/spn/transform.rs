//! Structure-preserving rewrites of an SPN into another semiring.

use std::collections::BTreeSet;

use tracing::debug;

use super::builder::SpnBuilder;
use super::node::{NodeId, SpnNode};
use super::Spn;
use crate::error::{InferenceResult, ValidationError};
use crate::semiring::Semiring;

/// Rewrites nodes of an `Spn<S>` into nodes of an `Spn<T>`.
///
/// [`Spn::convert`] walks the source bottom-up. Each hook receives the
/// handles of the already converted children (handles in the target SPN) and
/// returns the children of the new node. Hooks may reorder, reweight or drop
/// children, but may only return handles they were given.
pub trait SpnTransformer<S: Semiring, T: Semiring> {
    /// Semiring of the produced SPN.
    fn target(&self) -> T;

    /// Variable and value of the converted indicator.
    fn transform_indicator(&self, variable: &str, value: bool) -> (String, bool) {
        (variable.to_string(), value)
    }

    /// Weighted children of the converted sum node.
    fn transform_sum(&self, children: Vec<(NodeId, S::Value)>) -> Vec<(NodeId, T::Value)>;

    /// Children of the converted product node.
    fn transform_product(&self, children: Vec<NodeId>) -> Vec<NodeId> {
        children
    }
}

struct Converter<'a, S: Semiring, T: Semiring, X: ?Sized> {
    source: &'a Spn<S>,
    transformer: &'a X,
    target: SpnBuilder<T>,
    converted: Vec<Option<NodeId>>,
}

fn check_returned<I>(given: &BTreeSet<NodeId>, returned: I) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = NodeId>,
{
    match returned.into_iter().find(|id| !given.contains(id)) {
        Some(id) => Err(ValidationError::ForeignChild { id: id.0 }),
        None => Ok(()),
    }
}

impl<S, T, X> Converter<'_, S, T, X>
where
    S: Semiring,
    T: Semiring,
    X: SpnTransformer<S, T> + ?Sized,
{
    fn convert(&mut self, id: NodeId) -> InferenceResult<NodeId> {
        if let Some(done) = self.converted[id.0] {
            return Ok(done);
        }
        let source = self.source;
        let new_id = match &source.nodes[id.0] {
            SpnNode::Indicator { variable, value } => {
                let (variable, value) = self.transformer.transform_indicator(variable, *value);
                self.target.indicator(variable, value)
            }
            SpnNode::Sum { children } => {
                let mut given = Vec::with_capacity(children.len());
                for (child, w) in children {
                    given.push((self.convert(*child)?, *w));
                }
                let allowed: BTreeSet<NodeId> = given.iter().map(|(c, _)| *c).collect();
                let returned = self.transformer.transform_sum(given);
                check_returned(&allowed, returned.iter().map(|(c, _)| *c))?;
                self.target.sum_of(returned)?
            }
            SpnNode::Product { children } => {
                let mut given = Vec::with_capacity(children.len());
                for child in children {
                    given.push(self.convert(*child)?);
                }
                let allowed: BTreeSet<NodeId> = given.iter().copied().collect();
                let returned = self.transformer.transform_product(given);
                check_returned(&allowed, returned.iter().copied())?;
                self.target.product_of(returned)?
            }
        };
        self.converted[id.0] = Some(new_id);
        Ok(new_id)
    }
}

impl<S: Semiring> Spn<S> {
    /// Rebuilds this SPN over another semiring with `transformer`.
    ///
    /// Only nodes reachable from the root are converted, each exactly once,
    /// so shared sub-networks stay shared.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ForeignChild` if a hook returns a handle it
    /// was not given.
    pub fn convert<T, X>(&self, transformer: &X) -> InferenceResult<Spn<T>>
    where
        T: Semiring,
        X: SpnTransformer<S, T> + ?Sized,
    {
        let mut converter = Converter {
            source: self,
            transformer,
            target: SpnBuilder::new(transformer.target()),
            converted: vec![None; self.nodes.len()],
        };
        let root = converter.convert(self.root)?;
        debug!(
            from = self.semiring.name(),
            to = converter.target.semiring().name(),
            nodes = converter.target.len(),
            "converted spn"
        );
        Ok(converter.target.build(root)?)
    }
}
