//! Weight evaluation with a non-fatal diagnostic channel.

use std::fmt;

use serde::Serialize;
use tracing::warn;

use super::node::{NodeId, SpnNode};
use super::Spn;
use crate::configuration::Configuration;
use crate::error::{InferenceResult, ValidationError};
use crate::semiring::Semiring;

/// Something odd noticed while evaluating, which did not stop evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Diagnostic<V> {
    /// A sum node whose edge weights do not add up to `one()`.
    UnnormalizedSum {
        /// The sum node.
        node: NodeId,
        /// Semiring sum of its edge weights.
        total: V,
    },
}

impl<V: fmt::Display> fmt::Display for Diagnostic<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnnormalizedSum { node, total } => {
                write!(f, "unnormalized sum node {node}: edge weights total {total}")
            }
        }
    }
}

/// Result of [`Spn::evaluate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation<V> {
    /// Weight of the root.
    pub value: V,
    /// One entry per affected node, in the order the nodes were first reached.
    pub diagnostics: Vec<Diagnostic<V>>,
}

impl<V> Evaluation<V> {
    /// True if evaluation raised no diagnostics.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

struct Evaluator<'a, S: Semiring> {
    spn: &'a Spn<S>,
    cfg: &'a Configuration,
    memo: Vec<Option<S::Value>>,
    diagnostics: Vec<Diagnostic<S::Value>>,
}

impl<S: Semiring> Evaluator<'_, S> {
    fn eval(&mut self, id: NodeId) -> InferenceResult<S::Value> {
        if let Some(v) = self.memo[id.0] {
            return Ok(v);
        }
        let spn = self.spn;
        let s = spn.semiring;
        let value = match &spn.nodes[id.0] {
            SpnNode::Indicator { variable, value } => {
                let actual = self
                    .cfg
                    .value(variable)
                    .ok_or_else(|| ValidationError::UnknownVariable {
                        variable: variable.clone(),
                    })?;
                if actual == *value {
                    s.one()
                } else {
                    s.zero()
                }
            }
            SpnNode::Sum { children } => {
                let total = s.sum_all(children.iter().map(|(_, w)| *w));
                if !s.approx_eq(total, s.one()) {
                    self.diagnostics
                        .push(Diagnostic::UnnormalizedSum { node: id, total });
                }
                let mut acc = s.zero();
                for (child, w) in children {
                    let v = self.eval(*child)?;
                    acc = s.sum(acc, s.product(*w, v));
                }
                acc
            }
            SpnNode::Product { children } => {
                let mut acc = s.one();
                for child in children {
                    let v = self.eval(*child)?;
                    if s.is_zero(v) {
                        acc = s.zero();
                        break;
                    }
                    acc = s.product(acc, v);
                }
                acc
            }
        };
        self.memo[id.0] = Some(value);
        Ok(value)
    }
}

impl<S: Semiring> Spn<S> {
    /// Weight of `cfg` together with any diagnostics raised on the way.
    ///
    /// Shared nodes are evaluated once per call.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownVariable` if an indicator reached by
    /// evaluation names a variable `cfg` does not assign.
    pub fn evaluate(&self, cfg: &Configuration) -> InferenceResult<Evaluation<S::Value>> {
        let mut evaluator = Evaluator {
            spn: self,
            cfg,
            memo: vec![None; self.nodes.len()],
            diagnostics: Vec::new(),
        };
        let value = evaluator.eval(self.root)?;
        Ok(Evaluation {
            value,
            diagnostics: evaluator.diagnostics,
        })
    }

    /// Weight of `cfg`. Diagnostics are logged as warnings.
    ///
    /// # Errors
    ///
    /// Same as [`Spn::evaluate`].
    pub fn weight(&self, cfg: &Configuration) -> InferenceResult<S::Value> {
        let evaluation = self.evaluate(cfg)?;
        for diagnostic in &evaluation.diagnostics {
            warn!(config = %cfg, "{diagnostic}");
        }
        Ok(evaluation.value)
    }
}
