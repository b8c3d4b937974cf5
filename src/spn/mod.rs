//! Sum-product networks.
//!
//! An [`Spn`] is an arena of [`SpnNode`]s addressed by [`NodeId`] handles and
//! rooted at one node. Nodes may be shared between parents, so the structure
//! is a DAG; node identity is handle identity.
//!
//! Completeness and consistency are not enforced while building. They are
//! checked on demand, and evaluation proceeds either way.

mod builder;
mod eval;
mod node;
mod transform;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

pub use builder::SpnBuilder;
pub use eval::{Diagnostic, Evaluation};
pub use node::{NodeId, SpnNode};
pub use transform::SpnTransformer;

use crate::configuration::Configuration;
use crate::distribution::WeightedModel;
use crate::error::{InferenceResult, ValidationError};
use crate::semiring::Semiring;

/// A rooted sum-product network over semiring `S`.
#[derive(Debug, Clone)]
pub struct Spn<S: Semiring> {
    semiring: S,
    nodes: Vec<SpnNode<S::Value>>,
    root: NodeId,
}

impl<S: Semiring> Spn<S> {
    pub(crate) fn from_parts(semiring: S, nodes: Vec<SpnNode<S::Value>>, root: NodeId) -> Self {
        Self {
            semiring,
            nodes,
            root,
        }
    }

    /// Handle of the root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Semiring of the edge weights.
    #[must_use]
    pub fn semiring(&self) -> S {
        self.semiring
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the arena has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node behind `id`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownNode` for a handle of another arena.
    pub fn node(&self, id: NodeId) -> Result<&SpnNode<S::Value>, ValidationError> {
        self.nodes
            .get(id.0)
            .ok_or(ValidationError::UnknownNode { id: id.0 })
    }

    /// Weight on the edge from `sum` to `child`, if that edge exists.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownNode` for a foreign handle and
    /// `ValidationError::NodeKindMismatch` if `sum` is not a sum node.
    pub fn edge_weight(&self, sum: NodeId, child: NodeId) -> Result<Option<S::Value>, ValidationError> {
        match self.node(sum)? {
            SpnNode::Sum { children } => Ok(children
                .iter()
                .find(|(id, _)| *id == child)
                .map(|(_, w)| *w)),
            other => Err(ValidationError::NodeKindMismatch {
                id: sum.0,
                expected: "sum",
                actual: other.kind(),
            }),
        }
    }

    /// True if the edge weights of sum node `sum` add up to `one()`.
    ///
    /// # Errors
    ///
    /// Same as [`Spn::edge_weight`].
    pub fn is_normalized_at(&self, sum: NodeId) -> Result<bool, ValidationError> {
        match self.node(sum)? {
            SpnNode::Sum { children } => {
                let total = self.semiring.sum_all(children.iter().map(|(_, w)| *w));
                Ok(self.semiring.approx_eq(total, self.semiring.one()))
            }
            other => Err(ValidationError::NodeKindMismatch {
                id: sum.0,
                expected: "sum",
                actual: other.kind(),
            }),
        }
    }

    /// True if every sum node reachable from the root is normalized.
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        self.reachable()
            .into_iter()
            .all(|id| !matches!(self.nodes[id.0], SpnNode::Sum { .. }) || self.is_normalized_at(id).unwrap_or(false))
    }

    /// Nodes reachable from the root, each once, in depth-first preorder.
    #[must_use]
    pub fn reachable(&self) -> Vec<NodeId> {
        let mut seen = vec![false; self.nodes.len()];
        let mut order = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut seen[id.0], true) {
                continue;
            }
            order.push(id);
            stack.extend(self.nodes[id.0].child_ids().into_iter().rev());
        }
        order
    }

    /// Indicator leaves below `id`, once per path, so a shared leaf appears
    /// as often as it is reached.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownNode` for a foreign handle.
    pub fn indicators_covered(&self, id: NodeId) -> Result<Vec<NodeId>, ValidationError> {
        self.node(id)?;
        let mut found = Vec::new();
        self.collect_indicators(id, &mut found);
        Ok(found)
    }

    fn collect_indicators(&self, id: NodeId, found: &mut Vec<NodeId>) {
        let node = &self.nodes[id.0];
        if node.is_indicator() {
            found.push(id);
        }
        for child in node.child_ids() {
            self.collect_indicators(child, found);
        }
    }

    /// Variables of the indicator leaves below `id`, with repetitions.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownNode` for a foreign handle.
    pub fn variables_covered(&self, id: NodeId) -> Result<Vec<String>, ValidationError> {
        Ok(self
            .indicators_covered(id)?
            .into_iter()
            .filter_map(|leaf| match &self.nodes[leaf.0] {
                SpnNode::Indicator { variable, .. } => Some(variable.clone()),
                _ => None,
            })
            .collect())
    }

    /// Distinct variables below `id`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownNode` for a foreign handle.
    pub fn scope(&self, id: NodeId) -> Result<BTreeSet<String>, ValidationError> {
        self.node(id)?;
        let mut memo = BTreeMap::new();
        Ok(self.scope_memo(id, &mut memo))
    }

    fn scope_memo(&self, id: NodeId, memo: &mut BTreeMap<NodeId, BTreeSet<String>>) -> BTreeSet<String> {
        if let Some(scope) = memo.get(&id) {
            return scope.clone();
        }
        let scope = match &self.nodes[id.0] {
            SpnNode::Indicator { variable, .. } => BTreeSet::from([variable.clone()]),
            node => {
                let mut scope = BTreeSet::new();
                for child in node.child_ids() {
                    scope.extend(self.scope_memo(child, memo));
                }
                scope
            }
        };
        memo.insert(id, scope.clone());
        scope
    }

    /// True if, below the root, the children of every sum node cover the same
    /// variables.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        let mut memo = BTreeMap::new();
        self.reachable().into_iter().all(|id| match &self.nodes[id.0] {
            SpnNode::Sum { children } => {
                let mut scopes = children.iter().map(|(c, _)| self.scope_memo(*c, &mut memo));
                match scopes.next() {
                    Some(first) => scopes.all(|s| s == first),
                    None => true,
                }
            }
            _ => true,
        })
    }

    /// True if, below the root, no two distinct children of a product node
    /// carry indicators with opposite values for the same variable.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mut literals: BTreeMap<NodeId, BTreeSet<(String, bool)>> = BTreeMap::new();
        for id in self.reachable() {
            let SpnNode::Product { children } = &self.nodes[id.0] else {
                continue;
            };
            for (i, a) in children.iter().enumerate() {
                for b in &children[i + 1..] {
                    if a == b {
                        continue;
                    }
                    let la = self.literals(*a, &mut literals);
                    let lb = self.literals(*b, &mut literals);
                    if la.iter().any(|(var, value)| lb.contains(&(var.clone(), !value))) {
                        return false;
                    }
                }
            }
        }
        true
    }

    fn literals(
        &self,
        id: NodeId,
        memo: &mut BTreeMap<NodeId, BTreeSet<(String, bool)>>,
    ) -> BTreeSet<(String, bool)> {
        if let Some(found) = memo.get(&id) {
            return found.clone();
        }
        let found = match &self.nodes[id.0] {
            SpnNode::Indicator { variable, value } => BTreeSet::from([(variable.clone(), *value)]),
            node => {
                let mut found = BTreeSet::new();
                for child in node.child_ids() {
                    found.extend(self.literals(child, memo));
                }
                found
            }
        };
        memo.insert(id, found.clone());
        found
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId) -> fmt::Result {
        match &self.nodes[id.0] {
            SpnNode::Indicator { variable, value } => {
                write!(f, "I[{variable}={}]", if *value { "T" } else { "F" })
            }
            SpnNode::Sum { children } if children.is_empty() => write!(f, "0"),
            SpnNode::Product { children } if children.is_empty() => write!(f, "1"),
            SpnNode::Sum { children } => {
                write!(f, "(")?;
                for (i, (child, w)) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, "+")?;
                    }
                    self.write_node(f, *child)?;
                    write!(f, "*{w}")?;
                }
                write!(f, ")")
            }
            SpnNode::Product { children } => {
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, "*")?;
                    }
                    self.write_node(f, *child)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl<S: Semiring> fmt::Display for Spn<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, self.root)
    }
}

impl<S: Semiring> WeightedModel for Spn<S> {
    type Semiring = S;

    fn semiring(&self) -> S {
        self.semiring
    }

    fn variables(&self) -> BTreeSet<String> {
        let mut memo = BTreeMap::new();
        self.scope_memo(self.root, &mut memo)
    }

    fn weight(&self, cfg: &Configuration) -> InferenceResult<S::Value> {
        Spn::weight(self, cfg)
    }
}
