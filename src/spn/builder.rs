//! Arena construction of SPNs.

use tracing::debug;

use super::node::{NodeId, SpnNode};
use super::Spn;
use crate::error::{InferenceResult, StructuralError, ValidationError};
use crate::semiring::Semiring;

/// Creates nodes and wires them together before freezing them into an [`Spn`].
///
/// Nodes may be shared by several parents. Wiring that would close a cycle
/// is rejected.
///
/// # Examples
///
/// ```
/// use rankwise::{Configuration, SpnBuilder, PROBABILITY};
///
/// let mut b = SpnBuilder::new(PROBABILITY);
/// let t = b.indicator("x", true);
/// let f = b.indicator("x", false);
/// let root = b.sum();
/// b.add_weighted(root, t, 0.25)?;
/// b.add_weighted(root, f, 0.75)?;
/// let spn = b.build(root)?;
///
/// assert_eq!(spn.weight(&Configuration::singleton("x", false))?, 0.75);
/// # Ok::<(), rankwise::InferenceError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SpnBuilder<S: Semiring> {
    semiring: S,
    nodes: Vec<SpnNode<S::Value>>,
}

impl<S: Semiring> SpnBuilder<S> {
    /// Creates an empty builder over `semiring`.
    #[must_use]
    pub fn new(semiring: S) -> Self {
        Self {
            semiring,
            nodes: Vec::new(),
        }
    }

    /// Semiring of the edge weights.
    #[must_use]
    pub fn semiring(&self) -> S {
        self.semiring
    }

    fn push(&mut self, node: SpnNode<S::Value>) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Adds an indicator leaf.
    pub fn indicator(&mut self, variable: impl Into<String>, value: bool) -> NodeId {
        self.push(SpnNode::Indicator {
            variable: variable.into(),
            value,
        })
    }

    /// Adds an empty sum node.
    pub fn sum(&mut self) -> NodeId {
        self.push(SpnNode::Sum {
            children: Vec::new(),
        })
    }

    /// Adds an empty product node.
    pub fn product(&mut self) -> NodeId {
        self.push(SpnNode::Product {
            children: Vec::new(),
        })
    }

    /// Adds a sum node with the given weighted children.
    ///
    /// # Errors
    ///
    /// See [`SpnBuilder::add_weighted`].
    pub fn sum_of<I>(&mut self, children: I) -> InferenceResult<NodeId>
    where
        I: IntoIterator<Item = (NodeId, S::Value)>,
    {
        let id = self.sum();
        for (child, weight) in children {
            self.add_weighted(id, child, weight)?;
        }
        Ok(id)
    }

    /// Adds a product node over the given children.
    ///
    /// # Errors
    ///
    /// See [`SpnBuilder::add_factor`].
    pub fn product_of<I>(&mut self, children: I) -> InferenceResult<NodeId>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let id = self.product();
        for child in children {
            self.add_factor(id, child)?;
        }
        Ok(id)
    }

    fn node(&self, id: NodeId) -> Result<&SpnNode<S::Value>, ValidationError> {
        self.nodes
            .get(id.0)
            .ok_or(ValidationError::UnknownNode { id: id.0 })
    }

    /// True if `target` is reachable from `from` (or is `from`).
    fn reaches(&self, from: NodeId, target: NodeId) -> bool {
        let mut stack = vec![from];
        let mut seen = vec![false; self.nodes.len()];
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if std::mem::replace(&mut seen[id.0], true) {
                continue;
            }
            stack.extend(self.nodes[id.0].child_ids());
        }
        false
    }

    fn check_edge(&self, parent: NodeId, child: NodeId, expected: &'static str) -> InferenceResult<()> {
        let node = self.node(parent)?;
        self.node(child)?;
        if node.kind() != expected {
            return Err(ValidationError::NodeKindMismatch {
                id: parent.0,
                expected,
                actual: node.kind(),
            }
            .into());
        }
        if self.reaches(child, parent) {
            return Err(StructuralError::SpnCycle {
                parent: parent.0,
                child: child.0,
            }
            .into());
        }
        Ok(())
    }

    /// Adds `child` below the sum node `sum` with edge weight `weight`.
    /// Re-adding an existing child replaces its weight.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownNode` for a foreign handle,
    /// `ValidationError::NodeKindMismatch` if `sum` is not a sum node, and
    /// `StructuralError::SpnCycle` if `sum` is reachable from `child`.
    pub fn add_weighted(&mut self, sum: NodeId, child: NodeId, weight: S::Value) -> InferenceResult<()> {
        self.check_edge(sum, child, "sum")?;
        if let SpnNode::Sum { children } = &mut self.nodes[sum.0] {
            match children.iter_mut().find(|(id, _)| *id == child) {
                Some(entry) => entry.1 = weight,
                None => children.push((child, weight)),
            }
        }
        Ok(())
    }

    /// Adds `child` as a factor of the product node `product`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`SpnBuilder::add_weighted`], for product nodes.
    pub fn add_factor(&mut self, product: NodeId, child: NodeId) -> InferenceResult<()> {
        self.check_edge(product, child, "product")?;
        if let SpnNode::Product { children } = &mut self.nodes[product.0] {
            children.push(child);
        }
        Ok(())
    }

    /// Number of nodes created so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if no node has been created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Freezes the arena with `root` as the network's root.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownNode` if `root` was not created by
    /// this builder.
    pub fn build(self, root: NodeId) -> Result<Spn<S>, ValidationError> {
        self.node(root)?;
        debug!(nodes = self.nodes.len(), root = %root, semiring = self.semiring.name(), "built spn");
        Ok(Spn::from_parts(self.semiring, self.nodes, root))
    }
}
