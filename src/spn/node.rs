//! SPN node variants and handles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Handle of a node inside one SPN arena.
///
/// Node identity is handle identity: two indicator leaves over the same
/// variable and value are different nodes unless they share a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in its arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// One node of a sum-product network.
#[derive(Debug, Clone, PartialEq)]
pub enum SpnNode<V> {
    /// Leaf that is `one()` when the configuration agrees with it, else `zero()`.
    Indicator {
        /// Variable tested by the leaf.
        variable: String,
        /// Value the leaf accepts.
        value: bool,
    },

    /// Weighted semiring-sum of children. Each child appears once.
    Sum {
        /// Children with their edge weights.
        children: Vec<(NodeId, V)>,
    },

    /// Semiring-product of children.
    Product {
        /// Factors in insertion order.
        children: Vec<NodeId>,
    },
}

impl<V> SpnNode<V> {
    /// Lowercase variant name, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Indicator { .. } => "indicator",
            Self::Sum { .. } => "sum",
            Self::Product { .. } => "product",
        }
    }

    /// Child handles in insertion order (empty for indicators).
    #[must_use]
    pub fn child_ids(&self) -> Vec<NodeId> {
        match self {
            Self::Indicator { .. } => Vec::new(),
            Self::Sum { children } => children.iter().map(|(id, _)| *id).collect(),
            Self::Product { children } => children.clone(),
        }
    }

    /// True for indicator leaves.
    #[must_use]
    pub const fn is_indicator(&self) -> bool {
        matches!(self, Self::Indicator { .. })
    }
}
