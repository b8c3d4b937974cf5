//! # rankwise - Exact inference over semirings
//!
//! rankwise computes exact weights of events in Bayesian networks and
//! sum-product networks. Every algorithm is written once against a
//! [`Semiring`], so the same network answers probability queries, Spohnian
//! ranking queries or exact rational queries depending on the semiring it was
//! built with.
//!
//! ## Core Concepts
//!
//! - **Semiring**: the weight algebra (probability, rank, rational probability)
//! - **Configuration**: a boolean assignment to named variables
//! - **Distribution**: an explicit weight table over configurations
//! - **Network**: a DAG of conditional weight tables, queried by enumeration
//! - **Spn**: a sum-product network, evaluated bottom-up
//! - **prob_to_rank**: the Giang-Shenoy probability to rank conversion and
//!   its congruence check
//!
//! ## Usage
//!
//! ```rust
//! use rankwise::prob_to_rank::{self, ProbToRankTransformer};
//! use rankwise::{Configuration, SpnBuilder, PROBABILITY};
//!
//! let mut b = SpnBuilder::new(PROBABILITY);
//! let rain = b.indicator("rain", true);
//! let dry = b.indicator("rain", false);
//! let root = b.sum_of([(rain, 0.3), (dry, 0.7)])?;
//! let spn = b.build(root)?;
//!
//! let ranks = spn.convert(&ProbToRankTransformer)?;
//! assert!(prob_to_rank::is_congruent(&spn, &ranks)?.is_congruent());
//! # Ok::<(), rankwise::InferenceError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Weights and assignments
pub mod config;
pub mod configuration;
pub mod distribution;
pub mod error;
pub mod semiring;

// Models
pub mod network;
pub mod spn;

// Conversion
pub mod prob_to_rank;

// Re-export primary types at crate root for convenience
pub use config::InferenceConfig;
pub use configuration::Configuration;
pub use distribution::{Distribution, WeightedModel};
pub use error::{InferenceError, InferenceResult, StructuralError, ValidationError};
pub use network::{Cwt, Network};
pub use prob_to_rank::{CongruenceReport, ProbToRankTransformer, Violation};
pub use semiring::{
    ProbabilitySemiring, Rank, RankSemiring, Rational, RationalProbabilitySemiring, Semiring,
    PROBABILITY, RANK, RATIONAL_PROBABILITY,
};
pub use spn::{Diagnostic, Evaluation, NodeId, Spn, SpnBuilder, SpnNode, SpnTransformer};
