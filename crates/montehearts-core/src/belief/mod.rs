//! Probabilistic tracking of opponent card ownership.
//!
//! This module is composed of:
//! - `tracker`: the `Belief` distribution and its observation updates.
//! - `reconcile`: iterative proportional fitting that restores the
//!   per-card and per-seat marginal invariants after each mutation.
//! - `sampler`: draws fully determinized worlds from the belief state.

mod reconcile;
mod sampler;
mod tracker;

pub use sampler::{SampledWorld, SamplingError, WorldSampler};
pub use tracker::{Belief, ObservationOutcome, SuitMask};
