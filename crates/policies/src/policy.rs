//! The contract every bandit strategy implements. The simulation engine
//! depends on policies only through this trait, so strategies are
//! interchangeable at construction time.

use bandit_core::types::{ArmId, RoundContext};
use ndarray::Array1;

/// An online decision-making policy over a changing candidate set.
///
/// `select_arm` may advance the policy's private random source but must not
/// touch learned state; all learning happens in `update`. A policy only ever
/// receives `update` calls for arms it selected.
pub trait Policy {
    /// Stable display identifier for reporting.
    fn name(&self) -> &str;

    /// Choose one arm from `candidates`.
    ///
    /// `candidates` is guaranteed non-empty by the caller, and the returned
    /// id must be one of its members. `context`, when present, maps every
    /// candidate to a feature vector; context-free policies ignore it.
    fn select_arm(&mut self, candidates: &[ArmId], context: Option<&RoundContext>) -> ArmId;

    /// Record the observed reward (1.0 click, 0.0 no click) for `arm`.
    ///
    /// Repeated calls with the same arguments double-count; callers are
    /// responsible for invoking this exactly once per round. `context` is
    /// the feature vector the arm was selected under, required only by
    /// context-aware policies.
    fn update(&mut self, arm: &str, reward: f64, context: Option<&Array1<f64>>);
}
