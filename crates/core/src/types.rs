//! Shared data model for the simulation core: rounds, round sources, and
//! per-run result records.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Opaque identifier for a selectable arm (a news article).
pub type ArmId = String;

/// Per-round feature vectors, keyed by candidate arm.
///
/// When present, the mapping must cover every candidate in the round;
/// partial coverage is a contract violation rejected by the engine.
pub type RoundContext = HashMap<ArmId, Array1<f64>>;

/// One decision instance: a user visit with candidate articles and
/// ground-truth click labels.
#[derive(Debug, Clone)]
pub struct Round {
    /// Originator of the impression, carried through to reporting only.
    pub user_id: String,
    /// Non-empty ordered candidate set.
    pub candidates: Vec<ArmId>,
    /// Click label (1.0 or 0.0) for every candidate.
    pub rewards: HashMap<ArmId, f64>,
    /// Optional per-candidate feature vectors, all of one length.
    pub contexts: Option<RoundContext>,
}

/// A source of impression rounds that can be replayed identically for each
/// policy under comparison.
pub trait RoundSource {
    /// The full round sequence, in replay order.
    fn rounds(&self) -> &[Round];

    fn len(&self) -> usize {
        self.rounds().len()
    }

    fn is_empty(&self) -> bool {
        self.rounds().is_empty()
    }
}

impl RoundSource for Vec<Round> {
    fn rounds(&self) -> &[Round] {
        self
    }
}

/// One line of a simulation run's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundRecord {
    /// 1-based round index.
    pub round: u64,
    pub user_id: String,
    pub selected_arm: ArmId,
    pub reward: f64,
}

/// Immutable outcome of running one policy over one round sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub policy: String,
    pub total_impressions: u64,
    pub total_clicks: u64,
    /// total_clicks / total_impressions, 0.0 when no rounds were processed.
    pub click_through_rate: f64,
    pub history: Vec<RoundRecord>,
}
