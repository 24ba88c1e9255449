//! Side-by-side policy comparison over a shared round sequence.

use bandit_core::error::BanditResult;
use bandit_core::types::{RoundSource, SimulationResult};
use bandit_policies::Policy;
use tracing::info;

use crate::engine::SimulationEngine;

/// Run each policy through its own fresh engine against the same source.
///
/// Every engine replays the identical round sequence in the identical
/// order, so the comparison is fair; results come back in input order, one
/// per policy. Policies never share state, so a contract failure in one run
/// surfaces immediately rather than contaminating the others.
pub fn compare_policies(
    policies: Vec<Box<dyn Policy>>,
    source: &dyn RoundSource,
) -> BanditResult<Vec<SimulationResult>> {
    let mut results = Vec::with_capacity(policies.len());

    for policy in policies {
        info!(
            policy = policy.name(),
            rounds = source.len(),
            "Running policy"
        );
        let engine = SimulationEngine::new(policy, source);
        results.push(engine.run()?);
    }

    Ok(results)
}
