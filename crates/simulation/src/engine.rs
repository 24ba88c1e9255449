//! Simulation engine for replaying impression rounds through one policy.
//!
//! Per round the engine presents the candidates, looks up the ground-truth
//! reward for the selected arm, feeds it back through `update`, and
//! accumulates metrics. Collaborator contract breaches (empty candidate
//! sets, selections outside the candidates, missing reward coverage,
//! partial context) abort the run with `BanditError::Contract`.

use bandit_core::error::{BanditError, BanditResult};
use bandit_core::types::{RoundRecord, RoundSource, SimulationResult};
use bandit_policies::Policy;
use tracing::{debug, info};

/// Runs one policy over one round sequence, exactly once.
///
/// `run` consumes the engine, so a completed engine cannot be re-invoked;
/// evaluating the same policy again requires a fresh instance (and a fresh
/// policy, since learned state is not reset here).
pub struct SimulationEngine<'a> {
    policy: Box<dyn Policy>,
    source: &'a dyn RoundSource,
}

impl<'a> SimulationEngine<'a> {
    pub fn new(policy: Box<dyn Policy>, source: &'a dyn RoundSource) -> Self {
        Self { policy, source }
    }

    /// Execute the full simulation loop over all impression rounds.
    pub fn run(mut self) -> BanditResult<SimulationResult> {
        let mut total_clicks: u64 = 0;
        let mut total_impressions: u64 = 0;
        let mut history: Vec<RoundRecord> = Vec::with_capacity(self.source.len());

        debug!(
            policy = self.policy.name(),
            rounds = self.source.len(),
            "Starting simulation"
        );

        for round in self.source.rounds() {
            let round_index = total_impressions + 1;

            if round.candidates.is_empty() {
                return Err(BanditError::Contract(format!(
                    "round {round_index} has an empty candidate set"
                )));
            }
            if let Some(contexts) = &round.contexts {
                for arm in &round.candidates {
                    if !contexts.contains_key(arm) {
                        return Err(BanditError::Contract(format!(
                            "round {round_index} supplies context for only part of its \
                             candidates (missing {arm}); context must cover all or none"
                        )));
                    }
                }
            }

            let selected = self
                .policy
                .select_arm(&round.candidates, round.contexts.as_ref());
            if !round.candidates.contains(&selected) {
                return Err(BanditError::Contract(format!(
                    "policy {} selected {selected}, which is not a candidate of round {round_index}",
                    self.policy.name()
                )));
            }

            let reward = *round.rewards.get(&selected).ok_or_else(|| {
                BanditError::Contract(format!(
                    "round {round_index} has no reward label for selected arm {selected}"
                ))
            })?;

            let selected_context = round.contexts.as_ref().and_then(|c| c.get(&selected));
            self.policy.update(&selected, reward, selected_context);

            total_impressions += 1;
            total_clicks += reward as u64;
            history.push(RoundRecord {
                round: total_impressions,
                user_id: round.user_id.clone(),
                selected_arm: selected,
                reward,
            });
        }

        let click_through_rate = if total_impressions > 0 {
            total_clicks as f64 / total_impressions as f64
        } else {
            0.0
        };

        info!(
            policy = self.policy.name(),
            impressions = total_impressions,
            clicks = total_clicks,
            ctr = click_through_rate,
            "Simulation completed"
        );

        Ok(SimulationResult {
            policy: self.policy.name().to_string(),
            total_impressions,
            total_clicks,
            click_through_rate,
            history,
        })
    }
}
