//! Epsilon-greedy exploration/exploitation over per-arm running means.

use std::collections::HashMap;

use bandit_core::types::{ArmId, RoundContext};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::policy::Policy;

/// With probability `epsilon` selects a candidate uniformly at random;
/// otherwise exploits the arm with the highest observed average reward.
///
/// Arms never pulled read as average 0.0, so they compete with (rather than
/// pre-empt) arms that have accumulated evidence.
pub struct EpsilonGreedy {
    epsilon: f64,
    rng: StdRng,
    total_reward: HashMap<ArmId, f64>,
    pull_count: HashMap<ArmId, u64>,
}

impl EpsilonGreedy {
    /// Create an epsilon-greedy policy. `epsilon` of 0.0 never explores,
    /// 1.0 always explores. `None` seed draws from OS entropy.
    pub fn new(epsilon: f64, seed: Option<u64>) -> Self {
        Self {
            epsilon,
            rng: match seed {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_entropy(),
            },
            total_reward: HashMap::new(),
            pull_count: HashMap::new(),
        }
    }

    fn avg_reward(&self, arm: &str) -> f64 {
        match self.pull_count.get(arm) {
            Some(&count) if count > 0 => self.total_reward.get(arm).copied().unwrap_or(0.0) / count as f64,
            _ => 0.0,
        }
    }
}

impl Policy for EpsilonGreedy {
    fn name(&self) -> &str {
        "EpsilonGreedy"
    }

    fn select_arm(&mut self, candidates: &[ArmId], _context: Option<&RoundContext>) -> ArmId {
        if self.rng.gen::<f64>() < self.epsilon {
            let idx = self.rng.gen_range(0..candidates.len());
            return candidates[idx].clone();
        }

        // Exploit: strictly-highest running mean, first occurrence wins ties.
        let mut best_arm = &candidates[0];
        let mut best_avg = self.avg_reward(&candidates[0]);
        for arm in &candidates[1..] {
            let avg = self.avg_reward(arm);
            if avg > best_avg {
                best_avg = avg;
                best_arm = arm;
            }
        }
        best_arm.clone()
    }

    fn update(&mut self, arm: &str, reward: f64, _context: Option<&Array1<f64>>) {
        *self.total_reward.entry(arm.to_string()).or_insert(0.0) += reward;
        *self.pull_count.entry(arm.to_string()).or_insert(0) += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arms(ids: &[&str]) -> Vec<ArmId> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_selection_is_member_of_candidates() {
        let mut policy = EpsilonGreedy::new(0.5, Some(3));
        let candidates = arms(&["A", "B", "C"]);
        for _ in 0..200 {
            assert!(candidates.contains(&policy.select_arm(&candidates, None)));
        }
    }

    #[test]
    fn test_pure_greedy_locks_onto_best_arm() {
        let mut policy = EpsilonGreedy::new(0.0, Some(5));
        policy.update("A", 0.0, None);
        policy.update("B", 1.0, None);
        policy.update("C", 0.0, None);

        let candidates = arms(&["A", "B", "C"]);
        for _ in 0..100 {
            assert_eq!(policy.select_arm(&candidates, None), "B");
        }
    }

    #[test]
    fn test_pure_greedy_ties_break_by_candidate_order() {
        let mut policy = EpsilonGreedy::new(0.0, Some(5));
        // A and C tie at mean 1.0; A comes first in candidate order.
        policy.update("A", 1.0, None);
        policy.update("C", 1.0, None);

        assert_eq!(policy.select_arm(&arms(&["A", "B", "C"]), None), "A");
        // Order is what decides, not insertion history.
        assert_eq!(policy.select_arm(&arms(&["C", "B", "A"]), None), "C");
    }

    #[test]
    fn test_unpulled_arms_read_as_zero_mean() {
        let mut policy = EpsilonGreedy::new(0.0, Some(8));
        policy.update("B", 0.0, None);
        // B has mean 0.0, the unpulled A also 0.0; first occurrence wins.
        assert_eq!(policy.select_arm(&arms(&["A", "B"]), None), "A");
    }

    #[test]
    fn test_pure_exploration_roughly_uniform() {
        let mut policy = EpsilonGreedy::new(1.0, Some(42));
        // A strong best arm must not bias epsilon=1 selection.
        for _ in 0..50 {
            policy.update("A", 1.0, None);
        }

        let candidates = arms(&["A", "B", "C", "D", "E"]);
        let trials = 5000;
        let mut counts: HashMap<ArmId, usize> = HashMap::new();
        for _ in 0..trials {
            *counts.entry(policy.select_arm(&candidates, None)).or_insert(0) += 1;
        }

        let expected = trials as f64 / candidates.len() as f64;
        for arm in &candidates {
            let observed = counts.get(arm).copied().unwrap_or(0) as f64;
            let relative_error = (observed - expected).abs() / expected;
            assert!(
                relative_error < 0.15,
                "arm {arm} selected {observed} times, expected ~{expected}"
            );
        }
    }

    #[test]
    fn test_single_candidate_returned_regardless_of_epsilon() {
        for epsilon in [0.0, 0.5, 1.0] {
            let mut policy = EpsilonGreedy::new(epsilon, Some(1));
            assert_eq!(policy.select_arm(&arms(&["solo"]), None), "solo");
        }
    }

    #[test]
    fn test_update_accumulates_running_mean() {
        let mut policy = EpsilonGreedy::new(0.0, Some(2));
        policy.update("A", 1.0, None);
        policy.update("A", 0.0, None);
        policy.update("A", 1.0, None);
        assert!((policy.avg_reward("A") - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(policy.avg_reward("never-pulled"), 0.0);
    }

    #[test]
    fn test_same_seed_same_selections() {
        let candidates = arms(&["A", "B", "C"]);
        let mut a = EpsilonGreedy::new(0.3, Some(77));
        let mut b = EpsilonGreedy::new(0.3, Some(77));
        for i in 0..300 {
            let chosen_a = a.select_arm(&candidates, None);
            let chosen_b = b.select_arm(&candidates, None);
            assert_eq!(chosen_a, chosen_b);
            let reward = if i % 3 == 0 { 1.0 } else { 0.0 };
            a.update(&chosen_a, reward, None);
            b.update(&chosen_b, reward, None);
        }
    }
}
