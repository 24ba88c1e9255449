//! Uniform-random arm selection, the no-learning performance floor.

use bandit_core::types::{ArmId, RoundContext};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::policy::Policy;

/// Picks each candidate with equal probability, ignoring reward history
/// and context entirely.
pub struct RandomChoice {
    rng: StdRng,
}

impl RandomChoice {
    /// Create a uniform-random policy. `None` seeds from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: match seed {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_entropy(),
            },
        }
    }
}

impl Policy for RandomChoice {
    fn name(&self) -> &str {
        "RandomChoice"
    }

    fn select_arm(&mut self, candidates: &[ArmId], _context: Option<&RoundContext>) -> ArmId {
        let idx = self.rng.gen_range(0..candidates.len());
        candidates[idx].clone()
    }

    fn update(&mut self, _arm: &str, _reward: f64, _context: Option<&Array1<f64>>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn arms(ids: &[&str]) -> Vec<ArmId> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_selection_is_member_of_candidates() {
        let mut policy = RandomChoice::new(Some(7));
        let candidates = arms(&["A", "B", "C"]);
        for _ in 0..100 {
            let chosen = policy.select_arm(&candidates, None);
            assert!(candidates.contains(&chosen));
        }
    }

    #[test]
    fn test_single_candidate_always_returned() {
        let mut policy = RandomChoice::new(Some(1));
        let candidates = arms(&["only"]);
        for _ in 0..20 {
            assert_eq!(policy.select_arm(&candidates, None), "only");
        }
    }

    #[test]
    fn test_selection_roughly_uniform() {
        let mut policy = RandomChoice::new(Some(42));
        let candidates = arms(&["A", "B", "C", "D"]);
        let trials = 4000;

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
    fn test_update_is_a_no_op() {
        let mut a = RandomChoice::new(Some(9));
        let mut b = RandomChoice::new(Some(9));
        let candidates = arms(&["A", "B", "C"]);

        // Feeding rewards into one of two identically seeded policies must
        // not change its selection stream.
        for i in 0..50 {
            let chosen_a = a.select_arm(&candidates, None);
            a.update(&chosen_a, (i % 2) as f64, None);
            let chosen_b = b.select_arm(&candidates, None);
            assert_eq!(chosen_a, chosen_b);
        }
    }

    #[test]
    fn test_same_seed_same_selections() {
        let mut a = RandomChoice::new(Some(123));
        let mut b = RandomChoice::new(Some(123));
        let candidates = arms(&["w", "x", "y", "z"]);
        for _ in 0..200 {
            assert_eq!(
                a.select_arm(&candidates, None),
                b.select_arm(&candidates, None)
            );
        }
    }
}
