//! Disjoint LinUCB contextual bandit (Li et al., WWW 2010).
//!
//! Each arm keeps its own ridge-regression state: a design matrix `A`
//! (identity-initialized) and a reward-weighted feature accumulator `b`.
//! The selection score is the predicted reward plus a confidence bonus,
//! `theta . x + alpha * sqrt(x . A^-1 x)`, with both terms obtained through
//! a Cholesky solve rather than an explicit inverse.

use std::collections::HashMap;

use bandit_core::types::{ArmId, RoundContext};
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::policy::Policy;

/// Per-arm linear upper-confidence-bound policy.
///
/// The context dimensionality is fixed by the first feature vector observed
/// by either `select_arm` or `update` and is global to the instance; a
/// vector of any other length afterwards aborts the run. Rounds without any
/// context degrade to uniform-random selection.
pub struct LinUCB {
    alpha: f64,
    rng: StdRng,
    d: Option<usize>,
    a: HashMap<ArmId, Array2<f64>>,
    b: HashMap<ArmId, Array1<f64>>,
}

impl LinUCB {
    /// Create a LinUCB policy. `alpha >= 0` scales the confidence bonus;
    /// larger values explore more. `None` seed draws from OS entropy.
    pub fn new(alpha: f64, seed: Option<u64>) -> Self {
        Self {
            alpha,
            rng: match seed {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_entropy(),
            },
            d: None,
            a: HashMap::new(),
            b: HashMap::new(),
        }
    }

    /// Pin the dimensionality on first contact, reject any later drift.
    fn ensure_dim(&mut self, x: &Array1<f64>) -> usize {
        match self.d {
            None => {
                self.d = Some(x.len());
                x.len()
            }
            Some(d) => {
                assert_eq!(
                    x.len(),
                    d,
                    "context vector length changed mid-run for this policy instance"
                );
                d
            }
        }
    }

    fn init_arm(&mut self, arm: &str, d: usize) {
        if !self.a.contains_key(arm) {
            self.a.insert(arm.to_string(), Array2::eye(d));
            self.b.insert(arm.to_string(), Array1::zeros(d));
        }
    }

    fn ucb(&self, arm: &str, x: &Array1<f64>) -> f64 {
        let a_mat = &self.a[arm];
        let theta = solve_spd(a_mat, &self.b[arm]);
        let z = solve_spd(a_mat, x);
        theta.dot(x) + self.alpha * z.dot(x).max(0.0).sqrt()
    }
}

impl Policy for LinUCB {
    fn name(&self) -> &str {
        "LinUCB"
    }

    fn select_arm(&mut self, candidates: &[ArmId], context: Option<&RoundContext>) -> ArmId {
        let Some(context) = context else {
            // No features this round: learned state cannot rank candidates.
            let idx = self.rng.gen_range(0..candidates.len());
            return candidates[idx].clone();
        };

        let mut best_arm = &candidates[0];
        let mut best_ucb = f64::NEG_INFINITY;

        for arm in candidates {
            let x = match context.get(arm) {
                Some(x) => x,
                None => panic!("candidate {arm} missing from round context"),
            };
            let d = self.ensure_dim(x);
            self.init_arm(arm, d);

            let ucb = self.ucb(arm, x);
            if ucb > best_ucb {
                best_ucb = ucb;
                best_arm = arm;
            }
        }
        best_arm.clone()
    }

    fn update(&mut self, arm: &str, reward: f64, context: Option<&Array1<f64>>) {
        // Without the selection-time features there is nothing to attribute
        // the reward to.
        let Some(x) = context else {
            return;
        };

        let d = self.ensure_dim(x);
        self.init_arm(arm, d);

        let outer = x
            .view()
            .insert_axis(Axis(1))
            .dot(&x.view().insert_axis(Axis(0)));
        if let Some(a_mat) = self.a.get_mut(arm) {
            *a_mat += &outer;
        }
        if let Some(b_vec) = self.b.get_mut(arm) {
            b_vec.scaled_add(reward, x);
        }
    }
}

/// Solve `a * x = rhs` for symmetric positive-definite `a` using a Cholesky
/// factorization `a = L L^T` followed by forward and backward substitution.
fn solve_spd(a: &Array2<f64>, rhs: &Array1<f64>) -> Array1<f64> {
    let n = rhs.len();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[[i, j]];
            for k in 0..j {
                sum -= l[[i, k]] * l[[j, k]];
            }
            if i == j {
                // Identity plus outer products keeps A positive-definite.
                assert!(sum > 0.0, "design matrix lost positive-definiteness");
                l[[i, j]] = sum.sqrt();
            } else {
                l[[i, j]] = sum / l[[j, j]];
            }
        }
    }

    // Forward substitution: L y = rhs
    let mut y = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = rhs[i];
        for j in 0..i {
            sum -= l[[i, j]] * y[j];
        }
        y[i] = sum / l[[i, i]];
    }

    // Backward substitution: L^T x = y
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[[j, i]] * x[j];
        }
        x[i] = sum / l[[i, i]];
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn arms(ids: &[&str]) -> Vec<ArmId> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn context_for(pairs: &[(&str, Array1<f64>)]) -> RoundContext {
        pairs
            .iter()
            .map(|(id, x)| (id.to_string(), x.clone()))
            .collect()
    }

    #[test]
    fn test_solve_spd_recovers_known_solution() {
        let a = array![[2.0, 1.0], [1.0, 3.0]];
        let rhs = array![1.0, 2.0];
        let x = solve_spd(&a, &rhs);
        assert!((x[0] - 0.2).abs() < 1e-12);
        assert!((x[1] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_context_free_fallback_is_uniform() {
        let mut policy = LinUCB::new(1.0, Some(42));
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
    fn test_selection_with_context_is_member_of_candidates() {
        let mut policy = LinUCB::new(1.0, Some(1));
        let candidates = arms(&["A", "B"]);
        let context = context_for(&[
            ("A", array![1.0, 0.0]),
            ("B", array![0.0, 1.0]),
        ]);
        for _ in 0..50 {
            assert!(candidates.contains(&policy.select_arm(&candidates, Some(&context))));
        }
    }

    #[test]
    fn test_rewarded_arm_prediction_rises_relative_to_unupdated_arm() {
        let mut policy = LinUCB::new(1.0, Some(0));
        let x = array![1.0, 0.0];

        policy.update("A", 1.0, Some(&x));
        policy.update("B", 0.0, None); // leaves B uninitialized

        let mut previous = f64::NEG_INFINITY;
        for _ in 0..10 {
            let prediction = solve_spd(&policy.a["A"], &policy.b["A"]).dot(&x);
            assert!(prediction > previous);
            previous = prediction;
            policy.update("A", 1.0, Some(&x));
        }
        // Ridge shrinkage keeps the prediction below the true rate of 1.0.
        assert!(previous > 0.9 && previous < 1.0);
    }

    #[test]
    fn test_trained_arm_beats_untrained_arm_on_same_features() {
        let mut policy = LinUCB::new(0.0, Some(0));
        let x = array![1.0, 0.0];
        for _ in 0..10 {
            policy.update("A", 1.0, Some(&x));
        }

        // With a zero bonus only the prediction ranks arms; A must win even
        // listed after the untrained B.
        let candidates = arms(&["B", "A"]);
        let context = context_for(&[("A", x.clone()), ("B", x.clone())]);
        assert_eq!(policy.select_arm(&candidates, Some(&context)), "A");
    }

    #[test]
    fn test_update_without_context_is_a_no_op() {
        let mut policy = LinUCB::new(1.0, Some(0));
        policy.update("A", 1.0, None);
        assert!(policy.d.is_none());
        assert!(policy.a.is_empty());
        assert!(policy.b.is_empty());
    }

    #[test]
    fn test_design_matrix_and_accumulator_updates() {
        let mut policy = LinUCB::new(1.0, Some(0));
        let x = array![1.0, 2.0];
        policy.update("A", 1.0, Some(&x));

        // A = I + x x^T, b = 1.0 * x
        let a_mat = &policy.a["A"];
        assert_eq!(a_mat[[0, 0]], 2.0);
        assert_eq!(a_mat[[0, 1]], 2.0);
        assert_eq!(a_mat[[1, 0]], 2.0);
        assert_eq!(a_mat[[1, 1]], 5.0);
        assert_eq!(policy.b["A"], array![1.0, 2.0]);
    }

    #[test]
    #[should_panic(expected = "context vector length changed")]
    fn test_dimensionality_drift_panics() {
        let mut policy = LinUCB::new(1.0, Some(0));
        policy.update("A", 1.0, Some(&array![1.0, 0.0]));
        policy.update("A", 1.0, Some(&array![1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_same_seed_same_fallback_selections() {
        let candidates = arms(&["A", "B", "C"]);
        let mut a = LinUCB::new(1.0, Some(55));
        let mut b = LinUCB::new(1.0, Some(55));
        for _ in 0..200 {
            assert_eq!(
                a.select_arm(&candidates, None),
                b.select_arm(&candidates, None)
            );
        }
    }
}
