//! Beta-Bernoulli Thompson Sampling.
//!
//! Each arm carries a Beta(alpha, beta) posterior over its true click
//! probability. At decision time one sample is drawn per candidate and the
//! highest sample wins, so uncertain arms are explored in proportion to how
//! plausible their upside still is.

use std::collections::HashMap;

use bandit_core::types::{ArmId, RoundContext};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Beta, Distribution};

use crate::policy::Policy;

/// Thompson Sampling with a configurable Beta prior.
///
/// Unseen arms read as `Beta(prior_alpha, prior_beta)`. The conjugate update
/// is `alpha += reward`, `beta += 1 - reward`.
pub struct ThompsonSampling {
    prior_alpha: f64,
    prior_beta: f64,
    rng: StdRng,
    alpha: HashMap<ArmId, f64>,
    beta: HashMap<ArmId, f64>,
}

impl ThompsonSampling {
    /// Create a Thompson Sampling policy. Priors must be positive; the
    /// default uniform prior is `(1.0, 1.0)`. `None` seed draws from OS
    /// entropy.
    pub fn new(prior_alpha: f64, prior_beta: f64, seed: Option<u64>) -> Self {
        Self {
            prior_alpha,
            prior_beta,
            rng: match seed {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_entropy(),
            },
            alpha: HashMap::new(),
            beta: HashMap::new(),
        }
    }

    /// Current posterior shape parameters for `arm`, falling back to the
    /// prior for arms never updated.
    pub fn posterior(&self, arm: &str) -> (f64, f64) {
        (
            self.alpha.get(arm).copied().unwrap_or(self.prior_alpha),
            self.beta.get(arm).copied().unwrap_or(self.prior_beta),
        )
    }

    fn sample_beta(&mut self, alpha: f64, beta: f64) -> f64 {
        if !(alpha.is_finite() && beta.is_finite()) || alpha <= 0.0 || beta <= 0.0 {
            return 0.5;
        }
        match Beta::new(alpha, beta) {
            Ok(dist) => dist.sample(&mut self.rng),
            Err(_) => 0.5,
        }
    }
}

impl Policy for ThompsonSampling {
    fn name(&self) -> &str {
        "ThompsonSampling"
    }

    fn select_arm(&mut self, candidates: &[ArmId], _context: Option<&RoundContext>) -> ArmId {
        let mut best_arm = &candidates[0];
        let (a, b) = self.posterior(&candidates[0]);
        let mut best_sample = self.sample_beta(a, b);

        for arm in &candidates[1..] {
            let (a, b) = self.posterior(arm);
            let sample = self.sample_beta(a, b);
            if sample > best_sample {
                best_sample = sample;
                best_arm = arm;
            }
        }
        best_arm.clone()
    }

    fn update(&mut self, arm: &str, reward: f64, _context: Option<&Array1<f64>>) {
        *self
            .alpha
            .entry(arm.to_string())
            .or_insert(self.prior_alpha) += reward;
        *self
            .beta
            .entry(arm.to_string())
            .or_insert(self.prior_beta) += 1.0 - reward;
    }
}
