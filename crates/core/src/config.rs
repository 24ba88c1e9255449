use serde::Deserialize;

use crate::error::{BanditError, BanditResult};

/// Root application configuration. Loaded from environment variables
/// with the prefix `BANDIT_BENCH__` and overridden by CLI flags.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Cap on the number of behavior rows read from the dataset.
    #[serde(default)]
    pub max_impressions: Option<usize>,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default)]
    pub policies: PolicyConfig,
}

/// Hyperparameters for the benchmarked policies.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    /// Exploration probability for EpsilonGreedy, in [0, 1].
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    /// Beta prior alpha for ThompsonSampling, > 0.
    #[serde(default = "default_prior_alpha")]
    pub prior_alpha: f64,
    /// Beta prior beta for ThompsonSampling, > 0.
    #[serde(default = "default_prior_beta")]
    pub prior_beta: f64,
    /// Confidence-bonus coefficient for LinUCB, >= 0.
    #[serde(default = "default_linucb_alpha")]
    pub linucb_alpha: f64,
    /// RNG seed shared by all stochastic policies. None seeds from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

// Default functions
fn default_data_dir() -> String {
    "data/MINDsmall_dev".to_string()
}
fn default_output_dir() -> String {
    "results".to_string()
}
fn default_epsilon() -> f64 {
    0.1
}
fn default_prior_alpha() -> f64 {
    1.0
}
fn default_prior_beta() -> f64 {
    1.0
}
fn default_linucb_alpha() -> f64 {
    1.0
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            epsilon: default_epsilon(),
            prior_alpha: default_prior_alpha(),
            prior_beta: default_prior_beta(),
            linucb_alpha: default_linucb_alpha(),
            seed: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            max_impressions: None,
            output_dir: default_output_dir(),
            policies: PolicyConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("BANDIT_BENCH")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Reject hyperparameters outside the ranges the policies are
    /// specified for.
    pub fn validate(&self) -> BanditResult<()> {
        self.policies.validate()
    }
}

impl PolicyConfig {
    pub fn validate(&self) -> BanditResult<()> {
        if !self.epsilon.is_finite() || !(0.0..=1.0).contains(&self.epsilon) {
            return Err(BanditError::Config(format!(
                "epsilon must be in [0, 1], got {}",
                self.epsilon
            )));
        }
        if !self.prior_alpha.is_finite() || self.prior_alpha <= 0.0 {
            return Err(BanditError::Config(format!(
                "prior_alpha must be > 0, got {}",
                self.prior_alpha
            )));
        }
        if !self.prior_beta.is_finite() || self.prior_beta <= 0.0 {
            return Err(BanditError::Config(format!(
                "prior_beta must be > 0, got {}",
                self.prior_beta
            )));
        }
        if !self.linucb_alpha.is_finite() || self.linucb_alpha < 0.0 {
            return Err(BanditError::Config(format!(
                "linucb_alpha must be >= 0, got {}",
                self.linucb_alpha
            )));
        }
        Ok(())
    }
}
