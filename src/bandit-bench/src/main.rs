//! BanditBench — head-to-head benchmark of bandit recommendation policies
//! on MIND-format impression logs.
//!
//! Loads (or generates) a dataset, replays it through every requested
//! policy with the comparison runner, prints a summary table, and writes
//! CSV reports for downstream analysis.

use bandit_core::config::{AppConfig, PolicyConfig};
use bandit_core::types::RoundSource;
use bandit_datasets::{MindDataset, SyntheticConfig};
use bandit_policies::{EpsilonGreedy, LinUCB, Policy, RandomChoice, ThompsonSampling};
use bandit_reporting::{render_summary, save_results};
use bandit_simulation::compare_policies;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "bandit-bench")]
#[command(about = "Benchmark bandit policies on news-recommendation impression logs")]
#[command(version)]
struct Cli {
    /// Directory containing news.tsv and behaviors.tsv (overrides config)
    #[arg(long, env = "BANDIT_BENCH__DATA_DIR")]
    data_dir: Option<String>,

    /// Only read the first N impression rows (overrides config)
    #[arg(long, env = "BANDIT_BENCH__MAX_IMPRESSIONS")]
    max_impressions: Option<usize>,

    /// Output directory for CSV reports (overrides config)
    #[arg(long, env = "BANDIT_BENCH__OUTPUT_DIR")]
    output: Option<String>,

    /// Generate a synthetic dataset with this many impressions into the
    /// data directory instead of expecting real MIND files
    #[arg(long)]
    synthetic: Option<usize>,

    /// Policies to run, in order
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "random,epsilon-greedy,thompson,linucb"
    )]
    policies: Vec<String>,

    /// Exploration probability for epsilon-greedy (overrides config)
    #[arg(long)]
    epsilon: Option<f64>,

    /// Beta prior alpha for Thompson Sampling (overrides config)
    #[arg(long)]
    prior_alpha: Option<f64>,

    /// Beta prior beta for Thompson Sampling (overrides config)
    #[arg(long)]
    prior_beta: Option<f64>,

    /// Confidence-bonus coefficient for LinUCB (overrides config)
    #[arg(long)]
    linucb_alpha: Option<f64>,

    /// RNG seed for all stochastic policies (overrides config)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bandit_bench=info,bandit_simulation=info,bandit_datasets=info,bandit_reporting=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(max) = cli.max_impressions {
        config.max_impressions = Some(max);
    }
    if let Some(output) = cli.output {
        config.output_dir = output;
    }
    if let Some(epsilon) = cli.epsilon {
        config.policies.epsilon = epsilon;
    }
    if let Some(prior_alpha) = cli.prior_alpha {
        config.policies.prior_alpha = prior_alpha;
    }
    if let Some(prior_beta) = cli.prior_beta {
        config.policies.prior_beta = prior_beta;
    }
    if let Some(linucb_alpha) = cli.linucb_alpha {
        config.policies.linucb_alpha = linucb_alpha;
    }
    if let Some(seed) = cli.seed {
        config.policies.seed = Some(seed);
    }
    config.validate()?;

    info!(
        data_dir = %config.data_dir,
        output_dir = %config.output_dir,
        policies = ?cli.policies,
        "Configuration loaded"
    );

    if let Some(impressions) = cli.synthetic {
        let synthetic = SyntheticConfig {
            num_impressions: impressions,
            seed: config.policies.seed.unwrap_or(42),
            ..SyntheticConfig::default()
        };
        synthetic.write_mind_files(&config.data_dir)?;
    }

    let dataset = MindDataset::load(&config.data_dir, config.max_impressions)?;
    println!(
        "Loaded {} impression rounds from {}",
        dataset.len(),
        config.data_dir
    );

    let policies = build_policies(&cli.policies, &config.policies)?;
    let results = compare_policies(policies, &dataset)?;

    print!("{}", render_summary(&results));

    let report = save_results(&results, &config.output_dir)?;
    println!(
        "Results saved to: {} ({} files)",
        config.output_dir,
        report.files.len()
    );

    Ok(())
}

fn build_policies(
    names: &[String],
    config: &PolicyConfig,
) -> anyhow::Result<Vec<Box<dyn Policy>>> {
    let mut policies: Vec<Box<dyn Policy>> = Vec::with_capacity(names.len());
    for name in names {
        match name.as_str() {
            "random" => policies.push(Box::new(RandomChoice::new(config.seed))),
            "epsilon-greedy" => {
                policies.push(Box::new(EpsilonGreedy::new(config.epsilon, config.seed)))
            }
            "thompson" => policies.push(Box::new(ThompsonSampling::new(
                config.prior_alpha,
                config.prior_beta,
                config.seed,
            ))),
            "linucb" => policies.push(Box::new(LinUCB::new(config.linucb_alpha, config.seed))),
            other => anyhow::bail!(
                "unknown policy {other:?} (expected random, epsilon-greedy, thompson, linucb)"
            ),
        }
    }
    Ok(policies)
}
