//! CSV persistence for simulation results.
//!
//! Writes three kinds of files per comparison run: a per-policy round
//! history, an aggregate summary, and a long-format cumulative-CTR table
//! (one row per policy per round) ready for plotting elsewhere.

use std::fs;
use std::path::{Path, PathBuf};

use bandit_core::error::BanditResult;
use bandit_core::types::SimulationResult;
use chrono::{DateTime, Utc};
use tracing::info;

/// Files written by one `save_results` call.
#[derive(Debug, Clone)]
pub struct ReportFiles {
    pub generated_at: DateTime<Utc>,
    pub files: Vec<PathBuf>,
}

/// Write history, summary, and cumulative-CTR CSVs into `output_dir`
/// (created if absent).
pub fn save_results(
    results: &[SimulationResult],
    output_dir: impl AsRef<Path>,
) -> BanditResult<ReportFiles> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;
    let mut files = Vec::new();

    for result in results {
        let path = output_dir.join(format!("history_{}.csv", result.policy));
        fs::write(&path, history_csv(result))?;
        files.push(path);
    }

    let summary_path = output_dir.join("summary.csv");
    fs::write(&summary_path, summary_csv(results))?;
    files.push(summary_path);

    let ctr_path = output_dir.join("cumulative_ctr.csv");
    fs::write(&ctr_path, cumulative_ctr_csv(results))?;
    files.push(ctr_path);

    info!(
        policies = results.len(),
        files = files.len(),
        output_dir = %output_dir.display(),
        "Results saved"
    );

    Ok(ReportFiles {
        generated_at: Utc::now(),
        files,
    })
}

fn history_csv(result: &SimulationResult) -> String {
    let mut csv = String::from("round,user_id,selected_arm,reward\n");
    for record in &result.history {
        csv.push_str(&format!(
            "{},{},{},{:.1}\n",
            record.round,
            field(&record.user_id),
            field(&record.selected_arm),
            record.reward
        ));
    }
    csv
}

fn summary_csv(results: &[SimulationResult]) -> String {
    let mut csv = String::from("policy,total_impressions,total_clicks,click_through_rate\n");
    for result in results {
        csv.push_str(&format!(
            "{},{},{},{}\n",
            field(&result.policy),
            result.total_impressions,
            result.total_clicks,
            result.click_through_rate
        ));
    }
    csv
}

fn cumulative_ctr_csv(results: &[SimulationResult]) -> String {
    let mut csv = String::from("policy,round,cumulative_ctr\n");
    for result in results {
        let mut cumulative_clicks = 0u64;
        for record in &result.history {
            cumulative_clicks += record.reward as u64;
            csv.push_str(&format!(
                "{},{},{}\n",
                field(&result.policy),
                record.round,
                cumulative_clicks as f64 / record.round as f64
            ));
        }
    }
    csv
}

/// Quote a field only when the value requires it.
fn field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
