//! Console summary of a comparison run.

use bandit_core::types::SimulationResult;

/// Render the per-policy results block printed after a comparison run.
pub fn render_summary(results: &[SimulationResult]) -> String {
    let mut out = String::from("=== Results ===\n");
    for result in results {
        out.push_str(&format!(
            "  {:<20}  CTR={:.4}  ({}/{})\n",
            result.policy,
            result.click_through_rate,
            result.total_clicks,
            result.total_impressions
        ));
    }
    out
}
