//! Result reporting: CSV exports for downstream analysis and a console
//! summary table.

pub mod csv;
pub mod summary;

pub use csv::{save_results, ReportFiles};
pub use summary::render_summary;
