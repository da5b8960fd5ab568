pub mod plots;
pub mod report;

pub use report::{build_report, render_html_report, write_html_report, Report, ReportSection};
