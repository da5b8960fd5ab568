//! Self-contained HTML evaluation report.
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use plotly::Plot;

use crate::diagnosis::ModelEvaluation;
use crate::metrics::ConfusionMatrix;
use crate::report::plots::plot_risk_histogram;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";

const STYLE: &str = "
body { font-family: sans-serif; margin: 2em; color: #222; }
h1 { margin-bottom: 0.2em; }
.subtitle { color: #666; margin-top: 0; }
section { margin-top: 2em; }
table { border-collapse: collapse; margin: 1em 0; }
th, td { border: 1px solid #ccc; padding: 4px 10px; text-align: right; }
th { background-color: #f5f5f5; }
";

pub struct ReportSection {
    title: String,
    content: Vec<Markup>,
}

impl ReportSection {
    pub fn new(title: &str) -> Self {
        ReportSection {
            title: title.to_string(),
            content: Vec::new(),
        }
    }

    pub fn add_content(&mut self, content: Markup) {
        self.content.push(content);
    }

    /// Embed a plot as an inline div; the page loads plotly.js once.
    pub fn add_plot(&mut self, plot: Plot) {
        self.content.push(PreEscaped(plot.to_inline_html(None)));
    }

    fn render(&self) -> Markup {
        html! {
            section {
                h2 { (self.title) }
                @for block in &self.content {
                    div { (block) }
                }
            }
        }
    }
}

pub struct Report {
    title: String,
    version: String,
    subtitle: String,
    sections: Vec<ReportSection>,
}

impl Report {
    pub fn new(title: &str, version: &str, subtitle: &str) -> Self {
        Report {
            title: title.to_string(),
            version: version.to_string(),
            subtitle: subtitle.to_string(),
            sections: Vec::new(),
        }
    }

    pub fn add_section(&mut self, section: ReportSection) {
        self.sections.push(section);
    }

    pub fn render(&self) -> String {
        let generated = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let page = html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="utf-8";
                    title { (self.title) " - " (self.subtitle) }
                    script src=(PLOTLY_CDN) {}
                    style { (PreEscaped(STYLE)) }
                }
                body {
                    h1 { (self.title) " " small { "v" (self.version) } }
                    p class="subtitle" { (self.subtitle) }
                    p { "Generated " (generated) }
                    @for section in &self.sections {
                        (section.render())
                    }
                }
            }
        };
        page.into_string()
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(&path, self.render())
            .with_context(|| format!("Failed to write report to {}", path.as_ref().display()))
    }
}

fn metrics_table(evaluations: &[ModelEvaluation]) -> Markup {
    html! {
        table {
            tr {
                th { "Model" }
                th { "Accuracy" }
                th { "Precision" }
                th { "Recall" }
                th { "F1-Score" }
            }
            @for eval in evaluations {
                tr {
                    td { (eval.kind.display_name()) }
                    td { (format!("{:.4}", eval.report.accuracy)) }
                    td { (format!("{:.4}", eval.report.precision)) }
                    td { (format!("{:.4}", eval.report.recall)) }
                    td { (format!("{:.4}", eval.report.f1_score)) }
                }
            }
        }
    }
}

fn confusion_table(cm: &ConfusionMatrix) -> Markup {
    html! {
        table {
            tr { th {} th { "Predicted negative" } th { "Predicted positive" } }
            tr { th { "Actual negative" } td { (cm.true_negative) } td { (cm.false_positive) } }
            tr { th { "Actual positive" } td { (cm.false_negative) } td { (cm.true_positive) } }
        }
    }
}

/// Build the evaluation report: a metrics overview and, per model, its
/// confusion matrix and risk-score histogram.
pub fn build_report(evaluations: &[ModelEvaluation], title: &str) -> Result<Report> {
    let mut report = Report::new(title, env!("CARGO_PKG_VERSION"), "Model Evaluation Report");

    let n_samples = evaluations.first().map(|e| e.labels.len()).unwrap_or(0);
    let mut overview = ReportSection::new("Overview");
    overview.add_content(html! {
        p { "Evaluation of " (evaluations.len()) " classifier(s) on " (n_samples) " held-out samples." }
    });
    overview.add_content(metrics_table(evaluations));
    report.add_section(overview);

    for eval in evaluations {
        let mut section = ReportSection::new(eval.kind.display_name());
        section.add_content(confusion_table(&eval.report.confusion_matrix));

        let plot = plot_risk_histogram(
            &eval.risk_scores,
            &eval.labels,
            &format!("{} risk scores", eval.kind.display_name()),
        )
        .map_err(|e| anyhow!(e))?;
        section.add_plot(plot);
        report.add_section(section);
    }

    Ok(report)
}

/// Render the evaluation report as an HTML page.
pub fn render_html_report(evaluations: &[ModelEvaluation], title: &str) -> Result<String> {
    Ok(build_report(evaluations, title)?.render())
}

pub fn write_html_report<P: AsRef<Path>>(
    path: P,
    evaluations: &[ModelEvaluation],
    title: &str,
) -> Result<()> {
    build_report(evaluations, title)?.save_to_file(&path)?;
    log::info!("Report saved to {}", path.as_ref().display());
    Ok(())
}
