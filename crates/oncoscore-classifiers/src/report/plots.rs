use plotly::layout::{Axis, BarMode, Layout};
use plotly::{Histogram, Plot};

/// Plot a histogram of the risk scores, one trace per true class.
pub fn plot_risk_histogram(scores: &[f64], labels: &[i32], title: &str) -> Result<Plot, String> {
    if scores.len() != labels.len() {
        return Err(format!(
            "Scores and labels must have the same length ({} vs {})",
            scores.len(),
            labels.len()
        ));
    }
    if let Some(label) = labels.iter().find(|&&l| l != 0 && l != 1) {
        return Err(format!(
            "Labels must be 0 (non-cancerous) or 1 (cancerous), found {}",
            label
        ));
    }

    let mut scores_cancerous = Vec::new();
    let mut scores_non_cancerous = Vec::new();
    for (&score, &label) in scores.iter().zip(labels.iter()) {
        if label == 1 {
            scores_cancerous.push(score);
        } else {
            scores_non_cancerous.push(score);
        }
    }

    let trace_cancerous = Histogram::new(scores_cancerous)
        .name("Cancerous")
        .opacity(0.6);
    let trace_non_cancerous = Histogram::new(scores_non_cancerous)
        .name("Non-Cancerous")
        .opacity(0.6);

    let layout = Layout::new()
        .title(title)
        .bar_mode(BarMode::Overlay)
        .x_axis(Axis::new().title("Risk score"))
        .y_axis(Axis::new().title("Count"));

    let mut plot = Plot::new();
    plot.add_trace(trace_cancerous);
    plot.add_trace(trace_non_cancerous);
    plot.set_layout(layout);

    Ok(plot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_rejects_bad_labels() {
        assert!(plot_risk_histogram(&[0.1, 0.9], &[0, 1], "Risk").is_ok());
        assert!(plot_risk_histogram(&[0.1], &[0, 1], "Risk").is_err());
        assert!(plot_risk_histogram(&[0.1, 0.9], &[0, -1], "Risk").is_err());
    }
}
