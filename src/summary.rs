//! Result formatting shared by the TUI and text mode.
//!
//! Confidence labels and the analysis rendering live here so both
//! presentation layers show identical numbers.

use crate::model::PredictionReport;

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

/// Two-decimal percent label for a confidence value. The raw value is
/// formatted as-is; only bar fills clamp.
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.2}%", confidence * 100.0)
}

/// ASCII confidence bar for text mode. Fill is the clamped confidence
/// share of `width`.
pub fn confidence_bar(confidence: f64, width: usize) -> String {
    let filled = (confidence.clamp(0.0, 1.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Render the opaque analysis payload. The only massaging is turning
/// literal `\n` escapes into real newlines so multi-line write-ups read
/// as paragraphs.
pub fn format_analysis(value: &serde_json::Value) -> String {
    serde_json::to_string(value)
        .unwrap_or_default()
        .replace("\\n", "\n")
}

/// Build a text summary from a completed prediction report.
pub(crate) fn build_text_summary(report: &PredictionReport) -> TextSummary {
    let mut lines = Vec::new();

    lines.push(format!("File: {}", report.file_name));
    lines.push(format!(
        "Service: {} ({} ms)",
        report.service_url, report.elapsed_ms
    ));
    lines.push(format!("Analyzed: {}", report.timestamp_utc));

    if report.predictions.is_empty() {
        lines.push("Predictions: none".to_string());
    } else {
        lines.push("Predictions:".to_string());
        let name_width = report
            .predictions
            .iter()
            .map(|p| p.breed.chars().count())
            .max()
            .unwrap_or(0);
        for (i, p) in report.predictions.iter().enumerate() {
            lines.push(format!(
                "  {}. {:<name_width$}  {:>7}  {}",
                i + 1,
                p.breed,
                format_confidence(p.confidence),
                confidence_bar(p.confidence, 24)
            ));
        }
    }

    if let Some(analysis) = report.breed_analysis.as_ref() {
        lines.push("Breed analysis:".to_string());
        for line in format_analysis(analysis).lines() {
            lines.push(format!("  {}", line));
        }
    }

    TextSummary { lines }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Prediction;
    use serde_json::json;

    fn report(predictions: Vec<Prediction>, analysis: Option<serde_json::Value>) -> PredictionReport {
        PredictionReport {
            timestamp_utc: "2025-01-01T00:00:00Z".into(),
            file_name: "dog.jpg".into(),
            service_url: "http://localhost:5001/service".into(),
            elapsed_ms: 832,
            predictions,
            breed_analysis: analysis,
        }
    }

    #[test]
    fn confidence_label_has_two_decimals() {
        assert_eq!(format_confidence(0.92), "92.00%");
        assert_eq!(format_confidence(0.0), "0.00%");
        assert_eq!(format_confidence(1.0), "100.00%");
        assert_eq!(format_confidence(0.123456), "12.35%");
    }

    #[test]
    fn confidence_label_shows_raw_out_of_range_values() {
        assert_eq!(format_confidence(1.5), "150.00%");
        assert_eq!(format_confidence(-0.25), "-25.00%");
    }

    #[test]
    fn bar_fill_clamps_out_of_range_values() {
        assert_eq!(confidence_bar(1.5, 8), "[########]");
        assert_eq!(confidence_bar(-0.2, 8), "[--------]");
        assert_eq!(confidence_bar(0.5, 8), "[####----]");
    }

    #[test]
    fn analysis_unescapes_embedded_newlines() {
        let rendered = format_analysis(&json!({ "notes": "line one\nline two" }));
        assert!(rendered.contains("line one\nline two"));
        assert!(!rendered.contains("\\n"));
    }

    #[test]
    fn summary_lists_numbered_predictions() {
        let summary = build_text_summary(&report(
            vec![
                Prediction {
                    breed: "Golden Retriever".into(),
                    confidence: 0.92,
                },
                Prediction {
                    breed: "Labrador".into(),
                    confidence: 0.05,
                },
            ],
            None,
        ));
        let text = summary.lines.join("\n");
        assert!(text.contains("File: dog.jpg"));
        assert!(text.contains("1. Golden Retriever"));
        assert!(text.contains("92.00%"));
        assert!(text.contains("2. Labrador"));
        assert!(!text.contains("Breed analysis"));
    }

    #[test]
    fn summary_marks_empty_predictions() {
        let summary = build_text_summary(&report(Vec::new(), None));
        assert!(summary.lines.contains(&"Predictions: none".to_string()));
    }

    #[test]
    fn summary_appends_analysis_when_present() {
        let summary = build_text_summary(&report(
            Vec::new(),
            Some(json!({ "origin": "Scotland" })),
        ));
        let text = summary.lines.join("\n");
        assert!(text.contains("Breed analysis:"));
        assert!(text.contains("Scotland"));
    }
}
