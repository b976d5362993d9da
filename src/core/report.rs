use std::fmt::Write;

use chrono::{DateTime, Local};

use super::models::{AnalysisResponse, ScoreBand};
use super::service::SessionView;
use super::validation::format_file_size;

const RESULTS_RULE: &str = "========================================";

/// Renders the session the way the results page lays it out: upload, error banner, then
/// the result sections.
pub fn render_session(view: &SessionView, rendered_at: DateTime<Local>) -> String {
    let mut out = String::new();

    if let (Some(name), Some(size)) = (&view.file_name, view.file_size) {
        let _ = writeln!(out, "Resume: {name} ({})", format_file_size(size));
    }

    if view.busy {
        let _ = writeln!(out, "Analyzing...");
    }

    if let Some(error) = &view.error {
        let _ = writeln!(out, "Error: {error}");
    }

    if let Some(result) = &view.result {
        let heading = format!("Analysis Results ({})", rendered_at.format("%Y-%m-%d %H:%M"));
        // A fresh result is framed so it stands out from the upload lines above it.
        if view.reveal_results {
            let _ = writeln!(out, "\n{RESULTS_RULE}\n{heading}\n{RESULTS_RULE}");
        } else {
            let _ = writeln!(out, "{heading}");
        }
        out.push_str(&render_result(result));
    }

    out
}

pub fn render_result(result: &AnalysisResponse) -> String {
    let mut out = String::new();
    let band = ScoreBand::from_score(result.score);

    let _ = writeln!(
        out,
        "Resume Match Score: {:.0}% ({})",
        result.score,
        band.label()
    );

    let _ = writeln!(out, "\nMatching Skills ({})", result.matching_skills.len());
    push_list(&mut out, &result.matching_skills, "No matching skills found");

    let _ = writeln!(out, "\nMissing Skills ({})", result.missing_skills.len());
    push_list(&mut out, &result.missing_skills, "No missing skills identified");

    if !result.missing_qualifications.is_empty() {
        let _ = writeln!(out, "\nMissing Qualifications");
        push_list(&mut out, &result.missing_qualifications, "");
    }

    let _ = writeln!(out, "\nSuggestions for Improvement");
    if result.suggestions.is_empty() {
        let _ = writeln!(out, "  No specific suggestions available");
    } else {
        for (index, suggestion) in result.suggestions.iter().enumerate() {
            let _ = writeln!(out, "  {}. {suggestion}", index + 1);
        }
    }

    let has_structured = !result.matching_skills.is_empty()
        || !result.missing_skills.is_empty()
        || !result.missing_qualifications.is_empty()
        || !result.suggestions.is_empty();
    if !has_structured {
        if let Some(raw) = result.raw_ai.as_deref().filter(|v| !v.trim().is_empty()) {
            let _ = writeln!(out, "\nRaw analysis\n{}", raw.trim());
        }
    }

    out
}

fn push_list(out: &mut String, items: &[String], empty: &str) {
    if items.is_empty() {
        let _ = writeln!(out, "  {empty}");
        return;
    }

    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}
