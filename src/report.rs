use std::fmt::Write;

use crate::models::{DerivedJourneyView, ExtractedReport, JourneyItem};

pub fn build_report(student_label: &str, view: &DerivedJourneyView) -> String {
    let mut output = String::new();
    let counters = &view.counters;

    let _ = writeln!(output, "# Learning Journey Report");
    let _ = writeln!(output, "Generated for {}", student_label);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Progress");
    let _ = writeln!(
        output,
        "- {} sessions: {} completed, {} in progress, {} upcoming",
        counters.total, counters.completed, counters.in_progress, counters.upcoming
    );
    let _ = writeln!(output, "- Overall progress: {}%", counters.progress_percent);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Program Window");
    match (&view.date_range.start, &view.date_range.end) {
        (Some(start), Some(end)) => {
            let _ = writeln!(output, "{} to {}", start, end);
        }
        _ => {
            let _ = writeln!(output, "No scheduled dates yet.");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Sessions");

    if view.items.is_empty() {
        let _ = writeln!(output, "No sessions scheduled for this student.");
    } else {
        for item in view.items.iter() {
            let _ = writeln!(output, "- {}", session_line(item, view));
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Latest Reports");

    let mut reports: Vec<&ExtractedReport> = view.reports.values().collect();
    reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    if reports.is_empty() {
        let _ = writeln!(output, "No reports received yet.");
    } else {
        for report in reports.iter().take(5) {
            let mentor = report
                .mentor_name
                .as_deref()
                .unwrap_or("mentor not recorded");
            match report.overall_rating {
                Some(rating) => {
                    let _ = writeln!(
                        output,
                        "- {} ({}, rating {:.1})",
                        report.report_type, mentor, rating
                    );
                }
                None => {
                    let _ = writeln!(output, "- {} ({})", report.report_type, mentor);
                }
            }
        }
    }

    output
}

fn session_line(item: &JourneyItem, view: &DerivedJourneyView) -> String {
    let window = match (item.start_date.display(), item.end_date.display()) {
        (Some(start), Some(end)) => format!("{} to {}", start, end),
        (Some(start), None) => format!("from {}", start),
        (None, Some(end)) => format!("until {}", end),
        (None, None) => "unscheduled".to_string(),
    };
    let status = item.status.as_deref().unwrap_or("Not started");
    let report = if view.reports.contains_key(&item.id) {
        "report available"
    } else {
        "report pending"
    };
    format!("{} ({}): {}, {}", item.particulars, window, status, report)
}
