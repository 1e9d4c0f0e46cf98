use std::collections::HashMap;

use chrono::{DateTime, NaiveTime, Utc};
use uuid::Uuid;

use crate::dates;
use crate::models::{
    DerivedJourneyView, ExtractedReport, JourneyCounters, JourneyItem, ReportRecord,
};

/// Build the derived view for one student. `now` is injected so the
/// completed-by-date check stays testable; the CLI passes `Utc::now()`.
pub fn aggregate(
    items: &[JourneyItem],
    reports: &[ReportRecord],
    now: DateTime<Utc>,
) -> DerivedJourneyView {
    DerivedJourneyView {
        items: items.to_vec(),
        reports: associate_reports(reports),
        counters: count_items(items, now),
        date_range: dates::compute_overall_date_range(items),
    }
}

/// At most one report per journey item: the latest `created_at` wins.
/// The rows are sorted here rather than trusting the caller to supply them
/// pre-sorted; ties keep input order. Records with no item linkage are
/// dropped.
pub fn associate_reports(reports: &[ReportRecord]) -> HashMap<Uuid, ExtractedReport> {
    let mut sorted: Vec<&ReportRecord> = reports.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut kept: HashMap<Uuid, ExtractedReport> = HashMap::new();
    for record in sorted {
        let Some(item_id) = record.journey_item_id else {
            continue;
        };
        kept.entry(item_id).or_insert_with(|| extract_report(record));
    }
    kept
}

fn extract_report(record: &ReportRecord) -> ExtractedReport {
    let meta = record.report_data.get("meta");
    let feedback = record.report_data.get("feedback_summary");

    ExtractedReport {
        id: record.id,
        report_type: record.report_type.clone(),
        created_at: record.created_at,
        mentor_name: string_field(meta, "mentor_name"),
        overall_rating: number_field(meta, "overall_rating"),
        overall_score: number_field(meta, "overall_score"),
        improvement_areas: string_list(feedback, "areas_of_improvement"),
        strongest_aspects: string_list(feedback, "strongest_aspects"),
    }
}

fn string_field(block: Option<&serde_json::Value>, key: &str) -> Option<String> {
    block?.get(key)?.as_str().map(str::to_string)
}

fn number_field(block: Option<&serde_json::Value>, key: &str) -> Option<f64> {
    block?.get(key)?.as_f64()
}

fn string_list(block: Option<&serde_json::Value>, key: &str) -> Vec<String> {
    block
        .and_then(|b| b.get(key))
        .and_then(|v| v.as_array())
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| e.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Each item lands in exactly one bucket, checked completed then
/// in-progress then upcoming, so overlapping signals never double-count.
fn count_items(items: &[JourneyItem], now: DateTime<Utc>) -> JourneyCounters {
    let mut completed = 0usize;
    let mut in_progress = 0usize;

    for item in items {
        if is_completed(item, now) {
            completed += 1;
        } else if item.status.as_deref() == Some("In Progress") {
            in_progress += 1;
        }
    }

    let total = items.len();
    let upcoming = total - completed - in_progress;
    let progress_percent = if total > 0 {
        ((completed as f64 / total as f64) * 100.0).round() as u32
    } else {
        0
    };

    JourneyCounters {
        total,
        completed,
        in_progress,
        upcoming,
        progress_percent,
    }
}

fn is_completed(item: &JourneyItem, now: DateTime<Utc>) -> bool {
    if item.status.as_deref() == Some("Completed") {
        return true;
    }
    match item.end_date.as_parsed() {
        Some(end) => end.and_time(NaiveTime::MIN).and_utc() < now,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::ItemDate;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn sample_item(status: Option<&str>, end: Option<&str>) -> JourneyItem {
        JourneyItem {
            id: Uuid::new_v4(),
            particulars: "Mock Interview Session".to_string(),
            start_date: ItemDate::Absent,
            end_date: ItemDate::from_raw(end),
            status: status.map(str::to_string),
            delivery_mode: Some("Online".to_string()),
            total_hours: Some(2.0),
            product: None,
        }
    }

    fn sample_report(
        item_id: Option<Uuid>,
        mentor: &str,
        created_at: DateTime<Utc>,
    ) -> ReportRecord {
        ReportRecord {
            id: Uuid::new_v4(),
            attendee_id: Uuid::new_v4(),
            journey_item_id: item_id,
            report_type: "Diagnostic Interview".to_string(),
            report_data: json!({
                "meta": {
                    "mentor_name": mentor,
                    "overall_rating": 4.5,
                    "overall_score": 82.0,
                },
                "feedback_summary": {
                    "areas_of_improvement": ["System design depth"],
                    "strongest_aspects": ["Communication"],
                }
            }),
            created_at,
        }
    }

    #[test]
    fn buckets_partition_the_items() {
        let items = vec![
            sample_item(Some("Completed"), None),
            sample_item(Some("In Progress"), None),
            sample_item(None, Some("2024-06-10")),
            sample_item(None, Some("2024-07-01")),
            sample_item(None, None),
        ];

        let view = aggregate(&items, &[], fixed_now());
        let counters = &view.counters;
        assert_eq!(counters.total, 5);
        assert_eq!(counters.completed, 2);
        assert_eq!(counters.in_progress, 1);
        assert_eq!(counters.upcoming, 2);
        assert_eq!(
            counters.completed + counters.in_progress + counters.upcoming,
            counters.total
        );
        assert_eq!(counters.progress_percent, 40);
    }

    #[test]
    fn in_progress_status_with_past_end_counts_completed_once() {
        let items = vec![sample_item(Some("In Progress"), Some("2024-06-01"))];
        let counters = aggregate(&items, &[], fixed_now()).counters;
        assert_eq!(counters.completed, 1);
        assert_eq!(counters.in_progress, 0);
        assert_eq!(counters.upcoming, 0);
    }

    #[test]
    fn end_date_today_counts_completed_after_midnight() {
        let items = vec![sample_item(None, Some("2024-06-15"))];
        let counters = aggregate(&items, &[], fixed_now()).counters;
        assert_eq!(counters.completed, 1);
    }

    #[test]
    fn raw_end_dates_never_complete_an_item() {
        let items = vec![sample_item(None, Some("October Week 6"))];
        let counters = aggregate(&items, &[], fixed_now()).counters;
        assert_eq!(counters.completed, 0);
        assert_eq!(counters.upcoming, 1);
    }

    #[test]
    fn empty_inputs_degrade_to_zeroes() {
        let view = aggregate(&[], &[], fixed_now());
        assert_eq!(view.counters.total, 0);
        assert_eq!(view.counters.progress_percent, 0);
        assert!(view.reports.is_empty());
        assert_eq!(view.date_range.start, None);
        assert_eq!(view.date_range.end, None);
    }

    #[test]
    fn progress_percent_rounds_to_nearest() {
        let items = vec![
            sample_item(Some("Completed"), None),
            sample_item(None, None),
            sample_item(None, None),
        ];
        let counters = aggregate(&items, &[], fixed_now()).counters;
        assert_eq!(counters.progress_percent, 33);
    }

    #[test]
    fn latest_report_wins_regardless_of_input_order() {
        let item_id = Uuid::new_v4();
        let earlier = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0).unwrap();

        let ascending = vec![
            sample_report(Some(item_id), "Priya Nair", earlier),
            sample_report(Some(item_id), "Daniel Okafor", later),
        ];
        let kept = associate_reports(&ascending);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[&item_id].mentor_name.as_deref(), Some("Daniel Okafor"));

        let descending = vec![
            sample_report(Some(item_id), "Daniel Okafor", later),
            sample_report(Some(item_id), "Priya Nair", earlier),
        ];
        let kept = associate_reports(&descending);
        assert_eq!(kept[&item_id].mentor_name.as_deref(), Some("Daniel Okafor"));
    }

    #[test]
    fn unlinked_reports_are_dropped() {
        let reports = vec![sample_report(None, "Priya Nair", fixed_now())];
        assert!(associate_reports(&reports).is_empty());
    }

    #[test]
    fn extraction_tolerates_missing_payload_parts() {
        let item_id = Uuid::new_v4();
        let record = ReportRecord {
            id: Uuid::new_v4(),
            attendee_id: Uuid::new_v4(),
            journey_item_id: Some(item_id),
            report_type: "AI Mock Interview Report".to_string(),
            report_data: json!({ "sections": ["intro"] }),
            created_at: fixed_now(),
        };

        let kept = associate_reports(&[record]);
        let extracted = &kept[&item_id];
        assert_eq!(extracted.mentor_name, None);
        assert_eq!(extracted.overall_rating, None);
        assert_eq!(extracted.overall_score, None);
        assert!(extracted.improvement_areas.is_empty());
        assert!(extracted.strongest_aspects.is_empty());
    }

    #[test]
    fn aggregate_is_idempotent_under_a_fixed_clock() {
        let item = sample_item(Some("In Progress"), Some("2024-08-01"));
        let report = sample_report(Some(item.id), "Priya Nair", fixed_now());
        let items = vec![item];
        let reports = vec![report];

        let first = aggregate(&items, &reports, fixed_now());
        let second = aggregate(&items, &reports, fixed_now());
        assert_eq!(first.counters, second.counters);
        assert_eq!(first.date_range, second.date_range);
        assert_eq!(first.reports.len(), second.reports.len());
    }
}
