use crate::models::{ExtractedReport, JourneyItem, MentorBlock, ReportLink, SessionDetail};
use crate::routes;

/// Fixed reference content shown for every diagnostic session.
const DIAGNOSTIC_AGENDA: &[&str] = &[
    "Introductions and goal setting",
    "Background and skills walkthrough",
    "Role-specific interview questions",
    "Feedback and recommended next steps",
];

const DIAGNOSTIC_PREP_TIPS: &[&str] = &[
    "Keep your latest resume open for reference",
    "Pick a quiet spot and test your microphone",
    "Be ready to talk through two recent projects",
    "Note the roles you want to target this quarter",
];

const NO_CONTENT: &[&str] = &[];

pub fn resolve_session_detail(
    item: &JourneyItem,
    report: Option<&ExtractedReport>,
) -> SessionDetail {
    let module = item.product.as_ref().and_then(|p| p.module.as_ref());

    let is_diagnostic = item
        .particulars
        .to_lowercase()
        .contains("diagnostic interview")
        || module
            .and_then(|m| m.category.as_deref())
            .is_some_and(|category| category.eq_ignore_ascii_case("diagnostic"));

    // The mentor block is gated on a name being present in the payload,
    // not merely on a report existing.
    let mentor = report.and_then(|r| {
        r.mentor_name.as_ref().map(|name| MentorBlock {
            name: name.clone(),
            rating: r.overall_rating,
            score: r.overall_score,
        })
    });

    let report_link = match report {
        Some(r) => ReportLink::Available {
            route: routes::classify_report_route(&r.report_type),
            report_id: r.id,
        },
        None => ReportLink::NotAvailable,
    };

    SessionDetail {
        title: item.particulars.clone(),
        start_display: item.start_date.display(),
        end_display: item.end_date.display(),
        delivery_mode: item.delivery_mode.clone(),
        total_hours: item.total_hours,
        module_description: module.and_then(|m| m.description.clone()),
        module_mode: module.and_then(|m| m.mode.clone()),
        is_diagnostic,
        agenda: if is_diagnostic { DIAGNOSTIC_AGENDA } else { NO_CONTENT },
        prep_tips: if is_diagnostic {
            DIAGNOSTIC_PREP_TIPS
        } else {
            NO_CONTENT
        },
        mentor,
        report: report_link,
    }
}
