use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::dates::ItemDate;
use crate::routes::RouteTag;

#[derive(Debug, Clone)]
pub struct JourneyItem {
    pub id: Uuid,
    pub particulars: String,
    pub start_date: ItemDate,
    pub end_date: ItemDate,
    pub status: Option<String>,
    pub delivery_mode: Option<String>,
    pub total_hours: Option<f64>,
    pub product: Option<ProductInfo>,
}

#[derive(Debug, Clone)]
pub struct ProductInfo {
    pub name: String,
    pub module: Option<ModuleInfo>,
}

#[derive(Debug, Clone)]
pub struct ModuleInfo {
    pub description: Option<String>,
    pub category: Option<String>,
    pub mode: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReportRecord {
    pub id: Uuid,
    pub attendee_id: Uuid,
    pub journey_item_id: Option<Uuid>,
    pub report_type: String,
    pub report_data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// The kept report for one journey item, with convenience fields already
/// pulled out of the semi-structured payload.
#[derive(Debug, Clone)]
pub struct ExtractedReport {
    pub id: Uuid,
    pub report_type: String,
    pub created_at: DateTime<Utc>,
    pub mentor_name: Option<String>,
    pub overall_rating: Option<f64>,
    pub overall_score: Option<f64>,
    pub improvement_areas: Vec<String>,
    pub strongest_aspects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyCounters {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub upcoming: usize,
    pub progress_percent: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DerivedJourneyView {
    pub items: Vec<JourneyItem>,
    pub reports: HashMap<Uuid, ExtractedReport>,
    pub counters: JourneyCounters,
    pub date_range: DateRange,
}

#[derive(Debug, Clone)]
pub struct SessionDetail {
    pub title: String,
    pub start_display: Option<String>,
    pub end_display: Option<String>,
    pub delivery_mode: Option<String>,
    pub total_hours: Option<f64>,
    pub module_description: Option<String>,
    pub module_mode: Option<String>,
    pub is_diagnostic: bool,
    pub agenda: &'static [&'static str],
    pub prep_tips: &'static [&'static str],
    pub mentor: Option<MentorBlock>,
    pub report: ReportLink,
}

#[derive(Debug, Clone)]
pub struct MentorBlock {
    pub name: String,
    pub rating: Option<f64>,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportLink {
    Available { route: RouteTag, report_id: Uuid },
    NotAvailable,
}
