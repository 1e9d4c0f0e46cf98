use anyhow::Context;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::dates::ItemDate;
use crate::models::{JourneyItem, ModuleInfo, ProductInfo, ReportRecord};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let students = vec![
        (
            Uuid::parse_str("6f1b6d0a-4c2e-4f43-9a31-b5d3f12a9e77")?,
            "Ananya Sharma",
            "ananya.sharma@student.elevate.dev",
            "Northfield Institute of Technology",
        ),
        (
            Uuid::parse_str("9a4c3b21-7e55-4d08-8f66-0c2d9b1a4f30")?,
            "Rohan Mehta",
            "rohan.mehta@student.elevate.dev",
            "Northfield Institute of Technology",
        ),
    ];

    for (id, name, email, institute) in students {
        sqlx::query(
            r#"
            INSERT INTO journey_tracker.students (id, full_name, email, institute)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE
            SET full_name = EXCLUDED.full_name, institute = EXCLUDED.institute
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(institute)
        .execute(pool)
        .await?;
    }

    let modules = vec![
        (
            "Diagnostic Interview",
            "One-on-one diagnostic interview with an industry mentor",
            "Diagnostic",
            "Live",
        ),
        (
            "Resume Studio",
            "Guided resume rewrite with reviewer feedback",
            "Workshop",
            "Self-paced",
        ),
        (
            "AI Interview Lab",
            "Unlimited mock interviews against the AI interviewer",
            "Practice",
            "Online",
        ),
    ];

    for (name, description, category, mode) in modules {
        sqlx::query(
            r#"
            INSERT INTO journey_tracker.modules (id, name, description, category, mode)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name) DO UPDATE
            SET description = EXCLUDED.description,
                category = EXCLUDED.category,
                mode = EXCLUDED.mode
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .bind(category)
        .bind(mode)
        .execute(pool)
        .await?;
    }

    let products = vec![
        ("Career Kickstart - Diagnostic", "Diagnostic Interview"),
        ("Career Kickstart - Resume", "Resume Studio"),
        ("Career Kickstart - AI Practice", "AI Interview Lab"),
    ];

    for (name, module_name) in products {
        let module_id: Uuid =
            sqlx::query("SELECT id FROM journey_tracker.modules WHERE name = $1")
                .bind(module_name)
                .fetch_one(pool)
                .await?
                .get("id");

        sqlx::query(
            r#"
            INSERT INTO journey_tracker.products (id, name, module_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (name) DO UPDATE SET module_id = EXCLUDED.module_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(module_id)
        .execute(pool)
        .await?;
    }

    let items = vec![
        (
            "seed-001",
            "ananya.sharma@student.elevate.dev",
            "Diagnostic Interview - Round 1",
            Some("2026-01-12"),
            Some("2026-01-12"),
            Some("Completed"),
            Some("Online"),
            Some(1.0_f64),
            Some("Career Kickstart - Diagnostic"),
        ),
        (
            "seed-002",
            "ananya.sharma@student.elevate.dev",
            "Resume Building Workshop",
            Some("2026-02-02"),
            Some("2026-02-13"),
            Some("In Progress"),
            Some("Online"),
            Some(8.0_f64),
            Some("Career Kickstart - Resume"),
        ),
        (
            "seed-003",
            "ananya.sharma@student.elevate.dev",
            "AI Mock Interview Sprint",
            Some("October Week 6"),
            None,
            None,
            Some("Online"),
            Some(4.0_f64),
            Some("Career Kickstart - AI Practice"),
        ),
        (
            "seed-004",
            "rohan.mehta@student.elevate.dev",
            "Diagnostic Interview - Round 1",
            Some("2026-03-09"),
            Some("2026-03-09"),
            None,
            Some("Offline"),
            Some(1.0_f64),
            Some("Career Kickstart - Diagnostic"),
        ),
    ];

    for (source_key, email, particulars, start, end, status, mode, hours, product) in items {
        let student_id: Uuid =
            sqlx::query("SELECT id FROM journey_tracker.students WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?
                .get("id");

        let product_id: Option<Uuid> = match product {
            Some(name) => sqlx::query("SELECT id FROM journey_tracker.products WHERE name = $1")
                .bind(name)
                .fetch_optional(pool)
                .await?
                .map(|row| row.get("id")),
            None => None,
        };

        sqlx::query(
            r#"
            INSERT INTO journey_tracker.journey_items
            (id, student_id, particulars, start_date, end_date, status,
             delivery_mode, total_hours, product_id, source_key)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (source_key) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(student_id)
        .bind(particulars)
        .bind(start)
        .bind(end)
        .bind(status)
        .bind(mode)
        .bind(hours)
        .bind(product_id)
        .bind(source_key)
        .execute(pool)
        .await?;
    }

    let reports = vec![
        (
            "seed-report-001",
            "ananya.sharma@student.elevate.dev",
            Some("seed-001"),
            "Diagnostic Interview Report",
            json!({
                "meta": {
                    "mentor_name": "Priya Nair",
                    "overall_rating": 4.5,
                    "overall_score": 82,
                },
                "feedback_summary": {
                    "areas_of_improvement": ["System design depth", "Conciseness"],
                    "strongest_aspects": ["Communication", "Fundamentals"],
                }
            }),
        ),
        (
            "seed-report-002",
            "ananya.sharma@student.elevate.dev",
            None,
            "AI Mock Interview Report",
            json!({
                "feedback_summary": {
                    "areas_of_improvement": ["Edge case handling"],
                    "strongest_aspects": ["Problem decomposition"],
                },
                "transcript": []
            }),
        ),
    ];

    for (source_key, email, item_key, report_type, report_data) in reports {
        let attendee_id: Uuid =
            sqlx::query("SELECT id FROM journey_tracker.students WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?
                .get("id");

        let journey_item_id: Option<Uuid> = match item_key {
            Some(key) => {
                sqlx::query("SELECT id FROM journey_tracker.journey_items WHERE source_key = $1")
                    .bind(key)
                    .fetch_optional(pool)
                    .await?
                    .map(|row| row.get("id"))
            }
            None => None,
        };

        sqlx::query(
            r#"
            INSERT INTO journey_tracker.session_reports
            (id, attendee_id, journey_item_id, report_type, report_data, source_key)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (source_key) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(attendee_id)
        .bind(journey_item_id)
        .bind(report_type)
        .bind(report_data)
        .bind(source_key)
        .execute(pool)
        .await?;
    }

    Ok(())
}

pub async fn fetch_journey_items(pool: &PgPool, email: &str) -> anyhow::Result<Vec<JourneyItem>> {
    let rows = sqlx::query(
        r#"
        SELECT ji.id, ji.particulars, ji.start_date, ji.end_date, ji.status,
               ji.delivery_mode, ji.total_hours,
               p.name AS product_name,
               m.id AS module_id, m.description AS module_description,
               m.category AS module_category, m.mode AS module_mode
        FROM journey_tracker.journey_items ji
        JOIN journey_tracker.students st ON st.id = ji.student_id
        LEFT JOIN journey_tracker.products p ON p.id = ji.product_id
        LEFT JOIN journey_tracker.modules m ON m.id = p.module_id
        WHERE st.email = $1
        ORDER BY ji.start_date ASC
        "#,
    )
    .bind(email)
    .fetch_all(pool)
    .await
    .context("failed to fetch journey items")?;

    let mut items = Vec::new();
    for row in rows {
        let product_name: Option<String> = row.get("product_name");
        let module_id: Option<Uuid> = row.get("module_id");

        let product = product_name.map(|name| ProductInfo {
            name,
            module: module_id.map(|_| ModuleInfo {
                description: row.get("module_description"),
                category: row.get("module_category"),
                mode: row.get("module_mode"),
            }),
        });

        let start_date: Option<String> = row.get("start_date");
        let end_date: Option<String> = row.get("end_date");

        items.push(JourneyItem {
            id: row.get("id"),
            particulars: row.get("particulars"),
            start_date: ItemDate::from_raw(start_date.as_deref()),
            end_date: ItemDate::from_raw(end_date.as_deref()),
            status: row.get("status"),
            delivery_mode: row.get("delivery_mode"),
            total_hours: row.get("total_hours"),
            product,
        });
    }

    Ok(items)
}

pub async fn fetch_reports(pool: &PgPool, email: &str) -> anyhow::Result<Vec<ReportRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT r.id, r.attendee_id, r.journey_item_id, r.report_type,
               r.report_data, r.created_at
        FROM journey_tracker.session_reports r
        JOIN journey_tracker.students st ON st.id = r.attendee_id
        WHERE st.email = $1
        ORDER BY r.created_at DESC
        "#,
    )
    .bind(email)
    .fetch_all(pool)
    .await
    .context("failed to fetch session reports")?;

    let mut reports = Vec::new();
    for row in rows {
        let created_at: DateTime<Utc> = row.get("created_at");
        reports.push(ReportRecord {
            id: row.get("id"),
            attendee_id: row.get("attendee_id"),
            journey_item_id: row.get("journey_item_id"),
            report_type: row.get("report_type"),
            report_data: row.get("report_data"),
            created_at,
        });
    }

    Ok(reports)
}

pub async fn import_csv(
    pool: &PgPool,
    csv_path: &std::path::Path,
    email: &str,
) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        particulars: String,
        start_date: Option<String>,
        end_date: Option<String>,
        status: Option<String>,
        delivery_mode: Option<String>,
        total_hours: Option<f64>,
        product: Option<String>,
        source_key: Option<String>,
    }

    let student_id: Uuid = sqlx::query("SELECT id FROM journey_tracker.students WHERE email = $1")
        .bind(email)
        .fetch_one(pool)
        .await
        .context("student not found for import")?
        .get("id");

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut inserted = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;

        let product_id: Option<Uuid> = match row.product.as_deref() {
            Some(name) => sqlx::query("SELECT id FROM journey_tracker.products WHERE name = $1")
                .bind(name)
                .fetch_optional(pool)
                .await?
                .map(|found| found.get("id")),
            None => None,
        };

        let source_key = row
            .source_key
            .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

        let result = sqlx::query(
            r#"
            INSERT INTO journey_tracker.journey_items
            (id, student_id, particulars, start_date, end_date, status,
             delivery_mode, total_hours, product_id, source_key)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (source_key) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(student_id)
        .bind(&row.particulars)
        .bind(&row.start_date)
        .bind(&row.end_date)
        .bind(&row.status)
        .bind(&row.delivery_mode)
        .bind(row.total_hours)
        .bind(product_id)
        .bind(source_key)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
        }
    }

    Ok(inserted)
}
