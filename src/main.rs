use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use elevate_journey_tracker::models::{DerivedJourneyView, ReportLink, SessionDetail};
use elevate_journey_tracker::{aggregate, db, report, session};

#[derive(Parser)]
#[command(name = "journey-tracker")]
#[command(about = "Learning journey tracker for the Elevate career portal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed data
    Seed,
    /// Import journey items for a student from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        email: String,
    },
    /// Show a student's journey overview
    Overview {
        #[arg(long)]
        email: String,
    },
    /// Show the detail view for one journey item
    Session {
        #[arg(long)]
        email: String,
        #[arg(long)]
        item: Uuid,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to the portal's Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { csv, email } => {
            let inserted = db::import_csv(&pool, &csv, &email).await?;
            println!("Inserted {inserted} journey items from {}.", csv.display());
        }
        Commands::Overview { email } => {
            let view = fetch_view(&pool, &email).await?;
            print_overview(&email, &view);
        }
        Commands::Session { email, item } => {
            let view = fetch_view(&pool, &email).await?;
            let Some(selected) = view.items.iter().find(|i| i.id == item) else {
                println!("No journey item {item} for {email}.");
                return Ok(());
            };
            let detail = session::resolve_session_detail(selected, view.reports.get(&item));
            print_session(&detail);
        }
        Commands::Report { email, out } => {
            let view = fetch_view(&pool, &email).await?;
            let report = report::build_report(&email, &view);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

/// Items and reports are independent queries; fetch them concurrently and
/// aggregate once both have completed.
async fn fetch_view(pool: &sqlx::PgPool, email: &str) -> anyhow::Result<DerivedJourneyView> {
    let (items, reports) = tokio::try_join!(
        db::fetch_journey_items(pool, email),
        db::fetch_reports(pool, email),
    )?;
    Ok(aggregate::aggregate(&items, &reports, Utc::now()))
}

fn print_overview(email: &str, view: &DerivedJourneyView) {
    if view.items.is_empty() {
        println!("No journey items found for {email}.");
        return;
    }

    let counters = &view.counters;
    println!(
        "{} sessions: {} completed, {} in progress, {} upcoming ({}% complete)",
        counters.total,
        counters.completed,
        counters.in_progress,
        counters.upcoming,
        counters.progress_percent
    );
    match (&view.date_range.start, &view.date_range.end) {
        (Some(start), Some(end)) => println!("Program window: {start} to {end}"),
        _ => println!("Program window: not scheduled yet"),
    }

    for item in view.items.iter() {
        let status = item.status.as_deref().unwrap_or("Not started");
        let report = if view.reports.contains_key(&item.id) {
            "report available"
        } else {
            "report pending"
        };
        println!("- {} [{}] ({status}, {report})", item.particulars, item.id);
    }
}

fn print_session(detail: &SessionDetail) {
    println!("{}", detail.title);
    if let Some(start) = &detail.start_display {
        println!("Starts: {start}");
    }
    if let Some(end) = &detail.end_display {
        println!("Ends: {end}");
    }
    if let Some(mode) = &detail.delivery_mode {
        println!("Delivery: {mode}");
    }
    if let Some(hours) = detail.total_hours {
        println!("Duration: {hours} hours");
    }
    if let Some(description) = &detail.module_description {
        println!("About: {description}");
    }
    if let Some(mode) = &detail.module_mode {
        println!("Module mode: {mode}");
    }

    if let Some(mentor) = &detail.mentor {
        println!("Mentor: {}", mentor.name);
        if let Some(rating) = mentor.rating {
            println!("Rating: {rating:.1}/5");
        }
        if let Some(score) = mentor.score {
            println!("Score: {score:.0}");
        }
    }

    if detail.is_diagnostic {
        println!("Agenda:");
        for step in detail.agenda {
            println!("  - {step}");
        }
        println!("Prep tips:");
        for tip in detail.prep_tips {
            println!("  - {tip}");
        }
    }

    match &detail.report {
        ReportLink::Available { route, report_id } => {
            println!("Report: /reports/{}/{report_id}", route.slug());
        }
        ReportLink::NotAvailable => println!("Report: not available yet"),
    }
}
