//! Seed data script - populates the store with a small demo venue
//!
//! Run with: cargo run --bin seed-data -- --migrate --days 2
//!
//! This creates:
//! - 9 facilities, each with a `Normal` status row
//! - hourly raw and predicted visitor counts for the last N days
//! - a few queue samples for all but one facility
//! - one working log entry
//!
//! Re-running keeps existing facilities and series rows; queue samples and the
//! log entry are appended again.

use chrono::{DateTime, Duration, DurationRound, Timelike, Utc};
use clap::Parser;
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ConnectOptions, Database, DatabaseConnection,
    EntityTrait, Set,
};
use std::time::Duration as StdDuration;
use tracing::info;

use facility_monitor_api::{
    db,
    entities::{
        facility_status, fixed_data, predict_data, raw_data, time_wait_data, working_log,
        FacilityStatusKind,
    },
};

#[derive(Debug, Parser)]
#[command(name = "seed-data", about = "Load a demo venue into the facility monitor store")]
struct Args {
    /// Store URL; falls back to DATABASE_URL
    #[arg(long, env = "DATABASE_URL", default_value = "postgres://postgres@localhost:5432/mdap")]
    database_url: String,

    /// Days of hourly visitor history to generate
    #[arg(long, default_value_t = 1)]
    days: u32,

    /// Run embedded migrations first
    #[arg(long)]
    migrate: bool,
}

/// (id, name, capacity, runtime, base hourly visitors)
const VENUE: [(i32, &str, i32, &str, i32); 9] = [
    (1, "Roller Coaster", 24, "09:00-21:00", 180),
    (2, "Ferris Wheel", 48, "10:00-22:00", 140),
    (3, "Log Flume", 16, "10:00-19:00", 120),
    (4, "Carousel", 40, "09:00-21:00", 90),
    (5, "Haunted House", 12, "12:00-22:00", 75),
    (6, "Bumper Cars", 20, "10:00-20:00", 110),
    (7, "Drop Tower", 16, "11:00-20:00", 95),
    (8, "Teacups", 30, "09:00-19:00", 60),
    (9, "Water Slide", 10, "11:00-18:00", 130),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();
    info!("=== Facility Monitor Seed Data ===");

    let mut options = ConnectOptions::new(args.database_url.clone());
    options
        .max_connections(5)
        .min_connections(1)
        .connect_timeout(StdDuration::from_secs(10))
        .acquire_timeout(StdDuration::from_secs(10))
        .sqlx_logging(false);

    info!("Connecting to database: {}", args.database_url);
    let conn = Database::connect(options).await?;

    if args.migrate {
        db::run_migrations(&conn).await?;
    }

    info!("Creating facilities...");
    create_facilities(&conn).await?;

    let now = Utc::now().duration_trunc(Duration::hours(1))?;
    info!("Creating {} day(s) of visitor history...", args.days);
    let samples = create_observations(&conn, now, args.days).await?;
    info!("  Wrote {} hourly samples per series", samples);

    info!("Creating queue samples...");
    let queued = create_queue_samples(&conn, now).await?;
    info!("  Wrote {} queue samples", queued);

    working_log::ActiveModel {
        facility: Set(Some(VENUE[0].1.to_string())),
        log_type: Set(Some("info".to_string())),
        message: Set(Some("Demo data loaded".to_string())),
        ..Default::default()
    }
    .insert(&conn)
    .await?;

    info!("=== Seed Data Complete ===");
    info!("Try: curl http://localhost:3000/api/facilities");

    db::close_pool(conn).await?;
    Ok(())
}

async fn create_facilities(conn: &DatabaseConnection) -> anyhow::Result<()> {
    let facilities = VENUE.iter().map(|(id, name, capacity, runtime, _)| fixed_data::ActiveModel {
        facility_id: Set(*id),
        name: Set(name.to_string()),
        maximum_capacity: Set(*capacity),
        runtime: Set(runtime.to_string()),
    });
    fixed_data::Entity::insert_many(facilities)
        .on_conflict(
            OnConflict::column(fixed_data::Column::FacilityId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    let statuses = VENUE.iter().map(|(_, name, ..)| facility_status::ActiveModel {
        name: Set(name.to_string()),
        status: Set(FacilityStatusKind::Normal),
    });
    facility_status::Entity::insert_many(statuses)
        .on_conflict(
            OnConflict::column(facility_status::Column::Name)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    Ok(())
}

/// Visitors follow a midday peak; predictions overshoot slightly.
fn visitors_at(base: i32, at: DateTime<Utc>) -> i32 {
    let hour = f64::from(at.hour());
    let shape = (-((hour - 14.0) / 4.0).powi(2)).exp();
    (base as f64 * (0.2 + shape)).round() as i32
}

/// Rows per multi-row INSERT, three binds each, under SQLite's 999 parameter cap.
const INSERT_CHUNK: usize = 300;

async fn create_observations(
    conn: &DatabaseConnection,
    now: DateTime<Utc>,
    days: u32,
) -> anyhow::Result<usize> {
    let hours = i64::from(days) * 24;
    let mut written = 0;

    for (_, name, _, _, base) in VENUE.iter() {
        let times: Vec<DateTime<Utc>> = (0..hours).map(|h| now - Duration::hours(h)).collect();
        if times.is_empty() {
            continue;
        }

        for chunk in times.chunks(INSERT_CHUNK) {
            let raw = chunk.iter().map(|t| raw_data::ActiveModel {
                name: Set(name.to_string()),
                record_time: Set(*t),
                visitor: Set(visitors_at(*base, *t)),
            });
            raw_data::Entity::insert_many(raw)
                .on_conflict(
                    OnConflict::columns([raw_data::Column::Name, raw_data::Column::RecordTime])
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(conn)
                .await?;

            let predicted = chunk.iter().map(|t| predict_data::ActiveModel {
                name: Set(name.to_string()),
                record_time: Set(*t),
                visitor: Set(visitors_at(*base, *t) * 11 / 10),
            });
            predict_data::Entity::insert_many(predicted)
                .on_conflict(
                    OnConflict::columns([
                        predict_data::Column::Name,
                        predict_data::Column::RecordTime,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(conn)
                .await?;
        }

        written = times.len();
    }

    Ok(written)
}

/// The last facility is left unsampled so the dashboard shows a "no data" row.
async fn create_queue_samples(
    conn: &DatabaseConnection,
    now: DateTime<Utc>,
) -> anyhow::Result<usize> {
    let mut rows = Vec::new();
    for (id, _, capacity, _, base) in VENUE.iter().take(VENUE.len() - 1) {
        for step in 0..4i64 {
            let at = now - Duration::minutes(15 * step);
            let queue = visitors_at(*base, at) / 4;
            rows.push(time_wait_data::ActiveModel {
                facility_id: Set(*id),
                current_queue: Set(queue),
                wait_time: Set(queue * 5 / (*capacity).max(1)),
                record_time: Set(at),
                ..Default::default()
            });
        }
    }

    let count = rows.len();
    time_wait_data::Entity::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(count)
}
