//! gymfusion - gym tracker backup editor
//!
//! Checks, summarizes and rewrites backup files from the command line.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, TimeZone, Utc};
use clap::{Parser, Subcommand};

use gymfusion::DocumentStore;
use gymfusion::edit::history::{add_workout, day_start_millis, workout_from_template};
use gymfusion::stats::{DashboardStats, recent_workouts, session_overview};

const RECENT_LIMIT: usize = 5;

#[derive(Parser)]
#[command(name = "gymfusion")]
#[command(author, version, about = "Gym tracker backup editor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a backup file
    Check {
        file: PathBuf,
    },

    /// Show dashboard statistics
    Stats {
        file: PathBuf,

        /// Number of recent workouts to show
        #[arg(short, long, default_value_t = RECENT_LIMIT)]
        limit: usize,
    },

    /// List session templates
    Sessions {
        file: PathBuf,
    },

    /// Log a workout from a session template and export the result
    Log {
        file: PathBuf,

        /// Session id to use as template
        #[arg(short, long)]
        session: String,

        /// Workout day (YYYY-MM-DD), today when omitted
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Directory for the exported file
        #[arg(short, long, env = "GYMFUSION_OUT_DIR", default_value = ".")]
        out_dir: PathBuf,
    },

    /// Re-export a backup in the legacy layout
    Export {
        file: PathBuf,

        /// Directory for the exported file
        #[arg(short, long, env = "GYMFUSION_OUT_DIR", default_value = ".")]
        out_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { file } => {
            let store = open(&file).await?;
            let data = store.data().context("no document loaded")?;
            println!(
                "OK: version {} | {} sessions | {} workouts | {} exercises",
                data.version,
                data.sessions.len(),
                data.workout_history.len(),
                data.exercises.len()
            );
        }

        Commands::Stats { file, limit } => {
            let store = open(&file).await?;
            let data = store.data().context("no document loaded")?;
            let stats = DashboardStats::from_backup(data);

            println!("Dashboard");
            println!("{:-<40}", "");
            println!("Workouts:    {}", stats.total_workouts);
            println!("Sessions:    {}", stats.total_sessions);
            println!("Tonnage:     {}", stats.tonnage_label());
            println!("Body weight: {}", stats.body_weight_label());

            println!();
            println!("Recent workouts:");
            println!("{:-<60}", "");
            for w in recent_workouts(data, limit) {
                let date = Utc
                    .timestamp_millis_opt(w.date as i64)
                    .single()
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("{} | {:24} | {} exercises", date, w.title, w.exercise_count);
            }
        }

        Commands::Sessions { file } => {
            let store = open(&file).await?;
            let data = store.data().context("no document loaded")?;

            println!("Sessions:");
            println!("{:-<60}", "");
            for s in session_overview(data, data.sessions.len()) {
                println!("{:16} | {:20} | {:2} machines | {}", s.id, s.name, s.machine_count, s.subtitle);
            }
        }

        Commands::Log { file, session, date, out_dir } => {
            let mut store = open(&file).await?;
            let data = store.data().context("no document loaded")?;
            let Some(template) = data.sessions.get(&session) else {
                bail!("unknown session: {session}");
            };

            let now = Utc::now();
            let day = date.unwrap_or_else(|| now.date_naive());
            let workout = workout_from_template(template, day_start_millis(day), now);
            println!(
                "Logged: {} - {} exercises, {} sets (id: {})",
                template.name,
                workout.exercises.len(),
                workout.exercises.iter().map(|e| e.sets.len()).sum::<usize>(),
                workout.id
            );

            let patch = add_workout(data, workout);
            store.update(patch);
            save(&store, &out_dir)?;
        }

        Commands::Export { file, out_dir } => {
            let store = open(&file).await?;
            save(&store, &out_dir)?;
        }
    }

    Ok(())
}

async fn open(file: &Path) -> Result<DocumentStore> {
    let mut store = DocumentStore::new();
    if !store.import_file(file).await {
        bail!(
            "{}: {}",
            file.display(),
            store.error().unwrap_or("import failed")
        );
    }
    Ok(store)
}

fn save(store: &DocumentStore, out_dir: &Path) -> Result<()> {
    let export = store
        .export()
        .context("failed to serialize backup")?
        .context("no document loaded")?;
    let path = export
        .write_to(out_dir)
        .with_context(|| format!("failed to write into {}", out_dir.display()))?;
    println!("Exported: {}", path.display());
    Ok(())
}
