use std::path::PathBuf;

use clap::{Parser, Subcommand};
use photoevents::services::events::EventStore;
use photoevents::services::normalize;
use photoevents::services::photos::PhotoStore;
use photoevents::services::reconcile::{PurgeMode, Reconciler};
use photoevents::AppError;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser)]
#[command(name = "photoevents-maintenance", about = "Batch maintenance for the photo store")]
struct Cli {
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(long, env = "UPLOADS_DIR", default_value = "uploads/photos")]
    uploads_dir: PathBuf,

    #[arg(long, env = "UPLOADS_PREFIX", default_value = "/uploads/photos")]
    uploads_prefix: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Remove photo records whose file is gone from the uploads directory
    Reconcile {
        /// Delete one record at a time instead of a single batch delete
        #[arg(long)]
        individual: bool,
        /// Report only, delete nothing
        #[arg(long)]
        dry_run: bool,
    },
    /// Set every event to ACTIVE
    ActivateEvents,
    /// Root cover paths under the uploads prefix and report missing cover files
    FixCovers,
}

async fn run(cli: &Cli, db: &DatabaseConnection) -> Result<(), AppError> {
    match &cli.command {
        Command::Reconcile { individual, dry_run } => {
            let reconciler = Reconciler::new(PhotoStore::new(db.clone()), cli.uploads_dir.clone());
            if *dry_run {
                let report = reconciler.scan().await?;
                println!("Existing files:  {}", report.existing);
                println!("Missing files:   {}", report.missing.len());
                for m in &report.missing {
                    println!("  - {} ({})", m.filename, m.id);
                }
                println!("Without a name:  {}", report.skipped);
                println!("Untracked files: {}", report.untracked.len());
                for name in &report.untracked {
                    println!("  - {}", name);
                }
            } else {
                let mode = if *individual { PurgeMode::Individual } else { PurgeMode::Batch };
                let report = reconciler.reconcile(mode).await?;
                println!(
                    "Existing files: {} | missing: {} | removed: {} | skipped: {}",
                    report.existing, report.missing, report.removed, report.skipped
                );
            }
        }
        Command::ActivateEvents => {
            let modified = normalize::activate_all(&EventStore::new(db.clone())).await?;
            println!("{} events set to ACTIVE", modified);
        }
        Command::FixCovers => {
            let report = normalize::fix_covers(
                &EventStore::new(db.clone()),
                &cli.uploads_prefix,
                &cli.uploads_dir,
            )
            .await?;
            println!("{} cover paths rewritten", report.rewritten);
            for m in &report.missing {
                println!("  missing cover for {}: {}", m.event_id, m.cover_image_url);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let db = Database::connect(cli.database_url.as_str()).await?;

    // The connection is released whether or not the command succeeded.
    let result = run(&cli, &db).await;
    if let Err(e) = db.close().await {
        tracing::warn!("Failed to close database connection: {}", e);
    }
    result?;
    Ok(())
}
