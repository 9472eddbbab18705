//! huntboard-demo — seed a store with the demo data set and print a report.
//!
//! ```
//! huntboard-demo --data-dir ./huntboard-data
//! huntboard-demo --data-dir ./huntboard-data --db tracker.sqlite --sign-in
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use huntboard_core::{session::StaticSessions, stats};
use huntboard_store_local::LocalStore;
use huntboard_store_sqlite::SqliteStore;
use huntboard_sync::SyncRouter;

#[derive(Parser)]
#[command(author, version, about = "Huntboard sync-layer demo")]
struct Cli {
  /// Directory for the local (unauthenticated) store.
  #[arg(long, default_value = "huntboard-data")]
  data_dir: PathBuf,

  /// SQLite file for the remote store. In-memory when omitted.
  #[arg(long)]
  db: Option<PathBuf>,

  /// Run signed in, routing everything to the SQLite store.
  #[arg(long)]
  sign_in: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let sessions = if cli.sign_in {
    StaticSessions::signed_in(Uuid::new_v4())
  } else {
    StaticSessions::signed_out()
  };

  let local = LocalStore::open(&cli.data_dir)
    .with_context(|| format!("opening local store at {}", cli.data_dir.display()))?;
  let remote = match &cli.db {
    Some(path) => SqliteStore::open(path, sessions.clone())
      .await
      .with_context(|| format!("opening sqlite store at {}", path.display()))?,
    None => SqliteStore::open_in_memory(sessions.clone()).await?,
  };
  let router = SyncRouter::new(local, remote, sessions);

  tracing::info!(mode = ?router.current_mode().await, "router ready");

  if router.is_first_visit().await? {
    tracing::info!("first visit, seeding demo data");
    router.load_demo_data().await?;
  }

  let applications = router.load_applications().await?;
  let fields = router.load_custom_fields().await?;
  let today = Utc::now().date_naive();

  println!("applications:      {}", stats::total_applications(&applications));
  println!("responses:         {}", stats::total_responses(&applications, &fields));
  println!("response rate:     {}%", stats::response_rate(&applications, &fields));
  println!(
    "avg response time: {} days",
    stats::average_response_time(&applications, &fields)
  );

  println!("\nper month:");
  for bucket in stats::applications_per_month(&applications, &fields, 6, today) {
    println!("  {:<10} {}", bucket.label, bucket.count);
  }

  println!("\nstatus breakdown:");
  for entry in stats::status_breakdown(&applications, &fields) {
    println!("  {:<22} {:>3} ({}%)", entry.label, entry.count, entry.percentage);
  }

  Ok(())
}
