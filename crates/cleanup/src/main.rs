use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gamedex_cleanup::{run_cleanup, PgGameStore};

/// Rewrite list fields stored as strings into JSON arrays.
#[derive(Parser)]
#[command(name = "gamedex-cleanup")]
#[command(about = "Normalize stringified list fields in the games table", long_about = None)]
struct Cli {
    /// Log what would change without writing anything.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gamedex_cleanup=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let pool = gamedex_db::create_pool(&database_url).await?;
    tracing::info!("Database pool created");

    let store = PgGameStore::new(pool.clone());
    let result = run_cleanup(&store, cli.dry_run).await;
    pool.close().await;

    let report = result?;
    if report.failed > 0 {
        anyhow::bail!("{} of {} games could not be updated", report.failed, report.total);
    }
    Ok(())
}
