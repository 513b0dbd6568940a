use anyhow::Context;
use clap::Parser;
use secrecy::ExposeSecret;
use trivia_api::db::{self, run_migrations};
use trivia_api::server::app::run_server;
use trivia_api::settings::Settings;
use trivia_api::telemetry::init_tracing;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Address to listen on, overrides LISTEN_ADDR
    #[clap(long)]
    listen: Option<String>,
    /// Do not apply pending migrations before serving
    #[clap(long)]
    skip_migrations: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = Settings::load().context("Failed to load settings")?;
    let pool = db::establish_connection(
        settings.database_url.expose_secret(),
        settings.max_connections,
    )
    .await
    .context("Failed to connect to the database")?;

    if !cli.skip_migrations {
        tracing::info!("Running db migrations...");
        run_migrations(&pool).await?;
    }

    let addr = cli.listen.unwrap_or(settings.listen_addr);
    run_server(pool, &addr).await
}
