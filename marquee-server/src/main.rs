//! Marquee catalog server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use marquee_core::database::postgres::PostgresDatabase;
use marquee_core::rate_limit::RateLimiter;
use marquee_server::infra::config::Config;
use marquee_server::infra::middleware::rate_limit::{
    spawn_cleanup_task, MemoryRateLimiter,
};
use marquee_server::{create_app, AppState};

#[derive(Parser, Debug)]
#[command(name = "marquee-server")]
#[command(about = "Movie catalog service with viewing history and rate limiting")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(Args, Debug, Clone)]
struct ServeArgs {
    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Database maintenance
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply schema migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Config first: it pulls in .env before the filter reads RUST_LOG.
    let config = load_config(&cli.serve);
    init_tracing();

    match cli.command {
        Some(Command::Db(DbCommand::Migrate)) => run_db_migrate(&config).await,
        None => run_server(config).await,
    }
}

fn load_config(args: &ServeArgs) -> Config {
    let mut config = Config::from_env();
    if let Some(port) = args.port {
        config.server_port = port;
    }
    if let Some(host) = &args.host {
        config.server_host = host.clone();
    }
    config
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "marquee_server=debug,marquee_core=debug,tower_http=debug"
                        .into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn run_db_migrate(config: &Config) -> anyhow::Result<()> {
    let postgres = connect(config).await?;
    postgres
        .initialize_schema()
        .await
        .context("Database migration failed")?;
    info!("Migrations applied");
    Ok(())
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    let postgres = Arc::new(connect(&config).await?);
    postgres
        .initialize_schema()
        .await
        .context("Failed to apply database migrations")?;

    let rate_limiter: Arc<dyn RateLimiter> =
        Arc::new(MemoryRateLimiter::new(config.rate_limit.window));
    if config.rate_limit.enabled {
        spawn_cleanup_task(rate_limiter.clone());
    }

    let config = Arc::new(config);
    let state = AppState {
        unit_of_work: Arc::new(postgres.unit_of_work()),
        postgres: Some(postgres),
        config: config.clone(),
        rate_limiter,
    };

    let app = create_app(state);

    let bind_addr = format!("{}:{}", config.server_host, config.server_port);
    info!("Marquee catalog server listening on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}

async fn connect(config: &Config) -> anyhow::Result<PostgresDatabase> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set")?;
    let postgres = PostgresDatabase::new(database_url)
        .await
        .context("Failed to connect to PostgreSQL")?;
    Ok(postgres)
}
