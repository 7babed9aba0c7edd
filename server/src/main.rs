mod config;
mod graphql;
mod http;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use platform_obs::{ObsConfig, init_tracing};
use products_pipeline::Session;
use tokio::sync::Mutex;
use tracing::info;

use crate::{
    config::AppConfig,
    graphql::GraphqlData,
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "pipeline-dashboard", version, about = "Sales pipeline dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP + GraphQL server.
    Serve(ServeCommand),
    /// Compute the dashboard once and print it as JSON.
    Snapshot(SnapshotCommand),
    /// Print the GraphQL schema snapshot.
    #[command(name = "schema:print")]
    SchemaPrint {
        #[arg(long, value_name = "FILE", help = "Destination file path")]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

impl From<ServeCommand> for ServeConfig {
    fn from(value: ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[derive(Args, Debug)]
struct SnapshotCommand {
    #[arg(long, help = "Number of deals to generate")]
    count: Option<i64>,
    #[arg(long, help = "Seed for the deal generator")]
    seed: Option<u64>,
    #[arg(long = "stalled-days", help = "Stalled threshold in days")]
    stalled_days: Option<u32>,
    #[arg(long, value_name = "FILE", help = "Write JSON here instead of stdout")]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(ObsConfig::from_env())?;
    let cli = Cli::parse();
    let app_config = Arc::new(AppConfig::load()?);
    match cli.command {
        Command::Serve(cmd) => run_server(cmd, app_config).await,
        Command::Snapshot(cmd) => snapshot(cmd, &app_config),
        Command::SchemaPrint { output } => schema_print(output, app_config),
    }
}

fn graphql_data(config: Arc<AppConfig>) -> GraphqlData {
    GraphqlData {
        session: Arc::new(Mutex::new(Session::new(config.initial_seed))),
        config,
    }
}

async fn run_server(cmd: ServeCommand, config: Arc<AppConfig>) -> Result<()> {
    let data = graphql_data(config.clone());
    {
        let session = data.session.lock().await;
        info!(
            session = %session.id(),
            seed = session.seed(),
            anchor = %session.anchor(),
            "dashboard session started"
        );
    }
    let state = AppState {
        schema: graphql::build_schema(data),
        config,
    };
    http::serve(cmd.into(), state).await
}

fn snapshot(cmd: SnapshotCommand, config: &AppConfig) -> Result<()> {
    let mut session = Session::new(cmd.seed.unwrap_or(config.initial_seed));
    let mut params = session.default_params();
    params.deal_count = cmd.count.unwrap_or(config.default_deal_count);
    params.stalled_threshold_days = cmd.stalled_days.unwrap_or(config.default_stalled_days);
    let dashboard = session
        .recompute(&params)
        .context("failed to compute dashboard")?;
    let json = serde_json::to_string_pretty(&dashboard)?;
    match cmd.output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "dashboard snapshot written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn schema_print(path: Option<PathBuf>, config: Arc<AppConfig>) -> Result<()> {
    let sdl = graphql::build_schema(graphql_data(config)).sdl();
    let target = path.unwrap_or_else(|| PathBuf::from("schema.graphql"));
    std::fs::write(&target, sdl)
        .with_context(|| format!("failed to write {}", target.display()))?;
    info!(path = %target.display(), "GraphQL schema written");
    Ok(())
}
