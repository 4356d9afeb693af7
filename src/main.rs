use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use us_income_map::config::AppConfig;
use us_income_map::render::{self, DashboardView};
use us_income_map::{data, server};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the interactive dashboard
    Serve {
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Render the dashboard once and write it as a standalone HTML page
    Render {
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// State whose counties are tabulated (defaults to the first alphabetically)
        #[arg(short, long)]
        state: Option<String>,
        #[arg(short, long, value_name = "FILE", default_value = "index.html")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            let app_config = AppConfig::load(config.as_deref())?;
            server::start_server(app_config).await?;
        }
        Commands::Render { config, state, output } => {
            let app_config = AppConfig::load(config.as_deref())?;
            let client = reqwest::Client::new();

            let dataset = data::load_dataset(&client, &app_config.input).await?;
            let view = DashboardView::build(dataset, state.as_deref(), &app_config)?;
            let html = render::render_dashboard(&view)?;

            tokio::fs::write(&output, html)
                .await
                .with_context(|| format!("Failed to write {:?}", output))?;
            info!("Wrote dashboard for {} to {:?}", view.selected, output);
        }
    }

    Ok(())
}
