use anyhow::Context;
use clap::{Parser, Subcommand};

use catalog_kernel::settings::Settings;

/// Library catalog service
#[derive(Debug, Parser)]
#[command(name = "catalog", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print the merged OpenAPI document as JSON
    Openapi,
    /// Print the effective settings as JSON
    Settings,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load catalog settings")?;
    catalog_telemetry::init(&settings.telemetry)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            tracing::info!(env = ?settings.environment, "catalog serve");
            catalog_app::run(settings).await?;
        }
        Command::Openapi => {
            let registry = catalog_app::build_registry(&settings).await?;
            let document =
                catalog_http::router::openapi_document(&settings.server.api_prefix, &registry);
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        Command::Settings => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}
