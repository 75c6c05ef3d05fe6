use anyhow::Context;
use clap::{Parser, Subcommand};
use libris_kernel::settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "libris", version, about = "Books CRUD service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Print the effective settings as JSON
    Config,
    /// Connect to MongoDB and send a ping
    Ping,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load().with_context(|| "failed to load Libris settings")?;

    match cli.command {
        Command::Serve => {
            libris_telemetry::init(&settings.telemetry)?;
            libris_app::run(settings).await
        }
        Command::Config => {
            let rendered = serde_json::to_string_pretty(&settings)
                .with_context(|| "failed to render settings")?;
            println!("{}", rendered);
            Ok(())
        }
        Command::Ping => {
            libris_telemetry::init(&settings.telemetry)?;
            let database = libris_db::Database::connect(&settings.database).await?;
            database
                .ping()
                .await
                .with_context(|| format!("ping to '{}' failed", database.name()))?;
            println!("pong from {}", database.name());
            database.shutdown().await;
            Ok(())
        }
    }
}
