//! Libris application library
//!
//! Hosts the project modules and the entry point shared by the server binary
//! and the CLI.

pub mod modules;

use anyhow::Context;
use libris_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Re-export commonly used types
pub use modules::*;

/// Connect to the database, boot every module and serve until shutdown
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let database = libris_db::Database::connect(&settings.database)
        .await
        .with_context(|| "failed to create database client")?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &database, &settings);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served =
        libris_http::start_server(&registry, &settings, libris_http::shutdown_signal()).await;

    registry.stop_all().await?;
    database.shutdown().await;

    served
}
