use anyhow::Context;
use libris_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Libris settings")?;
    libris_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        database = %settings.database.database,
        "libris-app bootstrap starting"
    );

    libris_app::run(settings).await?;

    tracing::info!("libris-app shut down");
    Ok(())
}
