//! MongoDB client factory.
//!
//! A [`Database`] is built once at startup and cloned into whatever needs
//! it. The driver keeps its own connection pool, so clones share sockets.

use std::time::Duration;

use anyhow::Context;
use libris_kernel::settings::DatabaseSettings;
use mongodb::{bson::doc, options::ClientOptions, Client, Collection};

/// Handle to the configured MongoDB database
#[derive(Clone, Debug)]
pub struct Database {
    client: Client,
    inner: mongodb::Database,
}

impl Database {
    /// Parse the connection string and build a pooled client.
    ///
    /// The driver connects lazily; use [`Database::ping`] to verify the
    /// server is reachable.
    pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<Self> {
        let options = client_options(settings).await?;
        let client = Client::with_options(options).with_context(|| "failed to build MongoDB client")?;
        let inner = client.database(&settings.database);

        tracing::info!(
            target: "libris-db",
            database = %settings.database,
            max_pool_size = settings.max_pool_size,
            "MongoDB client ready"
        );

        Ok(Self { client, inner })
    }

    /// Name of the database this handle points at
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Typed handle to a collection in this database
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.inner.collection(name)
    }

    /// Round-trip a `ping` command to the server
    pub async fn ping(&self) -> mongodb::error::Result<()> {
        self.inner.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    /// Close pooled connections. Outstanding handles become unusable.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        tracing::info!(target: "libris-db", "MongoDB client shut down");
    }
}

async fn client_options(settings: &DatabaseSettings) -> anyhow::Result<ClientOptions> {
    let mut options = ClientOptions::parse(&settings.uri)
        .await
        .with_context(|| "failed to parse MongoDB connection string")?;

    if options.app_name.is_none() {
        options.app_name = Some(settings.app_name.clone());
    }
    options.max_pool_size = Some(settings.max_pool_size);
    options.server_selection_timeout = Some(Duration::from_millis(
        settings.server_selection_timeout_ms,
    ));

    Ok(options)
}
