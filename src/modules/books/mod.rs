pub mod handlers;
pub mod models;
pub mod repository;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use libris_kernel::{InitCtx, Module};
use utoipa::openapi::OpenApi;

use repository::SharedBookRepository;

/// The books resource, served under `/api/books`
pub struct BooksModule {
    repository: SharedBookRepository,
}

impl BooksModule {
    pub fn new(repository: SharedBookRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            collection = %ctx.settings.database.collection,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        let (router, _) = handlers::router().split_for_parts();
        router.with_state(Arc::clone(&self.repository))
    }

    fn openapi(&self) -> Option<OpenApi> {
        let (_, api) = handlers::router().split_for_parts();
        Some(api)
    }

    /// An unreachable database is logged, not fatal; requests report it as 500s
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        match self.repository.ping().await {
            Ok(()) => tracing::info!(module = self.name(), "books module started"),
            Err(err) => tracing::warn!(
                module = self.name(),
                error = %err,
                "books module started but storage did not answer ping"
            ),
        }
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create the books module over the given repository
pub fn create_module(repository: SharedBookRepository) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(repository))
}
