use async_trait::async_trait;
use axum::Router;
use utoipa::openapi::OpenApi;

/// Context handed to modules while the application boots
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
}

/// Contract every Libris feature module implements
///
/// Dependencies such as repositories are passed to the module when it is
/// constructed, so the lifecycle hooks only receive the shared settings.
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module, also used as its URL segment
    fn name(&self) -> &'static str;

    /// Called once during startup, in registration order
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Router mounted under `/api/{module_name}`
    fn routes(&self) -> Router {
        Router::new()
    }

    /// OpenAPI fragment with paths relative to the module mount point
    fn openapi(&self) -> Option<OpenApi> {
        None
    }

    /// Called after every module has been initialized
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called during shutdown, in reverse registration order
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
