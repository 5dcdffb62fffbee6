//! Application assembly shared by the server binary and the CLI.

use anyhow::Context;
use catalog_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules;

/// Registry with every service module registered and initialized.
pub async fn build_registry(settings: &Settings) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);

    let ctx = InitCtx { settings };
    registry
        .init_modules(&ctx)
        .await
        .context("module initialization failed")?;

    Ok(registry)
}

/// Initialize and start all modules, serve HTTP until shutdown, then stop modules.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = build_registry(&settings).await?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry
        .start_modules(&ctx)
        .await
        .context("module start failed")?;

    let served = catalog_http::start_server(&registry, &settings).await;

    registry
        .stop_modules()
        .await
        .context("module shutdown failed")?;

    served
}
