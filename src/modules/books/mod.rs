pub mod error;
pub mod models;
pub mod routes;
pub mod service;
pub mod store;

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use catalog_kernel::{settings::BookSeed, InitCtx, Module};

use models::{Book, BookId};
use routes::CatalogState;
use service::CatalogService;
use store::{BookStore, InMemoryBookStore};

/// Books module: catalog lookup, availability, and search
pub struct BooksModule {
    store: Arc<dyn BookStore>,
    state: CatalogState,
}

impl BooksModule {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        let state = CatalogState {
            service: CatalogService::new(Arc::clone(&store)),
            policy: Arc::new(routes::catalog_policy()),
        };
        Self { store, state }
    }

    pub fn service(&self) -> &CatalogService {
        &self.state.service
    }

    async fn seed(&self, seed: &[BookSeed]) -> anyhow::Result<()> {
        for entry in seed {
            let id = BookId::parse(&entry.id)
                .with_context(|| format!("invalid seed entry '{}'", entry.id))?;
            self.store
                .insert(Book::new(id, &entry.title, &entry.author, entry.available))
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        self.seed(&ctx.settings.catalog.seed)
            .await
            .context("failed to seed book store")?;
        let books = self.store.len().await?;

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        let (router, _) = routes::router(self.state.clone()).split_for_parts();
        router
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let (_, api) = routes::router(self.state.clone()).split_for_parts();
        match serde_json::to_value(api) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(module = self.name(), error = %e, "failed to render OpenAPI");
                None
            }
        }
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create the books module backed by an in-memory store
pub fn create_module() -> Arc<dyn Module> {
    Arc::new(BooksModule::new(Arc::new(InMemoryBookStore::new())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_kernel::settings::Settings;

    fn seed(id: &str, available: bool) -> BookSeed {
        BookSeed {
            id: id.to_string(),
            title: format!("Title {id}"),
            author: "Anon".to_string(),
            available,
        }
    }

    #[tokio::test]
    async fn init_seeds_store_from_settings() {
        let module = BooksModule::new(Arc::new(InMemoryBookStore::new()));
        let mut settings = Settings::default();
        settings.catalog.seed = vec![seed("B1", false), seed("B2", true)];

        module
            .init(&InitCtx {
                settings: &settings,
            })
            .await
            .unwrap();

        assert!(!module.service().is_available("B1").await.unwrap());
        assert!(module.service().is_available("B2").await.unwrap());
    }

    #[tokio::test]
    async fn init_runs_on_spawned_task() {
        let module = create_module();
        let mut settings = Settings::default();
        settings.catalog.seed = vec![seed("B7", true)];

        let handle = tokio::spawn(async move {
            module
                .init(&InitCtx {
                    settings: &settings,
                })
                .await
        });
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn init_rejects_malformed_seed_id() {
        let module = BooksModule::new(Arc::new(InMemoryBookStore::new()));
        let mut settings = Settings::default();
        settings.catalog.seed = vec![seed("bad id", true)];

        let err = module
            .init(&InitCtx {
                settings: &settings,
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "failed to seed book store");
    }

    #[test]
    fn openapi_fragment_lists_catalog_paths() {
        let spec = create_module().openapi().unwrap();
        let paths = spec["paths"].as_object().unwrap();

        for path in ["/{id}", "/{id}/available", "/{id}/availability", "/search"] {
            assert!(paths.contains_key(path), "missing {path}");
        }
        assert!(paths["/{id}/availability"]["put"].is_object());
        assert!(spec["components"]["schemas"]["Book"].is_object());
    }
}
