use std::sync::Arc;

use justice_auth::{Hs256TokenService, JwtValidator, TokenIssuer};
use justice_infra::{
    CatalogError, DocumentStore, InMemoryDocumentStore, PostgresDocumentStore, StaticBlogCatalog,
};

use crate::app::errors::StartupError;
use crate::config::{AppConfig, ConfigError};

/// Everything a handler needs, built once at startup and injected into the router.
#[derive(Clone)]
pub struct AppServices {
    pub store: Arc<dyn DocumentStore>,
    pub issuer: Arc<dyn TokenIssuer>,
    pub validator: Arc<dyn JwtValidator>,
    pub blogs: Arc<StaticBlogCatalog>,
}

impl AppServices {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        tokens: Arc<Hs256TokenService>,
        blogs: StaticBlogCatalog,
    ) -> Self {
        Self {
            store,
            issuer: tokens.clone(),
            validator: tokens,
            blogs: Arc::new(blogs),
        }
    }

    /// In-memory wiring (dev/test).
    pub fn in_memory(tokens: Arc<Hs256TokenService>, blogs: StaticBlogCatalog) -> Self {
        Self::new(Arc::new(InMemoryDocumentStore::new()), tokens, blogs)
    }
}

pub async fn build_services(config: &AppConfig) -> Result<AppServices, StartupError> {
    let tokens = Arc::new(Hs256TokenService::with_ttl(
        config.jwt_secret.as_bytes(),
        config.token_ttl,
    ));
    let blogs = load_blog_catalog(config)?;

    if !config.use_persistent_stores {
        tracing::info!("USE_PERSISTENT_STORES not set; using in-memory document store");
        return Ok(AppServices::in_memory(tokens, blogs));
    }

    let database_url = config
        .database_url
        .as_deref()
        .ok_or(ConfigError::MissingDatabaseUrl)?;
    let store = PostgresDocumentStore::connect(database_url, config.db_max_connections).await?;
    store.ensure_schema().await?;
    tracing::info!(max_connections = config.db_max_connections, "connected to postgres document store");

    Ok(AppServices::new(Arc::new(store), tokens, blogs))
}

fn load_blog_catalog(config: &AppConfig) -> Result<StaticBlogCatalog, CatalogError> {
    match StaticBlogCatalog::load(&config.blogs_file) {
        Ok(catalog) => Ok(catalog),
        Err(CatalogError::Io { path, source }) if source.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(%path, "blog catalog not found; serving an empty list");
            Ok(StaticBlogCatalog::empty())
        }
        Err(e) => Err(e),
    }
}
