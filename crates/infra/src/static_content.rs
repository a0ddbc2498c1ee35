//! Bundled, read-only blog posts served without touching the store.

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use justice_core::Document;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read blog catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("blog catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("blog catalog must be a JSON array of objects (entry {0} is not an object)")]
    NotAnObject(usize),
}

/// A static list of blog posts, looked up by `slug`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticBlogCatalog {
    posts: Vec<Document>,
}

impl StaticBlogCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a catalog from a JSON file holding an array of objects.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json_str(&raw)?;
        tracing::info!(path = %path.display(), posts = catalog.posts.len(), "blog catalog loaded");
        Ok(catalog)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let entries: Vec<Value> = serde_json::from_str(raw)?;
        let posts = entries
            .into_iter()
            .enumerate()
            .map(|(idx, entry)| match entry {
                Value::Object(doc) => Ok(doc),
                _ => Err(CatalogError::NotAnObject(idx)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { posts })
    }

    /// All posts in file order.
    pub fn list(&self) -> &[Document] {
        &self.posts
    }

    /// First post whose `slug` equals `slug`.
    pub fn find_by_slug(&self, slug: &str) -> Option<&Document> {
        self.posts
            .iter()
            .find(|p| p.get("slug").and_then(Value::as_str) == Some(slug))
    }
}
