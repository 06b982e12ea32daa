//! Course catalog: item model, store trait, and the soft-failing active-catalog reader.
//!
//! Stores return raw documents (item fields plus the `active` flag). The reader keeps
//! only active documents, in store iteration order, and degrades to an empty catalog
//! on any store error.

mod file;
mod firestore;

pub use file::JsonFileStore;
pub use firestore::FirestoreStore;

use crate::config::{CatalogBackend, Config};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// One course offered through the bot. Serialized with the storage field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "image")]
    pub image_url: String,
    pub link: String,
    pub price: String,
    pub status: String,
    pub category: String,
    /// Comma-separated tag list.
    #[serde(rename = "keyword")]
    pub keywords: String,
}

impl CatalogItem {
    /// Raw comma-separated tags (not trimmed).
    pub fn keyword_tags(&self) -> impl Iterator<Item = &str> {
        self.keywords.split(',')
    }
}

/// A stored course record: the item plus its `active` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogDocument {
    pub item: CatalogItem,
    pub active: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("catalog api error: {0}")]
    Api(String),
    #[error("reading catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("decoding catalog: {0}")]
    Decode(String),
    #[error("catalog store not configured: {0}")]
    NotConfigured(String),
}

/// Read-only source of course documents.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Short backend name for logs (e.g. "firestore").
    fn name(&self) -> &str;

    /// All documents in the collection, in store iteration order.
    async fn fetch_documents(&self) -> Result<Vec<CatalogDocument>, CatalogError>;
}

/// Fetch the active courses. Never fails: a store error is logged and yields an empty list,
/// so callers cannot tell an empty catalog from a failed read.
pub async fn fetch_active_catalog(store: &dyn CatalogStore) -> Vec<CatalogItem> {
    match store.fetch_documents().await {
        Ok(docs) => {
            log::debug!("{} catalog: {} document(s) fetched", store.name(), docs.len());
            let items: Vec<CatalogItem> = docs
                .into_iter()
                .filter(|d| d.active)
                .map(|d| d.item)
                .collect();
            log::debug!("{} catalog: {} active course(s)", store.name(), items.len());
            items
        }
        Err(e) => {
            log::error!("error fetching courses from {}: {}", store.name(), e);
            Vec::new()
        }
    }
}

/// Build the configured store. Firestore requires a project id.
pub fn store_from_config(config: &Config) -> Result<Arc<dyn CatalogStore>, CatalogError> {
    let catalog = &config.catalog;
    match catalog.backend {
        CatalogBackend::Firestore => {
            let project_id = catalog.project_id.clone().ok_or_else(|| {
                CatalogError::NotConfigured(
                    "firestore backend needs catalog.projectId or GOOGLE_CLOUD_PROJECT".to_string(),
                )
            })?;
            Ok(Arc::new(FirestoreStore::new(
                catalog.firestore_base.clone(),
                project_id,
                catalog.collection.clone(),
                catalog.access_token.clone(),
            )))
        }
        CatalogBackend::File => {
            let path = catalog
                .path
                .clone()
                .unwrap_or_else(|| PathBuf::from("courses.json"));
            Ok(Arc::new(JsonFileStore::new(path)))
        }
    }
}

/// Render a JSON number the way it reads in a price line (`1500`, not `1500.0`).
pub(crate) fn render_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedStore(Vec<CatalogDocument>);

    #[async_trait]
    impl CatalogStore for FixedStore {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn fetch_documents(&self) -> Result<Vec<CatalogDocument>, CatalogError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl CatalogStore for BrokenStore {
        fn name(&self) -> &str {
            "broken"
        }

        async fn fetch_documents(&self) -> Result<Vec<CatalogDocument>, CatalogError> {
            Err(CatalogError::Api("503 unavailable".to_string()))
        }
    }

    fn doc(id: &str, active: bool) -> CatalogDocument {
        CatalogDocument {
            item: CatalogItem {
                id: id.to_string(),
                title: format!("course {}", id),
                ..Default::default()
            },
            active,
        }
    }

    #[tokio::test]
    async fn keeps_only_active_in_store_order() {
        let store = FixedStore(vec![doc("c", true), doc("a", false), doc("b", true)]);
        let items = fetch_active_catalog(&store).await;
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b"]);
    }

    #[tokio::test]
    async fn store_error_degrades_to_empty() {
        assert!(fetch_active_catalog(&BrokenStore).await.is_empty());
    }

    #[test]
    fn keyword_tags_are_raw_split() {
        let item = CatalogItem {
            keywords: "bread, baking,".to_string(),
            ..Default::default()
        };
        let tags: Vec<&str> = item.keyword_tags().collect();
        assert_eq!(tags, vec!["bread", " baking", ""]);
    }

    #[test]
    fn serializes_with_storage_field_names() {
        let item = CatalogItem {
            id: "x".into(),
            image_url: "https://img".into(),
            keywords: "a,b".into(),
            ..Default::default()
        };
        let v = serde_json::to_value(&item).unwrap();
        assert_eq!(v["image"], "https://img");
        assert_eq!(v["keyword"], "a,b");
        assert!(v.get("image_url").is_none());
    }

    #[test]
    fn firestore_without_project_is_not_configured() {
        let config = Config::default();
        assert!(matches!(
            store_from_config(&config),
            Err(CatalogError::NotConfigured(_))
        ));
    }

    #[test]
    fn file_backend_defaults_path() {
        let mut config = Config::default();
        config.catalog.backend = CatalogBackend::File;
        let store = store_from_config(&config).unwrap();
        assert_eq!(store.name(), "file");
    }

    #[test]
    fn render_number_drops_integral_fraction() {
        assert_eq!(render_number(1500.0), "1500");
        assert_eq!(render_number(99.5), "99.5");
    }
}
