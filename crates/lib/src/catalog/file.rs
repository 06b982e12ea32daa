//! JSON file catalog: an array of course documents on local disk, for development and tests.

use crate::catalog::{render_number, CatalogDocument, CatalogError, CatalogItem, CatalogStore};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Reads `[{ "id", "title", ..., "active": true }, ...]` from a file on every fetch.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogStore for JsonFileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch_documents(&self) -> Result<Vec<CatalogDocument>, CatalogError> {
        let s = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CatalogError::Io {
                path: self.path.clone(),
                source,
            })?;
        parse_documents(&s)
    }
}

/// Parse a JSON array of documents. Documents without an `id` get their array index.
pub(crate) fn parse_documents(s: &str) -> Result<Vec<CatalogDocument>, CatalogError> {
    let values: Vec<Value> =
        serde_json::from_str(s).map_err(|e| CatalogError::Decode(e.to_string()))?;
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let obj = v
                .as_object()
                .ok_or_else(|| CatalogError::Decode(format!("document {} is not an object", i)))?;
            let id = field(obj, "id");
            Ok(CatalogDocument {
                item: CatalogItem {
                    id: if id.is_empty() { i.to_string() } else { id },
                    title: field(obj, "title"),
                    description: field(obj, "description"),
                    image_url: field(obj, "image"),
                    link: field(obj, "link"),
                    price: field(obj, "price"),
                    status: field(obj, "status"),
                    category: field(obj, "category"),
                    keywords: field(obj, "keyword"),
                },
                active: obj.get("active") == Some(&Value::Bool(true)),
            })
        })
        .collect()
}

/// Field as display text: strings as-is, numbers and `true` rendered. Zero, `false`, null and
/// composite values are empty.
fn field(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => String::new(),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(|i| i.to_string())
            .or_else(|| n.as_f64().map(render_number))
            .unwrap_or_default(),
        Some(Value::Bool(true)) => "true".to_string(),
        _ => String::new(),
    }
}
