//! Cloud Firestore catalog via the REST API (`documents.list`), following page tokens.

use crate::catalog::{render_number, CatalogDocument, CatalogError, CatalogItem, CatalogStore};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com";
const PAGE_SIZE: &str = "300";

/// Client for one Firestore collection.
pub struct FirestoreStore {
    base_url: String,
    project_id: String,
    collection: String,
    access_token: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    /// Full resource name: projects/{p}/databases/{d}/documents/{collection}/{id}.
    name: String,
    /// Typed values (`{"stringValue": "..."}` etc.), kept untyped so unknown kinds never fail a page.
    #[serde(default)]
    fields: HashMap<String, Value>,
}

/// Display text for a typed value. Zero, `false`, null and composite values are empty; int64
/// travels as a decimal string.
fn value_text(value: &Value) -> String {
    let Some((kind, inner)) = value.as_object().and_then(|o| o.iter().next()) else {
        return String::new();
    };
    match (kind.as_str(), inner) {
        ("stringValue" | "timestampValue" | "referenceValue", Value::String(s)) => s.clone(),
        ("integerValue", Value::String(s)) if s.parse::<i64>() == Ok(0) => String::new(),
        ("integerValue", Value::String(s)) => s.clone(),
        ("integerValue", Value::Number(n)) if n.as_i64() != Some(0) => n.to_string(),
        ("doubleValue", Value::Number(n)) => match n.as_f64() {
            Some(d) if d != 0.0 => render_number(d),
            _ => String::new(),
        },
        ("booleanValue", Value::Bool(true)) => "true".to_string(),
        _ => String::new(),
    }
}

impl FirestoreDocument {
    fn text(&self, key: &str) -> String {
        self.fields.get(key).map(value_text).unwrap_or_default()
    }

    fn into_catalog_document(self) -> CatalogDocument {
        let active = self.fields.get("active").and_then(|v| v.get("booleanValue"))
            == Some(&Value::Bool(true));
        CatalogDocument {
            item: CatalogItem {
                id: self.name.rsplit('/').next().unwrap_or_default().to_string(),
                title: self.text("title"),
                description: self.text("description"),
                image_url: self.text("image"),
                link: self.text("link"),
                price: self.text("price"),
                status: self.text("status"),
                category: self.text("category"),
                keywords: self.text("keyword"),
            },
            active,
        }
    }
}

impl FirestoreStore {
    pub fn new(
        base_url: Option<String>,
        project_id: impl Into<String>,
        collection: impl Into<String>,
        access_token: Option<String>,
    ) -> Self {
        let base_url = base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            base_url,
            project_id: project_id.into(),
            collection: collection.into(),
            access_token,
            client: reqwest::Client::new(),
        }
    }

    fn collection_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents/{}",
            self.base_url, self.project_id, self.collection
        )
    }

    /// GET one page of documents.
    async fn list_page(&self, page_token: Option<&str>) -> Result<ListDocumentsResponse, CatalogError> {
        let mut req = self
            .client
            .get(self.collection_url())
            .query(&[("pageSize", PAGE_SIZE)]);
        if let Some(token) = page_token {
            req = req.query(&[("pageToken", token)]);
        }
        if let Some(ref bearer) = self.access_token {
            req = req.bearer_auth(bearer);
        }
        let res = req.send().await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(CatalogError::Api(format!("{} {}", status, body)));
        }
        let body = res.text().await?;
        serde_json::from_str(&body).map_err(|e| CatalogError::Decode(e.to_string()))
    }
}

#[async_trait]
impl CatalogStore for FirestoreStore {
    fn name(&self) -> &str {
        "firestore"
    }

    async fn fetch_documents(&self) -> Result<Vec<CatalogDocument>, CatalogError> {
        let mut docs = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let page = self.list_page(page_token.as_deref()).await?;
            docs.extend(page.documents.into_iter().map(FirestoreDocument::into_catalog_document));
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }
        Ok(docs)
    }
}
