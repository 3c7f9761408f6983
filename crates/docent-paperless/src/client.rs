//! Paperless-ngx API client

use async_trait::async_trait;
use docent_domain::traits::DocumentStore;
use docent_domain::{DocumentContent, DocumentId, DocumentMetadata, StoreError};
use docent_enrich::validate_url_against_base;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Default timeout for document-management requests
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for the Paperless-ngx REST API
pub struct PaperlessClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct Page<T> {
    results: Vec<T>,
    #[serde(default)]
    next: Option<String>,
}

#[derive(Deserialize)]
struct NamedItem {
    id: u64,
    name: String,
}

#[derive(Deserialize)]
struct DocumentDto {
    id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    tags: Vec<u64>,
}

impl PaperlessClient {
    /// Create a client for the API at `base_url` (e.g.
    /// `http://paperless:8000/api`) with the given API token
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, StoreError> {
        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Token {}", self.token))
            .send()
            .await
            .map_err(|e| StoreError::Communication(format!("Request failed: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::InvalidResponse(format!("HTTP 404 for {url}")));
        }
        if !response.status().is_success() {
            return Err(StoreError::Communication(format!(
                "HTTP {} for {url}",
                response.status()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse response: {e}")))
    }

    async fn patch_json(&self, url: &str, body: &Value) -> Result<(), StoreError> {
        let response = self
            .client
            .patch(url)
            .header("Authorization", format!("Token {}", self.token))
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Communication(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(StoreError::Communication(format!(
                "HTTP {} for {url}",
                response.status()
            )));
        }
        Ok(())
    }

    /// Fetch every page of a listing endpoint, validating pagination
    /// links against the configured base URL before following them
    async fn list_all<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Vec<T>, StoreError> {
        let mut items = Vec::new();
        let mut url = self.url(&format!("{path}/?page_size=100"));

        loop {
            let page: Page<T> = self.get_json(&url).await?;
            items.extend(page.results);

            match page.next {
                Some(next) => {
                    let relative = validate_url_against_base(&next, &self.base_url)
                        .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
                    url = format!("{}{}", self.base_url, relative);
                }
                None => break,
            }
        }

        Ok(items)
    }

    async fn list_names(&self, path: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .list_all::<NamedItem>(path)
            .await?
            .into_iter()
            .map(|item| item.name)
            .collect())
    }

    /// Resolve a name to an id on a listing endpoint, creating the entry
    /// if it does not exist
    async fn ensure_named(&self, path: &str, name: &str) -> Result<u64, StoreError> {
        let items = self.list_all::<NamedItem>(path).await?;
        if let Some(item) = items
            .iter()
            .find(|item| item.name.eq_ignore_ascii_case(name))
        {
            return Ok(item.id);
        }

        debug!(path, name, "creating missing taxonomy entry");
        let response = self
            .client
            .post(self.url(&format!("{path}/")))
            .header("Authorization", format!("Token {}", self.token))
            .json(&json!({ "name": name }))
            .send()
            .await
            .map_err(|e| StoreError::Communication(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(StoreError::Communication(format!(
                "HTTP {} creating {path} entry",
                response.status()
            )));
        }

        let created: NamedItem = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse response: {e}")))?;
        Ok(created.id)
    }

    async fn fetch_document_dto(&self, id: DocumentId) -> Result<DocumentDto, StoreError> {
        let url = self.url(&format!("documents/{id}/"));
        match self.get_json::<DocumentDto>(&url).await {
            Err(StoreError::InvalidResponse(msg)) if msg.contains("404") => {
                Err(StoreError::NotFound(id))
            }
            other => other,
        }
    }
}

#[async_trait]
impl DocumentStore for PaperlessClient {
    async fn fetch_document(&self, id: DocumentId) -> Result<DocumentContent, StoreError> {
        let dto = self.fetch_document_dto(id).await?;
        Ok(DocumentContent {
            id: dto.id,
            title: dto.title,
            content: dto.content,
        })
    }

    async fn list_tags(&self) -> Result<Vec<String>, StoreError> {
        self.list_names("tags").await
    }

    async fn list_correspondents(&self) -> Result<Vec<String>, StoreError> {
        self.list_names("correspondents").await
    }

    async fn list_document_types(&self) -> Result<Vec<String>, StoreError> {
        self.list_names("document_types").await
    }

    async fn list_unprocessed(&self, marker_tag: &str) -> Result<Vec<DocumentContent>, StoreError> {
        let tags = self.list_all::<NamedItem>("tags").await?;
        let marker_id = tags
            .iter()
            .find(|tag| tag.name.eq_ignore_ascii_case(marker_tag))
            .map(|tag| tag.id);

        let documents = self.list_all::<DocumentDto>("documents").await?;
        Ok(documents
            .into_iter()
            .filter(|doc| marker_id.map_or(true, |id| !doc.tags.contains(&id)))
            .map(|doc| DocumentContent {
                id: doc.id,
                title: doc.title,
                content: doc.content,
            })
            .collect())
    }

    async fn fetch_thumbnail(&self, id: DocumentId) -> Result<Vec<u8>, StoreError> {
        let url = self.url(&format!("documents/{id}/thumb/"));
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Token {}", self.token))
            .send()
            .await
            .map_err(|e| StoreError::Communication(format!("Request failed: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(id));
        }
        if !response.status().is_success() {
            return Err(StoreError::Communication(format!(
                "HTTP {} for {url}",
                response.status()
            )));
        }

        response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|e| StoreError::Communication(format!("Failed to read thumbnail: {e}")))
    }

    async fn update_metadata(
        &self,
        id: DocumentId,
        metadata: &DocumentMetadata,
    ) -> Result<(), StoreError> {
        let mut patch = Map::new();

        if let Some(title) = &metadata.title {
            patch.insert("title".to_string(), json!(title));
        }
        if let Some(date) = &metadata.document_date {
            patch.insert("created_date".to_string(), json!(date));
        }
        if let Some(correspondent) = &metadata.correspondent {
            let correspondent_id = self.ensure_named("correspondents", correspondent).await?;
            patch.insert("correspondent".to_string(), json!(correspondent_id));
        }
        if let Some(document_type) = &metadata.document_type {
            let type_id = self.ensure_named("document_types", document_type).await?;
            patch.insert("document_type".to_string(), json!(type_id));
        }
        if !metadata.tags.is_empty() {
            let mut tag_ids = Vec::new();
            for tag in &metadata.tags {
                tag_ids.push(self.ensure_named("tags", tag).await?);
            }
            patch.insert("tags".to_string(), json!(tag_ids));
        }

        if patch.is_empty() {
            warn!(document_id = id, "no metadata to persist, skipping update");
            return Ok(());
        }

        self.patch_json(&self.url(&format!("documents/{id}/")), &Value::Object(patch))
            .await
    }

    async fn append_tag(&self, id: DocumentId, tag: &str) -> Result<(), StoreError> {
        let document = self.fetch_document_dto(id).await?;
        let tag_id = self.ensure_named("tags", tag).await?;

        if document.tags.contains(&tag_id) {
            return Ok(());
        }

        let mut tags = document.tags;
        tags.push(tag_id);
        self.patch_json(
            &self.url(&format!("documents/{id}/")),
            &json!({ "tags": tags }),
        )
        .await
    }
}
