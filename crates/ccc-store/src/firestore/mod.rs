//! Firestore REST backend
//!
//! Talks to the documents API directly with `reqwest`:
//!
//! ```text
//! GET  {endpoint}/projects/{project}/databases/{database}/documents/{collection}?key=..&pageToken=..
//! POST {endpoint}/projects/{project}/databases/{database}/documents/{collection}?key=..
//! ```
//!
//! Listing follows `nextPageToken` until the collection is exhausted.
//! Inserting lets the server assign the document id.

pub mod value;

use crate::error::StorageError;
use crate::store::{MarkerId, MarkerStore};
use async_trait::async_trait;
use ccc_core::{Assignee, FirestoreConfig, Marker, StoreConfig};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
pub use value::{fields_from_json, fields_to_json, FieldValue, Fields};

/// Documents requested per page
const PAGE_SIZE: u32 = 300;

/// A Firestore document as sent and received over REST
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Full resource name; empty on create
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Typed fields
    #[serde(default)]
    pub fields: Fields,
}

impl Document {
    /// Last path segment of the resource name
    #[must_use]
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }

    /// Encode a serializable record
    ///
    /// # Errors
    /// [`StorageError::Json`] if `record` does not serialize, or
    /// [`StorageError::MalformedDocument`] if it is not a JSON object.
    pub fn from_record<T: Serialize>(record: &T) -> Result<Self, StorageError> {
        match serde_json::to_value(record)? {
            serde_json::Value::Object(map) => Ok(Self {
                name: String::new(),
                fields: fields_from_json(&map),
            }),
            other => Err(StorageError::MalformedDocument {
                name: String::new(),
                reason: format!("record is not an object: {other}"),
            }),
        }
    }

    /// Decode the fields into a record
    ///
    /// # Errors
    /// [`StorageError::MalformedDocument`] naming this document.
    pub fn to_record<T: DeserializeOwned>(&self) -> Result<T, StorageError> {
        let malformed = |reason: String| StorageError::MalformedDocument {
            name: self.name.clone(),
            reason,
        };
        let map = fields_to_json(&self.fields).map_err(malformed)?;
        serde_json::from_value(serde_json::Value::Object(map)).map_err(|e| malformed(e.to_string()))
    }

    /// Decode an assignee, using the document id when `uid` is absent
    ///
    /// # Errors
    /// As [`Document::to_record`].
    pub fn to_assignee(&self) -> Result<Assignee, StorageError> {
        let mut doc = self.clone();
        if !doc.fields.contains_key("uid") {
            doc.fields
                .insert("uid".into(), FieldValue::StringValue(self.id().to_string()));
        }
        doc.to_record()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Firestore-backed [`MarkerStore`]
#[derive(Debug, Clone)]
pub struct FirestoreStore {
    client: Client,
    documents_url: String,
    api_key: String,
    assignees_collection: String,
    markers_collection: String,
}

impl FirestoreStore {
    /// Create client from store settings
    ///
    /// # Errors
    /// [`StorageError::Misconfigured`] without an API key or project, or
    /// [`StorageError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &StoreConfig) -> Result<Self, StorageError> {
        let FirestoreConfig {
            endpoint,
            project_id,
            database,
            api_key,
        } = &config.firestore;

        let api_key = api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| StorageError::Misconfigured("firestore api key is not set".into()))?;
        if project_id.is_empty() {
            return Err(StorageError::Misconfigured("firestore project id is empty".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            documents_url: format!(
                "{}/projects/{project_id}/databases/{database}/documents",
                endpoint.trim_end_matches('/')
            ),
            api_key: api_key.to_string(),
            assignees_collection: config.assignees_collection.clone(),
            markers_collection: config.markers_collection.clone(),
        })
    }

    /// URL of a collection
    #[must_use]
    pub fn collection_url(&self, collection: &str) -> String {
        format!("{}/{collection}", self.documents_url)
    }

    /// Every document in `collection`, following page tokens
    ///
    /// # Errors
    /// Any [`StorageError`] from the transport or response decoding.
    pub async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, StorageError> {
        let url = self.collection_url(collection);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![
                ("key", self.api_key.clone()),
                ("pageSize", PAGE_SIZE.to_string()),
            ];
            if let Some(token) = page_token.take() {
                query.push(("pageToken", token));
            }

            let response = self.client.get(&url).query(&query).send().await?;
            let page: ListDocumentsResponse = read_json(response).await?;
            tracing::debug!(collection, count = page.documents.len(), "firestore page fetched");
            documents.extend(page.documents);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        Ok(documents)
    }

    /// Create a document with a server-assigned id
    ///
    /// # Errors
    /// Any [`StorageError`] from the transport or response decoding.
    pub async fn create_document(
        &self,
        collection: &str,
        document: &Document,
    ) -> Result<Document, StorageError> {
        let response = self
            .client
            .post(self.collection_url(collection))
            .query(&[("key", self.api_key.as_str())])
            .json(document)
            .send()
            .await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, StorageError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(StorageError::status(status.as_u16(), &body));
    }
    if body.trim().is_empty() {
        return Ok(serde_json::from_str("{}")?);
    }
    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl MarkerStore for FirestoreStore {
    async fn list_assignees(&self) -> Result<Vec<Assignee>, StorageError> {
        self.list_documents(&self.assignees_collection)
            .await?
            .iter()
            .map(Document::to_assignee)
            .collect()
    }

    async fn insert_marker(&self, marker: &Marker) -> Result<MarkerId, StorageError> {
        let created = self
            .create_document(&self.markers_collection, &Document::from_record(marker)?)
            .await?;
        if created.name.is_empty() {
            return Err(StorageError::MalformedDocument {
                name: self.markers_collection.clone(),
                reason: "created document has no name".into(),
            });
        }
        Ok(MarkerId::new(created.id()))
    }

    fn backend(&self) -> &'static str {
        "firestore"
    }
}
