/*
 *  Copyright 2025 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! # Document Store
//!
//! The persistence abstraction the catalogue is built on: indexed JSON
//! documents with id lookup and facet-filtered search. The real deployment
//! target is an external search engine; the trait keeps the catalogue
//! agnostic of it, and [`MemoryStore`] is the in-process implementation
//! used by tests and single-node setups.
//!
//! Reads by id are strongly consistent. Search visibility of a fresh write
//! is only eventual; callers that need read-after-search consistency go
//! through the synchronization layer's visibility wait.
//!
//! ## Key Components
//!
//! - [`DocumentStore`]: the storage trait
//! - [`facet`]: query descriptors ([`FacetFilter`]) and result pages
//!   ([`Paging`])
//! - [`memory`]: the in-memory implementation

pub mod facet;
pub mod memory;

// Re-export commonly used types
pub use facet::{Facet, FacetFilter, FacetValue, FilterValue, Paging, SortOrder};
pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by document store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document with the given id exists
    #[error("{resource_type} document '{id}' was not found")]
    NotFound { resource_type: String, id: String },

    /// A document with the given id already exists
    #[error("{resource_type} document '{id}' already exists")]
    AlreadyExists { resource_type: String, id: String },

    /// The backend failed
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// One stored JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique id within its resource type
    pub id: String,
    /// The resource type (index) the document belongs to
    pub resource_type: String,
    /// The document body
    pub payload: serde_json::Value,
    /// When the document was first stored
    pub created_at: DateTime<Utc>,
    /// When the document was last overwritten
    pub modified_at: DateTime<Utc>,
}

impl Document {
    /// Builds a document from a serializable body.
    pub fn new(
        resource_type: impl Into<String>,
        id: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        let now = Utc::now();
        Document {
            id: id.into(),
            resource_type: resource_type.into(),
            payload,
            created_at: now,
            modified_at: now,
        }
    }
}

/// Search/persist interface over indexed JSON documents.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Fetches a document by id. Read-after-write consistent.
    async fn get(&self, resource_type: &str, id: &str) -> Result<Document, StoreError>;

    /// Whether a document exists. Read-after-write consistent.
    async fn exists(&self, resource_type: &str, id: &str) -> Result<bool, StoreError>;

    /// Stores a new document; fails when the id is taken.
    async fn add(&self, document: Document) -> Result<Document, StoreError>;

    /// Overwrites an existing document; fails when it is absent.
    async fn update(&self, document: Document) -> Result<Document, StoreError>;

    /// Removes a document, returning its final revision.
    async fn delete(&self, resource_type: &str, id: &str) -> Result<Document, StoreError>;

    /// Runs a facet-filtered search. Only eventually consistent with
    /// respect to recent writes.
    async fn search(
        &self,
        resource_type: &str,
        filter: &FacetFilter,
    ) -> Result<Paging<Document>, StoreError>;
}
