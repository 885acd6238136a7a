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

//! In-memory document store.
//!
//! Backs tests and single-node deployments. Lookup by id is immediately
//! consistent; a configurable visibility lag delays when fresh writes
//! become searchable, reproducing the eventually-consistent index of the
//! production search engine so the synchronization layer's visibility wait
//! is exercised for real.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use super::facet::{Facet, FacetFilter, FacetValue, Paging, SortOrder};
use super::{Document, DocumentStore, StoreError};
use async_trait::async_trait;
use chrono::Utc;

struct StoredDocument {
    document: Document,
    searchable_at: Instant,
}

/// In-memory [`DocumentStore`] implementation.
pub struct MemoryStore {
    visibility_lag: Duration,
    documents: RwLock<HashMap<String, BTreeMap<String, StoredDocument>>>,
}

impl MemoryStore {
    /// Creates a store where writes are searchable immediately.
    pub fn new() -> Self {
        Self::with_visibility_lag(Duration::ZERO)
    }

    /// Creates a store whose writes only become searchable after `lag`.
    pub fn with_visibility_lag(lag: Duration) -> Self {
        MemoryStore {
            visibility_lag: lag,
            documents: RwLock::new(HashMap::new()),
        }
    }

    /// Resolves a filterable field on a document. `"id"` addresses the
    /// document id; other fields are looked up at the top level of the
    /// body first and under its nested `payload` second, so both envelope
    /// fields (status, active) and payload fields (catalogue_id,
    /// resource_organisation) are addressable.
    fn field_value(document: &Document, field: &str) -> Option<serde_json::Value> {
        if field == "id" {
            return Some(serde_json::Value::String(document.id.clone()));
        }
        if let Some(value) = document.payload.get(field) {
            return Some(value.clone());
        }
        document
            .payload
            .get("payload")
            .and_then(|payload| payload.get(field))
            .cloned()
    }

    fn scalar_matches(value: &serde_json::Value, candidate: &str) -> bool {
        match value {
            serde_json::Value::String(s) => s == candidate,
            serde_json::Value::Bool(b) => b.to_string() == candidate,
            serde_json::Value::Number(n) => n.to_string() == candidate,
            serde_json::Value::Array(items) => {
                items.iter().any(|item| Self::scalar_matches(item, candidate))
            }
            _ => false,
        }
    }

    fn matches_filters(document: &Document, filter: &FacetFilter) -> bool {
        filter.filters.iter().all(|(field, filter_value)| {
            match Self::field_value(document, field) {
                Some(value) => filter_value
                    .values()
                    .iter()
                    .any(|candidate| Self::scalar_matches(&value, candidate)),
                None => false,
            }
        })
    }

    fn contains_keyword(value: &serde_json::Value, keyword: &str) -> bool {
        match value {
            serde_json::Value::String(s) => s.to_lowercase().contains(keyword),
            serde_json::Value::Array(items) => {
                items.iter().any(|item| Self::contains_keyword(item, keyword))
            }
            serde_json::Value::Object(map) => {
                map.values().any(|item| Self::contains_keyword(item, keyword))
            }
            _ => false,
        }
    }

    fn matches_keyword(document: &Document, filter: &FacetFilter) -> bool {
        match &filter.keyword {
            Some(keyword) => {
                let keyword = keyword.to_lowercase();
                document.id.to_lowercase().contains(&keyword)
                    || Self::contains_keyword(&document.payload, &keyword)
            }
            None => true,
        }
    }

    fn compare_values(a: &serde_json::Value, b: &serde_json::Value) -> std::cmp::Ordering {
        use serde_json::Value;
        match (a, b) {
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Number(a), Value::Number(b)) => a
                .as_f64()
                .partial_cmp(&b.as_f64())
                .unwrap_or(std::cmp::Ordering::Equal),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }

    fn sort_documents(documents: &mut [Document], order_by: &[(String, SortOrder)]) {
        documents.sort_by(|a, b| {
            for (field, order) in order_by {
                let left = Self::field_value(a, field);
                let right = Self::field_value(b, field);
                let ordering = match (left, right) {
                    (Some(left), Some(right)) => Self::compare_values(&left, &right),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                };
                let ordering = match order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                };
                if ordering != std::cmp::Ordering::Equal {
                    return ordering;
                }
            }
            a.id.cmp(&b.id)
        });
    }

    fn aggregate_facets(documents: &[Document], browse_by: &[String]) -> Vec<Facet> {
        browse_by
            .iter()
            .map(|field| {
                let mut counts: BTreeMap<String, usize> = BTreeMap::new();
                for document in documents {
                    if let Some(value) = Self::field_value(document, field) {
                        match value {
                            serde_json::Value::String(s) => *counts.entry(s).or_default() += 1,
                            serde_json::Value::Bool(b) => {
                                *counts.entry(b.to_string()).or_default() += 1
                            }
                            serde_json::Value::Array(items) => {
                                for item in items {
                                    if let serde_json::Value::String(s) = item {
                                        *counts.entry(s).or_default() += 1;
                                    }
                                }
                            }
                            _ => {}
                        }
                    }
                }
                let mut values: Vec<FacetValue> = counts
                    .into_iter()
                    .map(|(value, count)| FacetValue { value, count })
                    .collect();
                values.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
                Facet {
                    field: field.clone(),
                    label: field.clone(),
                    values,
                }
            })
            .collect()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, resource_type: &str, id: &str) -> Result<Document, StoreError> {
        self.documents
            .read()
            .get(resource_type)
            .and_then(|documents| documents.get(id))
            .map(|stored| stored.document.clone())
            .ok_or_else(|| StoreError::NotFound {
                resource_type: resource_type.to_string(),
                id: id.to_string(),
            })
    }

    async fn exists(&self, resource_type: &str, id: &str) -> Result<bool, StoreError> {
        Ok(self
            .documents
            .read()
            .get(resource_type)
            .is_some_and(|documents| documents.contains_key(id)))
    }

    async fn add(&self, document: Document) -> Result<Document, StoreError> {
        let mut documents = self.documents.write();
        let by_id = documents.entry(document.resource_type.clone()).or_default();
        if by_id.contains_key(&document.id) {
            return Err(StoreError::AlreadyExists {
                resource_type: document.resource_type,
                id: document.id,
            });
        }
        by_id.insert(
            document.id.clone(),
            StoredDocument {
                document: document.clone(),
                searchable_at: Instant::now() + self.visibility_lag,
            },
        );
        Ok(document)
    }

    async fn update(&self, mut document: Document) -> Result<Document, StoreError> {
        let mut documents = self.documents.write();
        let by_id = documents.entry(document.resource_type.clone()).or_default();
        let Some(existing) = by_id.get(&document.id) else {
            return Err(StoreError::NotFound {
                resource_type: document.resource_type,
                id: document.id,
            });
        };
        // overwrites of an already-searchable document stay searchable;
        // only brand-new ids lag
        let searchable_at = existing.searchable_at;
        document.created_at = existing.document.created_at;
        document.modified_at = Utc::now();
        by_id.insert(
            document.id.clone(),
            StoredDocument {
                document: document.clone(),
                searchable_at,
            },
        );
        Ok(document)
    }

    async fn delete(&self, resource_type: &str, id: &str) -> Result<Document, StoreError> {
        self.documents
            .write()
            .get_mut(resource_type)
            .and_then(|documents| documents.remove(id))
            .map(|stored| stored.document)
            .ok_or_else(|| StoreError::NotFound {
                resource_type: resource_type.to_string(),
                id: id.to_string(),
            })
    }

    async fn search(
        &self,
        resource_type: &str,
        filter: &FacetFilter,
    ) -> Result<Paging<Document>, StoreError> {
        let now = Instant::now();
        let mut matches: Vec<Document> = {
            let documents = self.documents.read();
            let Some(by_id) = documents.get(resource_type) else {
                return Ok(Paging::empty());
            };
            by_id
                .values()
                .filter(|stored| stored.searchable_at <= now)
                .map(|stored| &stored.document)
                .filter(|document| Self::matches_filters(document, filter))
                .filter(|document| Self::matches_keyword(document, filter))
                .cloned()
                .collect()
        };

        let facets = Self::aggregate_facets(&matches, &filter.browse_by);
        Self::sort_documents(&mut matches, &filter.order_by);

        let total = matches.len();
        let from = filter.from.min(total);
        let to = (from + filter.effective_quantity()).min(total);
        let results = matches[from..to].to_vec();

        Ok(Paging {
            total,
            from,
            to,
            results,
            facets,
        })
    }
}
