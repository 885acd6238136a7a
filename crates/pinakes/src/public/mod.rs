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

//! # Public Mirror
//!
//! The read-optimized, access-stripped copy of approved content. Public
//! copies live in their own resource type, keyed by the composite
//! `{catalogue_id}.{resource_id}` id, carry `metadata.published = true`,
//! and have access-controlled payload fields removed.
//!
//! The mirror manager is the only writer of public copies; everything
//! else reaches them read-only. It is driven exclusively by the
//! synchronization workers — never inline from a request.

use std::sync::Arc;

use crate::config::CatalogueConfig;
use crate::error::CatalogueError;
use crate::manager::map_store_error;
use crate::models::bundle::{Bundle, Payload};
use crate::notify::NotificationSink;
use crate::store::{Document, DocumentStore, FacetFilter, Paging};

/// Maintains the public copies of one resource kind.
pub struct PublicMirrorManager<P: Payload, S: DocumentStore> {
    store: Arc<S>,
    sink: Arc<dyn NotificationSink>,
    _config: Arc<CatalogueConfig>,
    _payload: std::marker::PhantomData<fn() -> P>,
}

impl<P: Payload, S: DocumentStore> PublicMirrorManager<P, S> {
    /// Creates a mirror manager for `P`'s resource kind.
    pub fn new(store: Arc<S>, sink: Arc<dyn NotificationSink>, config: Arc<CatalogueConfig>) -> Self {
        PublicMirrorManager {
            store,
            sink,
            _config: config,
            _payload: std::marker::PhantomData,
        }
    }

    /// The document-store resource type holding the public copies.
    pub fn resource_type(&self) -> String {
        P::kind().public_resource_type()
    }

    /// Fetches a public copy by its composite id.
    pub async fn get(&self, public_id: &str) -> Result<Bundle<P>, CatalogueError> {
        let document = self
            .store
            .get(&self.resource_type(), public_id)
            .await
            .map_err(map_store_error)?;
        Ok(serde_json::from_value(document.payload)?)
    }

    /// Fetches a public copy by its origin coordinates.
    pub async fn get_by_origin(
        &self,
        catalogue_id: &str,
        id: &str,
    ) -> Result<Bundle<P>, CatalogueError> {
        self.get(&format!("{}.{}", catalogue_id, id)).await
    }

    /// Whether a public copy exists.
    pub async fn exists(&self, public_id: &str) -> Result<bool, CatalogueError> {
        self.store
            .exists(&self.resource_type(), public_id)
            .await
            .map_err(map_store_error)
    }

    /// Searches the public copies. Every result carries
    /// `metadata.published == true` by construction.
    pub async fn get_all(&self, filter: &FacetFilter) -> Result<Paging<Bundle<P>>, CatalogueError> {
        let page = self
            .store
            .search(&self.resource_type(), filter)
            .await
            .map_err(map_store_error)?;
        Ok(page.filter_map_results(|document| serde_json::from_value(document.payload).ok()))
    }

    /// Creates the public copy of an approved bundle. Idempotent: when a
    /// copy already exists (e.g. two hooks racing on the same approval),
    /// the existing copy wins and no error is raised.
    pub async fn publish_copy(
        &self,
        original: &Bundle<P>,
    ) -> Result<Bundle<P>, CatalogueError> {
        let copy = self.public_copy_of(original)?;
        let document = Document::new(
            self.resource_type(),
            copy.id(),
            serde_json::to_value(&copy)?,
        );
        match self.store.add(document).await {
            Ok(_) => {
                tracing::info!(
                    resource_type = %self.resource_type(),
                    origin_id = original.id(),
                    public_id = copy.id(),
                    "published public copy"
                );
                self.notify("create", &copy).await;
                Ok(copy)
            }
            Err(crate::store::StoreError::AlreadyExists { .. }) => {
                tracing::debug!(
                    resource_type = %self.resource_type(),
                    public_id = copy.id(),
                    "public copy already exists; keeping it"
                );
                self.get(&self.public_id_of(original)).await
            }
            Err(other) => Err(map_store_error(other)),
        }
    }

    /// Overwrites the public copy with the latest revision of the
    /// original. A missing copy (not yet published) is a silent no-op,
    /// not an error.
    pub async fn update_copy(
        &self,
        original: &Bundle<P>,
    ) -> Result<Option<Bundle<P>>, CatalogueError> {
        let public_id = self.public_id_of(original);
        if !self.exists(&public_id).await? {
            tracing::debug!(
                resource_type = %self.resource_type(),
                %public_id,
                "no public copy to update"
            );
            return Ok(None);
        }

        let copy = self.public_copy_of(original)?;
        let document = Document::new(
            self.resource_type(),
            copy.id(),
            serde_json::to_value(&copy)?,
        );
        match self.store.update(document).await {
            Ok(_) => {
                tracing::info!(
                    resource_type = %self.resource_type(),
                    public_id = copy.id(),
                    "updated public copy"
                );
                self.notify("update", &copy).await;
                Ok(Some(copy))
            }
            // deleted between the existence check and the write; treat as
            // the not-yet-published case
            Err(crate::store::StoreError::NotFound { .. }) => Ok(None),
            Err(other) => Err(map_store_error(other)),
        }
    }

    /// Removes the public copy. Idempotent: removing a copy that never
    /// existed is not an error. Returns whether a copy was removed.
    pub async fn delete_copy(&self, original: &Bundle<P>) -> Result<bool, CatalogueError> {
        let public_id = self.public_id_of(original);
        match self.store.delete(&self.resource_type(), &public_id).await {
            Ok(document) => {
                tracing::info!(
                    resource_type = %self.resource_type(),
                    %public_id,
                    "deleted public copy"
                );
                if let Ok(copy) = serde_json::from_value::<Bundle<P>>(document.payload) {
                    self.notify("delete", &copy).await;
                }
                Ok(true)
            }
            Err(crate::store::StoreError::NotFound { .. }) => Ok(false),
            Err(other) => Err(map_store_error(other)),
        }
    }

    /// The composite public id of an original bundle.
    pub fn public_id_of(&self, original: &Bundle<P>) -> String {
        original.public_id()
    }

    /// Derives the access-stripped public copy from an original.
    fn public_copy_of(&self, original: &Bundle<P>) -> Result<Bundle<P>, CatalogueError> {
        let mut copy = original.clone();
        let public_id = self.public_id_of(original);
        copy.payload.strip_sensitive();
        copy.payload.set_id(public_id);
        if let Some(metadata) = copy.metadata.as_mut() {
            metadata.published = true;
        } else {
            return Err(CatalogueError::Internal(
                "cannot publish a bundle without metadata".to_string(),
            ));
        }
        Ok(copy)
    }

    /// Fire-and-forget topic publication. Sink failures are logged, never
    /// surfaced.
    async fn notify(&self, suffix: &str, copy: &Bundle<P>) {
        let topic = format!("{}.{}", P::kind().resource_type(), suffix);
        match serde_json::to_value(copy) {
            Ok(payload) => {
                if let Err(error) = self.sink.publish(&topic, &payload).await {
                    tracing::error!(%topic, error = %error, "topic notification failed");
                }
            }
            Err(error) => {
                tracing::error!(%topic, error = %error, "failed to serialize topic payload");
            }
        }
    }
}
