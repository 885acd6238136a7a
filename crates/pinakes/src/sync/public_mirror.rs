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

//! Public mirror synchronizer.
//!
//! Keeps the public copy of each entity in step with the private
//! original:
//!
//! - first approval (approved + active) creates the copy, after waiting
//!   for the private write to become searchable so the existence check
//!   cannot race the index
//! - later updates, verifications, and audits overwrite an existing copy;
//!   a copy that was never created is a silent no-op
//! - deletion of the original removes the copy, idempotently
//!
//! One generic synchronizer serves every kind; instances differ only in
//! their type parameter. The HTTP request that triggered an event has
//! long returned by the time this runs.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::CatalogueConfig;
use crate::error::CatalogueError;
use crate::models::bundle::Payload;
use crate::public::PublicMirrorManager;
use crate::store::DocumentStore;
use crate::sync::events::{EventAction, RegistryEvent};
use crate::sync::visibility::await_searchable;
use crate::sync::worker::EventHandler;

/// Per-kind subscriber maintaining the public mirror.
pub struct PublicMirrorSync<P: Payload, S: DocumentStore> {
    mirror: Arc<PublicMirrorManager<P, S>>,
    store: Arc<S>,
    config: Arc<CatalogueConfig>,
}

impl<P: Payload, S: DocumentStore> PublicMirrorSync<P, S> {
    /// Creates the synchronizer for `P`'s resource kind.
    pub fn new(
        mirror: Arc<PublicMirrorManager<P, S>>,
        store: Arc<S>,
        config: Arc<CatalogueConfig>,
    ) -> Self {
        PublicMirrorSync {
            mirror,
            store,
            config,
        }
    }
}

#[async_trait]
impl<P: Payload, S: DocumentStore> EventHandler for PublicMirrorSync<P, S> {
    fn name(&self) -> &'static str {
        "public-mirror-sync"
    }

    async fn handle(&self, event: RegistryEvent) -> Result<(), CatalogueError> {
        let Some(bundle) = event.bundle_of::<P>() else {
            return Ok(());
        };

        match event.action {
            EventAction::Deleted => {
                self.mirror.delete_copy(&bundle).await?;
            }
            EventAction::Registered | EventAction::Verified => {
                let public_id = self.mirror.public_id_of(&bundle);
                if self.mirror.exists(&public_id).await? {
                    // already published; reflect the decision on the copy
                    self.mirror.update_copy(&bundle).await?;
                } else if bundle.is_publicly_visible() {
                    // wait out index propagation before the create, so a
                    // racing duplicate check sees the committed original
                    await_searchable(
                        &*self.store,
                        P::kind().resource_type(),
                        bundle.id(),
                        &self.config.sync,
                    )
                    .await;
                    if !self.mirror.exists(&public_id).await? {
                        self.mirror.publish_copy(&bundle).await?;
                    }
                }
            }
            EventAction::Updated | EventAction::Audited => {
                self.mirror.update_copy(&bundle).await?;
            }
        }
        Ok(())
    }
}
