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

//! Provider manager.
//!
//! Providers are resources themselves — they onboard through the same
//! pending/approved/rejected machine — but additionally carry the
//! template-status aggregate over their child resources. This wrapper
//! owns that bookkeeping and forces sane defaults at registration.

use std::sync::Arc;

use crate::auth::Caller;
use crate::config::CatalogueConfig;
use crate::error::CatalogueError;
use crate::manager::resource_manager::ResourceManager;
use crate::models::bundle::Bundle;
use crate::models::logging_info::ActionType;
use crate::models::metadata::Metadata;
use crate::models::payloads::Provider;
use crate::models::status::TemplateStatus;
use crate::store::{DocumentStore, FacetFilter, Paging};
use crate::sync::bus::EventBus;
use crate::sync::events::EventAction;
use crate::vocabulary::VocabularyRegistry;

/// Manager for provider bundles.
pub struct ProviderManager<S: DocumentStore> {
    inner: ResourceManager<Provider, S>,
}

impl<S: DocumentStore> ProviderManager<S> {
    /// Creates the provider manager.
    pub fn new(
        store: Arc<S>,
        vocabulary: Arc<VocabularyRegistry>,
        bus: EventBus,
        config: Arc<CatalogueConfig>,
    ) -> Self {
        ProviderManager {
            inner: ResourceManager::new(store, vocabulary, None, bus, config),
        }
    }

    /// Registers a provider. New providers always start without a
    /// template, whatever the client sent.
    pub async fn add(
        &self,
        mut bundle: Bundle<Provider>,
        caller: &Caller,
    ) -> Result<Bundle<Provider>, CatalogueError> {
        bundle.payload.template_status = TemplateStatus::NoTemplate;
        self.inner.add(bundle, caller).await
    }

    /// Updates a provider's payload. The template status is not
    /// client-controlled; it is carried over from the stored revision.
    pub async fn update(
        &self,
        mut bundle: Bundle<Provider>,
        comment: Option<String>,
        caller: &Caller,
    ) -> Result<Bundle<Provider>, CatalogueError> {
        let existing = self.inner.get_internal(bundle.id()).await?;
        bundle.payload.template_status = existing.payload.template_status;
        self.inner.update(bundle, comment, caller).await
    }

    /// Moderation decision on the provider itself.
    pub async fn verify(
        &self,
        id: &str,
        status_label: &str,
        active: bool,
        caller: &Caller,
    ) -> Result<Bundle<Provider>, CatalogueError> {
        self.inner.verify(id, status_label, active, caller).await
    }

    /// Toggles provider activation.
    pub async fn publish(
        &self,
        id: &str,
        active: bool,
        caller: &Caller,
    ) -> Result<Bundle<Provider>, CatalogueError> {
        self.inner.publish(id, active, caller).await
    }

    /// Records a compliance audit on the provider.
    pub async fn audit(
        &self,
        id: &str,
        comment: Option<String>,
        action: ActionType,
        caller: &Caller,
    ) -> Result<Bundle<Provider>, CatalogueError> {
        self.inner.audit(id, comment, action, caller).await
    }

    /// Suspends or unsuspends the provider. The suspension cascade picks
    /// up the resulting event and propagates to the provider's resources.
    pub async fn suspend(
        &self,
        id: &str,
        suspended: bool,
        caller: &Caller,
    ) -> Result<Bundle<Provider>, CatalogueError> {
        self.inner.suspend(id, suspended, caller).await
    }

    /// Deletes the provider.
    pub async fn delete(
        &self,
        id: &str,
        caller: &Caller,
    ) -> Result<Bundle<Provider>, CatalogueError> {
        self.inner.delete(id, caller).await
    }

    /// Creates a draft provider.
    pub async fn add_draft(
        &self,
        mut bundle: Bundle<Provider>,
        caller: &Caller,
    ) -> Result<Bundle<Provider>, CatalogueError> {
        bundle.payload.template_status = TemplateStatus::NoTemplate;
        self.inner.add_draft(bundle, caller).await
    }

    /// Promotes a draft provider into moderation.
    pub async fn transform_to_non_draft(
        &self,
        id: &str,
        caller: &Caller,
    ) -> Result<Bundle<Provider>, CatalogueError> {
        self.inner.transform_to_non_draft(id, caller).await
    }

    /// Access-checked fetch.
    pub async fn get(
        &self,
        id: &str,
        caller: Option<&Caller>,
    ) -> Result<Bundle<Provider>, CatalogueError> {
        self.inner.get(id, caller).await
    }

    /// Access-checked search.
    pub async fn get_all(
        &self,
        filter: &FacetFilter,
        caller: Option<&Caller>,
    ) -> Result<Paging<Bundle<Provider>>, CatalogueError> {
        self.inner.get_all(filter, caller).await
    }

    /// Unrestricted fetch, for validation and synchronization hooks.
    pub async fn get_bundle(&self, id: &str) -> Result<Bundle<Provider>, CatalogueError> {
        self.inner.get_internal(id).await
    }

    /// Idempotent check-then-set on the template-status aggregate.
    ///
    /// Returns the updated bundle, or `None` when the status already
    /// matched and nothing was written. Concurrent hooks may race here;
    /// the set is monotonic enough that last-write-wins is benign.
    pub async fn update_template_status(
        &self,
        id: &str,
        template: TemplateStatus,
    ) -> Result<Option<Bundle<Provider>>, CatalogueError> {
        let existing = self.inner.get_internal(id).await?;
        if existing.payload.template_status == template {
            return Ok(None);
        }
        tracing::debug!(
            provider_id = id,
            from = %existing.payload.template_status,
            to = %template,
            "updating provider template status"
        );

        let mut updated = existing.clone();
        updated.payload.template_status = template;
        updated.metadata = existing
            .metadata
            .as_ref()
            .map(|metadata| Metadata::update(metadata, &Caller::system()));

        self.inner
            .store
            .update(crate::store::Document::new(
                self.inner.resource_type(),
                updated.id(),
                serde_json::to_value(&updated)?,
            ))
            .await
            .map_err(crate::manager::map_store_error)?;
        self.inner.emit_event(EventAction::Updated, &updated, Some(&existing));
        Ok(Some(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    fn admin() -> Caller {
        Caller::new("admin@catalogue.org", "Admin", Role::Admin)
    }

    fn provider(id: &str) -> Bundle<Provider> {
        let mut payload = Provider::default();
        payload.id = id.to_string();
        payload.name = "Example Provider".to_string();
        payload.template_status = TemplateStatus::Approved; // client lies
        Bundle::new(payload)
    }

    fn manager() -> ProviderManager<crate::store::MemoryStore> {
        ProviderManager::new(
            Arc::new(crate::store::MemoryStore::new()),
            Arc::new(VocabularyRegistry::with_lifecycle_states()),
            EventBus::new(16),
            Arc::new(CatalogueConfig::default()),
        )
    }

    #[tokio::test]
    async fn test_add_forces_no_template_status() {
        let providers = manager();
        let bundle = providers.add(provider("prov-1"), &admin()).await.unwrap();
        assert_eq!(bundle.payload.template_status, TemplateStatus::NoTemplate);
        assert_eq!(bundle.status.as_deref(), Some("pending provider"));
    }

    #[tokio::test]
    async fn test_template_status_check_then_set_is_idempotent() {
        let providers = manager();
        providers.add(provider("prov-1"), &admin()).await.unwrap();

        let first = providers
            .update_template_status("prov-1", TemplateStatus::Pending)
            .await
            .unwrap();
        assert!(first.is_some());

        let second = providers
            .update_template_status("prov-1", TemplateStatus::Pending)
            .await
            .unwrap();
        assert!(second.is_none());

        let stored = providers.get_bundle("prov-1").await.unwrap();
        assert_eq!(stored.payload.template_status, TemplateStatus::Pending);
    }

    #[tokio::test]
    async fn test_update_preserves_template_status() {
        let providers = manager();
        providers.add(provider("prov-1"), &admin()).await.unwrap();
        providers
            .update_template_status("prov-1", TemplateStatus::Approved)
            .await
            .unwrap();

        let mut edited = provider("prov-1");
        edited.payload.template_status = TemplateStatus::NoTemplate; // client lies again
        edited.payload.website = "https://example.org".to_string();
        let bundle = providers.update(edited, None, &admin()).await.unwrap();
        assert_eq!(bundle.payload.template_status, TemplateStatus::Approved);
        assert_eq!(bundle.payload.website, "https://example.org");
    }
}
