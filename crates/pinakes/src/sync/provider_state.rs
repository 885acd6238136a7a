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

//! Provider template-status synchronizer.
//!
//! When a resource is registered (or edited) for a provider that has no
//! template yet — or whose template was rejected — the provider must go
//! back through moderation: the resource is forced to `pending` through
//! the regular verify path, which in turn flips the provider's template
//! status to `pending template`.
//!
//! The check-then-set is idempotent; rerunning it when the template is
//! already pending or approved is a no-op. Failures are logged by the
//! worker and never affect the triggering operation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::Caller;
use crate::error::CatalogueError;
use crate::manager::{ProviderManager, ResourceManager};
use crate::models::bundle::Payload;
use crate::models::status::ResourceStatus;
use crate::store::DocumentStore;
use crate::sync::events::{EventAction, RegistryEvent};
use crate::sync::worker::EventHandler;

/// Per-kind subscriber keeping provider template statuses in step with
/// resource submissions.
pub struct ProviderStateSync<P: Payload, S: DocumentStore> {
    resources: Arc<ResourceManager<P, S>>,
    providers: Arc<ProviderManager<S>>,
    catalogue_id: String,
}

impl<P: Payload, S: DocumentStore> ProviderStateSync<P, S> {
    /// Creates the synchronizer for `P`'s resource kind.
    pub fn new(
        resources: Arc<ResourceManager<P, S>>,
        providers: Arc<ProviderManager<S>>,
        catalogue_id: impl Into<String>,
    ) -> Self {
        ProviderStateSync {
            resources,
            providers,
            catalogue_id: catalogue_id.into(),
        }
    }
}

#[async_trait]
impl<P: Payload, S: DocumentStore> EventHandler for ProviderStateSync<P, S> {
    fn name(&self) -> &'static str {
        "provider-state-sync"
    }

    async fn handle(&self, event: RegistryEvent) -> Result<(), CatalogueError> {
        if !matches!(event.action, EventAction::Registered | EventAction::Updated) {
            return Ok(());
        }
        let Some(bundle) = event.bundle_of::<P>() else {
            return Ok(());
        };
        // resources of foreign catalogues are mirrored here but moderated
        // at their home catalogue
        if bundle.payload.catalogue_id() != self.catalogue_id {
            return Ok(());
        }
        let Some(provider_id) = bundle.payload.provider_id() else {
            return Ok(());
        };

        let provider = self.providers.get_bundle(provider_id).await?;
        if !provider.payload.template_status.needs_review_on_new_resource() {
            return Ok(());
        }

        tracing::debug!(
            provider_id,
            from = %provider.payload.template_status,
            to = "pending template",
            resource_id = bundle.id(),
            "first resource submitted; forcing template review"
        );
        self.resources
            .verify(
                bundle.id(),
                &ResourceStatus::Pending.label(P::kind()),
                false,
                &Caller::system(),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::config::CatalogueConfig;
    use crate::models::bundle::Bundle;
    use crate::models::payloads::{Provider, Service};
    use crate::models::status::TemplateStatus;
    use crate::store::MemoryStore;
    use crate::sync::bus::EventBus;
    use crate::vocabulary::VocabularyRegistry;

    struct Fixture {
        services: Arc<ResourceManager<Service, MemoryStore>>,
        providers: Arc<ProviderManager<MemoryStore>>,
        sync: ProviderStateSync<Service, MemoryStore>,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let vocabulary = Arc::new(VocabularyRegistry::with_lifecycle_states());
        let config = Arc::new(CatalogueConfig::default());
        let bus = EventBus::new(64);
        let providers = Arc::new(ProviderManager::new(
            store.clone(),
            vocabulary.clone(),
            bus.clone(),
            config.clone(),
        ));
        let services = Arc::new(ResourceManager::new(
            store,
            vocabulary,
            Some(providers.clone()),
            bus,
            config.clone(),
        ));
        let sync = ProviderStateSync::new(
            services.clone(),
            providers.clone(),
            config.catalogue_id.clone(),
        );

        let admin = Caller::new("admin@catalogue.org", "Admin", Role::Admin);
        let mut provider = Provider::default();
        provider.id = "prov-1".to_string();
        provider.name = "Example Provider".to_string();
        providers.add(Bundle::new(provider), &admin).await.unwrap();

        Fixture {
            services,
            providers,
            sync,
        }
    }

    fn registered_event(bundle: &Bundle<Service>) -> RegistryEvent {
        RegistryEvent::new(EventAction::Registered, bundle, None).unwrap()
    }

    #[tokio::test]
    async fn test_first_resource_forces_pending_template() {
        let fx = fixture().await;
        let caller = Caller::new("jane@provider.org", "Jane Doe", Role::Provider);
        let mut service = Service::default();
        service.id = "svc-1".to_string();
        service.name = "Compute".to_string();
        service.resource_organisation = "prov-1".to_string();
        let bundle = fx.services.add(Bundle::new(service), &caller).await.unwrap();

        fx.sync.handle(registered_event(&bundle)).await.unwrap();

        let provider = fx.providers.get_bundle("prov-1").await.unwrap();
        assert_eq!(provider.payload.template_status, TemplateStatus::Pending);
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent() {
        let fx = fixture().await;
        let caller = Caller::new("jane@provider.org", "Jane Doe", Role::Provider);
        let mut service = Service::default();
        service.id = "svc-1".to_string();
        service.name = "Compute".to_string();
        service.resource_organisation = "prov-1".to_string();
        let bundle = fx.services.add(Bundle::new(service), &caller).await.unwrap();

        fx.sync.handle(registered_event(&bundle)).await.unwrap();
        fx.sync.handle(registered_event(&bundle)).await.unwrap();

        let provider = fx.providers.get_bundle("prov-1").await.unwrap();
        // still pending, and the template was not bounced through any
        // other state by the second run
        assert_eq!(provider.payload.template_status, TemplateStatus::Pending);
    }

    #[tokio::test]
    async fn test_approved_template_left_alone() {
        let fx = fixture().await;
        fx.providers
            .update_template_status("prov-1", TemplateStatus::Approved)
            .await
            .unwrap();

        let caller = Caller::new("jane@provider.org", "Jane Doe", Role::Provider);
        let mut service = Service::default();
        service.id = "svc-2".to_string();
        service.name = "Storage".to_string();
        service.resource_organisation = "prov-1".to_string();
        let bundle = fx.services.add(Bundle::new(service), &caller).await.unwrap();

        fx.sync.handle(registered_event(&bundle)).await.unwrap();

        let provider = fx.providers.get_bundle("prov-1").await.unwrap();
        assert_eq!(provider.payload.template_status, TemplateStatus::Approved);
    }

    #[tokio::test]
    async fn test_foreign_catalogue_ignored() {
        let fx = fixture().await;
        let mut service = Service::default();
        service.id = "svc-x".to_string();
        service.catalogue_id = "other-catalogue".to_string();
        service.resource_organisation = "prov-1".to_string();
        let bundle = Bundle::new(service);

        fx.sync.handle(registered_event(&bundle)).await.unwrap();

        let provider = fx.providers.get_bundle("prov-1").await.unwrap();
        assert_eq!(provider.payload.template_status, TemplateStatus::NoTemplate);
    }
}
