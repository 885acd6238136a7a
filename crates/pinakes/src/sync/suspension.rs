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

//! Suspension cascade.
//!
//! Suspending a provider suspends all of its resources; lifting the
//! suspension lifts it for them as well. The cascade reacts to provider
//! update events whose suspended flag flipped, so it composes with the
//! mirror synchronizer: every cascaded resource update re-fires through
//! the bus and reaches the public copies too.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CatalogueError;
use crate::manager::ResourceManager;
use crate::models::bundle::Payload;
use crate::models::payloads::Provider;
use crate::store::DocumentStore;
use crate::sync::events::{EventAction, RegistryEvent};
use crate::sync::worker::EventHandler;

/// Per-kind subscriber propagating provider suspension to resources.
pub struct SuspensionCascade<P: Payload, S: DocumentStore> {
    resources: Arc<ResourceManager<P, S>>,
}

impl<P: Payload, S: DocumentStore> SuspensionCascade<P, S> {
    /// Creates the cascade for `P`'s resource kind.
    pub fn new(resources: Arc<ResourceManager<P, S>>) -> Self {
        SuspensionCascade { resources }
    }
}

#[async_trait]
impl<P: Payload, S: DocumentStore> EventHandler for SuspensionCascade<P, S> {
    fn name(&self) -> &'static str {
        "suspension-cascade"
    }

    async fn handle(&self, event: RegistryEvent) -> Result<(), CatalogueError> {
        if event.action != EventAction::Updated {
            return Ok(());
        }
        let Some(provider) = event.bundle_of::<Provider>() else {
            return Ok(());
        };
        let Some(previous) = event.previous_of::<Provider>() else {
            return Ok(());
        };
        if previous.suspended == provider.suspended {
            return Ok(());
        }

        let changed = self
            .resources
            .suspend_by_provider(provider.id(), provider.suspended)
            .await?;
        if changed > 0 {
            tracing::info!(
                provider_id = provider.id(),
                suspended = provider.suspended,
                resource_type = P::kind().resource_type(),
                changed,
                "cascaded provider suspension"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Caller, Role};
    use crate::config::CatalogueConfig;
    use crate::manager::ProviderManager;
    use crate::models::bundle::Bundle;
    use crate::models::payloads::Service;
    use crate::store::MemoryStore;
    use crate::sync::bus::EventBus;
    use crate::vocabulary::VocabularyRegistry;

    #[tokio::test]
    async fn test_provider_suspension_reaches_resources() {
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
        let services = Arc::new(ResourceManager::<Service, _>::new(
            store,
            vocabulary,
            Some(providers.clone()),
            bus,
            config,
        ));
        let cascade = SuspensionCascade::new(services.clone());

        let admin = Caller::new("admin@catalogue.org", "Admin", Role::Admin);
        let mut provider = crate::models::payloads::Provider::default();
        provider.id = "prov-1".to_string();
        provider.name = "Example Provider".to_string();
        providers.add(Bundle::new(provider), &admin).await.unwrap();

        let mut service = Service::default();
        service.id = "svc-1".to_string();
        service.name = "Compute".to_string();
        service.resource_organisation = "prov-1".to_string();
        services.add(Bundle::new(service), &admin).await.unwrap();

        let before = providers.get_bundle("prov-1").await.unwrap();
        let suspended = providers.suspend("prov-1", true, &admin).await.unwrap();

        cascade
            .handle(RegistryEvent::new(EventAction::Updated, &suspended, Some(&before)).unwrap())
            .await
            .unwrap();

        let service = services.get("svc-1", Some(&admin)).await.unwrap();
        assert!(service.suspended);

        // unchanged flag means no cascade
        let noop_event =
            RegistryEvent::new(EventAction::Updated, &suspended, Some(&suspended)).unwrap();
        cascade.handle(noop_event).await.unwrap();
    }
}
