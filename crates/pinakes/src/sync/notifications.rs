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

//! Registration notification hook.
//!
//! Sends role-appropriate mails when a provider is submitted or decided
//! on, and when a moderation decision lands on one of a provider's
//! resources. Mail is fire-and-forget: delivery failures are logged by
//! the worker and never surface to the triggering operation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CatalogueError;
use crate::mail::MailService;
use crate::manager::ProviderManager;
use crate::models::bundle::Payload;
use crate::models::payloads::Provider;
use crate::models::status::ResourceKind;
use crate::store::DocumentStore;
use crate::sync::events::{EventAction, RegistryEvent};
use crate::sync::worker::EventHandler;

/// Subscriber translating lifecycle events into registration mails.
pub struct NotificationSync<S: DocumentStore> {
    mail: Arc<dyn MailService>,
    providers: Arc<ProviderManager<S>>,
    catalogue_id: String,
}

impl<S: DocumentStore> NotificationSync<S> {
    /// Creates the notification hook.
    pub fn new(
        mail: Arc<dyn MailService>,
        providers: Arc<ProviderManager<S>>,
        catalogue_id: impl Into<String>,
    ) -> Self {
        NotificationSync {
            mail,
            providers,
            catalogue_id: catalogue_id.into(),
        }
    }
}

#[async_trait]
impl<S: DocumentStore> EventHandler for NotificationSync<S> {
    fn name(&self) -> &'static str {
        "notification-sync"
    }

    async fn handle(&self, event: RegistryEvent) -> Result<(), CatalogueError> {
        match (event.kind, event.action) {
            // provider onboarding and decisions mail the provider admins
            (ResourceKind::Provider, EventAction::Registered | EventAction::Verified) => {
                let Some(provider) = event.bundle_of::<Provider>() else {
                    return Ok(());
                };
                // mirrored copies of foreign providers get no mails here
                if provider.is_published()
                    || provider.payload.catalogue_id() != self.catalogue_id
                {
                    return Ok(());
                }
                self.mail
                    .send_provider_mails(&provider, "provider manager")
                    .await?;
            }
            // a decision on a resource notifies the owning provider
            (kind, EventAction::Verified) if kind != ResourceKind::Provider => {
                let Some(provider_id) = event
                    .bundle
                    .get("payload")
                    .and_then(|payload| {
                        payload
                            .get("resource_organisation")
                            .or_else(|| payload.get("provider_id"))
                    })
                    .and_then(|value| value.as_str())
                else {
                    return Ok(());
                };
                let provider = self.providers.get_bundle(provider_id).await?;
                let origin = format!("{} manager", kind.resource_type());
                self.mail.send_provider_mails(&provider, &origin).await?;
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Caller, Role};
    use crate::config::CatalogueConfig;
    use crate::models::bundle::Bundle;
    use crate::models::payloads::Service;
    use crate::store::MemoryStore;
    use crate::sync::bus::EventBus;
    use crate::vocabulary::VocabularyRegistry;
    use parking_lot::Mutex;

    struct RecordingMail {
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl MailService for RecordingMail {
        async fn send_provider_mails(
            &self,
            provider: &Bundle<Provider>,
            origin: &str,
        ) -> Result<(), CatalogueError> {
            self.sent
                .lock()
                .push((provider.id().to_string(), origin.to_string()));
            Ok(())
        }
    }

    async fn fixture() -> (
        Arc<RecordingMail>,
        Arc<ProviderManager<MemoryStore>>,
        NotificationSync<MemoryStore>,
    ) {
        let store = Arc::new(MemoryStore::new());
        let vocabulary = Arc::new(VocabularyRegistry::with_lifecycle_states());
        let config = Arc::new(CatalogueConfig::default());
        let bus = EventBus::new(64);
        let providers = Arc::new(ProviderManager::new(
            store,
            vocabulary,
            bus,
            config.clone(),
        ));
        let mail = Arc::new(RecordingMail {
            sent: Mutex::new(Vec::new()),
        });
        let sync = NotificationSync::new(
            mail.clone(),
            providers.clone(),
            config.catalogue_id.clone(),
        );
        (mail, providers, sync)
    }

    #[tokio::test]
    async fn test_provider_registration_sends_mail() {
        let (mail, providers, sync) = fixture().await;
        let admin = Caller::new("admin@catalogue.org", "Admin", Role::Admin);
        let mut provider = Provider::default();
        provider.id = "prov-1".to_string();
        provider.name = "Example Provider".to_string();
        let bundle = providers.add(Bundle::new(provider), &admin).await.unwrap();

        sync.handle(RegistryEvent::new(EventAction::Registered, &bundle, None).unwrap())
            .await
            .unwrap();

        let sent = mail.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], ("prov-1".to_string(), "provider manager".to_string()));
    }

    #[tokio::test]
    async fn test_resource_decision_mails_owning_provider() {
        let (mail, providers, sync) = fixture().await;
        let admin = Caller::new("admin@catalogue.org", "Admin", Role::Admin);
        let mut provider = Provider::default();
        provider.id = "prov-1".to_string();
        provider.name = "Example Provider".to_string();
        providers.add(Bundle::new(provider), &admin).await.unwrap();

        let mut service = Service::default();
        service.id = "svc-1".to_string();
        service.resource_organisation = "prov-1".to_string();
        let bundle = Bundle::new(service);

        sync.handle(RegistryEvent::new(EventAction::Verified, &bundle, None).unwrap())
            .await
            .unwrap();

        let sent = mail.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1, "service manager");
    }

    #[tokio::test]
    async fn test_published_mirror_copies_get_no_mail() {
        let (mail, _providers, sync) = fixture().await;
        let mut provider = Provider::default();
        provider.id = "pinakes.prov-1".to_string();
        provider.catalogue_id = "pinakes".to_string();
        let mut bundle = Bundle::new(provider);
        bundle.metadata = Some(crate::models::metadata::Metadata::create(&Caller::system()));
        if let Some(metadata) = bundle.metadata.as_mut() {
            metadata.published = true;
        }

        sync.handle(RegistryEvent::new(EventAction::Registered, &bundle, None).unwrap())
            .await
            .unwrap();

        assert!(mail.sent.lock().is_empty());
    }
}
