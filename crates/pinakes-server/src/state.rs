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

//! Application state: one manager and one mirror per resource kind, the
//! provider manager, and the event bus, with every synchronization worker
//! spawned at construction.

use std::sync::Arc;

use pinakes::config::CatalogueConfig;
use pinakes::mail::LoggingMailService;
use pinakes::manager::{ProviderManager, ResourceManager};
use pinakes::models::bundle::Payload;
use pinakes::models::{
    Datasource, InteroperabilityRecord, Provider, ResourceInteroperabilityRecord, Service,
    TrainingResource,
};
use pinakes::notify::LoggingNotificationSink;
use pinakes::public::PublicMirrorManager;
use pinakes::store::MemoryStore;
use pinakes::sync::{
    spawn_worker, EventBus, NotificationSync, ProviderStateSync, PublicMirrorSync,
    SuspensionCascade,
};
use pinakes::vocabulary::VocabularyRegistry;
use tokio::task::JoinHandle;

/// One resource kind's manager + mirror pair.
pub struct ManagedKind<P: Payload> {
    /// The private write-path manager
    pub manager: Arc<ResourceManager<P, MemoryStore>>,
    /// The public mirror
    pub mirror: Arc<PublicMirrorManager<P, MemoryStore>>,
}

struct AppInner {
    services: ManagedKind<Service>,
    datasources: ManagedKind<Datasource>,
    training_resources: ManagedKind<TrainingResource>,
    interoperability_records: ManagedKind<InteroperabilityRecord>,
    resource_interoperability_records: ManagedKind<ResourceInteroperabilityRecord>,
    providers: Arc<ProviderManager<MemoryStore>>,
    provider_mirror: Arc<PublicMirrorManager<Provider, MemoryStore>>,
    bus: EventBus,
}

/// Shared application state handed to every route.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppInner>,
}

/// Gives generic handlers access to the manager/mirror pair for one kind.
pub trait HasManager<P: Payload> {
    /// The private manager for `P`.
    fn manager(&self) -> &Arc<ResourceManager<P, MemoryStore>>;
    /// The public mirror for `P`.
    fn mirror(&self) -> &Arc<PublicMirrorManager<P, MemoryStore>>;
}

macro_rules! has_manager {
    ($payload:ty, $field:ident) => {
        impl HasManager<$payload> for AppState {
            fn manager(&self) -> &Arc<ResourceManager<$payload, MemoryStore>> {
                &self.inner.$field.manager
            }
            fn mirror(&self) -> &Arc<PublicMirrorManager<$payload, MemoryStore>> {
                &self.inner.$field.mirror
            }
        }
    };
}

has_manager!(Service, services);
has_manager!(Datasource, datasources);
has_manager!(TrainingResource, training_resources);
has_manager!(InteroperabilityRecord, interoperability_records);
has_manager!(
    ResourceInteroperabilityRecord,
    resource_interoperability_records
);

impl AppState {
    /// Builds the full application: store, vocabulary, managers, mirrors,
    /// and all synchronization workers. The returned handles keep the
    /// workers alive for the life of the server.
    pub fn build(config: CatalogueConfig) -> (AppState, Vec<JoinHandle<()>>) {
        let config = Arc::new(config);
        let store = Arc::new(MemoryStore::new());
        let vocabulary = Arc::new(VocabularyRegistry::with_lifecycle_states());
        let sink = Arc::new(LoggingNotificationSink);
        let bus = EventBus::new(config.sync.event_buffer);
        let mut workers = Vec::new();

        let providers = Arc::new(ProviderManager::new(
            store.clone(),
            vocabulary.clone(),
            bus.clone(),
            config.clone(),
        ));
        let provider_mirror = Arc::new(PublicMirrorManager::new(
            store.clone(),
            sink.clone(),
            config.clone(),
        ));
        workers.push(spawn_worker(
            &bus,
            Arc::new(PublicMirrorSync::new(
                provider_mirror.clone(),
                store.clone(),
                config.clone(),
            )),
        ));
        workers.push(spawn_worker(
            &bus,
            Arc::new(NotificationSync::new(
                Arc::new(LoggingMailService),
                providers.clone(),
                config.catalogue_id.clone(),
            )),
        ));

        fn managed_kind<P: Payload>(
            store: &Arc<MemoryStore>,
            vocabulary: &Arc<VocabularyRegistry>,
            providers: &Arc<ProviderManager<MemoryStore>>,
            sink: &Arc<LoggingNotificationSink>,
            bus: &EventBus,
            config: &Arc<CatalogueConfig>,
            workers: &mut Vec<JoinHandle<()>>,
        ) -> ManagedKind<P> {
            let manager = Arc::new(ResourceManager::new(
                store.clone(),
                vocabulary.clone(),
                Some(providers.clone()),
                bus.clone(),
                config.clone(),
            ));
            let mirror = Arc::new(PublicMirrorManager::new(
                store.clone(),
                sink.clone(),
                config.clone(),
            ));
            workers.push(spawn_worker(
                bus,
                Arc::new(PublicMirrorSync::new(
                    mirror.clone(),
                    store.clone(),
                    config.clone(),
                )),
            ));
            workers.push(spawn_worker(
                bus,
                Arc::new(ProviderStateSync::new(
                    manager.clone(),
                    providers.clone(),
                    config.catalogue_id.clone(),
                )),
            ));
            workers.push(spawn_worker(
                bus,
                Arc::new(SuspensionCascade::new(manager.clone())),
            ));
            ManagedKind { manager, mirror }
        }

        let inner = AppInner {
            services: managed_kind(
                &store, &vocabulary, &providers, &sink, &bus, &config, &mut workers,
            ),
            datasources: managed_kind(
                &store, &vocabulary, &providers, &sink, &bus, &config, &mut workers,
            ),
            training_resources: managed_kind(
                &store, &vocabulary, &providers, &sink, &bus, &config, &mut workers,
            ),
            interoperability_records: managed_kind(
                &store, &vocabulary, &providers, &sink, &bus, &config, &mut workers,
            ),
            resource_interoperability_records: managed_kind(
                &store, &vocabulary, &providers, &sink, &bus, &config, &mut workers,
            ),
            providers,
            provider_mirror,
            bus,
        };

        (
            AppState {
                inner: Arc::new(inner),
            },
            workers,
        )
    }

    /// The provider manager.
    pub fn providers(&self) -> &Arc<ProviderManager<MemoryStore>> {
        &self.inner.providers
    }

    /// The public provider mirror.
    pub fn provider_mirror(&self) -> &Arc<PublicMirrorManager<Provider, MemoryStore>> {
        &self.inner.provider_mirror
    }

    /// The event bus (exposed for tests and embedding).
    pub fn bus(&self) -> &EventBus {
        &self.inner.bus
    }
}
