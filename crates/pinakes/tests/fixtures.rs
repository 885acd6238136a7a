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

//! Test fixture wiring a complete catalogue: store, managers, mirrors,
//! and all synchronization workers, with backoffs shortened so the
//! eventual assertions converge quickly.

use std::future::Future;
use std::sync::{Arc, Once};
use std::time::{Duration, Instant};

use pinakes::auth::{Caller, Role};
use pinakes::config::CatalogueConfig;
use pinakes::mail::LoggingMailService;
use pinakes::manager::{ProviderManager, ResourceManager};
use pinakes::models::{Bundle, Provider, ProviderUser, Service, TemplateStatus};
use pinakes::notify::LoggingNotificationSink;
use pinakes::public::PublicMirrorManager;
use pinakes::store::MemoryStore;
use pinakes::sync::{
    spawn_worker, EventBus, NotificationSync, ProviderStateSync, PublicMirrorSync,
    SuspensionCascade,
};
use pinakes::vocabulary::VocabularyRegistry;

/// A fully wired catalogue instance backed by the in-memory store.
pub struct TestCatalogue {
    pub store: Arc<MemoryStore>,
    pub providers: Arc<ProviderManager<MemoryStore>>,
    pub services: Arc<ResourceManager<Service, MemoryStore>>,
    pub service_mirror: Arc<PublicMirrorManager<Service, MemoryStore>>,
    pub provider_mirror: Arc<PublicMirrorManager<Provider, MemoryStore>>,
    pub bus: EventBus,
}

static INIT: Once = Once::new();

/// Initializes test logging once; `RUST_LOG` controls verbosity.
fn init_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .try_init();
    });
}

/// Builds a catalogue with every synchronization worker running and the
/// given search-visibility lag on the store.
pub fn test_catalogue(visibility_lag: Duration) -> TestCatalogue {
    init_logging();
    let mut config = CatalogueConfig::default();
    config.sync.visibility_initial_backoff = Duration::from_millis(5);
    config.sync.visibility_max_backoff = Duration::from_millis(25);
    config.sync.visibility_deadline = Duration::from_secs(2);
    let config = Arc::new(config);

    let store = Arc::new(MemoryStore::with_visibility_lag(visibility_lag));
    let vocabulary = Arc::new(VocabularyRegistry::with_lifecycle_states());
    let bus = EventBus::new(256);

    let providers = Arc::new(ProviderManager::new(
        store.clone(),
        vocabulary.clone(),
        bus.clone(),
        config.clone(),
    ));
    let services = Arc::new(ResourceManager::new(
        store.clone(),
        vocabulary,
        Some(providers.clone()),
        bus.clone(),
        config.clone(),
    ));

    let sink = Arc::new(LoggingNotificationSink);
    let service_mirror = Arc::new(PublicMirrorManager::new(
        store.clone(),
        sink.clone(),
        config.clone(),
    ));
    let provider_mirror = Arc::new(PublicMirrorManager::new(
        store.clone(),
        sink,
        config.clone(),
    ));

    spawn_worker(
        &bus,
        Arc::new(PublicMirrorSync::new(
            service_mirror.clone(),
            store.clone(),
            config.clone(),
        )),
    );
    spawn_worker(
        &bus,
        Arc::new(PublicMirrorSync::new(
            provider_mirror.clone(),
            store.clone(),
            config.clone(),
        )),
    );
    spawn_worker(
        &bus,
        Arc::new(ProviderStateSync::new(
            services.clone(),
            providers.clone(),
            config.catalogue_id.clone(),
        )),
    );
    spawn_worker(&bus, Arc::new(SuspensionCascade::new(services.clone())));
    spawn_worker(
        &bus,
        Arc::new(NotificationSync::new(
            Arc::new(LoggingMailService),
            providers.clone(),
            config.catalogue_id.clone(),
        )),
    );

    TestCatalogue {
        store,
        providers,
        services,
        service_mirror,
        provider_mirror,
        bus,
    }
}

/// The moderating admin used by the tests.
pub fn admin() -> Caller {
    Caller::new("admin@catalogue.org", "Admin", Role::Admin)
}

/// The provider representative used by the tests.
pub fn provider_user() -> Caller {
    Caller::new("jane@provider.org", "Jane Doe", Role::Provider)
}

/// A provider payload with one admin user.
pub fn provider(id: &str) -> Bundle<Provider> {
    let mut payload = Provider::default();
    payload.id = id.to_string();
    payload.name = "Example Provider".to_string();
    payload.users = vec![ProviderUser {
        email: "jane@provider.org".to_string(),
        full_name: "Jane Doe".to_string(),
    }];
    Bundle::new(payload)
}

/// A service payload owned by the given provider.
pub fn service(id: &str, provider_id: &str) -> Bundle<Service> {
    let mut payload = Service::default();
    payload.id = id.to_string();
    payload.name = "Compute Service".to_string();
    payload.resource_organisation = provider_id.to_string();
    Bundle::new(payload)
}

/// Registers and approves a provider so resources can hang off it.
pub async fn seed_approved_provider(catalogue: &TestCatalogue, id: &str) {
    catalogue
        .providers
        .add(provider(id), &provider_user())
        .await
        .expect("provider registration");
    catalogue
        .providers
        .verify(id, "approved provider", true, &admin())
        .await
        .expect("provider approval");
}

/// Waits until the provider's template status reaches `status`, so tests
/// can serialize against the template hook before moderating further.
pub async fn await_template_status(
    catalogue: &TestCatalogue,
    provider_id: &str,
    status: TemplateStatus,
) -> bool {
    eventually(SYNC_WINDOW, || async {
        catalogue
            .providers
            .get_bundle(provider_id)
            .await
            .map(|provider| provider.payload.template_status == status)
            .unwrap_or(false)
    })
    .await
}

/// Polls an async condition until it holds or the timeout expires.
pub async fn eventually<F, Fut>(timeout: Duration, mut probe: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if probe().await {
            return true;
        }
        if Instant::now() > deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Default window the eventual assertions wait for.
pub const SYNC_WINDOW: Duration = Duration::from_secs(5);
