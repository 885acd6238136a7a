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

//! # Pinakes
//!
//! A metadata catalogue for research-infrastructure resources with a
//! moderation workflow and an asynchronously maintained public mirror.
//!
//! ## Architecture
//!
//! Entries are [`Bundle`](models::Bundle)s: a domain payload wrapped with
//! moderation status, visibility flags, and an append-only audit trail.
//! They live in a [document store](store) with facet-filtered search.
//! One generic [`ResourceManager`](manager::ResourceManager) implements
//! CRUD and the moderation state machine for every resource kind; every
//! committed write publishes a typed event, and detached
//! [synchronization workers](sync) keep the provider template status, the
//! [public mirror](public), mails, and topic subscribers in step — always
//! after the fact, never on the request path.
//!
//! ```text
//!           write                    events                 derived state
//!  client ────────> ResourceManager ────────> EventBus ──┬─> public mirror
//!                        │                               ├─> provider template
//!                        v                               ├─> mails
//!                   DocumentStore <──────────────────────┴─< workers
//! ```
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pinakes::auth::{Caller, Role};
//! use pinakes::config::CatalogueConfig;
//! use pinakes::manager::{ProviderManager, ResourceManager};
//! use pinakes::models::{Bundle, Service};
//! use pinakes::store::MemoryStore;
//! use pinakes::sync::EventBus;
//! use pinakes::vocabulary::VocabularyRegistry;
//!
//! # async fn example() -> Result<(), pinakes::error::CatalogueError> {
//! let store = Arc::new(MemoryStore::new());
//! let vocabulary = Arc::new(VocabularyRegistry::with_lifecycle_states());
//! let config = Arc::new(CatalogueConfig::default());
//! let bus = EventBus::new(256);
//!
//! let providers = Arc::new(ProviderManager::new(
//!     store.clone(), vocabulary.clone(), bus.clone(), config.clone(),
//! ));
//! let services: ResourceManager<Service, _> = ResourceManager::new(
//!     store, vocabulary, Some(providers), bus, config,
//! );
//!
//! let caller = Caller::new("jane@provider.org", "Jane Doe", Role::Provider);
//! let bundle = services.add(Bundle::new(Service::default()), &caller).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod mail;
pub mod manager;
pub mod models;
pub mod notify;
pub mod public;
pub mod store;
pub mod sync;
pub mod vocabulary;

// Re-export the types most integrations need
pub use auth::{Caller, Role};
pub use config::CatalogueConfig;
pub use error::CatalogueError;
pub use manager::{ProviderManager, ResourceManager};
pub use models::{Bundle, Payload, ResourceKind, ResourceStatus, TemplateStatus};
pub use public::PublicMirrorManager;
pub use store::{DocumentStore, FacetFilter, MemoryStore, Paging};
pub use sync::EventBus;
pub use vocabulary::VocabularyRegistry;
