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

//! # Resource Managers
//!
//! The write path of the catalogue: validation, CRUD, and the moderation
//! state machine. One generic [`ResourceManager`] serves every resource
//! kind; [`ProviderManager`] wraps it with provider-specific bookkeeping
//! (template status, forced defaults on registration).
//!
//! Managers persist through the document store and publish one typed
//! event per committed write; all cross-cutting side effects (public
//! mirror, provider template sync, mails, topics) live in detached
//! subscribers under [`crate::sync`].

pub mod provider_manager;
pub mod resource_manager;

// Re-export commonly used types
pub use provider_manager::ProviderManager;
pub use resource_manager::{ResourceManager, RichResource};

use crate::error::CatalogueError;
use crate::store::StoreError;

/// Maps store errors onto the catalogue taxonomy, so the HTTP layer can
/// distinguish 404/409 from backend failures.
pub(crate) fn map_store_error(error: StoreError) -> CatalogueError {
    match error {
        StoreError::NotFound { resource_type, id } => {
            CatalogueError::NotFound { resource_type, id }
        }
        StoreError::AlreadyExists { resource_type, id } => {
            CatalogueError::AlreadyExists { resource_type, id }
        }
        other => CatalogueError::Store(other),
    }
}
