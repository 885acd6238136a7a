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

//! In-process vocabulary registry.
//!
//! Controlled vocabularies back every enumerated field in the catalogue:
//! lifecycle states, categories, languages, jurisdictions. Writes validate
//! their vocabulary references against this registry; unknown ids are
//! validation errors.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::CatalogueError;
use crate::models::status::{ResourceKind, ResourceStatus};

/// A single vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    /// Unique id, also the persisted reference value
    pub id: String,
    /// Display name
    pub name: String,
    /// Vocabulary type, e.g. `"Resource state"` or `"category"`
    pub vocabulary_type: String,
}

/// Registry of controlled vocabularies, seeded with the lifecycle states
/// and extensible with domain vocabularies at startup.
pub struct VocabularyRegistry {
    entries: RwLock<HashMap<String, Vocabulary>>,
}

/// Vocabulary type of resource lifecycle states.
pub const TYPE_RESOURCE_STATE: &str = "Resource state";
/// Vocabulary type of provider lifecycle states.
pub const TYPE_PROVIDER_STATE: &str = "Provider state";
/// Vocabulary type of provider template states.
pub const TYPE_TEMPLATE_STATE: &str = "Template state";

impl VocabularyRegistry {
    /// Creates a registry pre-seeded with every lifecycle-state vocabulary.
    pub fn with_lifecycle_states() -> Self {
        let registry = VocabularyRegistry {
            entries: RwLock::new(HashMap::new()),
        };
        for kind in ResourceKind::ALL {
            let state_type = if kind == ResourceKind::Provider {
                TYPE_PROVIDER_STATE
            } else {
                TYPE_RESOURCE_STATE
            };
            for status in [
                ResourceStatus::Pending,
                ResourceStatus::Approved,
                ResourceStatus::Rejected,
            ] {
                let label = status.label(kind);
                registry.register(Vocabulary {
                    id: label.clone(),
                    name: label,
                    vocabulary_type: state_type.to_string(),
                });
            }
        }
        for template in [
            "no template status",
            "pending template",
            "approved template",
            "rejected template",
        ] {
            registry.register(Vocabulary {
                id: template.to_string(),
                name: template.to_string(),
                vocabulary_type: TYPE_TEMPLATE_STATE.to_string(),
            });
        }
        registry
    }

    /// Registers (or replaces) an entry.
    pub fn register(&self, vocabulary: Vocabulary) {
        self.entries
            .write()
            .insert(vocabulary.id.clone(), vocabulary);
    }

    /// Looks up an entry by id.
    pub fn get(&self, id: &str) -> Option<Vocabulary> {
        self.entries.read().get(id).cloned()
    }

    /// Looks up an entry, failing with a validation error when absent.
    pub fn get_or_err(&self, id: &str) -> Result<Vocabulary, CatalogueError> {
        self.get(id)
            .ok_or_else(|| CatalogueError::validation(format!("unknown vocabulary id '{}'", id)))
    }

    /// Validates that `id` exists and carries the expected type.
    pub fn expect_type(
        &self,
        id: &str,
        vocabulary_type: &str,
    ) -> Result<Vocabulary, CatalogueError> {
        let vocabulary = self.get_or_err(id)?;
        if vocabulary.vocabulary_type != vocabulary_type {
            return Err(CatalogueError::validation(format!(
                "vocabulary '{}' is of type '{}', expected '{}'",
                id, vocabulary.vocabulary_type, vocabulary_type
            )));
        }
        Ok(vocabulary)
    }

    /// All entries of a given type, for browse endpoints.
    pub fn of_type(&self, vocabulary_type: &str) -> Vec<Vocabulary> {
        let mut entries: Vec<Vocabulary> = self
            .entries
            .read()
            .values()
            .filter(|v| v.vocabulary_type == vocabulary_type)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        entries
    }
}
