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

//! Domain payload types.
//!
//! Each payload implements [`Payload`], the capability surface the generic
//! lifecycle machinery needs. Fields mirror the registry's public schema;
//! vocabulary-typed fields reference entries in the vocabulary registry
//! and are validated on write.

use serde::{Deserialize, Serialize};

use crate::models::bundle::Payload;
use crate::models::status::{ResourceKind, TemplateStatus};

/// A user entitled to manage a provider's entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderUser {
    /// Contact email
    pub email: String,
    /// Display name
    pub full_name: String,
}

/// A named contact point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Contact email
    pub email: String,
    /// Optional phone number
    #[serde(default)]
    pub phone: Option<String>,
}

/// A provider organisation offering resources through the catalogue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    /// Unique identifier
    pub id: String,
    /// Owning catalogue
    pub catalogue_id: String,
    /// Organisation name
    pub name: String,
    /// Short name
    #[serde(default)]
    pub abbreviation: String,
    /// Organisation website
    #[serde(default)]
    pub website: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Users entitled to manage this provider; stripped from public copies
    #[serde(default)]
    pub users: Vec<ProviderUser>,
    /// Primary contact; stripped from public copies
    #[serde(default)]
    pub main_contact: Option<Contact>,
    /// Aggregate moderation state over this provider's resources
    #[serde(default)]
    pub template_status: TemplateStatus,
}

impl Payload for Provider {
    fn kind() -> ResourceKind {
        ResourceKind::Provider
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn catalogue_id(&self) -> &str {
        &self.catalogue_id
    }

    fn set_catalogue_id(&mut self, catalogue_id: String) {
        self.catalogue_id = catalogue_id;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn strip_sensitive(&mut self) {
        self.users.clear();
        self.main_contact = None;
    }
}

/// A research-infrastructure service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Unique identifier
    pub id: String,
    /// Owning catalogue
    pub catalogue_id: String,
    /// Service name
    pub name: String,
    /// Owning provider id
    pub resource_organisation: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// One-line summary
    #[serde(default)]
    pub tagline: String,
    /// Landing page
    #[serde(default)]
    pub webpage: String,
    /// Category vocabulary ids
    #[serde(default)]
    pub categories: Vec<String>,
    /// Language vocabulary ids
    #[serde(default)]
    pub languages: Vec<String>,
}

impl Payload for Service {
    fn kind() -> ResourceKind {
        ResourceKind::Service
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn catalogue_id(&self) -> &str {
        &self.catalogue_id
    }

    fn set_catalogue_id(&mut self, catalogue_id: String) {
        self.catalogue_id = catalogue_id;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn provider_id(&self) -> Option<&str> {
        Some(&self.resource_organisation)
    }

    fn set_provider_id(&mut self, provider_id: String) {
        self.resource_organisation = provider_id;
    }

    fn vocabulary_refs(&self) -> Vec<(&'static str, String)> {
        let mut refs: Vec<(&'static str, String)> = self
            .categories
            .iter()
            .map(|id| ("category", id.clone()))
            .collect();
        refs.extend(self.languages.iter().map(|id| ("language", id.clone())));
        refs
    }
}

/// A data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Datasource {
    /// Unique identifier
    pub id: String,
    /// Owning catalogue
    pub catalogue_id: String,
    /// Datasource name
    pub name: String,
    /// Owning provider id
    pub resource_organisation: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Jurisdiction vocabulary id
    #[serde(default)]
    pub jurisdiction: Option<String>,
    /// Category vocabulary ids
    #[serde(default)]
    pub categories: Vec<String>,
}

impl Payload for Datasource {
    fn kind() -> ResourceKind {
        ResourceKind::Datasource
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn catalogue_id(&self) -> &str {
        &self.catalogue_id
    }

    fn set_catalogue_id(&mut self, catalogue_id: String) {
        self.catalogue_id = catalogue_id;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn provider_id(&self) -> Option<&str> {
        Some(&self.resource_organisation)
    }

    fn set_provider_id(&mut self, provider_id: String) {
        self.resource_organisation = provider_id;
    }

    fn vocabulary_refs(&self) -> Vec<(&'static str, String)> {
        let mut refs: Vec<(&'static str, String)> = self
            .categories
            .iter()
            .map(|id| ("category", id.clone()))
            .collect();
        if let Some(jurisdiction) = &self.jurisdiction {
            refs.push(("jurisdiction", jurisdiction.clone()));
        }
        refs
    }
}

/// A training resource (course, tutorial, learning material).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingResource {
    /// Unique identifier
    pub id: String,
    /// Owning catalogue
    pub catalogue_id: String,
    /// Title
    pub title: String,
    /// Owning provider id
    pub resource_organisation: String,
    /// License under which the material is offered
    #[serde(default)]
    pub license: String,
    /// Language vocabulary ids
    #[serde(default)]
    pub languages: Vec<String>,
    /// Landing page
    #[serde(default)]
    pub url: String,
}

impl Payload for TrainingResource {
    fn kind() -> ResourceKind {
        ResourceKind::TrainingResource
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn catalogue_id(&self) -> &str {
        &self.catalogue_id
    }

    fn set_catalogue_id(&mut self, catalogue_id: String) {
        self.catalogue_id = catalogue_id;
    }

    fn name(&self) -> &str {
        &self.title
    }

    fn provider_id(&self) -> Option<&str> {
        Some(&self.resource_organisation)
    }

    fn set_provider_id(&mut self, provider_id: String) {
        self.resource_organisation = provider_id;
    }

    fn vocabulary_refs(&self) -> Vec<(&'static str, String)> {
        self.languages
            .iter()
            .map(|id| ("language", id.clone()))
            .collect()
    }
}

/// An interoperability guideline record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteroperabilityRecord {
    /// Unique identifier
    pub id: String,
    /// Owning catalogue
    pub catalogue_id: String,
    /// Guideline title
    pub title: String,
    /// Publishing provider id
    pub provider_id: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Guideline-type vocabulary id
    #[serde(default)]
    pub guideline_type: Option<String>,
}

impl Payload for InteroperabilityRecord {
    fn kind() -> ResourceKind {
        ResourceKind::InteroperabilityRecord
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn catalogue_id(&self) -> &str {
        &self.catalogue_id
    }

    fn set_catalogue_id(&mut self, catalogue_id: String) {
        self.catalogue_id = catalogue_id;
    }

    fn name(&self) -> &str {
        &self.title
    }

    fn provider_id(&self) -> Option<&str> {
        Some(&self.provider_id)
    }

    fn set_provider_id(&mut self, provider_id: String) {
        self.provider_id = provider_id;
    }

    fn vocabulary_refs(&self) -> Vec<(&'static str, String)> {
        self.guideline_type
            .iter()
            .map(|id| ("guideline_type", id.clone()))
            .collect()
    }
}

/// Assignment of interoperability guidelines to a resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceInteroperabilityRecord {
    /// Unique identifier
    pub id: String,
    /// Owning catalogue
    pub catalogue_id: String,
    /// The resource the guidelines apply to
    pub resource_id: String,
    /// Assigned guideline record ids
    #[serde(default)]
    pub interoperability_record_ids: Vec<String>,
}

impl Payload for ResourceInteroperabilityRecord {
    fn kind() -> ResourceKind {
        ResourceKind::ResourceInteroperabilityRecord
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn catalogue_id(&self) -> &str {
        &self.catalogue_id
    }

    fn set_catalogue_id(&mut self, catalogue_id: String) {
        self.catalogue_id = catalogue_id;
    }

    fn name(&self) -> &str {
        &self.resource_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_strip_sensitive() {
        let mut provider = Provider {
            id: "prov-1".to_string(),
            users: vec![ProviderUser {
                email: "jane@provider.org".to_string(),
                full_name: "Jane Doe".to_string(),
            }],
            main_contact: Some(Contact {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                email: "jane@provider.org".to_string(),
                phone: None,
            }),
            ..Provider::default()
        };
        provider.strip_sensitive();
        assert!(provider.users.is_empty());
        assert!(provider.main_contact.is_none());
    }

    #[test]
    fn test_service_vocabulary_refs() {
        let service = Service {
            categories: vec!["category-compute".to_string()],
            languages: vec!["language-en".to_string()],
            ..Service::default()
        };
        let refs = service.vocabulary_refs();
        assert!(refs.contains(&("category", "category-compute".to_string())));
        assert!(refs.contains(&("language", "language-en".to_string())));
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(Service::kind(), ResourceKind::Service);
        assert_eq!(Provider::kind(), ResourceKind::Provider);
        assert_eq!(
            ResourceInteroperabilityRecord::kind(),
            ResourceKind::ResourceInteroperabilityRecord
        );
    }
}
