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

//! Resource kinds and lifecycle statuses.
//!
//! Statuses are persisted as human-readable strings ("pending resource",
//! "approved provider", ...) so stored documents stay filterable on the
//! exact vocabulary the moderation UI uses. The typed enums here are the
//! only place those strings are produced or parsed.

use serde::{Deserialize, Serialize};

/// The kinds of entities the catalogue manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// A research-infrastructure service
    Service,
    /// A data source
    Datasource,
    /// A training resource
    TrainingResource,
    /// An interoperability guideline record
    InteroperabilityRecord,
    /// An assignment of guidelines to a resource
    ResourceInteroperabilityRecord,
    /// A provider organisation
    Provider,
}

impl ResourceKind {
    /// All kinds, in a stable order.
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Service,
        ResourceKind::Datasource,
        ResourceKind::TrainingResource,
        ResourceKind::InteroperabilityRecord,
        ResourceKind::ResourceInteroperabilityRecord,
        ResourceKind::Provider,
    ];

    /// The document-store resource type for private bundles of this kind.
    pub fn resource_type(&self) -> &'static str {
        match self {
            ResourceKind::Service => "service",
            ResourceKind::Datasource => "datasource",
            ResourceKind::TrainingResource => "training_resource",
            ResourceKind::InteroperabilityRecord => "interoperability_record",
            ResourceKind::ResourceInteroperabilityRecord => "resource_interoperability_record",
            ResourceKind::Provider => "provider",
        }
    }

    /// The document-store resource type holding the public mirror.
    pub fn public_resource_type(&self) -> String {
        format!("{}-public", self.resource_type())
    }

    /// The noun used when rendering statuses for this kind.
    pub fn status_noun(&self) -> &'static str {
        match self {
            ResourceKind::Service | ResourceKind::Datasource | ResourceKind::TrainingResource => {
                "resource"
            }
            ResourceKind::InteroperabilityRecord => "interoperability record",
            ResourceKind::ResourceInteroperabilityRecord => "resource interoperability record",
            ResourceKind::Provider => "provider",
        }
    }

    /// Parses a kind from its resource type string.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.resource_type() == s)
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.resource_type())
    }
}

/// Moderation status of a bundle.
///
/// Transitions are monotonic within `{none} → Pending → {Approved |
/// Rejected}`; moves between Approved and Rejected happen only through the
/// explicit verify action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceStatus {
    /// Submitted, awaiting moderation
    Pending,
    /// Accepted by a moderator
    Approved,
    /// Rejected by a moderator
    Rejected,
}

impl ResourceStatus {
    /// Renders the status as the persisted vocabulary string for `kind`,
    /// e.g. `"approved resource"` or `"pending provider"`.
    pub fn label(&self, kind: ResourceKind) -> String {
        let adjective = match self {
            ResourceStatus::Pending => "pending",
            ResourceStatus::Approved => "approved",
            ResourceStatus::Rejected => "rejected",
        };
        format!("{} {}", adjective, kind.status_noun())
    }

    /// Parses a vocabulary string back into a status, checking that the
    /// noun matches `kind`.
    pub fn parse(label: &str, kind: ResourceKind) -> Option<Self> {
        let status = match label.split(' ').next()? {
            "pending" => ResourceStatus::Pending,
            "approved" => ResourceStatus::Approved,
            "rejected" => ResourceStatus::Rejected,
            _ => return None,
        };
        (label == status.label(kind)).then_some(status)
    }

    /// Whether a verify action may move a bundle from `self` to `target`.
    pub fn allows_transition_to(&self, target: ResourceStatus) -> bool {
        match (self, target) {
            // re-verifying into Pending forces re-review; it is also the
            // landing state when a rejected bundle is resubmitted
            (ResourceStatus::Pending, _) => true,
            (ResourceStatus::Approved, ResourceStatus::Approved) => true,
            (ResourceStatus::Approved, ResourceStatus::Rejected) => true,
            (ResourceStatus::Rejected, ResourceStatus::Approved) => true,
            (ResourceStatus::Rejected, ResourceStatus::Rejected) => true,
            (ResourceStatus::Rejected, ResourceStatus::Pending) => true,
            (ResourceStatus::Approved, ResourceStatus::Pending) => false,
        }
    }
}

/// Provider-level aggregate over the moderation state of its resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateStatus {
    /// The provider has no resources yet
    NoTemplate,
    /// A first resource is awaiting moderation
    Pending,
    /// The provider's template resource has been approved
    Approved,
    /// The provider's template resource has been rejected
    Rejected,
}

impl TemplateStatus {
    /// Returns the persisted string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateStatus::NoTemplate => "no template status",
            TemplateStatus::Pending => "pending template",
            TemplateStatus::Approved => "approved template",
            TemplateStatus::Rejected => "rejected template",
        }
    }

    /// Parses the persisted string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "no template status" => Some(TemplateStatus::NoTemplate),
            "pending template" => Some(TemplateStatus::Pending),
            "approved template" => Some(TemplateStatus::Approved),
            "rejected template" => Some(TemplateStatus::Rejected),
            _ => None,
        }
    }

    /// Whether the first-resource hook should force the template into
    /// review: only providers that never had a template, or whose template
    /// was rejected, re-enter the pending state.
    pub fn needs_review_on_new_resource(&self) -> bool {
        matches!(self, TemplateStatus::NoTemplate | TemplateStatus::Rejected)
    }
}

impl Default for TemplateStatus {
    fn default() -> Self {
        TemplateStatus::NoTemplate
    }
}

impl std::fmt::Display for TemplateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
