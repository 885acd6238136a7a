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

//! The generic bundle envelope.
//!
//! A [`Bundle`] pairs a domain payload with its moderation state: status,
//! visibility flags, bookkeeping metadata, and the append-only audit trail.
//! One generic envelope replaces a per-type envelope for every resource
//! kind; the [`Payload`] trait is the small capability surface the
//! lifecycle machinery needs from a payload.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::models::logging_info::{
    determine_audit_state, latest_of_type, LoggingInfo, LoggingInfoType,
};
use crate::models::metadata::Metadata;
use crate::models::status::{ResourceKind, ResourceStatus};

/// Capability interface implemented by every domain payload.
///
/// The lifecycle machinery is generic over this trait; nothing outside a
/// payload's own module knows its concrete fields.
pub trait Payload:
    Clone + Send + Sync + Serialize + DeserializeOwned + std::fmt::Debug + 'static
{
    /// The kind of resource this payload represents.
    fn kind() -> ResourceKind;

    /// Unique identifier within the catalogue.
    fn id(&self) -> &str;

    /// Replaces the identifier (used when assigning ids and when rewriting
    /// to the composite public id).
    fn set_id(&mut self, id: String);

    /// The catalogue this payload belongs to.
    fn catalogue_id(&self) -> &str;

    /// Sets the owning catalogue.
    fn set_catalogue_id(&mut self, catalogue_id: String);

    /// Human-readable name.
    fn name(&self) -> &str;

    /// The owning provider, for payloads that have one.
    fn provider_id(&self) -> Option<&str> {
        None
    }

    /// Reassigns the owning provider; a no-op for payloads without one.
    fn set_provider_id(&mut self, _provider_id: String) {}

    /// Vocabulary references to validate on write, as
    /// `(vocabulary type, id)` pairs.
    fn vocabulary_refs(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Removes access-controlled fields before the payload is copied into
    /// the public mirror.
    fn strip_sensitive(&mut self) {}
}

/// Envelope pairing a domain payload with moderation metadata and the
/// audit trail.
///
/// The bundle has no id of its own: `Bundle::id` delegates to the payload,
/// so the two can never diverge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle<P> {
    /// The wrapped domain entity
    pub payload: P,
    /// Moderation status as its persisted vocabulary string; `None` until
    /// the bundle is onboarded (drafts have no status)
    #[serde(default)]
    pub status: Option<String>,
    /// Whether the entry is switched on for public visibility
    #[serde(default)]
    pub active: bool,
    /// Forces non-visibility regardless of status
    #[serde(default)]
    pub suspended: bool,
    /// Whether the entry still lives in the draft workspace
    #[serde(default)]
    pub draft: bool,
    /// Bookkeeping metadata; absent only before first persistence
    pub metadata: Option<Metadata>,
    /// Append-only lifecycle audit trail, sorted by date
    #[serde(default)]
    pub logging_info: Vec<LoggingInfo>,
    /// Most recent audit entry, denormalized for fast access
    #[serde(default)]
    pub latest_audit_info: Option<LoggingInfo>,
    /// Most recent onboard entry, denormalized for fast access
    #[serde(default)]
    pub latest_onboarding_info: Option<LoggingInfo>,
    /// Most recent update entry, denormalized for fast access
    #[serde(default)]
    pub latest_update_info: Option<LoggingInfo>,
    /// Derived compliance state, recomputed on every append
    #[serde(default)]
    pub audit_state: Option<String>,
}

impl<P: Payload> Bundle<P> {
    /// Wraps a payload in a fresh, not-yet-onboarded envelope.
    pub fn new(payload: P) -> Self {
        Bundle {
            payload,
            status: None,
            active: false,
            suspended: false,
            draft: false,
            metadata: None,
            logging_info: Vec::new(),
            latest_audit_info: None,
            latest_onboarding_info: None,
            latest_update_info: None,
            audit_state: None,
        }
    }

    /// The bundle id — always the payload id.
    pub fn id(&self) -> &str {
        self.payload.id()
    }

    /// The composite id the public mirror copy is keyed by.
    pub fn public_id(&self) -> String {
        format!("{}.{}", self.payload.catalogue_id(), self.payload.id())
    }

    /// The typed moderation status, if the persisted string parses for
    /// this bundle's kind.
    pub fn status(&self) -> Option<ResourceStatus> {
        self.status
            .as_deref()
            .and_then(|label| ResourceStatus::parse(label, P::kind()))
    }

    /// Sets the moderation status, rendering the kind-specific label.
    pub fn set_status(&mut self, status: ResourceStatus) {
        self.status = Some(status.label(P::kind()));
    }

    /// Appends an audit-trail entry, keeping the list sorted and the
    /// denormalized pointers and derived audit state current.
    pub fn append_log(&mut self, entry: LoggingInfo) {
        self.logging_info.push(entry);
        self.logging_info.sort_by_key(|e| e.date);
        self.latest_audit_info = latest_of_type(&self.logging_info, LoggingInfoType::Audit);
        self.latest_onboarding_info = latest_of_type(&self.logging_info, LoggingInfoType::Onboard);
        self.latest_update_info = latest_of_type(&self.logging_info, LoggingInfoType::Update);
        self.audit_state = Some(
            determine_audit_state(&self.logging_info)
                .as_str()
                .to_string(),
        );
    }

    /// Necessary condition for appearing in the public mirror: approved,
    /// active, not suspended, not a draft.
    pub fn is_publicly_visible(&self) -> bool {
        self.active
            && !self.suspended
            && !self.draft
            && self.status() == Some(ResourceStatus::Approved)
    }

    /// Whether the bundle carries the published marker, i.e. it is (the
    /// original of, or itself) a public mirror entry.
    pub fn is_published(&self) -> bool {
        self.metadata.as_ref().is_some_and(|m| m.published)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Caller;
    use crate::models::logging_info::ActionType;
    use crate::models::payloads::Service;

    fn service_bundle() -> Bundle<Service> {
        let mut service = Service::default();
        service.id = "svc-1".to_string();
        service.catalogue_id = "pinakes".to_string();
        service.name = "Compute Service".to_string();
        Bundle::new(service)
    }

    #[test]
    fn test_id_delegates_to_payload() {
        let mut bundle = service_bundle();
        assert_eq!(bundle.id(), "svc-1");
        bundle.payload.set_id("svc-2".to_string());
        assert_eq!(bundle.id(), "svc-2");
    }

    #[test]
    fn test_public_id_is_composite() {
        assert_eq!(service_bundle().public_id(), "pinakes.svc-1");
    }

    #[test]
    fn test_status_round_trip() {
        let mut bundle = service_bundle();
        assert_eq!(bundle.status(), None);
        bundle.set_status(ResourceStatus::Approved);
        assert_eq!(bundle.status.as_deref(), Some("approved resource"));
        assert_eq!(bundle.status(), Some(ResourceStatus::Approved));
    }

    #[test]
    fn test_append_log_maintains_pointers() {
        let mut bundle = service_bundle();
        let caller = Caller::system();
        bundle.append_log(
            LoggingInfo::entry(&caller, LoggingInfoType::Onboard, ActionType::Registered).unwrap(),
        );
        bundle.append_log(
            LoggingInfo::entry(&caller, LoggingInfoType::Update, ActionType::Updated).unwrap(),
        );
        assert!(bundle.latest_onboarding_info.is_some());
        assert!(bundle.latest_update_info.is_some());
        assert!(bundle.latest_audit_info.is_none());
        assert_eq!(bundle.audit_state.as_deref(), Some("Not Audited"));
        assert_eq!(bundle.logging_info.len(), 2);
    }

    #[test]
    fn test_public_visibility_requires_all_conditions() {
        let mut bundle = service_bundle();
        assert!(!bundle.is_publicly_visible());
        bundle.set_status(ResourceStatus::Approved);
        assert!(!bundle.is_publicly_visible());
        bundle.active = true;
        assert!(bundle.is_publicly_visible());
        bundle.suspended = true;
        assert!(!bundle.is_publicly_visible());
    }
}
