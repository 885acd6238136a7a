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

//! Typed lifecycle events.
//!
//! Managers publish one [`RegistryEvent`] after every committed write.
//! Events carry a serialized snapshot of the bundle as committed, not a
//! live reference, so subscribers always observe the just-committed state
//! regardless of later writes.

use serde::{Deserialize, Serialize};

use crate::error::CatalogueError;
use crate::models::bundle::{Bundle, Payload};
use crate::models::status::ResourceKind;

/// The lifecycle transition an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventAction {
    /// A bundle was onboarded (first submission or draft promotion)
    Registered,
    /// A bundle's payload, activation, suspension, or ownership changed
    Updated,
    /// A moderator decided on a pending bundle
    Verified,
    /// A compliance audit was recorded
    Audited,
    /// A bundle was deleted
    Deleted,
}

impl EventAction {
    /// Returns the wire representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventAction::Registered => "registered",
            EventAction::Updated => "updated",
            EventAction::Verified => "verified",
            EventAction::Audited => "audited",
            EventAction::Deleted => "deleted",
        }
    }

    /// The topic suffix used for outbound notifications.
    pub fn topic_suffix(&self) -> &'static str {
        match self {
            EventAction::Registered => "create",
            EventAction::Updated | EventAction::Verified | EventAction::Audited => "update",
            EventAction::Deleted => "delete",
        }
    }
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One committed lifecycle transition, as published on the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryEvent {
    /// The kind of resource the event concerns
    pub kind: ResourceKind,
    /// The transition
    pub action: EventAction,
    /// Id of the affected bundle
    pub id: String,
    /// Snapshot of the bundle as committed
    pub bundle: serde_json::Value,
    /// For updates, the snapshot the write replaced
    pub previous: Option<serde_json::Value>,
}

impl RegistryEvent {
    /// Builds an event from a committed bundle.
    pub fn new<P: Payload>(
        action: EventAction,
        bundle: &Bundle<P>,
        previous: Option<&Bundle<P>>,
    ) -> Result<Self, CatalogueError> {
        Ok(RegistryEvent {
            kind: P::kind(),
            action,
            id: bundle.id().to_string(),
            bundle: serde_json::to_value(bundle)?,
            previous: previous.map(serde_json::to_value).transpose()?,
        })
    }

    /// Deserializes the committed snapshot, when the event is for `P`'s
    /// kind.
    pub fn bundle_of<P: Payload>(&self) -> Option<Bundle<P>> {
        if self.kind != P::kind() {
            return None;
        }
        serde_json::from_value(self.bundle.clone()).ok()
    }

    /// Deserializes the replaced snapshot, when present and for `P`'s kind.
    pub fn previous_of<P: Payload>(&self) -> Option<Bundle<P>> {
        if self.kind != P::kind() {
            return None;
        }
        self.previous
            .as_ref()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// The outbound notification topic for this event, e.g.
    /// `"service.update"`.
    pub fn topic(&self) -> String {
        format!("{}.{}", self.kind.resource_type(), self.action.topic_suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::payloads::{Provider, Service};

    fn service_event(action: EventAction) -> RegistryEvent {
        let mut service = Service::default();
        service.id = "svc-1".to_string();
        service.catalogue_id = "pinakes".to_string();
        service.name = "Compute".to_string();
        RegistryEvent::new(action, &Bundle::new(service), None).unwrap()
    }

    #[test]
    fn test_topic_rendering() {
        assert_eq!(service_event(EventAction::Registered).topic(), "service.create");
        assert_eq!(service_event(EventAction::Verified).topic(), "service.update");
        assert_eq!(service_event(EventAction::Deleted).topic(), "service.delete");
    }

    #[test]
    fn test_bundle_of_checks_kind() {
        let event = service_event(EventAction::Registered);
        assert!(event.bundle_of::<Service>().is_some());
        assert!(event.bundle_of::<Provider>().is_none());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut service = Service::default();
        service.id = "svc-1".to_string();
        let mut bundle = Bundle::new(service);
        let event = RegistryEvent::new(EventAction::Registered, &bundle, None).unwrap();

        // mutating the original after publication does not affect the event
        bundle.payload.name = "changed".to_string();
        let snapshot = event.bundle_of::<Service>().unwrap();
        assert_eq!(snapshot.payload.name, "");
    }
}
