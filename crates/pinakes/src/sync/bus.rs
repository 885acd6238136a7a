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

//! In-process event bus.
//!
//! A thin wrapper over a broadcast channel. Publication never blocks and
//! never fails the writer: with no live subscribers the event is dropped,
//! which is correct for a bus whose subscribers are optional
//! synchronization hooks.

use tokio::sync::broadcast;

use super::events::RegistryEvent;

/// Broadcast bus carrying [`RegistryEvent`]s to synchronization workers.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<RegistryEvent>,
}

impl EventBus {
    /// Creates a bus with the given channel capacity. Slow subscribers
    /// that fall more than `capacity` events behind lose the oldest ones
    /// (and log it).
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        EventBus { sender }
    }

    /// Publishes an event. Returns the number of subscribers that will
    /// observe it.
    pub fn publish(&self, event: RegistryEvent) -> usize {
        let topic = event.topic();
        match self.sender.send(event) {
            Ok(receivers) => {
                tracing::debug!(%topic, receivers, "published registry event");
                receivers
            }
            Err(_) => {
                // no live subscribers; nothing to deliver to
                tracing::debug!(%topic, "registry event dropped (no subscribers)");
                0
            }
        }
    }

    /// Opens a new subscription starting at the current tail.
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bundle::Bundle;
    use crate::models::payloads::Service;
    use crate::sync::events::EventAction;

    fn sample_event() -> RegistryEvent {
        let mut service = Service::default();
        service.id = "svc-1".to_string();
        RegistryEvent::new(EventAction::Registered, &Bundle::new(service), None).unwrap()
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_ok() {
        let bus = EventBus::new(8);
        assert_eq!(bus.publish(sample_event()), 0);
    }

    #[tokio::test]
    async fn test_subscriber_receives_event() {
        let bus = EventBus::new(8);
        let mut receiver = bus.subscribe();
        assert_eq!(bus.publish(sample_event()), 1);
        let event = receiver.recv().await.unwrap();
        assert_eq!(event.id, "svc-1");
    }
}
