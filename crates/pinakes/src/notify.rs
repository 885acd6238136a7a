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

//! Outbound topic notifications.
//!
//! Every lifecycle transition is forwarded to a topic sink
//! (`"service.update"`, `"provider.create"`, ...) with the full bundle
//! JSON as payload. Subscribers are unspecified external systems; the sink
//! is an opaque fire-and-forget seam.

use async_trait::async_trait;

use crate::error::CatalogueError;

/// Fire-and-forget topic publisher.
#[async_trait]
pub trait NotificationSink: Send + Sync + 'static {
    /// Publishes one message to a topic.
    async fn publish(
        &self,
        topic: &str,
        payload: &serde_json::Value,
    ) -> Result<(), CatalogueError>;
}

/// Default sink: logs the topic instead of delivering anywhere.
pub struct LoggingNotificationSink;

#[async_trait]
impl NotificationSink for LoggingNotificationSink {
    async fn publish(
        &self,
        topic: &str,
        payload: &serde_json::Value,
    ) -> Result<(), CatalogueError> {
        let id = payload
            .get("payload")
            .and_then(|p| p.get("id"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        tracing::debug!(topic, id, "topic notification");
        Ok(())
    }
}
