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

//! Detached synchronization workers.
//!
//! Each subscriber runs in its own task, fully detached from the request
//! that produced an event: the HTTP response never waits for a hook and
//! carries no information about its outcome. Handler errors are caught
//! here, logged, and never propagated — a failing hook must not fail the
//! write that triggered it.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use super::bus::EventBus;
use super::events::RegistryEvent;
use crate::error::CatalogueError;

/// A synchronization hook fed by the event bus.
#[async_trait]
pub trait EventHandler: Send + Sync + 'static {
    /// Stable name, used in logs.
    fn name(&self) -> &'static str;

    /// Processes one event. Errors are logged by the worker and otherwise
    /// ignored.
    async fn handle(&self, event: RegistryEvent) -> Result<(), CatalogueError>;
}

/// Spawns a detached worker draining the bus into `handler`.
///
/// The worker runs until the bus is dropped. A subscriber that lags behind
/// the channel capacity loses the oldest events; that is logged and the
/// worker keeps going with what remains.
pub fn spawn_worker(bus: &EventBus, handler: Arc<dyn EventHandler>) -> JoinHandle<()> {
    let mut receiver = bus.subscribe();
    tokio::spawn(async move {
        tracing::debug!(handler = handler.name(), "synchronization worker started");
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let topic = event.topic();
                    let id = event.id.clone();
                    if let Err(error) = handler.handle(event).await {
                        tracing::error!(
                            handler = handler.name(),
                            %topic,
                            %id,
                            error = %error,
                            "synchronization hook failed"
                        );
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        handler = handler.name(),
                        skipped,
                        "synchronization worker lagged; events were dropped"
                    );
                }
                Err(RecvError::Closed) => {
                    tracing::debug!(handler = handler.name(), "event bus closed; worker exiting");
                    break;
                }
            }
        }
    })
}
