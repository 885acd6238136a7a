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

//! # Lifecycle Synchronization
//!
//! The cross-cutting side effects of the write path, re-architected from
//! interception into explicit events: managers publish one typed
//! [`RegistryEvent`](events::RegistryEvent) per committed write, and
//! independent subscribers — each a detached worker — react to it.
//!
//! ## Contract
//!
//! - hooks always observe the just-committed state (events carry
//!   snapshots taken after the write)
//! - hooks for different resources or of different types have no ordering
//!   guarantee relative to each other
//! - a hook failure is logged and swallowed at the worker boundary; it
//!   never rolls back or fails the triggering write
//! - the triggering request does not wait for hooks and learns nothing
//!   about their outcome
//!
//! ## Subscribers
//!
//! - [`provider_state::ProviderStateSync`]: template-status bookkeeping
//! - [`public_mirror::PublicMirrorSync`]: public copy create/update/delete
//! - [`suspension::SuspensionCascade`]: provider suspension fan-out
//! - [`notifications::NotificationSync`]: registration mails

pub mod bus;
pub mod events;
pub mod notifications;
pub mod provider_state;
pub mod public_mirror;
pub mod suspension;
pub mod visibility;
pub mod worker;

// Re-export commonly used types
pub use bus::EventBus;
pub use events::{EventAction, RegistryEvent};
pub use notifications::NotificationSync;
pub use provider_state::ProviderStateSync;
pub use public_mirror::PublicMirrorSync;
pub use suspension::SuspensionCascade;
pub use visibility::await_searchable;
pub use worker::{spawn_worker, EventHandler};
