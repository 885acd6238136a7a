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

//! # Domain Model
//!
//! The bundle envelope, domain payloads, lifecycle statuses, and the
//! append-only audit trail.
//!
//! ## Key Components
//!
//! - [`bundle`]: the generic [`Bundle`](bundle::Bundle) envelope and the
//!   [`Payload`](bundle::Payload) capability trait
//! - [`payloads`]: concrete payload types (services, datasources, training
//!   resources, interoperability records, providers)
//! - [`status`]: resource kinds, moderation statuses, template statuses
//! - [`logging_info`]: audit-trail entries and the derived audit state
//! - [`metadata`]: created/modified bookkeeping and the published marker

pub mod bundle;
pub mod logging_info;
pub mod metadata;
pub mod payloads;
pub mod status;

// Re-export commonly used types
pub use bundle::{Bundle, Payload};
pub use logging_info::{
    determine_audit_state, ActionType, AuditState, LoggingInfo, LoggingInfoType,
};
pub use metadata::Metadata;
pub use payloads::{
    Contact, Datasource, InteroperabilityRecord, Provider, ProviderUser,
    ResourceInteroperabilityRecord, Service, TrainingResource,
};
pub use status::{ResourceKind, ResourceStatus, TemplateStatus};
