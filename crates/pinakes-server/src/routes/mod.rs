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

//! HTTP route assembly.

pub mod providers;
pub mod public;
pub mod resources;

use axum::routing::get;
use axum::Router;
use pinakes::models::payloads::{
    Datasource, InteroperabilityRecord, ResourceInteroperabilityRecord, Service, TrainingResource,
};

use crate::state::AppState;
use resources::resource_router;

/// Builds the complete API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/service", resource_router::<Service>())
        .nest("/datasource", resource_router::<Datasource>())
        .nest("/training_resource", resource_router::<TrainingResource>())
        .nest(
            "/interoperability_record",
            resource_router::<InteroperabilityRecord>(),
        )
        .nest(
            "/resource_interoperability_record",
            resource_router::<ResourceInteroperabilityRecord>(),
        )
        .nest("/provider", providers::provider_router())
        .nest("/public", public::public_router())
}

async fn health() -> &'static str {
    "ok"
}
