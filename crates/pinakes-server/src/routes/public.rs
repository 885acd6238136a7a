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

//! Public mirror routes: the read-only view of approved content. No
//! authentication, no write endpoints.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use pinakes::models::bundle::{Bundle, Payload};
use pinakes::models::payloads::{
    Datasource, InteroperabilityRecord, Provider, ResourceInteroperabilityRecord, Service,
    TrainingResource,
};
use pinakes::store::Paging;

use crate::error::ApiError;
use crate::extract::ListParams;
use crate::state::{AppState, HasManager};

/// Builds the read-only public route set for every kind.
pub fn public_router() -> Router<AppState> {
    Router::new()
        .nest("/service", mirror_router::<Service>())
        .nest("/datasource", mirror_router::<Datasource>())
        .nest("/training_resource", mirror_router::<TrainingResource>())
        .nest(
            "/interoperability_record",
            mirror_router::<InteroperabilityRecord>(),
        )
        .nest(
            "/resource_interoperability_record",
            mirror_router::<ResourceInteroperabilityRecord>(),
        )
        .route("/provider/all", get(get_all_public_providers))
        .route("/provider/{id}", get(get_public_provider))
}

fn mirror_router<P>() -> Router<AppState>
where
    P: Payload,
    AppState: HasManager<P>,
{
    Router::new()
        .route("/all", get(get_all_public::<P>))
        .route("/{id}", get(get_public::<P>))
}

async fn get_public<P>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Bundle<P>>, ApiError>
where
    P: Payload,
    AppState: HasManager<P>,
{
    let bundle = state.mirror().get(&id).await?;
    Ok(Json(bundle))
}

async fn get_all_public<P>(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Paging<Bundle<P>>>, ApiError>
where
    P: Payload,
    AppState: HasManager<P>,
{
    let page = state.mirror().get_all(&params.to_filter()).await?;
    Ok(Json(page))
}

async fn get_public_provider(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Bundle<Provider>>, ApiError> {
    let bundle = state.provider_mirror().get(&id).await?;
    Ok(Json(bundle))
}

async fn get_all_public_providers(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Paging<Bundle<Provider>>>, ApiError> {
    let page = state.provider_mirror().get_all(&params.to_filter()).await?;
    Ok(Json(page))
}
