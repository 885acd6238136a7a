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

//! Provider routes: the resource lifecycle plus provider-specific reads.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use pinakes::error::CatalogueError;
use pinakes::models::logging_info::ActionType;
use pinakes::models::payloads::Provider;
use pinakes::models::Bundle;
use pinakes::store::Paging;

use crate::error::ApiError;
use crate::extract::{caller_from_headers, require_caller, ListParams};
use crate::routes::resources::{
    AuditParams, PublishParams, SuspendParams, UpdateParams, VerifyParams,
};
use crate::state::AppState;

/// Builds the provider route set.
pub fn provider_router() -> Router<AppState> {
    Router::new()
        .route("/", post(add).put(update))
        .route("/all", get(get_all))
        .route("/{id}", get(get_one).delete(delete_one))
        .route("/verify/{id}", patch(verify))
        .route("/publish/{id}", patch(publish))
        .route("/audit/{id}", patch(audit))
        .route("/suspend/{id}", patch(suspend))
        .route("/draft", post(add_draft))
        .route("/draft/{id}/transform", patch(transform_draft))
}

async fn add(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<Provider>,
) -> Result<(StatusCode, Json<Bundle<Provider>>), ApiError> {
    let caller = require_caller(&headers)?;
    let bundle = state.providers().add(Bundle::new(payload), &caller).await?;
    Ok((StatusCode::CREATED, Json(bundle)))
}

async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<UpdateParams>,
    Json(payload): Json<Provider>,
) -> Result<Json<Bundle<Provider>>, ApiError> {
    let caller = require_caller(&headers)?;
    let bundle = state
        .providers()
        .update(Bundle::new(payload), params.comment, &caller)
        .await?;
    Ok(Json(bundle))
}

async fn get_one(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Bundle<Provider>>, ApiError> {
    let caller = caller_from_headers(&headers);
    let bundle = state.providers().get(&id, caller.as_ref()).await?;
    Ok(Json(bundle))
}

async fn get_all(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<Paging<Bundle<Provider>>>, ApiError> {
    let caller = caller_from_headers(&headers);
    let page = state
        .providers()
        .get_all(&params.to_filter(), caller.as_ref())
        .await?;
    Ok(Json(page))
}

async fn delete_one(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let caller = require_caller(&headers)?;
    state.providers().delete(&id, &caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn verify(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Query<VerifyParams>,
) -> Result<Json<Bundle<Provider>>, ApiError> {
    let caller = require_caller(&headers)?;
    let bundle = state
        .providers()
        .verify(&id, &params.status, params.active, &caller)
        .await?;
    Ok(Json(bundle))
}

async fn publish(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Query<PublishParams>,
) -> Result<Json<Bundle<Provider>>, ApiError> {
    let caller = require_caller(&headers)?;
    let bundle = state.providers().publish(&id, params.active, &caller).await?;
    Ok(Json(bundle))
}

async fn audit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Query<AuditParams>,
) -> Result<Json<Bundle<Provider>>, ApiError> {
    let caller = require_caller(&headers)?;
    let action = ActionType::parse(&params.action_type).ok_or_else(|| {
        ApiError(CatalogueError::validation(format!(
            "unknown audit action '{}'",
            params.action_type
        )))
    })?;
    let bundle = state
        .providers()
        .audit(&id, params.comment, action, &caller)
        .await?;
    Ok(Json(bundle))
}

async fn suspend(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Query<SuspendParams>,
) -> Result<Json<Bundle<Provider>>, ApiError> {
    let caller = require_caller(&headers)?;
    let bundle = state
        .providers()
        .suspend(&id, params.suspend, &caller)
        .await?;
    Ok(Json(bundle))
}

async fn add_draft(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<Provider>,
) -> Result<(StatusCode, Json<Bundle<Provider>>), ApiError> {
    let caller = require_caller(&headers)?;
    let bundle = state
        .providers()
        .add_draft(Bundle::new(payload), &caller)
        .await?;
    Ok((StatusCode::CREATED, Json(bundle)))
}

async fn transform_draft(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Bundle<Provider>>, ApiError> {
    let caller = require_caller(&headers)?;
    let bundle = state
        .providers()
        .transform_to_non_draft(&id, &caller)
        .await?;
    Ok(Json(bundle))
}
