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

//! Generic resource routes.
//!
//! One router template serves every resource kind; handlers are thin
//! adapters from HTTP to the generic manager.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use pinakes::error::CatalogueError;
use pinakes::manager::RichResource;
use pinakes::models::bundle::{Bundle, Payload};
use pinakes::models::logging_info::ActionType;
use pinakes::store::Paging;
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::{caller_from_headers, require_caller, ListParams};
use crate::state::{AppState, HasManager};

/// Query parameters of the update endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateParams {
    /// Free-text change comment, recorded in the audit trail
    pub comment: Option<String>,
}

/// Query parameters of the verify endpoint.
#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    /// Target status label, e.g. `"approved resource"`
    pub status: String,
    /// Activation to apply together with the decision
    #[serde(default)]
    pub active: bool,
}

/// Query parameters of the publish endpoint.
#[derive(Debug, Deserialize)]
pub struct PublishParams {
    /// Target activation flag
    pub active: bool,
}

/// Query parameters of the audit endpoint.
#[derive(Debug, Deserialize)]
pub struct AuditParams {
    /// Audit outcome, `"valid"` or `"invalid"`
    #[serde(alias = "actionType")]
    pub action_type: String,
    /// Free-text audit comment
    #[serde(default)]
    pub comment: Option<String>,
}

/// Query parameters of the suspend endpoint.
#[derive(Debug, Deserialize)]
pub struct SuspendParams {
    /// Whether to impose (true) or lift (false) the suspension
    pub suspend: bool,
}

/// Query parameters of the change-provider endpoint.
#[derive(Debug, Deserialize)]
pub struct ChangeProviderParams {
    /// The new owning provider
    #[serde(alias = "newProvider")]
    pub new_provider: String,
    /// Free-text move comment
    #[serde(default)]
    pub comment: Option<String>,
}

/// Builds the route set for one resource kind.
pub fn resource_router<P>() -> Router<AppState>
where
    P: Payload,
    AppState: HasManager<P>,
{
    Router::new()
        .route("/", post(add::<P>).put(update::<P>))
        .route("/all", get(get_all::<P>))
        .route("/{id}", get(get_one::<P>).delete(delete_one::<P>))
        .route("/{id}/rich", get(get_rich::<P>))
        .route("/verify/{id}", patch(verify::<P>))
        .route("/publish/{id}", patch(publish::<P>))
        .route("/audit/{id}", patch(audit::<P>))
        .route("/suspend/{id}", patch(suspend::<P>))
        .route("/change-provider/{id}", patch(change_provider::<P>))
        .route("/draft", post(add_draft::<P>))
        .route("/draft/{id}/transform", patch(transform_draft::<P>))
}

async fn add<P>(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<P>,
) -> Result<(StatusCode, Json<Bundle<P>>), ApiError>
where
    P: Payload,
    AppState: HasManager<P>,
{
    let caller = require_caller(&headers)?;
    let bundle = state.manager().add(Bundle::new(payload), &caller).await?;
    Ok((StatusCode::CREATED, Json(bundle)))
}

async fn update<P>(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<UpdateParams>,
    Json(payload): Json<P>,
) -> Result<Json<Bundle<P>>, ApiError>
where
    P: Payload,
    AppState: HasManager<P>,
{
    let caller = require_caller(&headers)?;
    let bundle = state
        .manager()
        .update(Bundle::new(payload), params.comment, &caller)
        .await?;
    Ok(Json(bundle))
}

async fn get_one<P>(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Bundle<P>>, ApiError>
where
    P: Payload,
    AppState: HasManager<P>,
{
    let caller = caller_from_headers(&headers);
    let bundle = state.manager().get(&id, caller.as_ref()).await?;
    Ok(Json(bundle))
}

async fn get_rich<P>(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<RichResource<P>>, ApiError>
where
    P: Payload,
    AppState: HasManager<P>,
{
    let caller = caller_from_headers(&headers);
    let rich = state.manager().get_rich(&id, caller.as_ref()).await?;
    Ok(Json(rich))
}

async fn get_all<P>(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<Paging<Bundle<P>>>, ApiError>
where
    P: Payload,
    AppState: HasManager<P>,
{
    let caller = caller_from_headers(&headers);
    let page = state
        .manager()
        .get_all(&params.to_filter(), caller.as_ref())
        .await?;
    Ok(Json(page))
}

async fn delete_one<P>(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
    P: Payload,
    AppState: HasManager<P>,
{
    let caller = require_caller(&headers)?;
    state.manager().delete(&id, &caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn verify<P>(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Query<VerifyParams>,
) -> Result<Json<Bundle<P>>, ApiError>
where
    P: Payload,
    AppState: HasManager<P>,
{
    let caller = require_caller(&headers)?;
    let bundle = state
        .manager()
        .verify(&id, &params.status, params.active, &caller)
        .await?;
    Ok(Json(bundle))
}

async fn publish<P>(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Query<PublishParams>,
) -> Result<Json<Bundle<P>>, ApiError>
where
    P: Payload,
    AppState: HasManager<P>,
{
    let caller = require_caller(&headers)?;
    let bundle = state.manager().publish(&id, params.active, &caller).await?;
    Ok(Json(bundle))
}

async fn audit<P>(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Query<AuditParams>,
) -> Result<Json<Bundle<P>>, ApiError>
where
    P: Payload,
    AppState: HasManager<P>,
{
    let caller = require_caller(&headers)?;
    let action = ActionType::parse(&params.action_type).ok_or_else(|| {
        ApiError(CatalogueError::validation(format!(
            "unknown audit action '{}'",
            params.action_type
        )))
    })?;
    let bundle = state
        .manager()
        .audit(&id, params.comment, action, &caller)
        .await?;
    Ok(Json(bundle))
}

async fn suspend<P>(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Query<SuspendParams>,
) -> Result<Json<Bundle<P>>, ApiError>
where
    P: Payload,
    AppState: HasManager<P>,
{
    let caller = require_caller(&headers)?;
    let bundle = state.manager().suspend(&id, params.suspend, &caller).await?;
    Ok(Json(bundle))
}

async fn change_provider<P>(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Query<ChangeProviderParams>,
) -> Result<Json<Bundle<P>>, ApiError>
where
    P: Payload,
    AppState: HasManager<P>,
{
    let caller = require_caller(&headers)?;
    let bundle = state
        .manager()
        .change_provider(&id, &params.new_provider, params.comment, &caller)
        .await?;
    Ok(Json(bundle))
}

async fn add_draft<P>(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<P>,
) -> Result<(StatusCode, Json<Bundle<P>>), ApiError>
where
    P: Payload,
    AppState: HasManager<P>,
{
    let caller = require_caller(&headers)?;
    let bundle = state
        .manager()
        .add_draft(Bundle::new(payload), &caller)
        .await?;
    Ok((StatusCode::CREATED, Json(bundle)))
}

async fn transform_draft<P>(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Bundle<P>>, ApiError>
where
    P: Payload,
    AppState: HasManager<P>,
{
    let caller = require_caller(&headers)?;
    let bundle = state.manager().transform_to_non_draft(&id, &caller).await?;
    Ok(Json(bundle))
}
