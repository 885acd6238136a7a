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

//! Request parsing helpers: caller identity from claim headers and list
//! query parameters into facet filters.

use axum::http::HeaderMap;
use pinakes::auth::{Caller, Role};
use pinakes::error::CatalogueError;
use pinakes::store::{FacetFilter, SortOrder};
use serde::Deserialize;

use crate::error::ApiError;

/// Reads the authenticated caller from the gateway-provided claim
/// headers. Returns `None` for anonymous requests.
pub fn caller_from_headers(headers: &HeaderMap) -> Option<Caller> {
    let email = headers.get("x-user-email")?.to_str().ok()?.to_string();
    let full_name = headers
        .get("x-user-name")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let roles: Vec<Role> = headers
        .get("x-user-roles")
        .and_then(|value| value.to_str().ok())
        .map(|raw| raw.split(',').filter_map(|s| Role::parse(s.trim())).collect())
        .unwrap_or_default();
    Some(Caller {
        email,
        full_name,
        roles: if roles.is_empty() {
            vec![Role::User]
        } else {
            roles
        },
    })
}

/// Like [`caller_from_headers`], but anonymous requests are an error.
pub fn require_caller(headers: &HeaderMap) -> Result<Caller, ApiError> {
    caller_from_headers(headers).ok_or_else(|| {
        ApiError(CatalogueError::access_denied(
            "this operation requires authentication",
        ))
    })
}

/// Browse/search query parameters shared by every listing endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListParams {
    /// Free-text keyword
    pub query: Option<String>,
    /// Offset of the first result
    pub from: Option<usize>,
    /// Page size
    pub quantity: Option<usize>,
    /// Sort direction, `asc` or `desc`
    pub order: Option<String>,
    /// Field to sort on
    #[serde(alias = "orderField")]
    pub order_field: Option<String>,
    /// Restrict to one catalogue
    pub catalogue_id: Option<String>,
    /// Restrict by activation flag
    pub active: Option<bool>,
    /// Restrict by suspension flag
    pub suspended: Option<bool>,
    /// Restrict by status label
    pub status: Option<String>,
}

impl ListParams {
    /// Builds the store filter these parameters describe.
    pub fn to_filter(&self) -> FacetFilter {
        let mut filter = FacetFilter::new();
        if let Some(query) = &self.query {
            filter = filter.with_keyword(query.clone());
        }
        filter = filter.with_paging(
            self.from.unwrap_or(0),
            self.quantity
                .unwrap_or(pinakes::store::facet::DEFAULT_QUANTITY),
        );
        if let Some(field) = &self.order_field {
            let order = match self.order.as_deref() {
                Some("desc") => SortOrder::Desc,
                _ => SortOrder::Asc,
            };
            filter = filter.with_order(field.clone(), order);
        }
        if let Some(catalogue_id) = &self.catalogue_id {
            filter = filter.with_filter("catalogue_id", catalogue_id.clone());
        }
        if let Some(active) = self.active {
            filter = filter.with_filter("active", active.to_string());
        }
        if let Some(suspended) = self.suspended {
            filter = filter.with_filter("suspended", suspended.to_string());
        }
        if let Some(status) = &self.status {
            filter = filter.with_filter("status", status.clone());
        }
        filter
    }
}
