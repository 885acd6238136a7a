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

//! Maps catalogue errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pinakes::error::CatalogueError;

/// Wrapper turning a [`CatalogueError`] into an HTTP response.
pub struct ApiError(pub CatalogueError);

impl From<CatalogueError> for ApiError {
    fn from(error: CatalogueError) -> Self {
        ApiError(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CatalogueError::Validation { .. } => StatusCode::BAD_REQUEST,
            CatalogueError::NotFound { .. } => StatusCode::NOT_FOUND,
            CatalogueError::AlreadyExists { .. } | CatalogueError::Conflict { .. } => {
                StatusCode::CONFLICT
            }
            CatalogueError::Gone { .. } => StatusCode::GONE,
            CatalogueError::AccessDenied { .. } => StatusCode::FORBIDDEN,
            CatalogueError::Store(_)
            | CatalogueError::Serialization(_)
            | CatalogueError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}
