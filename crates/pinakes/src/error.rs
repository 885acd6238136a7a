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

//! Error types for catalogue operations.
//!
//! Validation and not-found errors from the primary write path propagate to
//! the caller unmodified. Errors raised inside synchronization hooks are
//! caught and logged at the worker boundary and never fail the triggering
//! write.

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during catalogue operations.
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// Bad input or an invariant violation (HTTP 400)
    #[error("validation failed: {reason}")]
    Validation { reason: String },

    /// The requested resource does not exist (HTTP 404)
    #[error("{resource_type} with id '{id}' was not found")]
    NotFound { resource_type: String, id: String },

    /// A resource with the same id already exists (HTTP 409)
    #[error("{resource_type} with id '{id}' already exists")]
    AlreadyExists { resource_type: String, id: String },

    /// The operation conflicts with the current state (HTTP 409)
    #[error("conflict: {reason}")]
    Conflict { reason: String },

    /// The resource existed but has been removed (HTTP 410)
    #[error("{resource_type} with id '{id}' is gone")]
    Gone { resource_type: String, id: String },

    /// The caller is not allowed to perform the operation (HTTP 403)
    #[error("access denied: {reason}")]
    AccessDenied { reason: String },

    /// Document store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Document (de)serialization failure
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal invariant broke
    #[error("internal error: {0}")]
    Internal(String),
}

impl CatalogueError {
    /// Builds a [`CatalogueError::Validation`] from any displayable reason.
    pub fn validation(reason: impl Into<String>) -> Self {
        CatalogueError::Validation {
            reason: reason.into(),
        }
    }

    /// Builds a [`CatalogueError::NotFound`] for a resource type / id pair.
    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        CatalogueError::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Builds a [`CatalogueError::AccessDenied`] from any displayable reason.
    pub fn access_denied(reason: impl Into<String>) -> Self {
        CatalogueError::AccessDenied {
            reason: reason.into(),
        }
    }

    /// Builds a [`CatalogueError::Conflict`] from any displayable reason.
    pub fn conflict(reason: impl Into<String>) -> Self {
        CatalogueError::Conflict {
            reason: reason.into(),
        }
    }
}
