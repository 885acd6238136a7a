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

//! Bundle bookkeeping metadata: who registered and last modified an entry,
//! accepted terms, and the published marker tying a bundle to its public
//! mirror copy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Caller;

/// Created/modified bookkeeping carried by every bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Display name of the registering user
    pub registered_by: String,
    /// When the bundle was first registered
    pub registered_at: DateTime<Utc>,
    /// Display name of the last modifying user
    pub modified_by: String,
    /// When the bundle was last modified
    pub modified_at: DateTime<Utc>,
    /// Emails of users who accepted the catalogue terms for this entry
    #[serde(default)]
    pub terms: Vec<String>,
    /// True only on public-mirror copies; the private original keeps false
    #[serde(default)]
    pub published: bool,
}

impl Metadata {
    /// Creates fresh metadata for a first registration.
    pub fn create(caller: &Caller) -> Self {
        let now = Utc::now();
        Metadata {
            registered_by: caller.full_name.clone(),
            registered_at: now,
            modified_by: caller.full_name.clone(),
            modified_at: now,
            terms: vec![caller.email.clone()],
            published: false,
        }
    }

    /// Stamps a modification, preserving registration fields and appending
    /// the caller to the accepted-terms list once.
    pub fn update(previous: &Metadata, caller: &Caller) -> Self {
        let mut metadata = previous.clone();
        metadata.modified_by = caller.full_name.clone();
        metadata.modified_at = Utc::now();
        if !metadata.terms.contains(&caller.email) {
            metadata.terms.push(caller.email.clone());
        }
        metadata
    }
}
