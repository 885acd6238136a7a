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

//! Read-after-write visibility wait.
//!
//! The document store's search index is only eventually consistent with
//! writes. Hooks that make decisions based on search results (like "does a
//! public copy already exist") first wait until the document they just saw
//! committed is actually searchable, polling with exponential backoff and
//! jitter under a bounded deadline. On exhaustion a warning is logged and
//! the caller proceeds with the last observed answer — bounded staleness
//! is the documented guarantee.

use std::time::Instant;

use rand::Rng;

use crate::config::SyncConfig;
use crate::store::{DocumentStore, FacetFilter};

/// Waits until the document is visible to `search`, or the configured
/// deadline expires. Returns whether visibility was confirmed.
pub async fn await_searchable<S: DocumentStore>(
    store: &S,
    resource_type: &str,
    id: &str,
    config: &SyncConfig,
) -> bool {
    let deadline = Instant::now() + config.visibility_deadline;
    let filter = FacetFilter::new().with_filter("id", id).with_paging(0, 1);
    let mut backoff = config.visibility_initial_backoff;
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        match store.search(resource_type, &filter).await {
            Ok(page) if page.total > 0 => {
                tracing::debug!(resource_type, id, attempts, "document searchable");
                return true;
            }
            Ok(_) => {}
            Err(error) => {
                tracing::warn!(resource_type, id, error = %error, "visibility probe failed");
            }
        }

        if Instant::now() + backoff > deadline {
            tracing::warn!(
                resource_type,
                id,
                attempts,
                deadline_ms = config.visibility_deadline.as_millis() as u64,
                "document did not become searchable within the deadline"
            );
            return false;
        }

        // full jitter keeps concurrent hooks from probing in lockstep
        let jittered = rand::thread_rng().gen_range(backoff / 2..=backoff);
        tokio::time::sleep(jittered).await;
        backoff = (backoff * 2).min(config.visibility_max_backoff);
    }
}
