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

//! End-to-end lifecycle tests: registration, moderation, the provider
//! template aggregate, and the full add → verify → update → delete
//! scenario against the running synchronization workers.

use std::time::Duration;

use pinakes::models::{ActionType, LoggingInfoType, TemplateStatus};
use serial_test::serial;

use crate::fixtures::*;

#[tokio::test]
#[serial]
async fn full_publication_scenario() {
    let catalogue = test_catalogue(Duration::from_millis(30));
    seed_approved_provider(&catalogue, "prov-1").await;

    // add: pending and inactive
    let bundle = catalogue
        .services
        .add(service("svc-1", "prov-1"), &provider_user())
        .await
        .unwrap();
    assert_eq!(bundle.status.as_deref(), Some("pending resource"));
    assert!(!bundle.active);

    // no public copy while pending
    assert!(catalogue
        .service_mirror
        .get_by_origin("pinakes", "svc-1")
        .await
        .is_err());

    // let the template hook finish before moderating further
    assert!(await_template_status(&catalogue, "prov-1", TemplateStatus::Pending).await);

    // approve: exactly one onboard/approved entry appended
    let bundle = catalogue
        .services
        .verify("svc-1", "approved resource", true, &admin())
        .await
        .unwrap();
    assert!(bundle.active);
    let approvals = bundle
        .logging_info
        .iter()
        .filter(|entry| {
            entry.info_type == LoggingInfoType::Onboard
                && entry.action_type == ActionType::Approved
        })
        .count();
    assert_eq!(approvals, 1);

    // the public copy appears, with the same payload name
    assert!(
        eventually(SYNC_WINDOW, || async {
            catalogue
                .service_mirror
                .get_by_origin("pinakes", "svc-1")
                .await
                .map(|copy| copy.payload.name == "Compute Service" && copy.is_published())
                .unwrap_or(false)
        })
        .await,
        "public copy never appeared"
    );

    // update: the copy eventually reflects the new payload
    let mut edited = service("svc-1", "prov-1");
    edited.payload.name = "Compute Service v2".to_string();
    catalogue
        .services
        .update(edited, Some("rename".to_string()), &provider_user())
        .await
        .unwrap();
    assert!(
        eventually(SYNC_WINDOW, || async {
            catalogue
                .service_mirror
                .get_by_origin("pinakes", "svc-1")
                .await
                .map(|copy| copy.payload.name == "Compute Service v2")
                .unwrap_or(false)
        })
        .await,
        "public copy never caught up with the update"
    );

    // delete: the copy disappears
    catalogue.services.delete("svc-1", &admin()).await.unwrap();
    assert!(
        eventually(SYNC_WINDOW, || async {
            catalogue
                .service_mirror
                .get_by_origin("pinakes", "svc-1")
                .await
                .is_err()
        })
        .await,
        "public copy survived deletion"
    );
}

#[tokio::test]
#[serial]
async fn first_resource_moves_template_to_pending_exactly_once() {
    let catalogue = test_catalogue(Duration::ZERO);
    seed_approved_provider(&catalogue, "prov-1").await;

    let before = catalogue.providers.get_bundle("prov-1").await.unwrap();
    assert_eq!(before.payload.template_status, TemplateStatus::NoTemplate);

    // several resources land concurrently; the template must end up
    // pending without bouncing through any other state
    let user = provider_user();
    let (a, b, c) = tokio::join!(
        catalogue
            .services
            .add(service("svc-a", "prov-1"), &user),
        catalogue
            .services
            .add(service("svc-b", "prov-1"), &user),
        catalogue
            .services
            .add(service("svc-c", "prov-1"), &user),
    );
    a.unwrap();
    b.unwrap();
    c.unwrap();

    assert!(
        eventually(SYNC_WINDOW, || async {
            catalogue
                .providers
                .get_bundle("prov-1")
                .await
                .map(|p| p.payload.template_status == TemplateStatus::Pending)
                .unwrap_or(false)
        })
        .await,
        "template status never became pending"
    );
}

#[tokio::test]
#[serial]
async fn draft_promotion_enters_moderation() {
    let catalogue = test_catalogue(Duration::ZERO);
    seed_approved_provider(&catalogue, "prov-1").await;

    let draft = catalogue
        .services
        .add_draft(service("svc-draft", "prov-1"), &provider_user())
        .await
        .unwrap();
    assert!(draft.draft);
    assert_eq!(draft.status, None);

    let bundle = catalogue
        .services
        .transform_to_non_draft("svc-draft", &provider_user())
        .await
        .unwrap();
    assert_eq!(bundle.status.as_deref(), Some("pending resource"));
    assert_eq!(
        bundle.logging_info.last().unwrap().action_type,
        ActionType::Registered
    );

    // promotion counts as the provider's first submission
    assert!(
        eventually(SYNC_WINDOW, || async {
            catalogue
                .providers
                .get_bundle("prov-1")
                .await
                .map(|p| p.payload.template_status == TemplateStatus::Pending)
                .unwrap_or(false)
        })
        .await,
        "draft promotion did not reach the provider template"
    );
}

#[tokio::test]
#[serial]
async fn provider_suspension_cascades_to_resources() {
    let catalogue = test_catalogue(Duration::ZERO);
    seed_approved_provider(&catalogue, "prov-1").await;
    catalogue
        .services
        .add(service("svc-1", "prov-1"), &provider_user())
        .await
        .unwrap();

    catalogue
        .providers
        .suspend("prov-1", true, &admin())
        .await
        .unwrap();

    assert!(
        eventually(SYNC_WINDOW, || async {
            catalogue
                .services
                .get("svc-1", Some(&admin()))
                .await
                .map(|bundle| bundle.suspended)
                .unwrap_or(false)
        })
        .await,
        "suspension never reached the provider's resources"
    );
}
