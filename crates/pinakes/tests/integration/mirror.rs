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

//! Public-mirror invariants against the running workers: the published
//! marker, access stripping, idempotent creation, and deletion
//! propagation.

use std::time::Duration;

use pinakes::store::FacetFilter;
use serial_test::serial;

use crate::fixtures::*;

#[tokio::test]
#[serial]
async fn published_marker_matches_mirror_presence() {
    let catalogue = test_catalogue(Duration::ZERO);
    seed_approved_provider(&catalogue, "prov-1").await;

    // the approved provider is mirrored, with published set only on the copy
    assert!(
        eventually(SYNC_WINDOW, || async {
            catalogue
                .provider_mirror
                .get_by_origin("pinakes", "prov-1")
                .await
                .map(|copy| copy.is_published())
                .unwrap_or(false)
        })
        .await,
        "approved provider never reached the mirror"
    );
    let original = catalogue.providers.get_bundle("prov-1").await.unwrap();
    assert!(!original.is_published());

    // a pending service has no copy and no published marker
    catalogue
        .services
        .add(service("svc-1", "prov-1"), &provider_user())
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(catalogue
        .service_mirror
        .get_by_origin("pinakes", "svc-1")
        .await
        .is_err());
}

#[tokio::test]
#[serial]
async fn mirror_copy_is_access_stripped() {
    let catalogue = test_catalogue(Duration::ZERO);
    seed_approved_provider(&catalogue, "prov-1").await;

    assert!(
        eventually(SYNC_WINDOW, || async {
            catalogue
                .provider_mirror
                .get_by_origin("pinakes", "prov-1")
                .await
                .is_ok()
        })
        .await
    );

    let copy = catalogue
        .provider_mirror
        .get_by_origin("pinakes", "prov-1")
        .await
        .unwrap();
    assert!(copy.payload.users.is_empty());
    assert!(copy.payload.main_contact.is_none());

    // the private original keeps its user list
    let original = catalogue.providers.get_bundle("prov-1").await.unwrap();
    assert_eq!(original.payload.users.len(), 1);
}

#[tokio::test]
#[serial]
async fn repeated_approval_yields_single_copy() {
    let catalogue = test_catalogue(Duration::from_millis(25));
    seed_approved_provider(&catalogue, "prov-1").await;
    catalogue
        .services
        .add(service("svc-1", "prov-1"), &provider_user())
        .await
        .unwrap();
    assert!(
        await_template_status(&catalogue, "prov-1", pinakes::models::TemplateStatus::Pending)
            .await
    );

    // approve, and approve again (a legal self-transition)
    catalogue
        .services
        .verify("svc-1", "approved resource", true, &admin())
        .await
        .unwrap();
    catalogue
        .services
        .verify("svc-1", "approved resource", true, &admin())
        .await
        .unwrap();

    assert!(
        eventually(SYNC_WINDOW, || async {
            catalogue
                .service_mirror
                .get_by_origin("pinakes", "svc-1")
                .await
                .is_ok()
        })
        .await
    );
    // give the second hook time to misbehave, then count
    tokio::time::sleep(Duration::from_millis(150)).await;
    let page = catalogue
        .service_mirror
        .get_all(&FacetFilter::new())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
}

#[tokio::test]
#[serial]
async fn deleting_unpublished_resource_is_quiet() {
    let catalogue = test_catalogue(Duration::ZERO);
    seed_approved_provider(&catalogue, "prov-1").await;
    catalogue
        .services
        .add(service("svc-1", "prov-1"), &provider_user())
        .await
        .unwrap();

    // never approved, so no mirror copy ever existed
    catalogue.services.delete("svc-1", &admin()).await.unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    let page = catalogue
        .service_mirror
        .get_all(&FacetFilter::new())
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
#[serial]
async fn rejection_after_approval_keeps_copy_in_sync() {
    let catalogue = test_catalogue(Duration::ZERO);
    seed_approved_provider(&catalogue, "prov-1").await;
    catalogue
        .services
        .add(service("svc-1", "prov-1"), &provider_user())
        .await
        .unwrap();
    assert!(
        await_template_status(&catalogue, "prov-1", pinakes::models::TemplateStatus::Pending)
            .await
    );
    catalogue
        .services
        .verify("svc-1", "approved resource", true, &admin())
        .await
        .unwrap();
    assert!(
        eventually(SYNC_WINDOW, || async {
            catalogue
                .service_mirror
                .get_by_origin("pinakes", "svc-1")
                .await
                .is_ok()
        })
        .await
    );

    // an audit-driven rejection updates the existing copy rather than
    // deleting it; the copy reflects the non-visible state
    catalogue
        .services
        .verify("svc-1", "rejected resource", false, &admin())
        .await
        .unwrap();
    assert!(
        eventually(SYNC_WINDOW, || async {
            catalogue
                .service_mirror
                .get_by_origin("pinakes", "svc-1")
                .await
                .map(|copy| {
                    copy.status.as_deref() == Some("rejected resource") && !copy.active
                })
                .unwrap_or(false)
        })
        .await,
        "rejection never reached the public copy"
    );
}
