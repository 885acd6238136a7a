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

//! HTTP surface tests, driving the router in-process.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pinakes::config::CatalogueConfig;
use pinakes_server::config::ServerConfig;
use pinakes_server::state::AppState;
use serde_json::{json, Value};
use tower::util::ServiceExt;

fn test_app() -> Router {
    let (state, _workers) = AppState::build(CatalogueConfig::default());
    pinakes_server::app(state, &ServerConfig::default())
}

fn admin_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-user-email", "admin@catalogue.org")
        .header("x-user-name", "Admin")
        .header("x-user-roles", "ROLE_ADMIN");
    match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn provider_payload(id: &str) -> Value {
    json!({
        "id": id,
        "catalogue_id": "",
        "name": "Example Provider",
        "users": [{"email": "jane@provider.org", "full_name": "Jane Doe"}]
    })
}

#[tokio::test]
async fn health_is_public() {
    let app = test_app();
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn writes_require_authentication() {
    let app = test_app();
    let request = Request::post("/provider")
        .header("content-type", "application/json")
        .body(Body::from(provider_payload("prov-1").to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn provider_onboarding_flow() {
    let app = test_app();

    // register
    let response = app
        .clone()
        .oneshot(admin_request(
            "POST",
            "/provider",
            Some(provider_payload("prov-1")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["status"], "pending provider");
    assert_eq!(body["active"], false);

    // approve
    let response = app
        .clone()
        .oneshot(admin_request(
            "PATCH",
            "/provider/verify/prov-1?status=approved%20provider&active=true",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "approved provider");
    assert_eq!(body["active"], true);

    // anonymous read of the approved provider works
    let response = app
        .clone()
        .oneshot(Request::get("/provider/prov-1").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn pending_resources_hidden_from_anonymous_listings() {
    let app = test_app();
    app.clone()
        .oneshot(admin_request(
            "POST",
            "/provider",
            Some(provider_payload("prov-1")),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(admin_request(
            "POST",
            "/service",
            Some(json!({
                "id": "svc-1",
                "catalogue_id": "",
                "name": "Compute",
                "resource_organisation": "prov-1"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // anonymous listing is empty while the service is pending
    let response = app
        .clone()
        .oneshot(Request::get("/service/all").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["total"], 0);

    // the admin sees it
    let response = app
        .clone()
        .oneshot(admin_request("GET", "/service/all", None))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn verify_with_wrong_vocabulary_is_bad_request() {
    let app = test_app();
    app.clone()
        .oneshot(admin_request(
            "POST",
            "/provider",
            Some(provider_payload("prov-1")),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(admin_request(
            "PATCH",
            "/provider/verify/prov-1?status=approved%20resource&active=true",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_resource_is_not_found() {
    let app = test_app();
    let response = app
        .oneshot(admin_request("GET", "/service/nope", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_returns_no_content() {
    let app = test_app();
    app.clone()
        .oneshot(admin_request(
            "POST",
            "/provider",
            Some(provider_payload("prov-1")),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(admin_request("DELETE", "/provider/prov-1", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(admin_request("GET", "/provider/prov-1", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
