//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for building and sending interactions through the full
//! axum router over the in-memory stores.
#![allow(dead_code)]

use std::collections::HashMap;

use axum::body::Body;
use axum::http::{self, Method, Request, Response};
use axum::Router;
use fc_bot::api::{create_router, AppState};
use fc_bot::config::Config;
use fc_bot::friendcode::Stores;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

pub struct TestApp {
    pub router: Router,
    pub stores: Stores,
}

impl TestApp {
    /// Create a test app with the default test config.
    pub fn new() -> Self {
        Self::with_config(Config::default_for_test())
    }

    /// Create a test app with a custom config.
    pub fn with_config(config: Config) -> Self {
        let stores = Stores::in_memory();
        let state = AppState::new(stores.clone(), config, None);
        Self {
            router: create_router(state),
            stores,
        }
    }

    /// Build an HTTP request with the given method and URI.
    pub fn request(method: Method, uri: &str) -> http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    /// Send a request through the router via `tower::ServiceExt::oneshot`.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot request failed")
    }

    /// Post an interaction and return the reply list.
    pub async fn interact(&self, interaction: Value) -> Vec<Value> {
        let request = Self::request(Method::POST, "/interactions")
            .header("content-type", "application/json")
            .body(Body::from(interaction.to_string()))
            .expect("failed to build request");

        let response = self.oneshot(request).await;
        assert_eq!(response.status(), 200);

        let body = body_to_json(response).await;
        body["replies"]
            .as_array()
            .cloned()
            .expect("response has no replies")
    }
}

/// A chat user as the dispatcher describes them.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub name: String,
}

impl TestUser {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
        }
    }

    pub fn json(&self) -> Value {
        json!({ "id": self.id, "display_name": self.name })
    }
}

/// A guild as the dispatcher describes it.
#[derive(Debug, Clone)]
pub struct TestGuild {
    pub id: Uuid,
    pub name: String,
    pub owner: Uuid,
    pub members: HashMap<Uuid, String>,
}

impl TestGuild {
    pub fn new(name: &str, owner: &TestUser, members: &[&TestUser]) -> Self {
        let mut directory: HashMap<Uuid, String> = members
            .iter()
            .map(|m| (m.id, m.name.clone()))
            .collect();
        directory.insert(owner.id, owner.name.clone());
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            owner: owner.id,
            members: directory,
        }
    }

    pub fn json(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "owner_id": self.owner,
            "members": self.members,
        })
    }
}

/// Build an interaction payload.
pub fn interaction(
    user: &TestUser,
    guild: Option<&TestGuild>,
    subcommand: Option<&str>,
    args: &[&str],
    target: Option<&TestUser>,
) -> Value {
    json!({
        "interaction_id": Uuid::new_v4(),
        "user": user.json(),
        "guild": guild.map(TestGuild::json),
        "subcommand": subcommand,
        "args": args,
        "target": target.map(TestUser::json),
    })
}

/// Collect a response body as JSON.
pub async fn body_to_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is not JSON")
}
