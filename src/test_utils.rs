// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities: an in-memory Kubernetes API and a scripted credential source.

use crate::error::FetchError;
use crate::registry::{Credential, CredentialFetcher};
use crate::secret_string::SecretString;
use async_trait::async_trait;
use http::{Request, Response};
use http_body_util::BodyExt;
use k8s_openapi::api::core::v1::Namespace;
use kube::client::Body;
use kube::Client;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

#[derive(Default)]
struct State {
    /// Stored objects keyed by their full API path
    objects: HashMap<String, Value>,
    /// Injected failures keyed by (method, path)
    failures: HashMap<(String, String), u16>,
    /// Requests that never get an answer
    stalled: HashSet<(String, String)>,
    requests: Vec<(String, String)>,
}

impl State {
    fn handle(&mut self, method: &str, path: &str, body: &[u8]) -> (u16, String) {
        self.requests.push((method.to_string(), path.to_string()));

        if let Some(code) = self.failures.get(&(method.to_string(), path.to_string())) {
            return (*code, status_json(*code, reason(*code), "injected failure"));
        }

        match method {
            "GET" => match self.objects.get(path) {
                Some(obj) => (200, obj.to_string()),
                None => (404, status_json(404, "NotFound", &format!("{} not found", path))),
            },
            "POST" => {
                let obj: Value = match serde_json::from_slice(body) {
                    Ok(v) => v,
                    Err(e) => return (400, status_json(400, "BadRequest", &e.to_string())),
                };
                let Some(name) = obj["metadata"]["name"].as_str() else {
                    return (422, status_json(422, "Invalid", "metadata.name is required"));
                };
                let key = format!("{}/{}", path, name);
                if self.objects.contains_key(&key) {
                    return (409, status_json(409, "AlreadyExists", &format!("{} exists", key)));
                }
                self.objects.insert(key, obj.clone());
                (201, obj.to_string())
            }
            "PUT" => {
                if !self.objects.contains_key(path) {
                    return (404, status_json(404, "NotFound", &format!("{} not found", path)));
                }
                let obj: Value = match serde_json::from_slice(body) {
                    Ok(v) => v,
                    Err(e) => return (400, status_json(400, "BadRequest", &e.to_string())),
                };
                self.objects.insert(path.to_string(), obj.clone());
                (200, obj.to_string())
            }
            _ => (405, status_json(405, "MethodNotAllowed", method)),
        }
    }
}

fn reason(code: u16) -> &'static str {
    match code {
        403 => "Forbidden",
        404 => "NotFound",
        409 => "Conflict",
        500 => "InternalError",
        _ => "Unknown",
    }
}

/// A stateful fake API server for core/v1 objects. POST creates under
/// `<path>/<metadata.name>`, GET and PUT operate on the exact path.
#[derive(Clone, Default)]
pub struct FakeApiServer {
    state: Arc<Mutex<State>>,
}

impl FakeApiServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object at an API path
    pub fn seed(&self, path: &str, obj: Value) {
        self.state.lock().unwrap().objects.insert(path.to_string(), obj);
    }

    pub fn object(&self, path: &str) -> Option<Value> {
        self.state.lock().unwrap().objects.get(path).cloned()
    }

    /// Answer every `method` request on `path` with the given status code
    pub fn fail(&self, method: &str, path: &str, code: u16) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert((method.to_string(), path.to_string()), code);
    }

    /// Leave every `method` request on `path` unanswered
    pub fn stall(&self, method: &str, path: &str) {
        self.state
            .lock()
            .unwrap()
            .stalled
            .insert((method.to_string(), path.to_string()));
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Number of `method` requests on exactly `path`
    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|(m, p)| m == method && p == path)
            .count()
    }

    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }
}

impl Service<Request<Body>> for FakeApiServer {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let state = self.state.clone();

        Box::pin(async move {
            let method = req.method().to_string();
            let path = req.uri().path().to_string();
            let body = req.into_body().collect().await?.to_bytes();

            let stalled = {
                let mut state = state.lock().unwrap();
                if state.stalled.contains(&(method.clone(), path.clone())) {
                    state.requests.push((method.clone(), path.clone()));
                    true
                } else {
                    false
                }
            };
            if stalled {
                std::future::pending::<()>().await;
            }

            let (status, body) = state.lock().unwrap().handle(&method, &path, &body);

            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// A Kubernetes Status response body
pub fn status_json(code: u16, reason: &str, message: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}

/// A default service account with the given pull secret references
pub fn service_account_json(namespace: &str, pull_secrets: &[&str]) -> Value {
    let refs: Vec<Value> = pull_secrets
        .iter()
        .map(|name| serde_json::json!({ "name": name }))
        .collect();

    serde_json::json!({
        "apiVersion": "v1",
        "kind": "ServiceAccount",
        "metadata": {
            "name": "default",
            "namespace": namespace
        },
        "imagePullSecrets": refs
    })
}

pub fn namespace(name: &str) -> Namespace {
    serde_json::from_value(serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": { "name": name, "uid": format!("uid-{}", name) }
    }))
    .unwrap()
}

/// A namespace that is being torn down
pub fn terminating_namespace(name: &str) -> Namespace {
    serde_json::from_value(serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "uid": format!("uid-{}", name),
            "deletionTimestamp": "2026-01-01T00:00:00Z"
        },
        "status": { "phase": "Terminating" }
    }))
    .unwrap()
}

/// Credential source returning a fixed answer and counting calls
pub struct ScriptedFetcher {
    result: Mutex<Result<Credential, FetchError>>,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn returning(endpoint: &str, token: &str) -> Arc<Self> {
        Arc::new(Self {
            result: Mutex::new(Ok(Credential {
                endpoint: endpoint.to_string(),
                auth_token: SecretString::new(token.to_string()),
            })),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(error: FetchError) -> Arc<Self> {
        Arc::new(Self {
            result: Mutex::new(Err(error)),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialFetcher for ScriptedFetcher {
    async fn fetch(&self, _region: &str) -> Result<Credential, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.lock().unwrap().clone()
    }
}
