// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses and backend clients.

use crate::error::{OutpostError, Result};
use crate::store::{BackendWatch, ClientGetter, ResourceClient, ResourceEvent, WatchOptions};
use crate::types::object::{get_str, put_value};
use crate::types::{ApiRequest, Data, Schema};
use async_trait::async_trait;
use futures::channel::mpsc::UnboundedReceiver;
use http::{Request, Response};
use kube::client::Body;
use kube::Client;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::sync::Barrier;
use tokio_util::sync::CancellationToken;
use tower::Service;

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Add a response for POST requests matching the exact path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PUT", path, status, body)
    }

    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.on("DELETE", path, status, body)
    }

    /// Method and path of every request received so far
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let responses = self.responses.lock().unwrap();

        // Try exact match first
        if let Some(resp) = responses.get(&(method.to_string(), path.to_string())) {
            return Some(resp.clone());
        }

        // Try prefix match for paths like /api/v1/namespaces/foo
        for ((m, p), resp) in responses.iter() {
            if m == method && path.starts_with(p) {
                return Some(resp.clone());
            }
        }

        None
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        self.requests
            .lock()
            .unwrap()
            .push((method.clone(), path.clone()));
        let response = self.find_response(&method, &path);

        Box::pin(async move {
            let (status, body) = response.unwrap_or_else(|| (404, not_found_json("resource", &path)));
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a Kubernetes Status failure body
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

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    status_json(404, "NotFound", &format!("{} \"{}\" not found", resource, name))
}

/// Turn a JSON literal into an object
pub fn object(value: serde_json::Value) -> Data {
    value.as_object().cloned().expect("test object must be a JSON object")
}

/// In-memory resource client for a single namespace.
#[derive(Default)]
pub struct FakeBackend {
    objects: Mutex<BTreeMap<String, Data>>,
    calls: Mutex<Vec<String>>,
    created: Mutex<Vec<Data>>,
    updates: Mutex<Vec<Data>>,
    update_errors: Mutex<VecDeque<OutpostError>>,
    list_error: Mutex<Option<String>>,
    list_barrier: Mutex<Option<Arc<Barrier>>>,
    keep_on_delete: Mutex<bool>,
    watch_events: Mutex<Option<UnboundedReceiver<Result<ResourceEvent>>>>,
    watch_options: Mutex<Option<WatchOptions>>,
    watch_stopper: Mutex<Option<CancellationToken>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_objects(objects: Vec<Data>) -> Arc<Self> {
        let backend = Self::default();
        {
            let mut stored = backend.objects.lock().unwrap();
            for obj in objects {
                let name = get_str(&obj, &["metadata", "name"]).unwrap_or_default().to_string();
                stored.insert(name, obj);
            }
        }
        Arc::new(backend)
    }

    pub fn fail_list(&self, message: &str) {
        *self.list_error.lock().unwrap() = Some(message.to_string());
    }

    /// `list` blocks until every party of `barrier` has arrived.
    pub fn hold_list_at(&self, barrier: Arc<Barrier>) {
        *self.list_barrier.lock().unwrap() = Some(barrier);
    }

    pub fn fail_updates_with_conflict(&self, times: usize) {
        let mut errors = self.update_errors.lock().unwrap();
        for _ in 0..times {
            errors.push_back(OutpostError::Conflict(
                "the object has been modified; please apply your changes to the latest version"
                    .to_string(),
            ));
        }
    }

    pub fn fail_next_update(&self, err: OutpostError) {
        self.update_errors.lock().unwrap().push_back(err);
    }

    /// Deleted objects stay readable, as with pending finalizers.
    pub fn keep_on_delete(&self) {
        *self.keep_on_delete.lock().unwrap() = true;
    }

    pub fn set_watch(&self, events: UnboundedReceiver<Result<ResourceEvent>>) {
        *self.watch_events.lock().unwrap() = Some(events);
    }

    pub fn watch_options(&self) -> Option<WatchOptions> {
        self.watch_options.lock().unwrap().clone()
    }

    pub fn watch_stopper(&self) -> Option<CancellationToken> {
        self.watch_stopper.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<Data> {
        self.created.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<Data> {
        self.updates.lock().unwrap().clone()
    }

    pub fn count_calls(&self, op: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.as_str() == op)
            .count()
    }

    fn record(&self, op: &str) {
        self.calls.lock().unwrap().push(op.to_string());
    }

    fn not_found(name: &str) -> OutpostError {
        OutpostError::NotFound(format!("widgets \"{}\" not found", name))
    }

    fn bump_version(data: &mut Data, current: Option<&Data>) {
        let version = current
            .and_then(|c| get_str(c, &["metadata", "resourceVersion"]))
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);
        put_value(data, (version + 1).to_string(), &["metadata", "resourceVersion"]);
    }
}

#[async_trait]
impl ResourceClient for FakeBackend {
    async fn get(&self, name: &str) -> Result<Data> {
        self.record("get");
        self.objects
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| Self::not_found(name))
    }

    async fn list(&self) -> Result<Vec<Data>> {
        self.record("list");
        let barrier = self.list_barrier.lock().unwrap().clone();
        if let Some(barrier) = barrier {
            barrier.wait().await;
        }
        if let Some(message) = self.list_error.lock().unwrap().clone() {
            return Err(OutpostError::Backend(message));
        }
        Ok(self.objects.lock().unwrap().values().cloned().collect())
    }

    async fn watch(&self, opts: &WatchOptions) -> Result<BackendWatch> {
        self.record("watch");
        *self.watch_options.lock().unwrap() = Some(opts.clone());
        let events = self
            .watch_events
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| OutpostError::Backend("no watch prepared".to_string()))?;
        let watch = BackendWatch::new(events);
        *self.watch_stopper.lock().unwrap() = Some(watch.stopper());
        Ok(watch)
    }

    async fn create(&self, mut data: Data) -> Result<Data> {
        self.record("create");
        self.created.lock().unwrap().push(data.clone());
        Self::bump_version(&mut data, None);
        let name = get_str(&data, &["metadata", "name"])
            .unwrap_or_default()
            .to_string();
        self.objects.lock().unwrap().insert(name, data.clone());
        Ok(data)
    }

    async fn update(&self, mut data: Data) -> Result<Data> {
        self.record("update");
        self.updates.lock().unwrap().push(data.clone());
        if let Some(err) = self.update_errors.lock().unwrap().pop_front() {
            return Err(err);
        }
        let name = get_str(&data, &["metadata", "name"])
            .unwrap_or_default()
            .to_string();
        let mut objects = self.objects.lock().unwrap();
        Self::bump_version(&mut data, objects.get(&name));
        objects.insert(name, data.clone());
        Ok(data)
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.record("delete");
        let mut objects = self.objects.lock().unwrap();
        if !objects.contains_key(name) {
            return Err(Self::not_found(name));
        }
        if !*self.keep_on_delete.lock().unwrap() {
            objects.remove(name);
        }
        Ok(())
    }
}

/// Hands out a [`FakeBackend`] per request namespace. Requests spanning no
/// namespace use the `""` entry.
#[derive(Default)]
pub struct FakeClientGetter {
    backends: HashMap<String, Arc<FakeBackend>>,
}

impl FakeClientGetter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(namespace: &str, backend: Arc<FakeBackend>) -> Self {
        Self::new().with_namespace(namespace, backend)
    }

    pub fn with_namespace(mut self, namespace: &str, backend: Arc<FakeBackend>) -> Self {
        self.backends.insert(namespace.to_string(), backend);
        self
    }
}

impl ClientGetter for FakeClientGetter {
    fn client(&self, req: &ApiRequest, _schema: &Schema) -> Result<Arc<dyn ResourceClient>> {
        let namespace = req.namespaces.first().map(String::as_str).unwrap_or("");
        self.backends
            .get(namespace)
            .cloned()
            .map(|b| b as Arc<dyn ResourceClient>)
            .ok_or_else(|| OutpostError::Backend(format!("no backend for namespace {}", namespace)))
    }
}
