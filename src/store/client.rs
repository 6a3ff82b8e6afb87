// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Backend client capability used by the proxy store.

use crate::error::Result;
use crate::types::{ApiRequest, Data, Schema};
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Resolves a backend client scoped to the schema's resource type and the
/// request's namespace.
pub trait ClientGetter: Send + Sync {
    fn client(&self, req: &ApiRequest, schema: &Schema) -> Result<Arc<dyn ResourceClient>>;
}

/// Per-resource backend client. Errors are returned unchanged, including
/// conflicts and not-found.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    async fn get(&self, name: &str) -> Result<Data>;

    async fn list(&self) -> Result<Vec<Data>>;

    async fn watch(&self, opts: &WatchOptions) -> Result<BackendWatch>;

    async fn create(&self, data: Data) -> Result<Data>;

    async fn update(&self, data: Data) -> Result<Data>;

    async fn delete(&self, name: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchOptions {
    /// Position to start from; `"0"` means from now without replaying history.
    pub resource_version: String,
    /// Session timeout enforced by the backend.
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Added,
    Modified,
    Deleted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceEvent {
    pub event_type: EventType,
    pub object: Data,
}

impl ResourceEvent {
    pub fn new(event_type: EventType, object: Data) -> Self {
        Self { event_type, object }
    }
}

/// An open backend watch: its event stream and the signal that stops it.
///
/// Stopping ends the event stream, after which no more events are produced.
pub struct BackendWatch {
    events: BoxStream<'static, Result<ResourceEvent>>,
    stop: CancellationToken,
}

impl BackendWatch {
    pub fn new<S>(events: S) -> Self
    where
        S: Stream<Item = Result<ResourceEvent>> + Send + 'static,
    {
        let stop = CancellationToken::new();
        let events = events.take_until(stop.clone().cancelled_owned()).boxed();
        Self { events, stop }
    }

    pub fn stopper(&self) -> CancellationToken {
        self.stop.clone()
    }

    pub fn into_parts(self) -> (BoxStream<'static, Result<ResourceEvent>>, CancellationToken) {
        (self.events, self.stop)
    }
}
