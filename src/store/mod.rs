// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Uniform CRUD and watch operations over schemas.

pub mod client;
pub mod errors;
pub mod merge;
pub mod proxy;

use crate::error::Result;
use crate::types::{ApiObject, ApiObjectList, ApiRequest, Schema};
use async_trait::async_trait;
use tokio::sync::{mpsc, watch};

pub use client::{
    BackendWatch, ClientGetter, EventType, ResourceClient, ResourceEvent, WatchOptions,
};
pub use errors::ErrorStore;
pub use merge::{Merger, UpdateMerge};
pub use proxy::{new_proxy_store, ProxyStore};

/// The operations every schema store implements. Stores compose by wrapping
/// one another, e.g. [`ErrorStore`] around [`ProxyStore`].
#[async_trait]
pub trait Store: Send + Sync {
    async fn by_id(&self, req: &ApiRequest, schema: &Schema, id: &str) -> Result<ApiObject>;

    async fn list(&self, req: &ApiRequest, schema: &Schema) -> Result<ApiObjectList>;

    async fn watch(&self, req: &ApiRequest, schema: &Schema) -> Result<ApiWatch>;

    async fn create(&self, req: &ApiRequest, schema: &Schema, data: ApiObject)
        -> Result<ApiObject>;

    async fn update(
        &self,
        req: &ApiRequest,
        schema: &Schema,
        data: ApiObject,
        id: &str,
    ) -> Result<ApiObject>;

    async fn delete(&self, req: &ApiRequest, schema: &Schema, id: &str) -> Result<ApiObject>;
}

/// Lifecycle of a watch. A watch never reopens once closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Open,
    Closed,
}

/// Receiving end of a watch.
///
/// Events must be drained until `recv` returns `None`; the channel is closed
/// exactly once, when the backend stream ends or the request is cancelled.
pub struct ApiWatch {
    events: mpsc::Receiver<ApiObject>,
    state: watch::Receiver<WatchState>,
}

impl ApiWatch {
    pub fn new(events: mpsc::Receiver<ApiObject>, state: watch::Receiver<WatchState>) -> Self {
        Self { events, state }
    }

    pub async fn recv(&mut self) -> Option<ApiObject> {
        self.events.recv().await
    }

    pub fn state(&self) -> WatchState {
        *self.state.borrow()
    }

    /// Wait until the watch reached [`WatchState::Closed`].
    pub async fn closed(&mut self) {
        let _ = self.state.wait_for(|s| *s == WatchState::Closed).await;
    }
}
