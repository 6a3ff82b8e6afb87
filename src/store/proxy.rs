// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Store that proxies every operation to the backend resource client.

use crate::constants::{annotations, defaults, labels, options, REMOVED_FIELD, UPDATE_ATTEMPTS};
use crate::error::{OutpostError, Result};
use crate::store::client::{ClientGetter, EventType, WatchOptions};
use crate::store::errors::ErrorStore;
use crate::store::merge::{Merger, UpdateMerge};
use crate::store::{ApiWatch, Store, WatchState};
use crate::types::object::{get_str, get_value, put_value};
use crate::types::{ApiObject, ApiObjectList, ApiRequest, Data, Schema};
use async_trait::async_trait;
use futures::future::try_join_all;
use futures::StreamExt;
use parking_lot::Mutex;
use rand::distr::Alphanumeric;
use rand::Rng;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, instrument, warn};

/// Build the default backend-proxying store, wrapped in [`ErrorStore`].
pub fn new_proxy_store(client_getter: Arc<dyn ClientGetter>) -> Arc<dyn Store> {
    Arc::new(ErrorStore::new(ProxyStore::new(client_getter)))
}

pub struct ProxyStore {
    client_getter: Arc<dyn ClientGetter>,
    merger: Arc<dyn Merger>,
    watch_timeout: Duration,
}

impl ProxyStore {
    pub fn new(client_getter: Arc<dyn ClientGetter>) -> Self {
        Self {
            client_getter,
            merger: Arc::new(UpdateMerge),
            watch_timeout: Duration::from_secs(defaults::WATCH_TIMEOUT_SECS),
        }
    }

    pub fn with_merger(mut self, merger: Arc<dyn Merger>) -> Self {
        self.merger = merger;
        self
    }

    pub fn with_watch_timeout(mut self, timeout: Duration) -> Self {
        self.watch_timeout = timeout;
        self
    }

    async fn fetch(&self, req: &ApiRequest, schema: &Schema, id: &str) -> Result<Data> {
        let client = self.client_getter.client(req, schema)?;
        let data = client.get(id).await?;
        Ok(from_internal(req, schema, data))
    }

    async fn list_namespace(
        &self,
        req: &ApiRequest,
        schema: &Schema,
        namespace: &str,
    ) -> Result<Vec<Data>> {
        let req = req.for_namespace(namespace);
        let client = self.client_getter.client(&req, schema)?;
        client.list().await
    }
}

/// Backend → API representation.
fn from_internal(req: &ApiRequest, schema: &Schema, mut data: Data) -> Data {
    if req.option(options::EXPORT) == "true" {
        data.remove("status");
    }
    if let Some(mapper) = &schema.mapper {
        mapper.from_internal(&mut data);
    }
    data
}

/// API → backend representation.
fn to_internal(schema: &Schema, data: &mut Data) -> Result<()> {
    if let Some(mapper) = &schema.mapper {
        mapper.to_internal(data)?;
    }
    Ok(())
}

/// `<type>-<5 random lowercase alphanumerics>`, using the last segment of the schema ID.
pub fn generate_name(schema_id: &str) -> String {
    let base = schema_id.rsplit('.').next().unwrap_or(schema_id).to_lowercase();
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(5)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect();
    format!("{}-{}", base, suffix)
}

#[async_trait]
impl Store for ProxyStore {
    #[instrument(skip(self, req, schema), fields(schema = %schema.id))]
    async fn by_id(&self, req: &ApiRequest, schema: &Schema, id: &str) -> Result<ApiObject> {
        Ok(ApiObject::new(self.fetch(req, schema, id).await?))
    }

    #[instrument(
        skip(self, req, schema),
        fields(schema = %schema.id, namespaces = req.namespaces.len())
    )]
    async fn list(&self, req: &ApiRequest, schema: &Schema) -> Result<ApiObjectList> {
        let items = if req.namespaces.len() <= 1 {
            let client = self.client_getter.client(req, schema)?;
            client.list().await?
        } else {
            let accumulated = Mutex::new(Vec::new());
            let results = &accumulated;
            try_join_all(req.namespaces.iter().map(|namespace| async move {
                let items = self.list_namespace(req, schema, namespace).await?;
                results.lock().extend(items);
                Ok::<_, OutpostError>(())
            }))
            .await?;
            accumulated.into_inner()
        };

        Ok(ApiObjectList {
            objects: items
                .into_iter()
                .map(|data| ApiObject::new(from_internal(req, schema, data)))
                .collect(),
        })
    }

    /// Opens a backend watch from now and forwards its events until either
    /// the backend ends the stream or the request is cancelled.
    ///
    /// Two tasks run per watch: one forwards cancellation of the request to
    /// the backend watch, the other drains and transforms backend events.
    /// When the backend stream ends the drain task closes the output channel,
    /// marks the watch closed and cancels the watch context, which releases
    /// the forwarding task.
    #[instrument(skip(self, req, schema), fields(schema = %schema.id))]
    async fn watch(&self, req: &ApiRequest, schema: &Schema) -> Result<ApiWatch> {
        let client = self.client_getter.client(req, schema)?;
        let backend = client
            .watch(&WatchOptions {
                resource_version: "0".to_string(),
                timeout: self.watch_timeout,
            })
            .await?;
        let (mut events, stop) = backend.into_parts();

        let watching = req.cancel.child_token();
        let (tx, rx) = mpsc::channel(1);
        let (state_tx, state_rx) = watch::channel(WatchState::Open);

        let stop_ctx = watching.clone();
        let schema_id = schema.id.clone();
        tokio::spawn(async move {
            stop_ctx.cancelled().await;
            debug!("stopping watcher for {}", schema_id);
            stop.cancel();
        });

        let req = req.clone();
        let schema = schema.clone();
        tokio::spawn(async move {
            loop {
                let event = tokio::select! {
                    _ = tx.closed() => {
                        debug!("watch consumer for {} went away", schema.id);
                        break;
                    }
                    event = events.next() => event,
                };
                let event = match event {
                    Some(Ok(event)) => event,
                    Some(Err(e)) => {
                        warn!("watch for {} failed: {}", schema.id, e);
                        break;
                    }
                    None => break,
                };

                let mut data = from_internal(&req, &schema, event.object);
                if event.event_type == EventType::Deleted {
                    data.insert(REMOVED_FIELD.to_string(), Value::Bool(true));
                }
                if tx.send(ApiObject::new(data)).await.is_err() {
                    break;
                }
            }

            debug!("closing watcher for {}", schema.id);
            state_tx.send_replace(WatchState::Closed);
            drop(tx);
            watching.cancel();
        });

        Ok(ApiWatch::new(rx, state_rx))
    }

    #[instrument(skip(self, req, schema, params), fields(schema = %schema.id))]
    async fn create(
        &self,
        req: &ApiRequest,
        schema: &Schema,
        params: ApiObject,
    ) -> Result<ApiObject> {
        let mut data = params.into_data();
        to_internal(schema, &mut data)?;

        put_value(
            &mut data,
            req.user_name(),
            &["metadata", "annotations", annotations::CREATOR_ID],
        );
        if get_value(&data, &["metadata", "labels", labels::CREATOR]).is_none() {
            put_value(
                &mut data,
                labels::CREATOR_DEFAULT,
                &["metadata", "labels", labels::CREATOR],
            );
        }

        let has_name = !get_str(&data, &["metadata", "name"]).unwrap_or("").is_empty();
        let has_prefix = !get_str(&data, &["metadata", "generateName"])
            .unwrap_or("")
            .is_empty();
        if !has_name && !has_prefix {
            put_value(&mut data, generate_name(&schema.id), &["metadata", "name"]);
        }

        let client = self.client_getter.client(req, schema)?;
        let created = client.create(data).await?;
        Ok(ApiObject::new(from_internal(req, schema, created)))
    }

    /// Merges `params` onto the current object and writes it back, retrying
    /// on resourceVersion conflicts.
    #[instrument(skip(self, req, schema, params), fields(schema = %schema.id))]
    async fn update(
        &self,
        req: &ApiRequest,
        schema: &Schema,
        params: ApiObject,
        id: &str,
    ) -> Result<ApiObject> {
        let client = self.client_getter.client(req, schema)?;

        let mut data = params.into_data();
        to_internal(schema, &mut data)?;
        let replace = req.option(options::REPLACE) == "true";

        let mut last_err = None;
        for attempt in 1..=UPDATE_ATTEMPTS {
            let existing = client.get(id).await?;
            let resource_version = get_str(&existing, &["metadata", "resourceVersion"])
                .unwrap_or_default()
                .to_string();

            let mut merged = self
                .merger
                .merge(schema, &req.schemas, existing, &data, replace);
            put_value(&mut merged, resource_version, &["metadata", "resourceVersion"]);
            if let Some(namespace) = req.namespaces.first() {
                put_value(&mut merged, namespace.as_str(), &["metadata", "namespace"]);
            }
            put_value(&mut merged, id, &["metadata", "name"]);

            match client.update(merged).await {
                Ok(updated) => return Ok(ApiObject::new(from_internal(req, schema, updated))),
                Err(e) if e.is_conflict() => {
                    debug!("conflict updating {} (attempt {}/{})", id, attempt, UPDATE_ATTEMPTS);
                    last_err = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err.unwrap_or_else(|| {
            OutpostError::Conflict(format!("{} {} could not be updated", schema.id, id))
        }))
    }

    /// Deletes the object and returns its last known state. Failing to fetch
    /// that state is not an error; the result is then empty.
    #[instrument(skip(self, req, schema), fields(schema = %schema.id))]
    async fn delete(&self, req: &ApiRequest, schema: &Schema, id: &str) -> Result<ApiObject> {
        let client = self.client_getter.client(req, schema)?;
        client.delete(id).await?;

        match self.fetch(req, schema, id).await {
            Ok(data) => Ok(ApiObject::new(data)),
            Err(e) => {
                debug!("unable to fetch {} after delete: {}", id, e);
                Ok(ApiObject::empty())
            }
        }
    }
}
