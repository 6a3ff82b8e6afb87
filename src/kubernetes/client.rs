// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes backend for the proxy store, built on dynamic objects.

use crate::error::{OutpostError, Result};
use crate::store::{
    BackendWatch, ClientGetter, EventType, ResourceClient, ResourceEvent, WatchOptions,
};
use crate::types::{ApiRequest, Data, Schema};
use async_trait::async_trait;
use futures::StreamExt;
use kube::api::{
    ApiResource, DeleteParams, DynamicObject, GroupVersionKind, ListParams, PostParams, TypeMeta,
    WatchEvent, WatchParams,
};
use kube::{Api, Client};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// kube-rs rejects server-side watch timeouts of 295s and above, since its
/// client read timeout would fire first.
pub const MAX_WATCH_TIMEOUT_SECS: u64 = 290;

/// Server-side watch timeout actually requested for `requested`.
fn watch_timeout_secs(requested: Duration) -> u32 {
    let requested = requested.as_secs();
    if requested > MAX_WATCH_TIMEOUT_SECS {
        debug!(
            "watch timeout of {}s exceeds the client limit, using {}s",
            requested, MAX_WATCH_TIMEOUT_SECS
        );
    }
    requested.min(MAX_WATCH_TIMEOUT_SECS) as u32
}

/// Resolves a dynamic API for the schema's resource type, scoped to the
/// request namespace when the resource is namespaced and exactly one
/// namespace is requested.
#[derive(Clone)]
pub struct KubeClientGetter {
    client: Client,
}

impl KubeClientGetter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ClientGetter for KubeClientGetter {
    fn client(&self, req: &ApiRequest, schema: &Schema) -> Result<Arc<dyn ResourceClient>> {
        let resource = api_resource(schema)?;
        let scope = (schema.attributes.namespaced, req.namespaces.as_slice());
        let api: Api<DynamicObject> = match scope {
            (true, [namespace]) => Api::namespaced_with(self.client.clone(), namespace, &resource),
            _ => Api::all_with(self.client.clone(), &resource),
        };
        Ok(Arc::new(DynamicResourceClient::new(api, resource)))
    }
}

/// Group/version/kind/plural of a resource-backed schema.
pub fn api_resource(schema: &Schema) -> Result<ApiResource> {
    let attrs = &schema.attributes;
    if attrs.resource.is_empty() || attrs.version.is_empty() || attrs.kind.is_empty() {
        return Err(OutpostError::InvalidSchema(format!(
            "{} is not backed by a resource type",
            schema.id
        )));
    }
    let gvk = GroupVersionKind::gvk(&attrs.group, &attrs.version, &attrs.kind);
    Ok(ApiResource::from_gvk_with_plural(&gvk, &attrs.resource))
}

pub struct DynamicResourceClient {
    api: Api<DynamicObject>,
    resource: ApiResource,
}

impl DynamicResourceClient {
    pub fn new(api: Api<DynamicObject>, resource: ApiResource) -> Self {
        Self { api, resource }
    }

    fn to_object(&self, mut data: Data) -> Result<DynamicObject> {
        data.entry("metadata")
            .or_insert_with(|| Value::Object(Data::new()));
        let mut obj: DynamicObject = serde_json::from_value(Value::Object(data))?;
        if obj.types.is_none() {
            obj.types = Some(TypeMeta {
                api_version: self.resource.api_version.clone(),
                kind: self.resource.kind.clone(),
            });
        }
        Ok(obj)
    }
}

fn to_data(obj: DynamicObject) -> Result<Data> {
    match serde_json::to_value(obj)? {
        Value::Object(data) => Ok(data),
        other => Err(OutpostError::Backend(format!(
            "expected an object from the API server, got {}",
            other
        ))),
    }
}

fn to_event(event_type: EventType, obj: DynamicObject) -> Result<ResourceEvent> {
    Ok(ResourceEvent::new(event_type, to_data(obj)?))
}

#[async_trait]
impl ResourceClient for DynamicResourceClient {
    async fn get(&self, name: &str) -> Result<Data> {
        to_data(self.api.get(name).await?)
    }

    async fn list(&self) -> Result<Vec<Data>> {
        let list = self.api.list(&ListParams::default()).await?;
        list.items.into_iter().map(to_data).collect()
    }

    #[instrument(skip(self, opts), fields(kind = %self.resource.kind))]
    async fn watch(&self, opts: &WatchOptions) -> Result<BackendWatch> {
        let timeout = watch_timeout_secs(opts.timeout);
        let params = WatchParams::default().timeout(timeout);
        debug!(
            "opening watch at resourceVersion {:?} with timeout {}s",
            opts.resource_version, timeout
        );

        let stream = self.api.watch(&params, &opts.resource_version).await?;
        let events = stream.filter_map(|event| async move {
            match event {
                Ok(WatchEvent::Added(obj)) => Some(to_event(EventType::Added, obj)),
                Ok(WatchEvent::Modified(obj)) => Some(to_event(EventType::Modified, obj)),
                Ok(WatchEvent::Deleted(obj)) => Some(to_event(EventType::Deleted, obj)),
                Ok(WatchEvent::Bookmark(_)) => None,
                Ok(WatchEvent::Error(resp)) => Some(Err(kube::Error::Api(resp).into())),
                Err(e) => Some(Err(e.into())),
            }
        });

        Ok(BackendWatch::new(events))
    }

    async fn create(&self, data: Data) -> Result<Data> {
        let obj = self.to_object(data)?;
        to_data(self.api.create(&PostParams::default(), &obj).await?)
    }

    async fn update(&self, data: Data) -> Result<Data> {
        let obj = self.to_object(data)?;
        let name = obj
            .metadata
            .name
            .clone()
            .ok_or_else(|| {
                OutpostError::Backend("cannot update an object without a name".to_string())
            })?;
        to_data(self.api.replace(&name, &PostParams::default(), &obj).await?)
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.api.delete(name, &DeleteParams::default()).await?;
        Ok(())
    }
}
