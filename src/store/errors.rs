// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Store decorator that turns backend status errors into API errors.

use crate::error::{OutpostError, Result};
use crate::store::{ApiWatch, Store};
use crate::types::{ApiObject, ApiObjectList, ApiRequest, Schema};
use async_trait::async_trait;

pub struct ErrorStore<S> {
    inner: S,
}

impl<S: Store> ErrorStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

/// Map a backend status (code + reason) onto an API error. Other errors pass through.
pub fn translate_error(err: OutpostError) -> OutpostError {
    match err {
        OutpostError::KubeError(kube::Error::Api(resp)) => OutpostError::Api {
            status: resp.code,
            code: resp.reason,
            message: resp.message,
        },
        OutpostError::NotFound(message) => OutpostError::Api {
            status: 404,
            code: "NotFound".to_string(),
            message,
        },
        OutpostError::Conflict(message) => OutpostError::Api {
            status: 409,
            code: "Conflict".to_string(),
            message,
        },
        other => other,
    }
}

#[async_trait]
impl<S: Store> Store for ErrorStore<S> {
    async fn by_id(&self, req: &ApiRequest, schema: &Schema, id: &str) -> Result<ApiObject> {
        self.inner.by_id(req, schema, id).await.map_err(translate_error)
    }

    async fn list(&self, req: &ApiRequest, schema: &Schema) -> Result<ApiObjectList> {
        self.inner.list(req, schema).await.map_err(translate_error)
    }

    async fn watch(&self, req: &ApiRequest, schema: &Schema) -> Result<ApiWatch> {
        self.inner.watch(req, schema).await.map_err(translate_error)
    }

    async fn create(
        &self,
        req: &ApiRequest,
        schema: &Schema,
        data: ApiObject,
    ) -> Result<ApiObject> {
        self.inner
            .create(req, schema, data)
            .await
            .map_err(translate_error)
    }

    async fn update(
        &self,
        req: &ApiRequest,
        schema: &Schema,
        data: ApiObject,
        id: &str,
    ) -> Result<ApiObject> {
        self.inner
            .update(req, schema, data, id)
            .await
            .map_err(translate_error)
    }

    async fn delete(&self, req: &ApiRequest, schema: &Schema, id: &str) -> Result<ApiObject> {
        self.inner
            .delete(req, schema, id)
            .await
            .map_err(translate_error)
    }
}
