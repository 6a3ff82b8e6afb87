// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Request-scoped context handed to stores.

use crate::types::schema::SchemaSet;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// An already-authenticated caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInfo {
    pub name: String,
    pub uid: String,
    pub groups: Vec<String>,
}

impl UserInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_groups(mut self, groups: &[&str]) -> Self {
        self.groups = groups.iter().map(|g| g.to_string()).collect();
        self
    }
}

/// A single API operation: who is calling, which namespaces it spans,
/// its options and its lifetime.
///
/// Cancelling `cancel` ends the request; watches opened on its behalf are stopped.
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    pub user: UserInfo,
    pub namespaces: Vec<String>,
    pub options: HashMap<String, String>,
    pub schemas: Arc<SchemaSet>,
    pub cancel: CancellationToken,
}

impl ApiRequest {
    pub fn new(user: UserInfo) -> Self {
        Self {
            user,
            ..Default::default()
        }
    }

    pub fn with_namespaces(mut self, namespaces: &[&str]) -> Self {
        self.namespaces = namespaces.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn with_option(mut self, key: &str, value: &str) -> Self {
        self.options.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_schemas(mut self, schemas: Arc<SchemaSet>) -> Self {
        self.schemas = schemas;
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Value of a request option, empty when unset.
    pub fn option(&self, key: &str) -> &str {
        self.options.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn user_name(&self) -> &str {
        &self.user.name
    }

    /// The request scoped down to a single namespace.
    pub fn for_namespace(&self, namespace: &str) -> Self {
        let mut req = self.clone();
        req.namespaces = vec![namespace.to_string()];
        req
    }
}
