// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Defaults applied to schemas when they are registered.

use crate::store::Store;
use crate::types::{Formatter, Schema};
use std::sync::Arc;

/// Builds a store for a schema, given the global default store to delegate to.
pub type StoreFactory = Arc<dyn Fn(Option<Arc<dyn Store>>) -> Arc<dyn Store> + Send + Sync>;

/// Final adjustments to a schema after formatter and store are settled.
pub type Customize = Arc<dyn Fn(&mut Schema) + Send + Sync>;

/// A template matches a schema by exact ID, by `group/kind`, or, with
/// neither set, applies to every schema as the global default.
#[derive(Clone, Default)]
pub struct Template {
    pub id: String,
    pub group: String,
    pub kind: String,
    pub formatter: Option<Formatter>,
    pub store: Option<Arc<dyn Store>>,
    pub store_factory: Option<StoreFactory>,
    pub customize: Option<Customize>,
}

impl Template {
    /// The global default template.
    pub fn global() -> Self {
        Self::default()
    }

    pub fn for_id(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Default::default()
        }
    }

    pub fn for_group_kind(group: &str, kind: &str) -> Self {
        Self {
            group: group.to_string(),
            kind: kind.to_string(),
            ..Default::default()
        }
    }

    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn with_store(mut self, store: Arc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_store_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(Option<Arc<dyn Store>>) -> Arc<dyn Store> + Send + Sync + 'static,
    {
        self.store_factory = Some(Arc::new(factory));
        self
    }

    pub fn with_customize<F>(mut self, customize: F) -> Self
    where
        F: Fn(&mut Schema) + Send + Sync + 'static,
    {
        self.customize = Some(Arc::new(customize));
        self
    }

    /// Registry key: `group/kind` if either is set, else the ID (empty for the global default).
    pub fn key(&self) -> String {
        if !self.group.is_empty() || !self.kind.is_empty() {
            format!("{}/{}", self.group, self.kind)
        } else {
            self.id.clone()
        }
    }
}
