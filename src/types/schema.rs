// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! API schemas and schema sets.

use crate::accesscontrol::{AccessListByVerb, GroupResource};
use crate::error::{OutpostError, Result};
use crate::store::Store;
use crate::types::mapper::Mapper;
use crate::types::object::ApiObject;
use crate::types::request::ApiRequest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Post-processes an object right before it is returned to the caller.
pub type Formatter = Arc<dyn Fn(&ApiRequest, &mut ApiObject) + Send + Sync>;

/// Backend identity and permissions of a schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaAttributes {
    pub group: String,
    pub version: String,
    pub kind: String,
    /// Plural resource name; empty for schemas not backed by a resource type.
    pub resource: String,
    pub namespaced: bool,
    /// Verbs the backend supports for this resource type.
    pub verbs: Vec<String>,
    /// Verbs granted to the current subject. Only set on per-subject copies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<AccessListByVerb>,
}

/// Describes one API type. Cloning produces an independent copy of the
/// method lists and attributes; store, mapper and formatter are shared.
#[derive(Clone, Default)]
pub struct Schema {
    pub id: String,
    pub plural_name: String,
    pub resource_methods: Vec<String>,
    pub collection_methods: Vec<String>,
    pub attributes: SchemaAttributes,
    pub mapper: Option<Arc<dyn Mapper>>,
    pub store: Option<Arc<dyn Store>>,
    pub formatter: Option<Formatter>,
}

impl Schema {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// A schema backed by a backend resource type.
    pub fn for_resource(
        id: impl Into<String>,
        group: &str,
        version: &str,
        kind: &str,
        resource: &str,
    ) -> Self {
        Self {
            id: id.into(),
            plural_name: resource.to_string(),
            attributes: SchemaAttributes {
                group: group.to_string(),
                version: version.to_string(),
                kind: kind.to_string(),
                resource: resource.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn with_verbs(mut self, verbs: &[&str]) -> Self {
        self.attributes.verbs = verbs.iter().map(|v| v.to_string()).collect();
        self
    }

    pub fn namespaced(mut self, namespaced: bool) -> Self {
        self.attributes.namespaced = namespaced;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_mapper(mut self, mapper: Arc<dyn Mapper>) -> Self {
        self.mapper = Some(mapper);
        self
    }

    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Group/resource of the backing resource type; `None` for meta schemas.
    pub fn group_resource(&self) -> Option<GroupResource> {
        if self.attributes.resource.is_empty() {
            return None;
        }
        Some(GroupResource::new(
            self.attributes.group.clone(),
            self.attributes.resource.clone(),
        ))
    }

    /// Key of the group/kind template tier.
    pub fn group_kind(&self) -> String {
        format!("{}/{}", self.attributes.group, self.attributes.kind)
    }

    pub fn access(&self) -> Option<&AccessListByVerb> {
        self.attributes.access.as_ref()
    }

    pub fn store(&self) -> Result<Arc<dyn Store>> {
        self.store
            .clone()
            .ok_or_else(|| OutpostError::NoStore(self.id.clone()))
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("id", &self.id)
            .field("plural_name", &self.plural_name)
            .field("resource_methods", &self.resource_methods)
            .field("collection_methods", &self.collection_methods)
            .field("attributes", &self.attributes)
            .field("mapper", &self.mapper.is_some())
            .field("store", &self.store.is_some())
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}

/// A set of schemas keyed by ID.
#[derive(Debug, Clone, Default)]
pub struct SchemaSet {
    schemas: BTreeMap<String, Schema>,
}

impl SchemaSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a schema. Fails on a missing or already registered ID.
    pub fn add_schema(&mut self, schema: Schema) -> Result<()> {
        if schema.id.is_empty() {
            return Err(OutpostError::MissingSchemaId);
        }
        if self.schemas.contains_key(&schema.id) {
            return Err(OutpostError::DuplicateSchema(schema.id));
        }
        self.schemas.insert(schema.id.clone(), schema);
        Ok(())
    }

    pub fn add_schemas(&mut self, other: &SchemaSet) -> Result<()> {
        for schema in other.iter() {
            self.add_schema(schema.clone())?;
        }
        Ok(())
    }

    pub fn lookup(&self, id: &str) -> Option<&Schema> {
        self.schemas.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.schemas.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
