// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Wire representation of API objects and nested-field helpers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A JSON object as exchanged with the backend and with API callers.
pub type Data = Map<String, Value>;

/// A single API object. `object` is `None` when an operation produced nothing to return.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiObject {
    pub object: Option<Data>,
}

impl ApiObject {
    pub fn new(data: Data) -> Self {
        Self { object: Some(data) }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.object.is_none()
    }

    pub fn data(&self) -> Option<&Data> {
        self.object.as_ref()
    }

    pub fn into_data(self) -> Data {
        self.object.unwrap_or_default()
    }

    pub fn name(&self) -> Option<&str> {
        self.data()
            .and_then(|d| get_value(d, &["metadata", "name"]))
            .and_then(Value::as_str)
    }

    pub fn namespace(&self) -> Option<&str> {
        self.data()
            .and_then(|d| get_value(d, &["metadata", "namespace"]))
            .and_then(Value::as_str)
    }

    /// `namespace/name` for namespaced objects, `name` otherwise.
    pub fn id(&self) -> Option<String> {
        let name = self.name()?;
        Some(match self.namespace() {
            Some(ns) if !ns.is_empty() => format!("{}/{}", ns, name),
            _ => name.to_string(),
        })
    }
}

impl From<Data> for ApiObject {
    fn from(data: Data) -> Self {
        Self::new(data)
    }
}

/// Result of a list operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiObjectList {
    pub objects: Vec<ApiObject>,
}

impl ApiObjectList {
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Read a nested value, e.g. `get_value(data, &["metadata", "name"])`.
pub fn get_value<'a>(data: &'a Data, path: &[&str]) -> Option<&'a Value> {
    let (last, parents) = path.split_last()?;
    let mut current = data;
    for key in parents {
        current = current.get(*key)?.as_object()?;
    }
    current.get(*last)
}

pub fn get_str<'a>(data: &'a Data, path: &[&str]) -> Option<&'a str> {
    get_value(data, path).and_then(Value::as_str)
}

/// Write a nested value, creating (or replacing non-object) intermediate maps.
pub fn put_value(data: &mut Data, value: impl Into<Value>, path: &[&str]) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut current = data;
    for key in parents {
        let entry = current
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(next) = entry else {
            return;
        };
        current = next;
    }
    current.insert(last.to_string(), value.into());
}
