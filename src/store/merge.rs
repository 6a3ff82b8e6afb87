// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Merging an incoming (possibly partial) document onto the stored object.

use crate::types::{Data, Schema, SchemaSet};
use serde_json::Value;

/// Computes the document sent to the backend on update.
pub trait Merger: Send + Sync {
    fn merge(
        &self,
        schema: &Schema,
        schemas: &SchemaSet,
        existing: Data,
        incoming: &Data,
        replace: bool,
    ) -> Data;
}

/// Default update merge.
///
/// `status` always comes from the stored object. Labels and annotations are
/// merged with the incoming ones winning; the rest of the stored metadata is
/// kept. Other top-level fields are deep-merged, or, with `replace`, taken
/// from the incoming document only.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateMerge;

const METADATA: &str = "metadata";
const STATUS: &str = "status";
const TYPE_FIELDS: [&str; 2] = ["apiVersion", "kind"];
const MERGED_METADATA: [&str; 2] = ["labels", "annotations"];

impl Merger for UpdateMerge {
    fn merge(
        &self,
        _schema: &Schema,
        _schemas: &SchemaSet,
        existing: Data,
        incoming: &Data,
        replace: bool,
    ) -> Data {
        let mut result = if replace {
            let mut result = Data::new();
            for key in TYPE_FIELDS {
                if let Some(value) = existing.get(key) {
                    result.insert(key.to_string(), value.clone());
                }
            }
            result
        } else {
            existing.clone()
        };

        for (key, value) in incoming {
            if key == METADATA || key == STATUS {
                continue;
            }
            if replace {
                result.insert(key.clone(), value.clone());
            } else {
                merge_value(&mut result, key, value);
            }
        }

        if let Some(status) = existing.get(STATUS) {
            result.insert(STATUS.to_string(), status.clone());
        }

        let metadata = merge_metadata(
            existing.get(METADATA).and_then(Value::as_object),
            incoming.get(METADATA).and_then(Value::as_object),
        );
        result.insert(METADATA.to_string(), Value::Object(metadata));

        result
    }
}

fn merge_metadata(existing: Option<&Data>, incoming: Option<&Data>) -> Data {
    let mut result = existing.cloned().unwrap_or_default();
    let Some(incoming) = incoming else {
        return result;
    };

    for key in MERGED_METADATA {
        let Some(Value::Object(values)) = incoming.get(key) else {
            continue;
        };
        let target = result
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Data::new()));
        if !target.is_object() {
            *target = Value::Object(Data::new());
        }
        if let Value::Object(target) = target {
            merge_maps(target, values);
        }
    }

    result
}

/// Recursive JSON merge; `null` removes a key.
fn merge_maps(dest: &mut Data, src: &Data) {
    for (key, value) in src {
        merge_value(dest, key, value);
    }
}

fn merge_value(dest: &mut Data, key: &str, value: &Value) {
    if value.is_null() {
        dest.remove(key);
        return;
    }
    if let (Some(Value::Object(current)), Value::Object(update)) = (dest.get_mut(key), value) {
        merge_maps(current, update);
        return;
    }
    dest.insert(key.to_string(), value.clone());
}
