// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Meta schemas present in every schema set.

use crate::types::Schema;
use http::Method;

/// The schema describing schemas themselves.
pub const SCHEMA: &str = "schema";
/// The schema of API error bodies.
pub const ERROR: &str = "error";

pub fn builtin_schemas() -> Vec<Schema> {
    let get = Method::GET.to_string();
    vec![
        Schema {
            resource_methods: vec![get.clone()],
            collection_methods: vec![get],
            ..Schema::new(SCHEMA)
        },
        Schema::new(ERROR),
    ]
}
