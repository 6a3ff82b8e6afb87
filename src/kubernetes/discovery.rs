// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Base schemas discovered from the API server.

use crate::error::Result;
use crate::types::Schema;
use kube::discovery::{ApiCapabilities, ApiResource, Discovery, Scope};
use kube::Client;
use tracing::{debug, info, instrument};

/// Discover every recommended resource type and turn it into a schema.
#[instrument(skip(client))]
pub async fn discover_schemas(client: &Client) -> Result<Vec<Schema>> {
    let discovery = Discovery::new(client.clone()).run().await?;

    let mut schemas = Vec::new();
    for group in discovery.groups() {
        for (resource, caps) in group.recommended_resources() {
            debug!(
                "Discovered {}/{} {}",
                group.name(),
                resource.version,
                resource.plural
            );
            schemas.push(schema_for(&resource, &caps));
        }
    }

    info!("Discovered {} resource schemas", schemas.len());
    Ok(schemas)
}

fn schema_for(resource: &ApiResource, caps: &ApiCapabilities) -> Schema {
    resource_schema(
        resource,
        matches!(caps.scope, Scope::Namespaced),
        &caps.operations,
    )
}

/// Schema for a resource type with the verbs the server supports on it.
pub fn resource_schema(resource: &ApiResource, namespaced: bool, verbs: &[String]) -> Schema {
    let verbs: Vec<&str> = verbs.iter().map(String::as_str).collect();
    Schema::for_resource(
        schema_id(&resource.group, &resource.kind),
        &resource.group,
        &resource.version,
        &resource.kind,
        &resource.plural,
    )
    .namespaced(namespaced)
    .with_verbs(&verbs)
}

/// `kind` for the core group, `group.kind` otherwise, lowercased.
pub fn schema_id(group: &str, kind: &str) -> String {
    if group.is_empty() {
        kind.to_lowercase()
    } else {
        format!("{}.{}", group, kind).to_lowercase()
    }
}
