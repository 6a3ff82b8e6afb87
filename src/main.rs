// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use kube::Client;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use outpost::accesscontrol::AdminAccessLookup;
use outpost::config::Config;
use outpost::kubernetes::{discover_schemas, KubeClientGetter};
use outpost::schema::{Collection, SchemaCache, Template};
use outpost::store::{ErrorStore, ProxyStore};
use outpost::types::{SchemaSet, UserInfo};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Outpost");

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: user={}, schema_cache_ttl={:?}, watch_timeout={:?}",
        config.user, config.schema_cache_ttl, config.watch_timeout
    );

    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    let proxy = ProxyStore::new(Arc::new(KubeClientGetter::new(client.clone())))
        .with_watch_timeout(config.watch_timeout);

    let collection = Collection::new(
        Arc::new(AdminAccessLookup::new()),
        Arc::new(SchemaCache::new(config.schema_cache_ttl)),
        SchemaSet::new(),
    );
    collection.add_template(Template::global().with_store(Arc::new(ErrorStore::new(proxy))));

    let discovered = discover_schemas(&client).await?;
    collection.reset(discovered);

    let schemas = collection.schemas(&UserInfo::new(config.user.clone()))?;
    info!("{} schemas visible to {}", schemas.len(), config.user);
    for schema in schemas.iter() {
        info!(
            "{}: resource methods {:?}, collection methods {:?}",
            schema.id, schema.resource_methods, schema.collection_methods
        );
    }

    Ok(())
}
