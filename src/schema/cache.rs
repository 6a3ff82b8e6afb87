// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Time-bounded cache of per-subject schema sets, keyed by access set ID.

use crate::types::SchemaSet;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

struct Entry {
    schemas: Arc<SchemaSet>,
    expires_at: Instant,
}

/// Entries expire `ttl` after insertion. There is no manual invalidation:
/// permission changes become visible once the entry expires.
pub struct SchemaCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl SchemaCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &str) -> Option<Arc<SchemaSet>> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.schemas.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store `schemas` unless a live entry already exists; returns whichever is cached.
    pub fn get_or_insert(&self, key: String, schemas: Arc<SchemaSet>) -> Arc<SchemaSet> {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        entries.retain(|_, entry| entry.expires_at > now);

        entries
            .entry(key)
            .or_insert_with(|| Entry {
                schemas,
                expires_at: now + self.ttl,
            })
            .schemas
            .clone()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .values()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
