// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Metadata keys stamped onto objects created through the proxy store
pub mod annotations {
    /// Identity of the user that created the object
    pub const CREATOR_ID: &str = "field.cattle.io/creatorId";
}

pub mod labels {
    /// Marks objects created through the generic API
    pub const CREATOR: &str = "cattle.io/creator";
    /// Default value of the creator label
    pub const CREATOR_DEFAULT: &str = "norman";
}

/// Request options understood by the proxy store
pub mod options {
    /// When "true", the `status` subtree is removed from returned objects
    pub const EXPORT: &str = "export";
    /// When "true", updates replace the whole object instead of merging
    pub const REPLACE: &str = "replace";
}

/// Reserved boolean field set on objects delivered by deleted watch events
pub const REMOVED_FIELD: &str = ".removed";

/// Maximum number of update attempts on resourceVersion conflicts
pub const UPDATE_ATTEMPTS: usize = 5;

/// Cache and watch defaults
pub mod defaults {
    /// Lifetime of a cached per-subject schema set (24 hours)
    pub const SCHEMA_CACHE_TTL_SECS: u64 = 24 * 60 * 60;
    /// Server-side watch session timeout (30 minutes)
    pub const WATCH_TIMEOUT_SECS: u64 = 30 * 60;
    /// Identity the diagnostic binary resolves schemas for
    pub const USER: &str = "admin";
}
