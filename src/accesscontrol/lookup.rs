// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resolution of a caller identity into its access set.

use crate::accesscontrol::access_set::{Access, AccessSet, GroupResource, ALL};
use crate::types::UserInfo;
use std::sync::Arc;

/// Resolves the grants of an already-authenticated user.
pub trait AccessSetLookup: Send + Sync {
    fn access_for(&self, user: &UserInfo) -> Arc<AccessSet>;
}

/// Grants every verb on every resource to every user.
///
/// Only suitable for single-tenant setups and diagnostics, where the
/// backend credentials already bound what can be reached.
#[derive(Debug, Clone)]
pub struct AdminAccessLookup {
    access: Arc<AccessSet>,
}

impl AdminAccessLookup {
    pub fn new() -> Self {
        let access = AccessSet::new().with(ALL, GroupResource::new(ALL, ALL), Access::all());
        Self {
            access: Arc::new(access),
        }
    }
}

impl Default for AdminAccessLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessSetLookup for AdminAccessLookup {
    fn access_for(&self, _user: &UserInfo) -> Arc<AccessSet> {
        self.access.clone()
    }
}
