// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Access sets and their lookup by user.

pub mod access_set;
pub mod lookup;

pub use access_set::{Access, AccessList, AccessListByVerb, AccessSet, GroupResource};
pub use lookup::{AccessSetLookup, AdminAccessLookup};
