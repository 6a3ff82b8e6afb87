// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Schema registration, templates and per-subject schema resolution.

pub mod builtin;
pub mod cache;
pub mod collection;
pub mod template;

pub use cache::SchemaCache;
pub use collection::Collection;
pub use template::{Customize, StoreFactory, Template};
