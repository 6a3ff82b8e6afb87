// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes backend: dynamic resource clients and schema discovery.

pub mod client;
pub mod discovery;

pub use client::{DynamicResourceClient, KubeClientGetter};
pub use discovery::discover_schemas;
