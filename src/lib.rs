// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod accesscontrol;
pub mod config;
pub mod constants;
pub mod error;
pub mod kubernetes;
pub mod schema;
pub mod store;
pub mod types;

#[cfg(test)]
mod test_utils;
