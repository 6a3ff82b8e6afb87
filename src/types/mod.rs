// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Core API types: schemas, objects, requests and mappers.

pub mod mapper;
pub mod object;
pub mod request;
pub mod schema;

pub use mapper::Mapper;
pub use object::{ApiObject, ApiObjectList, Data};
pub use request::{ApiRequest, UserInfo};
pub use schema::{Formatter, Schema, SchemaAttributes, SchemaSet};
