// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::{OutpostError, Result};
use crate::types::object::Data;

/// Converts between the API representation of an object and the backend one.
pub trait Mapper: Send + Sync {
    /// API → backend, applied to incoming documents before they are written.
    fn to_internal(&self, data: &mut Data) -> Result<()>;

    /// Backend → API, applied to every object returned to the caller.
    fn from_internal(&self, data: &mut Data);
}

/// Applies mappers in order on the way in and in reverse order on the way out.
pub struct Mappers(pub Vec<Box<dyn Mapper>>);

impl Mapper for Mappers {
    fn to_internal(&self, data: &mut Data) -> Result<()> {
        for mapper in &self.0 {
            mapper.to_internal(data)?;
        }
        Ok(())
    }

    fn from_internal(&self, data: &mut Data) {
        for mapper in self.0.iter().rev() {
            mapper.from_internal(data);
        }
    }
}

/// Moves a field between two top-level names. An incoming document carrying
/// both names is rejected.
pub struct Rename {
    pub api: String,
    pub internal: String,
}

impl Rename {
    pub fn new(api: &str, internal: &str) -> Self {
        Self {
            api: api.to_string(),
            internal: internal.to_string(),
        }
    }
}

impl Mapper for Rename {
    fn to_internal(&self, data: &mut Data) -> Result<()> {
        if data.contains_key(&self.api) && data.contains_key(&self.internal) {
            return Err(OutpostError::Mapper(format!(
                "both {} and {} are set",
                self.api, self.internal
            )));
        }
        if let Some(value) = data.remove(&self.api) {
            data.insert(self.internal.clone(), value);
        }
        Ok(())
    }

    fn from_internal(&self, data: &mut Data) {
        if let Some(value) = data.remove(&self.internal) {
            data.insert(self.api.clone(), value);
        }
    }
}
