// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutpostError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Schema ID is not set")]
    MissingSchemaId,

    #[error("Duplicate schema ID: {0}")]
    DuplicateSchema(String),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Mapper failed: {0}")]
    Mapper(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No store configured for schema {0}")]
    NoStore(String),
}

impl OutpostError {
    /// HTTP status code carried by the error, if the backend reported one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            OutpostError::KubeError(kube::Error::Api(err)) => Some(err.code),
            OutpostError::Api { status, .. } => Some(*status),
            OutpostError::NotFound(_) => Some(404),
            OutpostError::Conflict(_) => Some(409),
            _ => None,
        }
    }

    /// Optimistic-concurrency failure (resourceVersion mismatch).
    pub fn is_conflict(&self) -> bool {
        self.status_code() == Some(409)
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

pub type Result<T> = std::result::Result<T, OutpostError>;
