//! Error types for estimation and project operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name as it appears in the JSON body (camelCase).
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by the calculator and the project service.
#[derive(Debug, Error)]
pub enum EstimateError {
    /// One or more required fields are missing or out of range.
    #[error("invalid input: {}", describe_fields(.0))]
    Validation(Vec<FieldError>),

    /// The request could not be read at all: unparseable JSON, a body that is
    /// not an object, or a malformed path parameter.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("unknown material grade '{0}'")]
    UnknownMaterialGrade(String),

    /// The estimate does not fit in a 64-bit currency amount.
    #[error("estimate exceeds the supported cost range")]
    CostOverflow,

    #[error("project {0} not found")]
    NotFound(Uuid),

    /// Underlying persistence failure. Details stay server-side.
    #[error("storage failure")]
    Storage(#[source] anyhow::Error),
}

impl EstimateError {
    /// Names of the offending fields, empty for non-validation errors.
    pub fn field_names(&self) -> Vec<&str> {
        match self {
            Self::Validation(fields) => fields.iter().map(|f| f.field.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

impl From<anyhow::Error> for EstimateError {
    fn from(e: anyhow::Error) -> Self {
        Self::Storage(e)
    }
}

fn describe_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{} {}", f.field, f.reason))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result alias for estimator operations.
pub type EstimateResult<T> = Result<T, EstimateError>;
