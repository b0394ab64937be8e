use crate::types::InterviewId;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Interview {0} does not exist")]
    NotFound(InterviewId),

    #[error("No interview id is left after {0}")]
    IdsExhausted(InterviewId),

    #[error("Failed to persist interviews: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

/// One or more draft fields are missing or malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid interview:")?;
        for (index, field) in self.fields.iter().enumerate() {
            let separator = if index == 0 { " " } else { ", " };
            write!(f, "{separator}{} {}", field.field, field.reason)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("This time slot conflicts with an existing interview")]
    Conflict,

    #[error(transparent)]
    Store(#[from] StoreError),
}
