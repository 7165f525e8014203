// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use core_model::schema::OperationKind;
use serde::Serialize;
use thiserror::Error;

/// A failure while resolving a single field.
///
/// Recorded in the execution context with the path of the field; the field's value becomes
/// `null` (or voids its parent when the field is non-null).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FieldError {
    #[error("Field '{field_name}' is not valid for type '{type_name}'")]
    FieldNotFound {
        type_name: String,
        field_name: String,
    },

    #[error("{0}")]
    InvalidSelection(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<ValidationDetail>,
    },

    #[error("Cannot return null for non-nullable field '{0}'")]
    NullForNonNullable(String),

    #[error("{0}")]
    Internal(String),
}

impl FieldError {
    pub fn internal(message: impl Into<String>) -> Self {
        FieldError::Internal(message.into())
    }
}

/// One failed input check, reported with `FieldError::Validation`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl ValidationDetail {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Failure of the execution as a whole
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecutionFailure {
    #[error("Schema does not define a {0} root")]
    MissingOperationRoot(OperationKind),
}
