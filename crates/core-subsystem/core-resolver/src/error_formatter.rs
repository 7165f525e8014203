// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Turn errors into the `{message, statusCode, detail?}` shape clients receive.

use serde::Serialize;

use crate::{
    execution::{FieldError, ValidationDetail},
    system_resolver::SystemResolutionError,
};

/// Used when an error carries no status code of its own
pub const DEFAULT_STATUS_CODE: u16 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedError {
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Vec<ValidationDetail>>,
}

/// The status code a field error stands for, `None` for unclassified errors
pub fn status_code(error: &FieldError) -> Option<u16> {
    match error {
        FieldError::FieldNotFound { .. }
        | FieldError::InvalidSelection(_)
        | FieldError::InvalidArgument(_) => Some(400),
        FieldError::Unauthenticated(_) => Some(401),
        FieldError::Forbidden(_) => Some(403),
        FieldError::NotFound(_) => Some(404),
        FieldError::Conflict(_) => Some(409),
        FieldError::Validation { .. } => Some(422),
        FieldError::NullForNonNullable(_) | FieldError::Internal(_) => None,
    }
}

pub fn format_field_error(error: &FieldError) -> FormattedError {
    let detail = match error {
        FieldError::Validation { details, .. } => Some(details.clone()),
        _ => None,
    };

    FormattedError {
        message: error.to_string(),
        status_code: status_code(error).unwrap_or(DEFAULT_STATUS_CODE),
        detail,
    }
}

/// Errors that abort the whole request are problems with what the client sent
pub fn format_system_error(error: &SystemResolutionError) -> FormattedError {
    FormattedError {
        message: error.user_error_message(),
        status_code: 400,
        detail: None,
    }
}
