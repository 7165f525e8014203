// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use common::context::RequestContext;
use tracing::{error, warn};

use super::{error::FieldError, path::ResponsePath};

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionError {
    pub error: FieldError,
    pub path: ResponsePath,
}

/// State of one execution: the caller's context and the errors recorded so far, in the order
/// they occurred.
pub struct ExecutionContext<'r> {
    pub request_context: &'r RequestContext,
    errors: Vec<ExecutionError>,
}

impl<'r> ExecutionContext<'r> {
    pub fn new(request_context: &'r RequestContext) -> Self {
        Self {
            request_context,
            errors: vec![],
        }
    }

    pub fn record_error(&mut self, error: FieldError, path: &ResponsePath) {
        match &error {
            FieldError::Internal(_) | FieldError::NullForNonNullable(_) => {
                error!(%path, %error, "Field resolution failed");
            }
            _ => {
                warn!(%path, %error, "Field resolution failed");
            }
        }

        self.errors.push(ExecutionError {
            error,
            path: path.clone(),
        });
    }

    pub fn into_errors(self) -> Vec<ExecutionError> {
        self.errors
    }
}
