// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::error_formatter::FormattedError;

/// The response envelope: `{"data": ..., "errors": [...]}` with `errors` omitted when empty
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQLResponse {
    pub data: Option<Map<String, JsonValue>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FormattedError>,
}

impl GraphQLResponse {
    /// A response for a request that could not be executed at all
    pub fn failed(error: FormattedError) -> Self {
        Self {
            data: None,
            errors: vec![error],
        }
    }

    /// 200 without errors, otherwise the status of the first error
    pub fn status_code(&self) -> u16 {
        self.errors
            .first()
            .map(|error| error.status_code)
            .unwrap_or(200)
    }

    pub fn to_json(&self) -> Result<JsonValue, serde_json::Error> {
        serde_json::to_value(self)
    }
}
