// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::Deserialize;
use serde_json::{Map, Value};

/// The body of a GraphQL request
#[derive(Debug, Clone, PartialEq)]
pub struct OperationsPayload {
    pub operation_name: Option<String>,
    pub query: Option<String>,
    pub variables: Option<Map<String, Value>>,
}

impl OperationsPayload {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            operation_name: None,
            query: Some(query.into()),
            variables: None,
        }
    }

    pub fn with_variables(mut self, variables: Value) -> Self {
        self.variables = match variables {
            Value::Object(variables) => Some(variables),
            _ => None,
        };
        self
    }

    pub fn from_json(json: Value) -> Result<Self, serde_json::Error> {
        #[derive(Debug, Deserialize)]
        struct RawOperationsPayload {
            #[serde(rename = "operationName")]
            operation_name: Option<String>,
            query: Option<String>,
            // Clients commonly send `"variables": null`
            #[serde(default)]
            variables: Option<Value>,
        }

        let raw_payload = serde_json::from_value::<RawOperationsPayload>(json)?;

        let variables = match raw_payload.variables {
            None | Some(Value::Null) => None,
            Some(Value::Object(variables)) => Some(variables),
            Some(_) => {
                return Err(serde::de::Error::custom(
                    "variables must be an object or null",
                ));
            }
        };

        Ok(OperationsPayload {
            operation_name: raw_payload.operation_name,
            query: raw_payload.query,
            variables,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn full_payload() {
        let payload = OperationsPayload::from_json(json!({
            "operationName": "Login",
            "query": "query Login { login(email: \"a@b.c\", password: \"secret\") { token } }",
            "variables": {"page": 2}
        }))
        .unwrap();

        assert_eq!(payload.operation_name.as_deref(), Some("Login"));
        assert_eq!(
            payload.variables.unwrap().get("page"),
            Some(&json!(2))
        );
    }

    #[test]
    fn null_variables() {
        let payload = OperationsPayload::from_json(json!({
            "query": "{ user { id } }",
            "variables": null
        }))
        .unwrap();

        assert_eq!(payload.variables, None);
        assert_eq!(payload.operation_name, None);
    }

    #[test]
    fn non_object_variables() {
        assert!(
            OperationsPayload::from_json(json!({"query": "{ a }", "variables": [1]})).is_err()
        );
        assert!(OperationsPayload::from_json(json!("{ a }")).is_err());
    }
}
