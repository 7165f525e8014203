// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use async_graphql_parser::{Pos, types::ExecutableDocument};
use core_model::schema::Schema;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, instrument};

use common::context::RequestContext;
use common::operation_payload::OperationsPayload;

use crate::{
    BindingError, GraphQLResponse, ResolverBindings,
    error_formatter::{format_field_error, format_system_error},
    execution::{ExecutionFailure, Executor},
    validation::{
        document_validator::DocumentValidator, operation::ValidatedOperation,
        validation_error::ValidationError,
    },
};

/// The top-level system resolver.
///
/// Validates incoming documents and hands them to the [`Executor`]. Shared by all requests.
pub struct GraphQLSystemResolver {
    pub schema: Arc<Schema>,
    bindings: Arc<ResolverBindings>,
    query_depth_limit: usize,
}

impl GraphQLSystemResolver {
    /// Fails if the bindings do not fit the schema
    pub fn new(
        schema: Arc<Schema>,
        bindings: Arc<ResolverBindings>,
        query_depth_limit: usize,
    ) -> Result<Self, BindingError> {
        bindings.validate(&schema)?;

        Ok(Self {
            schema,
            bindings,
            query_depth_limit,
        })
    }

    /// Resolve the operation in the payload into a response envelope.
    ///
    /// Document level problems produce `data: null` and a single error. Field level problems
    /// are reported alongside whatever data could be resolved.
    #[instrument(
        name = "SystemResolver::resolve_operations"
        skip_all
        )]
    pub async fn resolve_operations(
        &self,
        operations_payload: OperationsPayload,
        request_context: &RequestContext,
    ) -> GraphQLResponse {
        match self.resolve(operations_payload, request_context).await {
            Ok(response) => response,
            Err(error) => {
                error!(%error, "Failed to resolve operation");
                GraphQLResponse::failed(format_system_error(&error))
            }
        }
    }

    async fn resolve(
        &self,
        operations_payload: OperationsPayload,
        request_context: &RequestContext,
    ) -> Result<GraphQLResponse, SystemResolutionError> {
        let operation = self.validate_operation(
            operations_payload.query.as_deref(),
            operations_payload.operation_name,
            operations_payload.variables,
        )?;

        let result = Executor::new(&self.schema, &self.bindings)
            .execute(&operation, request_context)
            .await?;

        Ok(GraphQLResponse {
            data: result.data,
            errors: result
                .errors
                .iter()
                .map(|error| format_field_error(&error.error))
                .collect(),
        })
    }

    #[instrument(skip_all)]
    fn validate_operation(
        &self,
        query: Option<&str>,
        operation_name: Option<String>,
        variables: Option<Map<String, Value>>,
    ) -> Result<ValidatedOperation, ValidationError> {
        let document = parse_query(query.ok_or(ValidationError::MissingQuery)?)?;

        let document_validator = DocumentValidator::new(
            &self.schema,
            operation_name,
            variables,
            self.query_depth_limit,
        );

        document_validator.validate(document)
    }
}

#[instrument(name = "system_resolver::parse_query")]
fn parse_query(query: &str) -> Result<ExecutableDocument, ValidationError> {
    async_graphql_parser::parse_query(query).map_err(|error| {
        error!(%error, "Failed to parse query");
        let (message, pos1, pos2) = match error {
            async_graphql_parser::Error::Syntax {
                message,
                start,
                end,
            } => (format!("Syntax error: {}", message.trim()), start, end),
            async_graphql_parser::Error::MultipleOperations {
                anonymous,
                operation,
            } => (
                "Multiple operations".to_string(),
                anonymous,
                Some(operation),
            ),
            async_graphql_parser::Error::OperationDuplicated {
                operation: _,
                first,
                second,
            } => ("Operation duplicated".to_string(), first, Some(second)),
            async_graphql_parser::Error::FragmentDuplicated {
                fragment,
                first,
                second,
            } => (
                format!("Fragment {fragment} duplicated"),
                first,
                Some(second),
            ),
            async_graphql_parser::Error::MissingOperation => {
                ("Missing operation".to_string(), Pos::default(), None)
            }
            _ => ("Unknown error".to_string(), Pos::default(), None),
        };

        ValidationError::QueryParsingFailed(message, pos1, pos2)
    })
}

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Invalid body JSON {0}")]
    InvalidBodyJson(serde_json::Error),
}

#[derive(Error, Debug)]
pub enum SystemResolutionError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Execution(#[from] ExecutionFailure),

    #[error("{0}")]
    RequestError(#[from] RequestError),
}

impl SystemResolutionError {
    pub fn user_error_message(&self) -> String {
        match self {
            SystemResolutionError::Validation(error) => error.to_string(),
            SystemResolutionError::Execution(error) => error.to_string(),
            SystemResolutionError::RequestError(_) => "Invalid request".to_string(),
        }
    }
}
