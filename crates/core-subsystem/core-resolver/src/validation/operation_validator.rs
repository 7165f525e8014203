// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;

use async_graphql_parser::{
    Positioned,
    types::{FragmentDefinition, OperationDefinition, OperationType, VariableDefinition},
};
use async_graphql_value::{ConstValue, Name};
use core_model::schema::{OperationKind, Schema};
use serde_json::{Map, Value};

use crate::validation::validation_error::ValidationError;

use super::{operation::ValidatedOperation, selection_set_validator::SelectionSetValidator};

/// Context for validating an operation.
pub struct OperationValidator<'a> {
    schema: &'a Schema,
    operation_name: Option<String>,
    variables: Option<Map<String, Value>>,
    fragment_definitions: HashMap<Name, Positioned<FragmentDefinition>>,
    query_depth_limit: usize,
}

impl<'a> OperationValidator<'a> {
    #[must_use]
    pub fn new(
        schema: &'a Schema,
        operation_name: Option<String>,
        variables: Option<Map<String, Value>>,
        fragment_definitions: HashMap<Name, Positioned<FragmentDefinition>>,
        query_depth_limit: usize,
    ) -> Self {
        Self {
            schema,
            operation_name,
            variables,
            fragment_definitions,
            query_depth_limit,
        }
    }

    /// Validate operation. Operation defines a GraphQL top-level operation such
    /// as
    /// ```graphql
    ///    mutation create($title: String!) {
    ///       createPost(postInput: { title: $title }) {
    ///          id
    ///       }
    ///    }
    /// ```
    ///
    /// Validations performed:
    /// - The schema has a root for the kind of operation (subscriptions are never supported)
    /// - Each variable in [OperationDefinition.variable_definitions] has a value, either
    ///   supplied or defaulted (see [`Self::validate_variables`])
    /// - The selection set can be lowered (see [SelectionSetValidator])
    ///
    /// # Returns
    ///   A validated operation with all variables and fragments resolved.
    pub(super) fn validate(
        self,
        operation: Positioned<OperationDefinition>,
    ) -> Result<ValidatedOperation, ValidationError> {
        let kind = match operation.node.ty {
            OperationType::Query => OperationKind::Query,
            OperationType::Mutation => OperationKind::Mutation,
            OperationType::Subscription => {
                return Err(ValidationError::SubscriptionNotSupported(operation.pos));
            }
        };

        if self.schema.operation_root(kind).is_none() {
            return Err(ValidationError::OperationNotFound(
                kind.to_string(),
                operation.pos,
            ));
        }

        let variables = self.validate_variables(operation.node.variable_definitions)?;
        let selection_set_validator = SelectionSetValidator::new(
            &variables,
            &self.fragment_definitions,
            self.query_depth_limit,
        );

        let fields = selection_set_validator.validate(&operation.node.selection_set)?;

        Ok(ValidatedOperation {
            name: self.operation_name,
            typ: kind,
            fields,
        })
    }

    /// Validate variables.
    ///
    /// A declared variable takes the supplied value, then its default. A nullable variable with
    /// neither stays unset (`None`), so that arguments referring to it count as omitted. A
    /// non-null variable without a value is an error.
    ///
    /// # Returns
    ///   Resolved variables (note the output type uses `ConstValue` instead of
    ///   `Value` to indicate that the value has been resolved)
    fn validate_variables(
        &self,
        variable_definitions: Vec<Positioned<VariableDefinition>>,
    ) -> Result<HashMap<Name, Option<ConstValue>>, ValidationError> {
        variable_definitions
            .into_iter()
            .map(|variable_definition| {
                let variable_definition = variable_definition.node;
                let variable_name = variable_definition.name;

                let variable_value = match self.var_value(&variable_name)? {
                    Some(value) => Some(value),
                    None => match variable_definition.default_value {
                        Some(default_value) => Some(default_value.node),
                        None if variable_definition.var_type.node.nullable => None,
                        None => {
                            return Err(ValidationError::VariableNotFound(
                                variable_name.node.to_string(),
                                variable_name.pos,
                            ));
                        }
                    },
                };

                Ok((variable_name.node, variable_value))
            })
            .collect()
    }

    fn var_value(&self, name: &Positioned<Name>) -> Result<Option<ConstValue>, ValidationError> {
        let resolved = self
            .variables
            .as_ref()
            .and_then(|variables| variables.get(name.node.as_str()));

        resolved
            .map(|resolved| {
                ConstValue::from_json(resolved.to_owned()).map_err(|e| {
                    ValidationError::MalformedVariable(name.node.to_string(), name.pos, e)
                })
            })
            .transpose()
    }
}
