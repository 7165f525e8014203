// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_recursion::async_recursion;
use common::context::RequestContext;
use core_model::{
    field_type::FieldType,
    primitive_type::PrimitiveType,
    schema::{FieldDefinition, ObjectType, Schema, TypeDefinition},
};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::{
    field_resolver::{FieldInput, ResolverBindings},
    validation::{field::ValidatedField, operation::ValidatedOperation},
};

use super::{
    arguments::coerce_arguments,
    context::{ExecutionContext, ExecutionError},
    error::{ExecutionFailure, FieldError},
    path::ResponsePath,
};

const TYPENAME_FIELD: &str = "__typename";

/// A non-null position ended up `null`, so the enclosing value must become `null` too.
struct NullPropagation;

#[derive(Debug)]
pub struct ExecutionResult {
    /// `None` when a failure propagated through non-null fields all the way to the root
    pub data: Option<Map<String, Value>>,
    pub errors: Vec<ExecutionError>,
}

/// Walks a validated operation against the schema, dispatching each field to its bound resolver.
pub struct Executor<'a> {
    schema: &'a Schema,
    bindings: &'a ResolverBindings,
}

impl<'a> Executor<'a> {
    pub fn new(schema: &'a Schema, bindings: &'a ResolverBindings) -> Self {
        Self { schema, bindings }
    }

    /// Execute the operation. Field level failures are collected in the result; only a missing
    /// operation root fails the execution as a whole.
    #[instrument(
        name = "Executor::execute",
        skip_all,
        fields(operation_name = ?operation.name, operation_type = %operation.typ)
    )]
    pub async fn execute(
        &self,
        operation: &ValidatedOperation,
        request_context: &RequestContext,
    ) -> Result<ExecutionResult, ExecutionFailure> {
        let root_type = self
            .schema
            .operation_root(operation.typ)
            .ok_or(ExecutionFailure::MissingOperationRoot(operation.typ))?;

        let mut execution_context = ExecutionContext::new(request_context);
        let root_value = Value::Object(Map::new());

        let data = self
            .execute_selection_set(
                root_type,
                &root_value,
                &operation.fields,
                &ResponsePath::root(),
                &mut execution_context,
            )
            .await;

        Ok(ExecutionResult {
            data,
            errors: execution_context.into_errors(),
        })
    }

    /// Resolve each field in document order. `None` if a non-null field failed.
    #[async_recursion]
    async fn execute_selection_set<'s, 'r>(
        &'s self,
        object_type: &'s ObjectType,
        parent: &'s Value,
        fields: &'s [ValidatedField],
        path: &'s ResponsePath,
        execution_context: &'s mut ExecutionContext<'r>,
    ) -> Option<Map<String, Value>> {
        let mut result = Map::new();

        for field in fields {
            let output_name = field.output_name();
            let field_path = path.with_key(&output_name);

            let value = self
                .execute_field(object_type, parent, field, &field_path, execution_context)
                .await
                .ok()?;

            result.insert(output_name, value);
        }

        Some(result)
    }

    async fn execute_field(
        &self,
        object_type: &ObjectType,
        parent: &Value,
        field: &ValidatedField,
        path: &ResponsePath,
        execution_context: &mut ExecutionContext<'_>,
    ) -> Result<Value, NullPropagation> {
        if field.name.as_str() == TYPENAME_FIELD {
            return Ok(Value::String(object_type.name.clone()));
        }

        let Some(field_definition) = object_type.field(field.name.as_str()) else {
            execution_context.record_error(
                FieldError::FieldNotFound {
                    type_name: object_type.name.clone(),
                    field_name: field.name.to_string(),
                },
                path,
            );
            return Ok(Value::Null);
        };

        let resolved = self
            .resolve_field(object_type, field_definition, parent, field, execution_context)
            .await;

        match resolved {
            Ok(value) => {
                self.complete_value(&field_definition.typ, value, field, path, execution_context)
                    .await
            }
            Err(error) => {
                execution_context.record_error(error, path);

                if field_definition.typ.is_nullable() {
                    Ok(Value::Null)
                } else {
                    Err(NullPropagation)
                }
            }
        }
    }

    /// Check the selection shape and arguments, then invoke the binding (or read the parent's
    /// property of the same name).
    async fn resolve_field(
        &self,
        object_type: &ObjectType,
        field_definition: &FieldDefinition,
        parent: &Value,
        field: &ValidatedField,
        execution_context: &ExecutionContext<'_>,
    ) -> Result<Value, FieldError> {
        self.check_selection(field_definition, field)?;

        let arguments = coerce_arguments(self.schema, field_definition, &field.arguments)?;

        match self.bindings.get(&object_type.name, &field_definition.name) {
            Some(resolver) => {
                resolver
                    .resolve(FieldInput {
                        parent_type: &object_type.name,
                        parent,
                        field,
                        arguments: &arguments,
                        request_context: execution_context.request_context,
                    })
                    .await
            }
            None => Ok(parent
                .get(field_definition.name.as_str())
                .cloned()
                .unwrap_or(Value::Null)),
        }
    }

    fn check_selection(
        &self,
        field_definition: &FieldDefinition,
        field: &ValidatedField,
    ) -> Result<(), FieldError> {
        let type_name = field_definition.typ.type_name();

        let is_leaf = self
            .schema
            .resolve_type(type_name)
            .map(|type_definition| type_definition.is_leaf())
            .ok_or_else(|| FieldError::internal(format!("Type '{type_name}' is not defined")))?;

        if is_leaf && !field.subfields.is_empty() {
            Err(FieldError::InvalidSelection(format!(
                "Field '{}' is of a scalar type, which should not specify fields",
                field.name
            )))
        } else if !is_leaf && field.subfields.is_empty() {
            Err(FieldError::InvalidSelection(format!(
                "Field '{}' of type '{}' must have a selection of subfields",
                field.name, field_definition.typ
            )))
        } else {
            Ok(())
        }
    }

    /// Shape a resolved value to the declared type, recursing into lists and objects.
    #[async_recursion]
    async fn complete_value<'s, 'r>(
        &'s self,
        typ: &'s FieldType,
        value: Value,
        field: &'s ValidatedField,
        path: &'s ResponsePath,
        execution_context: &'s mut ExecutionContext<'r>,
    ) -> Result<Value, NullPropagation> {
        match typ {
            FieldType::Optional(underlying) => {
                if value.is_null() {
                    return Ok(Value::Null);
                }

                // A nullable position absorbs failures of its non-null content
                Ok(self
                    .complete_value(underlying, value, field, path, execution_context)
                    .await
                    .unwrap_or(Value::Null))
            }
            _ if value.is_null() => {
                execution_context.record_error(
                    FieldError::NullForNonNullable(path.to_string()),
                    path,
                );
                Err(NullPropagation)
            }
            FieldType::List(underlying) => {
                let Value::Array(elements) = value else {
                    execution_context.record_error(
                        FieldError::internal(format!(
                            "Expected a list for field '{}', found a single value",
                            field.name
                        )),
                        path,
                    );
                    return Err(NullPropagation);
                };

                let mut completed = Vec::with_capacity(elements.len());
                for (index, element) in elements.into_iter().enumerate() {
                    completed.push(
                        self.complete_value(
                            underlying,
                            element,
                            field,
                            &path.with_index(index),
                            execution_context,
                        )
                        .await?,
                    );
                }

                Ok(Value::Array(completed))
            }
            FieldType::Plain(type_name) => match self.schema.resolve_type(type_name) {
                Some(TypeDefinition::Object(object_type)) => {
                    if !value.is_object() {
                        execution_context.record_error(
                            FieldError::internal(format!(
                                "Expected an object of type '{type_name}' for field '{}'",
                                field.name
                            )),
                            path,
                        );
                        return Err(NullPropagation);
                    }

                    self.execute_selection_set(
                        object_type,
                        &value,
                        &field.subfields,
                        path,
                        execution_context,
                    )
                    .await
                    .map(Value::Object)
                    .ok_or(NullPropagation)
                }
                leaf_type => match leaf_type.and_then(|typ| complete_leaf(typ, value)) {
                    Some(value) => Ok(value),
                    None => {
                        execution_context.record_error(
                            FieldError::internal(format!(
                                "Expected a value of type '{type_name}' for field '{}'",
                                field.name
                            )),
                            path,
                        );
                        Err(NullPropagation)
                    }
                },
            },
        }
    }
}

/// The value if it is a valid instance of the scalar or enum type, `None` otherwise.
fn complete_leaf(type_definition: &TypeDefinition, value: Value) -> Option<Value> {
    let valid = match type_definition {
        TypeDefinition::Scalar(scalar) => match scalar.primitive() {
            Some(primitive) => is_primitive_value(primitive, &value),
            // Custom scalars accept any value
            None => true,
        },
        TypeDefinition::Enum(enum_type) => match &value {
            Value::String(variant) => enum_type.values.contains(variant),
            _ => false,
        },
        TypeDefinition::Object(_) | TypeDefinition::InputObject(_) => false,
    };

    valid.then_some(value)
}

fn is_primitive_value(primitive: PrimitiveType, value: &Value) -> bool {
    match (primitive, value) {
        (PrimitiveType::Int, Value::Number(number)) => number
            .as_i64()
            .is_some_and(|number| i32::try_from(number).is_ok()),
        (PrimitiveType::Float, Value::Number(_)) => true,
        (PrimitiveType::String | PrimitiveType::Id, Value::String(_)) => true,
        (PrimitiveType::Boolean, Value::Bool(_)) => true,
        _ => false,
    }
}
