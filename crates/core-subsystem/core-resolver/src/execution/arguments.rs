// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_value::{ConstValue, Name, indexmap::IndexMap};
use core_model::{
    field_type::FieldType,
    primitive_type::PrimitiveType,
    schema::{ArgumentDefinition, FieldDefinition, Schema, TypeDefinition},
};
use serde::de::DeserializeOwned;

use super::error::FieldError;

/// Arguments of a field after coercion against its definition.
///
/// Defaults are applied, so an absent argument was both omitted by the caller and nullable
/// without a default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: IndexMap<String, ConstValue>,
}

impl Arguments {
    pub fn new(values: IndexMap<String, ConstValue>) -> Self {
        Self { values }
    }

    pub fn raw(&self, name: &str) -> Option<&ConstValue> {
        self.values.get(name)
    }

    /// Deserialize an argument. Absent and `null` arguments are both `None`.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, FieldError> {
        match self.values.get(name) {
            None | Some(ConstValue::Null) => Ok(None),
            Some(value) => {
                let json = value.clone().into_json().map_err(|e| {
                    FieldError::InvalidArgument(format!("Argument '{name}' is malformed: {e}"))
                })?;

                serde_json::from_value(json).map(Some).map_err(|e| {
                    FieldError::InvalidArgument(format!("Argument '{name}' is malformed: {e}"))
                })
            }
        }
    }

    pub fn require<T: DeserializeOwned>(&self, name: &str) -> Result<T, FieldError> {
        self.get(name)?.ok_or_else(|| {
            FieldError::InvalidArgument(format!("Required argument '{name}' not found"))
        })
    }
}

/// Coerce the supplied arguments of a field against its definition.
///
/// Checks performed:
/// - No argument is supplied that the field does not declare
/// - Every non-null argument without a default is supplied
/// - Each value matches its declared type (input objects are checked field by field)
///
/// A single value supplied for a list type becomes a one-element list.
pub(crate) fn coerce_arguments(
    schema: &Schema,
    field_definition: &FieldDefinition,
    supplied: &IndexMap<String, ConstValue>,
) -> Result<Arguments, FieldError> {
    let stray_arguments: Vec<&str> = supplied
        .keys()
        .filter(|name| {
            !field_definition
                .arguments
                .iter()
                .any(|argument| &argument.name == *name)
        })
        .map(|name| name.as_str())
        .collect();

    if !stray_arguments.is_empty() {
        return Err(FieldError::InvalidArgument(format!(
            "Argument(s) '{}' invalid for '{}'",
            stray_arguments.join(", "),
            field_definition.name
        )));
    }

    let mut values = IndexMap::new();

    for argument in &field_definition.arguments {
        let supplied_value = supplied.get(&argument.name);

        if let Some(value) = coerce_input(schema, argument, supplied_value, &argument.name)? {
            values.insert(argument.name.clone(), value);
        }
    }

    Ok(Arguments::new(values))
}

/// Coerce one argument or input object field. `None` means the input stays absent.
fn coerce_input(
    schema: &Schema,
    definition: &ArgumentDefinition,
    supplied: Option<&ConstValue>,
    path: &str,
) -> Result<Option<ConstValue>, FieldError> {
    match supplied.or(definition.default_value.as_ref()) {
        Some(value) => coerce_value(schema, &definition.typ, value, path).map(Some),
        None if definition.typ.is_nullable() => Ok(None),
        None => Err(FieldError::InvalidArgument(format!(
            "Required argument '{path}' not found"
        ))),
    }
}

fn coerce_value(
    schema: &Schema,
    typ: &FieldType,
    value: &ConstValue,
    path: &str,
) -> Result<ConstValue, FieldError> {
    match (typ, value) {
        (FieldType::Optional(_), ConstValue::Null) => Ok(ConstValue::Null),
        (FieldType::Optional(underlying), _) => coerce_value(schema, underlying, value, path),
        (_, ConstValue::Null) => Err(invalid_type(path, typ, value)),
        (FieldType::List(underlying), ConstValue::List(elements)) => elements
            .iter()
            .enumerate()
            .map(|(index, element)| {
                coerce_value(schema, underlying, element, &format!("{path}[{index}]"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(ConstValue::List),
        (FieldType::List(underlying), _) => {
            Ok(ConstValue::List(vec![coerce_value(schema, underlying, value, path)?]))
        }
        (FieldType::Plain(type_name), _) => match schema.resolve_type(type_name) {
            Some(TypeDefinition::Scalar(scalar)) => match scalar.primitive() {
                Some(primitive) => coerce_primitive(primitive, value)
                    .ok_or_else(|| invalid_type(path, typ, value)),
                // Custom scalars accept any value
                None => Ok(value.clone()),
            },
            Some(TypeDefinition::Enum(enum_type)) => {
                let variant = match value {
                    ConstValue::Enum(name) => Some(name.as_str()),
                    ConstValue::String(name) => Some(name.as_str()),
                    _ => None,
                };

                match variant {
                    Some(variant) if enum_type.values.iter().any(|v| v == variant) => {
                        Ok(ConstValue::Enum(Name::new(variant)))
                    }
                    _ => Err(invalid_type(path, typ, value)),
                }
            }
            Some(TypeDefinition::InputObject(input_type)) => match value {
                ConstValue::Object(fields) => {
                    let stray_fields: Vec<&str> = fields
                        .keys()
                        .filter(|name| {
                            !input_type
                                .fields
                                .iter()
                                .any(|field| field.name == name.as_str())
                        })
                        .map(|name| name.as_str())
                        .collect();

                    if !stray_fields.is_empty() {
                        return Err(FieldError::InvalidArgument(format!(
                            "Field(s) '{}' invalid for input '{}' in argument '{path}'",
                            stray_fields.join(", "),
                            input_type.name
                        )));
                    }

                    let mut coerced = IndexMap::new();
                    for field in &input_type.fields {
                        let supplied = fields.get(field.name.as_str());
                        let field_path = format!("{path}.{}", field.name);

                        if let Some(value) = coerce_input(schema, field, supplied, &field_path)? {
                            coerced.insert(Name::new(&field.name), value);
                        }
                    }

                    Ok(ConstValue::Object(coerced))
                }
                _ => Err(invalid_type(path, typ, value)),
            },
            Some(TypeDefinition::Object(_)) | None => Err(FieldError::internal(format!(
                "Argument '{path}' has the non-input type '{type_name}'"
            ))),
        },
    }
}

fn coerce_primitive(primitive: PrimitiveType, value: &ConstValue) -> Option<ConstValue> {
    match (primitive, value) {
        (PrimitiveType::Int, ConstValue::Number(number)) => number
            .as_i64()
            .filter(|n| i32::try_from(*n).is_ok())
            .map(|_| value.clone()),
        (PrimitiveType::Float, ConstValue::Number(_)) => Some(value.clone()),
        (PrimitiveType::String, ConstValue::String(_)) => Some(value.clone()),
        (PrimitiveType::Boolean, ConstValue::Boolean(_)) => Some(value.clone()),
        (PrimitiveType::Id, ConstValue::String(_)) => Some(value.clone()),
        (PrimitiveType::Id, ConstValue::Number(number)) if number.is_i64() || number.is_u64() => {
            Some(ConstValue::String(number.to_string()))
        }
        _ => None,
    }
}

fn invalid_type(path: &str, expected: &FieldType, actual: &ConstValue) -> FieldError {
    FieldError::InvalidArgument(format!(
        "Argument '{path}' is not of a valid type. Expected '{expected}', got '{}'",
        value_kind(actual)
    ))
}

fn value_kind(value: &ConstValue) -> &'static str {
    match value {
        ConstValue::Null => "null",
        ConstValue::Number(number) if number.is_f64() => "Float",
        ConstValue::Number(_) => "Int",
        ConstValue::String(_) => "String",
        ConstValue::Boolean(_) => "Boolean",
        ConstValue::Binary(_) => "Binary",
        ConstValue::Enum(_) => "Enum",
        ConstValue::List(_) => "List",
        ConstValue::Object(_) => "Object",
    }
}
