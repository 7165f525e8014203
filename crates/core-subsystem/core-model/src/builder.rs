// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::{
    error::SchemaError,
    field_type::FieldType,
    primitive_type::PrimitiveType,
    schema::{
        ArgumentDefinition, FieldDefinition, ObjectType, OperationKind, ScalarType, Schema,
        TypeDefinition,
    },
};

/// Collects type definitions and checks them as a whole in [`SchemaBuilder::build`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    types: Vec<TypeDefinition>,
    query_root: Option<String>,
    mutation_root: Option<String>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define_type(mut self, type_definition: TypeDefinition) -> Self {
        self.types.push(type_definition);
        self
    }

    /// Define the root object type for `kind` (named `Query` or `Mutation`) with the given
    /// operations as its fields
    pub fn define_operation_root(self, kind: OperationKind, fields: Vec<FieldDefinition>) -> Self {
        let root_name = kind.default_root_name();

        self.define_type(TypeDefinition::Object(ObjectType::new(root_name, fields)))
            .set_operation_root(kind, root_name)
    }

    /// Use an already defined object type as the root for `kind`
    pub fn set_operation_root(mut self, kind: OperationKind, type_name: impl Into<String>) -> Self {
        match kind {
            OperationKind::Query => self.query_root = Some(type_name.into()),
            OperationKind::Mutation => self.mutation_root = Some(type_name.into()),
        }
        self
    }

    pub(crate) fn has_operation_root(&self, kind: OperationKind) -> bool {
        match kind {
            OperationKind::Query => self.query_root.is_some(),
            OperationKind::Mutation => self.mutation_root.is_some(),
        }
    }

    pub(crate) fn defines(&self, type_name: &str) -> bool {
        self.types.iter().any(|td| td.name() == type_name)
    }

    /// Check the collected definitions and produce the immutable schema.
    ///
    /// Checks performed:
    /// - Type names are unique (built-in scalars included)
    /// - Field names are unique per type and argument names unique per field
    /// - Every referenced type exists
    /// - Fields return output types; arguments and input fields take input types
    /// - Operation roots are object types
    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut types: IndexMap<String, TypeDefinition> = PrimitiveType::ALL
            .into_iter()
            .map(|primitive| {
                (
                    primitive.name().to_string(),
                    TypeDefinition::Scalar(ScalarType::new(primitive.name())),
                )
            })
            .collect();

        for type_definition in self.types {
            let name = type_definition.name().to_string();
            check_unique_members(&type_definition)?;

            if types.insert(name.clone(), type_definition).is_some() {
                return Err(SchemaError::DuplicateType(name));
            }
        }

        for type_definition in types.values() {
            check_references(type_definition, &types)?;
        }

        for (kind, root) in [
            (OperationKind::Query, &self.query_root),
            (OperationKind::Mutation, &self.mutation_root),
        ] {
            if let Some(root) = root {
                match types.get(root) {
                    Some(TypeDefinition::Object(_)) => {}
                    Some(_) => {
                        return Err(SchemaError::InvalidOperationRoot {
                            kind: kind.to_string(),
                            type_name: root.clone(),
                        });
                    }
                    None => {
                        return Err(SchemaError::UndefinedType {
                            type_name: root.clone(),
                            referenced_by: format!("the {kind} root"),
                        });
                    }
                }
            }
        }

        Ok(Schema {
            types,
            query_root: self.query_root,
            mutation_root: self.mutation_root,
        })
    }
}

fn check_unique_members(type_definition: &TypeDefinition) -> Result<(), SchemaError> {
    match type_definition {
        TypeDefinition::Object(object_type) => {
            let mut seen = HashSet::new();
            for field in &object_type.fields {
                if !seen.insert(field.name.as_str()) {
                    return Err(SchemaError::DuplicateField {
                        type_name: object_type.name.clone(),
                        field_name: field.name.clone(),
                    });
                }
                check_unique_arguments(&object_type.name, field)?;
            }
            Ok(())
        }
        TypeDefinition::InputObject(input_type) => {
            let mut seen = HashSet::new();
            for field in &input_type.fields {
                if !seen.insert(field.name.as_str()) {
                    return Err(SchemaError::DuplicateField {
                        type_name: input_type.name.clone(),
                        field_name: field.name.clone(),
                    });
                }
            }
            Ok(())
        }
        TypeDefinition::Scalar(_) | TypeDefinition::Enum(_) => Ok(()),
    }
}

fn check_unique_arguments(type_name: &str, field: &FieldDefinition) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for argument in &field.arguments {
        if !seen.insert(argument.name.as_str()) {
            return Err(SchemaError::DuplicateArgument {
                field_name: format!("{type_name}.{}", field.name),
                argument_name: argument.name.clone(),
            });
        }
    }
    Ok(())
}

fn check_references(
    type_definition: &TypeDefinition,
    types: &IndexMap<String, TypeDefinition>,
) -> Result<(), SchemaError> {
    match type_definition {
        TypeDefinition::Object(object_type) => {
            for field in &object_type.fields {
                let referenced_by = format!("{}.{}", object_type.name, field.name);
                check_output_type(&field.typ, &referenced_by, types)?;

                for argument in &field.arguments {
                    check_input_type(
                        argument,
                        &format!("{referenced_by}({}:)", argument.name),
                        types,
                    )?;
                }
            }
            Ok(())
        }
        TypeDefinition::InputObject(input_type) => {
            for field in &input_type.fields {
                check_input_type(field, &format!("{}.{}", input_type.name, field.name), types)?;
            }
            Ok(())
        }
        TypeDefinition::Scalar(_) | TypeDefinition::Enum(_) => Ok(()),
    }
}

fn check_output_type(
    typ: &FieldType,
    referenced_by: &str,
    types: &IndexMap<String, TypeDefinition>,
) -> Result<(), SchemaError> {
    let type_name = typ.type_name();

    match types.get(type_name) {
        Some(td) if td.is_output() => Ok(()),
        Some(_) => Err(SchemaError::InvalidOutputType {
            type_name: type_name.to_string(),
            referenced_by: referenced_by.to_string(),
        }),
        None => Err(SchemaError::UndefinedType {
            type_name: type_name.to_string(),
            referenced_by: referenced_by.to_string(),
        }),
    }
}

fn check_input_type(
    argument: &ArgumentDefinition,
    referenced_by: &str,
    types: &IndexMap<String, TypeDefinition>,
) -> Result<(), SchemaError> {
    let type_name = argument.typ.type_name();

    match types.get(type_name) {
        Some(td) if td.is_input() => Ok(()),
        Some(_) => Err(SchemaError::InvalidInputType {
            type_name: type_name.to_string(),
            referenced_by: referenced_by.to_string(),
        }),
        None => Err(SchemaError::UndefinedType {
            type_name: type_name.to_string(),
            referenced_by: referenced_by.to_string(),
        }),
    }
}
