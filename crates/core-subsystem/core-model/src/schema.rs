// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::{Display, Formatter};

use async_graphql_value::ConstValue;
use indexmap::IndexMap;

use crate::{field_type::FieldType, primitive_type::PrimitiveType};

pub const QUERY_ROOT_TYPENAME: &str = "Query";
pub const MUTATION_ROOT_TYPENAME: &str = "Mutation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl OperationKind {
    pub fn default_root_name(&self) -> &'static str {
        match self {
            OperationKind::Query => QUERY_ROOT_TYPENAME,
            OperationKind::Mutation => MUTATION_ROOT_TYPENAME,
        }
    }
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::Query => f.write_str("query"),
            OperationKind::Mutation => f.write_str("mutation"),
        }
    }
}

/// A validated, immutable collection of type definitions.
///
/// Instances are created only through [`SchemaBuilder`](crate::builder::SchemaBuilder) (or
/// [`Schema::from_sdl`]), which guarantees that every referenced type exists.
#[derive(Debug, Clone)]
pub struct Schema {
    pub(crate) types: IndexMap<String, TypeDefinition>,
    pub(crate) query_root: Option<String>,
    pub(crate) mutation_root: Option<String>,
}

impl Schema {
    pub fn resolve_type(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    pub fn object_type(&self, name: &str) -> Option<&ObjectType> {
        match self.resolve_type(name) {
            Some(TypeDefinition::Object(object_type)) => Some(object_type),
            _ => None,
        }
    }

    pub fn input_object_type(&self, name: &str) -> Option<&InputObjectType> {
        match self.resolve_type(name) {
            Some(TypeDefinition::InputObject(input_type)) => Some(input_type),
            _ => None,
        }
    }

    /// The root object type for the kind of operation, if the schema declares one
    pub fn operation_root(&self, kind: OperationKind) -> Option<&ObjectType> {
        let root_name = match kind {
            OperationKind::Query => self.query_root.as_deref(),
            OperationKind::Mutation => self.mutation_root.as_deref(),
        };

        root_name.and_then(|name| self.object_type(name))
    }

    pub fn field(&self, type_name: &str, field_name: &str) -> Option<&FieldDefinition> {
        self.object_type(type_name)
            .and_then(|object_type| object_type.field(field_name))
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.types.values()
    }
}

#[derive(Debug, Clone)]
pub enum TypeDefinition {
    Scalar(ScalarType),
    Enum(EnumType),
    Object(ObjectType),
    InputObject(InputObjectType),
}

impl TypeDefinition {
    pub fn name(&self) -> &str {
        match self {
            TypeDefinition::Scalar(scalar) => &scalar.name,
            TypeDefinition::Enum(enum_type) => &enum_type.name,
            TypeDefinition::Object(object_type) => &object_type.name,
            TypeDefinition::InputObject(input_type) => &input_type.name,
        }
    }

    /// Scalars and enums: values of these types are returned as-is, without a selection set
    pub fn is_leaf(&self) -> bool {
        matches!(self, TypeDefinition::Scalar(_) | TypeDefinition::Enum(_))
    }

    pub fn is_input(&self) -> bool {
        !matches!(self, TypeDefinition::Object(_))
    }

    pub fn is_output(&self) -> bool {
        !matches!(self, TypeDefinition::InputObject(_))
    }
}

#[derive(Debug, Clone)]
pub struct ScalarType {
    pub name: String,
}

impl ScalarType {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The built-in scalar this type stands for, `None` for custom scalars
    pub fn primitive(&self) -> Option<PrimitiveType> {
        PrimitiveType::from_name(&self.name)
    }
}

#[derive(Debug, Clone)]
pub struct EnumType {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ObjectType {
    pub name: String,
    pub fields: Vec<FieldDefinition>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct InputObjectType {
    pub name: String,
    pub fields: Vec<ArgumentDefinition>,
}

impl InputObjectType {
    pub fn new(name: impl Into<String>, fields: Vec<ArgumentDefinition>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldDefinition {
    pub name: String,
    pub arguments: Vec<ArgumentDefinition>,
    pub typ: FieldType,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, typ: FieldType) -> Self {
        Self {
            name: name.into(),
            arguments: vec![],
            typ,
        }
    }

    pub fn with_argument(mut self, argument: ArgumentDefinition) -> Self {
        self.arguments.push(argument);
        self
    }
}

/// An argument of a field or a field of an input object.
#[derive(Debug, Clone)]
pub struct ArgumentDefinition {
    pub name: String,
    pub typ: FieldType,
    pub default_value: Option<ConstValue>,
}

impl ArgumentDefinition {
    pub fn new(name: impl Into<String>, typ: FieldType) -> Self {
        Self {
            name: name.into(),
            typ,
            default_value: None,
        }
    }

    pub fn with_default(mut self, default_value: ConstValue) -> Self {
        self.default_value = Some(default_value);
        self
    }
}
