// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_parser::{
    Positioned,
    types::{self as ast, TypeKind, TypeSystemDefinition},
};

use crate::{
    builder::SchemaBuilder,
    error::SchemaError,
    field_type::FieldType,
    schema::{
        ArgumentDefinition, EnumType, FieldDefinition, InputObjectType, ObjectType, OperationKind,
        ScalarType, Schema, TypeDefinition,
    },
};

impl Schema {
    /// Build a schema from GraphQL SDL.
    ///
    /// Operation roots come from a `schema { query: ..., mutation: ... }` block if one is
    /// present, otherwise from object types named `Query` and `Mutation`.
    pub fn from_sdl(sdl: &str) -> Result<Schema, SchemaError> {
        let document =
            async_graphql_parser::parse_schema(sdl).map_err(|e| SchemaError::Parse(e.to_string()))?;

        let mut builder = SchemaBuilder::new();

        for definition in document.definitions {
            match definition {
                TypeSystemDefinition::Schema(schema_definition) => {
                    let schema_definition = schema_definition.node;
                    if schema_definition.subscription.is_some() {
                        return Err(SchemaError::UnsupportedDefinition(
                            "subscription root".to_string(),
                        ));
                    }
                    if let Some(query) = schema_definition.query {
                        builder =
                            builder.set_operation_root(OperationKind::Query, query.node.as_str());
                    }
                    if let Some(mutation) = schema_definition.mutation {
                        builder = builder
                            .set_operation_root(OperationKind::Mutation, mutation.node.as_str());
                    }
                }
                TypeSystemDefinition::Type(type_definition) => {
                    builder = builder.define_type(convert_type_definition(type_definition.node)?);
                }
                TypeSystemDefinition::Directive(directive) => {
                    return Err(SchemaError::UnsupportedDefinition(format!(
                        "directive @{}",
                        directive.node.name.node
                    )));
                }
            }
        }

        for kind in [OperationKind::Query, OperationKind::Mutation] {
            if !builder.has_operation_root(kind) && builder.defines(kind.default_root_name()) {
                builder = builder.set_operation_root(kind, kind.default_root_name());
            }
        }

        builder.build()
    }
}

fn convert_type_definition(
    type_definition: ast::TypeDefinition,
) -> Result<TypeDefinition, SchemaError> {
    let name = type_definition.name.node.to_string();

    if type_definition.extend {
        return Err(SchemaError::UnsupportedDefinition(format!(
            "type extension of '{name}'"
        )));
    }

    match type_definition.kind {
        TypeKind::Scalar => Ok(TypeDefinition::Scalar(ScalarType::new(name))),
        TypeKind::Enum(enum_type) => Ok(TypeDefinition::Enum(EnumType {
            name,
            values: enum_type
                .values
                .into_iter()
                .map(|value| value.node.value.node.to_string())
                .collect(),
        })),
        TypeKind::Object(object_type) => Ok(TypeDefinition::Object(ObjectType::new(
            name,
            object_type
                .fields
                .into_iter()
                .map(|field| convert_field(field.node))
                .collect(),
        ))),
        TypeKind::InputObject(input_type) => {
            Ok(TypeDefinition::InputObject(InputObjectType::new(
                name,
                input_type
                    .fields
                    .into_iter()
                    .map(convert_input_value)
                    .collect(),
            )))
        }
        TypeKind::Interface(_) => Err(SchemaError::UnsupportedDefinition(format!(
            "interface '{name}'"
        ))),
        TypeKind::Union(_) => Err(SchemaError::UnsupportedDefinition(format!(
            "union '{name}'"
        ))),
    }
}

fn convert_field(field: ast::FieldDefinition) -> FieldDefinition {
    FieldDefinition {
        name: field.name.node.to_string(),
        arguments: field.arguments.into_iter().map(convert_input_value).collect(),
        typ: FieldType::from_parser_type(&field.ty.node),
    }
}

fn convert_input_value(input_value: Positioned<ast::InputValueDefinition>) -> ArgumentDefinition {
    let input_value = input_value.node;

    ArgumentDefinition {
        name: input_value.name.node.to_string(),
        typ: FieldType::from_parser_type(&input_value.ty.node),
        default_value: input_value.default_value.map(|value| value.node),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOG_SDL: &str = r#"
        type Post {
            id: ID!
            title: String!
            creator: User!
        }

        type User {
            id: ID!
            email: String!
            posts: [Post!]!
        }

        input PostInput {
            title: String!
            tags: [String!] = []
        }

        type RootQuery {
            posts(page: Int): [Post!]!
        }

        type RootMutation {
            createPost(postInput: PostInput): Post!
        }

        schema {
            query: RootQuery
            mutation: RootMutation
        }
    "#;

    #[test]
    fn roots_from_schema_block() {
        let schema = Schema::from_sdl(BLOG_SDL).unwrap();

        assert_eq!(
            schema.operation_root(OperationKind::Query).unwrap().name,
            "RootQuery"
        );
        assert_eq!(
            schema.operation_root(OperationKind::Mutation).unwrap().name,
            "RootMutation"
        );

        let create_post = schema.field("RootMutation", "createPost").unwrap();
        assert_eq!(create_post.arguments[0].name, "postInput");
        assert!(create_post.arguments[0].typ.is_nullable());

        let input = schema.input_object_type("PostInput").unwrap();
        assert_eq!(
            input.fields[1].default_value,
            Some(async_graphql_value::ConstValue::List(vec![]))
        );
    }

    #[test]
    fn default_root_names() {
        let schema = Schema::from_sdl(
            r#"
            type Query { hello: String }
            "#,
        )
        .unwrap();

        assert!(schema.operation_root(OperationKind::Query).is_some());
        assert!(schema.operation_root(OperationKind::Mutation).is_none());
    }

    #[test]
    fn dangling_reference_in_sdl() {
        let result = Schema::from_sdl(
            r#"
            type Query { post: Post }
            "#,
        );

        assert!(matches!(result, Err(SchemaError::UndefinedType { .. })));
    }

    #[test]
    fn duplicate_field_in_sdl() {
        let result = Schema::from_sdl(
            r#"
            type Query {
                hello: String
                hello: Int
            }
            "#,
        );

        assert!(matches!(result, Err(SchemaError::DuplicateField { .. })));
    }

    #[test]
    fn unsupported_definitions() {
        assert!(matches!(
            Schema::from_sdl("interface Node { id: ID! }"),
            Err(SchemaError::UnsupportedDefinition(_))
        ));
        assert!(matches!(
            Schema::from_sdl("type Query { a: Int"),
            Err(SchemaError::Parse(_))
        ));
    }
}
