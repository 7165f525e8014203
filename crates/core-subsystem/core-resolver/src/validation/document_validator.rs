// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_parser::types::{DocumentOperations, ExecutableDocument};
use async_graphql_value::Name;
use core_model::schema::Schema;
use serde_json::{Map, Value};
use tracing::instrument;

use crate::validation::validation_error::ValidationError;

use super::{operation::ValidatedOperation, operation_validator::OperationValidator};

/// Context for validating a document.
pub struct DocumentValidator<'a> {
    schema: &'a Schema,
    operation_name: Option<String>,
    variables: Option<Map<String, Value>>,
    query_depth_limit: usize,
}

impl<'a> DocumentValidator<'a> {
    pub fn new(
        schema: &'a Schema,
        operation_name: Option<String>,
        variables: Option<Map<String, Value>>,
        query_depth_limit: usize,
    ) -> Self {
        Self {
            schema,
            operation_name,
            variables,
            query_depth_limit,
        }
    }

    /// Validate the query payload.
    ///
    /// Validations performed:
    /// - Validate that either there is only one operation or the operation name specified
    ///   matches one of the operations in the document
    /// - Validate that there is at least one operation
    /// - Other validations are delegated to the operation validator
    #[instrument(
        name = "DocumentValidator::validate"
        skip(self, document)
        )]
    pub fn validate(
        self,
        document: ExecutableDocument,
    ) -> Result<ValidatedOperation, ValidationError> {
        let (operation_name, raw_operation) = match document.operations {
            DocumentOperations::Single(operation) => Ok((self.operation_name, operation)),
            DocumentOperations::Multiple(mut operations) => {
                if operations.is_empty() {
                    Err(ValidationError::NoOperationFound)
                } else {
                    match self.operation_name {
                        None if operations.len() == 1 => {
                            // async-graphql parses a named operation (`query Foo { ... }`) to
                            // `DocumentOperations::Multiple` even if it is the only one, so the
                            // operation name is enforced only for truly multiple operations.
                            operations
                                .into_iter()
                                .next()
                                .map(|(operation_name, operation)| {
                                    (Some(operation_name.to_string()), operation)
                                })
                                .ok_or(ValidationError::NoOperationFound)
                        }
                        None => Err(ValidationError::MultipleOperationsNoOperationName),
                        Some(operation_name) => {
                            match operations.remove(&Name::new(&operation_name)) {
                                None => {
                                    Err(ValidationError::MultipleOperationsUnmatchedOperationName(
                                        operation_name,
                                    ))
                                }
                                Some(operation) => Ok((Some(operation_name), operation)),
                            }
                        }
                    }
                }
            }
        }?;

        let operation_validator = OperationValidator::new(
            self.schema,
            operation_name,
            self.variables,
            document.fragments,
            self.query_depth_limit,
        );

        operation_validator.validate(raw_operation)
    }
}

#[cfg(test)]
mod tests {
    use async_graphql_parser::parse_query;
    use async_graphql_value::ConstValue;
    use core_model::schema::OperationKind;
    use serde_json::json;

    use super::*;
    use crate::validation::field::ValidatedField;

    const TEST_SDL: &str = r#"
        type Post {
            id: ID!
            title: String!
            creator: User!
        }

        type User {
            id: ID!
            name: String!
            posts: [Post!]!
        }

        type Query {
            post(id: ID!): Post!
            posts(page: Int): [Post!]!
        }
    "#;

    fn create_test_schema() -> Schema {
        Schema::from_sdl(TEST_SDL).unwrap()
    }

    fn create_query_document(query_str: &str) -> ExecutableDocument {
        parse_query(query_str).unwrap()
    }

    fn validate(
        query: &str,
        operation_name: Option<&str>,
        variables: Option<Value>,
        depth_limit: usize,
    ) -> Result<ValidatedOperation, ValidationError> {
        let schema = create_test_schema();
        let variables = variables.map(|variables| match variables {
            Value::Object(variables) => variables,
            _ => panic!("variables must be an object"),
        });

        DocumentValidator::new(
            &schema,
            operation_name.map(|name| name.to_string()),
            variables,
            depth_limit,
        )
        .validate(create_query_document(query))
    }

    fn field_names(fields: &[ValidatedField]) -> Vec<String> {
        fields.iter().map(|field| field.output_name()).collect()
    }

    #[test]
    fn fields_in_document_order() {
        let operation = validate(
            r#"
            query {
                posts(page: 2) {
                    title
                    id
                }
                post(id: "p1") {
                    id
                }
            }
            "#,
            None,
            None,
            10,
        )
        .unwrap();

        assert_eq!(operation.typ, OperationKind::Query);
        assert_eq!(field_names(&operation.fields), vec!["posts", "post"]);
        assert_eq!(field_names(&operation.fields[0].subfields), vec!["title", "id"]);
        assert_eq!(
            operation.fields[0].arguments.get("page"),
            Some(&ConstValue::from_json(json!(2)).unwrap())
        );
    }

    #[test]
    fn with_operation_name_valid() {
        let operation = validate("query PostById { post(id: 1) { id } }", None, None, 10).unwrap();

        assert_eq!(operation.name.as_deref(), Some("PostById"));
    }

    #[test]
    fn variable_resolution_valid() {
        let operation = validate(
            r#"
            query($post_id: ID!, $page: Int = 3) {
                post(id: $post_id) { id }
                posts(page: $page) { id }
            }
            "#,
            None,
            Some(json!({"post_id": "p2"})),
            10,
        )
        .unwrap();

        assert_eq!(
            operation.fields[0].arguments.get("id"),
            Some(&ConstValue::String("p2".to_string()))
        );
        assert_eq!(
            operation.fields[1].arguments.get("page"),
            Some(&ConstValue::from_json(json!(3)).unwrap())
        );
    }

    #[test]
    fn variable_resolution_invalid() {
        let result = validate(
            r#"
            query($post_id: ID!) {
                post(id: $post_id) { id }
            }
            "#,
            None,
            Some(json!({"other": 2})),
            10,
        );

        assert!(matches!(
            result,
            Err(ValidationError::VariableNotFound(name, _)) if name == "post_id"
        ));
    }

    #[test]
    fn undeclared_variable_invalid() {
        let result = validate(
            "query { post(id: $post_id) { id } }",
            None,
            Some(json!({"post_id": "p1"})),
            10,
        );

        assert!(matches!(result, Err(ValidationError::VariableNotFound(_, _))));
    }

    #[test]
    fn aliases_and_fragments() {
        let operation = validate(
            r#"
            query {
                first: post(id: 1) {
                    ...postInfo
                    ... on Post {
                        creator { name }
                    }
                }
            }

            fragment postInfo on Post {
                id
                headline: title
            }
            "#,
            None,
            None,
            10,
        )
        .unwrap();

        assert_eq!(field_names(&operation.fields), vec!["first"]);
        assert_eq!(operation.fields[0].name.as_str(), "post");
        assert_eq!(
            field_names(&operation.fields[0].subfields),
            vec!["id", "headline", "creator"]
        );
    }

    #[test]
    fn mergeable_fields() {
        let operation = validate(
            r#"
            query {
                posts {
                    title
                    id
                    title
                    creator { id }
                    creator { name }
                    t: title
                }
            }
            "#,
            None,
            None,
            10,
        )
        .unwrap();

        let posts = &operation.fields[0];
        assert_eq!(field_names(&posts.subfields), vec!["title", "id", "creator", "t"]);
        assert_eq!(field_names(&posts.subfields[2].subfields), vec!["id", "name"]);
    }

    #[test]
    fn unmergeable_fields() {
        let result = validate(
            r#"
            query {
                posts {
                    t: title
                    t: id
                }
            }
            "#,
            None,
            None,
            10,
        );
        assert!(matches!(result, Err(ValidationError::MergeConflict(name, _)) if name == "t"));

        let result = validate(
            r#"
            query {
                post(id: 1) { id }
                post(id: 2) { id }
            }
            "#,
            None,
            None,
            10,
        );
        assert!(matches!(result, Err(ValidationError::MergeConflict(_, _))));
    }

    #[test]
    fn skip_and_include() {
        let operation = validate(
            r#"
            query($withCreator: Boolean!) {
                posts {
                    id @skip(if: true)
                    title @include(if: true)
                    creator @include(if: $withCreator) { id }
                }
            }
            "#,
            None,
            Some(json!({"withCreator": false})),
            10,
        )
        .unwrap();

        assert_eq!(field_names(&operation.fields[0].subfields), vec!["title"]);
    }

    #[test]
    fn multi_operations() {
        let query = r#"
            query first { post(id: 1) { id } }
            query second { posts { title } }
        "#;

        let operation = validate(query, Some("second"), None, 10).unwrap();
        assert_eq!(field_names(&operation.fields), vec!["posts"]);

        assert!(matches!(
            validate(query, None, None, 10),
            Err(ValidationError::MultipleOperationsNoOperationName)
        ));
        assert!(matches!(
            validate(query, Some("foo"), None, 10),
            Err(ValidationError::MultipleOperationsUnmatchedOperationName(_))
        ));
    }

    #[test]
    fn fragment_recursion() {
        let direct = r#"
            query { posts { ...postFields } }
            fragment postFields on Post { ...postFields }
        "#;
        assert!(matches!(
            validate(direct, None, None, 10),
            Err(ValidationError::FragmentCycle(_, _))
        ));

        let indirect = r#"
            query { posts { ...postInfo } }
            fragment postInfo on Post { creator { ...creatorInfo } }
            fragment creatorInfo on User { posts { ...postInfo } }
        "#;
        assert!(matches!(
            validate(indirect, None, None, 10),
            Err(ValidationError::FragmentCycle(_, _))
        ));

        let missing = "query { posts { ...nothing } }";
        assert!(matches!(
            validate(missing, None, None, 10),
            Err(ValidationError::FragmentDefinitionNotFound(_, _))
        ));
    }

    #[test]
    fn query_depth_limit() {
        let query = r#"
            query {
                posts { # 1
                    creator { # 2
                        posts { # 3
                            id # 4
                        }
                    }
                }
            }
        "#;

        assert!(validate(query, None, None, 4).is_ok());
        assert!(matches!(
            validate(query, None, None, 3),
            Err(ValidationError::SelectionSetTooDeep(_))
        ));
    }

    #[test]
    fn missing_mutation_root() {
        let result = validate("mutation { createPost { id } }", None, None, 10);
        assert!(matches!(
            result,
            Err(ValidationError::OperationNotFound(kind, _)) if kind == "mutation"
        ));
    }

    #[test]
    fn subscription_rejected() {
        let result = validate("subscription { posts { id } }", None, None, 10);
        assert!(matches!(result, Err(ValidationError::SubscriptionNotSupported(_))));
    }
}
