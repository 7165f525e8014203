// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use common::context::RequestContext;
use core_model::schema::{OperationKind, Schema};
use futures::future::BoxFuture;
use serde_json::Value;
use thiserror::Error;

use crate::{
    execution::{Arguments, FieldError},
    validation::field::ValidatedField,
};

/// Everything a resolver gets to see about the field being resolved
pub struct FieldInput<'a> {
    pub parent_type: &'a str,
    /// The already resolved value of the enclosing object (an empty object for root fields)
    pub parent: &'a Value,
    pub field: &'a ValidatedField,
    pub arguments: &'a Arguments,
    pub request_context: &'a RequestContext,
}

#[async_trait]
pub trait FieldResolver: Send + Sync {
    // {
    //   name: ???
    // }
    // `field` is `name` and ??? is the return value
    async fn resolve(&self, input: FieldInput<'_>) -> Result<Value, FieldError>;
}

pub type ResolveFieldFuture<'a> = BoxFuture<'a, Result<Value, FieldError>>;

/// A plain function resolving a field with access to shared state `S`
pub type ResolveFieldFn<S> = for<'a> fn(&'a S, FieldInput<'a>) -> ResolveFieldFuture<'a>;

pub struct StaticResolver<S> {
    state: Arc<S>,
    resolve: ResolveFieldFn<S>,
}

impl<S> StaticResolver<S> {
    pub fn new(state: Arc<S>, resolve: ResolveFieldFn<S>) -> Self {
        Self { state, resolve }
    }
}

#[async_trait]
impl<S> FieldResolver for StaticResolver<S>
where
    S: Send + Sync,
{
    async fn resolve(&self, input: FieldInput<'_>) -> Result<Value, FieldError> {
        (self.resolve)(&self.state, input).await
    }
}

/// Turn an `async fn(&S, FieldInput<'_>) -> Result<Value, FieldError>` into a function usable as
/// a [`ResolveFieldFn`].
#[macro_export]
macro_rules! resolve_field_fn {
    ($name:ident, $state:ty, $implementation:path) => {
        fn $name<'a>(
            state: &'a $state,
            input: $crate::FieldInput<'a>,
        ) -> $crate::ResolveFieldFuture<'a> {
            Box::pin($implementation(state, input))
        }
    };
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindingError {
    #[error("Field '{type_name}.{field_name}' is bound more than once")]
    DuplicateBinding {
        type_name: String,
        field_name: String,
    },

    #[error("Binding for '{type_name}.{field_name}' does not match any field in the schema")]
    UnknownField {
        type_name: String,
        field_name: String,
    },

    #[error("Operation '{type_name}.{field_name}' has no resolver")]
    UnboundOperation {
        type_name: String,
        field_name: String,
    },
}

/// Resolvers keyed by type name, then field name. Registered once at start-up and read-only
/// afterwards.
#[derive(Default)]
pub struct ResolverBindings {
    resolvers: HashMap<String, HashMap<String, Arc<dyn FieldResolver>>>,
}

impl ResolverBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(
        &mut self,
        type_name: &str,
        field_name: &str,
        resolver: Arc<dyn FieldResolver>,
    ) -> Result<(), BindingError> {
        let type_resolvers = self.resolvers.entry(type_name.to_string()).or_default();

        if type_resolvers.contains_key(field_name) {
            return Err(BindingError::DuplicateBinding {
                type_name: type_name.to_string(),
                field_name: field_name.to_string(),
            });
        }

        type_resolvers.insert(field_name.to_string(), resolver);
        Ok(())
    }

    pub fn bind_fn<S>(
        &mut self,
        type_name: &str,
        field_name: &str,
        state: Arc<S>,
        resolve: ResolveFieldFn<S>,
    ) -> Result<(), BindingError>
    where
        S: Send + Sync + 'static,
    {
        self.bind(
            type_name,
            field_name,
            Arc::new(StaticResolver::new(state, resolve)),
        )
    }

    pub fn get(&self, type_name: &str, field_name: &str) -> Option<&Arc<dyn FieldResolver>> {
        self.resolvers
            .get(type_name)
            .and_then(|type_resolvers| type_resolvers.get(field_name))
    }

    /// Check the bindings against the schema.
    ///
    /// Checks performed:
    /// - Every binding names a field of an object type in the schema
    /// - Every field of the operation roots has a binding (root fields have no parent value to
    ///   read from)
    pub fn validate(&self, schema: &Schema) -> Result<(), BindingError> {
        let mut bound: Vec<(&String, &String)> = self
            .resolvers
            .iter()
            .flat_map(|(type_name, type_resolvers)| {
                type_resolvers.keys().map(move |field_name| (type_name, field_name))
            })
            .collect();
        bound.sort();

        for (type_name, field_name) in bound {
            if schema.field(type_name, field_name).is_none() {
                return Err(BindingError::UnknownField {
                    type_name: type_name.clone(),
                    field_name: field_name.clone(),
                });
            }
        }

        for kind in [OperationKind::Query, OperationKind::Mutation] {
            if let Some(root) = schema.operation_root(kind) {
                for field in &root.fields {
                    if self.get(&root.name, &field.name).is_none() {
                        return Err(BindingError::UnboundOperation {
                            type_name: root.name.clone(),
                            field_name: field.name.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}
