// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_parser::Pos;
use thiserror::Error;

/// Problems with the query document as a whole. Any of these aborts the request before any
/// resolver runs.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{0}")]
    QueryParsingFailed(String, Pos, Option<Pos>),

    #[error("No query provided")]
    MissingQuery,

    #[error("Variable '{0}' not found")]
    VariableNotFound(String, Pos),

    #[error("Variable '{0}' could not be deserialized: {2}")]
    MalformedVariable(String, Pos, serde_json::Error),

    #[error("Fragment definition '{0}' not found")]
    FragmentDefinitionNotFound(String, Pos),

    #[error("Fragment '{0}' spreads itself")]
    FragmentCycle(String, Pos),

    #[error("No such operation '{0}'")]
    OperationNotFound(String, Pos),

    #[error("Subscriptions are not supported")]
    SubscriptionNotSupported(Pos),

    #[error("Fields with the response key '{0}' select different fields or arguments")]
    MergeConflict(String, Pos),

    #[error("Selection set too deep")]
    SelectionSetTooDeep(Pos),

    #[error("Directive '@{0}' requires a boolean 'if' argument")]
    InvalidDirectiveArgument(String, Pos),

    #[error("No operation found")]
    NoOperationFound,

    #[error("Must provide operation name if query contains multiple operations")]
    MultipleOperationsNoOperationName,

    #[error("operationName '{0}' doesn't match any operation")]
    MultipleOperationsUnmatchedOperationName(String),
}

impl ValidationError {
    pub fn position1(&self) -> Pos {
        match self {
            ValidationError::QueryParsingFailed(_, pos, _) => *pos,
            ValidationError::VariableNotFound(_, pos) => *pos,
            ValidationError::MalformedVariable(_, pos, _) => *pos,
            ValidationError::FragmentDefinitionNotFound(_, pos) => *pos,
            ValidationError::FragmentCycle(_, pos) => *pos,
            ValidationError::OperationNotFound(_, pos) => *pos,
            ValidationError::SubscriptionNotSupported(pos) => *pos,
            ValidationError::MergeConflict(_, pos) => *pos,
            ValidationError::SelectionSetTooDeep(pos) => *pos,
            ValidationError::InvalidDirectiveArgument(_, pos) => *pos,
            ValidationError::MissingQuery
            | ValidationError::NoOperationFound
            | ValidationError::MultipleOperationsNoOperationName
            | ValidationError::MultipleOperationsUnmatchedOperationName(_) => Pos::default(),
        }
    }

    pub fn position2(&self) -> Option<Pos> {
        match self {
            ValidationError::QueryParsingFailed(_, _, pos) => *pos,
            _ => None,
        }
    }

    pub fn positions(&self) -> Vec<Pos> {
        let mut positions = vec![self.position1()];
        positions.extend(self.position2());
        positions
    }
}
