// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

/// A schema that cannot be built. Raised at start-up only; the server must not start with one.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Type '{type_name}' referenced by '{referenced_by}' is not defined")]
    UndefinedType {
        type_name: String,
        referenced_by: String,
    },

    #[error("Type '{0}' is defined more than once")]
    DuplicateType(String),

    #[error("Field '{field_name}' is declared more than once on type '{type_name}'")]
    DuplicateField {
        type_name: String,
        field_name: String,
    },

    #[error("Argument '{argument_name}' is declared more than once on '{field_name}'")]
    DuplicateArgument {
        field_name: String,
        argument_name: String,
    },

    #[error("'{referenced_by}' must return an output type, but '{type_name}' is an input type")]
    InvalidOutputType {
        type_name: String,
        referenced_by: String,
    },

    #[error("'{referenced_by}' must take an input type, but '{type_name}' is an object type")]
    InvalidInputType {
        type_name: String,
        referenced_by: String,
    },

    #[error("The {kind} root '{type_name}' is not an object type")]
    InvalidOperationRoot { kind: String, type_name: String },

    #[error("Invalid schema definition: {0}")]
    Parse(String),

    #[error("Unsupported definition: {0}")]
    UnsupportedDefinition(String),
}
