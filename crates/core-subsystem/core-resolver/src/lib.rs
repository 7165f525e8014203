// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

pub mod error_formatter;
pub mod execution;
pub mod system_resolver;
pub mod validation;
pub mod validator;

mod field_resolver;
mod query_response;

pub use execution::{Arguments, FieldError, ValidationDetail};
pub use field_resolver::{
    BindingError, FieldInput, FieldResolver, ResolveFieldFn, ResolveFieldFuture, ResolverBindings,
    StaticResolver,
};
pub use query_response::GraphQLResponse;
