// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Execution of a validated operation.
//!
//! Fields are resolved in document order, one at a time. A failure in one field is recorded in
//! the [`ExecutionContext`] and the field's value becomes `null`; if the field is non-null the
//! `null` moves up to the nearest nullable ancestor (or to the whole response).

mod arguments;
mod context;
mod error;
mod executor;
mod path;

pub use arguments::Arguments;
pub use context::{ExecutionContext, ExecutionError};
pub use error::{ExecutionFailure, FieldError, ValidationDetail};
pub use executor::{ExecutionResult, Executor};
pub use path::{PathSegment, ResponsePath};
