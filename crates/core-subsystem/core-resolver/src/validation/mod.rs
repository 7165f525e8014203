// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Validate the query payload.
//!
//! Take a user submitted query along with the operation name and variables (from the request
//! payload) and lower it into a [`ValidatedOperation`](operation::ValidatedOperation): variables
//! substituted, fragments inlined and fields with the same response key merged. Checks that need
//! the field definitions (arguments, selection shape) happen during execution, where a failure
//! only affects the field concerned.

pub mod document_validator;
pub mod field;
pub mod operation;
pub mod validation_error;

mod operation_validator;
mod selection_set_validator;
