// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The schema registry: the typed contract that operations are executed against.
//!
//! A [`Schema`](schema::Schema) is assembled once (either through a
//! [`SchemaBuilder`](builder::SchemaBuilder) or from SDL) and is immutable afterwards.

pub mod builder;
pub mod error;
pub mod field_type;
pub mod primitive_type;
pub mod schema;

mod sdl;
