// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The users/posts/auth resolver set served by the feed server.
//!
//! The engine in `core-resolver` knows nothing about these entities; this crate supplies the
//! schema, the resolver bindings and the collaborators (storage, password hashing, assets and
//! token signing) the resolvers need.

pub mod asset;
pub mod config;
pub mod entity;
pub mod password;
pub mod storage;
pub mod token;

mod resolver;

use core_model::{error::SchemaError, schema::Schema};

pub use resolver::{FeedState, feed_bindings};

const FEED_SCHEMA_SDL: &str = include_str!("feed.graphql");

pub fn feed_schema() -> Result<Schema, SchemaError> {
    Schema::from_sdl(FEED_SCHEMA_SDL)
}
