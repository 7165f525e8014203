// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod feed_router;

use std::sync::Arc;

use common::context::{JwtAuthenticator, JwtConfigurationError};
use common::env_const::{get_image_root, get_query_depth_limit};
use common::logging_tracing;
use core_model::error::SchemaError;
use core_resolver::{BindingError, system_resolver::GraphQLSystemResolver};
use feed_env::{EnvError, Environment, SystemEnvironment};
use feed_resolver::{
    FeedState,
    asset::LocalAssetStore,
    config::FeedConfig,
    entity::{Post, User},
    feed_bindings, feed_schema,
    password::Sha256PasswordHasher,
    storage::InMemoryRepository,
};
use thiserror::Error;

pub use feed_router::FeedRouter;

#[derive(Error, Debug)]
pub enum ServerInitError {
    #[error("{0}")]
    Env(#[from] EnvError),

    #[error("{0}")]
    Authentication(#[from] JwtConfigurationError),

    #[error("Invalid schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("Invalid resolver bindings: {0}")]
    Binding(#[from] BindingError),
}

/// Initialize the server by:
/// - Initializing tracing
/// - Creating the router (and return it)
pub fn init() -> Result<FeedRouter, ServerInitError> {
    logging_tracing::init();

    init_with_env(Arc::new(SystemEnvironment))
}

/// Create the router with the schema, bindings and collaborators configured from `env`.
///
/// Fails (and the server must not start) if the configuration is invalid or if the bindings do
/// not fit the schema.
pub fn init_with_env(env: Arc<dyn Environment>) -> Result<FeedRouter, ServerInitError> {
    let authenticator = Arc::new(JwtAuthenticator::new_from_env(env.as_ref())?);

    let state = Arc::new(FeedState {
        users: Arc::new(InMemoryRepository::<User>::new()),
        posts: Arc::new(InMemoryRepository::<Post>::new()),
        password_hasher: Arc::new(Sha256PasswordHasher),
        asset_store: Arc::new(LocalAssetStore::new(get_image_root(env.as_ref()))),
        token_issuer: authenticator.clone(),
        config: FeedConfig::from_env(env.as_ref())?,
    });

    let system_resolver = GraphQLSystemResolver::new(
        Arc::new(feed_schema()?),
        Arc::new(feed_bindings(state)?),
        get_query_depth_limit(env.as_ref())?,
    )?;

    Ok(FeedRouter::new(system_resolver, authenticator, env))
}
