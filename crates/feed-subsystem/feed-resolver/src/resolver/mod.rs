// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod auth;
mod feed;
mod user;

use std::sync::Arc;

use core_resolver::{
    BindingError, FieldError, FieldInput, ResolverBindings, ValidationDetail, resolve_field_fn,
};
use serde::Serialize;
use serde_json::Value;

use crate::{
    asset::AssetStore,
    config::FeedConfig,
    entity::{Post, User},
    password::PasswordHasher,
    storage::Repository,
    token::TokenIssuer,
};

const QUERY_ROOT: &str = "RootQuery";
const MUTATION_ROOT: &str = "RootMutation";

/// Everything the resolvers share. Built once at start-up.
pub struct FeedState {
    pub users: Arc<dyn Repository<User>>,
    pub posts: Arc<dyn Repository<Post>>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub asset_store: Arc<dyn AssetStore>,
    pub token_issuer: Arc<dyn TokenIssuer>,
    pub config: FeedConfig,
}

resolve_field_fn!(create_user_fn, FeedState, auth::create_user);
resolve_field_fn!(login_fn, FeedState, auth::login);
resolve_field_fn!(create_post_fn, FeedState, feed::create_post);
resolve_field_fn!(posts_fn, FeedState, feed::posts);
resolve_field_fn!(post_fn, FeedState, feed::post);
resolve_field_fn!(update_post_fn, FeedState, feed::update_post);
resolve_field_fn!(delete_post_fn, FeedState, feed::delete_post);
resolve_field_fn!(post_creator_fn, FeedState, feed::post_creator);
resolve_field_fn!(user_fn, FeedState, user::user);
resolve_field_fn!(update_status_fn, FeedState, user::update_status);
resolve_field_fn!(user_posts_fn, FeedState, user::user_posts);

pub fn feed_bindings(state: Arc<FeedState>) -> Result<ResolverBindings, BindingError> {
    let mut bindings = ResolverBindings::new();

    bindings.bind_fn(QUERY_ROOT, "login", state.clone(), login_fn)?;
    bindings.bind_fn(QUERY_ROOT, "posts", state.clone(), posts_fn)?;
    bindings.bind_fn(QUERY_ROOT, "post", state.clone(), post_fn)?;
    bindings.bind_fn(QUERY_ROOT, "user", state.clone(), user_fn)?;

    bindings.bind_fn(MUTATION_ROOT, "createUser", state.clone(), create_user_fn)?;
    bindings.bind_fn(MUTATION_ROOT, "createPost", state.clone(), create_post_fn)?;
    bindings.bind_fn(MUTATION_ROOT, "updatePost", state.clone(), update_post_fn)?;
    bindings.bind_fn(MUTATION_ROOT, "deletePost", state.clone(), delete_post_fn)?;
    bindings.bind_fn(MUTATION_ROOT, "updateStatus", state.clone(), update_status_fn)?;

    bindings.bind_fn("Post", "creator", state.clone(), post_creator_fn)?;
    bindings.bind_fn("User", "posts", state, user_posts_fn)?;

    Ok(bindings)
}

/// The caller's user id, or `Not authenticated!` for anonymous callers
fn authenticated_user_id<'a>(input: &FieldInput<'a>) -> Result<&'a str, FieldError> {
    input
        .request_context
        .identity()
        .subject_id()
        .ok_or_else(|| FieldError::Unauthenticated("Not authenticated!".to_string()))
}

fn check_input(details: Vec<ValidationDetail>) -> Result<(), FieldError> {
    if details.is_empty() {
        Ok(())
    } else {
        Err(FieldError::Validation {
            message: "Invalid input.".to_string(),
            details,
        })
    }
}

fn to_json(value: &impl Serialize) -> Result<Value, FieldError> {
    serde_json::to_value(value).map_err(|e| FieldError::internal(e.to_string()))
}
