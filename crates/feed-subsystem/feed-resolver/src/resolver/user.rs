// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use core_resolver::{FieldError, FieldInput};
use serde_json::Value;

use crate::{
    entity::{Post, User},
    storage::Criteria,
};

use super::{FeedState, authenticated_user_id, to_json};

pub(super) async fn find_user_by_email(
    state: &FeedState,
    email: &str,
) -> Result<Option<User>, FieldError> {
    let email = email.to_string();
    let users = state
        .users
        .find_matching(&Criteria::matching(move |user: &User| user.email == email).limit(1))
        .await?;

    Ok(users.into_iter().next())
}

pub(super) async fn find_user(state: &FeedState, id: &str) -> Result<User, FieldError> {
    state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| FieldError::NotFound("No user found!".to_string()))
}

pub(super) async fn user(state: &FeedState, input: FieldInput<'_>) -> Result<Value, FieldError> {
    let user_id = authenticated_user_id(&input)?;

    to_json(&find_user(state, user_id).await?)
}

pub(super) async fn update_status(
    state: &FeedState,
    input: FieldInput<'_>,
) -> Result<Value, FieldError> {
    let user_id = authenticated_user_id(&input)?;
    let status: String = input.arguments.require("status")?;

    let user = find_user(state, user_id).await?;
    let user = state
        .users
        .update(&user.id, Box::new(move |user: &mut User| user.status = status))
        .await?;

    to_json(&user)
}

/// `User.posts`: the user's posts, newest first
pub(super) async fn user_posts(
    state: &FeedState,
    input: FieldInput<'_>,
) -> Result<Value, FieldError> {
    let user_id = input
        .parent
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| FieldError::internal("User without an id"))?
        .to_string();

    let posts = state
        .posts
        .find_matching(
            &Criteria::matching(move |post: &Post| post.creator_id == user_id).newest_first(),
        )
        .await?;

    to_json(&posts)
}
