// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Post resolvers. All of them except `Post.creator` require an authenticated caller.

use chrono::Utc;
use core_resolver::{FieldError, FieldInput, ValidationDetail, validator};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::warn;

use crate::{entity::Post, storage::Criteria};

use super::{FeedState, authenticated_user_id, check_input, to_json, user::find_user};

const MIN_TEXT_LENGTH: usize = 5;

/// Sent by clients that did not pick a new image
const UNCHANGED_IMAGE: &str = "undefined";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostInputData {
    title: String,
    content: String,
    image_url: String,
}

fn is_valid_text(value: &str) -> bool {
    !validator::is_empty(value) && validator::min_length(value, MIN_TEXT_LENGTH)
}

fn validate_post_input(post_input: &PostInputData) -> Result<(), FieldError> {
    let mut details = vec![];

    if !is_valid_text(&post_input.title) {
        details.push(ValidationDetail::new("title", "Title is invalid."));
    }
    if !is_valid_text(&post_input.content) {
        details.push(ValidationDetail::new("content", "Content is invalid."));
    }

    check_input(details)
}

async fn find_post(state: &FeedState, id: &str) -> Result<Post, FieldError> {
    state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| FieldError::NotFound("No post found!".to_string()))
}

/// The post, if the caller created it
async fn find_own_post(state: &FeedState, id: &str, user_id: &str) -> Result<Post, FieldError> {
    let post = find_post(state, id).await?;

    if post.creator_id != user_id {
        return Err(FieldError::Forbidden("Not authorized!".to_string()));
    }

    Ok(post)
}

async fn clear_image(state: &FeedState, reference: &str) {
    if let Err(error) = state.asset_store.clear(reference).await {
        warn!(%error, reference, "Could not clear image");
    }
}

pub(super) async fn create_post(
    state: &FeedState,
    input: FieldInput<'_>,
) -> Result<Value, FieldError> {
    let user_id = authenticated_user_id(&input)?;
    let post_input: PostInputData = input.arguments.require("postInput")?;
    validate_post_input(&post_input)?;

    let creator = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| FieldError::Unauthenticated("Invalid user.".to_string()))?;

    let post = state
        .posts
        .create(Post::new(
            post_input.title,
            post_input.content,
            post_input.image_url,
            creator.id,
        ))
        .await?;

    to_json(&post)
}

pub(super) async fn posts(state: &FeedState, input: FieldInput<'_>) -> Result<Value, FieldError> {
    authenticated_user_id(&input)?;

    let page = input
        .arguments
        .get::<i64>("page")?
        .and_then(|page| usize::try_from(page).ok())
        .filter(|page| *page >= 1)
        .unwrap_or(state.config.default_page);

    let total_posts = state.posts.count_matching(&Criteria::all()).await?;
    let posts = state
        .posts
        .find_matching(
            &Criteria::all()
                .newest_first()
                .skip(state.config.offset(page))
                .limit(state.config.posts_per_page),
        )
        .await?;

    Ok(json!({
        "posts": to_json(&posts)?,
        "totalPosts": total_posts,
    }))
}

pub(super) async fn post(state: &FeedState, input: FieldInput<'_>) -> Result<Value, FieldError> {
    authenticated_user_id(&input)?;
    let id: String = input.arguments.require("id")?;

    to_json(&find_post(state, &id).await?)
}

pub(super) async fn update_post(
    state: &FeedState,
    input: FieldInput<'_>,
) -> Result<Value, FieldError> {
    let user_id = authenticated_user_id(&input)?;
    let id: String = input.arguments.require("id")?;
    let post_input: PostInputData = input.arguments.require("postInput")?;
    validate_post_input(&post_input)?;

    let post = find_own_post(state, &id, user_id).await?;

    let image_url = if post_input.image_url == UNCHANGED_IMAGE {
        post.image_url.clone()
    } else {
        post_input.image_url
    };
    let image_changed = image_url != post.image_url;

    let updated = state
        .posts
        .update(
            &post.id,
            Box::new(move |post: &mut Post| {
                post.title = post_input.title;
                post.content = post_input.content;
                post.image_url = image_url;
                post.updated_at = Utc::now();
            }),
        )
        .await?;

    if image_changed {
        clear_image(state, &post.image_url).await;
    }

    to_json(&updated)
}

pub(super) async fn delete_post(
    state: &FeedState,
    input: FieldInput<'_>,
) -> Result<Value, FieldError> {
    let user_id = authenticated_user_id(&input)?;
    let id: String = input.arguments.require("id")?;

    let post = find_own_post(state, &id, user_id).await?;

    clear_image(state, &post.image_url).await;
    state.posts.delete(&post.id).await?;

    Ok(Value::Bool(true))
}

/// `Post.creator`: the user referenced by the post's `creatorId`
pub(super) async fn post_creator(
    state: &FeedState,
    input: FieldInput<'_>,
) -> Result<Value, FieldError> {
    let creator_id = input
        .parent
        .get("creatorId")
        .and_then(Value::as_str)
        .ok_or_else(|| FieldError::internal("Post without a creator"))?;

    to_json(&find_user(state, creator_id).await?)
}
