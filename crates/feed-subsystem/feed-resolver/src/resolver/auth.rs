// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use core_resolver::{FieldError, FieldInput, ValidationDetail, validator};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::entity::User;

use super::{FeedState, check_input, to_json, user::find_user_by_email};

const MIN_PASSWORD_LENGTH: usize = 5;

#[derive(Deserialize)]
struct UserInputData {
    email: String,
    name: String,
    password: String,
}

fn validate_user_input(user_input: &UserInputData) -> Result<(), FieldError> {
    let mut details = vec![];

    if !validator::is_email(&user_input.email) {
        details.push(ValidationDetail::new("email", "E-Mail is invalid."));
    }
    if validator::is_empty(&user_input.password)
        || !validator::min_length(&user_input.password, MIN_PASSWORD_LENGTH)
    {
        details.push(ValidationDetail::new("password", "Password too short!"));
    }

    check_input(details)
}

pub(super) async fn create_user(
    state: &FeedState,
    input: FieldInput<'_>,
) -> Result<Value, FieldError> {
    let user_input: UserInputData = input.arguments.require("userInput")?;
    validate_user_input(&user_input)?;

    if find_user_by_email(state, &user_input.email).await?.is_some() {
        return Err(FieldError::internal("User exists already!"));
    }

    let password = state.password_hasher.hash(&user_input.password);
    let user = state
        .users
        .create(User::new(user_input.name, user_input.email, password))
        .await?;

    debug!(user_id = %user.id, "Created user");
    to_json(&user)
}

pub(super) async fn login(state: &FeedState, input: FieldInput<'_>) -> Result<Value, FieldError> {
    let email: String = input.arguments.require("email")?;
    let password: String = input.arguments.require("password")?;

    let user = find_user_by_email(state, &email)
        .await?
        .ok_or_else(|| FieldError::Unauthenticated("User not found.".to_string()))?;

    if !state.password_hasher.verify(&password, &user.password) {
        return Err(FieldError::Unauthenticated(
            "Password is incorrect.".to_string(),
        ));
    }

    let token = state
        .token_issuer
        .issue(&user.id, &user.email)
        .map_err(|e| FieldError::internal(e.to_string()))?;

    Ok(json!({
        "token": token,
        "userId": user.id,
    }))
}
