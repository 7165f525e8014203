// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Stored entities. Serialized with the schema's field names, which is what the engine reads for
//! fields without a resolver.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::storage::Entity;

pub const DEFAULT_USER_STATUS: &str = "I am new!";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub status: String,
}

impl User {
    /// A user yet to be stored, with the default status
    pub fn new(name: String, email: String, password: String) -> Self {
        Self {
            id: String::new(),
            name,
            email,
            password,
            status: DEFAULT_USER_STATUS.to_string(),
        }
    }
}

impl Entity for User {
    const KIND: &'static str = "User";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.email.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub image_url: String,
    pub creator_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(title: String, content: String, image_url: String, creator_id: String) -> Self {
        let now = Utc::now();

        Self {
            id: String::new(),
            title,
            content,
            image_url,
            creator_id,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Post {
    const KIND: &'static str = "Post";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}
