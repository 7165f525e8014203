// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use feed_env::{EnvError, Environment, parse_env};

pub const FEED_LOG: &str = "FEED_LOG";

pub const FEED_SERVER_HOST: &str = "FEED_SERVER_HOST";
pub const FEED_SERVER_PORT: &str = "FEED_SERVER_PORT";
pub const FEED_GRAPHQL_HTTP_PATH: &str = "FEED_GRAPHQL_HTTP_PATH";

pub const FEED_JWT_SECRET: &str = "FEED_JWT_SECRET";
pub const FEED_TOKEN_LIFETIME_SECS: &str = "FEED_TOKEN_LIFETIME_SECS";

pub const FEED_POSTS_PER_PAGE: &str = "FEED_POSTS_PER_PAGE";
pub const FEED_QUERY_DEPTH_LIMIT: &str = "FEED_QUERY_DEPTH_LIMIT";
pub const FEED_IMAGE_ROOT: &str = "FEED_IMAGE_ROOT";

pub const DEFAULT_SERVER_PORT: u16 = 9876;
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;
pub const DEFAULT_POSTS_PER_PAGE: usize = 2;
pub const DEFAULT_QUERY_DEPTH_LIMIT: usize = 16;

pub fn get_server_port(env: &dyn Environment) -> Result<u16, EnvError> {
    parse_env(env, FEED_SERVER_PORT, DEFAULT_SERVER_PORT)
}

pub fn get_graphql_http_path(env: &dyn Environment) -> String {
    env.get(FEED_GRAPHQL_HTTP_PATH)
        .unwrap_or_else(|| "/graphql".to_string())
}

pub fn get_token_lifetime_secs(env: &dyn Environment) -> Result<i64, EnvError> {
    parse_env(env, FEED_TOKEN_LIFETIME_SECS, DEFAULT_TOKEN_LIFETIME_SECS)
}

pub fn get_posts_per_page(env: &dyn Environment) -> Result<usize, EnvError> {
    let per_page = parse_env(env, FEED_POSTS_PER_PAGE, DEFAULT_POSTS_PER_PAGE)?;

    if per_page == 0 {
        Err(EnvError::InvalidValue {
            key: FEED_POSTS_PER_PAGE.to_string(),
            value: per_page.to_string(),
            message: "must be at least 1".to_string(),
        })
    } else {
        Ok(per_page)
    }
}

pub fn get_query_depth_limit(env: &dyn Environment) -> Result<usize, EnvError> {
    parse_env(env, FEED_QUERY_DEPTH_LIMIT, DEFAULT_QUERY_DEPTH_LIMIT)
}

pub fn get_image_root(env: &dyn Environment) -> String {
    env.get_or_else(FEED_IMAGE_ROOT, "images")
}
