// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use common::env_const::{DEFAULT_POSTS_PER_PAGE, get_posts_per_page};
use feed_env::{EnvError, Environment};

pub const DEFAULT_PAGE: usize = 1;

/// Pagination settings injected into the resolvers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedConfig {
    pub posts_per_page: usize,
    /// Used when a request omits the page or asks for one below 1
    pub default_page: usize,
}

impl FeedConfig {
    pub fn from_env(env: &dyn Environment) -> Result<Self, EnvError> {
        Ok(Self {
            posts_per_page: get_posts_per_page(env)?,
            default_page: DEFAULT_PAGE,
        })
    }

    /// The number of items to skip to reach `page` (1-based)
    pub fn offset(&self, page: usize) -> usize {
        page.saturating_sub(1) * self.posts_per_page
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            posts_per_page: DEFAULT_POSTS_PER_PAGE,
            default_page: DEFAULT_PAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use common::env_const::FEED_POSTS_PER_PAGE;
    use feed_env::MapEnvironment;

    use super::*;

    #[test]
    fn from_env() {
        assert_eq!(
            FeedConfig::from_env(&MapEnvironment::new()).unwrap(),
            FeedConfig::default()
        );

        let env = MapEnvironment::from([(FEED_POSTS_PER_PAGE, "5")]);
        assert_eq!(FeedConfig::from_env(&env).unwrap().posts_per_page, 5);

        let env = MapEnvironment::from([(FEED_POSTS_PER_PAGE, "0")]);
        assert!(FeedConfig::from_env(&env).is_err());
    }

    #[test]
    fn offsets() {
        let config = FeedConfig::default();

        assert_eq!(config.offset(1), 0);
        assert_eq!(config.offset(3), 4);
    }
}
