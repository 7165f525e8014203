// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use common::context::{JwtAuthenticator, TokenIssueError};

/// Signs the bearer tokens handed out by `login`
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user_id: &str, email: &str) -> Result<String, TokenIssueError>;
}

impl TokenIssuer for JwtAuthenticator {
    fn issue(&self, user_id: &str, email: &str) -> Result<String, TokenIssueError> {
        self.issue_token(user_id, Some(email))
    }
}
