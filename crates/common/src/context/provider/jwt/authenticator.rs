// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use feed_env::{EnvError, Environment};

use crate::context::{Identity, error::ContextExtractionError};
use crate::env_const::{FEED_JWT_SECRET, get_token_lifetime_secs};
use crate::http::RequestHead;

const TOKEN_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

/// Signs and validates HS256 bearer tokens with a shared secret
pub struct JwtAuthenticator {
    secret: String,
    token_lifetime_secs: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub exp: i64,
}

#[derive(Debug, Error)]
enum JwtAuthenticationError {
    #[error("Invalid token")]
    Invalid,
    #[error("Expired token")]
    Expired,
}

#[derive(Debug, Error)]
pub enum JwtConfigurationError {
    #[error("{FEED_JWT_SECRET} must be set")]
    MissingSecret,

    #[error("{0}")]
    Env(#[from] EnvError),
}

#[derive(Debug, Error)]
#[error("Could not sign token: {0}")]
pub struct TokenIssueError(#[from] jsonwebtoken::errors::Error);

impl JwtAuthenticator {
    pub fn new(secret: impl Into<String>, token_lifetime_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            token_lifetime_secs,
        }
    }

    pub fn new_from_env(env: &dyn Environment) -> Result<Self, JwtConfigurationError> {
        let secret = env
            .require(FEED_JWT_SECRET)
            .map_err(|_| JwtConfigurationError::MissingSecret)?;
        let token_lifetime_secs = get_token_lifetime_secs(env)?;

        Ok(Self::new(secret, token_lifetime_secs))
    }

    fn validate_jwt(&self, token: &str) -> Result<Claims, JwtAuthenticationError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|error| match error.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtAuthenticationError::Expired,
            _ => JwtAuthenticationError::Invalid,
        })
    }

    /// Extract the bearer token from the `Authorization` header
    pub fn extract_jwt_token(
        &self,
        request_head: &(dyn RequestHead + Send + Sync),
    ) -> Result<Option<String>, ContextExtractionError> {
        match request_head.get_header(AUTHORIZATION_HEADER) {
            Some(header) => match header.strip_prefix(TOKEN_PREFIX) {
                Some(token) => Ok(Some(token.trim().to_string())),
                None => Err(ContextExtractionError::Malformed),
            },
            None => Ok(None),
        }
    }

    /// Extract and validate the token, returning its claims.
    ///
    /// A missing header is not an error (it indicates an anonymous user), so it yields `None`.
    pub fn extract_authentication(
        &self,
        request_head: &(dyn RequestHead + Send + Sync),
    ) -> Result<Option<Claims>, ContextExtractionError> {
        match self.extract_jwt_token(request_head)? {
            Some(token) => self
                .validate_jwt(&token)
                .map(Some)
                .map_err(|err| match err {
                    JwtAuthenticationError::Invalid => ContextExtractionError::Unauthorized,
                    JwtAuthenticationError::Expired => {
                        ContextExtractionError::ExpiredAuthentication
                    }
                }),
            None => Ok(None),
        }
    }

    /// The identity of the caller. Any token problem makes the caller anonymous; resolvers that
    /// need an identity report the failure themselves.
    pub fn identify(&self, request_head: &(dyn RequestHead + Send + Sync)) -> Identity {
        match self.extract_authentication(request_head) {
            Ok(Some(claims)) => Identity::authenticated(claims.sub),
            Ok(None) => Identity::anonymous(),
            Err(err) => {
                debug!("Treating request as anonymous: {}", err);
                Identity::anonymous()
            }
        }
    }

    pub fn issue_token(
        &self,
        subject: &str,
        email: Option<&str>,
    ) -> Result<String, TokenIssueError> {
        let claims = Claims {
            sub: subject.to_string(),
            email: email.map(|email| email.to_string()),
            exp: chrono::Utc::now().timestamp() + self.token_lifetime_secs,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?)
    }
}
