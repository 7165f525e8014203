// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

/// Who is making the request.
///
/// Derived once per request from the bearer token and never changed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    subject_id: Option<String>,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self { subject_id: None }
    }

    pub fn authenticated(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: Some(subject_id.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.subject_id.is_some()
    }

    pub fn subject_id(&self) -> Option<&str> {
        self.subject_id.as_deref()
    }
}

/// Per-request information available to every resolver
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    identity: Identity,
}

impl RequestContext {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn anonymous() -> Self {
        Self::new(Identity::anonymous())
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }
}
