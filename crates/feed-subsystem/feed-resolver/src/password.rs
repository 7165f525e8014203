// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use sha2::{Digest, Sha256};
use uuid::Uuid;

const SALT_SEPARATOR: char = '$';

pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> String;

    fn verify(&self, password: &str, hashed: &str) -> bool;
}

/// Stores passwords as `<salt>$<hex sha256 of salt and password>`
#[derive(Debug, Default)]
pub struct Sha256PasswordHasher;

impl Sha256PasswordHasher {
    fn digest(salt: &str, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl PasswordHasher for Sha256PasswordHasher {
    fn hash(&self, password: &str) -> String {
        let salt = Uuid::new_v4().simple().to_string();
        format!("{salt}{SALT_SEPARATOR}{}", Self::digest(&salt, password))
    }

    fn verify(&self, password: &str, hashed: &str) -> bool {
        match hashed.split_once(SALT_SEPARATOR) {
            Some((salt, digest)) => Self::digest(salt, password) == digest,
            None => false,
        }
    }
}
