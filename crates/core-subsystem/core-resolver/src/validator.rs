// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Checks on scalar input values, used by resolvers before they change anything.

pub fn is_empty(value: &str) -> bool {
    value.is_empty()
}

/// Length in characters (not bytes) is at least `min`
pub fn min_length(value: &str, min: usize) -> bool {
    value.chars().count() >= min
}

/// A pragmatic email check: one `@`, a non-empty local part, and a dotted domain whose labels
/// are non-empty.
pub fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();

    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-')
        })
}
