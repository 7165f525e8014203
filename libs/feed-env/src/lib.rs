// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Access to the process configuration.
//!
//! All configuration of the server comes from environment variables. Code that needs a setting
//! takes a `&dyn Environment` so that tests can supply a [`MapEnvironment`] instead of mutating
//! the process environment.

mod map;

use std::str::FromStr;

pub use map::MapEnvironment;

pub trait Environment: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn enabled(&self, key: &str, default_value: bool) -> Result<bool, EnvError> {
        match self.get(key) {
            Some(value) => match value.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" | "enabled" | "enable" => Ok(true),
                "false" | "0" | "no" | "off" | "disabled" | "disable" => Ok(false),
                _ => Err(EnvError::InvalidBoolean {
                    key: key.to_string(),
                    value,
                }),
            },
            None => Ok(default_value),
        }
    }

    fn get_or_else(&self, key: &str, default_value: &str) -> String {
        self.get(key).unwrap_or(default_value.to_string())
    }

    /// Parse the value of `key`, falling back to `default_value` if the key is not set.
    fn get_parsed<T>(&self, key: &str, default_value: T) -> Result<T, EnvError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
        Self: Sized,
    {
        parse_env(self, key, default_value)
    }

    fn require(&self, key: &str) -> Result<String, EnvError> {
        self.get(key)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| EnvError::Missing {
                key: key.to_string(),
            })
    }
}

/// Parse a value from a dynamically dispatched environment.
///
/// [`Environment::get_parsed`] cannot be called on a `dyn Environment` since it is generic, so
/// code holding a trait object uses this instead.
pub fn parse_env<T>(env: &dyn Environment, key: &str, default_value: T) -> Result<T, EnvError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env.get(key) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| EnvError::InvalidValue {
            key: key.to_string(),
            value,
            message: e.to_string(),
        }),
        None => Ok(default_value),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error(
        "Invalid value for {key}: {value}. Expected true, 1, yes, on, enabled, enable OR false, 0, no, off, disabled, disable"
    )]
    InvalidBoolean { key: String, value: String },

    #[error("Invalid value for {key}: {value} ({message})")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },

    #[error("{key} must be set")]
    Missing { key: String },
}

pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans() {
        let env = MapEnvironment::from([("A", "yes"), ("B", "off"), ("C", "maybe")]);

        assert!(env.enabled("A", false).unwrap());
        assert!(!env.enabled("B", true).unwrap());
        assert!(env.enabled("C", true).is_err());
        assert!(env.enabled("D", true).unwrap());
    }

    #[test]
    fn parsed_values() {
        let env = MapEnvironment::from([("PORT", " 8080 "), ("SIZE", "two")]);

        assert_eq!(parse_env::<u16>(&env, "PORT", 1).unwrap(), 8080);
        assert_eq!(parse_env::<u16>(&env, "MISSING", 1).unwrap(), 1);
        assert!(matches!(
            parse_env::<usize>(&env, "SIZE", 2),
            Err(EnvError::InvalidValue { .. })
        ));
        assert_eq!(env.get_parsed::<u16>("PORT", 1).unwrap(), 8080);
    }

    #[test]
    fn required_values() {
        let env = MapEnvironment::from([("SECRET", "s3cr3t"), ("EMPTY", "")]);

        assert_eq!(env.require("SECRET").unwrap(), "s3cr3t");
        assert!(env.require("EMPTY").is_err());
        assert!(env.require("ABSENT").is_err());
    }
}
