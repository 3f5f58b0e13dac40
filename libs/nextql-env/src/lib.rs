// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod map;

use std::str::FromStr;

pub use map::MapEnvironment;

/// Source of configuration values (the process environment in production, a map in tests)
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
}

/// Parse the value of `key` with `FromStr`, falling back to `default_value` when the key is unset.
pub fn get_parsed<T: FromStr>(
    env: &dyn Environment,
    key: &str,
    default_value: T,
) -> Result<T, EnvError> {
    match env.get(key) {
        Some(value) => value.trim().parse().map_err(|_| EnvError::InvalidValue {
            key: key.to_string(),
            value,
            expected: std::any::type_name::<T>(),
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

    #[error("Invalid value for {key}: {value}. Expected a value of type {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
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
    fn enabled_accepts_known_spellings() {
        for value in ["true", "1", "YES", "On", "enabled", "enable"] {
            let env = MapEnvironment::from([("FLAG", value)]);
            assert!(env.enabled("FLAG", false).unwrap(), "{value}");
        }

        for value in ["false", "0", "no", "OFF", "disabled", "disable"] {
            let env = MapEnvironment::from([("FLAG", value)]);
            assert!(!env.enabled("FLAG", true).unwrap(), "{value}");
        }
    }

    #[test]
    fn enabled_rejects_unknown_value() {
        let env = MapEnvironment::from([("FLAG", "maybe")]);
        assert!(matches!(
            env.enabled("FLAG", false),
            Err(EnvError::InvalidBoolean { .. })
        ));
    }

    #[test]
    fn enabled_uses_default_when_unset() {
        let env = MapEnvironment::new();
        assert!(env.enabled("FLAG", true).unwrap());
        assert!(!env.enabled("FLAG", false).unwrap());
    }

    #[test]
    fn get_parsed_values() {
        let env = MapEnvironment::from([("PORT", " 8080 "), ("BAD_PORT", "eighty")]);

        assert_eq!(get_parsed::<u16>(&env, "PORT", 8000).unwrap(), 8080);
        assert_eq!(get_parsed::<u16>(&env, "MISSING", 8000).unwrap(), 8000);
        assert!(matches!(
            get_parsed::<u16>(&env, "BAD_PORT", 8000),
            Err(EnvError::InvalidValue { .. })
        ));
    }
}
