/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::io;

use thiserror::Error;

use logman_types::Level;

/// A configuration invariant that does not hold.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid level {0:?}")]
    InvalidLevel(Level),
    #[error("no channels configured")]
    NoChannelsConfigured,
    #[error("default channel is not set")]
    DefaultChannelNotSet,
    #[error("no config for default channel {0}")]
    NoConfigForDefaultChannel(String),
    #[error("driver is not set for channel {0}")]
    DriverNotSet(String),
    #[error("unknown driver {driver} for channel {channel}")]
    UnknownDriver { channel: String, driver: String },
    #[error("empty value for required field {0}")]
    EmptyField(&'static str),
    #[error("no member channels configured")]
    NoMembers,
    #[error("no config defined for channel {0}")]
    UndefinedChannel(String),
}

/// Failure while turning one channel config into a logger.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config structure for driver {driver}, found config for driver {found}")]
    Shape { driver: &'static str, found: String },
    #[error("invalid value for option {option}{}: {reason}", Position(.position))]
    OptionType {
        option: String,
        position: Option<usize>,
        reason: String,
    },
    #[error("unknown option {option}{}", Position(.position))]
    UnknownOption {
        option: String,
        position: Option<usize>,
    },
    #[error("invalid config: {0}")]
    Validation(#[from] ValidationError),
    #[error("recursive usage of stack channel {0}")]
    RecursiveStack(String),
    #[error("failed to open output {output}: {source}")]
    Sink {
        output: String,
        #[source]
        source: io::Error,
    },
}

impl ConfigError {
    pub fn option_type(option: &str, position: Option<usize>, e: anyhow::Error) -> Self {
        ConfigError::OptionType {
            option: option.to_string(),
            position,
            reason: format!("{e:#}"),
        }
    }

    pub fn unknown_option(option: &str, position: Option<usize>) -> Self {
        ConfigError::UnknownOption {
            option: option.to_string(),
            position,
        }
    }
}

struct Position<'a>(&'a Option<usize>);

impl fmt::Display for Position<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(n) => write!(f, " in item #{n}"),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Error)]
pub enum LogmanError {
    #[error("invalid config: {0}")]
    InvalidConfig(#[from] ValidationError),
    #[error("failed to create channel {channel}: {source}")]
    Channel {
        channel: String,
        #[source]
        source: ConfigError,
    },
    #[error("already initialized")]
    AlreadyInitialized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let e = ConfigError::unknown_option("foo", None);
        assert_eq!(e.to_string(), "unknown option foo");

        let e = ConfigError::unknown_option("colour", Some(2));
        assert_eq!(e.to_string(), "unknown option colour in item #2");

        let e = ConfigError::option_type("name", Some(1), anyhow::anyhow!("not a string"));
        assert_eq!(
            e.to_string(),
            "invalid value for option name in item #1: not a string"
        );

        let e = LogmanError::Channel {
            channel: "audit".to_string(),
            source: ConfigError::RecursiveStack("inner".to_string()),
        };
        assert_eq!(
            e.to_string(),
            "failed to create channel audit: recursive usage of stack channel inner"
        );
    }
}
