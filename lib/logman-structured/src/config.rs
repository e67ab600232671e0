/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

use anyhow::anyhow;

use logman::config::{coerce, foreach_option};
use logman::{ChannelConfig, ConfigError, Level, RootConfig, TypedChannelConfig, ValidationError};
use logman_yaml::{key, value};

use crate::STRUCTURED_DRIVER;

pub(crate) const OUTPUT_STDERR: &str = "stderr";
pub(crate) const OUTPUT_STDOUT: &str = "stdout";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Encoding {
    #[default]
    Json,
    Console,
}

impl FromStr for Encoding {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Encoding::Json),
            "console" => Ok(Encoding::Console),
            _ => Err(anyhow!("unsupported encoding {s}")),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StructuredConfig {
    pub level: Level,
    pub enable_caller: bool,
    pub encoding: Encoding,
    /// `stderr`, `stdout` or a file path.
    pub output: Vec<String>,
}

impl TypedChannelConfig for StructuredConfig {
    fn driver_name(&self) -> &str {
        STRUCTURED_DRIVER
    }
}

impl StructuredConfig {
    pub fn parse(config: &ChannelConfig) -> Result<Self, ConfigError> {
        coerce(config, STRUCTURED_DRIVER, |raw| {
            let mut structured = StructuredConfig {
                level: raw.level,
                ..Default::default()
            };
            foreach_option(&raw.extra, None, |option, v| {
                match key::normalize(option).as_str() {
                    "enable_caller" => {
                        structured.enable_caller = value::as_bool(v)
                            .map_err(|e| ConfigError::option_type(option, None, e))?;
                    }
                    "encoding" => {
                        structured.encoding = value::as_string(v)
                            .and_then(|s| Encoding::from_str(&s))
                            .map_err(|e| ConfigError::option_type(option, None, e))?;
                    }
                    "output" => {
                        structured.output = value::as_list(v, value::as_string)
                            .map_err(|e| ConfigError::option_type(option, None, e))?;
                    }
                    _ => return Err(ConfigError::unknown_option(option, None)),
                }
                Ok(())
            })?;
            Ok(structured)
        })
    }

    /// Fill in the level from the root config and the stock output, then
    /// validate.
    pub fn resolve(mut self, root: &RootConfig) -> Result<Self, ConfigError> {
        if self.level == Level::Unset {
            self.level = root.level;
        }
        if self.output.is_empty() {
            self.output.push(OUTPUT_STDERR.to_string());
        }

        if !self.level.is_active() {
            return Err(ValidationError::InvalidLevel(self.level).into());
        }
        if self.output.iter().any(|o| o.is_empty()) {
            return Err(ValidationError::EmptyField("output").into());
        }
        Ok(self)
    }
}
