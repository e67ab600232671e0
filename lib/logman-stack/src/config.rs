/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use anyhow::anyhow;
use yaml_rust::Yaml;

use logman::config::{coerce, foreach_option};
use logman::{ChannelConfig, ConfigError, Level, RootConfig, TypedChannelConfig, ValidationError};
use logman_yaml::{key, value};

use crate::STACK_DRIVER;

const CHANNELS_OPTION: &str = "channels";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StackMember {
    pub name: String,
    /// Stop the fan out after this member has taken the record.
    pub disable_bubble: bool,
}

impl StackMember {
    pub fn new(name: &str) -> Self {
        StackMember {
            name: name.to_string(),
            disable_bubble: false,
        }
    }

    pub fn without_bubble(name: &str) -> Self {
        StackMember {
            name: name.to_string(),
            disable_bubble: true,
        }
    }

    fn parse(v: &Yaml, position: usize) -> Result<Self, ConfigError> {
        let position = Some(position);
        let Yaml::Hash(map) = v else {
            return Err(ConfigError::option_type(
                CHANNELS_OPTION,
                position,
                anyhow!("yaml value type for member should be 'map'"),
            ));
        };

        let mut member = StackMember::default();
        foreach_option(map, position, |option, v| {
            match key::normalize(option).as_str() {
                "name" => {
                    member.name = value::as_string(v)
                        .map_err(|e| ConfigError::option_type(option, position, e))?;
                    Ok(())
                }
                "disable_bubble" => {
                    member.disable_bubble = value::as_bool(v)
                        .map_err(|e| ConfigError::option_type(option, position, e))?;
                    Ok(())
                }
                _ => Err(ConfigError::unknown_option(option, position)),
            }
        })?;
        Ok(member)
    }
}

/// Config of a stack channel: an ordered list of member channels.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StackConfig {
    pub level: Level,
    pub members: Vec<StackMember>,
}

impl TypedChannelConfig for StackConfig {
    fn driver_name(&self) -> &str {
        STACK_DRIVER
    }
}

impl StackConfig {
    pub fn new(level: Level) -> Self {
        StackConfig {
            level,
            members: Vec::new(),
        }
    }

    pub fn with_member(mut self, member: StackMember) -> Self {
        self.members.push(member);
        self
    }

    pub fn parse(config: &ChannelConfig) -> Result<Self, ConfigError> {
        coerce(config, STACK_DRIVER, |raw| {
            let mut stack = StackConfig::new(raw.level);
            foreach_option(&raw.extra, None, |option, v| {
                match key::normalize(option).as_str() {
                    CHANNELS_OPTION => {
                        stack.members = parse_members(v)?;
                        Ok(())
                    }
                    _ => Err(ConfigError::unknown_option(option, None)),
                }
            })?;
            Ok(stack)
        })
    }

    /// Apply defaults from the root config, then validate against it.
    ///
    /// Applying it to an already resolved config changes nothing.
    pub fn resolve(mut self, root: &RootConfig) -> Result<Self, ConfigError> {
        self.set_defaults(root);
        self.validate(root)?;
        Ok(self)
    }

    fn set_defaults(&mut self, root: &RootConfig) {
        if self.level == Level::Unset {
            self.level = root.level;
        }
    }

    fn validate(&self, root: &RootConfig) -> Result<(), ConfigError> {
        if !self.level.is_active() {
            return Err(ValidationError::InvalidLevel(self.level).into());
        }
        if self.members.is_empty() {
            return Err(ValidationError::NoMembers.into());
        }

        for member in &self.members {
            if member.name.is_empty() {
                return Err(ValidationError::EmptyField("name").into());
            }
            match root.channels.get(&member.name) {
                Some(c) if c.driver_name() == STACK_DRIVER => {
                    return Err(ConfigError::RecursiveStack(member.name.clone()));
                }
                Some(_) => {}
                None => {
                    return Err(ValidationError::UndefinedChannel(member.name.clone()).into());
                }
            }
        }
        Ok(())
    }
}

fn parse_members(v: &Yaml) -> Result<Vec<StackMember>, ConfigError> {
    let Yaml::Array(seq) = v else {
        return Err(ConfigError::option_type(
            CHANNELS_OPTION,
            None,
            anyhow!("yaml value type should be 'sequence'"),
        ));
    };

    let mut members = Vec::with_capacity(seq.len());
    for (i, item) in seq.iter().enumerate() {
        members.push(StackMember::parse(item, i + 1)?);
    }
    Ok(members)
}
