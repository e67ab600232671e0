/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use yaml_rust::{Yaml, yaml};

use logman_types::Level;

use crate::{Registry, ValidationError};

mod coerce;
pub use coerce::{coerce, foreach_option};

mod yaml_load;

const DEFAULT_CHANNEL: &str = "stack";

/// A driver specific config built in code rather than parsed.
pub trait TypedChannelConfig: Any + fmt::Debug + Send + Sync {
    fn driver_name(&self) -> &str;
}

/// The untyped, user authored form of a channel config.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArbitraryConfig {
    pub driver: String,
    pub level: Level,
    pub extra: yaml::Hash,
}

impl ArbitraryConfig {
    pub fn new(driver: &str) -> Self {
        ArbitraryConfig {
            driver: driver.to_string(),
            level: Level::Unset,
            extra: yaml::Hash::new(),
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_extra(mut self, option: &str, value: Yaml) -> Self {
        self.extra.insert(Yaml::String(option.to_string()), value);
        self
    }
}

#[derive(Clone, Debug)]
pub enum ChannelConfig {
    Arbitrary(ArbitraryConfig),
    Typed(Arc<dyn TypedChannelConfig>),
}

impl ChannelConfig {
    pub fn typed<T: TypedChannelConfig>(config: T) -> Self {
        ChannelConfig::Typed(Arc::new(config))
    }

    pub fn driver_name(&self) -> &str {
        match self {
            ChannelConfig::Arbitrary(c) => &c.driver,
            ChannelConfig::Typed(c) => c.driver_name(),
        }
    }
}

impl From<ArbitraryConfig> for ChannelConfig {
    fn from(value: ArbitraryConfig) -> Self {
        ChannelConfig::Arbitrary(value)
    }
}

#[derive(Clone, Debug, Default)]
pub struct RootConfig {
    pub default_channel: String,
    pub level: Level,
    pub channels: BTreeMap<String, ChannelConfig>,
}

impl RootConfig {
    /// The stock config: `stack` as default channel at debug level, no channels.
    pub fn new() -> Self {
        RootConfig {
            default_channel: DEFAULT_CHANNEL.to_string(),
            level: Level::Debug,
            channels: BTreeMap::new(),
        }
    }

    /// A `stack` channel over a `stderr` channel using the structured driver.
    pub fn default_channels() -> BTreeMap<String, ArbitraryConfig> {
        let mut member = yaml::Hash::new();
        member.insert(
            Yaml::String("name".to_string()),
            Yaml::String("stderr".to_string()),
        );

        let mut channels = BTreeMap::new();
        channels.insert(
            "stack".to_string(),
            ArbitraryConfig::new("stack")
                .with_extra("channels", Yaml::Array(vec![Yaml::Hash(member)])),
        );
        channels.insert("stderr".to_string(), ArbitraryConfig::new("structured"));
        channels
    }

    pub fn with_channels<I>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = (String, ArbitraryConfig)>,
    {
        for (name, config) in channels {
            self.channels.insert(name, config.into());
        }
        self
    }

    pub fn with_channel<C: Into<ChannelConfig>>(mut self, name: &str, config: C) -> Self {
        self.channels.insert(name.to_string(), config.into());
        self
    }

    pub(crate) fn set_defaults(&mut self) -> &mut Self {
        if self.level == Level::Unset {
            self.level = Level::Info;
        }
        self
    }

    pub(crate) fn validate(&self, registry: &Registry) -> Result<(), ValidationError> {
        if !self.level.is_active() {
            return Err(ValidationError::InvalidLevel(self.level));
        }

        if self.channels.is_empty() {
            return Err(ValidationError::NoChannelsConfigured);
        }

        if self.default_channel.is_empty() {
            return Err(ValidationError::DefaultChannelNotSet);
        }

        if !self.channels.contains_key(&self.default_channel) {
            return Err(ValidationError::NoConfigForDefaultChannel(
                self.default_channel.clone(),
            ));
        }

        for (name, config) in &self.channels {
            let driver = config.driver_name();
            if driver.is_empty() {
                return Err(ValidationError::DriverNotSet(name.clone()));
            }
            if !registry.contains(driver) {
                return Err(ValidationError::UnknownDriver {
                    channel: name.clone(),
                    driver: driver.to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct NullConfig;

    impl TypedChannelConfig for NullConfig {
        fn driver_name(&self) -> &str {
            "discard"
        }
    }

    fn registry() -> Registry {
        Registry::with_builtin()
    }

    fn valid() -> RootConfig {
        RootConfig::new()
            .with_channel("std", ArbitraryConfig::new("std"))
            .with_channel("null", ChannelConfig::typed(NullConfig))
    }

    #[test]
    fn driver_name() {
        let c = ChannelConfig::from(ArbitraryConfig::new("std"));
        assert_eq!(c.driver_name(), "std");
        let c = ChannelConfig::typed(NullConfig);
        assert_eq!(c.driver_name(), "discard");
    }

    #[test]
    fn defaults() {
        let mut config = RootConfig::default();
        config.set_defaults();
        assert_eq!(config.level, Level::Info);

        let mut config = RootConfig::new();
        config.set_defaults();
        assert_eq!(config.level, Level::Debug);
        assert_eq!(config.default_channel, "stack");
    }

    #[test]
    fn validate_ok() {
        let mut config = valid();
        config.default_channel = "std".to_string();
        assert!(config.validate(&registry()).is_ok());
    }

    #[test]
    fn validate_err() {
        let registry = registry();

        let mut config = valid();
        config.default_channel = "std".to_string();
        config.level = Level::Unset;
        assert_eq!(
            config.validate(&registry),
            Err(ValidationError::InvalidLevel(Level::Unset))
        );

        let config = RootConfig::new();
        assert_eq!(
            config.validate(&registry),
            Err(ValidationError::NoChannelsConfigured)
        );

        let mut config = valid();
        config.default_channel.clear();
        assert_eq!(
            config.validate(&registry),
            Err(ValidationError::DefaultChannelNotSet)
        );

        let config = valid();
        assert_eq!(
            config.validate(&registry),
            Err(ValidationError::NoConfigForDefaultChannel("stack".to_string()))
        );

        let mut config = valid().with_channel("bad", ArbitraryConfig::new(""));
        config.default_channel = "std".to_string();
        assert_eq!(
            config.validate(&registry),
            Err(ValidationError::DriverNotSet("bad".to_string()))
        );

        let mut config = valid().with_channel("bad", ArbitraryConfig::new("syslog"));
        config.default_channel = "std".to_string();
        assert_eq!(
            config.validate(&registry),
            Err(ValidationError::UnknownDriver {
                channel: "bad".to_string(),
                driver: "syslog".to_string()
            })
        );
    }

    #[test]
    fn stock_channels() {
        let config = RootConfig::new().with_channels(RootConfig::default_channels());
        assert_eq!(config.channels.len(), 2);
        assert_eq!(config.channels["stack"].driver_name(), "stack");
        assert_eq!(config.channels["stderr"].driver_name(), "structured");
        assert!(config.channels.contains_key(&config.default_channel));
    }
}
