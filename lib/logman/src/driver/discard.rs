/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use slog::{Discard, slog_o};

use logman_types::Level;

use crate::config::{coerce, foreach_option};
use crate::{
    ChannelConfig, ConfigError, Driver, Logger, Manager, Registry, RootConfig, SlogLogger,
    ValidationError,
};

pub const DISCARD_DRIVER: &str = "discard";

/// Accepts no options, only the level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiscardConfig {
    pub level: Level,
}

impl crate::TypedChannelConfig for DiscardConfig {
    fn driver_name(&self) -> &str {
        DISCARD_DRIVER
    }
}

impl DiscardConfig {
    fn parse(config: &ChannelConfig) -> Result<Self, ConfigError> {
        coerce(config, DISCARD_DRIVER, |raw| {
            foreach_option(&raw.extra, None, |option, _| {
                Err(ConfigError::unknown_option(option, None))
            })?;
            Ok(DiscardConfig { level: raw.level })
        })
    }

    /// Inherit the manager level when unset, then check the result.
    pub fn resolve(mut self, root: &RootConfig) -> Result<Self, ConfigError> {
        if self.level == Level::Unset {
            self.level = root.level;
        }
        if !self.level.is_active() {
            return Err(ValidationError::InvalidLevel(self.level).into());
        }
        Ok(self)
    }
}

pub struct DiscardLogger;

impl DiscardLogger {
    pub fn start(level: Level) -> Arc<dyn Logger> {
        let logger = slog::Logger::root(Discard, slog_o!());
        Arc::new(SlogLogger::new(level, logger))
    }
}

/// A driver whose channels drop every record.
pub struct DiscardDriver;

impl Driver for DiscardDriver {
    fn create_logger(
        &self,
        manager: &Manager,
        config: &ChannelConfig,
    ) -> Result<Arc<dyn Logger>, ConfigError> {
        let config = DiscardConfig::parse(config)?.resolve(manager.config())?;
        Ok(DiscardLogger::start(config.level))
    }
}

pub fn register(registry: &mut Registry) {
    registry.register(DISCARD_DRIVER, DiscardDriver);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArbitraryConfig;
    use yaml_rust::Yaml;

    fn build(channel: ChannelConfig) -> Result<Manager, crate::LogmanError> {
        let mut config = RootConfig::new().with_channel("null", channel);
        config.default_channel = "null".to_string();
        config.level = Level::Warning;
        Manager::new(&Registry::with_builtin(), config)
    }

    #[test]
    fn inherit_level() {
        let manager = build(ArbitraryConfig::new(DISCARD_DRIVER).into()).unwrap();
        let null = manager.channels(&["null"]).remove("null").unwrap();
        assert_eq!(null.level(), Level::Warning);
        null.critical("dropped", &[]);
    }

    #[test]
    fn typed() {
        let manager = build(ChannelConfig::typed(DiscardConfig {
            level: Level::Debug,
        }))
        .unwrap();
        assert_eq!(manager.channels(&["null"])["null"].level(), Level::Debug);
    }

    #[test]
    fn typed_unset_level() {
        let manager = build(ChannelConfig::typed(DiscardConfig::default())).unwrap();
        assert_eq!(manager.channels(&["null"])["null"].level(), Level::Warning);
    }

    #[test]
    fn resolve_idempotent() {
        let mut root = RootConfig::new();
        root.level = Level::Error;
        let once = DiscardConfig::default().resolve(&root).unwrap();
        assert_eq!(once.level, Level::Error);
        let twice = once.clone().resolve(&root).unwrap();
        assert_eq!(once, twice);

        // an unset root level has not been defaulted yet
        root.level = Level::Unset;
        let e = DiscardConfig::default().resolve(&root).unwrap_err();
        assert!(matches!(
            e,
            ConfigError::Validation(ValidationError::InvalidLevel(Level::Unset))
        ));
    }

    #[test]
    fn no_options() {
        let config =
            ArbitraryConfig::new(DISCARD_DRIVER).with_extra("output", Yaml::Array(Vec::new()));
        assert!(build(config.into()).is_err());
    }
}
