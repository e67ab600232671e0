/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use slog::{Drain, slog_o};

use logman_types::Level;
use logman_types::log::AsyncLogConfig;
use logman_yaml::{key, value};

use super::discard::DiscardLogger;
use crate::config::{coerce, foreach_option};
use crate::{
    ChannelConfig, ConfigError, Driver, Logger, Manager, Registry, SlogLogger, ValidationError,
};

pub const STD_DRIVER: &str = "std";

const STD_LOG_THREAD_NAME: &str = "log-std";

/// Plain text lines on stderr or stdout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StdLoggerConfig {
    pub level: Level,
    pub use_stdout: bool,
}

impl Default for StdLoggerConfig {
    fn default() -> Self {
        StdLoggerConfig {
            level: Level::Debug,
            use_stdout: false,
        }
    }
}

impl crate::TypedChannelConfig for StdLoggerConfig {
    fn driver_name(&self) -> &str {
        STD_DRIVER
    }
}

impl StdLoggerConfig {
    fn parse(config: &ChannelConfig) -> Result<Self, ConfigError> {
        coerce(config, STD_DRIVER, |raw| {
            let mut std_config = StdLoggerConfig {
                level: raw.level,
                use_stdout: false,
            };
            foreach_option(&raw.extra, None, |option, v| {
                match key::normalize(option).as_str() {
                    "use_stdout" => {
                        std_config.use_stdout = value::as_bool(v)
                            .map_err(|e| ConfigError::option_type(option, None, e))?;
                        Ok(())
                    }
                    _ => Err(ConfigError::unknown_option(option, None)),
                }
            })?;
            Ok(std_config)
        })
    }

    /// Fill in the debug default level and check the result.
    pub fn resolve(mut self) -> Result<Self, ConfigError> {
        if self.level == Level::Unset {
            self.level = Level::Debug;
        }
        if !self.level.is_active() {
            return Err(ValidationError::InvalidLevel(self.level).into());
        }
        Ok(self)
    }
}

pub struct StdLogger;

impl StdLogger {
    /// Spawn the writer thread and return the channel logger.
    ///
    /// Falls back to a logger that drops everything if the thread can not be
    /// spawned.
    pub fn start(level: Level, use_stdout: bool) -> Arc<dyn Logger> {
        let async_conf = AsyncLogConfig::with_name(STD_LOG_THREAD_NAME);
        match logman_stdlog::new_async_logger(&async_conf, use_stdout) {
            Ok(drain) => {
                let stats = drain.get_stats();
                let logger = slog::Logger::root(drain.ignore_res(), slog_o!());
                Arc::new(SlogLogger::new(level, logger).with_stats(stats))
            }
            Err(e) => {
                log::error!("failed to spawn std log thread: {e}");
                DiscardLogger::start(level)
            }
        }
    }
}

/// The stock driver: plain text lines on the standard streams.
pub struct StdDriver;

impl Driver for StdDriver {
    fn create_logger(
        &self,
        _manager: &Manager,
        config: &ChannelConfig,
    ) -> Result<Arc<dyn Logger>, ConfigError> {
        let config = StdLoggerConfig::parse(config)?.resolve()?;
        Ok(StdLogger::start(config.level, config.use_stdout))
    }
}

pub fn register(registry: &mut Registry) {
    registry.register(STD_DRIVER, StdDriver);
}
