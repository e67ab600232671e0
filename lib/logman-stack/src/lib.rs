/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use logman::{ChannelConfig, ConfigError, Driver, Logger, Manager, Registry};

mod config;
pub use config::{StackConfig, StackMember};

mod logger;
pub use logger::StackLogger;

pub const STACK_DRIVER: &str = "stack";

/// Builds loggers that fan out to other channels of the same manager.
pub struct StackDriver;

impl Driver for StackDriver {
    fn create_logger(
        &self,
        manager: &Manager,
        config: &ChannelConfig,
    ) -> Result<Arc<dyn Logger>, ConfigError> {
        let config = StackConfig::parse(config)?.resolve(manager.config())?;
        Ok(Arc::new(StackLogger::new(config, manager.lookup())))
    }
}

pub fn register(registry: &mut Registry) {
    registry.register(STACK_DRIVER, StackDriver);
}
