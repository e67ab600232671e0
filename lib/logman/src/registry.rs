/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::collections::HashMap;
use std::sync::Arc;

use foldhash::fast::FixedState;

use crate::{ChannelConfig, ConfigError, Logger, Manager};

/// Builds the logger of a channel from its config.
pub trait Driver: Send + Sync {
    /// Called once per configured channel while `manager` is being built.
    fn create_logger(
        &self,
        manager: &Manager,
        config: &ChannelConfig,
    ) -> Result<Arc<dyn Logger>, ConfigError>;
}

/// Driver name to driver table.
///
/// Fill it during start up, then share it read only with every
/// [`Manager`] construction.
pub struct Registry {
    drivers: HashMap<String, Arc<dyn Driver>, FixedState>,
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            drivers: HashMap::with_hasher(FixedState::with_seed(0)),
        }
    }

    /// A registry holding the `std` and `discard` drivers.
    pub fn with_builtin() -> Self {
        let mut registry = Registry::new();
        crate::driver::stdlog::register(&mut registry);
        crate::driver::discard::register(&mut registry);
        registry
    }

    /// Add a driver.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty or already registered.
    pub fn register<D: Driver + 'static>(&mut self, name: &str, driver: D) {
        if name.is_empty() {
            panic!("logman: empty driver name passed");
        }
        if self.drivers.contains_key(name) {
            panic!("logman: register called twice for driver {name}");
        }
        self.drivers.insert(name.to_string(), Arc::new(driver));
    }

    pub fn lookup(&self, name: &str) -> Option<&Arc<dyn Driver>> {
        self.drivers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.drivers.contains_key(name)
    }

    pub fn driver_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.drivers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}
