/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

pub use logman_types::log::LogStatsSnapshot;
pub use logman_types::{Fields, Level, fields};

mod error;
pub use error::{ConfigError, LogmanError, ValidationError};

mod logger;
pub use logger::{Logger, SlogLogger, UNKNOWN_LEVEL_MESSAGE, unknown_level_fields};

pub mod config;
pub use config::{ArbitraryConfig, ChannelConfig, RootConfig, TypedChannelConfig};

mod registry;
pub use registry::{Driver, Registry};

mod manager;
pub use manager::{ChannelLookup, Manager};

pub mod driver;

mod global;
pub use global::{
    critical, current, debug, error, info, init, init_or_panic, is_initialized, log, shutdown,
    warning,
};
