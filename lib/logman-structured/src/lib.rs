/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use slog::{Drain, slog_o};

use logman::{ChannelConfig, ConfigError, Driver, Logger, Manager, Registry, SlogLogger};
use logman_types::log::{AsyncLogConfig, AsyncLogger};

mod config;
pub use config::{Encoding, StructuredConfig};

mod format;
pub use format::StructuredFormatter;

mod sink;
use sink::{Sink, SinkWriter};

pub const STRUCTURED_DRIVER: &str = "structured";

const LOG_THREAD_NAME: &str = "log-structured";

pub struct StructuredDriver;

impl Driver for StructuredDriver {
    fn create_logger(
        &self,
        manager: &Manager,
        config: &ChannelConfig,
    ) -> Result<Arc<dyn Logger>, ConfigError> {
        let config = StructuredConfig::parse(config)?.resolve(manager.config())?;
        start(&config)
    }
}

/// Open every output and spawn the writer thread of one channel.
pub fn start(config: &StructuredConfig) -> Result<Arc<dyn Logger>, ConfigError> {
    let mut sinks = Vec::with_capacity(config.output.len());
    for output in &config.output {
        sinks.push(Sink::open(output)?);
    }

    let formatter = StructuredFormatter::new(config.encoding, config.enable_caller);
    let async_conf = AsyncLogConfig::with_name(LOG_THREAD_NAME);
    let drain = AsyncLogger::spawn(&async_conf, formatter, move |receiver, stats| {
        SinkWriter::new(receiver, stats, sinks).run()
    })
    .map_err(|source| ConfigError::Sink {
        output: config.output.join(","),
        source,
    })?;

    let stats = drain.get_stats();
    let logger = slog::Logger::root(drain.ignore_res(), slog_o!());
    Ok(Arc::new(
        SlogLogger::new(config.level, logger).with_stats(stats),
    ))
}

pub fn register(registry: &mut Registry) {
    registry.register(STRUCTURED_DRIVER, StructuredDriver);
}
