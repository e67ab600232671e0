/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::panic::Location;
use std::sync::Arc;

use slog::{BorrowedKV, Record, RecordLocation, RecordStatic};

use logman_types::log::{LogStats, LogStatsSnapshot};
use logman_types::{Fields, FieldsKv, Level, fields_to_value};

pub const UNKNOWN_LEVEL_MESSAGE: &str = "unknown log level";

/// The capability every channel logger provides.
///
/// All the per-severity entry points funnel into [`Logger::log`].
pub trait Logger: Send + Sync {
    /// Log with an arbitrary level.
    #[track_caller]
    fn log(&self, level: Level, msg: &str, fields: &[Fields]);

    /// The minimum level this logger lets through.
    fn level(&self) -> Level;

    /// Delivery counters, for loggers that write through an async drain.
    fn stats(&self) -> Option<LogStatsSnapshot> {
        None
    }

    /// Detailed debug information.
    #[track_caller]
    fn debug(&self, msg: &str, fields: &[Fields]) {
        self.log(Level::Debug, msg, fields)
    }

    /// Informational events that require no action.
    #[track_caller]
    fn info(&self, msg: &str, fields: &[Fields]) {
        self.log(Level::Info, msg, fields)
    }

    /// Exceptional occurrences that are not errors.
    #[track_caller]
    fn warning(&self, msg: &str, fields: &[Fields]) {
        self.log(Level::Warning, msg, fields)
    }

    /// Runtime errors that should be monitored.
    #[track_caller]
    fn error(&self, msg: &str, fields: &[Fields]) {
        self.log(Level::Error, msg, fields)
    }

    /// The application is failing or unusable.
    #[track_caller]
    fn critical(&self, msg: &str, fields: &[Fields]) {
        self.log(Level::Critical, msg, fields)
    }
}

/// Context for the error record emitted in place of a call at an unknown level.
pub fn unknown_level_fields(level: Level, msg: &str, fields: &[Fields]) -> Fields {
    let mut diag = Fields::with_capacity(3);
    diag.insert("level".to_string(), level.code().into());
    diag.insert("originalMsg".to_string(), msg.into());
    diag.insert("originalFields".to_string(), fields_to_value(fields));
    diag
}

/// A channel logger backed by a slog drain.
///
/// Leaf drivers build their drain and wrap it here; the call site of the
/// log call is recorded as the slog record location.
pub struct SlogLogger {
    level: Level,
    logger: slog::Logger,
    stats: Option<Arc<LogStats>>,
}

impl SlogLogger {
    pub fn new(level: Level, logger: slog::Logger) -> Self {
        SlogLogger {
            level,
            logger,
            stats: None,
        }
    }

    pub fn with_stats(mut self, stats: Arc<LogStats>) -> Self {
        self.stats = Some(stats);
        self
    }

    fn emit(
        &self,
        level: slog::Level,
        msg: &str,
        fields: &[Fields],
        caller: &'static Location<'static>,
    ) {
        let location = RecordLocation {
            file: caller.file(),
            line: caller.line(),
            column: caller.column(),
            function: "",
            module: module_path!(),
        };
        let rs = RecordStatic {
            location: &location,
            tag: "",
            level,
        };
        let kv = FieldsKv(fields);
        self.logger
            .log(&Record::new(&rs, &format_args!("{msg}"), BorrowedKV(&kv)));
    }
}

impl Logger for SlogLogger {
    #[track_caller]
    fn log(&self, level: Level, msg: &str, fields: &[Fields]) {
        if !self.level.accepts(level) {
            return;
        }

        let caller = Location::caller();
        match level.to_slog() {
            Some(slog_level) => self.emit(slog_level, msg, fields, caller),
            None => {
                let diag = unknown_level_fields(level, msg, fields);
                self.emit(slog::Level::Error, UNKNOWN_LEVEL_MESSAGE, &[diag], caller)
            }
        }
    }

    fn level(&self) -> Level {
        self.level
    }

    fn stats(&self) -> Option<LogStatsSnapshot> {
        self.stats.as_ref().map(|stats| stats.snapshot())
    }
}
