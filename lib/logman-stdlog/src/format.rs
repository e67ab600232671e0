/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt::Arguments;
use std::io;

use chrono::Utc;
use slog::{KV, OwnedKVList, Record, Serializer};

use logman_types::log::AsyncLogFormatter;

use super::StdLogValue;

#[derive(Default)]
pub struct StdLogFormatter {}

impl StdLogFormatter {
    pub(crate) fn new() -> Self {
        StdLogFormatter {}
    }
}

impl AsyncLogFormatter<StdLogValue> for StdLogFormatter {
    fn format_slog(
        &self,
        record: &Record,
        logger_values: &OwnedKVList,
    ) -> Result<StdLogValue, slog::Error> {
        let mut kv_pairs = Vec::new();
        let mut kv_formatter = FormatterKv(&mut kv_pairs);

        logger_values.serialize(record, &mut kv_formatter)?;
        record.kv().serialize(record, &mut kv_formatter)?;

        Ok(StdLogValue {
            level: record.level(),
            message: record.msg().to_string(),
            kv_pairs,
            datetime: Utc::now(),
        })
    }
}

struct FormatterKv<'a>(&'a mut Vec<(String, String)>);

impl FormatterKv<'_> {
    fn push(&mut self, key: slog::Key, value: String) -> slog::Result {
        self.0.push((key.to_string(), value));
        Ok(())
    }
}

impl Serializer for FormatterKv<'_> {
    fn emit_i64(&mut self, key: slog::Key, value: i64) -> slog::Result {
        let mut buffer = itoa::Buffer::new();
        self.push(key, buffer.format(value).to_string())
    }

    fn emit_u64(&mut self, key: slog::Key, value: u64) -> slog::Result {
        let mut buffer = itoa::Buffer::new();
        self.push(key, buffer.format(value).to_string())
    }

    fn emit_f64(&mut self, key: slog::Key, value: f64) -> slog::Result {
        let mut buffer = ryu::Buffer::new();
        self.push(key, buffer.format(value).to_string())
    }

    fn emit_bool(&mut self, key: slog::Key, value: bool) -> slog::Result {
        self.push(key, if value { "true" } else { "false" }.to_string())
    }

    fn emit_unit(&mut self, key: slog::Key) -> slog::Result {
        self.push(key, "null".to_string())
    }

    fn emit_none(&mut self, _key: slog::Key) -> slog::Result {
        Ok(())
    }

    fn emit_str(&mut self, key: slog::Key, value: &str) -> slog::Result {
        self.push(key, value.to_string())
    }

    fn emit_arguments(&mut self, key: slog::Key, value: &Arguments) -> slog::Result {
        self.push(key, value.to_string())
    }

    fn emit_serde(&mut self, key: slog::Key, value: &dyn slog::SerdeValue) -> slog::Result {
        let text = serde_json::to_string(value.as_serde()).map_err(io::Error::other)?;
        self.push(key, text)
    }
}
