/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt::Arguments;
use std::io::{self, Write};

use chrono::{SecondsFormat, Utc};
use serde_json::{Number, Value};
use slog::{KV, OwnedKVList, Record, Serializer};

use logman::Level;
use logman_types::log::AsyncLogFormatter;

use crate::Encoding;

const RESERVED_KEYS: [&str; 4] = ["ts", "level", "msg", "caller"];

/// Turns slog records into json or console lines, newline included.
pub struct StructuredFormatter {
    encoding: Encoding,
    enable_caller: bool,
}

impl StructuredFormatter {
    pub fn new(encoding: Encoding, enable_caller: bool) -> Self {
        StructuredFormatter {
            encoding,
            enable_caller,
        }
    }
}

impl AsyncLogFormatter<Vec<u8>> for StructuredFormatter {
    fn format_slog(&self, record: &Record, logger_values: &OwnedKVList) -> Result<Vec<u8>, slog::Error> {
        let mut fields = Vec::new();
        let mut kv_formatter = FormatterKv(&mut fields);
        logger_values.serialize(record, &mut kv_formatter)?;
        record.kv().serialize(record, &mut kv_formatter)?;

        let ts = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let level = Level::from_slog(record.level()).as_str();
        let caller = if self.enable_caller {
            Some(code_position(record))
        } else {
            None
        };
        let msg = record.msg().to_string();

        let mut buf = Vec::with_capacity(256);
        match self.encoding {
            Encoding::Json => {
                buf.push(b'{');
                write_json_pair(&mut buf, "ts", &Value::String(ts))?;
                buf.push(b',');
                write_json_pair(&mut buf, "level", &Value::from(level))?;
                buf.push(b',');
                write_json_pair(&mut buf, "msg", &Value::String(msg))?;
                if let Some(caller) = caller {
                    buf.push(b',');
                    write_json_pair(&mut buf, "caller", &Value::String(caller))?;
                }
                for (k, v) in &fields {
                    buf.push(b',');
                    if RESERVED_KEYS.contains(&k.as_str()) {
                        write_json_pair(&mut buf, &format!("fields.{k}"), v)?;
                    } else {
                        write_json_pair(&mut buf, k, v)?;
                    }
                }
                buf.push(b'}');
            }
            Encoding::Console => {
                write!(buf, "{ts}\t{level}")?;
                if let Some(caller) = caller {
                    write!(buf, "\t{caller}")?;
                }
                write!(buf, "\t{msg}")?;
                if !fields.is_empty() {
                    let map: serde_json::Map<String, Value> = fields.into_iter().collect();
                    buf.push(b'\t');
                    serde_json::to_writer(&mut buf, &map).map_err(io::Error::other)?;
                }
            }
        }
        buf.push(b'\n');
        Ok(buf)
    }
}

fn code_position(record: &Record) -> String {
    match record.file().rsplit_once('/') {
        Some((_, filename)) => format!("{filename}:{}", record.line()),
        None => format!("{}:{}", record.file(), record.line()),
    }
}

fn write_json_pair(buf: &mut Vec<u8>, key: &str, value: &Value) -> io::Result<()> {
    serde_json::to_writer(&mut *buf, key).map_err(io::Error::other)?;
    buf.push(b':');
    serde_json::to_writer(&mut *buf, value).map_err(io::Error::other)
}

struct FormatterKv<'a>(&'a mut Vec<(String, Value)>);

impl FormatterKv<'_> {
    fn push(&mut self, key: slog::Key, value: Value) -> slog::Result {
        self.0.push((key.to_string(), value));
        Ok(())
    }
}

impl Serializer for FormatterKv<'_> {
    fn emit_i64(&mut self, key: slog::Key, value: i64) -> slog::Result {
        self.push(key, Value::from(value))
    }

    fn emit_u64(&mut self, key: slog::Key, value: u64) -> slog::Result {
        self.push(key, Value::from(value))
    }

    fn emit_f64(&mut self, key: slog::Key, value: f64) -> slog::Result {
        // json has no nan or infinity
        let v = Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(value.to_string()));
        self.push(key, v)
    }

    fn emit_bool(&mut self, key: slog::Key, value: bool) -> slog::Result {
        self.push(key, Value::Bool(value))
    }

    fn emit_unit(&mut self, key: slog::Key) -> slog::Result {
        self.push(key, Value::Null)
    }

    fn emit_none(&mut self, key: slog::Key) -> slog::Result {
        self.push(key, Value::Null)
    }

    fn emit_str(&mut self, key: slog::Key, value: &str) -> slog::Result {
        self.push(key, Value::String(value.to_string()))
    }

    fn emit_arguments(&mut self, key: slog::Key, value: &Arguments) -> slog::Result {
        self.push(key, Value::String(value.to_string()))
    }

    fn emit_serde(&mut self, key: slog::Key, value: &dyn slog::SerdeValue) -> slog::Result {
        let v = serde_json::to_value(value.as_serde()).map_err(io::Error::other)?;
        self.push(key, v)
    }
}
