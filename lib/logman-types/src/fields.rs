/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::collections::HashMap;

use serde_json::Value;
use slog::{KV, Key, Record, Serializer};

/// Structured context attached to a single log call.
pub type Fields = HashMap<String, Value>;

/// Collapse a list of field sets into one json array of objects.
pub fn fields_to_value(fields: &[Fields]) -> Value {
    Value::Array(
        fields
            .iter()
            .map(|set| {
                Value::Object(set.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            })
            .collect(),
    )
}

/// Exposes log call fields to slog drains.
pub struct FieldsKv<'a>(pub &'a [Fields]);

impl KV for FieldsKv<'_> {
    fn serialize(&self, _record: &Record, serializer: &mut dyn Serializer) -> slog::Result {
        for set in self.0 {
            for (k, v) in set {
                emit_value(serializer, Key::from(k.clone()), v)?;
            }
        }
        Ok(())
    }
}

fn emit_value(serializer: &mut dyn Serializer, key: Key, value: &Value) -> slog::Result {
    match value {
        Value::Null => serializer.emit_unit(key),
        Value::Bool(b) => serializer.emit_bool(key, *b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                serializer.emit_i64(key, i)
            } else if let Some(u) = n.as_u64() {
                serializer.emit_u64(key, u)
            } else {
                serializer.emit_f64(key, n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => serializer.emit_str(key, s),
        Value::Array(_) | Value::Object(_) => {
            serializer.emit_serde(key, &slog::Serde(value.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Arguments;

    struct Collect(Vec<(String, String)>);

    impl Serializer for Collect {
        fn emit_arguments(&mut self, key: Key, val: &Arguments) -> slog::Result {
            self.0.push((key.to_string(), val.to_string()));
            Ok(())
        }

        fn emit_serde(&mut self, key: Key, value: &dyn slog::SerdeValue) -> slog::Result {
            let v = serde_json::to_value(value.as_serde()).map_err(std::io::Error::other)?;
            self.0.push((key.to_string(), format!("serde:{v}")));
            Ok(())
        }
    }

    #[test]
    fn kv_serialize() {
        let set = crate::fields!("user" => "bob", "id" => 3, "ok" => true);
        let nested = crate::fields!("list" => vec![1, 2]);
        let all = [set, nested];

        let rs = slog::RecordStatic {
            location: &slog::RecordLocation {
                file: file!(),
                line: line!(),
                column: column!(),
                function: "",
                module: module_path!(),
            },
            tag: "",
            level: slog::Level::Info,
        };
        let kv = FieldsKv(&all);

        let mut collect = Collect(Vec::new());
        kv.serialize(
            &Record::new(&rs, &format_args!("msg"), slog::BorrowedKV(&kv)),
            &mut collect,
        )
        .unwrap();
        collect.0.sort();
        assert_eq!(
            collect.0,
            vec![
                ("id".to_string(), "3".to_string()),
                ("list".to_string(), "serde:[1,2]".to_string()),
                ("ok".to_string(), "true".to_string()),
                ("user".to_string(), "bob".to_string()),
            ]
        );
    }

    #[test]
    fn to_value() {
        let all = [crate::fields!("a" => 1), crate::fields!()];
        let v = fields_to_value(&all);
        assert_eq!(v, serde_json::json!([{"a": 1}, {}]));
    }
}
