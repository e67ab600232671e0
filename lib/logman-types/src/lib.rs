/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod level;
pub use level::{Level, LevelParseError};

mod fields;
pub use fields::{Fields, FieldsKv, fields_to_value};

pub mod log;

#[doc(hidden)]
pub use serde_json;

/// Build a [`Fields`] map from `key => value` pairs.
///
/// Values are converted with `serde_json::Value::from`, so strings, integers,
/// floats and booleans can be used directly.
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($k:expr => $v:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $(
            let _ = fields.insert($k.to_string(), $crate::serde_json::Value::from($v));
        )+
        fields
    }};
}
