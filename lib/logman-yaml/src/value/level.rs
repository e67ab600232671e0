/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

use anyhow::anyhow;
use yaml_rust::Yaml;

use logman_types::Level;

/// Accept a level name (`info`, `warn`, ...) or its numeric code.
pub fn as_level(v: &Yaml) -> anyhow::Result<Level> {
    match v {
        Yaml::String(s) => Level::from_str(s).map_err(|e| anyhow!("invalid level value: {e}")),
        Yaml::Integer(i) => Level::from_code(*i).map_err(|e| anyhow!("invalid level value: {e}")),
        Yaml::Null => Ok(Level::Unset),
        _ => Err(anyhow!(
            "yaml value type for 'level' should be 'string' or 'integer'"
        )),
    }
}
