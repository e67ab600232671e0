/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::path::Path;

use anyhow::{Context, anyhow};
use yaml_rust::{Yaml, yaml};

use logman_yaml::{key, value};

use super::{ArbitraryConfig, RootConfig};

impl ArbitraryConfig {
    /// Parse `{driver, level, extra}`; `extra` is kept untyped for the driver.
    pub fn parse_yaml(v: &Yaml) -> anyhow::Result<Self> {
        let map = value::as_hash(v)?;
        let mut config = ArbitraryConfig::default();
        logman_yaml::foreach_kv(map, |k, v| match key::normalize(k).as_str() {
            "driver" => {
                config.driver = value::as_string(v)?;
                Ok(())
            }
            "level" => {
                config.level = value::as_level(v)?;
                Ok(())
            }
            "extra" => {
                config.extra = match v {
                    Yaml::Null => yaml::Hash::new(),
                    _ => value::as_hash(v)?.clone(),
                };
                Ok(())
            }
            _ => Err(anyhow!("invalid key {k}")),
        })?;
        Ok(config)
    }
}

impl RootConfig {
    pub fn parse_yaml(v: &Yaml) -> anyhow::Result<Self> {
        let map = value::as_hash(v)?;
        let mut config = RootConfig::default();
        logman_yaml::foreach_kv(map, |k, v| match key::normalize(k).as_str() {
            "default_channel" => {
                config.default_channel = value::as_string(v)?;
                Ok(())
            }
            "level" => {
                config.level = value::as_level(v)?;
                Ok(())
            }
            "channels" => {
                let channels = value::as_hash(v)?;
                logman_yaml::foreach_kv(channels, |name, v| {
                    let channel = ArbitraryConfig::parse_yaml(v)
                        .context(format!("invalid config for channel {name}"))?;
                    config.channels.insert(name.to_string(), channel.into());
                    Ok(())
                })
            }
            _ => Err(anyhow!("invalid key {k}")),
        })?;
        Ok(config)
    }

    /// Load from yaml or json text.
    pub fn load_str(content: &str) -> anyhow::Result<Self> {
        let doc = logman_yaml::load_str(content)?;
        RootConfig::parse_yaml(&doc)
    }

    pub fn load_file(path: &Path) -> anyhow::Result<Self> {
        let doc = logman_yaml::load_doc(path)?;
        RootConfig::parse_yaml(&doc).context(format!("invalid config in {}", path.display()))
    }
}
