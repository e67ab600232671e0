/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock, Weak};

use log::debug;

use logman_types::log::LogStatsSnapshot;
use logman_types::{Fields, Level};

use crate::driver::discard::{DISCARD_DRIVER, DiscardLogger};
use crate::driver::stdlog::{STD_DRIVER, StdLogger};
use crate::{
    ArbitraryConfig, ChannelConfig, LogmanError, Logger, Registry, RootConfig,
    UNKNOWN_LEVEL_MESSAGE, ValidationError, unknown_level_fields,
};

const DEFAULT_STD_CHANNEL: &str = "std";
const DEFAULT_DISCARD_CHANNEL: &str = "discard";

type ChannelTable = OnceLock<HashMap<String, Arc<dyn Logger>>>;

fn select(table: &HashMap<String, Arc<dyn Logger>>, names: &[&str]) -> HashMap<String, Arc<dyn Logger>> {
    let mut selected = HashMap::with_capacity(names.len());
    for name in names {
        if let Some(logger) = table.get(*name) {
            selected.insert(name.to_string(), Arc::clone(logger));
        }
    }
    selected
}

/// Late access to the channels of a manager which is still being built.
///
/// Drivers that refer to sibling channels keep one of these and resolve the
/// channels on first use.
#[derive(Clone)]
pub struct ChannelLookup {
    table: Weak<ChannelTable>,
}

impl ChannelLookup {
    /// `None` until the manager is fully built, or after it is dropped.
    pub fn channels(&self, names: &[&str]) -> Option<HashMap<String, Arc<dyn Logger>>> {
        let table = self.table.upgrade()?;
        let channels = table.get()?;
        Some(select(channels, names))
    }
}

/// Owns the channels built from a [`RootConfig`] and routes calls to the
/// default channel.
pub struct Manager {
    config: RootConfig,
    channels: Arc<ChannelTable>,
}

impl Manager {
    pub fn new(registry: &Registry, mut config: RootConfig) -> Result<Self, LogmanError> {
        config.set_defaults();
        config.validate(registry)?;

        let manager = Manager {
            config,
            channels: Arc::new(OnceLock::new()),
        };

        let mut channels = HashMap::with_capacity(manager.config.channels.len());
        for (name, ch_config) in &manager.config.channels {
            let logger = create_channel(registry, &manager, name, ch_config)?;
            debug!(
                "created log channel {name} with driver {}",
                ch_config.driver_name()
            );
            channels.insert(name.clone(), logger);
        }
        // only set here, so lookups never see a partial table
        let _ = manager.channels.set(channels);

        Ok(manager)
    }

    /// # Panics
    ///
    /// Panics if the config is invalid or any channel fails to build.
    pub fn new_or_panic(registry: &Registry, config: RootConfig) -> Self {
        match Manager::new(registry, config) {
            Ok(manager) => manager,
            Err(e) => panic!("failed to create logger: {e}"),
        }
    }

    /// The built-in logger used before any explicit init: one `std` channel
    /// at info level.
    pub(crate) fn new_default() -> Self {
        Manager::single_channel(
            DEFAULT_STD_CHANNEL,
            STD_DRIVER,
            StdLogger::start(Level::Debug, false),
        )
    }

    /// A manager without writer threads, left in place after shutdown.
    pub(crate) fn new_discard() -> Self {
        Manager::single_channel(
            DEFAULT_DISCARD_CHANNEL,
            DISCARD_DRIVER,
            DiscardLogger::start(Level::Debug),
        )
    }

    fn single_channel(name: &str, driver: &str, logger: Arc<dyn Logger>) -> Self {
        let config = RootConfig {
            default_channel: name.to_string(),
            level: Level::Info,
            channels: Default::default(),
        }
        .with_channel(name, ArbitraryConfig::new(driver));

        let mut channels: HashMap<String, Arc<dyn Logger>> = HashMap::with_capacity(1);
        channels.insert(name.to_string(), logger);
        let table = OnceLock::new();
        let _ = table.set(channels);

        Manager {
            config,
            channels: Arc::new(table),
        }
    }

    pub fn config(&self) -> &RootConfig {
        &self.config
    }

    pub fn default_channel(&self) -> &str {
        &self.config.default_channel
    }

    /// Get the already built loggers of the named channels.
    ///
    /// Unknown names are left out of the result.
    pub fn channels(&self, names: &[&str]) -> HashMap<String, Arc<dyn Logger>> {
        match self.channels.get() {
            Some(table) => select(table, names),
            None => HashMap::new(),
        }
    }

    pub fn channel_names(&self) -> Vec<&str> {
        self.config.channels.keys().map(|s| s.as_str()).collect()
    }

    /// Delivery counters of every channel that keeps them, by channel name.
    pub fn channel_stats(&self) -> BTreeMap<String, LogStatsSnapshot> {
        let mut all = BTreeMap::new();
        if let Some(table) = self.channels.get() {
            for (name, logger) in table {
                if let Some(stats) = logger.stats() {
                    all.insert(name.clone(), stats);
                }
            }
        }
        all
    }

    pub fn lookup(&self) -> ChannelLookup {
        ChannelLookup {
            table: Arc::downgrade(&self.channels),
        }
    }

    fn default_logger(&self) -> Option<&Arc<dyn Logger>> {
        self.channels.get()?.get(&self.config.default_channel)
    }
}

fn create_channel(
    registry: &Registry,
    manager: &Manager,
    name: &str,
    config: &ChannelConfig,
) -> Result<Arc<dyn Logger>, LogmanError> {
    let Some(driver) = registry.lookup(config.driver_name()) else {
        return Err(ValidationError::UnknownDriver {
            channel: name.to_string(),
            driver: config.driver_name().to_string(),
        }
        .into());
    };
    driver
        .create_logger(manager, config)
        .map_err(|source| LogmanError::Channel {
            channel: name.to_string(),
            source,
        })
}

impl Logger for Manager {
    #[track_caller]
    fn log(&self, level: Level, msg: &str, fields: &[Fields]) {
        if !self.level().accepts(level) {
            return;
        }

        let Some(channel) = self.default_logger() else {
            return;
        };
        if level.is_active() {
            channel.log(level, msg, fields);
        } else {
            let diag = unknown_level_fields(level, msg, fields);
            channel.error(UNKNOWN_LEVEL_MESSAGE, &[diag]);
        }
    }

    fn level(&self) -> Level {
        self.config.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConfigError, Driver, TypedChannelConfig};
    use std::sync::Mutex;
    use yaml_rust::Yaml;

    type Records = Arc<Mutex<Vec<(String, Level, String, Vec<Fields>)>>>;

    /// Records every call it receives, tagged with the channel name.
    struct RecordLogger {
        name: String,
        level: Level,
        records: Records,
    }

    impl Logger for RecordLogger {
        fn log(&self, level: Level, msg: &str, fields: &[Fields]) {
            if !self.level.accepts(level) {
                return;
            }
            self.records.lock().unwrap().push((
                self.name.clone(),
                level,
                msg.to_string(),
                fields.to_vec(),
            ));
        }

        fn level(&self) -> Level {
            self.level
        }
    }

    struct RecordDriver {
        records: Records,
    }

    impl Driver for RecordDriver {
        fn create_logger(
            &self,
            manager: &Manager,
            config: &ChannelConfig,
        ) -> Result<Arc<dyn Logger>, ConfigError> {
            let ChannelConfig::Arbitrary(raw) = config else {
                return Err(ConfigError::Shape {
                    driver: "record",
                    found: config.driver_name().to_string(),
                });
            };
            let mut name = String::new();
            for (k, v) in raw.extra.iter() {
                match (k.as_str(), v.as_str()) {
                    (Some("tag"), Some(tag)) => name = tag.to_string(),
                    _ => {
                        return Err(ConfigError::unknown_option(
                            k.as_str().unwrap_or_default(),
                            None,
                        ));
                    }
                }
            }
            let level = if raw.level == Level::Unset {
                manager.level()
            } else {
                raw.level
            };
            Ok(Arc::new(RecordLogger {
                name,
                level,
                records: Arc::clone(&self.records),
            }))
        }
    }

    fn record_registry() -> (Registry, Records) {
        let records = Records::default();
        let mut registry = Registry::with_builtin();
        registry.register(
            "record",
            RecordDriver {
                records: Arc::clone(&records),
            },
        );
        (registry, records)
    }

    fn record(level: Level, tag: &str) -> ArbitraryConfig {
        ArbitraryConfig::new("record")
            .with_level(level)
            .with_extra("tag", Yaml::String(tag.to_string()))
    }

    #[test]
    fn build_all_channels() {
        let (registry, _) = record_registry();
        let config = RootConfig::new()
            .with_channel("a", record(Level::Debug, "a"))
            .with_channel("b", record(Level::Error, "b"))
            .with_channel("stack", ArbitraryConfig::new("discard"));
        let manager = Manager::new(&registry, config).unwrap();

        let channels = manager.channels(&["a", "b", "stack", "missing"]);
        assert_eq!(channels.len(), 3);
        assert!(!channels.contains_key("missing"));
        assert_eq!(channels["b"].level(), Level::Error);
        assert_eq!(manager.channel_names(), vec!["a", "b", "stack"]);
    }

    #[test]
    fn default_level() {
        let (registry, _) = record_registry();
        let mut config = RootConfig::new().with_channel("a", record(Level::Unset, "a"));
        config.default_channel = "a".to_string();
        config.level = Level::Unset;
        let manager = Manager::new(&registry, config).unwrap();
        assert_eq!(manager.level(), Level::Info);
        assert_eq!(manager.channels(&["a"])["a"].level(), Level::Info);
    }

    #[test]
    fn dispatch_to_default_channel() {
        let (registry, records) = record_registry();
        let mut config = RootConfig::new()
            .with_channel("a", record(Level::Debug, "a"))
            .with_channel("b", record(Level::Info, "b"));
        config.default_channel = "b".to_string();
        config.level = Level::Warning;
        let manager = Manager::new(&registry, config).unwrap();

        manager.info("filtered by manager", &[]);
        manager.warning("routed", &[crate::fields!("k" => 1)]);
        manager.critical("routed", &[]);

        let records = records.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].1, Level::Warning);
        assert_eq!(records[0].3, vec![crate::fields!("k" => 1)]);
        assert_eq!(records[1].1, Level::Critical);
    }

    #[test]
    fn unknown_level_diagnostic() {
        let (registry, records) = record_registry();
        let mut config = RootConfig::new().with_channel("a", record(Level::Debug, "a"));
        config.default_channel = "a".to_string();
        let manager = Manager::new(&registry, config).unwrap();

        manager.log(Level::Unset, "what level", &[crate::fields!("user" => "bob")]);

        let records = records.lock().unwrap();
        assert_eq!(records.len(), 1);
        let (_, level, msg, fields) = &records[0];
        assert_eq!(*level, Level::Error);
        assert_eq!(msg, UNKNOWN_LEVEL_MESSAGE);
        assert_eq!(fields[0]["originalMsg"], serde_json::json!("what level"));
        assert_eq!(
            fields[0]["originalFields"],
            serde_json::json!([{"user": "bob"}])
        );
    }

    #[test]
    fn invalid_config() {
        let (registry, _) = record_registry();
        let config = RootConfig::new().with_channel("a", record(Level::Debug, "a"));
        let e = Manager::new(&registry, config).err().unwrap();
        assert!(matches!(
            e,
            LogmanError::InvalidConfig(ValidationError::NoConfigForDefaultChannel(_))
        ));
    }

    #[test]
    fn channel_failure_names_channel() {
        let (registry, _) = record_registry();
        let mut config = RootConfig::new()
            .with_channel("a", record(Level::Debug, "a"))
            .with_channel(
                "broken",
                ArbitraryConfig::new("record").with_extra("colour", Yaml::Boolean(true)),
            );
        config.default_channel = "a".to_string();
        let e = Manager::new(&registry, config).err().unwrap();
        match e {
            LogmanError::Channel { channel, source } => {
                assert_eq!(channel, "broken");
                assert!(matches!(source, ConfigError::UnknownOption { .. }));
            }
            _ => panic!("unexpected error {e}"),
        }
    }

    #[derive(Debug)]
    struct ForeignConfig;

    impl TypedChannelConfig for ForeignConfig {
        fn driver_name(&self) -> &str {
            "record"
        }
    }

    #[test]
    fn typed_shape_error() {
        let (registry, _) = record_registry();
        let mut config = RootConfig::new().with_channel("a", ChannelConfig::typed(ForeignConfig));
        config.default_channel = "a".to_string();
        let e = Manager::new(&registry, config).err().unwrap();
        assert!(matches!(
            e,
            LogmanError::Channel {
                source: ConfigError::Shape { .. },
                ..
            }
        ));
    }

    #[test]
    fn lookup() {
        let (registry, _) = record_registry();
        let mut config = RootConfig::new().with_channel("a", record(Level::Debug, "a"));
        config.default_channel = "a".to_string();
        let manager = Manager::new(&registry, config).unwrap();

        let lookup = manager.lookup();
        let found = lookup.channels(&["a", "b"]).unwrap();
        assert_eq!(found.len(), 1);

        drop(manager);
        assert!(lookup.channels(&["a"]).is_none());
    }

    #[test]
    fn builtin_default() {
        let manager = Manager::new_default();
        assert_eq!(manager.level(), Level::Info);
        assert_eq!(manager.default_channel(), "std");
        assert_eq!(manager.channels(&["std"]).len(), 1);

        let manager = Manager::new_discard();
        assert_eq!(manager.default_channel(), "discard");
        assert_eq!(manager.channels(&["discard"])["discard"].level(), Level::Debug);
    }

    #[test]
    fn stats_by_channel() {
        let (registry, _) = record_registry();
        let mut config = RootConfig::new()
            .with_channel("a", record(Level::Debug, "a"))
            .with_channel("out", ArbitraryConfig::new("std").with_level(Level::Info));
        config.default_channel = "out".to_string();
        let manager = Manager::new(&registry, config).unwrap();

        manager.info("counted", &[]);
        manager.debug("filtered by channel", &[]);

        let stats = manager.channel_stats();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats["out"].total, 1);
    }
}
