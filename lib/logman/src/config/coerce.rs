/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::any::Any;

use yaml_rust::{Yaml, yaml};

use super::{ArbitraryConfig, ChannelConfig, TypedChannelConfig};
use crate::ConfigError;

/// Get the driver specific config out of a channel config.
///
/// A typed config of type `T` is returned as is, a typed config of any other
/// type is a shape error, and an arbitrary config is handed to `parse`.
pub fn coerce<T, F>(config: &ChannelConfig, driver: &'static str, parse: F) -> Result<T, ConfigError>
where
    T: TypedChannelConfig + Clone,
    F: FnOnce(&ArbitraryConfig) -> Result<T, ConfigError>,
{
    match config {
        ChannelConfig::Typed(typed) => {
            let any: &dyn Any = &**typed;
            any.downcast_ref::<T>()
                .cloned()
                .ok_or_else(|| ConfigError::Shape {
                    driver,
                    found: typed.driver_name().to_string(),
                })
        }
        ChannelConfig::Arbitrary(raw) => parse(raw),
    }
}

/// Walk a map of options, rejecting keys that are not strings.
///
/// `position` is the 1-based index of the map inside an enclosing sequence.
pub fn foreach_option<F>(
    options: &yaml::Hash,
    position: Option<usize>,
    mut f: F,
) -> Result<(), ConfigError>
where
    F: FnMut(&str, &Yaml) -> Result<(), ConfigError>,
{
    for (k, v) in options.iter() {
        let Yaml::String(option) = k else {
            return Err(ConfigError::OptionType {
                option: format!("{k:?}"),
                position,
                reason: "option name should be a string".to_string(),
            });
        };
        f(option, v)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use logman_types::Level;
    use yaml_rust::YamlLoader;

    #[derive(Clone, Debug, PartialEq)]
    struct EchoConfig {
        level: Level,
        verbose: bool,
    }

    impl TypedChannelConfig for EchoConfig {
        fn driver_name(&self) -> &str {
            "echo"
        }
    }

    #[derive(Clone, Debug)]
    struct OtherConfig;

    impl TypedChannelConfig for OtherConfig {
        fn driver_name(&self) -> &str {
            "other"
        }
    }

    fn parse_echo(config: &ChannelConfig) -> Result<EchoConfig, ConfigError> {
        coerce(config, "echo", |raw| {
            let mut echo = EchoConfig {
                level: raw.level,
                verbose: false,
            };
            foreach_option(&raw.extra, None, |option, v| match option {
                "verbose" => {
                    echo.verbose = logman_yaml::value::as_bool(v)
                        .map_err(|e| ConfigError::option_type(option, None, e))?;
                    Ok(())
                }
                _ => Err(ConfigError::unknown_option(option, None)),
            })?;
            Ok(echo)
        })
    }

    #[test]
    fn typed_identity() {
        let typed = EchoConfig {
            level: Level::Error,
            verbose: true,
        };
        let config = ChannelConfig::typed(typed.clone());
        assert_eq!(parse_echo(&config).unwrap(), typed);
    }

    #[test]
    fn typed_foreign() {
        let config = ChannelConfig::typed(OtherConfig);
        let e = parse_echo(&config).unwrap_err();
        assert!(matches!(e, ConfigError::Shape { driver: "echo", ref found } if found == "other"));
    }

    #[test]
    fn arbitrary() {
        let config = ArbitraryConfig::new("echo")
            .with_level(Level::Warning)
            .with_extra("verbose", Yaml::Boolean(true));
        let echo = parse_echo(&config.into()).unwrap();
        assert_eq!(
            echo,
            EchoConfig {
                level: Level::Warning,
                verbose: true
            }
        );
    }

    #[test]
    fn arbitrary_errors() {
        let config = ArbitraryConfig::new("echo").with_extra("colour", Yaml::Boolean(true));
        let e = parse_echo(&config.into()).unwrap_err();
        assert!(
            matches!(e, ConfigError::UnknownOption { ref option, position: None } if option == "colour")
        );

        let config =
            ArbitraryConfig::new("echo").with_extra("verbose", Yaml::Array(Vec::new()));
        let e = parse_echo(&config.into()).unwrap_err();
        assert!(matches!(e, ConfigError::OptionType { ref option, .. } if option == "verbose"));
    }

    #[test]
    fn non_string_option() {
        let doc = YamlLoader::load_from_str("1: true").unwrap().remove(0);
        let config = ArbitraryConfig {
            driver: "echo".to_string(),
            level: Level::Unset,
            extra: doc.into_hash().unwrap(),
        };
        let e = parse_echo(&config.into()).unwrap_err();
        assert!(matches!(e, ConfigError::OptionType { .. }));
    }
}
