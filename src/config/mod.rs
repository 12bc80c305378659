pub mod attributes;
pub mod log_level;

use std::path::Path;

use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use serde::Deserialize;
use tracing::error;

use crate::config::{attributes::deserialize_attributes, log_level::LogLevel};
use crate::filterset::{self, MatchType, RegexpConfig};
use crate::matcher::{self, AttributeSpec, AttributesMatcher};

pub const CONFIG_FILE_NAME: &str = "filter.yaml";
pub const ENV_PREFIX: &str = "DD_FILTER_";

/// Settings of an attribute filter stage.
///
/// Values come from `filter.yaml` and are overridden by `DD_FILTER_*`
/// environment variables.
#[derive(Debug, PartialEq, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub log_level: LogLevel,
    pub match_type: MatchType,
    pub regexp: Option<RegexpConfig>,
    #[serde(deserialize_with = "deserialize_attributes")]
    pub attributes: Vec<AttributeSpec>,
}

#[derive(Debug, PartialEq, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum ConfigError {
    #[error("failed to parse filter config: {0}")]
    ParseError(String),
}

impl Config {
    #[must_use]
    pub fn filter_config(&self) -> filterset::Config {
        filterset::Config {
            match_type: self.match_type,
            regexp: self.regexp,
        }
    }

    pub fn build_matcher(&self) -> Result<AttributesMatcher, matcher::Error> {
        AttributesMatcher::new(&self.filter_config(), &self.attributes).inspect_err(|e| {
            error!("Failed to compile attribute filter: {e}");
        })
    }
}

#[allow(clippy::module_name_repetitions)]
pub fn get_config(config_directory: &Path) -> Result<Config, ConfigError> {
    let path = config_directory.join(CONFIG_FILE_NAME);

    let figment = Figment::new()
        .merge(Yaml::file(&path))
        .merge(Env::prefixed(ENV_PREFIX));

    figment.extract().map_err(|err| {
        error!("Failed to parse filter config: {err}");
        ConfigError::ParseError(err.to_string())
    })
}

#[cfg(test)]
pub mod tests {
    use serde_json::json;

    use super::*;
    use crate::value::Value;

    #[test]
    fn test_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            let config = get_config(Path::new("")).expect("should parse config");
            assert_eq!(config, Config::default());
            assert_eq!(config.match_type, MatchType::Strict);
            assert_eq!(config.log_level, LogLevel::Warn);
            assert!(config.attributes.is_empty());
            Ok(())
        });
    }

    #[test]
    fn test_parse_yaml() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "filter.yaml",
                r"
                log_level: debug
                match_type: regexp
                regexp:
                  size_limit: 1048576
                attributes:
                  - key: http.method
                    value: GET.*
                  - key: error
            ",
            )?;

            let config = get_config(Path::new("")).expect("should parse config");
            assert_eq!(config.log_level, LogLevel::Debug);
            assert_eq!(config.match_type, MatchType::Regexp);
            assert_eq!(
                config.regexp,
                Some(RegexpConfig {
                    size_limit: Some(1_048_576)
                })
            );
            assert_eq!(
                config.attributes,
                vec![
                    AttributeSpec::with_value("http.method", json!("GET.*")),
                    AttributeSpec::key_only("error"),
                ]
            );
            Ok(())
        });
    }

    #[test]
    fn test_yaml_value_types() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "filter.yaml",
                r#"
                attributes:
                  - key: http.status_code
                    value: 200
                  - key: ratio
                    value: 0.5
                  - key: error
                    value: true
                  - key: code
                    value: "200"
            "#,
            )?;

            let config = get_config(Path::new("")).expect("should parse config");
            assert_eq!(
                config.attributes,
                vec![
                    AttributeSpec::with_value("http.status_code", json!(200)),
                    AttributeSpec::with_value("ratio", json!(0.5)),
                    AttributeSpec::with_value("error", json!(true)),
                    AttributeSpec::with_value("code", json!("200")),
                ]
            );
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_yaml() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "filter.yaml",
                r"
                match_type: strict
                attributes:
                  - key: from_yaml
            ",
            )?;
            jail.set_env("DD_FILTER_MATCH_TYPE", "regexp");
            jail.set_env(
                "DD_FILTER_ATTRIBUTES",
                r#"[{"key":"http.method","value":"^GET$"}]"#,
            );

            let config = get_config(Path::new("")).expect("should parse config");
            assert_eq!(config.match_type, MatchType::Regexp);
            assert_eq!(
                config.attributes,
                vec![AttributeSpec::with_value("http.method", json!("^GET$"))]
            );
            Ok(())
        });
    }

    #[test]
    fn test_invalid_match_type() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("DD_FILTER_MATCH_TYPE", "glob");

            let err = get_config(Path::new("")).expect_err("should reject match type");
            assert!(matches!(err, ConfigError::ParseError(_)));
            Ok(())
        });
    }

    #[test]
    fn test_invalid_log_level_falls_back_to_warn() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("DD_FILTER_LOG_LEVEL", "chatty");

            let config = get_config(Path::new("")).expect("should parse config");
            assert_eq!(config.log_level, LogLevel::Warn);
            Ok(())
        });
    }

    #[test]
    fn test_build_matcher() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "filter.yaml",
                r"
                attributes:
                  - key: http.status_code
                    value: 200
            ",
            )?;

            let config = get_config(Path::new("")).expect("should parse config");
            let matcher = config.build_matcher().expect("should compile");

            let mut attrs = std::collections::HashMap::new();
            attrs.insert("http.status_code".to_string(), Value::Int(200));
            assert!(matcher.matches(&attrs));
            Ok(())
        });
    }

    #[test]
    fn test_build_matcher_rejects_non_string_regexp() {
        let config = Config {
            match_type: MatchType::Regexp,
            attributes: vec![AttributeSpec::with_value("http.method", json!(1))],
            ..Config::default()
        };

        let err = config.build_matcher().expect_err("should reject value type");
        assert!(matches!(err, matcher::Error::UnsupportedValueType { .. }));
    }

    #[test]
    fn test_filter_config() {
        let config = Config {
            match_type: MatchType::Regexp,
            regexp: Some(RegexpConfig {
                size_limit: Some(10),
            }),
            ..Config::default()
        };
        assert_eq!(
            config.filter_config(),
            filterset::Config {
                match_type: MatchType::Regexp,
                regexp: Some(RegexpConfig {
                    size_limit: Some(10)
                }),
            }
        );
    }
}
