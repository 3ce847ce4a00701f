//! Filter configuration.
//!
//! Settings can come from a TOML document, a file or the environment:
//!
//! ```toml
//! operator_policy = "strict"
//! param_style = "question"
//! namespace_column = "namespace"
//! data_column = "data"
//! ```
//!
//! | Variable                       | Values                 | Default     |
//! |--------------------------------|------------------------|-------------|
//! | `ATTRFILTER_OPERATOR_POLICY`   | `lenient`, `strict`    | `lenient`   |
//! | `ATTRFILTER_PARAM_STYLE`       | `dollar`, `question`   | `dollar`    |
//! | `ATTRFILTER_NAMESPACE_COLUMN`  | column name            | `namespace` |
//! | `ATTRFILTER_DATA_COLUMN`       | column name            | `data`      |

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compile::{DEFAULT_DATA_COLUMN, DEFAULT_NAMESPACE_COLUMN, PredicateCompiler};
use crate::decode::{Decoder, OperatorPolicy};
use crate::env::{EnvSource, StdEnvSource};
use crate::error::{ConfigError, ConfigResult};
use crate::sql::ParamStyle;

/// Environment variable for [`FilterConfig::operator_policy`].
pub const ENV_OPERATOR_POLICY: &str = "ATTRFILTER_OPERATOR_POLICY";
/// Environment variable for [`FilterConfig::param_style`].
pub const ENV_PARAM_STYLE: &str = "ATTRFILTER_PARAM_STYLE";
/// Environment variable for [`FilterConfig::namespace_column`].
pub const ENV_NAMESPACE_COLUMN: &str = "ATTRFILTER_NAMESPACE_COLUMN";
/// Environment variable for [`FilterConfig::data_column`].
pub const ENV_DATA_COLUMN: &str = "ATTRFILTER_DATA_COLUMN";

/// Decoder and compiler settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Treatment of unknown operators and malformed tokens.
    pub operator_policy: OperatorPolicy,
    /// Placeholder style of compiled predicates.
    pub param_style: ParamStyle,
    /// Name of the namespace column.
    pub namespace_column: String,
    /// Name of the JSON document column.
    pub data_column: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            operator_policy: OperatorPolicy::default(),
            param_style: ParamStyle::default(),
            namespace_column: DEFAULT_NAMESPACE_COLUMN.to_string(),
            data_column: DEFAULT_DATA_COLUMN.to_string(),
        }
    }
}

impl FilterConfig {
    /// Parse a TOML document. Missing settings keep their defaults.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading filter configuration");
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Read settings from the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_env_source(&StdEnvSource)
    }

    /// Read settings from an environment source. Unset variables keep their
    /// defaults.
    pub fn from_env_source(source: &impl EnvSource) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(value) = source.get(ENV_OPERATOR_POLICY) {
            config.operator_policy =
                OperatorPolicy::from_name(&value).ok_or_else(|| ConfigError::InvalidValue {
                    name: ENV_OPERATOR_POLICY.to_string(),
                    value: value.clone(),
                    message: "expected `lenient` or `strict`".to_string(),
                })?;
        }
        if let Some(value) = source.get(ENV_PARAM_STYLE) {
            config.param_style =
                ParamStyle::from_name(&value).ok_or_else(|| ConfigError::InvalidValue {
                    name: ENV_PARAM_STYLE.to_string(),
                    value: value.clone(),
                    message: "expected `dollar` or `question`".to_string(),
                })?;
        }
        if let Some(value) = source.get(ENV_NAMESPACE_COLUMN) {
            config.namespace_column = value;
        }
        if let Some(value) = source.get(ENV_DATA_COLUMN) {
            config.data_column = value;
        }

        config.validate()?;
        debug!(
            policy = ?config.operator_policy,
            style = ?config.param_style,
            "filter configuration loaded from environment"
        );
        Ok(config)
    }

    /// Check that column names are plain SQL identifiers.
    pub fn validate(&self) -> ConfigResult<()> {
        for (name, column) in [
            ("namespace_column", &self.namespace_column),
            ("data_column", &self.data_column),
        ] {
            if !is_identifier(column) {
                return Err(ConfigError::InvalidValue {
                    name: name.to_string(),
                    value: column.clone(),
                    message: "expected a non-empty identifier of letters, digits and `_`"
                        .to_string(),
                });
            }
        }
        Ok(())
    }

    /// A decoder using the configured policy.
    pub fn decoder(&self) -> Decoder {
        Decoder::with_policy(self.operator_policy)
    }

    /// A compiler using the configured style and columns.
    pub fn compiler(&self) -> PredicateCompiler {
        PredicateCompiler::new()
            .param_style(self.param_style)
            .namespace_column(&self.namespace_column)
            .data_column(&self.data_column)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnvSource;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = FilterConfig::default();
        assert_eq!(config.operator_policy, OperatorPolicy::Lenient);
        assert_eq!(config.param_style, ParamStyle::Dollar);
        assert_eq!(config.namespace_column, "namespace");
        assert_eq!(config.data_column, "data");
    }

    #[test]
    fn test_from_toml_partial() {
        let config = FilterConfig::from_toml_str("operator_policy = \"strict\"").unwrap();
        assert_eq!(config.operator_policy, OperatorPolicy::Strict);
        assert_eq!(config.param_style, ParamStyle::Dollar);
    }

    #[test]
    fn test_from_toml_rejects_unknown_style() {
        let err = FilterConfig::from_toml_str("param_style = \"colon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_from_env_source() {
        let source = MapEnvSource::new()
            .set(ENV_OPERATOR_POLICY, "Strict")
            .set(ENV_PARAM_STYLE, "question")
            .set(ENV_DATA_COLUMN, "attributes");
        let config = FilterConfig::from_env_source(&source).unwrap();

        assert_eq!(config.operator_policy, OperatorPolicy::Strict);
        assert_eq!(config.param_style, ParamStyle::Question);
        assert_eq!(config.namespace_column, "namespace");
        assert_eq!(config.data_column, "attributes");
    }

    #[test]
    fn test_from_env_source_invalid_policy() {
        let source = MapEnvSource::new().set(ENV_OPERATOR_POLICY, "loose");
        let err = FilterConfig::from_env_source(&source).unwrap_err();
        assert!(err.to_string().contains(ENV_OPERATOR_POLICY));
    }

    #[test]
    fn test_validate_columns() {
        let source = MapEnvSource::new().set(ENV_NAMESPACE_COLUMN, "ns; DROP");
        assert!(FilterConfig::from_env_source(&source).is_err());

        assert!(is_identifier("_data2"));
        assert!(!is_identifier("2data"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_builds_decoder_and_compiler() {
        let config = FilterConfig {
            operator_policy: OperatorPolicy::Strict,
            param_style: ParamStyle::Question,
            ..FilterConfig::default()
        };
        assert_eq!(config.decoder(), Decoder::strict());
        assert_eq!(config.compiler().style(), ParamStyle::Question);
    }
}
