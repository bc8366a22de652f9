//! Configuration for serde contexts.
//!
//! A [`Configuration`] is a flat key/value map as supplied by tests. It is
//! merged into the defaults exactly once, producing a validated
//! [`TableConfig`] that the context builder hands to every registry.
//!
//! Keys that no registry understands are kept but ignored, so test
//! configurations can stay minimal.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

/// Controls how catalog objects are written into a compiled plan.
pub const CATALOG_PLAN_COMPILATION: &str = "table.plan.compile.catalog-objects";

/// Controls how catalog objects are restored from a compiled plan.
pub const CATALOG_PLAN_RESTORE: &str = "table.plan.restore.catalog-objects";

/// Name of the catalog created for an empty catalog registry.
pub const BUILTIN_CATALOG_NAME: &str = "table.builtin-catalog-name";

/// Name of the database created for an empty catalog registry.
pub const BUILTIN_DATABASE_NAME: &str = "table.builtin-database-name";

const KNOWN_KEYS: [&str; 4] = [
    CATALOG_PLAN_COMPILATION,
    CATALOG_PLAN_RESTORE,
    BUILTIN_CATALOG_NAME,
    BUILTIN_DATABASE_NAME,
];

/// Error raised for malformed or contradictory configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A recognized key holds a value that cannot be parsed.
    #[error("invalid value '{value}' for '{key}', expected {expected}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// The rejected value.
        value: String,
        /// Description of accepted values.
        expected: &'static str,
    },

    /// Two recognized options contradict each other.
    #[error("conflicting configuration: {message}")]
    Conflict {
        /// What conflicts with what.
        message: String,
    },
}

/// Error for a mode spelling that names no mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mode '{0}'")]
pub struct ParseModeError(String);

// =============================================================================
// Raw configuration
// =============================================================================

/// A single configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    /// String value.
    String(String),
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// Flat key/value configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    entries: BTreeMap<String, ConfigValue>,
}

impl Configuration {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any previous one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Get a value.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key)
    }

    /// Check whether a key is set.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the configuration is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Merge `other` into this configuration.
    ///
    /// Values from `other` overwrite values in `self` for duplicate keys.
    pub fn merge(&mut self, other: &Configuration) {
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Configuration
where
    K: Into<String>,
    V: Into<ConfigValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Configuration builder for fluent API.
///
/// # Example
///
/// ```
/// use plan_serde_harness::config::{CatalogPlanCompilation, ConfigBuilder};
///
/// let config = ConfigBuilder::new()
///     .catalog_plan_compilation(CatalogPlanCompilation::Identifier)
///     .set("pipeline.name", "ignored by every registry")
///     .build();
/// assert_eq!(config.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Configuration,
}

impl ConfigBuilder {
    /// Create a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an arbitrary key.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.config.set(key, value);
        self
    }

    /// Set how catalog objects are compiled into plans.
    pub fn catalog_plan_compilation(self, mode: CatalogPlanCompilation) -> Self {
        self.set(CATALOG_PLAN_COMPILATION, mode.as_str())
    }

    /// Set how catalog objects are restored from plans.
    pub fn catalog_plan_restore(self, mode: CatalogPlanRestore) -> Self {
        self.set(CATALOG_PLAN_RESTORE, mode.as_str())
    }

    /// Set the name of the builtin catalog.
    pub fn builtin_catalog(self, name: impl Into<String>) -> Self {
        self.set(BUILTIN_CATALOG_NAME, name.into())
    }

    /// Set the name of the builtin database.
    pub fn builtin_database(self, name: impl Into<String>) -> Self {
        self.set(BUILTIN_DATABASE_NAME, name.into())
    }

    /// Build the configuration.
    pub fn build(self) -> Configuration {
        self.config
    }
}

// =============================================================================
// Typed options
// =============================================================================

/// How catalog objects are written into a compiled plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CatalogPlanCompilation {
    /// Write the identifier and the resolved object.
    #[default]
    All,
    /// Write the identifier only.
    Identifier,
}

impl CatalogPlanCompilation {
    /// The configuration spelling of this mode.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Identifier => "IDENTIFIER",
        }
    }
}

impl FromStr for CatalogPlanCompilation {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ALL" => Ok(Self::All),
            "IDENTIFIER" => Ok(Self::Identifier),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// How catalog objects are restored from a compiled plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CatalogPlanRestore {
    /// Use the inlined object when present, otherwise look it up.
    #[default]
    All,
    /// Require the inlined object, never consult the catalog.
    AllEnforced,
    /// Always look the object up in the catalog.
    Identifier,
}

impl CatalogPlanRestore {
    /// The configuration spelling of this mode.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::AllEnforced => "ALL_ENFORCED",
            Self::Identifier => "IDENTIFIER",
        }
    }
}

impl FromStr for CatalogPlanRestore {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ALL" => Ok(Self::All),
            "ALL_ENFORCED" => Ok(Self::AllEnforced),
            "IDENTIFIER" => Ok(Self::Identifier),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// Validated view of the configuration, with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    configuration: Configuration,
    compilation: CatalogPlanCompilation,
    restore: CatalogPlanRestore,
    builtin_catalog: String,
    builtin_database: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            configuration: Configuration::new(),
            compilation: CatalogPlanCompilation::default(),
            restore: CatalogPlanRestore::default(),
            builtin_catalog: "default_catalog".to_string(),
            builtin_database: "default_database".to_string(),
        }
    }
}

impl TableConfig {
    /// Merge `configuration` into the defaults.
    pub fn from_configuration(configuration: &Configuration) -> Result<Self, ConfigurationError> {
        let mut config = Self::default();
        config.add_configuration(configuration)?;
        Ok(config)
    }

    /// Merge `configuration` into this config, re-validating every option.
    pub fn add_configuration(
        &mut self,
        configuration: &Configuration,
    ) -> Result<(), ConfigurationError> {
        let mut merged = self.configuration.clone();
        merged.merge(configuration);

        let compilation = parse_option(&merged, CATALOG_PLAN_COMPILATION, "ALL or IDENTIFIER")?
            .unwrap_or(self.compilation);
        let restore =
            parse_option(&merged, CATALOG_PLAN_RESTORE, "ALL, ALL_ENFORCED or IDENTIFIER")?
                .unwrap_or(self.restore);
        let builtin_catalog = non_empty(&merged, BUILTIN_CATALOG_NAME)?
            .unwrap_or_else(|| self.builtin_catalog.clone());
        let builtin_database = non_empty(&merged, BUILTIN_DATABASE_NAME)?
            .unwrap_or_else(|| self.builtin_database.clone());

        if compilation == CatalogPlanCompilation::Identifier
            && restore == CatalogPlanRestore::AllEnforced
        {
            return Err(ConfigurationError::Conflict {
                message: format!(
                    "'{CATALOG_PLAN_RESTORE}' = ALL_ENFORCED requires inlined catalog objects, \
                     but '{CATALOG_PLAN_COMPILATION}' = IDENTIFIER never writes them"
                ),
            });
        }

        for (key, _) in configuration.iter().filter(|(k, _)| !KNOWN_KEYS.contains(k)) {
            debug!(key, "ignoring unrecognized configuration key");
        }

        *self = Self {
            configuration: merged,
            compilation,
            restore,
            builtin_catalog,
            builtin_database,
        };
        Ok(())
    }

    /// The merged raw configuration, including ignored keys.
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// How catalog objects are compiled into plans.
    pub fn catalog_plan_compilation(&self) -> CatalogPlanCompilation {
        self.compilation
    }

    /// How catalog objects are restored from plans.
    pub fn catalog_plan_restore(&self) -> CatalogPlanRestore {
        self.restore
    }

    /// Name of the builtin catalog.
    pub fn builtin_catalog(&self) -> &str {
        &self.builtin_catalog
    }

    /// Name of the builtin database.
    pub fn builtin_database(&self) -> &str {
        &self.builtin_database
    }
}

fn parse_option<T: FromStr>(
    config: &Configuration,
    key: &str,
    expected: &'static str,
) -> Result<Option<T>, ConfigurationError> {
    let Some(value) = config.get(key) else {
        return Ok(None);
    };
    let text = value.to_string();
    text.parse().map(Some).map_err(|_| ConfigurationError::InvalidValue {
        key: key.to_string(),
        value: text,
        expected,
    })
}

fn non_empty(config: &Configuration, key: &str) -> Result<Option<String>, ConfigurationError> {
    match config.get(key) {
        None => Ok(None),
        Some(ConfigValue::String(s)) if !s.trim().is_empty() => Ok(Some(s.clone())),
        Some(other) => Err(ConfigurationError::InvalidValue {
            key: key.to_string(),
            value: other.to_string(),
            expected: "a non-empty string",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TableConfig::default();
        assert_eq!(config.catalog_plan_compilation(), CatalogPlanCompilation::All);
        assert_eq!(config.catalog_plan_restore(), CatalogPlanRestore::All);
        assert_eq!(config.builtin_catalog(), "default_catalog");
        assert_eq!(config.builtin_database(), "default_database");
    }

    #[test]
    fn test_builder() {
        let config = ConfigBuilder::new()
            .catalog_plan_restore(CatalogPlanRestore::Identifier)
            .builtin_catalog("cat")
            .build();
        assert_eq!(config.get(CATALOG_PLAN_RESTORE), Some(&ConfigValue::from("IDENTIFIER")));
        assert_eq!(config.get(BUILTIN_CATALOG_NAME), Some(&ConfigValue::from("cat")));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let config: Configuration = [("some.unknown.key", "x"), ("parallelism.default", "4")]
            .into_iter()
            .collect();
        let table_config = TableConfig::from_configuration(&config).unwrap();
        assert_eq!(table_config.catalog_plan_compilation(), CatalogPlanCompilation::All);
        assert!(table_config.configuration().contains_key("some.unknown.key"));
    }

    #[test]
    fn test_modes_are_case_insensitive() {
        let config = ConfigBuilder::new()
            .set(CATALOG_PLAN_COMPILATION, "identifier")
            .set(CATALOG_PLAN_RESTORE, "all_enforced")
            .build();
        // IDENTIFIER + ALL_ENFORCED conflicts, so only check the parsing path.
        assert!(matches!(
            TableConfig::from_configuration(&config),
            Err(ConfigurationError::Conflict { .. })
        ));

        let config = ConfigBuilder::new().set(CATALOG_PLAN_RESTORE, "all_enforced").build();
        let table_config = TableConfig::from_configuration(&config).unwrap();
        assert_eq!(table_config.catalog_plan_restore(), CatalogPlanRestore::AllEnforced);
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(
            "identifier".parse::<CatalogPlanCompilation>(),
            Ok(CatalogPlanCompilation::Identifier)
        );
        assert_eq!(
            "All_Enforced".parse::<CatalogPlanRestore>(),
            Ok(CatalogPlanRestore::AllEnforced)
        );
        let err = "SOMETIMES".parse::<CatalogPlanRestore>().unwrap_err();
        assert_eq!(err, ParseModeError("SOMETIMES".to_string()));
        assert_eq!(err.to_string(), "unknown mode 'SOMETIMES'");
    }

    #[test]
    fn test_invalid_value() {
        let config = ConfigBuilder::new().set(CATALOG_PLAN_COMPILATION, "SOMETIMES").build();
        let err = TableConfig::from_configuration(&config).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::InvalidValue {
                key: CATALOG_PLAN_COMPILATION.to_string(),
                value: "SOMETIMES".to_string(),
                expected: "ALL or IDENTIFIER",
            }
        );
    }

    #[test]
    fn test_empty_catalog_name_rejected() {
        let config = ConfigBuilder::new().builtin_catalog("  ").build();
        assert!(matches!(
            TableConfig::from_configuration(&config),
            Err(ConfigurationError::InvalidValue { .. })
        ));

        let config = ConfigBuilder::new().set(BUILTIN_DATABASE_NAME, 7i64).build();
        assert!(TableConfig::from_configuration(&config).is_err());
    }

    #[test]
    fn test_add_configuration_overrides() {
        let mut config = TableConfig::default();
        config
            .add_configuration(&ConfigBuilder::new().builtin_database("db1").build())
            .unwrap();
        config
            .add_configuration(&ConfigBuilder::new().builtin_database("db2").build())
            .unwrap();
        assert_eq!(config.builtin_database(), "db2");
        assert_eq!(config.configuration().len(), 1);
    }
}
