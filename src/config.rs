//! Connection configuration for the Airtable API
//!
//! A validated, immutable set of connection parameters: personal access
//! token, base id, and an optional default table name. Values come from
//! explicit arguments or from environment variables under a prefix.

use crate::error::{Error, Result};
use crate::types::OptionStringExt;
use once_cell::sync::OnceCell;

/// Default environment variable prefix
pub const DEFAULT_ENV_PREFIX: &str = "AIRTABLE_";

/// Personal access tokens are prefixed `pat`
const TOKEN_PREFIX: &str = "pat";

/// Base ids are prefixed `app`
const BASE_ID_PREFIX: &str = "app";

/// Validated Airtable connection parameters
///
/// Immutable after construction. Use [`AirtableConfig::with_table`] to derive
/// a copy bound to a different default table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirtableConfig {
    access_token: String,
    base_id: String,
    table_name: Option<String>,
}

impl AirtableConfig {
    /// Create a config from explicit values, validating credential formats
    pub fn new(
        access_token: impl Into<String>,
        base_id: impl Into<String>,
        table_name: Option<String>,
    ) -> Result<Self> {
        let access_token = access_token.into();
        let base_id = base_id.into();

        if access_token.is_empty() {
            return Err(Error::config(
                "Airtable personal access token is required (AIRTABLE_ACCESS_TOKEN)",
            ));
        }
        if base_id.is_empty() {
            return Err(Error::config(
                "Airtable base id is required (AIRTABLE_BASE_ID)",
            ));
        }
        if !access_token.starts_with(TOKEN_PREFIX) {
            return Err(Error::config(
                "invalid access token format: personal access tokens start with 'pat' \
                 (legacy API keys are not supported)",
            ));
        }
        if !base_id.starts_with(BASE_ID_PREFIX) {
            return Err(Error::config(
                "invalid base id format: base ids start with 'app'",
            ));
        }

        Ok(Self {
            access_token,
            base_id,
            table_name: table_name.none_if_empty(),
        })
    }

    /// Create a config from `AIRTABLE_ACCESS_TOKEN`, `AIRTABLE_BASE_ID` and
    /// the optional `AIRTABLE_TABLE_NAME`
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_prefix(DEFAULT_ENV_PREFIX)
    }

    /// Create a config from `{prefix}ACCESS_TOKEN`, `{prefix}BASE_ID` and
    /// `{prefix}TABLE_NAME`
    ///
    /// Empty environment values count as missing.
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        let access_token = env_var(prefix, "ACCESS_TOKEN").unwrap_or_default();
        let base_id = env_var(prefix, "BASE_ID").unwrap_or_default();
        let table_name = env_var(prefix, "TABLE_NAME");
        Self::new(access_token, base_id, table_name)
    }

    /// The personal access token
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// The base id
    pub fn base_id(&self) -> &str {
        &self.base_id
    }

    /// The default table name, if one was configured
    pub fn default_table(&self) -> Option<&str> {
        self.table_name.as_deref()
    }

    /// Derive a copy of this config bound to a different default table
    ///
    /// The original config is not modified.
    #[must_use]
    pub fn with_table(&self, table_name: impl Into<String>) -> Self {
        Self {
            access_token: self.access_token.clone(),
            base_id: self.base_id.clone(),
            table_name: table_name.into().none_if_empty(),
        }
    }

    /// Resolve an effective table name from an override or the config default
    pub fn table_name(&self, override_name: Option<&str>) -> Result<String> {
        override_name
            .map(str::to_string)
            .or_else(|| self.table_name.clone())
            .ok_or_else(|| {
                Error::config("table name is required: set it on the config or pass it explicitly")
            })
    }
}

fn env_var(prefix: &str, key: &str) -> Option<String> {
    std::env::var(format!("{prefix}{key}")).ok().none_if_empty()
}

// ============================================================================
// Process-wide current configuration
// ============================================================================

static CURRENT_CONFIG: OnceCell<AirtableConfig> = OnceCell::new();

/// Set the process-wide current configuration
///
/// May be called at most once; a second call is a configuration error.
/// Components that were not handed an explicit config read it through
/// [`current_config`].
pub fn init_current_config(config: AirtableConfig) -> Result<()> {
    CURRENT_CONFIG
        .set(config)
        .map_err(|_| Error::config("current configuration is already set"))
}

/// Get the process-wide current configuration
pub fn current_config() -> Result<&'static AirtableConfig> {
    CURRENT_CONFIG.get().ok_or_else(|| {
        Error::config("no current configuration set: call init_current_config first")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = AirtableConfig::new("patABC123", "appXYZ789", Some("Users".into())).unwrap();
        assert_eq!(config.access_token(), "patABC123");
        assert_eq!(config.base_id(), "appXYZ789");
        assert_eq!(config.default_table(), Some("Users"));
    }

    #[test]
    fn test_missing_token() {
        let err = AirtableConfig::new("", "appXYZ789", None).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_missing_base_id() {
        let err = AirtableConfig::new("patABC123", "", None).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_bad_token_prefix() {
        let err = AirtableConfig::new("keyLEGACY", "appXYZ789", None).unwrap_err();
        assert!(err.to_string().contains("pat"));
    }

    #[test]
    fn test_bad_base_id_prefix() {
        let err = AirtableConfig::new("patABC123", "tblXYZ789", None).unwrap_err();
        assert!(err.to_string().contains("app"));
    }

    #[test]
    fn test_with_table_does_not_mutate_original() {
        let config = AirtableConfig::new("patABC123", "appXYZ789", Some("Users".into())).unwrap();
        let derived = config.with_table("Tasks");
        assert_eq!(derived.default_table(), Some("Tasks"));
        assert_eq!(config.default_table(), Some("Users"));
        assert_eq!(derived.access_token(), config.access_token());
    }

    #[test]
    fn test_table_name_resolution() {
        let config = AirtableConfig::new("patABC123", "appXYZ789", Some("Users".into())).unwrap();
        assert_eq!(config.table_name(None).unwrap(), "Users");
        assert_eq!(config.table_name(Some("Tasks")).unwrap(), "Tasks");

        let bare = AirtableConfig::new("patABC123", "appXYZ789", None).unwrap();
        assert!(bare.table_name(None).is_err());
    }

    #[test]
    fn test_from_env_with_prefix() {
        std::env::set_var("AIRMODEL_TEST_OK_ACCESS_TOKEN", "patENV123");
        std::env::set_var("AIRMODEL_TEST_OK_BASE_ID", "appENV456");
        std::env::set_var("AIRMODEL_TEST_OK_TABLE_NAME", "FromEnv");

        let config = AirtableConfig::from_env_with_prefix("AIRMODEL_TEST_OK_").unwrap();
        assert_eq!(config.access_token(), "patENV123");
        assert_eq!(config.base_id(), "appENV456");
        assert_eq!(config.default_table(), Some("FromEnv"));

        std::env::remove_var("AIRMODEL_TEST_OK_ACCESS_TOKEN");
        std::env::remove_var("AIRMODEL_TEST_OK_BASE_ID");
        std::env::remove_var("AIRMODEL_TEST_OK_TABLE_NAME");
    }

    #[test]
    fn test_from_env_missing_token() {
        let err = AirtableConfig::from_env_with_prefix("AIRMODEL_TEST_UNSET_").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_from_env_bad_prefixes() {
        std::env::set_var("AIRMODEL_TEST_BAD_ACCESS_TOKEN", "keyLEGACY");
        std::env::set_var("AIRMODEL_TEST_BAD_BASE_ID", "appENV456");
        let err = AirtableConfig::from_env_with_prefix("AIRMODEL_TEST_BAD_").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        std::env::set_var("AIRMODEL_TEST_BAD_ACCESS_TOKEN", "patENV123");
        std::env::set_var("AIRMODEL_TEST_BAD_BASE_ID", "baseENV456");
        let err = AirtableConfig::from_env_with_prefix("AIRMODEL_TEST_BAD_").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        std::env::remove_var("AIRMODEL_TEST_BAD_ACCESS_TOKEN");
        std::env::remove_var("AIRMODEL_TEST_BAD_BASE_ID");
    }

    #[test]
    fn test_empty_env_value_counts_as_missing() {
        std::env::set_var("AIRMODEL_TEST_EMPTY_ACCESS_TOKEN", "");
        std::env::set_var("AIRMODEL_TEST_EMPTY_BASE_ID", "appENV456");
        let err = AirtableConfig::from_env_with_prefix("AIRMODEL_TEST_EMPTY_").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        std::env::remove_var("AIRMODEL_TEST_EMPTY_ACCESS_TOKEN");
        std::env::remove_var("AIRMODEL_TEST_EMPTY_BASE_ID");
    }
}
