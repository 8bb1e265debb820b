//! Warehouse credentials loaded from the environment.

use std::fmt;

use crate::server::error::config::ConfigError;

pub const ACCOUNT_VAR: &str = "SF_ACCOUNT";
pub const USER_VAR: &str = "SF_USER";
pub const PRIVATE_KEY_PATH_VAR: &str = "SF_PRIVATE_KEY_PATH_1";
pub const PRIVATE_KEY_PASSPHRASE_VAR: &str = "SF_PRIVATE_KEY_PASSPHRASE_2";
pub const DATABASE_VAR: &str = "SF_DATABASE";
pub const SCHEMA_VAR: &str = "SF_SCHEMA";
pub const WAREHOUSE_VAR: &str = "SF_WAREHOUSE";
pub const ROLE_VAR: &str = "SF_ROLE";
/// Optional override of the SQL API base URL
pub const API_URL_VAR: &str = "SF_API_URL";

/// Query tag attached to every statement for attribution in the warehouse
pub const QUERY_TAG: &str = "EXPORTATIONS_APP";

/// Connection parameters for the Snowflake warehouse.
#[derive(Clone)]
pub struct Config {
    pub account: String,
    pub user: String,
    /// PEM encoded, passphrase protected private key
    pub private_key: Vec<u8>,
    pub private_key_passphrase: String,
    pub database: String,
    pub schema: String,
    pub warehouse: String,
    pub role: String,
    /// Base URL of the SQL API, derived from the account when unset
    pub api_url: Option<String>,
}

impl Config {
    /// Loads the configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads the configuration using `lookup` to resolve variable names
    ///
    /// Every required variable must be present and non-empty. The private key is then read
    /// from the file named by [`PRIVATE_KEY_PATH_VAR`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> Result<String, ConfigError> {
            match lookup(name) {
                None => Err(ConfigError::MissingEnvVar(name.to_string())),
                Some(value) if value.trim().is_empty() => {
                    Err(ConfigError::EmptyEnvVar(name.to_string()))
                }
                Some(value) => Ok(value),
            }
        };

        let private_key_path = required(PRIVATE_KEY_PATH_VAR)?;
        let account = required(ACCOUNT_VAR)?;
        let user = required(USER_VAR)?;
        let private_key_passphrase = required(PRIVATE_KEY_PASSPHRASE_VAR)?;
        let database = required(DATABASE_VAR)?;
        let schema = required(SCHEMA_VAR)?;
        let warehouse = required(WAREHOUSE_VAR)?;
        let role = required(ROLE_VAR)?;

        let private_key =
            std::fs::read(&private_key_path).map_err(|e| ConfigError::PrivateKeyUnreadable {
                path: private_key_path.clone(),
                reason: e.to_string(),
            })?;

        if private_key.is_empty() {
            return Err(ConfigError::EmptyPrivateKey(private_key_path));
        }

        let api_url = lookup(API_URL_VAR).filter(|url| !url.trim().is_empty());

        Ok(Self {
            account,
            user,
            private_key,
            private_key_passphrase,
            database,
            schema,
            warehouse,
            role,
            api_url,
        })
    }

    /// Base URL of the Snowflake SQL API for this account
    pub fn base_url(&self) -> String {
        match &self.api_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!(
                "https://{}.snowflakecomputing.com",
                self.account.to_lowercase()
            ),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("account", &self.account)
            .field("user", &self.user)
            .field("private_key", &"<redacted>")
            .field("private_key_passphrase", &"<redacted>")
            .field("database", &self.database)
            .field("schema", &self.schema)
            .field("warehouse", &self.warehouse)
            .field("role", &self.role)
            .field("api_url", &self.api_url)
            .finish()
    }
}
