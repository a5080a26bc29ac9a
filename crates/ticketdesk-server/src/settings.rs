//! Configuracion del servidor, leida del entorno al arrancar.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use ticketdesk_orders::bigquery::{BigQueryConfig, DEFAULT_API_BASE_URL};
use ticketdesk_orders::{CredentialSource, OrderSourceError};

pub const DEFAULT_PROJECT_ID: &str = "dogwood-baton-345622";
pub const DEFAULT_DATASET_ID: &str = "fleek_raw";
pub const DEFAULT_TABLE_ID: &str = "order_line_status_details";

/// Server settings.
///
/// Every field maps to an environment variable of the same name in upper
/// case, e.g. `cache_duration_secs` is read from `CACHE_DURATION_SECS`.
#[derive(Clone, Deserialize)]
pub struct Settings {
    pub host: String,
    pub port: u16,

    bigquery_project_id: Option<String>,
    pub bigquery_dataset_id: String,
    pub bigquery_table_id: String,
    bigquery_api_url: Option<String>,

    google_application_credentials_json: Option<String>,
    bigquery_credentials: Option<String>,
    bigquery_access_token: Option<String>,
    bigquery_key_file: Option<PathBuf>,
    google_application_credentials: Option<PathBuf>,

    /// Serve orders from a local JSON file instead of BigQuery.
    pub orders_file: Option<PathBuf>,

    pub cache_duration_secs: u64,
    pub order_row_limit: u32,
    pub upstream_timeout_secs: u64,
    pub search_default_limit: usize,
}

/// Where order records come from.
#[derive(Debug, Clone)]
pub enum OrderSourceSettings {
    File(PathBuf),
    BigQuery(BigQueryConfig),
}

impl Settings {
    /// Loads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(Environment::default())
    }

    /// Loads settings from an explicit variable map instead of the process
    /// environment.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: config::Map<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::load(Environment::default().source(Some(map)))
    }

    fn load(env: Environment) -> Result<Self, ConfigError> {
        let settings: Self = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3001)?
            .set_default("bigquery_dataset_id", DEFAULT_DATASET_ID)?
            .set_default("bigquery_table_id", DEFAULT_TABLE_ID)?
            .set_default("cache_duration_secs", 300)?
            .set_default("order_row_limit", 10_000)?
            .set_default("upstream_timeout_secs", 30)?
            .set_default("search_default_limit", 50)?
            .add_source(env.ignore_empty(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_duration_secs == 0 {
            return Err(ConfigError::Message(
                "CACHE_DURATION_SECS must be greater than zero".to_string(),
            ));
        }
        if self.upstream_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "UPSTREAM_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Address to bind.
    pub fn addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    /// Project id, falling back to the default project.
    pub fn project_id(&self) -> &str {
        self.bigquery_project_id
            .as_deref()
            .unwrap_or(DEFAULT_PROJECT_ID)
    }

    /// True when `BIGQUERY_PROJECT_ID` was set explicitly.
    pub fn has_project_id(&self) -> bool {
        self.bigquery_project_id.is_some()
    }

    /// Refresh interval and staleness threshold of the order cache.
    pub fn cache_duration(&self) -> Duration {
        Duration::from_secs(self.cache_duration_secs)
    }

    /// Upstream request timeout.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    /// Name of the variable the credentials come from, or `none`.
    ///
    /// Follows the same precedence as [`Settings::credential_source`].
    pub fn credentials_env_var(&self) -> &'static str {
        if self.google_application_credentials_json.is_some() {
            "GOOGLE_APPLICATION_CREDENTIALS_JSON"
        } else if self.bigquery_credentials.is_some() {
            "BIGQUERY_CREDENTIALS"
        } else if self.bigquery_access_token.is_some() {
            "BIGQUERY_ACCESS_TOKEN"
        } else if self.bigquery_key_file.is_some() {
            "BIGQUERY_KEY_FILE"
        } else if self.google_application_credentials.is_some() {
            "GOOGLE_APPLICATION_CREDENTIALS"
        } else {
            "none"
        }
    }

    /// True when any credential variable is set.
    pub fn has_credentials(&self) -> bool {
        self.credentials_env_var() != "none"
    }

    /// Resolves credentials: inline JSON, then access token, then key file,
    /// then the metadata server.
    pub fn credential_source(&self) -> CredentialSource {
        let inline = self
            .google_application_credentials_json
            .as_ref()
            .or(self.bigquery_credentials.as_ref());
        let key_file = self
            .bigquery_key_file
            .as_ref()
            .or(self.google_application_credentials.as_ref());

        if let Some(json) = inline {
            CredentialSource::InlineJson(json.clone())
        } else if let Some(token) = &self.bigquery_access_token {
            CredentialSource::AccessToken(token.clone())
        } else if let Some(path) = key_file {
            CredentialSource::KeyFile(path.clone())
        } else {
            CredentialSource::MetadataServer
        }
    }

    /// Chooses and configures the order source.
    pub fn order_source(&self) -> Result<OrderSourceSettings, OrderSourceError> {
        if let Some(path) = &self.orders_file {
            return Ok(OrderSourceSettings::File(path.clone()));
        }

        let config = BigQueryConfig::builder()
            .project_id(self.project_id())
            .dataset_id(&self.bigquery_dataset_id)
            .table_id(&self.bigquery_table_id)
            .row_limit(self.order_row_limit)
            .timeout(self.upstream_timeout())
            .api_base_url(
                self.bigquery_api_url
                    .as_deref()
                    .unwrap_or(DEFAULT_API_BASE_URL),
            )
            .credentials(self.credential_source())
            .build()?;

        Ok(OrderSourceSettings::BigQuery(config))
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // credential material stays out of logs
        f.debug_struct("Settings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("project_id", &self.project_id())
            .field("dataset_id", &self.bigquery_dataset_id)
            .field("table_id", &self.bigquery_table_id)
            .field("credentials", &self.credentials_env_var())
            .field("orders_file", &self.orders_file)
            .field("cache_duration_secs", &self.cache_duration_secs)
            .field("order_row_limit", &self.order_row_limit)
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .field("search_default_limit", &self.search_default_limit)
            .finish()
    }
}
