use crate::error::{BadEnvVarSnafu, ParseBoolSnafu, ParseUrlSnafu, RollbookResult};
use dotenvy::var;
use snafu::ResultExt;
use std::sync::Arc;
use url::Url;

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    api_config: Arc<ApiConfig>,
    server_config: Arc<ServerConfig>,
}

impl RuntimeConfiguration {
    pub fn new() -> RollbookResult<Self> {
        Ok(Self {
            api_config: Arc::new(ApiConfig::new()?),
            server_config: Arc::new(ServerConfig::new()?),
        })
    }

    pub fn api_config(&self) -> Arc<ApiConfig> {
        self.api_config.clone()
    }

    pub fn server_config(&self) -> Arc<ServerConfig> {
        self.server_config.clone()
    }
}

/// Where the remote student API lives and which paths it answers on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: Url,
    pub find_all: String,
    pub insert_one: String,
    pub update_by_id: String,
    pub delete_by_id: String,
}

impl ApiConfig {
    pub fn new() -> RollbookResult<Self> {
        Self::from_lookup(|name| var(name))
    }

    pub fn from_lookup(
        lookup: impl Fn(&'static str) -> Result<String, dotenvy::Error>,
    ) -> RollbookResult<Self> {
        let or_default =
            |name, default: &str| lookup(name).unwrap_or_else(|_| default.to_string());

        let base = lookup("ROLLBOOK_API_BASE").context(BadEnvVarSnafu {
            name: "ROLLBOOK_API_BASE",
        })?;
        let base_url = Url::parse(&base).context(ParseUrlSnafu { original: base })?;

        Ok(Self {
            base_url,
            find_all: or_default("ROLLBOOK_API_FIND_ALL", "/api/v1/user/findAll"),
            insert_one: or_default("ROLLBOOK_API_INSERT_ONE", "/api/v1/user/insertOne"),
            update_by_id: or_default("ROLLBOOK_API_UPDATE_BY_ID", "/api/v1/user/updateById"),
            delete_by_id: or_default("ROLLBOOK_API_DELETE_BY_ID", "/api/v1/user/deleteById"),
        })
    }

    /// Resolves an endpoint path against the base URL, keeping any path prefix the base carries.
    pub fn endpoint(&self, path: &str) -> RollbookResult<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).context(ParseUrlSnafu { original: joined })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub server_ip: String,
    pub secure_cookies: bool,
}

impl ServerConfig {
    pub fn new() -> RollbookResult<Self> {
        Self::from_lookup(|name| var(name))
    }

    pub fn from_lookup(
        lookup: impl Fn(&'static str) -> Result<String, dotenvy::Error>,
    ) -> RollbookResult<Self> {
        let server_ip =
            lookup("ROLLBOOK_SERVER_IP").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let secure_cookies = match lookup("ROLLBOOK_SECURE_COOKIES") {
            Ok(original) => original.trim().parse().context(ParseBoolSnafu {
                name: "ROLLBOOK_SECURE_COOKIES",
                original,
            })?,
            Err(_) => false,
        };

        Ok(Self {
            server_ip,
            secure_cookies,
        })
    }
}
