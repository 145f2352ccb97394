use std::path::Path;

use serde::Deserialize;

use crate::Error;

pub const DEFAULT_PATH: &str = "/etc/postmark/postmark.toml";
pub const DEFAULT_ENDPOINT: &str = "http://api.postmarkapp.com/email";
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";
const ENV_PREFIX: &str = "POSTMARK";

// Request timeout, in seconds
pub const DEFAULT_TIMEOUT: u64 = 30;

/// Postmark credentials and transport options.
///
/// Loaded once and handed to the transport at construction.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Server token sent in `X-Postmark-Server-Token`
    pub api_key: String,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Use https and enforce certificate/hostname verification
    #[serde(default)]
    pub secure: bool,

    /// Request timeout, in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_content_type")]
    pub content_type: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT
}

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

// The server token must never end up in logs
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("secure", &self.secure)
            .field("timeout", &self.timeout)
            .field("content_type", &self.content_type)
            .finish()
    }
}

impl Config {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            endpoint: default_endpoint(),
            secure: false,
            timeout: DEFAULT_TIMEOUT,
            content_type: default_content_type(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Config("api_key is not set".to_string()));
        }

        if self.timeout == 0 {
            return Err(Error::Config("timeout must be at least 1 second".to_string()));
        }

        url::Url::parse(&self.endpoint)?;

        Ok(())
    }
}

/// Loads Postmark config from filesystem and merges it with any
/// environment variables prefixed with POSTMARK_.
///
/// The file is optional when no path is given; an explicit path must exist.
pub fn load_config(path: Option<&Path>) -> Result<Config, Error> {
    let file = match path {
        Some(p) => config::File::from(p).required(true),
        None => config::File::from(Path::new(DEFAULT_PATH)).required(false),
    };

    let settings = config::Config::builder()
        .add_source(file.format(config::FileFormat::Toml))
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()?;

    let config: Config = settings.try_deserialize()?;
    config.validate()?;

    Ok(config)
}
