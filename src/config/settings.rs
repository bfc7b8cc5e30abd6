use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

pub const DEFAULT_INDEXNOW_ENDPOINT: &str = "https://api.indexnow.org/indexnow";
pub const DEFAULT_GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_GOOGLE_PUBLISH_URL: &str =
    "https://indexing.googleapis.com/v3/urlNotifications:publish";
pub const DEFAULT_GOOGLE_SCOPE: &str = "https://www.googleapis.com/auth/indexing";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    pub site: SiteConfig,
    #[serde(default)]
    pub indexnow: IndexNowConfig,
    #[serde(default)]
    pub google: GoogleConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Public origin of the site, e.g. `https://example.com`
    pub base_url: String,
    /// Path prefix under which articles are published
    #[serde(default = "default_blog_path")]
    pub blog_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexNowConfig {
    /// Shared secret; the provider is disabled when unset
    pub key: Option<String>,
    #[serde(default = "default_indexnow_endpoint")]
    pub endpoint: String,
    /// Where the upstream can verify the key. Defaults to `{base_url}/{key}.txt`.
    pub key_location: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    /// Service account JSON blob (`client_email`, `private_key`); disabled when unset
    pub credentials: Option<String>,
    #[serde(default = "default_google_token_url")]
    pub token_url: String,
    #[serde(default = "default_google_publish_url")]
    pub publish_url: String,
    #[serde(default = "default_google_scope")]
    pub scope: String,
    /// Pause between consecutive publish requests in a batch
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Timeout for a single outbound request, body included
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    pub key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_blog_path() -> String {
    "/blog".to_string()
}

fn default_indexnow_endpoint() -> String {
    DEFAULT_INDEXNOW_ENDPOINT.to_string()
}

fn default_google_token_url() -> String {
    DEFAULT_GOOGLE_TOKEN_URL.to_string()
}

fn default_google_publish_url() -> String {
    DEFAULT_GOOGLE_PUBLISH_URL.to_string()
}

fn default_google_scope() -> String {
    DEFAULT_GOOGLE_SCOPE.to_string()
}

fn default_request_delay_ms() -> u64 {
    200
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("site.blog_path", "/blog")?
            .set_default("google.request_delay_ms", 200)?
            .set_default("http.timeout_seconds", 10)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables
            // SITE__BASE_URL, INDEXNOW__KEY, GOOGLE__CREDENTIALS, etc.
            // No list separator: the credentials blob is JSON and contains commas.
            .add_source(Environment::default().separator("__").try_parsing(true))
            // Flat names used by the site's deployment
            .set_override_option("site.base_url", env::var("SITE_URL").ok())?
            .set_override_option("indexnow.key", env::var("INDEXNOW_KEY").ok())?
            .set_override_option(
                "google.credentials",
                env::var("GOOGLE_SERVICE_ACCOUNT_JSON").ok(),
            )?
            .set_override_option("api.key", env::var("API_KEY").ok())?;

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Settings with every provider disabled, pointing at the given site.
    pub fn for_site(base_url: &str) -> Self {
        Self {
            server: ServerConfig::default(),
            site: SiteConfig {
                base_url: base_url.to_string(),
                blog_path: default_blog_path(),
            },
            indexnow: IndexNowConfig::default(),
            google: GoogleConfig::default(),
            http: HttpConfig::default(),
            api: ApiConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl IndexNowConfig {
    /// The configured key, treating an empty string as unset.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

impl GoogleConfig {
    pub fn credentials(&self) -> Option<&str> {
        self.credentials
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for IndexNowConfig {
    fn default() -> Self {
        Self {
            key: None,
            endpoint: default_indexnow_endpoint(),
            key_location: None,
        }
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            token_url: default_google_token_url(),
            publish_url: default_google_publish_url(),
            scope: default_google_scope(),
            request_delay_ms: default_request_delay_ms(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}
