mod settings;

pub use settings::{
    ApiConfig, GoogleConfig, HttpConfig, IndexNowConfig, LoggingConfig, ServerConfig, Settings,
    SiteConfig, DEFAULT_GOOGLE_PUBLISH_URL, DEFAULT_GOOGLE_SCOPE, DEFAULT_GOOGLE_TOKEN_URL,
    DEFAULT_INDEXNOW_ENDPOINT,
};
