use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
    #[serde(default)]
    pub paypal: Option<PaypalConfig>,
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    #[serde(default)]
    pub branding: BrandingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaypalConfig {
    #[serde(default = "default_paypal_base_url")]
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub return_url: String,
    pub cancel_url: String,
    #[serde(default = "default_brand_name")]
    pub brand_name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeocodingConfig {
    #[serde(default = "default_geocoding_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            endpoint: default_geocoding_endpoint(),
            api_key: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BrandingConfig {
    #[serde(default)]
    pub logo_path: Option<String>,
}

fn default_paypal_base_url() -> String {
    "https://api-m.sandbox.paypal.com".to_string()
}

fn default_brand_name() -> String {
    "Tessera".to_string()
}

fn default_geocoding_endpoint() -> String {
    "https://maps.googleapis.com/maps/api/geocode/json".to_string()
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Base configuration, checked in
            .add_source(config::File::with_name("config/default"))
            // Environment-specific overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Machine-local secrets, never checked in
            .add_source(config::File::with_name("config/local").required(false))
            // `TESSERA_SERVER__PORT=9090` style environment overrides
            .add_source(config::Environment::with_prefix("TESSERA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
