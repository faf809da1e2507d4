mod app_config;

pub use app_config::{AppConfig, BraintreeConfig, CorsConfig, DatabaseConfig, ServerConfig};
