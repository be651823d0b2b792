mod app_config;
mod credentials;

pub use app_config::{AppConfig, DisplayConfig, DEFAULT_LANGUAGE, DEFAULT_RECOGNIZER_COMMAND};
pub use credentials::Credentials;
