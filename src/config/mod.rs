mod loader;
mod types;

pub use loader::{default_config_path, ConfigError};
pub use types::{Config, Endpoints, RetryDefaults};
