//! Configuration management module
//!
//! Optional CLI configuration: defaults for app name, icon, expiry, and
//! the debug toggle. The library itself never requires a config file.

pub mod loader;
pub mod schema;

pub use loader::{
    default_config, get_config_path, load_config, load_config_from_path, save_config_to_path,
};
pub use schema::AppConfig;
