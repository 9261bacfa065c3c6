mod loader;
mod paths;
mod types;

pub use paths::CONFIG_PATH_ENV;
pub use types::{Config, SyncConfig, TargetRef};
