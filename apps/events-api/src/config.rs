use core_config::{AppInfo, FromEnv, app_info, env_or_default, server::ServerConfig};
use std::path::PathBuf;

// Import MongoDB config from the database library
use database::mongodb::MongoConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Upload directory when `UPLOAD_DIR` is unset, relative to the working directory
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Directory uploaded images are written to and served from
    pub upload_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let server = ServerConfig::from_env()?;
        let upload_dir = PathBuf::from(env_or_default("UPLOAD_DIR", DEFAULT_UPLOAD_DIR));

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            environment,
            upload_dir,
        })
    }
}
