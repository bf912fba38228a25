use std::env;
use std::path::PathBuf;

use crate::store::PersistPolicy;

const TASKS_FILE: &str = ".dev-tasks.json";
const PROJECTS_FILE: &str = ".dev-projects.json";

#[derive(Debug, Clone)]
pub struct Config {
    // Storage
    /// When set, tasks and projects live in this SQL database instead of local files
    pub database_url: Option<String>,
    pub data_dir: PathBuf,
    pub persist_policy: PersistPolicy,

    // Server
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if exists

        Ok(Self {
            // Storage
            database_url: env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            persist_policy: match env::var("STRICT_PERSIST")
                .unwrap_or_else(|_| "false".to_string())
                .parse::<bool>()
                .map_err(|_| ConfigError::Invalid("STRICT_PERSIST"))?
            {
                true => PersistPolicy::Strict,
                false => PersistPolicy::BestEffort,
            },

            // Server
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT"))?,
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .as_str()
            {
                "pretty" => LogFormat::Pretty,
                "json" => LogFormat::Json,
                _ => return Err(ConfigError::Invalid("LOG_FORMAT")),
            },
        })
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.data_dir.join(TASKS_FILE)
    }

    pub fn projects_file(&self) -> PathBuf {
        self.data_dir.join(PROJECTS_FILE)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment variable: {0}")]
    Invalid(&'static str),
}
