//! Server configuration from flags, environment and `.env`.

use clap::Parser;
use emalf_core::default_log_level;
use std::path::PathBuf;

/// Runtime settings for `emalf-server`.
#[derive(Debug, Clone, Parser)]
#[command(name = "emalf-server", version, about = "Serve the shared drawing-idea pool over HTTP")]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[arg(long, env = "EMALF_BIND", default_value = "127.0.0.1:8001")]
    pub bind: String,

    /// SQLite database file; created on first start.
    #[arg(long, env = "EMALF_DB_PATH", default_value = "emalfdraw.sqlite3")]
    pub db_path: PathBuf,

    /// Comma-separated allowed origins, `*` for any.
    #[arg(long, env = "CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// One of trace|debug|info|warn|error. Defaults per build mode.
    #[arg(long, env = "EMALF_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; stderr when unset.
    #[arg(long, env = "EMALF_LOG_DIR")]
    pub log_dir: Option<String>,

    /// Skip inserting the built-in ideas into an empty database.
    #[arg(long, env = "EMALF_SKIP_SEED")]
    pub skip_seed: bool,
}

impl ServerConfig {
    pub fn effective_log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }
}
