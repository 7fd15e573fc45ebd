//! `emalf-server` entry point.

use clap::Parser;
use emalf_core::db::open_db;
use emalf_core::{init_logging, SqliteIdeaStore};
use emalf_server::{ApiServer, CorsPolicy, ServerConfig};
use log::{error, info};
use std::error::Error;
use std::process::ExitCode;
use std::sync::atomic::AtomicBool;

fn main() -> ExitCode {
    // A missing `.env` is normal; real environment variables still apply.
    let _ = dotenvy::dotenv();
    let config = ServerConfig::parse();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=main status=error error={err}");
            eprintln!("emalf-server: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &ServerConfig) -> Result<(), Box<dyn Error>> {
    init_logging(config.effective_log_level(), config.log_dir.as_deref())?;

    let conn = open_db(&config.db_path)?;
    let mut store = SqliteIdeaStore::new(&conn);
    if !config.skip_seed {
        // Seeding failure leaves an empty pool; the API still serves submissions.
        if let Err(err) = store.seed_defaults() {
            error!("event=seed_defaults module=main status=error error={err}");
        }
    }

    let server = ApiServer::bind(&config.bind, CorsPolicy::parse(&config.cors_origins))?;
    info!(
        "event=server_config module=main status=ok db_path={} cors_origins={}",
        config.db_path.display(),
        config.cors_origins
    );

    let shutdown = AtomicBool::new(false);
    server.serve(&mut store, &shutdown)?;
    Ok(())
}
