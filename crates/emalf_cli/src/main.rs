//! Terminal front-end for the EmalfDraw idea pool.
//!
//! The store backend is chosen once at startup: `--remote <url>` talks to
//! `emalf-server`, otherwise ideas live in a local storage file.

mod session;

use clap::{Args, Parser, Subcommand};
use emalf_core::{
    init_logging, HttpIdeaStore, IdeaStore, LocalIdeaStore, LocalStorage, StoreResult, Widget,
};
use log::info;
use session::Session;
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "emalf", version, about = "Random drawing challenges from a shared idea pool")]
struct Cli {
    #[command(flatten)]
    backend: BackendArgs,

    /// One of trace|debug|info|warn|error.
    #[arg(long, env = "EMALF_LOG_LEVEL", default_value = "error", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Args)]
#[group(multiple = false)]
struct BackendArgs {
    /// Base URL of a running `emalf-server`.
    #[arg(long, env = "EMALF_BACKEND_URL")]
    remote: Option<String>,

    /// Local storage file used when no server is configured.
    #[arg(long, env = "EMALF_LOCAL_STORAGE")]
    local: Option<PathBuf>,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Print the current challenge.
    Show,
    /// Pick a new random challenge.
    Next,
    /// Submit a new idea to the pool.
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Print every idea in the pool.
    List,
    /// Read commands from stdin until `q`.
    Interactive,
}

const DEFAULT_LOCAL_STORAGE: &str = "emalfdraw_local_storage.json";

fn main() -> ExitCode {
    // A missing `.env` is normal; real environment variables still apply.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("emalf: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    init_logging(&cli.log_level, None)?;

    let store = open_store(&cli.backend)?;
    let mut session = Session::start(Widget::new(store));
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command.unwrap_or(Command::Show) {
        Command::Show => session.show(&mut out)?,
        Command::Next => session.next(&mut out)?,
        Command::Add { text } => session.add(&text.join(" "), &mut out)?,
        Command::List => session.list(&mut out)?,
        Command::Interactive => session.run_interactive(io::stdin().lock(), &mut out)?,
    }

    session.finish();
    out.flush()?;
    Ok(())
}

fn open_store(backend: &BackendArgs) -> StoreResult<Box<dyn IdeaStore>> {
    if let Some(url) = &backend.remote {
        let store = HttpIdeaStore::new(url.as_str())?;
        info!(
            "event=open_store module=cli status=ok backend=remote url={}",
            store.base_url()
        );
        return Ok(Box::new(store));
    }

    let path = backend
        .local
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOCAL_STORAGE));
    info!(
        "event=open_store module=cli status=ok backend=local path={}",
        path.display()
    );
    Ok(Box::new(LocalIdeaStore::new(LocalStorage::open(path))))
}
