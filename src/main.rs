use crate::config::Config;
use crate::database::Database;
use crate::shell::Shell;
use clap::Parser;
use eyre::WrapErr;
use std::io;
use std::path::PathBuf;
use tokio::io::BufReader;
use tokio::runtime::Runtime;
use tokio::signal;
use tracing::{Level, info};

mod command;
mod config;
mod database;
mod model;
mod shell;

#[derive(Parser)]
#[command(version, about)]
struct Options {
    /// Use FILE instead of tracker.toml
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Connection string of the database, overriding the configuration file
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
    /// Set verbosity level
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let options = Options::parse();
    let level = match options.verbose {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
    let mut config = Config::load(options.config.as_deref())?;
    if let Some(url) = options.database_url {
        config.database.url = url;
    }
    let runtime = Runtime::new().wrap_err("cannot start async runtime")?;
    let result = runtime.block_on(session(&config));
    // A pending read of stdin sits on a blocking thread which cannot be
    // cancelled, so do not wait for it.
    runtime.shutdown_background();
    result
}

async fn session(config: &Config) -> eyre::Result<()> {
    let mut db = Database::connect(&config.database.url)
        .await
        .wrap_err("cannot connect to database")?;
    let outcome = Shell::new(
        BufReader::new(tokio::io::stdin()),
        io::stdout(),
        &config.shell.prompt,
    )
    .run(&mut db, signal::ctrl_c())
    .await;
    let closed = db.close().await;
    let exit = outcome.wrap_err("cannot interact with the terminal")?;
    info!(?exit, "session terminated");
    closed.wrap_err("cannot close database connection")?;
    Ok(())
}
