use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::error;

mod cli;
mod util;
mod cmd_watch;
mod cmd_sync;
mod cmd_resolve;
mod cmd_status;

fn main() {
    init_logger();

    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    match cli.cmd {
        cli::Cmd::Watch { reference, store } => cmd_watch::exec(reference, store),

        cli::Cmd::Sync {
            reference,
            store,
            json,
        } => cmd_sync::exec(reference, store, json),

        cli::Cmd::Resolve { reference } => cmd_resolve::exec(reference),

        cli::Cmd::Status { name, store, json } => cmd_status::exec(name, store, json),
    }
}

fn init_logger() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}
