use anyhow::Result;
use clap::Parser;

mod cli;
mod cmd_create;
mod cmd_delete;
mod cmd_list;
mod cmd_prune;

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    match cli.cmd {
        cli::Cmd::Create { index, location, name, incremental, keep, json } =>
            cmd_create::exec(index, location, name, incremental, keep, json),

        cli::Cmd::Delete { location, name, json } =>
            cmd_delete::exec(location, name, json),

        cli::Cmd::List { location, json } =>
            cmd_list::exec(location, json),

        cli::Cmd::Prune { location, keep } =>
            cmd_prune::exec(location, keep),
    }
}
