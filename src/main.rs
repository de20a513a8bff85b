use anyhow::Result;
use clap::Parser;

use sdss::cli::{Cli, Command};
use sdss::commands;
use sdss::logging::Logger;

fn main() -> Result<()> {
    let args = Cli::parse();
    let log = Logger::new(args.verbose);

    match args.command {
        Command::Clone { url } => commands::clone::run(&args.global, &url, &log),
        Command::Activate { repo, package } => {
            commands::activate::run(&args.global, &repo, package.as_deref(), &log)
        }
        Command::Deactivate { repo, package } => {
            commands::deactivate::run(&args.global, &repo, package.as_deref(), &log)
        }
        Command::Packages { repo } => commands::list::packages(&args.global, &repo),
        Command::Repos => commands::list::repos(&args.global),
        Command::Refresh => commands::refresh::run(&args.global, &log),
        Command::ChangeVersion { version } => {
            commands::version::change(&args.global, &version, &log)
        }
        Command::Edit => commands::edit::run(&args.global, &log),
        Command::Version => commands::version::run(&args.global),
    }
}
