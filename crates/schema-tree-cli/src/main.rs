mod cli;
mod commands;
mod config;
#[allow(unused_assignments)]
mod diagnostic;
mod error;
mod logging;
mod output;

use clap::Parser;

fn main() {
    let cli = cli::Cli::parse();
    logging::init(&cli.global);
    let reporter = output::Reporter::from_global(&cli.global);

    let result = match cli.command {
        cli::Commands::Tree(args) => commands::tree::run(args, &cli.global, &reporter),
        cli::Commands::Check(args) => commands::check::run(args, &cli.global, &reporter),
        cli::Commands::Inspect(args) => commands::inspect::run(args, &cli.global, &reporter),
        cli::Commands::Completions(args) => commands::completions::run(args),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            reporter.print_error(&e);
            std::process::exit(e.exit_code() as i32);
        }
    }
}
