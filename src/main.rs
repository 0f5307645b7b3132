//! padspan - measure the used area of a drawing tablet.

use clap::Parser;
use padspan::app::{self, Cli, Interrupts, Session};
use padspan::menu::TerminalSelector;
use padspan::prompt::Prompter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over the -v default.
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let result = run(cli);
    if let Err(e) = &result {
        eprintln!("Error: {e}");
    }
    app::exit_code(&result)
}

fn run(cli: Cli) -> padspan::Result<()> {
    let config = cli.effective_config()?;
    if cli.dump_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let (catalog, inventory) = app::build_catalog(&config)?;
    let interrupts = Interrupts::new();
    interrupts.install()?;

    Session::new(cli, config, catalog, TerminalSelector, Prompter::stdio())
        .with_inventory(inventory)
        .with_interrupts(interrupts)
        .run()
}
