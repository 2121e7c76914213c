use std::path::Path;

use clap::Parser;
use daylist::cli::commands::Cli;
use daylist::cli::handlers;
use daylist::io::paths;

fn main() {
    let cli = Cli::parse();

    if cli.command.is_none() {
        // No subcommand → launch TUI
        let dir = paths::data_dir(cli.data_dir.as_deref().map(Path::new));
        if let Err(e) = daylist::tui::run(&dir, cli.date.as_deref()) {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
