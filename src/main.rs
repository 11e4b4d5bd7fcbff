use std::time::Duration;

use clap::Parser;
use colored::Colorize;

use keytime::cli::args::{Cli, Commands, TuiArgs};
use keytime::cli::commands;
use keytime::config::{Config, Paths};
use keytime::error::KeytimeError;
use keytime::logging::enable_logging;
use keytime::tui::{self, TuiOptions};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<(), KeytimeError> {
    let cli = Cli::parse();
    let paths = Paths::resolve(cli.home)?;
    let config = Config::load_from_path(&paths.config_file)?;
    config.apply_color();
    enable_logging(&paths, &config.logging)?;

    let format = cli.output.unwrap_or(config.general.default_output);
    tracing::debug!(command = ?cli.command.as_ref().map(command_name), "starting");

    // Completions never touch the database.
    if let Some(Commands::Completions { shell }) = cli.command {
        print!("{}", commands::completions(shell)?);
        return Ok(());
    }

    let mut tracker = commands::open_tracker(&paths)?;

    let output = match cli.command.unwrap_or_else(|| Commands::Tui(TuiArgs::default())) {
        Commands::Tui(args) => {
            let options = TuiOptions {
                window_days: config.tracker.chart_days,
                idle_poll: Duration::from_secs(config.tracker.idle_poll_seconds.max(1)),
                link: args.link,
            };
            return tui::run(tracker, options);
        },
        Commands::Shortcut(args) => commands::shortcut(&mut tracker, args.command, format)?,
        Commands::Log(args) => commands::log(&tracker, &args, format)?,
        Commands::Stats(args) => commands::stats(&tracker, &args, config.tracker.chart_days, format)?,
        Commands::Delete { index, yes } => commands::delete(&mut tracker, index, yes, format)?,
        Commands::Clear { yes } => commands::clear(&mut tracker, yes, format)?,
        Commands::Export { out } => commands::export(&tracker, &paths, out, format)?,
        Commands::Import { path, yes } => commands::import(&mut tracker, &path, yes, format)?,
        Commands::Share(args) => commands::share(&mut tracker, args.command, &config.tracker.share_base_url, format)?,
        Commands::Settings(args) => commands::settings(&mut tracker, &args, format)?,
        Commands::Completions { shell } => commands::completions(shell)?,
    };

    println!("{output}");
    Ok(())
}

const fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Tui(_) => "tui",
        Commands::Shortcut(_) => "shortcut",
        Commands::Log(_) => "log",
        Commands::Stats(_) => "stats",
        Commands::Delete { .. } => "delete",
        Commands::Clear { .. } => "clear",
        Commands::Export { .. } => "export",
        Commands::Import { .. } => "import",
        Commands::Share(_) => "share",
        Commands::Settings(_) => "settings",
        Commands::Completions { .. } => "completions",
    }
}
