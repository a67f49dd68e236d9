//! Command-line interface entry point for `academic-progress`

mod args;
mod commands;

use academic_progress::config::Config;
use academic_progress::core::store::JsonStore;
use academic_progress::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};
use academic_progress::{info, ProgressService};
use args::{Cli, Command};
use clap::Parser;

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config logging.level; fallback warn
    let effective_level = args
        .log_level
        .map(std::convert::Into::into)
        .or_else(|| config.logging.level.parse::<Level>().ok())
        .unwrap_or(Level::Warn);

    let mut level = effective_level;
    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // CLI flag wins (already folded into config by apply_overrides)
    if !config.logging.file.is_empty() {
        let log_path = std::path::PathBuf::from(&config.logging.file);
        let display_path = log_path.to_string_lossy();
        if init_file_logging(&log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    let service = ProgressService::new(JsonStore::new(
        &config.store.data_dir,
        &config.store.catalog_file,
    ));

    match args.command {
        Command::Config { subcommand } => {
            commands::config::run(subcommand, &mut config, &defaults);
        }
        Command::Catalog { subcommand } => commands::catalog::run(subcommand, &service),
        Command::Student { subcommand } => commands::student::run(subcommand, &service),
        Command::Record { subcommand } => commands::record::run(subcommand, &service),
        Command::Progress { student, json } => commands::progress::run(&student, json, &service),
        Command::Report { student, output } => {
            commands::report::run(&student, output.as_deref(), &config, &service);
        }
    }
}
