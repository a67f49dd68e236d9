//! Config command handler

use crate::args::ConfigSubcommand;
use academic_progress::config::Config;
use academic_progress::Catalog;
use std::io::{self, Write};
use std::path::Path;

/// Keys accepted by `config get/set/unset`
const KEYS: [&str; 6] = [
    "level",
    "file",
    "verbose",
    "data_dir",
    "catalog_file",
    "reports_dir",
];

/// Dispatch config subcommands
pub fn run(subcommand: Option<ConfigSubcommand>, config: &mut Config, defaults: &Config) {
    match subcommand {
        None => handle_config_get(config, None),
        Some(ConfigSubcommand::Get { key }) => handle_config_get(config, key),
        Some(ConfigSubcommand::Set { key, value }) => handle_config_set(config, &key, &value),
        Some(ConfigSubcommand::Unset { key }) => handle_config_unset(config, defaults, &key),
        Some(ConfigSubcommand::Reset) => handle_config_reset(),
    }
}

fn unknown_key(key: &str) -> ! {
    eprintln!("✗ Unknown config key: '{key}'");
    eprintln!("  Valid keys: {}", KEYS.join(", "));
    std::process::exit(1);
}

/// Handle the config get subcommand
pub fn handle_config_get(config: &Config, key: Option<String>) {
    match key {
        Some(k) => match config.get(&k) {
            Some(value) => println!("{value}"),
            None => unknown_key(&k),
        },
        None => {
            println!("\n=== Configuration ===\n");
            print!("{config}");
            println!("\nConfig file: {}", Config::get_config_file_path().display());
        }
    }
}

/// Report whether a newly configured store path is usable
fn check_store_path(key: &str, value: &str) {
    match key {
        "catalog_file" | "catalog-file" => match Catalog::load(value) {
            Ok(catalog) => println!("  Catalog loaded: {} courses", catalog.len()),
            Err(e) => eprintln!("⚠ Catalog at {value} is not usable yet: {e}"),
        },
        "data_dir" | "data-dir" if !Path::new(value).is_dir() => {
            println!("  {value} does not exist yet; it is created on first enrolment");
        }
        _ => {}
    }
}

/// Handle the config set subcommand
pub fn handle_config_set(config: &mut Config, key: &str, value: &str) {
    if config.get(key).is_none() {
        unknown_key(key);
    }
    if let Err(e) = config.set(key, value) {
        eprintln!("✗ {e}");
        std::process::exit(1);
    }

    if let Err(e) = config.save() {
        eprintln!("✗ Failed to save config: {e}");
        std::process::exit(1);
    }

    println!("✓ Set {key} = {value}");
    check_store_path(key, value);
}

/// Handle the config unset subcommand
pub fn handle_config_unset(config: &mut Config, defaults: &Config, key: &str) {
    if config.unset(key, defaults).is_err() {
        unknown_key(key);
    }

    if let Err(e) = config.save() {
        eprintln!("✗ Failed to save config: {e}");
        std::process::exit(1);
    }

    println!(
        "✓ Reset {key} to default ({})",
        config.get(key).unwrap_or_default()
    );
}

/// Handle the config reset subcommand
pub fn handle_config_reset() {
    if !Config::get_config_file_path().exists() {
        println!("✓ Config is already at defaults");
        return;
    }

    print!("Reset config to defaults? Student data and catalog files are kept. (y/n): ");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin().read_line(&mut response).ok();

    let answer = response.trim();
    if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes") {
        if let Err(e) = Config::reset() {
            eprintln!("✗ Failed to remove config file: {e}");
            std::process::exit(1);
        }
        println!("✓ Config reset to defaults");
    } else {
        println!("✗ Reset cancelled");
    }
}
