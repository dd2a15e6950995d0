//! Config command feature.
//!
//! This module owns and handles the "flutter-sweep config" command behavior.

use crate::config::{Config, StoragePaths};
use crate::theme::Theme;

fn print_list(label: &str, items: &[String]) {
    if items.is_empty() {
        println!("  {}: {}", label, Theme::muted("(none)"));
    } else {
        println!("  {}: {}", label, items.join(", "));
    }
}

fn display_paths(paths: &[std::path::PathBuf]) -> Vec<String> {
    paths.iter().map(|p| p.display().to_string()).collect()
}

pub(crate) fn handle_config(
    storage: &StoragePaths,
    reset: bool,
    path: bool,
) -> anyhow::Result<()> {
    if reset {
        Config::default().save(&storage.config_file)?;
        println!("Configuration reset to defaults.");
        return Ok(());
    }

    if path {
        println!("Config:      {}", storage.config_file.display());
        println!("Preferences: {}", storage.preferences_file.display());
        return Ok(());
    }

    // --show and no flag both print the effective settings
    let config = Config::load(&storage.config_file);
    let probe = config.access_probe();

    println!("{}", Theme::header("Configuration"));
    println!("{}", Theme::divider(60));
    println!("{}", Theme::header("[cleanup]"));
    print_list("extra_targets", &config.cleanup.extra_targets);
    println!("  use_trash: {}", config.cleanup.use_trash);
    println!("  confirm: {}", config.cleanup.confirm);
    println!();
    println!("{}", Theme::header("[access]"));
    print_list("probe_dirs", &display_paths(&probe.dirs));
    print_list("probe_files", &display_paths(&probe.files));
    println!();
    println!(
        "Edit {} to change these settings.",
        Theme::command(&storage.config_file.display().to_string())
    );
    Ok(())
}
