//! Targets command feature.
//!
//! This module owns and handles the "flutter-sweep targets" command behavior.

use crate::cleanup::DEFAULT_TARGETS;
use crate::config::{Config, StoragePaths};
use crate::theme::Theme;

pub(crate) fn handle_targets(storage: &StoragePaths) -> anyhow::Result<()> {
    let config = Config::load(&storage.config_file);

    println!("{}", Theme::header("Removed from each active project"));
    println!("{}", Theme::divider(60));
    for target in config.targets() {
        if DEFAULT_TARGETS.contains(&target.as_str()) {
            println!("  {}", target);
        } else {
            println!("  {}  {}", target, Theme::muted("(config)"));
        }
    }
    Ok(())
}
