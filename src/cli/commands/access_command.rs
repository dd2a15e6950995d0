//! Access command feature.
//!
//! This module owns and handles the "flutter-sweep access" command behavior.

use crate::access;
use crate::cli::open_session;
use crate::config::{Config, StoragePaths};
use crate::output::OutputMode;
use crate::progress;
use crate::session::Session;
use crate::theme::Theme;

/// Run the permission probe for `session` and wait for the answer.
pub(crate) fn ensure_access(session: &mut Session, show_progress: bool) -> bool {
    let spinner = if show_progress {
        progress::create_spinner("Checking permissions...")
    } else {
        progress::create_hidden()
    };

    session.start_access_check();
    let granted = session.wait_for_access();
    progress::finish_and_clear(&spinner);
    granted
}

/// Explain how to grant Full Disk Access.
pub(crate) fn print_access_required() {
    eprintln!("{}", Theme::error("Full Disk Access required"));
    eprintln!();
    eprintln!("Deleting build artifacts needs access to your project folders.");
    eprintln!("{}", access::settings_hint());
    eprintln!();
    eprintln!("Open the settings pane: {}", Theme::command(access::settings_url()));
}

pub(crate) fn handle_access(storage: &StoragePaths, output_mode: OutputMode) -> anyhow::Result<()> {
    let config = Config::load(&storage.config_file);
    let mut session = open_session(storage, &config, false);

    if !ensure_access(&mut session, output_mode != OutputMode::Quiet) {
        print_access_required();
        anyhow::bail!("Full Disk Access has not been granted.");
    }

    if output_mode != OutputMode::Quiet {
        println!("{}", Theme::success("Full Disk Access granted."));
    }
    Ok(())
}
