//! Clean command feature.
//!
//! This module owns and handles the "flutter-sweep clean" command behavior.

use super::access_command::{ensure_access, print_access_required};
use crate::cleanup::CleanupResult;
use crate::cli::{confirm, confirm_on_stderr, open_session, resolve_folder_ref};
use crate::cleanup_events::CleanupEvent;
use crate::config::{Config, StoragePaths};
use crate::messages::CleanupMessage;
use crate::output::{self, OutputMode};
use crate::progress;
use crate::session::{Session, SessionError, SessionEvent};
use crate::theme::Theme;

pub(crate) struct CleanOptions {
    pub skip: Vec<String>,
    pub trash: bool,
    pub dry_run: bool,
    pub json: bool,
    pub yes: bool,
}

/// Start a cleanup and block until it finishes, showing live progress.
///
/// Returns `None` when there was nothing active to clean; the session then
/// carries the error message.
pub(crate) fn run_session_cleanup(
    session: &mut Session,
    output_mode: OutputMode,
    show_progress: bool,
) -> Option<CleanupResult> {
    match session.start_cleanup() {
        Ok(()) => {}
        Err(SessionError::NoActiveFolders) => return None,
        Err(SessionError::AlreadyRunning) => {
            // Each CLI invocation owns its session, so this only happens on reuse
            session.wait_for_cleanup(|_, _| {});
            session.start_cleanup().ok()?;
        }
    }

    let spinner = if show_progress {
        progress::create_spinner("Running cleanup...")
    } else {
        progress::create_hidden()
    };
    let verb = session.remover().verb();

    session.wait_for_cleanup(|event, state| {
        let SessionEvent::Cleanup(cleanup_event) = event else {
            return;
        };
        if let CleanupEvent::FolderStarted { .. } = cleanup_event {
            progress::set_processing(&spinner, &state.current_processing_folder);
        }
        if let Some(line) = output::describe_event(cleanup_event, verb, output_mode) {
            spinner.println(line);
        }
    });
    progress::finish_and_clear(&spinner);

    session.state().last_result.clone()
}

/// Print which folders a run would touch.
fn print_plan(session: &Session, config: &Config) {
    println!("{}", Theme::header("Folders to clean"));
    println!("{}", Theme::divider(60));
    for folder in session.folders().folders().iter().filter(|f| f.activated) {
        println!("  {}  {}", folder.name(), Theme::muted(&folder.path));
    }
    println!();
    println!(
        "Targets: {}",
        Theme::muted(&session.targets().join(", "))
    );
    if config.cleanup.use_trash {
        println!("{}", Theme::muted("Items will be moved to the trash."));
    }
    println!();
}

pub(crate) fn handle_clean(
    storage: &StoragePaths,
    options: CleanOptions,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let mut config = Config::load(&storage.config_file);
    config.apply_cli_overrides(options.trash, options.yes);

    let mut session = open_session(storage, &config, options.dry_run);
    let show_progress = output_mode != OutputMode::Quiet && !options.json;

    if !ensure_access(&mut session, show_progress) {
        print_access_required();
        anyhow::bail!("Full Disk Access is required to clean project folders.");
    }

    // Skipped folders sit out this run only; activation is never saved
    for reference in &options.skip {
        let Some(id) = resolve_folder_ref(session.folders(), reference) else {
            if output_mode != OutputMode::Quiet {
                eprintln!("{} no folder matches '{}'", Theme::warning("Warning:"), reference);
            }
            continue;
        };
        session.folders_mut().set_activated(id, false);
    }

    let has_active = session.folders().folders().iter().any(|f| f.activated);
    if config.cleanup.confirm && !options.dry_run && has_active {
        let prompt = "Delete build artifacts from these folders?";
        let confirmed = if options.json {
            confirm_on_stderr(prompt)
        } else {
            print_plan(&session, &config);
            confirm(prompt)
        };
        if !confirmed {
            if options.json {
                eprintln!("Cleanup cancelled.");
            } else {
                println!("Cleanup cancelled.");
            }
            return Ok(());
        }
    }

    let result = run_session_cleanup(&mut session, output_mode, show_progress);
    let message = session
        .state()
        .message()
        .unwrap_or_else(CleanupMessage::no_active_folders);

    if options.json {
        output::print_json(result.as_ref(), &message, options.dry_run)?;
        if message.is_error() {
            anyhow::bail!("{}", message.text());
        }
        return Ok(());
    }

    match message {
        CleanupMessage::Success(_) => {
            if options.dry_run && output_mode != OutputMode::Quiet {
                println!("{}", Theme::warning("Dry run: nothing was removed."));
            }
            output::print_message(&message, output_mode);
            Ok(())
        }
        CleanupMessage::Error(text) => anyhow::bail!("{}", text),
    }
}
