use crate::cleanup::CleanupResult;
use crate::cleanup_events::CleanupEvent;
use crate::folders::FolderRecord;
use crate::messages::CleanupMessage;
use crate::theme::Theme;
use anyhow::Result;
use serde::Serialize;

/// Output verbosity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Quiet,       // Only errors
    Normal,      // Standard output
    Verbose,     // Per-target outcomes
    VeryVerbose, // Also targets that were not found
}

impl OutputMode {
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        if quiet {
            OutputMode::Quiet
        } else if verbose >= 2 {
            OutputMode::VeryVerbose
        } else if verbose == 1 {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }
}

/// Print the folder list with 1-based indices used by other commands.
pub fn print_folders(folders: &[FolderRecord], mode: OutputMode) {
    if mode == OutputMode::Quiet {
        return;
    }
    if folders.is_empty() {
        println!("Select one or more folders to manage with `flutter-sweep add <PATH>`.");
        return;
    }

    for (i, folder) in folders.iter().enumerate() {
        let status = if folder.activated {
            Theme::status_active("[on] ")
        } else {
            Theme::status_inactive("[off]")
        };
        println!(
            "  {:>3}. {} {}  {}",
            i + 1,
            status,
            folder.name(),
            Theme::muted(&folder.path)
        );
    }
}

#[derive(Serialize)]
struct JsonFolder<'a> {
    index: usize,
    name: String,
    path: &'a str,
    activated: bool,
}

pub fn print_folders_json(folders: &[FolderRecord]) -> Result<()> {
    let list: Vec<JsonFolder> = folders
        .iter()
        .enumerate()
        .map(|(i, f)| JsonFolder {
            index: i + 1,
            name: f.name(),
            path: &f.path,
            activated: f.activated,
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&list)?);
    Ok(())
}

/// One progress line for a cleanup event, or `None` if `mode` hides it.
///
/// Deletions and failures show from `-v`, missing targets from `-vv`.
pub fn describe_event(event: &CleanupEvent, verb: &str, mode: OutputMode) -> Option<String> {
    let verbose = matches!(mode, OutputMode::Verbose | OutputMode::VeryVerbose);
    match event {
        CleanupEvent::TargetDeleted {
            folder,
            target,
            bytes,
        } if verbose => Some(format!(
            "  {} {} ({})",
            Theme::success(verb),
            folder.join(target).display(),
            Theme::size(&bytesize::to_string(*bytes, false))
        )),
        CleanupEvent::TargetFailed {
            folder,
            target,
            error,
            ..
        } if verbose => Some(format!(
            "  {} {}: {}",
            Theme::error("failed"),
            folder.join(target).display(),
            error
        )),
        CleanupEvent::TargetMissing { folder, target } if mode == OutputMode::VeryVerbose => {
            Some(format!(
                "  {} {} not found",
                Theme::muted("-"),
                folder.join(target).display()
            ))
        }
        _ => None,
    }
}

/// Print the final message. Success goes to stdout, errors to stderr.
pub fn print_message(message: &CleanupMessage, mode: OutputMode) {
    match message {
        CleanupMessage::Success(text) => {
            if mode != OutputMode::Quiet {
                println!("{}", Theme::success(text));
            }
        }
        CleanupMessage::Error(text) => eprintln!("{}", Theme::error(text)),
    }
}

/// Counts are `null` when no run happened, e.g. with no active folders.
#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    timestamp: String,
    dry_run: bool,
    deleted_count: Option<usize>,
    failed_count: Option<usize>,
    total_bytes_freed: Option<u64>,
    total_freed_human: Option<String>,
    message: &'a str,
    is_error: bool,
    outcomes: &'a [crate::cleanup::TargetOutcome],
}

impl<'a> JsonReport<'a> {
    fn new(result: Option<&'a CleanupResult>, message: &'a CleanupMessage, dry_run: bool) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            timestamp: chrono::Utc::now().to_rfc3339(),
            dry_run,
            deleted_count: result.map(|r| r.deleted_count),
            failed_count: result.map(|r| r.failed_count),
            total_bytes_freed: result.map(|r| r.total_bytes_freed),
            total_freed_human: result.map(CleanupResult::size_human),
            message: message.text(),
            is_error: message.is_error(),
            outcomes: result.map(|r| r.outcomes.as_slice()).unwrap_or_default(),
        }
    }
}

pub fn print_json(
    result: Option<&CleanupResult>,
    message: &CleanupMessage,
    dry_run: bool,
) -> Result<()> {
    let report = JsonReport::new(result, message, dry_run);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
