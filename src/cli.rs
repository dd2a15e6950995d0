use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::bookmarks::PathBookmarks;
use crate::cleanup;
use crate::config::{Config, StoragePaths};
use crate::folders::FolderStore;
use crate::output::OutputMode;
use crate::preferences::JsonPreferences;
use crate::session::Session;
use crate::utils;

mod commands;
mod interactive_shell;

/// Read a line from stdin after flushing any pending prompt.
///
/// Returns `None` at end of input.
pub(crate) fn read_line_from_stdin() -> io::Result<Option<String>> {
    io::stdout().flush()?;

    let mut input = String::new();
    let read = io::stdin().lock().read_line(&mut input)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(input))
}

fn read_answer() -> bool {
    match read_line_from_stdin() {
        Ok(Some(line)) => {
            let answer = line.trim().to_lowercase();
            answer == "y" || answer == "yes"
        }
        _ => false,
    }
}

/// Ask a yes/no question; anything but "y"/"yes" (or no input) means no.
pub(crate) fn confirm(prompt: &str) -> bool {
    print!("{} [y/N]: ", prompt);
    read_answer()
}

/// Same as [`confirm`], but prompts on stderr so stdout stays machine-readable.
pub(crate) fn confirm_on_stderr(prompt: &str) -> bool {
    eprint!("{} [y/N]: ", prompt);
    let _ = io::stderr().flush();
    read_answer()
}

#[derive(Parser)]
#[command(name = "flutter-sweep")]
#[command(version)]
#[command(about = "Reclaim disk space by deleting build artifacts from Flutter projects")]
#[command(
    long_about = "flutter-sweep remembers a list of Flutter project folders and deletes \
    their build artifacts (build, .dart_tool, pubspec.lock, ios/Pods, ios/Podfile.lock, \
    ios/Gemfile.lock) to free disk space.\n\n\
    Interactive Mode:\n  \
    flutter-sweep                      # Launch the interactive shell\n\n\
    Examples:\n  \
    flutter-sweep add ~/dev/shop ~/dev/blog   # Remember two projects\n  \
    flutter-sweep list                        # Show remembered projects\n  \
    flutter-sweep clean --dry-run             # Preview what would be deleted\n  \
    flutter-sweep clean -y --skip 2           # Clean all but project #2"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase output verbosity (-v, -vv for more)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Directory holding config.toml and preferences.json
    #[arg(long, value_name = "DIR", global = true, env = "FLUTTER_SWEEP_HOME")]
    pub home: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Remember one or more project folders
    #[command(visible_alias = "a")]
    Add {
        /// Project folders to add
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,
    },

    /// Forget project folders (by path or list index)
    #[command(visible_alias = "rm")]
    Remove {
        /// Folder paths or 1-based indices from `list`
        #[arg(required = true, value_name = "PATH|INDEX")]
        folders: Vec<String>,
    },

    /// Show remembered project folders
    #[command(visible_alias = "ls")]
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Delete build artifacts from the active project folders
    #[command(visible_alias = "c")]
    Clean {
        /// Leave these folders out of this run (path or 1-based index)
        #[arg(long, value_name = "PATH|INDEX")]
        skip: Vec<String>,

        /// Move artifacts to the trash instead of deleting them
        #[arg(long)]
        trash: bool,

        /// Preview only, don't delete
        #[arg(long)]
        dry_run: bool,

        /// Output results as JSON for scripting
        #[arg(long)]
        json: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Check whether Full Disk Access has been granted
    Access,

    /// Show the paths removed from each project
    Targets,

    /// View or modify configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,

        /// Print the config and preferences file locations
        #[arg(long)]
        path: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn output_mode(&self) -> OutputMode {
        OutputMode::from_flags(self.verbose, self.quiet)
    }

    pub fn run(self) -> anyhow::Result<()> {
        let output_mode = self.output_mode();
        let storage = StoragePaths::resolve(self.home.as_deref())?;

        match self.command {
            None => interactive_shell::run_shell(&storage, output_mode),
            Some(Commands::Add { paths }) => commands::add_command::handle_add(&storage, paths, output_mode),
            Some(Commands::Remove { folders }) => {
                commands::remove_command::handle_remove(&storage, folders, output_mode)
            }
            Some(Commands::List { json }) => commands::list_command::handle_list(&storage, json, output_mode),
            Some(Commands::Clean {
                skip,
                trash,
                dry_run,
                json,
                yes,
            }) => commands::clean_command::handle_clean(
                &storage,
                commands::clean_command::CleanOptions {
                    skip,
                    trash,
                    dry_run,
                    json,
                    yes,
                },
                output_mode,
            ),
            Some(Commands::Access) => commands::access_command::handle_access(&storage, output_mode),
            Some(Commands::Targets) => commands::targets_command::handle_targets(&storage),
            Some(Commands::Config { reset, path, .. }) => {
                commands::config_command::handle_config(&storage, reset, path)
            }
        }
    }
}

/// Open the folder store backed by the preferences file and restore saved folders.
pub(crate) fn open_folder_store(storage: &StoragePaths) -> FolderStore {
    let mut store = FolderStore::new(
        Box::new(PathBookmarks::new()),
        Box::new(JsonPreferences::open(&storage.preferences_file)),
    );
    store.load_persisted_if_needed();
    store
}

/// Open a session using config from `storage`.
pub(crate) fn open_session(storage: &StoragePaths, config: &Config, dry_run: bool) -> Session {
    Session::new(
        open_folder_store(storage),
        config.targets(),
        cleanup::remover_for(config.cleanup.use_trash, dry_run),
        config.access_probe(),
    )
}

/// Turn a user path into the string form stored in folder records.
pub(crate) fn absolute_path_string(path: &Path) -> anyhow::Result<String> {
    let absolute = utils::to_absolute(path)
        .with_context(|| format!("Invalid path: {}", path.display()))?;
    // Rebuilding from components drops trailing separators
    let normalized: PathBuf = absolute.components().collect();
    Ok(normalized.to_string_lossy().into_owned())
}

/// Find a folder by 1-based list index or by path.
pub(crate) fn resolve_folder_ref(store: &FolderStore, reference: &str) -> Option<Uuid> {
    if let Ok(index) = reference.trim().parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| store.folders().get(i))
            .map(|r| r.id);
    }

    let path = absolute_path_string(Path::new(reference)).ok()?;
    store.find_by_path(&path).map(|r| r.id)
}
