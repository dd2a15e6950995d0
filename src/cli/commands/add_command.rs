//! Add command feature.
//!
//! This module owns and handles the "flutter-sweep add" command behavior.

use crate::cli::{absolute_path_string, open_folder_store};
use crate::config::StoragePaths;
use crate::folders::FolderStore;
use crate::output::{self, OutputMode};
use crate::theme::Theme;
use std::path::{Path, PathBuf};

/// Add the directories among `paths` to `store`. Non-directories are skipped
/// with a warning, the way a folder picker would never offer them.
pub(crate) fn add_paths(
    store: &mut FolderStore,
    paths: &[PathBuf],
    output_mode: OutputMode,
) -> anyhow::Result<usize> {
    let mut accepted = Vec::with_capacity(paths.len());
    for path in paths {
        let absolute = absolute_path_string(path)?;
        if !Path::new(&absolute).is_dir() {
            if output_mode != OutputMode::Quiet {
                eprintln!(
                    "{} {} is not a directory, skipped",
                    Theme::warning("Warning:"),
                    absolute
                );
            }
            continue;
        }
        accepted.push(absolute);
    }

    Ok(store.add_folders(&accepted))
}

pub(crate) fn handle_add(
    storage: &StoragePaths,
    paths: Vec<PathBuf>,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let mut store = open_folder_store(storage);
    let added = add_paths(&mut store, &paths, output_mode)?;

    if output_mode != OutputMode::Quiet {
        println!("Added {} folder(s).", added);
        println!();
        output::print_folders(store.folders(), output_mode);
    }
    Ok(())
}
