//! Remove command feature.
//!
//! This module owns and handles the "flutter-sweep remove" command behavior.

use crate::cli::{open_folder_store, resolve_folder_ref};
use crate::config::StoragePaths;
use crate::folders::FolderStore;
use crate::output::{self, OutputMode};
use crate::theme::Theme;

/// Remove folders named by path or 1-based index. All references are
/// resolved before anything is removed, so indices refer to the list as
/// it was shown.
pub(crate) fn remove_refs(
    store: &mut FolderStore,
    references: &[String],
    output_mode: OutputMode,
) -> usize {
    let mut ids = Vec::with_capacity(references.len());
    for reference in references {
        match resolve_folder_ref(store, reference) {
            Some(id) => ids.push(id),
            None => {
                if output_mode != OutputMode::Quiet {
                    eprintln!("{} no folder matches '{}'", Theme::warning("Warning:"), reference);
                }
            }
        }
    }

    ids.into_iter().filter(|id| store.remove_folder(*id)).count()
}

pub(crate) fn handle_remove(
    storage: &StoragePaths,
    references: Vec<String>,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let mut store = open_folder_store(storage);
    let removed = remove_refs(&mut store, &references, output_mode);

    if removed == 0 {
        anyhow::bail!("No folders were removed.");
    }

    if output_mode != OutputMode::Quiet {
        println!("Removed {} folder(s).", removed);
        println!();
        output::print_folders(store.folders(), output_mode);
    }
    Ok(())
}
