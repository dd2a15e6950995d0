//! List command feature.
//!
//! This module owns and handles the "flutter-sweep list" command behavior.

use crate::cli::open_folder_store;
use crate::config::StoragePaths;
use crate::output::{self, OutputMode};
use crate::theme::Theme;

pub(crate) fn handle_list(
    storage: &StoragePaths,
    json: bool,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let store = open_folder_store(storage);

    if json {
        return output::print_folders_json(store.folders());
    }

    if output_mode != OutputMode::Quiet {
        println!("{}", Theme::header("Flutter projects"));
        println!("{}", Theme::divider(60));
    }
    output::print_folders(store.folders(), output_mode);
    Ok(())
}
