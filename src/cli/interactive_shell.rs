//! Interactive shell feature.
//!
//! This module owns the prompt loop started when no command is provided.
//! The shell keeps one session alive, so activation toggles last until exit.

use super::commands::access_command::{ensure_access, print_access_required};
use super::commands::add_command::add_paths;
use super::commands::clean_command::run_session_cleanup;
use super::commands::remove_command::remove_refs;
use super::{confirm, open_session, read_line_from_stdin, resolve_folder_ref};
use crate::config::{Config, StoragePaths};
use crate::messages::CleanupMessage;
use crate::output::{self, OutputMode};
use crate::session::Session;
use crate::theme::Theme;
use std::path::PathBuf;

/// One parsed shell line.
#[derive(Debug, PartialEq, Eq)]
enum ShellCommand {
    List,
    Add(Vec<PathBuf>),
    Remove(Vec<String>),
    Toggle(Vec<String>),
    Clean,
    Access,
    Targets,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

fn parse_line(line: &str) -> ShellCommand {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return ShellCommand::Empty;
    };
    let args: Vec<String> = words.map(str::to_string).collect();

    match head.to_lowercase().as_str() {
        "list" | "ls" | "l" => ShellCommand::List,
        "add" | "a" => ShellCommand::Add(args.into_iter().map(PathBuf::from).collect()),
        "remove" | "rm" => ShellCommand::Remove(args),
        "toggle" | "t" => ShellCommand::Toggle(args),
        "clean" | "c" => ShellCommand::Clean,
        "access" => ShellCommand::Access,
        "targets" => ShellCommand::Targets,
        "help" | "h" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => ShellCommand::Unknown(other.to_string()),
    }
}

fn print_help() {
    println!("{}", Theme::header("Commands"));
    let rows = [
        ("list", "Show project folders and whether they are active"),
        ("add <PATH>...", "Add project folders"),
        ("remove <PATH|INDEX>...", "Forget project folders"),
        ("toggle <PATH|INDEX>...", "Switch folders on or off for this session"),
        ("clean", "Delete build artifacts from active folders"),
        ("access", "Check Full Disk Access again"),
        ("targets", "Show the paths removed from each project"),
        ("quit", "Leave the shell"),
    ];
    for (command, about) in rows {
        println!("  {:<24} {}", Theme::command(command), Theme::muted(about));
    }
}

fn toggle_refs(session: &mut Session, references: &[String]) {
    for reference in references {
        let Some(id) = resolve_folder_ref(session.folders(), reference) else {
            eprintln!("{} no folder matches '{}'", Theme::warning("Warning:"), reference);
            continue;
        };
        if let Some(active) = session.folders_mut().toggle_activation(id) {
            let name = session.folders().get(id).map(|f| f.name()).unwrap_or_default();
            let state = if active { "on" } else { "off" };
            println!("{} is now {}", name, state);
        }
    }
}

fn clean(session: &mut Session, config: &Config, output_mode: OutputMode) {
    if session.state().has_full_disk_access != Some(true) && !ensure_access(session, true) {
        print_access_required();
        return;
    }

    let has_active = session.folders().folders().iter().any(|f| f.activated);
    if has_active
        && config.cleanup.confirm
        && !confirm("Delete build artifacts from the active folders?")
    {
        println!("Cleanup cancelled.");
        return;
    }

    run_session_cleanup(session, output_mode, output_mode != OutputMode::Quiet);
    let message = session
        .state()
        .message()
        .unwrap_or_else(CleanupMessage::no_active_folders);
    output::print_message(&message, output_mode);
    session.acknowledge_message();
}

pub(crate) fn run_shell(storage: &StoragePaths, output_mode: OutputMode) -> anyhow::Result<()> {
    let config = Config::load(&storage.config_file);
    let mut session = open_session(storage, &config, false);

    println!();
    println!("{}", Theme::header("flutter-sweep - Reclaim disk space from Flutter projects"));
    println!("{}", Theme::divider_bold(60));
    if !ensure_access(&mut session, true) {
        print_access_required();
        println!();
    }
    output::print_folders(session.folders().folders(), output_mode);
    println!();
    println!("Type {} for a list of commands.", Theme::command("help"));

    loop {
        print!("> ");
        let Some(line) = read_line_from_stdin()? else {
            println!();
            break;
        };

        match parse_line(&line) {
            ShellCommand::Empty => {}
            ShellCommand::Quit => break,
            ShellCommand::Help => print_help(),
            ShellCommand::List => output::print_folders(session.folders().folders(), output_mode),
            ShellCommand::Add(paths) => {
                if paths.is_empty() {
                    eprintln!("Usage: add <PATH>...");
                    continue;
                }
                match add_paths(session.folders_mut(), &paths, output_mode) {
                    Ok(added) => println!("Added {} folder(s).", added),
                    Err(e) => eprintln!("{} {:#}", Theme::error("Error:"), e),
                }
            }
            ShellCommand::Remove(references) => {
                let removed = remove_refs(session.folders_mut(), &references, output_mode);
                println!("Removed {} folder(s).", removed);
            }
            ShellCommand::Toggle(references) => toggle_refs(&mut session, &references),
            ShellCommand::Clean => clean(&mut session, &config, output_mode),
            ShellCommand::Access => {
                if ensure_access(&mut session, true) {
                    println!("{}", Theme::success("Full Disk Access granted."));
                } else {
                    print_access_required();
                }
            }
            ShellCommand::Targets => {
                for target in session.targets() {
                    println!("  {}", target);
                }
            }
            ShellCommand::Unknown(word) => {
                eprintln!("Unknown command '{}'. Type {} for help.", word, Theme::command("help"));
            }
        }
    }

    Ok(())
}
