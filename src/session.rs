//! Session: the single owner of folder and run state.
//!
//! Background work (the access probe and the cleanup run) happens on worker
//! threads that never touch session state. Workers post `SessionEvent`s on a
//! channel; the thread that owns the `Session` applies them in `pump` or
//! `wait_for_*`. Cleanup is single-flight: a second run is refused while
//! one is in flight.

use crate::access::{self, AccessProbe};
use crate::cleanup::{self, CleanupError, CleanupResult, Remover};
use crate::cleanup_events::CleanupEvent;
use crate::folders::FolderStore;
use crate::messages::CleanupMessage;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error};

/// Observable run state, mutated only by the session owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunState {
    pub is_running_commands: bool,
    pub current_processing_folder: String,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
    pub has_full_disk_access: Option<bool>,
    pub last_result: Option<CleanupResult>,
}

impl RunState {
    /// The message currently shown to the user, if any.
    pub fn message(&self) -> Option<CleanupMessage> {
        if let Some(text) = &self.error_message {
            Some(CleanupMessage::Error(text.clone()))
        } else {
            self.success_message.clone().map(CleanupMessage::Success)
        }
    }

    fn set_message(&mut self, message: CleanupMessage) {
        match message {
            CleanupMessage::Success(text) => {
                self.success_message = Some(text);
                self.error_message = None;
            }
            CleanupMessage::Error(text) => {
                self.error_message = Some(text);
                self.success_message = None;
            }
        }
    }
}

/// Results posted by background workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Cleanup(CleanupEvent),
    CleanupFinished(CleanupResult),
    AccessChecked(bool),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("a cleanup is already running")]
    AlreadyRunning,

    #[error("no active folders to clean")]
    NoActiveFolders,
}

const WORKER_POLL: Duration = Duration::from_millis(100);

pub struct Session {
    folders: FolderStore,
    state: RunState,
    targets: Vec<String>,
    remover: Arc<dyn Remover>,
    probe: AccessProbe,
    tx: Sender<SessionEvent>,
    rx: Receiver<SessionEvent>,
    cleanup_worker: Option<JoinHandle<()>>,
}

impl Session {
    pub fn new(
        folders: FolderStore,
        targets: Vec<String>,
        remover: Arc<dyn Remover>,
        probe: AccessProbe,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            folders,
            state: RunState::default(),
            targets,
            remover,
            probe,
            tx,
            rx,
            cleanup_worker: None,
        }
    }

    pub fn folders(&self) -> &FolderStore {
        &self.folders
    }

    pub fn folders_mut(&mut self) -> &mut FolderStore {
        &mut self.folders
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    pub fn remover(&self) -> &dyn Remover {
        self.remover.as_ref()
    }

    /// Start a background access probe. The answer lands in
    /// `RunState::has_full_disk_access` once applied.
    pub fn start_access_check(&self) -> JoinHandle<()> {
        let tx = self.tx.clone();
        access::spawn_access_check(self.probe.clone(), move |granted| {
            let _ = tx.send(SessionEvent::AccessChecked(granted));
        })
    }

    /// Start a cleanup of the active folders on a worker thread.
    pub fn start_cleanup(&mut self) -> Result<(), SessionError> {
        if self.state.is_running_commands {
            return Err(SessionError::AlreadyRunning);
        }

        let folders = self.folders.active_paths();
        if folders.is_empty() {
            self.state.set_message(CleanupMessage::no_active_folders());
            return Err(SessionError::NoActiveFolders);
        }

        self.state.is_running_commands = true;
        self.state.error_message = None;
        self.state.success_message = None;

        let targets = self.targets.clone();
        let remover = Arc::clone(&self.remover);
        let tx = self.tx.clone();
        debug!(folders = folders.len(), "starting cleanup worker");

        self.cleanup_worker = Some(thread::spawn(move || {
            let progress_tx = tx.clone();
            let outcome = cleanup::run_cleanup_with_progress(
                &folders,
                &targets,
                remover.as_ref(),
                &mut |event| {
                    let _ = progress_tx.send(SessionEvent::Cleanup(event));
                },
            );
            let result = match outcome {
                Ok(result) => result,
                // Folders were checked non-empty before spawning
                Err(CleanupError::NoActiveFolders) => CleanupResult::default(),
            };
            let _ = tx.send(SessionEvent::CleanupFinished(result));
        }));

        Ok(())
    }

    /// Apply every pending event without blocking. Returns the applied events.
    pub fn pump(&mut self) -> Vec<SessionEvent> {
        let mut applied = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            self.apply(&event);
            applied.push(event);
        }
        applied
    }

    /// Block until the in-flight cleanup finishes, applying events as they
    /// arrive. `on_event` sees each event after it has been applied.
    pub fn wait_for_cleanup(&mut self, mut on_event: impl FnMut(&SessionEvent, &RunState)) {
        while self.state.is_running_commands {
            match self.rx.recv_timeout(WORKER_POLL) {
                Ok(event) => {
                    self.apply(&event);
                    on_event(&event, &self.state);
                }
                Err(RecvTimeoutError::Timeout) => self.reap_dead_worker(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    }

    /// Block until an access check result arrives and return it.
    pub fn wait_for_access(&mut self) -> bool {
        loop {
            match self.rx.recv() {
                Ok(event) => {
                    self.apply(&event);
                    if let SessionEvent::AccessChecked(granted) = event {
                        return granted;
                    }
                }
                Err(_) => return false,
            }
        }
    }

    /// Clear both message slots once the user has seen them.
    pub fn acknowledge_message(&mut self) {
        self.state.error_message = None;
        self.state.success_message = None;
    }

    fn apply(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::AccessChecked(granted) => {
                self.state.has_full_disk_access = Some(*granted);
            }
            SessionEvent::Cleanup(cleanup_event) => {
                if let Some(name) = cleanup_event.processing_name() {
                    self.state.current_processing_folder = name.to_string();
                }
            }
            SessionEvent::CleanupFinished(result) => {
                self.state.is_running_commands = false;
                self.state.current_processing_folder.clear();
                self.state.set_message(CleanupMessage::from_result(result));
                self.state.last_result = Some(result.clone());
                if let Some(worker) = self.cleanup_worker.take() {
                    let _ = worker.join();
                }
            }
        }
    }

    /// A worker that exited without reporting back must have panicked.
    fn reap_dead_worker(&mut self) {
        let finished = self
            .cleanup_worker
            .as_ref()
            .is_some_and(|worker| worker.is_finished());
        if !finished {
            return;
        }

        // The final event may have raced the timeout
        self.pump();
        if self.state.is_running_commands {
            error!("cleanup worker stopped without reporting a result");
            self.cleanup_worker = None;
            self.state.is_running_commands = false;
            self.state.current_processing_folder.clear();
            self.state
                .set_message(CleanupMessage::Error("Cleanup stopped unexpectedly.".to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmarks::PathBookmarks;
    use crate::cleanup::PermanentRemover;
    use crate::preferences::MemoryPreferences;
    use std::fs;
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::{Condvar, Mutex};
    use tempfile::TempDir;

    fn session_with(dirs: &[PathBuf], remover: Arc<dyn Remover>) -> Session {
        let mut folders = FolderStore::new(
            Box::new(PathBookmarks::new()),
            Box::new(MemoryPreferences::new()),
        );
        folders.add_folders(dirs);
        Session::new(
            folders,
            cleanup::cleanup_targets(&[]),
            remover,
            AccessProbe::default(),
        )
    }

    /// Blocks every removal until released.
    struct Gate {
        open: Mutex<bool>,
        cv: Condvar,
    }

    impl Gate {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                open: Mutex::new(false),
                cv: Condvar::new(),
            })
        }

        fn release(&self) {
            *self.open.lock().unwrap() = true;
            self.cv.notify_all();
        }
    }

    struct GatedRemover(Arc<Gate>);

    impl Remover for GatedRemover {
        fn remove(&self, path: &Path) -> io::Result<()> {
            let mut open = self.0.open.lock().unwrap();
            while !*open {
                open = self.0.cv.wait(open).unwrap();
            }
            PermanentRemover.remove(path)
        }
    }

    struct PanickingRemover;

    impl Remover for PanickingRemover {
        fn remove(&self, _path: &Path) -> io::Result<()> {
            panic!("remover blew up");
        }
    }

    #[test]
    fn test_no_active_folders_sets_error_without_work() {
        let mut session = session_with(&[], Arc::new(PermanentRemover));

        assert_eq!(session.start_cleanup(), Err(SessionError::NoActiveFolders));
        assert!(!session.state().is_running_commands);
        assert!(session.state().error_message.is_some());
        assert!(session.state().success_message.is_none());
        assert!(session.state().last_result.is_none());
    }

    #[test]
    fn test_cleanup_runs_and_hands_off_result() {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.path().join("shop");
        fs::create_dir_all(project.join("build")).unwrap();
        let mut session = session_with(&[project.clone()], Arc::new(PermanentRemover));

        session.start_cleanup().unwrap();
        assert!(session.state().is_running_commands);

        let mut processing = Vec::new();
        session.wait_for_cleanup(|event, state| {
            if let SessionEvent::Cleanup(CleanupEvent::FolderStarted { .. }) = event {
                processing.push(state.current_processing_folder.clone());
            }
        });

        assert_eq!(processing, vec!["shop".to_string()]);
        let state = session.state();
        assert!(!state.is_running_commands);
        assert!(state.current_processing_folder.is_empty());
        assert!(state.error_message.is_none());
        assert!(state.success_message.as_ref().unwrap().contains("1 item(s)"));
        assert_eq!(state.last_result.as_ref().unwrap().deleted_count, 1);
        assert!(!project.join("build").exists());
    }

    #[test]
    fn test_second_start_is_refused_while_running() {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.path().join("app");
        fs::create_dir_all(project.join("build")).unwrap();
        let gate = Gate::new();
        let mut session = session_with(&[project], Arc::new(GatedRemover(Arc::clone(&gate))));

        session.start_cleanup().unwrap();
        assert_eq!(session.start_cleanup(), Err(SessionError::AlreadyRunning));

        gate.release();
        session.wait_for_cleanup(|_, _| {});
        assert!(!session.state().is_running_commands);
        assert!(session.start_cleanup().is_ok());
        session.wait_for_cleanup(|_, _| {});
    }

    #[test]
    fn test_inactive_folders_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let on = temp_dir.path().join("on");
        let off = temp_dir.path().join("off");
        fs::create_dir_all(on.join("build")).unwrap();
        fs::create_dir_all(off.join("build")).unwrap();
        let mut session = session_with(&[on.clone(), off.clone()], Arc::new(PermanentRemover));
        let off_id = session
            .folders()
            .find_by_path(&off.to_string_lossy())
            .unwrap()
            .id;
        session.folders_mut().toggle_activation(off_id);

        session.start_cleanup().unwrap();
        session.wait_for_cleanup(|_, _| {});

        assert!(!on.join("build").exists());
        assert!(off.join("build").exists());
    }

    #[test]
    fn test_panicking_worker_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.path().join("app");
        fs::create_dir_all(project.join("build")).unwrap();
        let mut session = session_with(&[project], Arc::new(PanickingRemover));

        session.start_cleanup().unwrap();
        session.wait_for_cleanup(|_, _| {});

        assert!(!session.state().is_running_commands);
        assert_eq!(
            session.state().error_message.as_deref(),
            Some("Cleanup stopped unexpectedly.")
        );
    }

    #[test]
    fn test_access_check_lands_in_state() {
        let mut session = session_with(&[], Arc::new(PermanentRemover));
        assert_eq!(session.state().has_full_disk_access, None);

        session.start_access_check();
        assert!(session.wait_for_access());
        assert_eq!(session.state().has_full_disk_access, Some(true));
    }

    #[test]
    fn test_acknowledge_clears_messages() {
        let mut session = session_with(&[], Arc::new(PermanentRemover));
        let _ = session.start_cleanup();
        session.acknowledge_message();
        assert!(session.state().error_message.is_none());
        assert!(session.state().success_message.is_none());
    }

    #[test]
    fn test_pump_applies_pending_events() {
        let mut session = session_with(&[], Arc::new(PermanentRemover));
        session.start_access_check().join().unwrap();

        let applied = session.pump();
        assert_eq!(applied, vec![SessionEvent::AccessChecked(true)]);
        assert_eq!(session.state().has_full_disk_access, Some(true));
    }
}
