//! Thin wrapper around the `trash` crate.
//!
//! Platform trash backends (COM on Windows, Finder scripting on macOS) can
//! panic inside the dependency. A panic is turned into an `io::Error` so the
//! cleanup run records a failed target instead of losing the worker thread.

use std::any::Any;
use std::io;
use std::path::Path;

fn panic_payload_to_string(panic_payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic_payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic_payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn catch_trash_panic(f: impl FnOnce() -> Result<(), trash::Error>) -> io::Result<()> {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(io::Error::other(err.to_string())),
        Err(panic_payload) => {
            let msg = panic_payload_to_string(panic_payload);
            Err(io::Error::other(format!(
                "trash operation panicked (dependency bug): {msg}"
            )))
        }
    }
}

/// Move `path` to the platform trash.
pub fn delete(path: &Path) -> io::Result<()> {
    catch_trash_panic(|| trash::delete(path))
}
