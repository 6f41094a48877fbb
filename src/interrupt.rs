//! Interrupt handling
//!
//! Long-running tools call [`install`] once at startup. Temporary paths are
//! registered with a [`CleanupGuard`]; when Ctrl+C (or SIGTERM on Unix)
//! arrives, every registered path is removed and the process exits with
//! code 1. Guards unregister themselves on drop.

use crate::output;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

/// Paths to delete if the process is interrupted.
fn pending() -> &'static Mutex<Vec<PathBuf>> {
    static PENDING: OnceLock<Mutex<Vec<PathBuf>>> = OnceLock::new();
    PENDING.get_or_init(|| Mutex::new(Vec::new()))
}

fn with_pending<T>(f: impl FnOnce(&mut Vec<PathBuf>) -> T) -> T {
    let mut guard = pending().lock().unwrap_or_else(|e| e.into_inner());
    f(&mut guard)
}

/// Registers a path for removal on interrupt for as long as it lives.
#[derive(Debug)]
pub struct CleanupGuard {
    path: PathBuf,
}

impl CleanupGuard {
    pub fn new(path: &Path) -> Self {
        let path = path.to_path_buf();
        with_pending(|p| p.push(path.clone()));
        Self { path }
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        with_pending(|p| {
            if let Some(pos) = p.iter().rposition(|x| x == &self.path) {
                p.remove(pos);
            }
        });
    }
}

/// Snapshot of the currently registered paths.
pub fn registered() -> Vec<PathBuf> {
    with_pending(|p| p.clone())
}

/// Remove every registered path, ignoring failures.
fn cleanup_registered() {
    for path in with_pending(std::mem::take) {
        if path.is_dir() {
            std::fs::remove_dir_all(&path).ok();
        } else {
            std::fs::remove_file(&path).ok();
        }
    }
}

/// Keeps the signal listener alive; drop it to stop listening.
pub struct InterruptHandler {
    _runtime: tokio::runtime::Runtime,
}

/// Start listening for interrupts on a background thread.
///
/// Signal handlers are registered before this returns.
pub fn install() -> std::io::Result<InterruptHandler> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("interrupt")
        .enable_all()
        .build()?;

    let listener = {
        let _enter = runtime.enter();
        Listener::register()?
    };

    runtime.spawn(async move {
        listener.wait().await;
        eprintln!();
        output::warn("interrupted, cleaning up");
        cleanup_registered();
        std::process::exit(1);
    });

    Ok(InterruptHandler { _runtime: runtime })
}

#[cfg(unix)]
struct Listener {
    sigint: tokio::signal::unix::Signal,
    sigterm: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl Listener {
    fn register() -> std::io::Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};

        Ok(Self {
            sigint: signal(SignalKind::interrupt())?,
            sigterm: signal(SignalKind::terminate())?,
        })
    }

    async fn wait(mut self) {
        tokio::select! {
            _ = self.sigint.recv() => {}
            _ = self.sigterm.recv() => {}
        }
    }
}

#[cfg(not(unix))]
struct Listener;

#[cfg(not(unix))]
impl Listener {
    fn register() -> std::io::Result<Self> {
        Ok(Self)
    }

    async fn wait(self) {
        if tokio::signal::ctrl_c().await.is_err() {
            // No way to listen; never fire.
            std::future::pending::<()>().await;
        }
    }
}
