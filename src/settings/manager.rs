//! Settings manager and process-wide accessor.
//!
//! A `Manager` owns one registry, one state store and at most one watcher
//! task. Build it explicitly with [`Manager::start`] and pass the `Arc`
//! around; [`get_instance`] exists for code that cannot be handed one.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::lifecycle::Shutdown;
use crate::settings::registry::SettingsRegistry;
use crate::settings::schema::Snapshot;
use crate::settings::watcher::SettingsWatcher;
use crate::state::StateStore;

/// Watched file used by the process-wide instance.
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Poll interval used by the process-wide instance.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Errors from wiring up a manager.
#[derive(Debug, Error)]
pub enum ManagerError {
    /// The watcher task needs a tokio runtime to be spawned on.
    #[error("no tokio runtime available to run the settings watcher")]
    NoRuntime,

    /// A manager drives exactly one watcher.
    #[error("settings watcher already running for {0}")]
    WatcherRunning(PathBuf),

    /// The poll interval must be non-zero.
    #[error("settings poll interval must be greater than zero")]
    InvalidInterval,
}

/// Where and how often to poll.
#[derive(Debug, Clone)]
pub struct ManagerOptions {
    pub path: PathBuf,
    pub poll_interval: Duration,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_SETTINGS_FILE),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Settings registry, state store and watcher wired together.
pub struct Manager {
    options: ManagerOptions,
    registry: Arc<SettingsRegistry>,
    state: StateStore,
    shutdown: Shutdown,
    watching: AtomicBool,
}

impl Manager {
    /// Create a manager without starting its watcher.
    pub fn new(options: ManagerOptions) -> Self {
        Self {
            options,
            registry: Arc::new(SettingsRegistry::new()),
            state: StateStore::new(),
            shutdown: Shutdown::new(),
            watching: AtomicBool::new(false),
        }
    }

    /// Create a manager and spawn its watcher on the current runtime.
    pub fn start(options: ManagerOptions) -> Result<Arc<Self>, ManagerError> {
        let handle = Handle::try_current().map_err(|_| ManagerError::NoRuntime)?;
        let manager = Arc::new(Self::new(options));
        manager.spawn_watcher_on(&handle)?;
        Ok(manager)
    }

    /// Spawn the watcher on the current runtime.
    pub fn spawn_watcher(&self) -> Result<JoinHandle<()>, ManagerError> {
        let handle = Handle::try_current().map_err(|_| ManagerError::NoRuntime)?;
        self.spawn_watcher_on(&handle)
    }

    /// Spawn the watcher on `handle`. Fails if one was already spawned or the
    /// poll interval is zero.
    pub fn spawn_watcher_on(&self, handle: &Handle) -> Result<JoinHandle<()>, ManagerError> {
        if self.options.poll_interval.is_zero() {
            return Err(ManagerError::InvalidInterval);
        }
        if self.watching.swap(true, Ordering::SeqCst) {
            return Err(ManagerError::WatcherRunning(self.options.path.clone()));
        }

        let watcher = SettingsWatcher::new(
            &self.options.path,
            self.options.poll_interval,
            self.registry.clone(),
        );
        let shutdown = self.shutdown.subscribe();
        Ok(handle.spawn(watcher.run(shutdown)))
    }

    /// Current settings and fingerprint.
    pub fn get(&self) -> Snapshot {
        self.registry.read()
    }

    pub fn registry(&self) -> &Arc<SettingsRegistry> {
        &self.registry
    }

    /// Counters shared between consumers.
    pub fn state(&self) -> &StateStore {
        &self.state
    }

    pub fn options(&self) -> &ManagerOptions {
        &self.options
    }

    /// Stop the watcher. Settings stay readable.
    pub fn stop(&self) {
        self.shutdown.trigger();
    }
}

impl Drop for Manager {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

static INSTANCE: OnceLock<Arc<Manager>> = OnceLock::new();
static INIT_LOCK: Mutex<()> = Mutex::new(());

/// The process-wide manager, built on first call.
///
/// Watches [`DEFAULT_SETTINGS_FILE`] every [`DEFAULT_POLL_INTERVAL`]. Concurrent
/// first callers are serialized on a lock separate from the registry's, so only
/// one watcher is ever started.
///
/// The watcher is spawned on the first caller's runtime and stops when that
/// runtime shuts down. The instance itself outlives it: settings stay readable
/// but are no longer reloaded, and `spawn_watcher` keeps returning
/// [`ManagerError::WatcherRunning`].
pub fn get_instance() -> Result<Arc<Manager>, ManagerError> {
    if let Some(manager) = INSTANCE.get() {
        return Ok(manager.clone());
    }

    let _guard = INIT_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(manager) = INSTANCE.get() {
        return Ok(manager.clone());
    }

    let manager = Manager::start(ManagerOptions::default())?;
    tracing::info!(path = DEFAULT_SETTINGS_FILE, "Process-wide settings manager created");
    Ok(INSTANCE.get_or_init(|| manager).clone())
}
