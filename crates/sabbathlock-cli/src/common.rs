//! Shared plumbing for CLI commands.
//!
//! Every command invocation is its own OS process, so the manager and its
//! collaborators are rebuilt from the persisted store each time. Nothing is
//! cached between invocations.

use sabbathlock_core::{
    CachedEntitlement, SabbathManager, SharedStoreEnforcer, SharedStoreMonitor, StateStore,
};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the store, wire up the store-backed collaborators, and hand the
/// manager to `f`.
pub fn with_manager<T>(
    f: impl FnOnce(&SabbathManager<'_>, &StateStore) -> Result<T, Box<dyn std::error::Error>>,
) -> Result<T, Box<dyn std::error::Error>> {
    let store = StateStore::open()?;
    let enforcer = SharedStoreEnforcer::new(&store);
    let monitor = SharedStoreMonitor::new(&store);
    let entitlement = CachedEntitlement::new(&store);
    let manager = SabbathManager::new(&store, &enforcer, &monitor, &entitlement);
    f(&manager, &store)
}

/// Wall-clock now in the user's calendar timezone.
pub fn now_local() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}
