//! Collaborator seams for the platform facilities the core does not own.
//!
//! The restriction enforcer, the interval monitor, and the entitlement
//! service are external. The core sees them only through these traits;
//! real platform bindings live with the host (the CLI ships store-backed
//! implementations that record commands in the shared state store, the
//! same way the platform keeps shield settings in a shared config store).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::schedule::WeeklyRecurrence;
use crate::selection::Selection;
use crate::storage::store::keys;
use crate::storage::StateStore;

/// Applies and removes restrictions on the selected targets.
pub trait Enforcer {
    /// Block every target in `selection`.
    fn enable(&self, selection: &Selection) -> Result<()>;

    /// Remove all restrictions.
    fn disable(&self) -> Result<()>;

    /// Wipe the enforcement store entirely.
    fn clear_all(&self) -> Result<()>;
}

/// Delivers start/end callbacks at scheduled wall-clock boundaries.
pub trait IntervalMonitor {
    /// Register `recurrence` under `name`. Re-registering an existing name
    /// replaces the prior registration.
    fn register(&self, name: &str, recurrence: &WeeklyRecurrence) -> Result<()>;

    /// Remove the registration under `name`. Absent names are not an error.
    fn unregister(&self, name: &str) -> Result<()>;

    /// Remove every registration.
    fn unregister_all(&self) -> Result<()>;
}

/// Cached premium-subscription flag.
pub trait Entitlement {
    fn is_premium(&self) -> bool;
}

/// What the enforcer has been told to do, as persisted in the shared store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnforcementSettings {
    pub enabled: bool,
    #[serde(default)]
    pub selection: Selection,
}

/// Enforcer that records commands in the shared state store, standing in for
/// the platform's shared shield-settings store.
pub struct SharedStoreEnforcer<'a> {
    store: &'a StateStore,
}

impl<'a> SharedStoreEnforcer<'a> {
    pub fn new(store: &'a StateStore) -> Self {
        Self { store }
    }

    /// Current recorded enforcement settings.
    pub fn settings(&self) -> Result<EnforcementSettings> {
        let raw = self.store.kv_get(keys::ENFORCEMENT).map_err(CoreError::from)?;
        match raw {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(EnforcementSettings::default()),
        }
    }

    fn write(&self, settings: &EnforcementSettings) -> Result<()> {
        let raw = serde_json::to_string(settings)?;
        self.store.kv_set(keys::ENFORCEMENT, &raw)?;
        Ok(())
    }
}

impl Enforcer for SharedStoreEnforcer<'_> {
    fn enable(&self, selection: &Selection) -> Result<()> {
        self.write(&EnforcementSettings {
            enabled: true,
            selection: selection.clone(),
        })
    }

    fn disable(&self) -> Result<()> {
        self.write(&EnforcementSettings::default())
    }

    fn clear_all(&self) -> Result<()> {
        self.store.kv_delete(keys::ENFORCEMENT)?;
        Ok(())
    }
}

/// Interval monitor that records registrations in the shared state store.
/// The host (cron, a test, the `monitor fire-*` commands) is responsible for
/// invoking the boundary callbacks at the registered wall-clock instants.
pub struct SharedStoreMonitor<'a> {
    store: &'a StateStore,
}

impl<'a> SharedStoreMonitor<'a> {
    pub fn new(store: &'a StateStore) -> Self {
        Self { store }
    }

    /// All current registrations by schedule name.
    pub fn registrations(&self) -> Result<BTreeMap<String, WeeklyRecurrence>> {
        let raw = self
            .store
            .kv_get(keys::REGISTRATIONS)
            .map_err(CoreError::from)?;
        match raw {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(BTreeMap::new()),
        }
    }

    fn write(&self, registrations: &BTreeMap<String, WeeklyRecurrence>) -> Result<()> {
        let raw = serde_json::to_string(registrations)?;
        self.store.kv_set(keys::REGISTRATIONS, &raw)?;
        Ok(())
    }
}

impl IntervalMonitor for SharedStoreMonitor<'_> {
    fn register(&self, name: &str, recurrence: &WeeklyRecurrence) -> Result<()> {
        // The platform rejects malformed schedules at registration time.
        recurrence
            .validate()
            .map_err(|e| CoreError::SchedulingFailed {
                cause: e.to_string(),
            })?;
        let mut registrations = self.registrations()?;
        registrations.insert(name.to_string(), *recurrence);
        self.write(&registrations)
    }

    fn unregister(&self, name: &str) -> Result<()> {
        let mut registrations = self.registrations()?;
        if registrations.remove(name).is_some() {
            self.write(&registrations)?;
        }
        Ok(())
    }

    fn unregister_all(&self) -> Result<()> {
        self.store.kv_delete(keys::REGISTRATIONS)?;
        Ok(())
    }
}

/// Entitlement flag cached in the shared store, written by the storefront
/// collaborator (out of scope here; the CLI exposes `premium set`).
pub struct CachedEntitlement<'a> {
    store: &'a StateStore,
}

impl<'a> CachedEntitlement<'a> {
    pub fn new(store: &'a StateStore) -> Self {
        Self { store }
    }
}

impl Entitlement for CachedEntitlement<'_> {
    fn is_premium(&self) -> bool {
        self.store.is_premium().unwrap_or(false)
    }
}
