//! The Sabbath mode state machine.
//!
//! `SabbathManager` owns no long-lived in-memory state. The UI-facing process
//! and the interval-monitor process share only the persisted store, so every
//! operation re-reads from it on entry and writes back before returning.
//! Collaborators are injected at construction; there are no globals.
//!
//! ## State
//!
//! The store records only the enforcement fact (active / not active). The
//! user-visible state is derived in [`SabbathManager::current_state`] from
//! that fact plus the auto-mode flag and the schedule window, so "scheduled
//! between occurrences" can never drift out of sync with the flag that
//! produces it.

use chrono::{Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CoreError, Result, StorageError};
use crate::events::Event;
use crate::platform::{Enforcer, Entitlement, IntervalMonitor};
use crate::storage::{ModeConfig, StateStore};
use crate::schedule::WeeklyRecurrence;
use crate::selection::Selection;

/// Fixed schedule name registered with the interval monitor. Using one
/// well-known name makes re-registration replace rather than accumulate.
pub const SCHEDULE_NAME: &str = "SabbathMode";

/// User-visible Sabbath mode state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SabbathState {
    Inactive,
    Active,
    Scheduled,
}

impl SabbathState {
    pub fn raw(self) -> &'static str {
        match self {
            SabbathState::Inactive => "inactive",
            SabbathState::Active => "active",
            SabbathState::Scheduled => "scheduled",
        }
    }

    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "inactive" => Some(SabbathState::Inactive),
            "active" => Some(SabbathState::Active),
            "scheduled" => Some(SabbathState::Scheduled),
            _ => None,
        }
    }
}

impl std::fmt::Display for SabbathState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.raw())
    }
}

/// Central manager for Sabbath mode state and transitions.
pub struct SabbathManager<'a> {
    store: &'a StateStore,
    enforcer: &'a dyn Enforcer,
    monitor: &'a dyn IntervalMonitor,
    entitlement: &'a dyn Entitlement,
}

impl<'a> SabbathManager<'a> {
    pub fn new(
        store: &'a StateStore,
        enforcer: &'a dyn Enforcer,
        monitor: &'a dyn IntervalMonitor,
        entitlement: &'a dyn Entitlement,
    ) -> Self {
        Self {
            store,
            enforcer,
            monitor,
            entitlement,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Derived state at `now` (wall clock in the calendar timezone).
    pub fn current_state(&self, now: NaiveDateTime) -> SabbathState {
        if self.load_or("state", self.store.state(), SabbathState::Inactive)
            == SabbathState::Active
        {
            return SabbathState::Active;
        }
        if self.load_or("auto_mode", self.store.auto_mode_enabled(), false) {
            let recurrence = self.recurrence();
            if recurrence.is_within(now) {
                // The window is open but the start callback has not landed
                // (or was missed). Intent wins over delivery.
                return SabbathState::Active;
            }
            return SabbathState::Scheduled;
        }
        SabbathState::Inactive
    }

    pub fn is_active(&self, now: NaiveDateTime) -> bool {
        self.current_state(now) == SabbathState::Active
    }

    pub fn recurrence(&self) -> WeeklyRecurrence {
        self.load_or(
            "recurrence",
            self.store.recurrence(),
            WeeklyRecurrence::default(),
        )
    }

    pub fn selection(&self) -> Selection {
        self.load_or("selection", self.store.selection(), Selection::default())
    }

    pub fn auto_mode_enabled(&self) -> bool {
        self.load_or("auto_mode", self.store.auto_mode_enabled(), false)
    }

    /// Full status snapshot for display.
    pub fn status(&self, now: NaiveDateTime) -> Event {
        let recurrence = self.recurrence();
        Event::StateSnapshot {
            state: self.current_state(now),
            auto_mode_enabled: self.auto_mode_enabled(),
            activated_at: self.load_or("activated_at", self.store.activated_at(), None),
            next_start: boundary_or_warn("next_start", recurrence.next_start(now)),
            next_end: boundary_or_warn("next_end", recurrence.next_end(now)),
            selection_summary: self.selection().summary(),
            at: Utc::now(),
        }
    }

    // ── Manual mode (free tier) ──────────────────────────────────────

    /// Activate Sabbath mode now. No-op when already active.
    ///
    /// The state transition is committed before the enforcer call, so an
    /// enforcement failure leaves the user-visible state reflecting intent.
    pub fn activate_manual(&self) -> Result<Option<Event>> {
        if self.load_or("state", self.store.state(), SabbathState::Inactive)
            == SabbathState::Active
        {
            return Ok(None);
        }
        self.best_effort("state", self.store.set_state(SabbathState::Active));
        self.best_effort(
            "activated_at",
            self.store.set_activated_at(Some(Utc::now())),
        );
        let selection = self.selection();
        self.enforcer.enable(&selection)?;
        Ok(Some(Event::SabbathActivated {
            manual: true,
            selection_summary: selection.summary(),
            at: Utc::now(),
        }))
    }

    /// Deactivate Sabbath mode. Idempotent.
    pub fn deactivate_manual(&self) -> Result<Option<Event>> {
        self.best_effort("state", self.store.set_state(SabbathState::Inactive));
        self.best_effort("activated_at", self.store.set_activated_at(None));
        self.enforcer.disable()?;
        Ok(Some(Event::SabbathDeactivated {
            manual: true,
            at: Utc::now(),
        }))
    }

    // ── Automatic mode (premium) ─────────────────────────────────────

    /// Register the configured recurrence with the interval monitor.
    ///
    /// Fails with [`CoreError::EntitlementRequired`] without premium and with
    /// [`CoreError::SchedulingFailed`] if the monitor rejects the schedule;
    /// in both cases prior state is untouched.
    pub fn enable_auto_mode(&self) -> Result<Event> {
        if !self.entitlement.is_premium() {
            return Err(CoreError::EntitlementRequired);
        }
        let recurrence = self.recurrence();
        self.monitor
            .register(SCHEDULE_NAME, &recurrence)
            .map_err(|e| match e {
                CoreError::SchedulingFailed { .. } => e,
                other => CoreError::SchedulingFailed {
                    cause: other.to_string(),
                },
            })?;
        self.best_effort("auto_mode", self.store.set_auto_mode_enabled(true));
        Ok(Event::AutoModeEnabled {
            schedule_name: SCHEDULE_NAME.to_string(),
            next_start: recurrence.next_start(Local::now().naive_local())?,
            at: Utc::now(),
        })
    }

    /// Unregister the schedule and drop the auto-mode flag. Idempotent.
    pub fn disable_auto_mode(&self) -> Result<Event> {
        self.monitor.unregister(SCHEDULE_NAME)?;
        self.best_effort("auto_mode", self.store.set_auto_mode_enabled(false));
        Ok(Event::AutoModeDisabled { at: Utc::now() })
    }

    // ── Configuration ────────────────────────────────────────────────

    /// Replace the recurrence wholesale. Re-registers with the monitor when
    /// auto mode is on; re-registration errors are surfaced, not swallowed.
    pub fn update_recurrence(&self, new: WeeklyRecurrence) -> Result<Event> {
        new.validate()?;
        self.best_effort("recurrence", self.store.set_recurrence(&new));
        let mut re_registered = false;
        if self.auto_mode_enabled() {
            self.enable_auto_mode()?;
            re_registered = true;
        }
        Ok(Event::RecurrenceUpdated {
            re_registered,
            at: Utc::now(),
        })
    }

    /// Replace the blocked-target selection. When a window is currently open
    /// the enforcer is refreshed so the change takes effect immediately.
    pub fn update_selection(&self, new: Selection) -> Result<Event> {
        self.best_effort("selection", self.store.set_selection(&new));
        let mut reapplied = false;
        if self.is_active(Local::now().naive_local()) {
            self.enforcer.enable(&new)?;
            reapplied = true;
        }
        Ok(Event::SelectionUpdated {
            selection_summary: new.summary(),
            reapplied,
            at: Utc::now(),
        })
    }

    /// Persist the shield configuration file.
    pub fn update_config(&self, config: &ModeConfig) -> Result<()> {
        config.save()
    }

    // ── Boundary callbacks (invoked by the host scheduler) ───────────

    /// The monitor fired the start boundary for `name`.
    pub fn on_interval_start(&self, name: &str) -> Result<Event> {
        self.check_schedule_name(name)?;
        self.best_effort("state", self.store.set_state(SabbathState::Active));
        self.best_effort(
            "activated_at",
            self.store.set_activated_at(Some(Utc::now())),
        );
        let selection = self.selection();
        self.enforcer.enable(&selection)?;
        Ok(Event::SabbathActivated {
            manual: false,
            selection_summary: selection.summary(),
            at: Utc::now(),
        })
    }

    /// The monitor fired the end boundary for `name`. The auto-mode flag is
    /// left alone, so the derived state returns to `scheduled` until the
    /// next occurrence.
    pub fn on_interval_end(&self, name: &str) -> Result<Event> {
        self.check_schedule_name(name)?;
        self.best_effort("state", self.store.set_state(SabbathState::Inactive));
        self.best_effort("activated_at", self.store.set_activated_at(None));
        self.enforcer.disable()?;
        Ok(Event::SabbathDeactivated {
            manual: false,
            at: Utc::now(),
        })
    }

    fn check_schedule_name(&self, name: &str) -> Result<()> {
        if name == SCHEDULE_NAME {
            Ok(())
        } else {
            Err(CoreError::UnknownSchedule {
                name: name.to_string(),
            })
        }
    }

    // ── Reset ────────────────────────────────────────────────────────

    /// Return everything to defaults: stored state, enforcement, monitor
    /// registrations.
    pub fn reset(&self) -> Result<Event> {
        self.store.reset()?;
        self.enforcer.clear_all()?;
        self.monitor.unregister_all()?;
        Ok(Event::Reset { at: Utc::now() })
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Storage reads fall back to defaults; the store is best-effort and the
    /// next successful persist reconciles.
    fn load_or<T>(&self, key: &str, result: Result<T, StorageError>, default: T) -> T {
        match result {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "state store read failed, using default");
                default
            }
        }
    }

    /// Storage writes are logged and dropped on failure (last write wins).
    fn best_effort(&self, key: &str, result: Result<(), StorageError>) {
        if let Err(e) = result {
            warn!(key, error = %e, "state store write failed, continuing");
        }
    }
}

/// Boundary lookup failures are internal errors; in a display snapshot they
/// are logged rather than propagated, never dropped silently.
fn boundary_or_warn(which: &str, result: Result<NaiveDateTime>) -> Option<NaiveDateTime> {
    match result {
        Ok(at) => Some(at),
        Err(e) => {
            warn!(which, error = %e, "boundary computation failed");
            None
        }
    }
}
