//! # SabbathLock Core Library
//!
//! Core business logic for SabbathLock, a recurring weekly "Sabbath" window
//! during which selected apps, categories, and websites are blocked. The CLI
//! binary is a thin layer over this library; a GUI would sit on the same API.
//!
//! ## Architecture
//!
//! - **Schedule calculator**: pure weekly-window math (`is_within`,
//!   `next_start`, `next_end`) over a [`WeeklyRecurrence`]
//! - **State machine**: [`SabbathManager`] drives manual and automatic mode
//!   through injected collaborator traits, with the persisted store as the
//!   single cross-process source of truth
//! - **Storage**: SQLite key-value state store and TOML shield configuration
//! - **Platform seams**: [`Enforcer`], [`IntervalMonitor`] and
//!   [`Entitlement`] traits for the facilities the OS owns
//!
//! Enforcement, boundary timers, and the storefront are external: the core
//! issues commands and receives callbacks, nothing more.

pub mod error;
pub mod events;
pub mod platform;
pub mod sabbath;
pub mod schedule;
pub mod selection;
pub mod storage;

pub use error::{CoreError, Result, StorageError};
pub use events::Event;
pub use platform::{
    CachedEntitlement, Enforcer, Entitlement, IntervalMonitor, SharedStoreEnforcer,
    SharedStoreMonitor,
};
pub use sabbath::{SabbathManager, SabbathState, SCHEDULE_NAME};
pub use schedule::{BoundaryKind, Weekday, WeeklyRecurrence};
pub use selection::{Selection, TargetKind};
pub use storage::{ModeConfig, StateStore};
