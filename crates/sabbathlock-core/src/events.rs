use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sabbath::SabbathState;

/// Every state-machine operation produces an Event.
/// The CLI prints them; a GUI layer would subscribe to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SabbathActivated {
        manual: bool,
        selection_summary: String,
        at: DateTime<Utc>,
    },
    SabbathDeactivated {
        manual: bool,
        at: DateTime<Utc>,
    },
    AutoModeEnabled {
        schedule_name: String,
        next_start: NaiveDateTime,
        at: DateTime<Utc>,
    },
    AutoModeDisabled {
        at: DateTime<Utc>,
    },
    RecurrenceUpdated {
        re_registered: bool,
        at: DateTime<Utc>,
    },
    SelectionUpdated {
        selection_summary: String,
        /// True if the enforcer was refreshed because a window is open.
        reapplied: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: SabbathState,
        auto_mode_enabled: bool,
        activated_at: Option<DateTime<Utc>>,
        next_start: Option<NaiveDateTime>,
        next_end: Option<NaiveDateTime>,
        selection_summary: String,
        at: DateTime<Utc>,
    },
    Reset {
        at: DateTime<Utc>,
    },
}
