//! Domain events reflecting tally state mutations.
//!
//! Every state change emits a [`TallyEvent`] through the [`super::EventBus`].
//! Events are broadcast to WebSocket subscribers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::{BeverageId, EventId};

/// Domain event emitted after every state mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(
    tag = "eventType",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum TallyEvent {
    /// A beverage was made available or unavailable.
    AvailabilityToggled {
        /// Beverage identifier.
        beverage_id: BeverageId,
        /// New availability.
        available: bool,
        /// Time of the change.
        timestamp: DateTime<Utc>,
    },

    /// Servings were recorded.
    ServingAdded {
        /// Beverage identifier.
        beverage_id: BeverageId,
        /// Servings added.
        amount: u32,
        /// Beverage count after the change.
        count: u32,
        /// Live event total after the change.
        total_served: u64,
        /// Time of the change.
        timestamp: DateTime<Utc>,
    },

    /// The most recent serving of a beverage was undone.
    ServingUndone {
        /// Beverage identifier.
        beverage_id: BeverageId,
        /// Servings removed.
        amount: u32,
        /// Beverage count after the change.
        count: u32,
        /// Live event total after the change.
        total_served: u64,
        /// Time of the change.
        timestamp: DateTime<Utc>,
    },

    /// The live event's name or date changed.
    EventDetailsUpdated {
        /// New event name.
        name: String,
        /// New event date.
        date: NaiveDate,
        /// Time of the change.
        timestamp: DateTime<Utc>,
    },

    /// The live event was archived and a fresh one started.
    EventFinalized {
        /// Archive id of the completed event.
        event_id: EventId,
        /// Name of the completed event.
        event_name: String,
        /// Servings in the completed event.
        total_served: u64,
        /// Completion time.
        timestamp: DateTime<Utc>,
    },

    /// The live event was discarded without archiving.
    EventReset {
        /// Time of the reset.
        timestamp: DateTime<Utc>,
    },

    /// The archive changed through delete, clear, edit or import.
    ArchiveUpdated {
        /// Number of archived events after the change.
        total_events: usize,
        /// Time of the change.
        timestamp: DateTime<Utc>,
    },
}

impl TallyEvent {
    /// Returns the beverage this event concerns, if any.
    ///
    /// Event-level notifications return `None` and reach every subscriber.
    #[must_use]
    pub fn beverage_id(&self) -> Option<&BeverageId> {
        match self {
            Self::AvailabilityToggled { beverage_id, .. }
            | Self::ServingAdded { beverage_id, .. }
            | Self::ServingUndone { beverage_id, .. } => Some(beverage_id),
            Self::EventDetailsUpdated { .. }
            | Self::EventFinalized { .. }
            | Self::EventReset { .. }
            | Self::ArchiveUpdated { .. } => None,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::AvailabilityToggled { .. } => "availability_toggled",
            Self::ServingAdded { .. } => "serving_added",
            Self::ServingUndone { .. } => "serving_undone",
            Self::EventDetailsUpdated { .. } => "event_details_updated",
            Self::EventFinalized { .. } => "event_finalized",
            Self::EventReset { .. } => "event_reset",
            Self::ArchiveUpdated { .. } => "archive_updated",
        }
    }
}
