//! Append-only store of completed events.
//!
//! Events are kept in append order; that order decides statistics
//! tie-breaks. [`Archive::newest_first`] gives the display ordering.

use chrono::NaiveDate;

use super::completed_event::CompletedEvent;
use super::event_id::EventId;
use super::history::HistoryEntry;
use super::statistics::EventStatistics;
use crate::error::TallyError;

/// Collection of finalized events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    events: Vec<CompletedEvent>,
}

impl Archive {
    /// Creates an empty archive.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps events previously loaded from storage, keeping their order.
    #[must_use]
    pub fn from_events(events: Vec<CompletedEvent>) -> Self {
        Self { events }
    }

    /// Events in append order.
    #[must_use]
    pub fn events(&self) -> &[CompletedEvent] {
        &self.events
    }

    /// Number of archived events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing has been archived.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns `true` if an event with `id` is archived.
    #[must_use]
    pub fn contains(&self, id: EventId) -> bool {
        self.events.iter().any(|e| e.id == id)
    }

    /// Looks up an event by id.
    #[must_use]
    pub fn get(&self, id: EventId) -> Option<&CompletedEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Events ordered newest first by date, then completion time.
    #[must_use]
    pub fn newest_first(&self) -> Vec<&CompletedEvent> {
        let mut sorted: Vec<&CompletedEvent> = self.events.iter().collect();
        sorted.sort_by(|a, b| {
            b.event_date
                .cmp(&a.event_date)
                .then(b.event_completed_at.cmp(&a.event_completed_at))
        });
        sorted
    }

    /// Appends an event. There is no deduplication by name or date; the
    /// event's generated id is its identity.
    pub fn append(&mut self, event: CompletedEvent) -> EventId {
        let id = event.id;
        self.events.push(event);
        id
    }

    /// Removes an event. Removing an unknown id is a no-op.
    ///
    /// Returns `true` if an event was removed.
    pub fn remove(&mut self, id: EventId) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        self.events.len() != before
    }

    /// Empties the archive.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Replaces an event's history, name and date and recomputes its
    /// counts (see [`CompletedEvent::apply_history_edit`]).
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::EventNotFound`] for an unknown id, or the
    /// validation error from the edit.
    pub fn edit_history(
        &mut self,
        id: EventId,
        history: Vec<HistoryEntry>,
        name: &str,
        date: NaiveDate,
    ) -> Result<&CompletedEvent, TallyError> {
        let event = self
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(TallyError::EventNotFound(id))?;
        event.apply_history_edit(history, name, date)?;
        Ok(&*event)
    }

    /// Computes aggregate statistics, keeping at most `top_n` drinks.
    #[must_use]
    pub fn statistics(&self, top_n: usize) -> EventStatistics {
        EventStatistics::compute(&self.events, top_n)
    }
}
