//! Tally service: serializes state transitions, persists and emits events.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::Mutex;

use super::clock;
use super::export::{self, ExportDocument};
use crate::auth::CredentialCheck;
use crate::domain::{
    Archive, Beverage, BeverageId, CompletedEvent, EventBus, EventId,
    EventStatistics, HistoryEntry, LiveEvent, TallyEvent,
};
use crate::error::TallyError;
use crate::persistence::StatePersistence;

/// The live event and the archive, guarded together.
#[derive(Debug)]
struct TallyState {
    live: LiveEvent,
    archive: Archive,
}

/// Explicit confirmation required to discard the live event.
#[derive(Debug, Clone, Default)]
pub struct ResetConfirmation {
    /// First acknowledgement ("I understand the data is lost").
    pub acknowledged: bool,
    /// Second acknowledgement ("really reset").
    pub confirmed: bool,
    /// Shared secret, checked through the credential interface.
    pub password: String,
}

/// Outcome of an archive import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Events added to the archive.
    pub imported: usize,
    /// Events skipped because their id was already archived.
    pub skipped: usize,
    /// Archive size after the import.
    pub total_events: usize,
}

/// Orchestration layer for every tally operation.
///
/// All mutations run under one mutex, in call order. Each mutation method
/// follows the pattern: lock → transition → save → drop lock → emit event
/// → log. Save failures are logged and never fail the operation.
#[derive(Debug, Clone)]
pub struct TallyService {
    state: Arc<Mutex<TallyState>>,
    persistence: StatePersistence,
    event_bus: EventBus,
    credentials: Arc<dyn CredentialCheck>,
    top_n: usize,
}

impl TallyService {
    /// Creates a service from whatever `persistence` holds, falling back to
    /// a fresh event and an empty archive.
    #[must_use]
    pub fn load(
        persistence: StatePersistence,
        event_bus: EventBus,
        credentials: Arc<dyn CredentialCheck>,
        top_n: usize,
    ) -> Self {
        let live = persistence.load_live().unwrap_or_else(|| {
            tracing::info!("no stored live event, starting from catalog");
            LiveEvent::new(clock::now())
        });
        let archive = persistence.load_archive().unwrap_or_default();
        tracing::info!(
            total_served = live.total_served(),
            archived_events = archive.len(),
            "tally state loaded"
        );

        Self {
            state: Arc::new(Mutex::new(TallyState { live, archive })),
            persistence,
            event_bus,
            credentials,
            top_n,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a copy of the live event.
    pub async fn live_event(&self) -> LiveEvent {
        self.state.lock().await.live.clone()
    }

    /// Flips a beverage's availability.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::BeverageNotFound`] for an unknown id.
    pub async fn toggle_availability(&self, id: &BeverageId) -> Result<Beverage, TallyError> {
        let now = clock::now();
        let mut state = self.state.lock().await;
        let beverage = state.live.toggle_availability(id)?.clone();
        self.save_live(&state, now);
        drop(state);

        let _ = self.event_bus.publish(TallyEvent::AvailabilityToggled {
            beverage_id: beverage.id.clone(),
            available: beverage.available,
            timestamp: now,
        });

        tracing::info!(beverage = %beverage.id, available = beverage.available, "availability toggled");
        Ok(beverage)
    }

    /// Records `amount` servings of a beverage.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::InvalidRequest`] if `amount` is not positive or
    /// out of range, and [`TallyError::BeverageNotFound`] for an unknown id.
    pub async fn add_serving(&self, id: &BeverageId, amount: i64) -> Result<Beverage, TallyError> {
        let amount = u32::try_from(amount)
            .ok()
            .filter(|a| *a > 0)
            .ok_or_else(|| {
                TallyError::InvalidRequest(format!("serving amount must be positive, got {amount}"))
            })?;

        let now = clock::now();
        let mut state = self.state.lock().await;
        let beverage = state.live.add_serving(id, amount, now)?.clone();
        let total_served = state.live.total_served();
        self.save_live(&state, now);
        drop(state);

        let _ = self.event_bus.publish(TallyEvent::ServingAdded {
            beverage_id: beverage.id.clone(),
            amount,
            count: beverage.count,
            total_served,
            timestamp: now,
        });

        tracing::info!(beverage = %beverage.id, amount, count = beverage.count, "serving added");
        Ok(beverage)
    }

    /// Reverts the most recent serving of a beverage.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::NothingToUndo`] when the undo slot is empty and
    /// [`TallyError::BeverageNotFound`] for an unknown id.
    pub async fn undo_last_serving(&self, id: &BeverageId) -> Result<Beverage, TallyError> {
        let now = clock::now();
        let mut state = self.state.lock().await;
        let before = state.live.beverage(id).map(|b| b.count);
        let beverage = state.live.undo_last_serving(id, now)?.clone();
        let amount = before.unwrap_or(0).saturating_sub(beverage.count);
        let total_served = state.live.total_served();
        self.save_live(&state, now);
        drop(state);

        let _ = self.event_bus.publish(TallyEvent::ServingUndone {
            beverage_id: beverage.id.clone(),
            amount,
            count: beverage.count,
            total_served,
            timestamp: now,
        });

        tracing::info!(beverage = %beverage.id, amount, count = beverage.count, "serving undone");
        Ok(beverage)
    }

    /// Sets the live event's name and, if given, its date.
    pub async fn update_details(&self, name: &str, date: Option<NaiveDate>) -> LiveEvent {
        let now = clock::now();
        let mut state = self.state.lock().await;
        let date = date.unwrap_or_else(|| state.live.date());
        state.live.set_details(name, date);
        let live = state.live.clone();
        self.save_live(&state, now);
        drop(state);

        let _ = self.event_bus.publish(TallyEvent::EventDetailsUpdated {
            name: live.name().to_string(),
            date: live.date(),
            timestamp: now,
        });

        tracing::info!(name = live.name(), %date, "event details updated");
        live
    }

    /// Archives the live event and starts a fresh one.
    ///
    /// `name` and `date` default to the live event's details.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::InvalidRequest`] for a blank name and
    /// [`TallyError::NothingServed`] when nothing was served. State is
    /// unchanged on error.
    pub async fn finalize_event(
        &self,
        name: Option<&str>,
        date: Option<NaiveDate>,
    ) -> Result<CompletedEvent, TallyError> {
        let now = clock::now();
        let mut state = self.state.lock().await;
        let name = name.map_or_else(|| state.live.name().to_string(), str::to_string);
        let date = date.unwrap_or_else(|| state.live.date());

        let completed = state.live.finalize(&name, date, now)?;
        state.archive.append(completed.clone());
        let total_events = state.archive.len();
        self.save_archive(&state, now);
        self.save_live(&state, now);
        drop(state);

        let _ = self.event_bus.publish(TallyEvent::EventFinalized {
            event_id: completed.id,
            event_name: completed.event_name.clone(),
            total_served: completed.total_served,
            timestamp: now,
        });
        let _ = self.event_bus.publish(TallyEvent::ArchiveUpdated {
            total_events,
            timestamp: now,
        });

        tracing::info!(
            event_id = %completed.id,
            name = %completed.event_name,
            total_served = completed.total_served,
            duration = %completed.duration_label(),
            "event finalized"
        );
        Ok(completed)
    }

    /// Discards the live event without archiving it.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::InvalidRequest`] unless both acknowledgements
    /// are given, and [`TallyError::Unauthorized`] if the password is
    /// rejected.
    pub async fn reset_event(&self, confirmation: &ResetConfirmation) -> Result<LiveEvent, TallyError> {
        if !(confirmation.acknowledged && confirmation.confirmed) {
            return Err(TallyError::InvalidRequest(
                "reset requires both acknowledgements".to_string(),
            ));
        }
        if !self.credentials.verify(&confirmation.password) {
            tracing::warn!("reset rejected: wrong password");
            return Err(TallyError::Unauthorized);
        }

        let now = clock::now();
        let mut state = self.state.lock().await;
        let discarded = state.live.total_served();
        state.live.reset(now);
        let live = state.live.clone();
        self.save_live(&state, now);
        drop(state);

        let _ = self.event_bus.publish(TallyEvent::EventReset { timestamp: now });

        tracing::info!(discarded, "event reset");
        Ok(live)
    }

    /// Archived events, newest first.
    pub async fn list_events(&self) -> Vec<CompletedEvent> {
        let state = self.state.lock().await;
        state.archive.newest_first().into_iter().cloned().collect()
    }

    /// Looks up an archived event.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::EventNotFound`] for an unknown id.
    pub async fn get_event(&self, id: EventId) -> Result<CompletedEvent, TallyError> {
        let state = self.state.lock().await;
        state
            .archive
            .get(id)
            .cloned()
            .ok_or(TallyError::EventNotFound(id))
    }

    /// Deletes an archived event. Deleting an unknown id is a no-op.
    ///
    /// Returns `true` if an event was removed.
    pub async fn delete_event(&self, id: EventId) -> bool {
        let now = clock::now();
        let mut state = self.state.lock().await;
        if !state.archive.remove(id) {
            tracing::debug!(event_id = %id, "delete of unknown event ignored");
            return false;
        }
        let total_events = state.archive.len();
        self.save_archive(&state, now);
        drop(state);

        self.publish_archive_updated(total_events, now);
        tracing::info!(event_id = %id, "archived event deleted");
        true
    }

    /// Empties the archive. Returns the number of removed events.
    pub async fn clear_archive(&self) -> usize {
        let now = clock::now();
        let mut state = self.state.lock().await;
        let removed = state.archive.len();
        state.archive.clear();
        self.save_archive(&state, now);
        drop(state);

        self.publish_archive_updated(0, now);
        tracing::info!(removed, "archive cleared");
        removed
    }

    /// Replaces an archived event's history, name and date and recomputes
    /// its counts.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::EventNotFound`] for an unknown id and
    /// [`TallyError::InvalidRequest`] for a blank name or zero amounts.
    pub async fn edit_event(
        &self,
        id: EventId,
        history: Vec<HistoryEntry>,
        name: &str,
        date: NaiveDate,
    ) -> Result<CompletedEvent, TallyError> {
        let now = clock::now();
        let mut state = self.state.lock().await;
        let edited = state.archive.edit_history(id, history, name, date)?.clone();
        let total_events = state.archive.len();
        self.save_archive(&state, now);
        drop(state);

        self.publish_archive_updated(total_events, now);
        tracing::info!(event_id = %id, total_served = edited.total_served, "archived event edited");
        Ok(edited)
    }

    /// Aggregate statistics over the archive.
    pub async fn statistics(&self) -> EventStatistics {
        self.state.lock().await.archive.statistics(self.top_n)
    }

    /// Builds a full archive export.
    pub async fn export(&self) -> ExportDocument {
        let state = self.state.lock().await;
        ExportDocument::build(&state.archive, self.top_n, clock::now())
    }

    /// Merges an export document into the archive. Events whose id is
    /// already archived are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::ImportRejected`] if the document cannot be
    /// parsed; the archive is untouched in that case.
    pub async fn import(&self, raw: &str) -> Result<ImportSummary, TallyError> {
        let events = export::parse_import(raw)?;

        let now = clock::now();
        let mut state = self.state.lock().await;
        let mut imported = 0;
        let mut skipped = 0;
        for event in events {
            if state.archive.contains(event.id) {
                skipped += 1;
            } else {
                state.archive.append(event);
                imported += 1;
            }
        }
        let total_events = state.archive.len();
        if imported > 0 {
            self.save_archive(&state, now);
        }
        drop(state);

        if imported > 0 {
            self.publish_archive_updated(total_events, now);
        }
        tracing::info!(imported, skipped, total_events, "archive import");
        Ok(ImportSummary {
            imported,
            skipped,
            total_events,
        })
    }

    /// Writes the live event and the archive now.
    pub async fn save_now(&self) {
        let now = clock::now();
        let state = self.state.lock().await;
        self.save_live(&state, now);
        self.save_archive(&state, now);
        tracing::debug!("state saved");
    }

    fn save_live(&self, state: &TallyState, now: DateTime<Utc>) {
        if let Err(e) = self.persistence.save_live(&state.live, now) {
            tracing::warn!(error = %e, "failed to save live event");
        }
    }

    fn save_archive(&self, state: &TallyState, now: DateTime<Utc>) {
        if let Err(e) = self.persistence.save_archive(&state.archive, now) {
            tracing::warn!(error = %e, "failed to save archive");
        }
    }

    fn publish_archive_updated(&self, total_events: usize, now: DateTime<Utc>) {
        let _ = self.event_bus.publish(TallyEvent::ArchiveUpdated {
            total_events,
            timestamp: now,
        });
    }
}
