//! The live event: per-beverage counters, the one-slot undo buffer and the
//! serving history.
//!
//! [`LiveEvent`] is a plain state machine. Every transition takes the
//! current time as an argument so callers (and tests) control the clock.
//! Locking and persistence are the service layer's concern.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use super::beverage::{Beverage, BeverageId};
use super::catalog;
use super::completed_event::{BeverageSnapshot, CompletedEvent};
use super::event_id::EventId;
use super::history::{HistoryEntry, HistoryEntryType};
use crate::error::TallyError;

/// Display filter over the live beverage list. Has no effect on tallies.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BeverageFilter {
    /// Only beverages of this category.
    #[serde(default)]
    pub category: Option<String>,
    /// Only beverages bartenders may serve.
    #[serde(default)]
    pub available_only: bool,
}

impl BeverageFilter {
    /// Returns `true` if `beverage` passes the filter.
    #[must_use]
    pub fn matches(&self, beverage: &Beverage) -> bool {
        if self.available_only && !beverage.available {
            return false;
        }
        self.category
            .as_deref()
            .is_none_or(|category| beverage.category == category)
    }
}

/// The single active event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveEvent {
    name: String,
    date: NaiveDate,
    started_at: DateTime<Utc>,
    beverages: Vec<Beverage>,
    history: Vec<HistoryEntry>,
}

impl LiveEvent {
    /// Starts a fresh event from the static catalog.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_beverages(catalog::fresh_beverages(), now)
    }

    /// Starts a fresh event over an explicit beverage list.
    #[must_use]
    pub fn with_beverages(beverages: Vec<Beverage>, now: DateTime<Utc>) -> Self {
        Self {
            name: String::new(),
            date: now.date_naive(),
            started_at: now,
            beverages,
            history: Vec::new(),
        }
    }

    /// Rebuilds an event from previously persisted parts.
    #[must_use]
    pub fn from_parts(
        name: String,
        date: NaiveDate,
        started_at: DateTime<Utc>,
        beverages: Vec<Beverage>,
        history: Vec<HistoryEntry>,
    ) -> Self {
        Self {
            name,
            date,
            started_at,
            beverages,
            history,
        }
    }

    /// Event name as set by the admin (may be empty until finalization).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Event date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// When this event started.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// All beverages, in catalog order.
    #[must_use]
    pub fn beverages(&self) -> &[Beverage] {
        &self.beverages
    }

    /// Serving history, oldest first.
    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Looks up a beverage by id.
    #[must_use]
    pub fn beverage(&self, id: &BeverageId) -> Option<&Beverage> {
        self.beverages.iter().find(|b| &b.id == id)
    }

    /// Beverages passing `filter`, in catalog order.
    pub fn filtered<'a>(&'a self, filter: &'a BeverageFilter) -> impl Iterator<Item = &'a Beverage> {
        self.beverages.iter().filter(move |b| filter.matches(b))
    }

    /// Sum of all counts, including beverages that are no longer available.
    #[must_use]
    pub fn total_served(&self) -> u64 {
        self.beverages.iter().map(|b| u64::from(b.count)).sum()
    }

    /// Sets the event name and date. The name is trimmed; blank names are
    /// allowed here and rejected at finalization.
    pub fn set_details(&mut self, name: &str, date: NaiveDate) {
        self.name = name.trim().to_string();
        self.date = date;
    }

    /// Flips a beverage's availability. Its count is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::BeverageNotFound`] for an unknown id.
    pub fn toggle_availability(&mut self, id: &BeverageId) -> Result<&Beverage, TallyError> {
        let bev = find_mut(&mut self.beverages, id)?;
        bev.available = !bev.available;
        Ok(&*bev)
    }

    /// Records `amount` servings of a beverage and fills its undo slot.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::InvalidRequest`] if `amount` is zero or the
    /// count would overflow, and [`TallyError::BeverageNotFound`] for an
    /// unknown id. Nothing is mutated on error.
    pub fn add_serving(
        &mut self,
        id: &BeverageId,
        amount: u32,
        now: DateTime<Utc>,
    ) -> Result<&Beverage, TallyError> {
        if amount == 0 {
            return Err(TallyError::InvalidRequest(
                "serving amount must be positive".to_string(),
            ));
        }
        let bev = find_mut(&mut self.beverages, id)?;
        let count = bev
            .count
            .checked_add(amount)
            .ok_or_else(|| TallyError::InvalidRequest(format!("count overflow for {id}")))?;

        bev.count = count;
        bev.last_increment = Some(now);
        bev.last_increment_amount = Some(amount);
        self.history
            .push(HistoryEntry::for_beverage(bev, HistoryEntryType::Add, amount, now));
        Ok(&*bev)
    }

    /// Reverts the most recent serving of a beverage and empties its undo
    /// slot. Only one level of undo exists.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::NothingToUndo`] if the undo slot is empty or
    /// the count is zero, and [`TallyError::BeverageNotFound`] for an
    /// unknown id.
    pub fn undo_last_serving(
        &mut self,
        id: &BeverageId,
        now: DateTime<Utc>,
    ) -> Result<&Beverage, TallyError> {
        let bev = find_mut(&mut self.beverages, id)?;
        let amount = match bev.last_increment_amount {
            Some(amount) if bev.can_undo() => amount,
            _ => return Err(TallyError::NothingToUndo(id.clone())),
        };

        bev.count = bev.count.saturating_sub(amount);
        bev.clear_undo_slot();
        self.history
            .push(HistoryEntry::for_beverage(bev, HistoryEntryType::Undo, amount, now));
        Ok(&*bev)
    }

    /// Closes the event: returns the archive snapshot and replaces the live
    /// state with a fresh event started at `now`.
    ///
    /// The snapshot holds every beverage with a non-zero count, available
    /// or not, without transient fields, plus the full history.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::InvalidRequest`] for a blank name and
    /// [`TallyError::NothingServed`] when nothing was served. The live
    /// state is unchanged on error.
    pub fn finalize(
        &mut self,
        name: &str,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<CompletedEvent, TallyError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TallyError::InvalidRequest(
                "event name must not be empty".to_string(),
            ));
        }
        let total_served = self.total_served();
        if total_served == 0 {
            return Err(TallyError::NothingServed);
        }

        let completed = CompletedEvent {
            id: EventId::new(),
            event_name: name.to_string(),
            event_date: date,
            event_started_at: self.started_at,
            event_completed_at: now,
            total_served,
            beverages: self
                .beverages
                .iter()
                .filter(|b| b.count > 0)
                .map(BeverageSnapshot::from)
                .collect(),
            history: std::mem::take(&mut self.history),
        };

        self.reset(now);
        Ok(completed)
    }

    /// Discards the event without archiving: zero counts, nothing
    /// available, empty history, blank name, started at `now`.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        for bev in &mut self.beverages {
            bev.clear();
        }
        self.history.clear();
        self.name.clear();
        self.date = now.date_naive();
        self.started_at = now;
    }
}

fn find_mut<'a>(
    beverages: &'a mut [Beverage],
    id: &BeverageId,
) -> Result<&'a mut Beverage, TallyError> {
    beverages
        .iter_mut()
        .find(|b| &b.id == id)
        .ok_or_else(|| TallyError::BeverageNotFound(id.clone()))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn plain(id: &str) -> Beverage {
        Beverage {
            id: BeverageId::new(id),
            name: id.to_string(),
            icon: "🥤".to_string(),
            color: "#000000".to_string(),
            category: "test".to_string(),
            available: false,
            count: 0,
            last_increment: None,
            last_increment_amount: None,
        }
    }

    fn water_and_coffee() -> LiveEvent {
        LiveEvent::with_beverages(vec![plain("water"), plain("coffee")], Utc::now())
    }

    fn count(event: &LiveEvent, id: &str) -> u32 {
        event.beverage(&BeverageId::new(id)).map_or(0, |b| b.count)
    }

    #[test]
    fn add_add_undo_scenario() {
        let mut ev = water_and_coffee();
        let water = BeverageId::new("water");
        let now = Utc::now();

        let Ok(bev) = ev.add_serving(&water, 3, now) else {
            panic!("first serving rejected");
        };
        assert_eq!(bev.count, 3);
        assert_eq!(bev.last_increment_amount, Some(3));

        let Ok(bev) = ev.add_serving(&water, 2, now) else {
            panic!("second serving rejected");
        };
        assert_eq!(bev.count, 5);
        assert_eq!(bev.last_increment_amount, Some(2));

        let Ok(bev) = ev.undo_last_serving(&water, now) else {
            panic!("undo rejected");
        };
        assert_eq!(bev.count, 3);
        assert!(bev.last_increment.is_none());
        assert!(bev.last_increment_amount.is_none());
        assert_eq!(count(&ev, "coffee"), 0);
    }

    #[test]
    fn second_undo_is_rejected_without_mutation() {
        let mut ev = water_and_coffee();
        let water = BeverageId::new("water");
        let now = Utc::now();
        let _ = ev.add_serving(&water, 4, now);
        assert!(ev.undo_last_serving(&water, now).is_ok());

        let before = ev.clone();
        let result = ev.undo_last_serving(&water, now);
        assert!(matches!(result, Err(TallyError::NothingToUndo(_))));
        assert_eq!(ev, before);
    }

    #[test]
    fn undo_without_serving_is_rejected() {
        let mut ev = water_and_coffee();
        let result = ev.undo_last_serving(&BeverageId::new("coffee"), Utc::now());
        assert!(matches!(result, Err(TallyError::NothingToUndo(_))));
        assert!(ev.history().is_empty());
    }

    #[test]
    fn zero_amount_is_rejected_without_mutation() {
        let mut ev = water_and_coffee();
        let before = ev.clone();
        let result = ev.add_serving(&BeverageId::new("water"), 0, Utc::now());
        assert!(matches!(result, Err(TallyError::InvalidRequest(_))));
        assert_eq!(ev, before);
    }

    #[test]
    fn count_overflow_is_rejected() {
        let mut ev = water_and_coffee();
        let water = BeverageId::new("water");
        let _ = ev.add_serving(&water, u32::MAX, Utc::now());
        let result = ev.add_serving(&water, 1, Utc::now());
        assert!(matches!(result, Err(TallyError::InvalidRequest(_))));
        assert_eq!(count(&ev, "water"), u32::MAX);
    }

    #[test]
    fn unknown_beverage_is_not_found() {
        let mut ev = water_and_coffee();
        let tea = BeverageId::new("tea");
        assert!(matches!(
            ev.toggle_availability(&tea),
            Err(TallyError::BeverageNotFound(_))
        ));
        assert!(matches!(
            ev.add_serving(&tea, 1, Utc::now()),
            Err(TallyError::BeverageNotFound(_))
        ));
        assert!(matches!(
            ev.undo_last_serving(&tea, Utc::now()),
            Err(TallyError::BeverageNotFound(_))
        ));
    }

    #[test]
    fn history_records_add_and_undo_magnitudes() {
        let mut ev = water_and_coffee();
        let water = BeverageId::new("water");
        let _ = ev.add_serving(&water, 3, Utc::now());
        let _ = ev.undo_last_serving(&water, Utc::now());

        let kinds: Vec<(HistoryEntryType, u32)> =
            ev.history().iter().map(|e| (e.entry_type, e.amount)).collect();
        assert_eq!(
            kinds,
            vec![(HistoryEntryType::Add, 3), (HistoryEntryType::Undo, 3)]
        );
    }

    #[test]
    fn toggle_keeps_count_and_unavailable_still_counts() {
        let mut ev = water_and_coffee();
        let water = BeverageId::new("water");
        let _ = ev.toggle_availability(&water);
        let _ = ev.add_serving(&water, 2, Utc::now());
        let Ok(bev) = ev.toggle_availability(&water) else {
            panic!("toggle rejected");
        };
        assert!(!bev.available);
        assert_eq!(bev.count, 2);
        assert_eq!(ev.total_served(), 2);
    }

    #[test]
    fn filter_by_category_and_availability() {
        let mut ev = LiveEvent::new(Utc::now());
        let _ = ev.toggle_availability(&BeverageId::new("hugo"));
        let _ = ev.toggle_availability(&BeverageId::new("mojito"));

        let filter = BeverageFilter {
            category: Some("sprizz".to_string()),
            available_only: true,
        };
        let ids: Vec<&str> = ev.filtered(&filter).map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["hugo"]);

        let all_available = BeverageFilter {
            category: None,
            available_only: true,
        };
        assert_eq!(ev.filtered(&all_available).count(), 2);
    }

    #[test]
    fn finalize_snapshots_and_resets() {
        let mut ev = water_and_coffee();
        let water = BeverageId::new("water");
        let started = ev.started_at();
        let _ = ev.toggle_availability(&water);
        let _ = ev.add_serving(&water, 3, Utc::now());

        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap_or_default();
        let finished = started + TimeDelta::hours(3);
        let Ok(done) = ev.finalize("Summer Party", date, finished) else {
            panic!("finalize rejected");
        };

        assert_eq!(done.event_name, "Summer Party");
        assert_eq!(done.total_served, 3);
        assert_eq!(done.event_started_at, started);
        assert_eq!(done.event_completed_at, finished);
        assert_eq!(done.beverages.len(), 1);
        assert_eq!(done.history.len(), 1);

        assert_eq!(count(&ev, "water"), 0);
        assert!(ev.beverages().iter().all(|b| !b.available && b.count == 0));
        assert!(ev.history().is_empty());
        assert_eq!(ev.started_at(), finished);
        assert!(ev.name().is_empty());
    }

    #[test]
    fn finalize_includes_unavailable_beverages_with_counts() {
        let mut ev = water_and_coffee();
        let coffee = BeverageId::new("coffee");
        let _ = ev.add_serving(&coffee, 2, Utc::now());
        let Ok(done) = ev.finalize("Late", Utc::now().date_naive(), Utc::now()) else {
            panic!("finalize rejected");
        };
        assert_eq!(done.beverages.first().map(|b| b.id.as_str()), Some("coffee"));
    }

    #[test]
    fn finalize_requires_servings_and_name() {
        let mut ev = water_and_coffee();
        let today = Utc::now().date_naive();
        let before = ev.clone();
        assert!(matches!(
            ev.finalize("Summer Party", today, Utc::now()),
            Err(TallyError::NothingServed)
        ));
        assert_eq!(ev, before);

        let _ = ev.add_serving(&BeverageId::new("water"), 1, Utc::now());
        let before = ev.clone();
        assert!(matches!(
            ev.finalize("   ", today, Utc::now()),
            Err(TallyError::InvalidRequest(_))
        ));
        assert_eq!(ev, before);
    }

    #[test]
    fn reset_discards_everything() {
        let mut ev = water_and_coffee();
        let water = BeverageId::new("water");
        let _ = ev.toggle_availability(&water);
        let _ = ev.add_serving(&water, 7, Utc::now());
        ev.set_details("Gala", Utc::now().date_naive());

        ev.reset(Utc::now());
        assert_eq!(ev.total_served(), 0);
        assert!(ev.beverages().iter().all(|b| !b.available && !b.can_undo()));
        assert!(ev.history().is_empty());
        assert!(ev.name().is_empty());
    }

    #[test]
    fn counts_never_negative_across_mixed_sequence() {
        let mut ev = water_and_coffee();
        let water = BeverageId::new("water");
        let now = Utc::now();
        for amount in [1_u32, 5, 2, 9, 3] {
            let _ = ev.add_serving(&water, amount, now);
            let _ = ev.undo_last_serving(&water, now);
            let _ = ev.undo_last_serving(&water, now);
            let _ = ev.add_serving(&water, amount, now);
        }
        ev.reset(now);
        let _ = ev.undo_last_serving(&water, now);
        assert_eq!(count(&ev, "water"), 0);
    }
}
