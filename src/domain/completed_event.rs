//! Finalized event snapshots held by the archive.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::beverage::{Beverage, BeverageId};
use super::catalog::CUSTOM_CATEGORY;
use super::event_id::EventId;
use super::history::{HistoryEntry, HistoryEntryType};
use crate::error::TallyError;

/// Beverage state frozen at finalization, without the undo slot or
/// availability flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BeverageSnapshot {
    /// Beverage identifier.
    pub id: BeverageId,
    /// Display name.
    pub name: String,
    /// Display icon (emoji).
    pub icon: String,
    /// Display color as a hex string.
    pub color: String,
    /// Category id.
    pub category: String,
    /// Drinks served during the event.
    pub count: u32,
}

impl From<&Beverage> for BeverageSnapshot {
    fn from(b: &Beverage) -> Self {
        Self {
            id: b.id.clone(),
            name: b.name.clone(),
            icon: b.icon.clone(),
            color: b.color.clone(),
            category: b.category.clone(),
            count: b.count,
        }
    }
}

impl BeverageSnapshot {
    /// One `add` entry carrying this beverage's whole count, for events that
    /// were archived without a history.
    #[must_use]
    pub fn as_served_entry(&self, timestamp: DateTime<Utc>) -> HistoryEntry {
        HistoryEntry {
            beverage_id: self.id.clone(),
            beverage_name: self.name.clone(),
            amount: self.count,
            timestamp,
            entry_type: HistoryEntryType::Add,
            beverage_icon: self.icon.clone(),
            beverage_color: self.color.clone(),
            reason: None,
        }
    }

    fn ad_hoc(entry: &HistoryEntry) -> Self {
        Self {
            id: entry.beverage_id.clone(),
            name: entry.beverage_name.clone(),
            icon: entry.beverage_icon.clone(),
            color: entry.beverage_color.clone(),
            category: CUSTOM_CATEGORY.to_string(),
            count: 0,
        }
    }
}

/// An archived event.
///
/// Immutable after creation except through [`CompletedEvent::apply_history_edit`],
/// which recomputes `beverages` and `total_served` from an edited history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletedEvent {
    /// Archive identifier.
    pub id: EventId,
    /// Event name.
    pub event_name: String,
    /// Calendar date of the event.
    pub event_date: NaiveDate,
    /// When serving started.
    pub event_started_at: DateTime<Utc>,
    /// When the event was finalized.
    pub event_completed_at: DateTime<Utc>,
    /// Sum of all beverage counts.
    pub total_served: u64,
    /// Served beverages.
    pub beverages: Vec<BeverageSnapshot>,
    /// Full serving history of the event.
    pub history: Vec<HistoryEntry>,
}

impl CompletedEvent {
    /// Time between start and completion (zero if the clock went backwards).
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        (self.event_completed_at - self.event_started_at).max(TimeDelta::zero())
    }

    /// Human duration label such as `"2h 5min"` or `"45min"`.
    #[must_use]
    pub fn duration_label(&self) -> String {
        format_duration(self.duration())
    }

    /// Folds repeated beverage rows into the first one, summing counts.
    /// Row order and `total_served` are preserved.
    pub fn merge_duplicate_beverages(&mut self) {
        let mut merged: Vec<BeverageSnapshot> = Vec::with_capacity(self.beverages.len());
        for bev in std::mem::take(&mut self.beverages) {
            match merged.iter_mut().find(|m| m.id == bev.id) {
                Some(first) => first.count = first.count.saturating_add(bev.count),
                None => merged.push(bev),
            }
        }
        self.beverages = merged;
    }

    /// Replaces the history, name and date, then recomputes every
    /// beverage's count as the signed sum of its history entries
    /// (clamped at zero) and `total_served` as the sum of those counts.
    ///
    /// Entries for beverages absent from the snapshot add an ad-hoc
    /// beverage in the `"custom"` category.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::InvalidRequest`] if the name is blank or any
    /// entry has a zero amount. The event is left unchanged on error.
    pub fn apply_history_edit(
        &mut self,
        history: Vec<HistoryEntry>,
        name: &str,
        date: NaiveDate,
    ) -> Result<(), TallyError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TallyError::InvalidRequest(
                "event name must not be empty".to_string(),
            ));
        }
        if let Some(bad) = history.iter().find(|e| e.amount == 0) {
            return Err(TallyError::InvalidRequest(format!(
                "history entry for {} has a zero amount",
                bad.beverage_id
            )));
        }

        let mut sums: HashMap<&BeverageId, i64> = HashMap::new();
        let mut beverages = self.beverages.clone();
        for entry in &history {
            if !beverages.iter().any(|b| b.id == entry.beverage_id) {
                beverages.push(BeverageSnapshot::ad_hoc(entry));
            }
            *sums.entry(&entry.beverage_id).or_insert(0) += entry.signed_amount();
        }

        let mut total: u64 = 0;
        for bev in &mut beverages {
            let sum = sums.get(&bev.id).copied().unwrap_or(0);
            bev.count = u32::try_from(sum.max(0)).unwrap_or(u32::MAX);
            total = total.saturating_add(u64::from(bev.count));
        }

        self.beverages = beverages;
        self.total_served = total;
        self.event_name = name.to_string();
        self.event_date = date;
        self.history = history;
        Ok(())
    }
}

/// Formats a duration as `"{h}h {m}min"`, or `"{m}min"` below one hour.
#[must_use]
pub fn format_duration(duration: TimeDelta) -> String {
    let hours = duration.num_hours();
    let minutes = duration.num_minutes() % 60;
    if hours > 0 {
        format!("{hours}h {minutes}min")
    } else {
        format!("{minutes}min")
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::catalog;
    use crate::domain::history::HistoryEntryType;

    fn snapshot(id: &str, count: u32) -> BeverageSnapshot {
        let Some(def) = catalog::find(id) else {
            panic!("{id} missing from catalog");
        };
        let mut bev = Beverage::from_definition(def);
        bev.count = count;
        BeverageSnapshot::from(&bev)
    }

    fn entry(id: &str, entry_type: HistoryEntryType, amount: u32) -> HistoryEntry {
        let bev = Beverage::from_definition(catalog::find(id).unwrap_or_else(|| {
            panic!("{id} missing from catalog");
        }));
        HistoryEntry::for_beverage(&bev, entry_type, amount, Utc::now())
    }

    fn event() -> CompletedEvent {
        let started = Utc::now() - TimeDelta::minutes(125);
        CompletedEvent {
            id: EventId::new(),
            event_name: "Summer Party".to_string(),
            event_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap_or_default(),
            event_started_at: started,
            event_completed_at: started + TimeDelta::minutes(125),
            total_served: 5,
            beverages: vec![snapshot("hugo", 3), snapshot("mojito", 2)],
            history: vec![
                entry("hugo", HistoryEntryType::Add, 3),
                entry("mojito", HistoryEntryType::Add, 2),
            ],
        }
    }

    #[test]
    fn duration_label_formats_hours_and_minutes() {
        assert_eq!(event().duration_label(), "2h 5min");
        assert_eq!(format_duration(TimeDelta::minutes(45)), "45min");
        assert_eq!(format_duration(TimeDelta::zero()), "0min");
    }

    #[test]
    fn edit_recomputes_counts_from_signed_history() {
        let mut ev = event();
        let history = vec![
            entry("hugo", HistoryEntryType::Add, 4),
            entry("hugo", HistoryEntryType::Undo, 1),
            entry("mojito", HistoryEntryType::Add, 2),
            entry("mojito", HistoryEntryType::Correction, 2),
        ];
        let date = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap_or_default();
        assert!(ev.apply_history_edit(history, " Renamed ", date).is_ok());

        let counts: Vec<u32> = ev.beverages.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![3, 0]);
        assert_eq!(ev.total_served, 3);
        assert_eq!(ev.event_name, "Renamed");
        assert_eq!(ev.event_date, date);
        assert_eq!(ev.history.len(), 4);
    }

    #[test]
    fn edit_clamps_negative_sums_to_zero() {
        let mut ev = event();
        let history = vec![
            entry("hugo", HistoryEntryType::Correction, 5),
            entry("mojito", HistoryEntryType::Add, 1),
        ];
        assert!(ev.apply_history_edit(history, "x", ev.event_date).is_ok());
        assert_eq!(ev.beverages.first().map(|b| b.count), Some(0));
        assert_eq!(ev.total_served, 1);
    }

    #[test]
    fn edit_adds_ad_hoc_custom_beverage() {
        let mut ev = event();
        let mut custom = entry("hugo", HistoryEntryType::Add, 2);
        custom.beverage_id = BeverageId::new("house-punch");
        custom.beverage_name = "House Punch".to_string();
        let history = vec![custom, entry("hugo", HistoryEntryType::Add, 1)];
        assert!(ev.apply_history_edit(history, "x", ev.event_date).is_ok());

        let Some(punch) = ev.beverages.iter().find(|b| b.id.as_str() == "house-punch") else {
            panic!("ad-hoc beverage was not created");
        };
        assert_eq!(punch.category, CUSTOM_CATEGORY);
        assert_eq!(punch.name, "House Punch");
        assert_eq!(punch.count, 2);
        assert_eq!(ev.total_served, 3);
    }

    #[test]
    fn edit_rejects_blank_name_without_mutation() {
        let mut ev = event();
        let before = ev.clone();
        let result = ev.apply_history_edit(Vec::new(), "  ", ev.event_date);
        assert!(matches!(result, Err(TallyError::InvalidRequest(_))));
        assert_eq!(ev, before);
    }

    #[test]
    fn edit_rejects_zero_amount() {
        let mut ev = event();
        let history = vec![entry("hugo", HistoryEntryType::Add, 0)];
        let result = ev.apply_history_edit(history, "x", ev.event_date);
        assert!(matches!(result, Err(TallyError::InvalidRequest(_))));
    }
}
