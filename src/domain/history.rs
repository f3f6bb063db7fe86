//! Serving history log entries.
//!
//! `amount` is always a non-negative magnitude; the entry type decides
//! whether it adds to or subtracts from a beverage's count.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::beverage::{Beverage, BeverageId};

/// Kind of history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HistoryEntryType {
    /// A serving was recorded.
    Add,
    /// The most recent serving was undone.
    Undo,
    /// A manual downward correction.
    Correction,
}

/// One line of a live event's serving history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Beverage the entry applies to.
    pub beverage_id: BeverageId,
    /// Beverage display name at the time of the entry.
    pub beverage_name: String,
    /// Magnitude of the change (always positive).
    pub amount: u32,
    /// Time of the entry.
    pub timestamp: DateTime<Utc>,
    /// Entry kind; carries the sign of `amount`.
    #[serde(rename = "type")]
    pub entry_type: HistoryEntryType,
    /// Beverage icon at the time of the entry.
    pub beverage_icon: String,
    /// Beverage color at the time of the entry.
    pub beverage_color: String,
    /// Optional free-text reason (used by corrections).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl HistoryEntry {
    /// Builds an entry for `beverage`, copying its display metadata.
    #[must_use]
    pub fn for_beverage(
        beverage: &Beverage,
        entry_type: HistoryEntryType,
        amount: u32,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            beverage_id: beverage.id.clone(),
            beverage_name: beverage.name.clone(),
            amount,
            timestamp,
            entry_type,
            beverage_icon: beverage.icon.clone(),
            beverage_color: beverage.color.clone(),
            reason: None,
        }
    }

    /// Returns the effect of this entry on a count.
    #[must_use]
    pub fn signed_amount(&self) -> i64 {
        match self.entry_type {
            HistoryEntryType::Add => i64::from(self.amount),
            HistoryEntryType::Undo | HistoryEntryType::Correction => -i64::from(self.amount),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::catalog;

    fn entry(entry_type: HistoryEntryType, amount: u32) -> HistoryEntry {
        let Some(def) = catalog::find("hugo") else {
            panic!("hugo missing from catalog");
        };
        HistoryEntry::for_beverage(&Beverage::from_definition(def), entry_type, amount, Utc::now())
    }

    #[test]
    fn sign_is_carried_by_type() {
        assert_eq!(entry(HistoryEntryType::Add, 3).signed_amount(), 3);
        assert_eq!(entry(HistoryEntryType::Undo, 3).signed_amount(), -3);
        assert_eq!(entry(HistoryEntryType::Correction, 2).signed_amount(), -2);
    }

    #[test]
    fn type_field_is_named_type() {
        let json = serde_json::to_value(entry(HistoryEntryType::Undo, 1)).unwrap_or_default();
        assert_eq!(json.get("type").and_then(|v| v.as_str()), Some("undo"));
        assert_eq!(json.get("beverageId").and_then(|v| v.as_str()), Some("hugo"));
        assert!(json.get("reason").is_none());
    }
}
