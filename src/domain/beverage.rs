//! Beverage identity and live per-beverage tally state.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::catalog::BeverageDefinition;

/// Stable identifier of a beverage (e.g. `"aperol-sprizz"`).
///
/// Assigned by the static catalog. Ad-hoc beverages created while editing a
/// completed event's history carry whatever id the history entry names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct BeverageId(String);

impl BeverageId {
    /// Creates a `BeverageId` from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BeverageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BeverageId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for BeverageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A servable beverage together with its live counter.
///
/// `last_increment` and `last_increment_amount` form a one-slot undo
/// buffer: they are always set together by a serving and cleared together
/// by an undo or reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Beverage {
    /// Catalog identifier.
    pub id: BeverageId,
    /// Display name.
    pub name: String,
    /// Display icon (emoji).
    pub icon: String,
    /// Display color as a hex string.
    pub color: String,
    /// Category id (see [`super::catalog::CATEGORIES`]).
    pub category: String,
    /// Whether bartenders may serve this beverage.
    pub available: bool,
    /// Number of drinks served in the live event.
    pub count: u32,
    /// Time of the most recent serving, if it can still be undone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_increment: Option<DateTime<Utc>>,
    /// Amount of the most recent serving, if it can still be undone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_increment_amount: Option<u32>,
}

impl Beverage {
    /// Creates a fresh, unavailable beverage with a zero count.
    #[must_use]
    pub fn from_definition(def: &BeverageDefinition) -> Self {
        Self {
            id: BeverageId::new(def.id),
            name: def.name.to_string(),
            icon: def.icon.to_string(),
            color: def.color.to_string(),
            category: def.category.to_string(),
            available: false,
            count: 0,
            last_increment: None,
            last_increment_amount: None,
        }
    }

    /// Returns `true` if the most recent serving can be undone.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.last_increment.is_some() && self.last_increment_amount.is_some() && self.count > 0
    }

    /// Zeroes the counter, clears the undo slot and marks it unavailable.
    pub fn clear(&mut self) {
        self.available = false;
        self.count = 0;
        self.clear_undo_slot();
    }

    pub(crate) fn clear_undo_slot(&mut self) {
        self.last_increment = None;
        self.last_increment_amount = None;
    }
}
