//! Aggregate statistics over the completed-event archive.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use super::beverage::BeverageId;
use super::catalog;
use super::completed_event::CompletedEvent;
use super::event_id::EventId;

const UNKNOWN_CATEGORY_COLOR: &str = "#9e9e9e";
const UNKNOWN_CATEGORY_ICON: &str = "🍹";

/// A beverage ranked by total servings across all events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopDrink {
    /// Beverage identifier.
    pub id: BeverageId,
    /// Display name (from its first appearance).
    pub name: String,
    /// Servings summed over all events.
    pub total_count: u64,
    /// Category id.
    pub category: String,
    /// Display icon.
    pub icon: String,
    /// Display color.
    pub color: String,
    /// Number of distinct events it was served in.
    pub events_served_in: u32,
}

/// A category ranked by total servings across all events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopCategory {
    /// Category identifier.
    pub id: String,
    /// Display name (the id itself for categories outside the catalog).
    pub name: String,
    /// Servings summed over all events.
    pub total_count: u64,
    /// Display color.
    pub color: String,
    /// Display icon.
    pub icon: String,
}

/// Short reference to the event with the most servings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventHighlight {
    /// Archive identifier.
    pub id: EventId,
    /// Event name.
    pub name: String,
    /// Event date.
    pub date: NaiveDate,
    /// Servings in that event.
    pub total_served: u64,
}

/// Archive-wide statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventStatistics {
    /// Number of archived events.
    pub total_events: u64,
    /// Servings summed over all events.
    pub total_drinks_served: u64,
    /// `total_drinks_served / total_events`, rounded half up.
    pub average_drinks_per_event: u64,
    /// Most served beverages, descending.
    pub top_drinks: Vec<TopDrink>,
    /// Categories with servings, descending.
    pub top_categories: Vec<TopCategory>,
    /// Event with the highest `total_served`; ties go to the earliest in
    /// archive order.
    pub most_successful_event: Option<EventHighlight>,
}

impl EventStatistics {
    /// Computes statistics over `events`, keeping at most `top_n` drinks.
    ///
    /// Ranking ties keep first-encountered order.
    #[must_use]
    pub fn compute(events: &[CompletedEvent], top_n: usize) -> Self {
        if events.is_empty() {
            return Self::default();
        }

        let total_events = events.len() as u64;
        let total_drinks_served: u64 = events.iter().map(|e| e.total_served).sum();
        let average_drinks_per_event = total_drinks_served
            .saturating_mul(2)
            .saturating_add(total_events)
            / total_events.saturating_mul(2);

        let mut drinks = Ranked::<BeverageId, TopDrink>::default();
        let mut categories = Ranked::<String, TopCategory>::default();

        for event in events {
            let mut seen_in_event: HashSet<&BeverageId> = HashSet::new();
            for bev in event.beverages.iter().filter(|b| b.count > 0) {
                let drink = drinks.entry(&bev.id, || TopDrink {
                    id: bev.id.clone(),
                    name: bev.name.clone(),
                    total_count: 0,
                    category: bev.category.clone(),
                    icon: bev.icon.clone(),
                    color: bev.color.clone(),
                    events_served_in: 0,
                });
                drink.total_count = drink.total_count.saturating_add(u64::from(bev.count));
                if seen_in_event.insert(&bev.id) {
                    drink.events_served_in = drink.events_served_in.saturating_add(1);
                }

                let cat = categories.entry(&bev.category, || category_entry(&bev.category));
                cat.total_count = cat.total_count.saturating_add(u64::from(bev.count));
            }
        }

        let mut top_drinks = drinks.into_vec();
        top_drinks.sort_by(|a, b| b.total_count.cmp(&a.total_count));
        top_drinks.truncate(top_n);

        let mut top_categories = categories.into_vec();
        top_categories.sort_by(|a, b| b.total_count.cmp(&a.total_count));

        let most_successful_event = events
            .iter()
            .fold(None::<&CompletedEvent>, |best, e| match best {
                Some(b) if b.total_served >= e.total_served => Some(b),
                _ => Some(e),
            })
            .map(|e| EventHighlight {
                id: e.id,
                name: e.event_name.clone(),
                date: e.event_date,
                total_served: e.total_served,
            });

        Self {
            total_events,
            total_drinks_served,
            average_drinks_per_event,
            top_drinks,
            top_categories,
            most_successful_event,
        }
    }
}

fn category_entry(id: &str) -> TopCategory {
    match catalog::category(id) {
        Some(c) => TopCategory {
            id: c.id.to_string(),
            name: c.name.to_string(),
            total_count: 0,
            color: c.color.to_string(),
            icon: c.icon.to_string(),
        },
        None => TopCategory {
            id: id.to_string(),
            name: id.to_string(),
            total_count: 0,
            color: UNKNOWN_CATEGORY_COLOR.to_string(),
            icon: UNKNOWN_CATEGORY_ICON.to_string(),
        },
    }
}

/// Insertion-ordered accumulator keyed by `K`.
#[derive(Debug)]
struct Ranked<K, V> {
    index: HashMap<K, usize>,
    items: Vec<V>,
}

impl<K, V> Default for Ranked<K, V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            items: Vec::new(),
        }
    }
}

impl<K: std::hash::Hash + Eq + Clone, V> Ranked<K, V> {
    fn entry(&mut self, key: &K, init: impl FnOnce() -> V) -> &mut V {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                self.items.push(init());
                let idx = self.items.len() - 1;
                self.index.insert(key.clone(), idx);
                idx
            }
        };
        // idx always comes from a push above or an earlier one
        #[allow(clippy::indexing_slicing)]
        &mut self.items[idx]
    }

    fn into_vec(self) -> Vec<V> {
        self.items
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::beverage::Beverage;
    use crate::domain::completed_event::BeverageSnapshot;

    fn snap(id: &str, count: u32) -> BeverageSnapshot {
        let def = catalog::find(id).unwrap_or_else(|| panic!("{id} missing from catalog"));
        let mut bev = Beverage::from_definition(def);
        bev.count = count;
        BeverageSnapshot::from(&bev)
    }

    fn event(name: &str, beverages: Vec<BeverageSnapshot>) -> CompletedEvent {
        let now = Utc::now();
        CompletedEvent {
            id: EventId::new(),
            event_name: name.to_string(),
            event_date: now.date_naive(),
            event_started_at: now,
            event_completed_at: now,
            total_served: beverages.iter().map(|b| u64::from(b.count)).sum(),
            beverages,
            history: Vec::new(),
        }
    }

    #[test]
    fn empty_archive_is_all_zero() {
        let stats = EventStatistics::compute(&[], 10);
        assert_eq!(stats, EventStatistics::default());
        assert!(stats.most_successful_event.is_none());
    }

    #[test]
    fn single_event_average_equals_total() {
        let stats = EventStatistics::compute(&[event("A", vec![snap("hugo", 5)])], 10);
        assert_eq!(stats.total_events, 1);
        assert_eq!(stats.total_drinks_served, 5);
        assert_eq!(stats.average_drinks_per_event, 5);
    }

    #[test]
    fn average_rounds_half_up() {
        let events = [
            event("A", vec![snap("hugo", 2)]),
            event("B", vec![snap("hugo", 3)]),
        ];
        assert_eq!(EventStatistics::compute(&events, 10).average_drinks_per_event, 3);

        let events = [
            event("A", vec![snap("hugo", 1)]),
            event("B", vec![snap("hugo", 1)]),
            event("C", vec![snap("hugo", 2)]),
        ];
        assert_eq!(EventStatistics::compute(&events, 10).average_drinks_per_event, 1);
    }

    #[test]
    fn top_drinks_sum_counts_and_track_event_appearances() {
        let events = [
            event("A", vec![snap("hugo", 3), snap("mojito", 4)]),
            event("B", vec![snap("hugo", 2)]),
        ];
        let stats = EventStatistics::compute(&events, 10);
        let ranked: Vec<(&str, u64, u32)> = stats
            .top_drinks
            .iter()
            .map(|d| (d.id.as_str(), d.total_count, d.events_served_in))
            .collect();
        assert_eq!(ranked, vec![("hugo", 5, 2), ("mojito", 4, 1)]);
    }

    #[test]
    fn repeated_rows_count_one_event_appearance() {
        let stats = EventStatistics::compute(
            &[event("Doubled", vec![snap("hugo", 2), snap("hugo", 3)])],
            10,
        );
        let Some(hugo) = stats.top_drinks.first() else {
            panic!("no top drink");
        };
        assert_eq!(hugo.total_count, 5);
        assert_eq!(hugo.events_served_in, 1);
    }

    #[test]
    fn top_drinks_respects_limit_and_skips_zero_counts() {
        let events = [event(
            "A",
            vec![snap("hugo", 3), snap("mojito", 2), snap("gin-tonic", 1), snap("caipirinha", 0)],
        )];
        let stats = EventStatistics::compute(&events, 2);
        assert_eq!(stats.top_drinks.len(), 2);

        let all = EventStatistics::compute(&events, 10);
        assert!(all.top_drinks.iter().all(|d| d.id.as_str() != "caipirinha"));
    }

    #[test]
    fn categories_use_catalog_names_and_fallback_for_custom() {
        let mut custom = snap("hugo", 6);
        custom.id = BeverageId::new("house-punch");
        custom.category = catalog::CUSTOM_CATEGORY.to_string();
        let events = [event("A", vec![snap("hugo", 2), snap("mojito", 3), custom])];

        let stats = EventStatistics::compute(&events, 10);
        let names: Vec<(&str, u64)> = stats
            .top_categories
            .iter()
            .map(|c| (c.name.as_str(), c.total_count))
            .collect();
        assert_eq!(names, vec![("custom", 6), ("Cocktails", 3), ("Sprizz", 2)]);
    }

    #[test]
    fn most_successful_tie_goes_to_first_in_archive_order() {
        let first = event("First", vec![snap("hugo", 4)]);
        let second = event("Second", vec![snap("mojito", 4)]);
        let smaller = event("Smaller", vec![snap("mojito", 1)]);
        let stats = EventStatistics::compute(&[smaller, first.clone(), second], 10);
        let Some(best) = stats.most_successful_event else {
            panic!("expected a most successful event");
        };
        assert_eq!(best.id, first.id);
        assert_eq!(best.total_served, 4);
    }
}
