//! Per-connection subscription manager.
//!
//! Tracks which beverage ids a WebSocket client is subscribed to and
//! provides server-side event filtering. Event-level notifications that
//! concern no single beverage always pass.

use std::collections::HashSet;

use crate::domain::BeverageId;

/// Manages the set of beverage subscriptions for a single WebSocket
/// connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed beverage ids. Ignored while `subscribe_all` is set.
    beverage_ids: HashSet<BeverageId>,
    /// Whether the client subscribes to every beverage (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds beverage ids to the subscription set.
    pub fn subscribe(&mut self, ids: &[BeverageId], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        self.beverage_ids.extend(ids.iter().cloned());
    }

    /// Removes beverage ids. Unsubscribing `"*"` clears the wildcard.
    pub fn unsubscribe(&mut self, ids: &[BeverageId], wildcard: bool) {
        if wildcard {
            self.subscribe_all = false;
        }
        for id in ids {
            self.beverage_ids.remove(id);
        }
    }

    /// Returns `true` if an event concerning `beverage_id` should be
    /// delivered.
    #[must_use]
    pub fn matches(&self, beverage_id: Option<&BeverageId>) -> bool {
        match beverage_id {
            None => true,
            Some(id) => self.subscribe_all || self.beverage_ids.contains(id),
        }
    }

    /// Returns the number of explicitly subscribed beverage ids.
    #[must_use]
    pub fn count(&self) -> usize {
        self.beverage_ids.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}
