//! Domain layer: catalog, live event state machine, archive and events.
//!
//! Everything here is synchronous and lock-free. The live event and the
//! archive are plain values mutated through transition methods; the
//! service layer serializes access to them.

pub mod archive;
pub mod beverage;
pub mod catalog;
pub mod completed_event;
pub mod event_bus;
pub mod event_id;
pub mod history;
pub mod live_event;
pub mod statistics;
pub mod tally_event;

pub use archive::Archive;
pub use beverage::{Beverage, BeverageId};
pub use completed_event::{BeverageSnapshot, CompletedEvent};
pub use event_bus::EventBus;
pub use event_id::EventId;
pub use history::{HistoryEntry, HistoryEntryType};
pub use live_event::{BeverageFilter, LiveEvent};
pub use statistics::EventStatistics;
pub use tally_event::TallyEvent;
