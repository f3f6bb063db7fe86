//! # beverage-tally
//!
//! Event beverage tracking service: an admin decides which beverages are
//! available, bartenders record servings (with one-step undo), and each
//! finished event is archived with its full history for statistics and
//! export.
//!
//! State lives in one process and is saved to local JSON files after every
//! mutation, periodically while a session is active, and on shutdown.
//!
//! ## Architecture
//!
//! ```text
//! Clients (admin, bartender, customer screens)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── TallyService / SessionService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── LiveEvent + Archive (domain/)
//!     │
//!     └── StatePersistence → FileStore | MemoryStore (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;
