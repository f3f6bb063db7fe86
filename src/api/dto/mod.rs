//! Data Transfer Objects for REST request/response serialization.
//!
//! Domain types that already serialize in the wire shape (beverages,
//! history entries, completed events, statistics) are returned as-is;
//! DTOs here cover request bodies and response envelopes.

pub mod archive_dto;
pub mod beverage_dto;
pub mod common_dto;
pub mod event_dto;
pub mod session_dto;

pub use archive_dto::*;
pub use beverage_dto::*;
pub use common_dto::*;
pub use event_dto::*;
pub use session_dto::*;
