//! Service layer: business logic orchestration.
//!
//! [`TallyService`] serializes every state transition, persists the result
//! and emits events through the [`super::domain::EventBus`].
//! [`SessionService`] gates mutations behind a login and owns the
//! [`AutosaveHandle`] lifecycle.

pub mod autosave;
mod clock;
pub mod export;
pub mod session_service;
pub mod tally_service;

pub use autosave::AutosaveHandle;
pub use export::ExportDocument;
pub use session_service::SessionService;
pub use tally_service::{ImportSummary, ResetConfirmation, TallyService};
