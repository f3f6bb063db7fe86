//! Wall clock at storage precision.

use chrono::{DateTime, SubsecRound, Utc};

/// Current time truncated to milliseconds, so every timestamp the service
/// hands out survives a save/load cycle unchanged.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
