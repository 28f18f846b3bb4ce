//! Registration — a user attending an event.

use serde::{Deserialize, Serialize};

use crate::id::{EventId, RegistrationId, UserId};

/// A single `(event, user)` attendance record.
///
/// At most one registration exists per pair; the storage adapter enforces
/// this on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub id: RegistrationId,
    pub event_id: EventId,
    pub user_id: UserId,
}
