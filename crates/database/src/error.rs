use models::time_slot::TimeSlotError;
use sea_orm::DbErr;
use uuid::Uuid;

/// Errors returned by the core services.
///
/// Every variant except [`ServiceError::Database`] is a rejection that left
/// the store exactly as it was before the call.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Malformed input: inverted interval, blank room, illegal transition
    #[error("validation failed: {0}")]
    Validation(String),

    /// The requested slot overlaps existing bookings of the same room
    #[error("schedule conflicts with {} existing booking(s)", .conflicting.len())]
    Conflict { conflicting: Vec<Uuid> },

    /// The edge would close a cycle in the prerequisite graph
    #[error("{prerequisite} already depends on {course}; adding the edge would create a cycle")]
    DependencyConflict { course: Uuid, prerequisite: Uuid },

    #[error("{course} already requires {prerequisite}")]
    DuplicateEdge { course: Uuid, prerequisite: Uuid },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    /// A derived value could not be computed from the linked records
    #[error("integrity violation: {0}")]
    Integrity(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Database(#[from] DbErr),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }
}

impl From<TimeSlotError> for ServiceError {
    fn from(err: TimeSlotError) -> Self {
        Self::Validation(err.to_string())
    }
}
