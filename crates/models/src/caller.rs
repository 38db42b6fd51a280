use serde::{Deserialize, Serialize};

/// What an authenticated caller is allowed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Registrar,
    Faculty,
    Student,
}

/// The identity a request acts on behalf of.
///
/// Services take this explicitly instead of reading any request-global state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub subject: String,
    pub role: Role,
}

impl Caller {
    pub fn new(subject: impl Into<String>, role: Role) -> Self {
        Self {
            subject: subject.into(),
            role,
        }
    }

    /// Courses, sections, prerequisites and room bookings
    pub fn can_manage_catalog(&self) -> bool {
        matches!(self.role, Role::Registrar)
    }

    pub fn can_record_grades(&self) -> bool {
        matches!(self.role, Role::Registrar | Role::Faculty)
    }

    /// Term records, registrations and their credit loads
    pub fn can_manage_enrollments(&self) -> bool {
        matches!(self.role, Role::Registrar)
    }
}
