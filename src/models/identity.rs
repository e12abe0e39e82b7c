/// Caller identity supplied by the transport layer with every operation.
///
/// The engine never issues or verifies credentials; it only distinguishes
/// anonymous callers, regular users, and staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    User { id: i64, is_staff: bool },
}

impl Identity {
    pub fn user(id: i64) -> Self {
        Self::User { id, is_staff: false }
    }

    pub fn staff(id: i64) -> Self {
        Self::User { id, is_staff: true }
    }

    pub fn user_id(&self) -> Option<i64> {
        match self {
            Self::Anonymous => None,
            Self::User { id, .. } => Some(*id),
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Self::User { is_staff: true, .. })
    }
}
