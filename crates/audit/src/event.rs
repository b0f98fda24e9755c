use admission_core::OrgId;

/// The outcome an [`AuditEvent`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Allowed,
    Denied,
}

impl AuditAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Allowed => "ALLOWED",
            Self::Denied => "DENIED",
        }
    }
}

/// A single admission decision recorded for audit purposes.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub org_id: OrgId,
    pub action: AuditAction,
    pub reason: String,
}
