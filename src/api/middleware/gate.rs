//! Permission gate
//!
//! Encodes the operation policy on top of validated memberships. Membership
//! removal denies with `AdminRequired`; resource operations deny with
//! `PermissionDenied` naming the missing capability. Membership addition is
//! gated upstream by the admin validator.

use crate::domain::membership::TeamRole;
use crate::domain::DomainError;

/// Class of operation being attempted against a team-scoped resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationClass {
    /// Read a team-scoped resource
    Read,
    /// Create a business resource (reviews)
    CreateBusiness,
    /// Create a structural resource (widgets)
    CreateStructural,
    /// Update content fields only
    UpdateContent,
    /// Update type, position, activation or title
    UpdateStructural,
    /// Delete a team-scoped resource
    Delete,
    /// Remove a membership; members may remove their own
    RemoveMembership { self_target: bool },
}

impl OperationClass {
    fn capability(&self) -> &'static str {
        match self {
            Self::Read => "resource:read",
            Self::CreateBusiness => "resource:create",
            Self::CreateStructural => "resource:create_structural",
            Self::UpdateContent => "resource:update",
            Self::UpdateStructural => "resource:update_structural",
            Self::Delete => "resource:delete",
            Self::RemoveMembership { .. } => "member:remove",
        }
    }
}

/// Decide whether a role may perform an operation
pub fn authorize(op: OperationClass, role: TeamRole) -> Result<(), DomainError> {
    use OperationClass::*;

    let allowed = match op {
        Read | CreateBusiness | UpdateContent => true,
        CreateStructural | UpdateStructural | Delete => role.is_admin(),
        RemoveMembership { self_target } => self_target || role.is_admin(),
    };

    if allowed {
        return Ok(());
    }

    match op {
        RemoveMembership { .. } => {
            Err(DomainError::admin_required("Team admin role required"))
        }
        _ => Err(DomainError::permission_denied(op.capability())),
    }
}
