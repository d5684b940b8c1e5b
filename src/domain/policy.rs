use crate::domain::models::user::User;
use crate::error::AppError;

/// Everything an actor can ask the system to do. Self-scoped actions carry
/// the id of the resource owner so the policy can compare it to the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    ListRooms,
    ReadRoom,
    ManageRooms,
    ManageUsers,
    ManageOccupancies,
    ManagePayments,
    ListPayments { owner: Option<&'a str> },
    CreateIssue,
    ReadIssue { owner: &'a str },
    ListIssues { owner: Option<&'a str> },
    UpdateIssue,
    ViewDashboard,
}

/// Single authorization decision point: {role, action, owner} -> allow/deny.
/// Handlers call this instead of inspecting roles ad hoc.
pub fn authorize(actor: &User, action: Action<'_>) -> Result<(), AppError> {
    if is_allowed(actor, action) {
        Ok(())
    } else {
        Err(AppError::Forbidden("You do not have permission to perform this action".into()))
    }
}

fn is_allowed(actor: &User, action: Action<'_>) -> bool {
    use Action::*;

    if actor.role.is_staff() {
        // Staff may do everything the API exposes.
        return true;
    }

    match action {
        ListRooms | ReadRoom | CreateIssue => true,
        ListPayments { owner } | ListIssues { owner } => owner == Some(actor.id.as_str()),
        ReadIssue { owner } => owner == actor.id,
        ManageRooms | ManageUsers | ManageOccupancies | ManagePayments | UpdateIssue
        | ViewDashboard => false,
    }
}
