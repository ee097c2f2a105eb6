//! Role requirements for every protected operation, kept in one table so they can be
//! reviewed side by side instead of being scattered over handler annotations.

use crate::auth::Claims;
use crate::error::AppError;
use crate::models::{ADMINISTRATOR, CUSTOMER};

/// An operation guarded by the policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ListBooks,
    ViewBook,
    CreateBook,
    UpdateBook,
    DeleteBook,
    ListAuthors,
    ViewAuthor,
    CreateAuthor,
    UpdateAuthor,
    DeleteAuthor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Any caller holding a valid token.
    Authenticated,
    /// The caller must hold at least one of the listed roles.
    AnyRole(&'static [&'static str]),
}

pub const POLICY: &[(Permission, Requirement)] = &[
    (Permission::ListBooks, Requirement::Authenticated),
    (Permission::ViewBook, Requirement::Authenticated),
    (Permission::CreateBook, Requirement::Authenticated),
    (Permission::UpdateBook, Requirement::Authenticated),
    (Permission::DeleteBook, Requirement::Authenticated),
    (Permission::ListAuthors, Requirement::Authenticated),
    (Permission::ViewAuthor, Requirement::Authenticated),
    (Permission::CreateAuthor, Requirement::AnyRole(&[ADMINISTRATOR])),
    (
        Permission::UpdateAuthor,
        Requirement::AnyRole(&[ADMINISTRATOR, CUSTOMER]),
    ),
    // Customer-only, as deployed.
    (Permission::DeleteAuthor, Requirement::AnyRole(&[CUSTOMER])),
];

/// Looks up the requirement for `permission`. Unlisted permissions require a role
/// nobody holds, so forgetting a table entry fails closed.
pub fn requirement(permission: Permission) -> Requirement {
    POLICY
        .iter()
        .find(|(p, _)| *p == permission)
        .map(|(_, requirement)| *requirement)
        .unwrap_or(Requirement::AnyRole(&[]))
}

pub fn authorize(claims: &Claims, permission: Permission) -> Result<(), AppError> {
    match requirement(permission) {
        Requirement::Authenticated => Ok(()),
        Requirement::AnyRole(roles) if roles.iter().any(|role| claims.has_role(role)) => Ok(()),
        Requirement::AnyRole(_) => {
            log::warn!(
                "User {} denied {:?}: roles {:?}",
                claims.uid,
                permission,
                claims.roles
            );
            Err(AppError::Forbidden(
                "You do not have permission to perform this action".into(),
            ))
        }
    }
}
