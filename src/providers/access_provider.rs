// Role gating for menus and form scopes. Pure functions of the session role.

use crate::errors::{ForbiddenReason, PanelError};
use crate::types::internal::{Menu, MenuVisibility, Role};

pub fn visibility_for(role: Option<Role>) -> MenuVisibility {
    match role {
        Some(Role::Owner) => MenuVisibility {
            reseller_menu: true,
            owner_menu: true,
        },
        Some(Role::Reseller) => MenuVisibility {
            reseller_menu: true,
            owner_menu: false,
        },
        Some(Role::User) | None => MenuVisibility::hidden(),
    }
}

pub fn can_open(role: Option<Role>, menu: Menu) -> bool {
    role.is_some_and(|r| r.satisfies(menu.minimum_role()))
}

pub fn check_open(role: Option<Role>, menu: Menu) -> Result<(), PanelError> {
    if can_open(role, menu) {
        Ok(())
    } else {
        Err(PanelError::Forbidden(ForbiddenReason::MenuRestricted { menu }))
    }
}

/// Whether a form opened from `menu` may target accounts of `role`
pub fn check_assignable(menu: Menu, role: Role) -> Result<(), PanelError> {
    if menu.assignable_roles().contains(&role) {
        Ok(())
    } else {
        Err(PanelError::Forbidden(ForbiddenReason::RoleNotAssignable { menu, role }))
    }
}
