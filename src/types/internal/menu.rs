use std::fmt;

use serde::Serialize;

use super::role::Role;

/// Role-restricted management menus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Menu {
    Reseller,
    Owner,
}

impl Menu {
    pub fn minimum_role(&self) -> Role {
        match self {
            Menu::Reseller => Role::Reseller,
            Menu::Owner => Role::Owner,
        }
    }

    /// Roles a form opened from this menu may target
    pub fn assignable_roles(&self) -> &'static [Role] {
        match self {
            Menu::Reseller => &[Role::User],
            Menu::Owner => &[Role::Reseller, Role::User],
        }
    }

    /// Target role fixed by the menu itself, if there is no choice to make
    pub fn fixed_role(&self) -> Option<Role> {
        match self.assignable_roles() {
            [only] => Some(*only),
            _ => None,
        }
    }
}

impl fmt::Display for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Menu::Reseller => f.write_str("reseller menu"),
            Menu::Owner => f.write_str("owner menu"),
        }
    }
}

/// Which menu entries are shown for the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MenuVisibility {
    pub reseller_menu: bool,
    pub owner_menu: bool,
}

impl MenuVisibility {
    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn shows(&self, menu: Menu) -> bool {
        match menu {
            Menu::Reseller => self.reseller_menu,
            Menu::Owner => self.owner_menu,
        }
    }
}
