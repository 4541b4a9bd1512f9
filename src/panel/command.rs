use std::fmt;

use crate::types::internal::{FormAction, Menu, Role};

/// User actions the panel accepts
#[derive(Clone, PartialEq, Eq)]
pub enum PanelCommand {
    Login { username: String, password: String },
    Logout,
    OpenMenu(Menu),
    CloseMenu,
    /// `None` returns the form to its placeholder
    ChooseRole(Option<Role>),
    ChooseAction(Option<FormAction>),
    /// Submit the open form, first choosing `action` when given.
    /// `password` is ignored by delete forms
    Submit {
        action: Option<FormAction>,
        username: String,
        password: String,
    },
    RefreshAccounts,
    Dispatch { destination: String, option: String },
    Shutdown,
}

impl PanelCommand {
    pub fn name(&self) -> &'static str {
        match self {
            PanelCommand::Login { .. } => "login",
            PanelCommand::Logout => "logout",
            PanelCommand::OpenMenu(_) => "open_menu",
            PanelCommand::CloseMenu => "close_menu",
            PanelCommand::ChooseRole(_) => "choose_role",
            PanelCommand::ChooseAction(_) => "choose_action",
            PanelCommand::Submit { .. } => "submit",
            PanelCommand::RefreshAccounts => "refresh_accounts",
            PanelCommand::Dispatch { .. } => "dispatch",
            PanelCommand::Shutdown => "shutdown",
        }
    }
}

// Passwords never reach logs
impl fmt::Debug for PanelCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelCommand::Login { username, .. } => f
                .debug_struct("Login")
                .field("username", username)
                .finish_non_exhaustive(),
            PanelCommand::Submit {
                action, username, ..
            } => f
                .debug_struct("Submit")
                .field("action", action)
                .field("username", username)
                .finish_non_exhaustive(),
            PanelCommand::OpenMenu(menu) => f.debug_tuple("OpenMenu").field(menu).finish(),
            PanelCommand::ChooseRole(role) => f.debug_tuple("ChooseRole").field(role).finish(),
            PanelCommand::ChooseAction(action) => {
                f.debug_tuple("ChooseAction").field(action).finish()
            }
            PanelCommand::Dispatch {
                destination,
                option,
            } => f
                .debug_struct("Dispatch")
                .field("destination", destination)
                .field("option", option)
                .finish(),
            PanelCommand::Logout => f.write_str("Logout"),
            PanelCommand::CloseMenu => f.write_str("CloseMenu"),
            PanelCommand::RefreshAccounts => f.write_str("RefreshAccounts"),
            PanelCommand::Shutdown => f.write_str("Shutdown"),
        }
    }
}
