use crate::errors::PanelError;
use crate::providers::DispatchStatus;
use crate::types::internal::{AccountSummary, FormAction, Menu, MenuVisibility, Role};

use super::form::FormPhase;

/// Snapshot of a management form for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub menu: Menu,
    pub role: Option<Role>,
    pub action: Option<FormAction>,
    pub phase: FormPhase,
    /// Instruction line for the input fields, once an action is chosen
    pub prompt: Option<String>,
}

/// What the panel tells its UI surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    /// Global loading indicator; true while any store operation is in flight
    Loading(bool),
    Ready,
    StartupFailed(PanelError),
    /// The session is ready but the `admin` owner could not be written
    SeedFailed(PanelError),

    LoginFailed(PanelError),
    LoggedIn {
        username: String,
        role: Role,
        visibility: MenuVisibility,
    },
    LoggedOut,

    MenuOpened(FormView),
    MenuRefused { menu: Menu, error: PanelError },
    MenuClosed,

    FormChanged(FormView),
    /// A form command was refused before anything was submitted
    FormRejected(PanelError),
    /// Inline result of a submitted form
    FormResult(Result<String, PanelError>),

    AccountsListed(Vec<AccountSummary>),
    AccountsFailed(PanelError),

    Dispatch(DispatchStatus),
    DispatchRejected(PanelError),
}
