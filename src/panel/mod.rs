// Panel layer - the session state machine driving a UI surface
//
// A UI sends `PanelCommand`s to the controller task and renders the
// `PanelEvent`s it gets back. All store work happens on spawned tasks.

pub mod command;
pub mod controller;
pub mod event;
pub mod form;

pub use command::PanelCommand;
pub use controller::{spawn_panel, PanelController, PanelHandle, PanelOptions};
pub use event::{FormView, PanelEvent};
pub use form::{AccountForm, FormOutcome, FormPhase};
