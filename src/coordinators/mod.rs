// Coordinators layer - Workflow orchestration
//
// Coordinators sequence provider operations for one user action and map
// the outcome onto the user-facing error taxonomy. They hold no rules.

pub mod account_coordinator;
pub mod login_coordinator;
pub mod startup_coordinator;

pub use account_coordinator::AccountCoordinator;
pub use login_coordinator::LoginCoordinator;
pub use startup_coordinator::{StartupCoordinator, StartupOutcome};
