// Internal domain types shared across stores, providers and the panel
pub mod account;
pub mod auth;
pub mod form;
pub mod menu;
pub mod role;
pub mod session;

pub use account::{Account, AccountSummary};
pub use auth::{AuthContext, SessionClaims, SessionToken};
pub use form::{FormAction, FormSubmission};
pub use menu::{Menu, MenuVisibility};
pub use role::Role;
pub use session::SessionContext;
