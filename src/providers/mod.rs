// Providers layer - Work performers and business logic
//
// Providers contain the rules and perform the actual work; coordinators
// sequence them for a user action.

pub mod access_provider;
pub mod account_provider;
pub mod credential_provider;
pub mod dispatch_provider;
pub mod identity_provider;


pub use account_provider::AccountProvider;
pub use credential_provider::CredentialProvider;
pub use dispatch_provider::{DispatchProvider, DispatchRequest, DispatchStatus, DispatchTimings};
pub use identity_provider::{IdentityProvider, TokenIdentityProvider};
