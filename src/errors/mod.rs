// Errors layer - Error type definitions
pub mod internal;
pub mod panel;

// Re-exports for convenience
pub use internal::InternalError;
pub use panel::{ForbiddenReason, PanelError, RequiredField};
