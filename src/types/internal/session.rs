use super::auth::AuthContext;
use super::menu::{Menu, MenuVisibility};
use super::role::Role;

/// Per-session state owned by the panel controller
///
/// Lives only as long as the session. `ready` flips once startup has signed
/// in; `role` is set by a successful login and cleared again by logout.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    ready: bool,
    auth: Option<AuthContext>,
    username: Option<String>,
    role: Option<Role>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_ready(&mut self, auth: AuthContext) {
        self.ready = true;
        self.auth = Some(auth);
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn auth(&self) -> Option<&AuthContext> {
        self.auth.as_ref()
    }

    pub fn sign_in(&mut self, username: impl Into<String>, role: Role) {
        self.username = Some(username.into());
        self.role = Some(role);
    }

    /// Logout: forget who is signed in, keep the store connection ready
    pub fn reset(&mut self) {
        self.username = None;
        self.role = None;
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.role.is_some()
    }

    pub fn visibility(&self) -> MenuVisibility {
        crate::providers::access_provider::visibility_for(self.role)
    }

    pub fn can_open(&self, menu: Menu) -> bool {
        crate::providers::access_provider::can_open(self.role, menu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn anonymous() -> AuthContext {
        AuthContext {
            uid: "anon".to_string(),
            anonymous: true,
            signed_in_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_session_is_not_ready_and_unset() {
        let session = SessionContext::new();
        assert!(!session.is_ready());
        assert_eq!(session.role(), None);
        assert!(!session.is_signed_in());
    }

    #[test]
    fn test_reset_clears_role_but_keeps_readiness() {
        let mut session = SessionContext::new();
        session.mark_ready(anonymous());
        session.sign_in("admin", Role::Owner);
        assert_eq!(session.auth().map(|a| a.uid.as_str()), Some("anon"));
        assert_eq!(session.role(), Some(Role::Owner));
        assert_eq!(session.username(), Some("admin"));

        session.reset();
        assert!(session.is_ready());
        assert_eq!(session.role(), None);
        assert_eq!(session.username(), None);
        assert_eq!(session.visibility(), MenuVisibility::hidden());
    }
}
