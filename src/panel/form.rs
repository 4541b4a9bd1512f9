use crate::errors::{PanelError, RequiredField};
use crate::providers::access_provider;
use crate::types::internal::{FormAction, FormSubmission, Menu, Role};

use super::event::FormView;

/// Inline result shown under a submitted form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Success(String),
    Failure(PanelError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPhase {
    Unopened,
    RoleChosen,
    ActionChosen,
    Submitted,
    Result(FormOutcome),
}

/// Role-scoped add/delete form behind a management menu
///
/// The role is chosen before the action. The reseller menu can only manage
/// user accounts, so its form opens with the role already chosen.
#[derive(Debug, Clone)]
pub struct AccountForm {
    menu: Menu,
    role: Option<Role>,
    action: Option<FormAction>,
    phase: FormPhase,
}

impl AccountForm {
    pub fn open(menu: Menu) -> Self {
        match menu.fixed_role() {
            Some(role) => Self {
                menu,
                role: Some(role),
                action: None,
                phase: FormPhase::RoleChosen,
            },
            None => Self {
                menu,
                role: None,
                action: None,
                phase: FormPhase::Unopened,
            },
        }
    }

    pub fn menu(&self) -> Menu {
        self.menu
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    /// Changing the role clears the chosen action and any shown result
    pub fn choose_role(&mut self, role: Option<Role>) -> Result<(), PanelError> {
        self.ensure_idle()?;

        match role {
            Some(role) => {
                access_provider::check_assignable(self.menu, role)?;
                self.role = Some(role);
                self.phase = FormPhase::RoleChosen;
            }
            None => {
                if self.menu.fixed_role().is_some() {
                    return Err(PanelError::MissingField(RequiredField::Role));
                }
                self.role = None;
                self.phase = FormPhase::Unopened;
            }
        }
        self.action = None;
        Ok(())
    }

    pub fn choose_action(&mut self, action: Option<FormAction>) -> Result<(), PanelError> {
        self.ensure_idle()?;

        if self.role.is_none() {
            return Err(PanelError::MissingField(RequiredField::Role));
        }

        self.action = action;
        self.phase = match action {
            Some(_) => FormPhase::ActionChosen,
            None => FormPhase::RoleChosen,
        };
        Ok(())
    }

    /// Move to `Submitted` and hand back what to run
    ///
    /// A form showing a result can be submitted again with the same role and
    /// action.
    pub fn begin_submit(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<FormSubmission, PanelError> {
        self.ensure_idle()?;

        let target_role = self
            .role
            .ok_or(PanelError::MissingField(RequiredField::Role))?;
        let action = self
            .action
            .ok_or(PanelError::MissingField(RequiredField::Action))?;

        self.phase = FormPhase::Submitted;

        Ok(FormSubmission {
            action,
            target_role,
            username: username.to_owned(),
            password: password.to_owned(),
        })
    }

    pub fn finish(&mut self, outcome: FormOutcome) {
        self.phase = FormPhase::Result(outcome);
    }

    pub fn prompt(&self) -> Option<String> {
        let role = self.role?;
        match self.action? {
            FormAction::Add => Some(format!(
                "Enter a username and password for the new {} account.",
                role
            )),
            FormAction::Delete => Some(format!(
                "Enter the username of the {} account to delete.",
                role
            )),
        }
    }

    pub fn view(&self) -> FormView {
        FormView {
            menu: self.menu,
            role: self.role,
            action: self.action,
            phase: self.phase.clone(),
            prompt: self.prompt(),
        }
    }

    fn ensure_idle(&self) -> Result<(), PanelError> {
        if self.phase == FormPhase::Submitted {
            return Err(PanelError::Busy);
        }
        Ok(())
    }
}
