use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc::{self, error::SendError, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::app_data::AppData;
use crate::coordinators::{AccountCoordinator, LoginCoordinator, StartupCoordinator, StartupOutcome};
use crate::errors::{ForbiddenReason, PanelError, RequiredField};
use crate::providers::{access_provider, DispatchProvider, DispatchRequest, DispatchTimings};
use crate::types::internal::{Account, AccountSummary, FormAction, Menu, Role, SessionContext};

use super::command::PanelCommand;
use super::event::PanelEvent;
use super::form::{AccountForm, FormOutcome};

#[derive(Debug, Clone, Copy, Default)]
pub struct PanelOptions {
    pub dispatch_timings: DispatchTimings,
}

/// UI side of a running panel
pub struct PanelHandle {
    commands: UnboundedSender<PanelCommand>,
    events: UnboundedReceiver<PanelEvent>,
}

impl PanelHandle {
    pub fn send(&self, command: PanelCommand) -> Result<(), SendError<PanelCommand>> {
        self.commands.send(command)
    }

    pub async fn next_event(&mut self) -> Option<PanelEvent> {
        self.events.recv().await
    }

    pub fn split(self) -> (UnboundedSender<PanelCommand>, UnboundedReceiver<PanelEvent>) {
        (self.commands, self.events)
    }
}

/// Start a panel session on its own task
///
/// Startup begins immediately; the first events are `Loading(true)` followed
/// by `Ready` or `StartupFailed`.
pub fn spawn_panel(startup: StartupCoordinator, options: PanelOptions) -> (PanelHandle, JoinHandle<()>) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let controller = PanelController::new(startup, options, event_tx);
    let task = tokio::spawn(controller.run(command_rx));

    (
        PanelHandle {
            commands: command_tx,
            events: event_rx,
        },
        task,
    )
}

/// Results of spawned store operations, delivered back to the controller
enum Completion {
    Startup(Result<StartupOutcome, PanelError>),
    Login {
        session: u64,
        result: Result<Account, PanelError>,
    },
    Form {
        generation: u64,
        result: Result<String, PanelError>,
    },
    Accounts {
        session: u64,
        /// Generation of the menu open when the fetch started
        menu: Option<u64>,
        result: Result<Vec<AccountSummary>, PanelError>,
    },
}

/// Coordinators available once startup has finished
struct Services {
    login: Arc<LoginCoordinator>,
    accounts: Arc<AccountCoordinator>,
}

impl Services {
    fn new(app_data: Arc<AppData>) -> Self {
        Self {
            login: Arc::new(LoginCoordinator::new(app_data.clone())),
            accounts: Arc::new(AccountCoordinator::new(app_data)),
        }
    }
}

struct OpenMenu {
    form: AccountForm,
    token: CancellationToken,
    generation: u64,
}

/// Owns all per-session state
///
/// Commands and completions are handled one at a time on the controller
/// task, so session state needs no locking. Store operations run on spawned
/// tasks under a cancellation token: the root token lives as long as the
/// controller, a session child is replaced on every logout, and each open
/// menu gets a grandchild.
pub struct PanelController {
    startup: Arc<StartupCoordinator>,
    services: Option<Services>,
    session: SessionContext,
    open_menu: Option<OpenMenu>,
    dispatch: Arc<DispatchProvider>,
    root_token: CancellationToken,
    session_token: CancellationToken,
    events: UnboundedSender<PanelEvent>,
    completions_tx: UnboundedSender<Completion>,
    completions_rx: Option<UnboundedReceiver<Completion>>,
    in_flight: usize,
    session_generation: u64,
    next_generation: u64,
}

impl PanelController {
    pub fn new(
        startup: StartupCoordinator,
        options: PanelOptions,
        events: UnboundedSender<PanelEvent>,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let root_token = CancellationToken::new();
        let session_token = root_token.child_token();

        Self {
            startup: Arc::new(startup),
            services: None,
            session: SessionContext::new(),
            open_menu: None,
            dispatch: Arc::new(DispatchProvider::new(options.dispatch_timings)),
            root_token,
            session_token,
            events,
            completions_tx,
            completions_rx: Some(completions_rx),
            in_flight: 0,
            session_generation: 0,
            next_generation: 0,
        }
    }

    /// Run until `Shutdown` arrives or every command sender is dropped
    pub async fn run(mut self, mut commands: UnboundedReceiver<PanelCommand>) {
        let Some(mut completions) = self.completions_rx.take() else {
            tracing::error!("Panel controller started twice");
            return;
        };

        self.begin_startup();

        loop {
            tokio::select! {
                Some(completion) = completions.recv() => self.on_completion(completion),
                command = commands.recv() => match command {
                    None | Some(PanelCommand::Shutdown) => break,
                    Some(command) => self.handle(command),
                },
            }
        }

        self.root_token.cancel();
        tracing::info!("Panel session closed");
    }

    fn emit(&self, event: PanelEvent) {
        // UI gone; nothing left to tell
        let _ = self.events.send(event);
    }

    /// Run `operation` on its own task and deliver its result as a completion
    fn spawn_op<T, Fut, W>(
        &mut self,
        name: &'static str,
        token: CancellationToken,
        operation: Fut,
        wrap: W,
    ) where
        T: Send + 'static,
        Fut: Future<Output = Result<T, PanelError>> + Send + 'static,
        W: FnOnce(Result<T, PanelError>) -> Completion + Send + 'static,
    {
        self.in_flight += 1;
        if self.in_flight == 1 {
            self.emit(PanelEvent::Loading(true));
        }

        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                () = token.cancelled() => Err(PanelError::Cancelled),
                result = operation => result,
            };
            if let Err(e) = &result {
                tracing::debug!(operation = name, "Operation ended: {}", e);
            }
            let _ = completions.send(wrap(result));
        });
    }

    fn finish_op(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.in_flight == 0 {
            self.emit(PanelEvent::Loading(false));
        }
    }

    fn begin_startup(&mut self) {
        let startup = self.startup.clone();
        let token = self.root_token.clone();
        self.spawn_op(
            "startup",
            token,
            async move { startup.initialize().await },
            Completion::Startup,
        );
    }

    fn handle(&mut self, command: PanelCommand) {
        tracing::debug!(command = command.name(), "Handling panel command");

        match command {
            PanelCommand::Login { username, password } => self.login(username, password),
            PanelCommand::Logout => self.logout(),
            PanelCommand::OpenMenu(menu) => self.open_menu(menu),
            PanelCommand::CloseMenu => self.close_menu(),
            PanelCommand::ChooseRole(role) => self.choose_role(role),
            PanelCommand::ChooseAction(action) => self.choose_action(action),
            PanelCommand::Submit {
                action,
                username,
                password,
            } => self.submit(action, username, password),
            PanelCommand::RefreshAccounts => self.refresh_accounts(),
            PanelCommand::Dispatch {
                destination,
                option,
            } => self.dispatch(destination, option),
            // Handled by the run loop
            PanelCommand::Shutdown => {}
        }
    }

    fn login(&mut self, username: String, password: String) {
        if let Err(e) = LoginCoordinator::validate_input(&username, &password) {
            self.emit(PanelEvent::LoginFailed(e));
            return;
        }

        let login = match &self.services {
            Some(services) if self.session.is_ready() => services.login.clone(),
            _ => {
                self.emit(PanelEvent::LoginFailed(PanelError::NotReady));
                return;
            }
        };

        // A new login replaces the signed-in session along with its menus
        if self.session.is_signed_in() {
            self.end_session();
            self.emit(PanelEvent::LoggedOut);
        }

        let token = self.session_token.clone();
        let session = self.session_generation;
        self.spawn_op(
            "login",
            token,
            async move { login.login(&username, &password).await },
            move |result| Completion::Login { session, result },
        );
    }

    fn logout(&mut self) {
        self.end_session();
        self.emit(PanelEvent::LoggedOut);
    }

    /// Cancel everything the signed-in session started and forget its menus
    fn end_session(&mut self) {
        tracing::info!(username = ?self.session.username(), "Logged out");
        self.session_token.cancel();
        self.session_token = self.root_token.child_token();
        self.session_generation += 1;
        self.open_menu = None;
        self.session.reset();
    }

    /// The open menu, provided the current role may still use it
    fn checked_menu(&mut self) -> Result<&mut OpenMenu, PanelError> {
        let role = self.session.role();
        let menu = self
            .open_menu
            .as_mut()
            .ok_or(PanelError::MissingField(RequiredField::Menu))?;
        access_provider::check_open(role, menu.form.menu())?;
        Ok(menu)
    }

    fn open_menu(&mut self, menu: Menu) {
        if let Err(error) = access_provider::check_open(self.session.role(), menu) {
            tracing::warn!(menu = %menu, "Refused to open menu");
            self.emit(PanelEvent::MenuRefused { menu, error });
            return;
        }

        if let Some(previous) = self.open_menu.take() {
            previous.token.cancel();
        }

        self.next_generation += 1;
        let form = AccountForm::open(menu);
        self.emit(PanelEvent::MenuOpened(form.view()));
        self.open_menu = Some(OpenMenu {
            form,
            token: self.session_token.child_token(),
            generation: self.next_generation,
        });

        if menu == Menu::Owner {
            self.refresh_accounts();
        }
    }

    fn close_menu(&mut self) {
        if let Some(menu) = self.open_menu.take() {
            menu.token.cancel();
            self.emit(PanelEvent::MenuClosed);
        }
    }

    fn choose_role(&mut self, role: Option<Role>) {
        let event = match self.checked_menu() {
            Ok(menu) => match menu.form.choose_role(role) {
                Ok(()) => PanelEvent::FormChanged(menu.form.view()),
                Err(e) => PanelEvent::FormRejected(e),
            },
            Err(e) => PanelEvent::FormRejected(e),
        };
        self.emit(event);
    }

    fn choose_action(&mut self, action: Option<FormAction>) {
        let event = match self.checked_menu() {
            Ok(menu) => match menu.form.choose_action(action) {
                Ok(()) => PanelEvent::FormChanged(menu.form.view()),
                Err(e) => PanelEvent::FormRejected(e),
            },
            Err(e) => PanelEvent::FormRejected(e),
        };
        self.emit(event);
    }

    /// `action`, when given, is chosen first; the first refusal ends the submit
    fn submit(&mut self, action: Option<FormAction>, username: String, password: String) {
        let Some(accounts) = self.services.as_ref().map(|s| s.accounts.clone()) else {
            self.emit(PanelEvent::FormRejected(PanelError::NotReady));
            return;
        };

        let prepared = self.checked_menu().and_then(|menu| {
            if action.is_some() {
                menu.form.choose_action(action)?;
            }
            let submission = menu.form.begin_submit(&username, &password)?;
            Ok((submission, menu.form.view(), menu.token.clone(), menu.generation))
        });
        let (submission, view, token, generation) = match prepared {
            Ok(prepared) => prepared,
            Err(e) => {
                self.emit(PanelEvent::FormRejected(e));
                return;
            }
        };

        self.emit(PanelEvent::FormChanged(view));

        self.spawn_op(
            "submit",
            token,
            async move { accounts.submit(&submission).await },
            move |result| Completion::Form { generation, result },
        );
    }

    fn refresh_accounts(&mut self) {
        if let Err(error) = access_provider::check_open(self.session.role(), Menu::Owner) {
            self.emit(PanelEvent::AccountsFailed(error));
            return;
        }
        let Some(accounts) = self.services.as_ref().map(|s| s.accounts.clone()) else {
            self.emit(PanelEvent::AccountsFailed(PanelError::NotReady));
            return;
        };

        let (token, menu) = match &self.open_menu {
            Some(menu) => (menu.token.clone(), Some(menu.generation)),
            None => (self.session_token.clone(), None),
        };
        let session = self.session_generation;
        self.spawn_op(
            "list_accounts",
            token,
            async move { accounts.list_accounts().await },
            move |result| Completion::Accounts {
                session,
                menu,
                result,
            },
        );
    }

    fn dispatch(&mut self, destination: String, option: String) {
        if !self.session.is_signed_in() {
            self.emit(PanelEvent::DispatchRejected(PanelError::Forbidden(
                ForbiddenReason::NotSignedIn,
            )));
            return;
        }

        let request = match DispatchRequest::validate(&destination, &option) {
            Ok(request) => request,
            Err(e) => {
                self.emit(PanelEvent::DispatchRejected(e));
                return;
            }
        };

        // Runs to completion on its own; logout does not stop it
        let dispatch = self.dispatch.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            dispatch
                .run(request, |status| {
                    let _ = events.send(PanelEvent::Dispatch(status));
                })
                .await;
        });
    }

    fn on_completion(&mut self, completion: Completion) {
        self.finish_op();

        match completion {
            Completion::Startup(Ok(outcome)) => {
                self.services = Some(Services::new(outcome.app_data));
                self.session.mark_ready(outcome.auth);
                self.emit(PanelEvent::Ready);
                if let Some(error) = outcome.seed_error {
                    self.emit(PanelEvent::SeedFailed(error));
                }
            }
            Completion::Startup(Err(PanelError::Cancelled)) => {}
            Completion::Startup(Err(error)) => {
                tracing::error!("Startup failed: {}", error);
                self.emit(PanelEvent::StartupFailed(error));
            }
            // Finished after a logout; the session it belonged to is gone
            Completion::Login { session, .. } if session != self.session_generation => {}
            Completion::Login { result: Ok(account), .. } => {
                tracing::info!(
                    username = %account.username,
                    identity = ?self.session.auth().map(|a| a.uid.as_str()),
                    "Signed in to the panel"
                );
                self.session.sign_in(account.username.clone(), account.role);
                self.emit(PanelEvent::LoggedIn {
                    username: account.username,
                    role: account.role,
                    visibility: self.session.visibility(),
                });
            }
            Completion::Login { result: Err(PanelError::Cancelled), .. } => {}
            Completion::Login { result: Err(error), .. } => {
                self.emit(PanelEvent::LoginFailed(error))
            }
            Completion::Form { generation, result } => self.on_form_result(generation, result),
            Completion::Accounts {
                session,
                menu,
                result,
            } => self.on_accounts_result(session, menu, result),
        }
    }

    fn on_accounts_result(
        &mut self,
        session: u64,
        menu: Option<u64>,
        result: Result<Vec<AccountSummary>, PanelError>,
    ) {
        // Fetched for a session or menu that is gone
        if session != self.session_generation {
            return;
        }
        if menu.is_some() && menu != self.open_menu.as_ref().map(|m| m.generation) {
            return;
        }

        match result {
            Ok(accounts) => self.emit(PanelEvent::AccountsListed(accounts)),
            Err(PanelError::Cancelled) => {}
            Err(error) => self.emit(PanelEvent::AccountsFailed(error)),
        }
    }

    fn on_form_result(&mut self, generation: u64, result: Result<String, PanelError>) {
        let Some(menu) = self.open_menu.as_mut() else {
            return;
        };
        // Result of a form that has since been closed or reopened
        if menu.generation != generation || matches!(result, Err(PanelError::Cancelled)) {
            return;
        }

        let refresh = match &result {
            Ok(_) => true,
            Err(e) => e.reached_store(),
        };

        menu.form.finish(match &result {
            Ok(message) => FormOutcome::Success(message.clone()),
            Err(e) => FormOutcome::Failure(e.clone()),
        });
        self.emit(PanelEvent::FormResult(result));

        if refresh && self.session.can_open(Menu::Owner) {
            self.refresh_accounts();
        }
    }
}
