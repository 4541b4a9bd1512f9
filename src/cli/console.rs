// Interactive console: stdin lines become panel commands, events are printed

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::PanelSettings;
use crate::coordinators::StartupCoordinator;
use crate::panel::{spawn_panel, FormPhase, FormView, PanelCommand, PanelEvent, PanelOptions};
use crate::types::internal::{FormAction, Menu, Role};

pub const HELP: &str = "\
Commands:
  login <username> <password>   sign in
  logout                        sign out and close all menus
  menu <reseller|owner>         open a management menu
  close                         close the open menu
  role <reseller|user|none>     choose the role the form manages
  action <add|delete|none>      choose what the form does
  add <username> <password>     add an account with the chosen role
  delete <username>             delete an account with the chosen role
  submit <username> [password]  submit the form with its current action
  refresh                       reload the account list (owner only)
  send <destination> <option>   simulated dispatch
  help                          show this text
  quit                          end the session";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands.")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Unknown {kind} '{value}'")]
    InvalidValue { kind: &'static str, value: String },
}

/// What one console line asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    Blank,
    Help,
    Commands(Vec<PanelCommand>),
}

/// Parse one console line
///
/// Passwords are everything after the username, so they may contain spaces.
pub fn parse_line(line: &str) -> Result<ConsoleInput, ConsoleError> {
    let line = line.trim_start();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim_start();

    let commands = match word.trim_end() {
        "" => return Ok(ConsoleInput::Blank),
        "help" | "?" => return Ok(ConsoleInput::Help),
        "login" => {
            let (username, password) = split_username(rest);
            vec![PanelCommand::Login { username, password }]
        }
        "logout" => vec![PanelCommand::Logout],
        "menu" => vec![PanelCommand::OpenMenu(parse_menu(rest.trim())?)],
        "close" => vec![PanelCommand::CloseMenu],
        "role" => vec![PanelCommand::ChooseRole(parse_role(rest.trim())?)],
        "action" => vec![PanelCommand::ChooseAction(parse_action(rest.trim())?)],
        "add" => {
            let (username, password) = split_username(rest);
            vec![PanelCommand::Submit {
                action: Some(FormAction::Add),
                username,
                password,
            }]
        }
        "delete" => vec![PanelCommand::Submit {
            action: Some(FormAction::Delete),
            username: rest.trim().to_string(),
            password: String::new(),
        }],
        "submit" => {
            let (username, password) = split_username(rest);
            vec![PanelCommand::Submit {
                action: None,
                username,
                password,
            }]
        }
        "refresh" | "list" => vec![PanelCommand::RefreshAccounts],
        "send" => {
            let mut parts = rest.split_whitespace();
            let destination = parts.next().unwrap_or_default().to_string();
            let option = parts.collect::<Vec<_>>().join(" ");
            vec![PanelCommand::Dispatch {
                destination,
                option,
            }]
        }
        "quit" | "exit" => vec![PanelCommand::Shutdown],
        other => return Err(ConsoleError::UnknownCommand(other.to_string())),
    };

    Ok(ConsoleInput::Commands(commands))
}

fn split_username(rest: &str) -> (String, String) {
    let (username, password) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    (username.to_string(), password.to_string())
}

fn parse_menu(value: &str) -> Result<Menu, ConsoleError> {
    match value {
        "reseller" => Ok(Menu::Reseller),
        "owner" => Ok(Menu::Owner),
        "" => Err(ConsoleError::Usage("menu <reseller|owner>")),
        other => Err(ConsoleError::InvalidValue {
            kind: "menu",
            value: other.to_string(),
        }),
    }
}

fn parse_role(value: &str) -> Result<Option<Role>, ConsoleError> {
    match value {
        "none" => Ok(None),
        "" => Err(ConsoleError::Usage("role <reseller|user|none>")),
        other => other.parse::<Role>().map(Some).map_err(|_| ConsoleError::InvalidValue {
            kind: "role",
            value: other.to_string(),
        }),
    }
}

fn parse_action(value: &str) -> Result<Option<FormAction>, ConsoleError> {
    match value {
        "none" => Ok(None),
        "" => Err(ConsoleError::Usage("action <add|delete|none>")),
        other => other.parse::<FormAction>().map(Some).map_err(|_| ConsoleError::InvalidValue {
            kind: "action",
            value: other.to_string(),
        }),
    }
}

/// Text to print for an event, if any
pub fn render_event(event: &PanelEvent) -> Option<String> {
    let text = match event {
        PanelEvent::Loading(true) => "Loading...".to_string(),
        PanelEvent::Loading(false) => return None,
        PanelEvent::Ready => "Ready. Log in with: login <username> <password>".to_string(),
        PanelEvent::StartupFailed(e) | PanelEvent::LoginFailed(e) => e.message(),
        PanelEvent::SeedFailed(e) => {
            format!("Failed to seed the owner account: {}", e.message())
        }
        PanelEvent::LoggedIn {
            username,
            role,
            visibility,
        } => {
            let mut menus = Vec::new();
            if visibility.reseller_menu {
                menus.push("reseller");
            }
            if visibility.owner_menu {
                menus.push("owner");
            }
            if menus.is_empty() {
                format!("Welcome, {} ({}). No management menus available.", username, role)
            } else {
                format!("Welcome, {} ({}). Menus: {}", username, role, menus.join(", "))
            }
        }
        PanelEvent::LoggedOut => "Logged out.".to_string(),
        PanelEvent::MenuOpened(view) => format!("Opened the {}. {}", view.menu, render_form(view)),
        PanelEvent::MenuRefused { error, .. } => error.message(),
        PanelEvent::MenuClosed => "Menu closed.".to_string(),
        PanelEvent::FormChanged(view) => render_form(view),
        PanelEvent::FormRejected(e) => e.message(),
        PanelEvent::FormResult(Ok(message)) => message.clone(),
        PanelEvent::FormResult(Err(e)) => e.message(),
        PanelEvent::AccountsListed(accounts) if accounts.is_empty() => {
            "No accounts found.".to_string()
        }
        PanelEvent::AccountsListed(accounts) => accounts
            .iter()
            .map(|a| format!("  {}", a))
            .collect::<Vec<_>>()
            .join("\n"),
        PanelEvent::AccountsFailed(e) => format!("Failed to load accounts. {}", e.message()),
        PanelEvent::Dispatch(status) => status.to_string(),
        PanelEvent::DispatchRejected(e) => e.message(),
    };
    Some(text)
}

fn render_form(view: &FormView) -> String {
    if view.phase == FormPhase::Submitted {
        return "Submitting...".to_string();
    }
    if let Some(prompt) = &view.prompt {
        return prompt.clone();
    }
    match view.role {
        Some(role) => format!("Managing {} accounts. Choose an action: add or delete.", role),
        None => {
            let roles = view
                .menu
                .assignable_roles()
                .iter()
                .map(Role::as_str)
                .collect::<Vec<_>>()
                .join(" or ");
            format!("Choose a role first: {}.", roles)
        }
    }
}

/// Run a panel session against stdin/stdout until `quit` or end of input
pub async fn run_console(settings: PanelSettings) -> Result<(), Box<dyn std::error::Error>> {
    let startup = StartupCoordinator::from_settings(settings);
    let (handle, panel_task) = spawn_panel(startup, PanelOptions::default());
    let (commands, mut events) = handle.split();

    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if let Some(text) = render_event(&event) {
                println!("{}", text);
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    'session: while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(ConsoleInput::Blank) => {}
            Ok(ConsoleInput::Help) => println!("{}", HELP),
            Ok(ConsoleInput::Commands(batch)) => {
                for command in batch {
                    let shutdown = command == PanelCommand::Shutdown;
                    if commands.send(command).is_err() || shutdown {
                        break 'session;
                    }
                }
            }
            Err(e) => println!("{}", e),
        }
    }

    // End of input closes the session the same way `quit` does
    let _ = commands.send(PanelCommand::Shutdown);
    drop(commands);
    panel_task.await?;
    printer.await?;

    Ok(())
}
