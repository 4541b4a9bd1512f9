mod common;

use common::*;
use tierdesk::config::PanelSettings;
use tierdesk::errors::{ForbiddenReason, PanelError, RequiredField};
use tierdesk::panel::{FormPhase, PanelCommand, PanelEvent};
use tierdesk::providers::DispatchStatus;
use tierdesk::types::internal::{FormAction, Menu, MenuVisibility, Role};

fn usernames(event: &PanelEvent) -> Vec<String> {
    match event {
        PanelEvent::AccountsListed(accounts) => {
            accounts.iter().map(|a| a.username.clone()).collect()
        }
        other => panic!("expected an account list, got {:?}", other),
    }
}

async fn open_owner_menu_with_role(handle: &mut tierdesk::panel::PanelHandle, role: Role) {
    send(handle, PanelCommand::OpenMenu(Menu::Owner));
    assert!(matches!(next_event(handle).await, PanelEvent::MenuOpened(_)));
    wait_for(handle, |e| matches!(e, PanelEvent::AccountsListed(_))).await;
    send(handle, PanelCommand::ChooseRole(Some(role)));
    assert!(matches!(next_event(handle).await, PanelEvent::FormChanged(_)));
}

async fn choose_action(handle: &mut tierdesk::panel::PanelHandle, action: FormAction) {
    send(handle, PanelCommand::ChooseAction(Some(action)));
    match next_event(handle).await {
        PanelEvent::FormChanged(view) => assert_eq!(view.phase, FormPhase::ActionChosen),
        other => panic!("expected form change, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_store_configuration_fails_startup() {
    let mut handle = spawn_with(PanelSettings::new("it-app", None));

    assert_eq!(
        next_event(&mut handle).await,
        PanelEvent::StartupFailed(PanelError::MissingConfiguration)
    );

    // Session stays up but never becomes ready
    assert_eq!(
        login(&mut handle, "admin", "admin123").await,
        PanelEvent::LoginFailed(PanelError::NotReady)
    );
}

#[tokio::test]
async fn test_empty_credentials_rejected_before_readiness() {
    let mut handle = spawn_with(memory_settings("it-app"));

    send(
        &handle,
        PanelCommand::Login {
            username: String::new(),
            password: "admin123".into(),
        },
    );

    let event = wait_for(&mut handle, |e| matches!(e, PanelEvent::LoginFailed(_))).await;
    assert_eq!(
        event,
        PanelEvent::LoginFailed(PanelError::MissingField(RequiredField::Credentials))
    );
}

#[tokio::test]
async fn test_seeded_owner_logs_in_with_both_menus() {
    let mut handle = start_panel().await;

    assert_eq!(
        login(&mut handle, "admin", "admin123").await,
        PanelEvent::LoggedIn {
            username: "admin".into(),
            role: Role::Owner,
            visibility: MenuVisibility {
                reseller_menu: true,
                owner_menu: true,
            },
        }
    );
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let mut handle = start_panel().await;

    assert_eq!(
        login(&mut handle, "admin", "wrong").await,
        PanelEvent::LoginFailed(PanelError::InvalidCredentials)
    );
    assert_eq!(
        login(&mut handle, "nobody", "admin123").await,
        PanelEvent::LoginFailed(PanelError::InvalidCredentials)
    );
}

#[tokio::test]
async fn test_owner_menu_lists_accounts_sorted() {
    let mut handle = start_panel().await;
    login(&mut handle, "admin", "admin123").await;
    open_owner_menu_with_role(&mut handle, Role::User).await;
    choose_action(&mut handle, FormAction::Add).await;

    for name in ["bob", "alice", "carol"] {
        let result = submit_and_wait(&mut handle, name, "pw").await;
        assert_eq!(
            result,
            PanelEvent::FormResult(Ok(format!("Account {} (user) added successfully!", name)))
        );
        wait_for(&mut handle, |e| matches!(e, PanelEvent::AccountsListed(_))).await;
    }

    // Reopening fetches a fresh list
    send(&handle, PanelCommand::CloseMenu);
    assert_eq!(next_event(&mut handle).await, PanelEvent::MenuClosed);
    send(&handle, PanelCommand::OpenMenu(Menu::Owner));
    assert!(matches!(next_event(&mut handle).await, PanelEvent::MenuOpened(_)));

    let listed = next_event(&mut handle).await;
    assert_eq!(usernames(&listed), vec!["admin", "alice", "bob", "carol"]);
}

#[tokio::test]
async fn test_owner_form_requires_role_first() {
    let mut handle = start_panel().await;
    login(&mut handle, "admin", "admin123").await;

    send(&handle, PanelCommand::OpenMenu(Menu::Owner));
    match next_event(&mut handle).await {
        PanelEvent::MenuOpened(view) => {
            assert_eq!(view.phase, FormPhase::Unopened);
            assert_eq!(view.role, None);
        }
        other => panic!("expected menu opened, got {:?}", other),
    }
    wait_for(&mut handle, |e| matches!(e, PanelEvent::AccountsListed(_))).await;

    send(&handle, PanelCommand::ChooseAction(Some(FormAction::Delete)));
    assert_eq!(
        next_event(&mut handle).await,
        PanelEvent::FormRejected(PanelError::MissingField(RequiredField::Role))
    );
}

#[tokio::test]
async fn test_duplicate_add_refreshes_list() {
    let mut handle = start_panel().await;
    login(&mut handle, "admin", "admin123").await;
    open_owner_menu_with_role(&mut handle, Role::Reseller).await;
    choose_action(&mut handle, FormAction::Add).await;

    let result = submit_and_wait(&mut handle, "admin", "x").await;
    assert_eq!(
        result,
        PanelEvent::FormResult(Err(PanelError::AlreadyExists {
            username: "admin".into()
        }))
    );

    let listed = next_event(&mut handle).await;
    assert_eq!(usernames(&listed), vec!["admin"]);
}

#[tokio::test]
async fn test_owner_account_cannot_be_deleted() {
    let mut handle = start_panel().await;
    login(&mut handle, "admin", "admin123").await;
    open_owner_menu_with_role(&mut handle, Role::Reseller).await;
    choose_action(&mut handle, FormAction::Delete).await;

    let result = submit_and_wait(&mut handle, "admin", "").await;
    assert_eq!(
        result,
        PanelEvent::FormResult(Err(PanelError::Forbidden(ForbiddenReason::OwnerProtected)))
    );
}

#[tokio::test]
async fn test_reseller_session() {
    let mut handle = start_panel().await;
    login(&mut handle, "admin", "admin123").await;

    // Owner creates a reseller and a second reseller to try deleting later
    open_owner_menu_with_role(&mut handle, Role::Reseller).await;
    choose_action(&mut handle, FormAction::Add).await;
    for name in ["rita", "rudy"] {
        assert!(matches!(
            submit_and_wait(&mut handle, name, "pw").await,
            PanelEvent::FormResult(Ok(_))
        ));
        wait_for(&mut handle, |e| matches!(e, PanelEvent::AccountsListed(_))).await;
    }

    send(&handle, PanelCommand::Logout);
    assert_eq!(next_event(&mut handle).await, PanelEvent::LoggedOut);

    assert_eq!(
        login(&mut handle, "rita", "pw").await,
        PanelEvent::LoggedIn {
            username: "rita".into(),
            role: Role::Reseller,
            visibility: MenuVisibility {
                reseller_menu: true,
                owner_menu: false,
            },
        }
    );

    send(&handle, PanelCommand::OpenMenu(Menu::Owner));
    assert_eq!(
        next_event(&mut handle).await,
        PanelEvent::MenuRefused {
            menu: Menu::Owner,
            error: PanelError::Forbidden(ForbiddenReason::MenuRestricted { menu: Menu::Owner }),
        }
    );

    send(&handle, PanelCommand::OpenMenu(Menu::Reseller));
    match next_event(&mut handle).await {
        PanelEvent::MenuOpened(view) => {
            assert_eq!(view.menu, Menu::Reseller);
            assert_eq!(view.role, Some(Role::User));
        }
        other => panic!("expected menu opened, got {:?}", other),
    }

    send(&handle, PanelCommand::ChooseRole(Some(Role::Reseller)));
    assert!(matches!(
        next_event(&mut handle).await,
        PanelEvent::FormRejected(PanelError::Forbidden(ForbiddenReason::RoleNotAssignable { .. }))
    ));

    choose_action(&mut handle, FormAction::Add).await;
    assert_eq!(
        submit_and_wait(&mut handle, "uma", "pw").await,
        PanelEvent::FormResult(Ok("Account uma (user) added successfully!".into()))
    );

    choose_action(&mut handle, FormAction::Delete).await;
    assert_eq!(
        submit_and_wait(&mut handle, "rudy", "").await,
        PanelEvent::FormResult(Err(PanelError::Forbidden(ForbiddenReason::RoleMismatch {
            actual: Role::Reseller,
            expected: Role::User,
        })))
    );
    assert_eq!(
        submit_and_wait(&mut handle, "ghost", "").await,
        PanelEvent::FormResult(Err(PanelError::NotFound {
            username: "ghost".into()
        }))
    );
    assert_eq!(
        submit_and_wait(&mut handle, "uma", "").await,
        PanelEvent::FormResult(Ok("Account uma deleted successfully!".into()))
    );

    // Resellers never receive the owner list
    send(&handle, PanelCommand::RefreshAccounts);
    assert!(matches!(
        next_event(&mut handle).await,
        PanelEvent::AccountsFailed(PanelError::Forbidden(_))
    ));
}

#[tokio::test]
async fn test_logout_closes_menus() {
    let mut handle = start_panel().await;
    login(&mut handle, "admin", "admin123").await;

    send(&handle, PanelCommand::OpenMenu(Menu::Reseller));
    assert!(matches!(next_event(&mut handle).await, PanelEvent::MenuOpened(_)));

    send(&handle, PanelCommand::Logout);
    assert_eq!(next_event(&mut handle).await, PanelEvent::LoggedOut);

    send(&handle, PanelCommand::ChooseAction(Some(FormAction::Add)));
    assert_eq!(
        next_event(&mut handle).await,
        PanelEvent::FormRejected(PanelError::MissingField(RequiredField::Menu))
    );

    send(&handle, PanelCommand::OpenMenu(Menu::Reseller));
    assert!(matches!(
        next_event(&mut handle).await,
        PanelEvent::MenuRefused { .. }
    ));

    // The store connection survives logout
    assert!(matches!(
        login(&mut handle, "admin", "admin123").await,
        PanelEvent::LoggedIn { .. }
    ));
}

#[tokio::test]
async fn test_dispatch_requires_sign_in_and_fields() {
    let mut handle = start_panel().await;

    send(
        &handle,
        PanelCommand::Dispatch {
            destination: "6281234567890".into(),
            option: "promo".into(),
        },
    );
    assert_eq!(
        next_event(&mut handle).await,
        PanelEvent::DispatchRejected(PanelError::Forbidden(ForbiddenReason::NotSignedIn))
    );

    login(&mut handle, "admin", "admin123").await;
    send(
        &handle,
        PanelCommand::Dispatch {
            destination: "6281234567890".into(),
            option: String::new(),
        },
    );
    assert_eq!(
        next_event(&mut handle).await,
        PanelEvent::DispatchRejected(PanelError::MissingField(RequiredField::DispatchTarget))
    );
}

#[tokio::test]
async fn test_dispatch_reports_success() {
    let mut handle = start_panel().await;
    login(&mut handle, "admin", "admin123").await;

    send(
        &handle,
        PanelCommand::Dispatch {
            destination: "6281234567890".into(),
            option: "promo".into(),
        },
    );

    let mut statuses = Vec::new();
    loop {
        match next_event(&mut handle).await {
            PanelEvent::Dispatch(status) => {
                let done = status == DispatchStatus::Dismissed;
                statuses.push(status);
                if done {
                    break;
                }
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    assert_eq!(
        statuses.first(),
        Some(&DispatchStatus::Started {
            destination: "6281234567890".into()
        })
    );
    let n = statuses.len();
    assert_eq!(
        statuses[n - 2],
        DispatchStatus::Succeeded {
            destination: "6281234567890".into()
        }
    );

    // Only ticks in between, counting up, and none after success
    let ticks: Vec<u64> = statuses[1..n - 2]
        .iter()
        .map(|s| match s {
            DispatchStatus::Tick { elapsed_secs } => *elapsed_secs,
            other => panic!("unexpected status {:?}", other),
        })
        .collect();
    assert!(ticks.len() <= 2);
    assert!(ticks.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_login_while_signed_in_replaces_session() {
    let mut handle = start_panel().await;
    login(&mut handle, "admin", "admin123").await;

    open_owner_menu_with_role(&mut handle, Role::Reseller).await;
    choose_action(&mut handle, FormAction::Add).await;
    assert!(matches!(
        submit_and_wait(&mut handle, "rex", "pw").await,
        PanelEvent::FormResult(Ok(_))
    ));
    wait_for(&mut handle, |e| matches!(e, PanelEvent::AccountsListed(_))).await;

    send(&handle, PanelCommand::ChooseRole(Some(Role::User)));
    wait_for(&mut handle, |e| matches!(e, PanelEvent::FormChanged(_))).await;
    choose_action(&mut handle, FormAction::Add).await;
    assert!(matches!(
        submit_and_wait(&mut handle, "ursula", "pw").await,
        PanelEvent::FormResult(Ok(_))
    ));
    wait_for(&mut handle, |e| matches!(e, PanelEvent::AccountsListed(_))).await;

    // No logout in between
    assert_eq!(login(&mut handle, "ursula", "pw").await, PanelEvent::LoggedOut);
    assert!(matches!(
        next_event(&mut handle).await,
        PanelEvent::LoggedIn { role: Role::User, .. }
    ));

    send(
        &handle,
        PanelCommand::Submit {
            action: Some(FormAction::Delete),
            username: "rex".into(),
            password: String::new(),
        },
    );
    assert_eq!(
        next_event(&mut handle).await,
        PanelEvent::FormRejected(PanelError::MissingField(RequiredField::Menu))
    );

    send(&handle, PanelCommand::OpenMenu(Menu::Owner));
    assert!(matches!(
        next_event(&mut handle).await,
        PanelEvent::MenuRefused { menu: Menu::Owner, .. }
    ));

    // rex survived the attempt
    assert_eq!(login(&mut handle, "admin", "admin123").await, PanelEvent::LoggedOut);
    assert!(matches!(next_event(&mut handle).await, PanelEvent::LoggedIn { .. }));
    send(&handle, PanelCommand::OpenMenu(Menu::Owner));
    let listed = wait_for(&mut handle, |e| matches!(e, PanelEvent::AccountsListed(_))).await;
    assert!(usernames(&listed).contains(&"rex".to_string()));
}

#[tokio::test]
async fn test_list_does_not_outlive_its_session() {
    let mut handle = start_panel().await;
    login(&mut handle, "admin", "admin123").await;

    send(&handle, PanelCommand::OpenMenu(Menu::Owner));
    send(&handle, PanelCommand::Logout);
    // Refused without a session; marks the end of the batch
    send(
        &handle,
        PanelCommand::Dispatch {
            destination: String::new(),
            option: String::new(),
        },
    );

    let mut events = Vec::new();
    loop {
        let event = next_event(&mut handle).await;
        let done = matches!(event, PanelEvent::DispatchRejected(_));
        events.push(event);
        if done {
            break;
        }
    }

    let logged_out = events
        .iter()
        .position(|e| *e == PanelEvent::LoggedOut)
        .expect("logout event");
    assert!(!events[logged_out..]
        .iter()
        .any(|e| matches!(e, PanelEvent::AccountsListed(_))));

    // Nothing arrives late either
    let late = tokio::time::timeout(std::time::Duration::from_millis(100), async {
        wait_for(&mut handle, |e| matches!(e, PanelEvent::AccountsListed(_))).await
    })
    .await;
    assert!(late.is_err());
}

#[tokio::test]
async fn test_submit_with_action_rejects_once_without_role() {
    let mut handle = start_panel().await;
    login(&mut handle, "admin", "admin123").await;

    send(&handle, PanelCommand::OpenMenu(Menu::Owner));
    wait_for(&mut handle, |e| matches!(e, PanelEvent::AccountsListed(_))).await;

    send(
        &handle,
        PanelCommand::Submit {
            action: Some(FormAction::Add),
            username: "bob".into(),
            password: "pw".into(),
        },
    );
    assert_eq!(
        next_event(&mut handle).await,
        PanelEvent::FormRejected(PanelError::MissingField(RequiredField::Role))
    );

    send(&handle, PanelCommand::CloseMenu);
    assert_eq!(next_event(&mut handle).await, PanelEvent::MenuClosed);
}
