// Common test utilities for integration tests
#![allow(dead_code)]

use std::time::Duration;

use tierdesk::config::PanelSettings;
use tierdesk::coordinators::StartupCoordinator;
use tierdesk::panel::{spawn_panel, PanelCommand, PanelEvent, PanelHandle, PanelOptions};
use tierdesk::providers::DispatchTimings;

pub const MEMORY_STORE: &str =
    r#"{"database_url":"sqlite::memory:","max_connections":1,"min_connections":1}"#;

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings pointing at a fresh in-memory account store
pub fn memory_settings(app_id: &str) -> PanelSettings {
    PanelSettings::new(app_id, Some(MEMORY_STORE.to_string()))
}

/// Dispatch schedule shrunk so tests finish quickly
pub fn fast_timings() -> DispatchTimings {
    DispatchTimings {
        tick: Duration::from_millis(40),
        completion_delay: Duration::from_millis(120),
        dismiss_delay: Duration::from_millis(80),
    }
}

pub fn spawn_with(settings: PanelSettings) -> PanelHandle {
    let options = PanelOptions {
        dispatch_timings: fast_timings(),
    };
    let (handle, _task) = spawn_panel(StartupCoordinator::from_settings(settings), options);
    handle
}

/// Spawn a panel over a fresh store and wait until it is ready
pub async fn start_panel() -> PanelHandle {
    let mut handle = spawn_with(memory_settings("it-app"));
    assert_eq!(next_event(&mut handle).await, PanelEvent::Ready);
    handle
}

/// Next event, skipping loading indicator changes
pub async fn next_event(handle: &mut PanelHandle) -> PanelEvent {
    loop {
        let event = tokio::time::timeout(EVENT_TIMEOUT, handle.next_event())
            .await
            .expect("Timed out waiting for a panel event")
            .expect("Panel closed its event channel");
        if !matches!(event, PanelEvent::Loading(_)) {
            return event;
        }
    }
}

/// Skip events until one matches `predicate`
pub async fn wait_for<F>(handle: &mut PanelHandle, predicate: F) -> PanelEvent
where
    F: Fn(&PanelEvent) -> bool,
{
    loop {
        let event = next_event(handle).await;
        if predicate(&event) {
            return event;
        }
    }
}

pub fn send(handle: &PanelHandle, command: PanelCommand) {
    handle.send(command).expect("Panel stopped accepting commands");
}

pub async fn login(handle: &mut PanelHandle, username: &str, password: &str) -> PanelEvent {
    send(
        handle,
        PanelCommand::Login {
            username: username.to_string(),
            password: password.to_string(),
        },
    );
    next_event(handle).await
}

pub fn submit(handle: &PanelHandle, username: &str, password: &str) {
    send(
        handle,
        PanelCommand::Submit {
            action: None,
            username: username.to_string(),
            password: password.to_string(),
        },
    );
}

/// Submit the open form and return its inline result
///
/// Consumes the `Submitted` form change; a following list refresh is left
/// in the channel.
pub async fn submit_and_wait(
    handle: &mut PanelHandle,
    username: &str,
    password: &str,
) -> PanelEvent {
    submit(handle, username, password);
    wait_for(handle, |e| matches!(e, PanelEvent::FormResult(_))).await
}
