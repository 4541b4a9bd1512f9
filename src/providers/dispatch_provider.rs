use std::fmt;
use std::time::Duration;

use tokio::time::{interval_at, sleep, sleep_until, Instant, MissedTickBehavior};

use crate::errors::{PanelError, RequiredField};

/// Fixed schedule of the simulated dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchTimings {
    /// Elapsed-time display granularity
    pub tick: Duration,
    /// Delay before success is reported
    pub completion_delay: Duration,
    /// Delay after success before the status display closes
    pub dismiss_delay: Duration,
}

impl Default for DispatchTimings {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            completion_delay: Duration::from_secs(3),
            dismiss_delay: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    pub destination: String,
    pub option: String,
}

impl DispatchRequest {
    /// Both fields are required; nothing happens if either is empty
    pub fn validate(destination: &str, option: &str) -> Result<Self, PanelError> {
        if destination.is_empty() || option.is_empty() {
            return Err(PanelError::MissingField(RequiredField::DispatchTarget));
        }
        Ok(Self {
            destination: destination.to_owned(),
            option: option.to_owned(),
        })
    }
}

/// Progress of one simulated dispatch, in emission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchStatus {
    Started { destination: String },
    Tick { elapsed_secs: u64 },
    Succeeded { destination: String },
    Dismissed,
}

impl fmt::Display for DispatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchStatus::Started { .. } => write!(f, "Sending..."),
            DispatchStatus::Tick { elapsed_secs } => write!(f, "Time: {} seconds", elapsed_secs),
            DispatchStatus::Succeeded { destination } => {
                write!(f, "Success! Sent to {}", destination)
            }
            DispatchStatus::Dismissed => write!(f, "Status closed"),
        }
    }
}

/// Simulated send with a fake progress timer
///
/// Never contacts anything and has no failure path once the request is valid.
pub struct DispatchProvider {
    timings: DispatchTimings,
}

impl DispatchProvider {
    pub fn new(timings: DispatchTimings) -> Self {
        Self { timings }
    }

    pub fn timings(&self) -> DispatchTimings {
        self.timings
    }

    /// Drive the whole status sequence, reporting each step through `emit`
    ///
    /// The elapsed-time ticker is stopped when success is reported. A tick due
    /// at the same instant as completion is not emitted.
    pub async fn run<F>(&self, request: DispatchRequest, mut emit: F)
    where
        F: FnMut(DispatchStatus) + Send,
    {
        tracing::info!(option = %request.option, "Simulated dispatch started for {}", request.destination);

        emit(DispatchStatus::Started {
            destination: request.destination.clone(),
        });

        let start = Instant::now();
        let mut ticker = interval_at(start + self.timings.tick, self.timings.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let completion = sleep_until(start + self.timings.completion_delay);
        tokio::pin!(completion);

        let mut elapsed_secs = 0;
        loop {
            tokio::select! {
                biased;
                () = &mut completion => break,
                _ = ticker.tick() => {
                    elapsed_secs += 1;
                    emit(DispatchStatus::Tick { elapsed_secs });
                }
            }
        }
        drop(ticker);

        emit(DispatchStatus::Succeeded {
            destination: request.destination.clone(),
        });
        tracing::info!("Simulated dispatch reported success for {}", request.destination);

        sleep(self.timings.dismiss_delay).await;
        emit(DispatchStatus::Dismissed);
    }
}

impl Default for DispatchProvider {
    fn default() -> Self {
        Self::new(DispatchTimings::default())
    }
}
