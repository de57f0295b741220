//! Poll-until-ready waiting.
//!
//! A predicate is checked immediately and then once per interval until it
//! reports ready, returns an error, or the timeout elapses. Each wait is
//! sequential: the predicate never runs concurrently with itself, and an
//! in-flight call is never interrupted. A final check runs at the deadline.
//!
//! ```ignore
//! let schedule = PollSchedule::new(Duration::from_secs(30), Duration::from_secs(15 * 60));
//! let report = wait_until("certificate secret", schedule, || {
//!     let secrets = client.list_secrets("openshift-config", "certificate_request")?;
//!     Ok(!secrets.is_empty())
//! })?;
//! ```

use std::future::Future;
use std::time::{Duration, Instant};

use crate::domain::errors::WaitError;
use crate::domain::models::TestConfig;

/// Default interval between checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Interval and timeout for a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollSchedule {
    pub const fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    /// Timeout from `tests.pollingTimeout`, with the given interval.
    pub const fn from_tests(tests: &TestConfig, interval: Duration) -> Self {
        Self::new(interval, tests.polling_timeout)
    }
}

/// Summary of a successful wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollReport {
    /// Number of predicate calls, including the successful one
    pub attempts: u32,
    /// Time from the first call until success
    pub elapsed: Duration,
}

/// What to do after a predicate returned `Ok(false)`.
enum Next {
    Sleep(Duration),
    TimedOut(Duration),
}

/// Bookkeeping shared by the blocking and async loops.
struct PollState<'a> {
    condition: &'a str,
    schedule: PollSchedule,
    started: Instant,
    attempts: u32,
}

impl<'a> PollState<'a> {
    fn start(condition: &'a str, schedule: PollSchedule) -> Self {
        tracing::debug!(
            condition,
            interval_ms = schedule.interval.as_millis() as u64,
            timeout_ms = schedule.timeout.as_millis() as u64,
            "waiting for condition"
        );
        Self {
            condition,
            schedule,
            started: Instant::now(),
            attempts: 0,
        }
    }

    fn record_attempt(&mut self) {
        self.attempts = self.attempts.saturating_add(1);
    }

    fn succeeded(&self) -> PollReport {
        let elapsed = self.started.elapsed();
        tracing::info!(
            condition = self.condition,
            attempts = self.attempts,
            elapsed_ms = elapsed.as_millis() as u64,
            "condition met"
        );
        PollReport {
            attempts: self.attempts,
            elapsed,
        }
    }

    fn failed<E: std::fmt::Display>(&self, error: E) -> WaitError<E> {
        tracing::warn!(
            condition = self.condition,
            attempts = self.attempts,
            error = %error,
            "check failed; not retrying"
        );
        WaitError::Predicate {
            condition: self.condition.to_string(),
            error,
        }
    }

    fn not_ready(&self) -> Next {
        let elapsed = self.started.elapsed();
        if elapsed >= self.schedule.timeout {
            return Next::TimedOut(elapsed);
        }
        let remaining = self.schedule.timeout - elapsed;
        tracing::debug!(
            condition = self.condition,
            attempt = self.attempts,
            remaining_ms = remaining.as_millis() as u64,
            "condition not met yet"
        );
        Next::Sleep(self.schedule.interval.min(remaining))
    }

    fn timed_out<E>(&self, elapsed: Duration) -> WaitError<E> {
        tracing::warn!(
            condition = self.condition,
            attempts = self.attempts,
            elapsed_ms = elapsed.as_millis() as u64,
            "timed out waiting for condition"
        );
        WaitError::TimedOut {
            condition: self.condition.to_string(),
            elapsed,
            attempts: self.attempts,
        }
    }
}

/// Block until `predicate` reports ready, fails, or the timeout elapses.
///
/// * `Ok(true)` ends the wait with a [`PollReport`].
/// * `Err(e)` ends the wait with [`WaitError::Predicate`]; no retries.
/// * Only `Ok(false)` until the deadline ends with [`WaitError::TimedOut`].
pub fn wait_until<F, E>(
    condition: &str,
    schedule: PollSchedule,
    mut predicate: F,
) -> Result<PollReport, WaitError<E>>
where
    F: FnMut() -> Result<bool, E>,
    E: std::fmt::Display,
{
    let mut state = PollState::start(condition, schedule);

    loop {
        state.record_attempt();
        match predicate() {
            Ok(true) => return Ok(state.succeeded()),
            Err(error) => return Err(state.failed(error)),
            Ok(false) => match state.not_ready() {
                Next::Sleep(delay) => std::thread::sleep(delay),
                Next::TimedOut(elapsed) => return Err(state.timed_out(elapsed)),
            },
        }
    }
}

/// Async form of [`wait_until`] for predicates that call async clients.
///
/// Same three outcomes; sleeps use `tokio::time::sleep`.
pub async fn wait_until_async<F, Fut, E>(
    condition: &str,
    schedule: PollSchedule,
    mut predicate: F,
) -> Result<PollReport, WaitError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
    E: std::fmt::Display,
{
    let mut state = PollState::start(condition, schedule);

    loop {
        state.record_attempt();
        match predicate().await {
            Ok(true) => return Ok(state.succeeded()),
            Err(error) => return Err(state.failed(error)),
            Ok(false) => match state.not_ready() {
                Next::Sleep(delay) => tokio::time::sleep(delay).await,
                Next::TimedOut(elapsed) => return Err(state.timed_out(elapsed)),
            },
        }
    }
}
