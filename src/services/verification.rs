//! Verification helpers built on the poller.
//!
//! Cluster checks mostly look like "list something until at least N of it
//! exists". The listing function comes from the cluster client; these
//! helpers only own the waiting and keep the last listing for assertions.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use crate::domain::errors::WaitError;
use crate::services::poller::{wait_until, wait_until_async, PollReport, PollSchedule};

/// Items seen by the final successful listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub report: PollReport,
}

/// Poll `fetch` until it returns at least `expected` items.
///
/// A fetch error ends the wait immediately as a predicate error.
pub fn wait_for_count<T, E, F>(
    condition: &str,
    schedule: PollSchedule,
    expected: usize,
    mut fetch: F,
) -> Result<Listing<T>, WaitError<E>>
where
    F: FnMut() -> Result<Vec<T>, E>,
    E: std::fmt::Display,
{
    let mut last = Vec::new();
    let report = wait_until(condition, schedule, || {
        last = fetch()?;
        Ok(last.len() >= expected)
    })?;

    Ok(Listing { items: last, report })
}

/// Async form of [`wait_for_count`].
pub async fn wait_for_count_async<T, E, F, Fut>(
    condition: &str,
    schedule: PollSchedule,
    expected: usize,
    mut fetch: F,
) -> Result<Listing<T>, WaitError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
    E: std::fmt::Display,
{
    let last = Mutex::new(Vec::new());
    let report = wait_until_async(condition, schedule, || {
        let pending = fetch();
        let last = &last;
        async move {
            pending.await.map(|items| {
                let ready = items.len() >= expected;
                *last.lock().unwrap_or_else(PoisonError::into_inner) = items;
                ready
            })
        }
    })
    .await?;

    Ok(Listing {
        items: last.into_inner().unwrap_or_else(PoisonError::into_inner),
        report,
    })
}
