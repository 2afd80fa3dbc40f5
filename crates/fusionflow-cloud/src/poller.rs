//! Operation poller
//!
//! Waits for an asynchronous operation to reach a terminal state, sleeping
//! with a bounded exponential backoff in between status reads. The whole wait
//! (including any confirmation lookup) is capped by [`PollConfig::timeout`].

use crate::api::{FusionApi, Operation, OperationStatus};
use crate::error::{ProvisionError, Result};
use crate::scope::ResourceKey;
use std::time::Duration;
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, info, warn};

/// Polling cadence and upper bound
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Minimum delay between two status reads
    pub interval: Duration,

    /// Maximum delay between two status reads
    pub max_interval: Duration,

    /// Backoff multiplier
    pub multiplier: f64,

    /// Maximum total wait for a single operation
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(10),
            multiplier: 1.5,
            timeout: Duration::from_secs(600),
        }
    }
}

impl PollConfig {
    /// Backoff delay for the given attempt, clamped to `[interval, max_interval]`
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.max(1.0).powi(attempt.min(64) as i32);
        let delay = self.interval.as_secs_f64() * factor;
        self.clamp(Duration::from_secs_f64(delay.min(self.max_interval.as_secs_f64())))
    }

    /// Delay before the next read, preferring the server's `retry_in` hint
    fn next_delay(&self, attempt: u32, retry_in_ms: Option<u64>) -> Duration {
        match retry_in_ms {
            Some(ms) => self.clamp(Duration::from_millis(ms)),
            None => self.delay_for_attempt(attempt),
        }
    }

    fn clamp(&self, delay: Duration) -> Duration {
        let floor = self.interval;
        let ceiling = self.max_interval.max(floor);
        delay.clamp(floor, ceiling)
    }
}

/// How an awaited operation completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The operation reported success
    Succeeded,
    /// The operation reported failure but the resource exists
    Confirmed,
}

/// Poll `operation` until it is terminal or `config.timeout` elapses
///
/// When `confirm` is given and the operation fails, the resource is looked up
/// once; if it exists the failure is treated as success (e.g. a concurrent
/// creator won the race).
pub async fn await_operation<A>(
    api: &A,
    operation: Operation,
    confirm: Option<&ResourceKey>,
    config: &PollConfig,
) -> Result<PollOutcome>
where
    A: FusionApi + ?Sized,
{
    let operation_id = operation.id.clone();
    let start = Instant::now();

    match timeout(config.timeout, poll_until_terminal(api, operation, confirm, config)).await {
        Ok(result) => result,
        Err(_) => {
            let elapsed = start.elapsed();
            warn!(operation_id = %operation_id, ?elapsed, "Operation timed out");
            Err(ProvisionError::OperationTimedOut {
                operation_id,
                elapsed,
            })
        }
    }
}

async fn poll_until_terminal<A>(
    api: &A,
    mut operation: Operation,
    confirm: Option<&ResourceKey>,
    config: &PollConfig,
) -> Result<PollOutcome>
where
    A: FusionApi + ?Sized,
{
    let mut attempt = 0u32;

    loop {
        match operation.status {
            OperationStatus::Succeeded => {
                debug!(operation_id = %operation.id, "Operation succeeded");
                return Ok(PollOutcome::Succeeded);
            }
            OperationStatus::Failed => return resolve_failure(api, &operation, confirm).await,
            OperationStatus::Pending | OperationStatus::Running => {}
        }

        let delay = config.next_delay(attempt, operation.retry_in);
        debug!(
            operation_id = %operation.id,
            status = %operation.status,
            attempt,
            delay_ms = delay.as_millis() as u64,
            "Waiting for operation"
        );
        sleep(delay).await;
        attempt = attempt.saturating_add(1);

        let id = operation.id.clone();
        operation = api
            .get_operation(&id)
            .await
            .map_err(|source| ProvisionError::OperationFailed {
                operation_id: id,
                resource: confirm.map(|key| key.to_string()),
                reason: format!("could not read operation status: {}", source),
            })?;
    }
}

async fn resolve_failure<A>(
    api: &A,
    operation: &Operation,
    confirm: Option<&ResourceKey>,
) -> Result<PollOutcome>
where
    A: FusionApi + ?Sized,
{
    let error = operation.error.clone().unwrap_or_default();

    if let Some(key) = confirm {
        let found = api.get(key).await.map_err(|source| ProvisionError::Api {
            action: "look up",
            kind: key.kind,
            scope: key.parent.clone(),
            source,
        })?;

        if found.is_some_and(|resource| resource.name == key.name) {
            info!(
                operation_id = %operation.id,
                "Operation reported failure but {} exists",
                key
            );
            return Ok(PollOutcome::Confirmed);
        }

        if error.is_name_reserved() {
            return Err(ProvisionError::NameReserved {
                kind: key.kind,
                name: key.name.clone(),
                scope: key.parent.clone(),
                resource_exists: false,
            });
        }
    }

    Err(ProvisionError::OperationFailed {
        operation_id: operation.id.clone(),
        resource: confirm.map(|key| key.to_string()),
        reason: error.reason(),
    })
}
