//! Operation submission and completion polling
//!
//! An operation is written once (its id is the idempotency key), then read
//! back on a fixed interval until its body reports `done` or `error`. Any
//! failure ends the loop immediately; nothing is retried here.

use crate::client::ProvisioningClient;
use crate::error::{OpsError, Result};
use crate::ids::OperationId;
use crate::operation::{Operation, OwnerRef, STATE_DONE, STATE_ERROR};
use std::time::Duration;
use tokio::time::sleep;

/// Interval between two reads of an in-flight operation
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Whether to wait for the operation to finish after submitting it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitMode {
    /// Poll until a terminal state is reached
    #[default]
    Wait,
    /// Return as soon as the submission is accepted
    FireAndForget,
}

/// Outcome of a single read while polling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    /// Any non-terminal state
    Submitted,
    Done,
    Failed,
}

impl PollStatus {
    pub fn from_state(state: &str) -> Self {
        match state {
            STATE_DONE => PollStatus::Done,
            STATE_ERROR => PollStatus::Failed,
            _ => PollStatus::Submitted,
        }
    }
}

/// Submits operations and waits for them to complete
pub struct OperationRunner<'a> {
    client: &'a dyn ProvisioningClient,
    interval: Duration,
}

impl<'a> OperationRunner<'a> {
    pub fn new(client: &'a dyn ProvisioningClient) -> Self {
        Self {
            client,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Submit the operation, then wait for it unless `mode` is fire-and-forget
    ///
    /// Fire-and-forget returns the operation as acknowledged by the service.
    pub async fn run(&self, operation: Operation, mode: WaitMode) -> Result<Operation> {
        let accepted = self.submit(&operation).await?;
        match mode {
            WaitMode::FireAndForget => Ok(accepted),
            WaitMode::Wait => self.wait(&operation.id).await,
        }
    }

    /// Write the operation once; errors are returned as classified by the client
    pub async fn submit(&self, operation: &Operation) -> Result<Operation> {
        tracing::info!(
            "Submitting {} operation {}",
            operation.body.describe(),
            operation.id
        );
        let accepted = self.client.put_operation(operation).await?;
        tracing::debug!("Operation {} accepted", accepted.id);
        Ok(accepted)
    }

    /// Poll the operation until it reaches a terminal state
    ///
    /// There is no overall deadline. Drop the future (or wrap it in
    /// `tokio::time::timeout`) to stop waiting.
    pub async fn wait(&self, id: &OperationId) -> Result<Operation> {
        let mut reads = 0u32;
        loop {
            sleep(self.interval).await;

            let operation = self.client.get_operation(id).await?;
            reads += 1;

            let (Some(intent), Some(state)) = (operation.body.intent(), operation.body.state())
            else {
                tracing::warn!("Operation {} returned an unrecognized body", id);
                return Err(OpsError::UnknownOperation(id.to_string()));
            };

            match PollStatus::from_state(state) {
                PollStatus::Done => {
                    tracing::info!("Operation {} ({}) done after {} reads", id, intent, reads);
                    return Ok(operation);
                }
                PollStatus::Failed => {
                    tracing::warn!("Operation {} ({}) failed after {} reads", id, intent, reads);
                    return Err(OpsError::OperationFailed { intent });
                }
                PollStatus::Submitted => {
                    tracing::debug!("Operation {} still {} (read {})", id, state, reads);
                }
            }
        }
    }

    /// Operations visible to the caller, filtered to one ownership scope
    pub async fn list_operations(&self, scope: &OwnerRef) -> Result<Vec<Operation>> {
        let operations = self.client.list_operations().await?;
        Ok(filter_by_owner(operations, scope))
    }
}

/// Keep only the operations owned by `scope`
///
/// Bodies this client does not recognize carry no readable owner and are
/// dropped. Bodies with an implied personal owner match any user scope.
pub fn filter_by_owner(operations: Vec<Operation>, scope: &OwnerRef) -> Vec<Operation> {
    operations
        .into_iter()
        .filter(|op| op.owner().is_some_and(|owner| owner.within(scope)))
        .collect()
}
