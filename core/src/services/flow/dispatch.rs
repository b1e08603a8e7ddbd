//! Running flow operations on their own task

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;

use crate::domain::Operation;
use crate::errors::{FlowError, FlowResult};

/// Handle to a flow operation running on its own task
///
/// Resolves to the operation's result. A task that panicked or was aborted
/// resolves to `RemoteUnavailable`.
#[must_use = "a FlowTask does nothing useful unless awaited"]
pub struct FlowTask<T> {
    operation: Operation,
    handle: JoinHandle<FlowResult<T>>,
}

impl<T> FlowTask<T> {
    /// Operation this task is running
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Whether the operation has completed
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl<T> Future for FlowTask<T> {
    type Output = FlowResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let operation = self.operation;
        match Pin::new(&mut self.handle).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(join_error)) => {
                let message = if join_error.is_panic() {
                    "operation panicked"
                } else {
                    "operation was cancelled"
                };
                tracing::error!(
                    operation = operation.as_str(),
                    error = %join_error,
                    event = "operation_task_failed",
                    "Flow operation task did not complete"
                );
                Poll::Ready(Err(FlowError::RemoteUnavailable {
                    operation,
                    message: message.to_string(),
                }))
            }
        }
    }
}

/// Spawn `future` as the execution of `operation`
///
/// Must be called from within a tokio runtime.
pub fn dispatch<F, T>(operation: Operation, future: F) -> FlowTask<T>
where
    F: Future<Output = FlowResult<T>> + Send + 'static,
    T: Send + 'static,
{
    tracing::debug!(operation = operation.as_str(), "Dispatching flow operation");
    FlowTask {
        operation,
        handle: tokio::spawn(future),
    }
}
