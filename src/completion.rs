//==================================================
// File: completion.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Single-shot result delivery from host implementations
// Objective: Guarantee at the type level that a call completes at most once
//==================================================

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use thiserror::Error;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::debug;

use crate::value::Value;

/// Host-visible failures of an individual call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    /// The implementation dropped its [`Completion`] without delivering a value.
    #[error("'{function}' finished without completing its call")]
    Abandoned { function: String },
}

/// Creates the producer/consumer pair for one call of `function`.
pub fn channel(function: &str) -> (Completion, PendingCall) {
    let (sender, receiver) = oneshot::channel();
    (
        Completion {
            sender,
            function: function.to_string(),
        },
        PendingCall {
            receiver,
            function: function.to_string(),
        },
    )
}

//==================================================
// Section 1.0 - Producer
//==================================================

/// Producer side of a call. Consumed by [`Completion::complete`], so a
/// second completion cannot be expressed.
pub struct Completion {
    sender: oneshot::Sender<Value>,
    function: String,
}

impl Completion {
    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn complete(self, value: Value) {
        if self.sender.send(value).is_err() {
            debug!(function = %self.function, "caller dropped the pending call before completion");
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("function", &self.function)
            .finish()
    }
}

//==================================================
// Section 2.0 - Consumer
//==================================================

/// Outstanding call. Resolves once the implementation completes or drops its
/// [`Completion`].
#[derive(Debug)]
pub struct PendingCall {
    receiver: oneshot::Receiver<Value>,
    function: String,
}

impl PendingCall {
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Non-blocking check. `None` while the call is still outstanding.
    ///
    /// Once a result has been returned the call is settled; further calls
    /// report it as abandoned.
    pub fn try_result(&mut self) -> Option<Result<Value, CallError>> {
        match self.receiver.try_recv() {
            Ok(value) => Some(Ok(value)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(self.abandoned())),
        }
    }

    /// Blocks the current thread until the call settles. Must not be used
    /// from inside an async runtime; `.await` the call there instead.
    pub fn wait(self) -> Result<Value, CallError> {
        let function = self.function;
        self.receiver
            .blocking_recv()
            .map_err(|_| CallError::Abandoned { function })
    }

    fn abandoned(&self) -> CallError {
        CallError::Abandoned {
            function: self.function.clone(),
        }
    }
}

impl Future for PendingCall {
    type Output = Result<Value, CallError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(value)) => Poll::Ready(Ok(value)),
            Poll::Ready(Err(_)) => Poll::Ready(Err(self.abandoned())),
            Poll::Pending => Poll::Pending,
        }
    }
}
