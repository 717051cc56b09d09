//! Timing interception.
//!
//! A [`TimingInterceptor`] wraps an operation, measures wall-clock time and emits one
//! `INFO` event on the [`TIMING_TARGET`] target when the operation succeeds. Failures
//! pass through untouched and are not timed. Which operations are wrapped is decided by
//! the interceptor's pointcut, a predicate over the [`Invocation`].
//!
//! ```ignore
//! use axum_helpers::interceptor::{Invocation, TimingInterceptor};
//!
//! let controllers = TimingInterceptor::matching_prefix("controller", "UserController::");
//! let user = controllers
//!     .around(
//!         Invocation::new("UserController::update_user").arg(&id).arg(&body),
//!         service.update_user(id, body),
//!     )
//!     .await?;
//! ```

pub mod client;

pub use client::InterceptedClient;

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

/// Target of every timing event.
pub const TIMING_TARGET: &str = "timing";

/// Identity and argument values of one wrapped call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    signature: String,
    args: Vec<String>,
}

impl Invocation {
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            args: Vec::new(),
        }
    }

    /// Appends an argument, rendered with `Debug`.
    pub fn arg<A: fmt::Debug + ?Sized>(mut self, value: &A) -> Self {
        self.args.push(format!("{value:?}"));
        self
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Arguments as `[a, b]`
    pub fn rendered_args(&self) -> String {
        format!("[{}]", self.args.join(", "))
    }
}

type Pointcut = Arc<dyn Fn(&Invocation) -> bool + Send + Sync>;

/// Wraps matching invocations and logs how long successful ones took.
#[derive(Clone)]
pub struct TimingInterceptor {
    label: &'static str,
    pointcut: Pointcut,
}

impl TimingInterceptor {
    pub fn new<P>(label: &'static str, pointcut: P) -> Self
    where
        P: Fn(&Invocation) -> bool + Send + Sync + 'static,
    {
        Self {
            label,
            pointcut: Arc::new(pointcut),
        }
    }

    /// Applies to every invocation whose signature starts with `prefix`.
    pub fn matching_prefix(label: &'static str, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self::new(label, move |invocation| {
            invocation.signature().starts_with(&prefix)
        })
    }

    /// Every call made through an [`InterceptedClient`].
    pub fn http_client() -> Self {
        Self::matching_prefix("HTTP client method", InterceptedClient::SIGNATURE_PREFIX)
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn applies_to(&self, invocation: &Invocation) -> bool {
        (self.pointcut)(invocation)
    }

    /// Runs `call`, timing it when the pointcut matches.
    ///
    /// The result is returned as-is. Only `Ok` results produce a timing event.
    pub async fn around<T, E, F>(&self, invocation: Invocation, call: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        if !self.applies_to(&invocation) {
            return call.await;
        }

        let start = Instant::now();
        let value = call.await?;
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        tracing::info!(
            target: TIMING_TARGET,
            interceptor = self.label,
            signature = invocation.signature(),
            args = %invocation.rendered_args(),
            elapsed_ms,
            "Execution time of {} {} with args {} :: {} ms",
            self.label,
            invocation.signature(),
            invocation.rendered_args(),
            elapsed_ms
        );

        Ok(value)
    }
}

impl fmt::Debug for TimingInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimingInterceptor")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
