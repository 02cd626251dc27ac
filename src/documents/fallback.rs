//! Ordered fallback chains.
//!
//! An extractor with several ways of reading a file lists them as named
//! [`Attempt`]s; [`first_success`] runs them in order and stops at the first
//! one that works. Chains are finite and run once: nothing is retried.

use tracing::{debug, warn};

use crate::documents::error::DocumentError;

/// One named strategy in a fallback chain
pub struct Attempt<'a, T> {
    name: &'static str,
    run: Box<dyn FnOnce() -> Result<T, DocumentError> + 'a>,
}

impl<'a, T> Attempt<'a, T> {
    pub fn new(name: &'static str, run: impl FnOnce() -> Result<T, DocumentError> + 'a) -> Self {
        Self {
            name,
            run: Box::new(run),
        }
    }
}

/// The value produced by the winning attempt
#[derive(Debug)]
pub struct Success<T> {
    pub strategy: &'static str,
    pub value: T,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttemptFailure {
    pub strategy: &'static str,
    pub reason: String,
}

/// Every attempt failed; failures are listed in the order they ran
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FallbackExhausted {
    pub failures: Vec<AttemptFailure>,
}

impl std::fmt::Display for FallbackExhausted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let summary = self
            .failures
            .iter()
            .map(|failure| format!("{}: {}", failure.strategy, failure.reason))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{}", summary)
    }
}

pub fn first_success<'a, T>(
    attempts: impl IntoIterator<Item = Attempt<'a, T>>,
) -> Result<Success<T>, FallbackExhausted> {
    let mut exhausted = FallbackExhausted::default();

    for attempt in attempts {
        debug!(strategy = attempt.name, "Trying extraction strategy");
        match (attempt.run)() {
            Ok(value) => {
                debug!(strategy = attempt.name, "Extraction strategy succeeded");
                return Ok(Success {
                    strategy: attempt.name,
                    value,
                });
            }
            Err(e) => {
                warn!(strategy = attempt.name, error = %e, "Extraction strategy failed");
                exhausted.failures.push(AttemptFailure {
                    strategy: attempt.name,
                    reason: e.to_string(),
                });
            }
        }
    }

    Err(exhausted)
}
