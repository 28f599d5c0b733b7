#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Run history system that turns completed runs into persisted summaries.
//!
//! The recorder observes world events. Every [`Event::RunCompleted`] becomes a
//! [`RunSummary`] built from the parameters of the run and its reported
//! duration, numbered from one upwards and appended to an injected
//! [`RunStore`]. The [`csv`] module serialises the accumulated history.

pub mod csv;

use std::io;

use solar_sweep_core::{Event, RunParameters, RunSummary};
use thiserror::Error;

/// Storage backend that accumulates finished runs.
pub trait RunStore {
    /// Appends a summary to the end of the history.
    fn append(&mut self, summary: RunSummary);

    /// Returns every stored summary in recording order.
    fn runs(&self) -> &[RunSummary];
}

/// Run store that keeps the history in memory for the lifetime of the process.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryRunStore {
    runs: Vec<RunSummary>,
}

impl MemoryRunStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RunStore for MemoryRunStore {
    fn append(&mut self, summary: RunSummary) {
        self.runs.push(summary);
    }

    fn runs(&self) -> &[RunSummary] {
        &self.runs
    }
}

/// Errors raised while persisting the run history.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// Writing the history file failed.
    #[error("failed to write run history to {path}")]
    Io {
        /// Destination that could not be written.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Pure recorder system that appends a summary for every completed run.
#[derive(Debug)]
pub struct RunRecorder<S = MemoryRunStore> {
    store: S,
    parameters: RunParameters,
}

impl<S: RunStore> RunRecorder<S> {
    /// Creates a recorder writing into `store`, describing runs with `parameters`.
    #[must_use]
    pub fn new(store: S, parameters: RunParameters) -> Self {
        Self { store, parameters }
    }

    /// Parameters attached to the next recorded run.
    #[must_use]
    pub fn parameters(&self) -> &RunParameters {
        &self.parameters
    }

    /// Replaces the parameters attached to subsequently recorded runs.
    pub fn set_parameters(&mut self, parameters: RunParameters) {
        self.parameters = parameters;
    }

    /// Every summary recorded so far.
    #[must_use]
    pub fn runs(&self) -> &[RunSummary] {
        self.store.runs()
    }

    /// Borrows the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Releases the underlying store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// Consumes world events and records a summary per completed run.
    ///
    /// Newly recorded summaries are also appended to `out`.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<RunSummary>) {
        for event in events {
            let Event::RunCompleted {
                run,
                reported,
                reason,
                ..
            } = event
            else {
                continue;
            };

            let run_number = next_run_number(self.store.runs().len());
            let summary = RunSummary::from_parameters(run_number, *reported, &self.parameters);
            tracing::info!(
                run_number,
                world_run = run.get(),
                ?reason,
                elapsed = %csv::format_elapsed(*reported),
                "recorded run"
            );
            self.store.append(summary.clone());
            out.push(summary);
        }
    }
}

fn next_run_number(recorded: usize) -> u32 {
    u32::try_from(recorded)
        .map(|count| count.saturating_add(1))
        .unwrap_or(u32::MAX)
}
