//! A minimal sequential test harness with scoped benchmarking.
//!
//! Test cases are driven through a fixed lifecycle of hooks
//! (`initialize`/`set_up`/body/`tear_down`/`finalize`), collect their
//! diagnostics into a [`Report`] and may be decomposed into named sub-tests.
//! The benchmark test kind additionally captures wall-clock statistics of
//! labeled scopes via [`ScopedTimer`] and a [`TimingStore`].

pub mod bench;
pub mod case;
pub mod config;
pub mod logger;
pub mod report;
pub mod runner;
pub mod stats;
pub mod ui;

pub use bench::BenchmarkKind;
pub use case::{SubTests, TestCase, TestHooks, TestKind, UnitKind};
pub use report::Report;
pub use runner::{Case, RunSummary, Runner};
pub use stats::{ScopedTimer, TimingEntry, TimingStore};

/// Harness version reported by the runner prolog.
pub const VERSION: &str = "0.1";
