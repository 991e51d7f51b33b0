//! The benchmark test kind.
//!
//! A benchmark case runs the ordinary test lifecycle, but every phase gets a
//! timing store of its own: the store is cleared right before each phase's
//! `set_up` and, after the phase's `tear_down`, whatever the phase captured
//! with [`ScopedTimer`]s is appended to the case's info messages and cleared
//! again. Results therefore never leak between phases or between cases,
//! whatever order they run in.

use std::rc::Rc;

use crate::case::{TestCase, TestHooks, TestKind};
use crate::report::Report;
use crate::stats::TimingStore;

pub struct BenchmarkKind {
    store: Rc<TimingStore>,
}

impl BenchmarkKind {
    /// A benchmark kind backed by the process-wide store. This is what
    /// scope timers created with [`ScopedTimer::new`] report into.
    ///
    /// [`ScopedTimer::new`]: crate::stats::ScopedTimer::new
    pub fn new() -> Self {
        Self::with_store(TimingStore::shared())
    }

    /// A benchmark kind backed by an explicit store, for isolated execution.
    pub fn with_store(store: Rc<TimingStore>) -> Self {
        BenchmarkKind { store }
    }
}

impl Default for BenchmarkKind {
    fn default() -> Self {
        BenchmarkKind::new()
    }
}

impl TestKind for BenchmarkKind {
    fn pre_set_up(&mut self, _report: &mut Report) {
        // Previous phases must not leave samples behind.
        self.store.clear();
    }

    fn post_tear_down(&mut self, scope: &str, report: &mut Report) {
        if self.store.is_empty() {
            return;
        }

        report.add_info(format!("  <{}> scope timers:", scope));

        for entry in self.store.snapshot() {
            report.add_info(format!(
                "    {}: iterations: {}, durations min/max/avg: {:?}/{:?}/{:?}, total: {:?}",
                entry.label(),
                entry.iterations(),
                entry.min(),
                entry.max(),
                entry.average(),
                entry.total(),
            ));
        }

        report.add_info("");

        self.store.clear();
    }
}

impl<H: TestHooks> TestCase<H> {
    /// Creates a benchmark case reporting into the process-wide store.
    pub fn benchmark(hooks: H) -> Self {
        TestCase::with_kind(hooks, Box::new(BenchmarkKind::new()))
    }

    /// Creates a benchmark case reporting into the given store.
    pub fn benchmark_with_store(hooks: H, store: Rc<TimingStore>) -> Self {
        TestCase::with_kind(hooks, Box::new(BenchmarkKind::with_store(store)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use crate::case::SubTests;
    use crate::stats::ScopedTimer;

    struct Timed {
        store: Rc<TimingStore>,
    }

    impl TestHooks for Timed {
        fn initialize(&mut self, sub_tests: &mut SubTests<Self>) {
            sub_tests.add("timed", |hooks: &mut Self, _report| {
                let _timer = ScopedTimer::with_store(Rc::clone(&hooks.store), "work");
                true
            });
        }
    }

    fn benchmark_case(store: &Rc<TimingStore>) -> TestCase<Timed> {
        TestCase::benchmark_with_store(
            Timed {
                store: Rc::clone(store),
            },
            Rc::clone(store),
        )
    }

    #[test]
    fn captured_scopes_are_reported_and_cleared() {
        let store = Rc::new(TimingStore::new());
        let mut case = benchmark_case(&store).with_source_file("timed.rs");

        assert!(case.run());

        let infos = case.info_messages();
        assert!(infos
            .iter()
            .any(|message| message.contains("<timed.rs::timed> scope timers:")));
        assert!(infos
            .iter()
            .any(|message| message.contains("work: iterations: 1")));

        // Nothing leaks into the next phase or case.
        assert!(store.is_empty());
    }

    #[test]
    fn stale_samples_are_dropped_before_each_phase() {
        let store = Rc::new(TimingStore::new());

        store.enter("stale");
        store.record("stale", Duration::from_millis(7));

        let mut case = benchmark_case(&store).with_source_file("timed.rs");
        assert!(case.run());

        assert!(case
            .info_messages()
            .iter()
            .all(|message| !message.contains("stale")));
    }

    #[test]
    fn phases_without_samples_stay_silent() {
        struct Quiet;

        impl TestHooks for Quiet {}

        let store = Rc::new(TimingStore::new());
        let mut case = TestCase::benchmark_with_store(Quiet, Rc::clone(&store));

        assert!(case.run());
        assert!(case.info_messages().is_empty());
    }

    #[test]
    fn main_phase_uses_the_source_file_as_scope() {
        struct MainTimed {
            store: Rc<TimingStore>,
        }

        impl TestHooks for MainTimed {
            fn test_method(&mut self, _report: &mut Report) -> bool {
                let _timer = ScopedTimer::with_store(Rc::clone(&self.store), "main-work");
                true
            }
        }

        let store = Rc::new(TimingStore::new());
        let mut case = TestCase::benchmark_with_store(
            MainTimed {
                store: Rc::clone(&store),
            },
            Rc::clone(&store),
        )
        .with_source_file("src/bench_demo.rs");

        assert!(case.run());
        assert!(case
            .info_messages()
            .iter()
            .any(|message| message.contains("<bench_demo.rs> scope timers:")));
    }
}
