//! Wall-clock statistics of labeled scopes.
//!
//! A [`TimingStore`] maps a label to the aggregate statistics of all scopes
//! measured under that label. Scopes are measured by [`ScopedTimer`], a guard
//! that registers an iteration when it is created and folds the elapsed time
//! into the label's total/min/max when it is dropped. Timers can share one
//! explicitly constructed store, or fall back to the process-wide instance
//! returned by [`TimingStore::shared`].
//!
//! The store performs no locking. The whole harness executes on a single
//! thread and the shared instance is thread-local, so no entry is ever
//! touched from two threads.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

thread_local! {
    static SHARED: Rc<TimingStore> = Rc::new(TimingStore::new());
}

/// Aggregate statistics of one label.
#[derive(Clone, Debug)]
pub struct TimingEntry {
    label: String,
    total: Duration,
    min: Duration,
    max: Duration,
    iterations: u64,
}

impl TimingEntry {
    fn new<S: Into<String>>(label: S) -> Self {
        TimingEntry {
            label: label.into(),
            total: Duration::ZERO,
            // Lowered by the first recorded sample.
            min: Duration::MAX,
            max: Duration::ZERO,
            iterations: 0,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    /// Shortest recorded sample. Meaningful only once a sample has been
    /// recorded; until then it holds the maximum representable duration.
    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Number of times a scope was entered under this label.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Total duration divided by the number of iterations, zero when nothing
    /// was measured yet.
    pub fn average(&self) -> Duration {
        if self.iterations == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos((self.total.as_nanos() / u128::from(self.iterations)) as u64)
        }
    }

    fn reset(&mut self) {
        self.total = Duration::ZERO;
        self.min = Duration::MAX;
        self.max = Duration::ZERO;
        self.iterations = 0;
    }

    fn record(&mut self, elapsed: Duration) {
        self.total += elapsed;

        if elapsed < self.min {
            self.min = elapsed;
        }
        if elapsed > self.max {
            self.max = elapsed;
        }
    }
}

/// Mapping from a label to its aggregate timing statistics.
pub struct TimingStore {
    entries: RefCell<BTreeMap<String, TimingEntry>>,
}

impl TimingStore {
    pub fn new() -> Self {
        TimingStore {
            entries: RefCell::new(BTreeMap::new()),
        }
    }

    /// The process-wide store used by [`ScopedTimer::new`]. One instance per
    /// thread; the harness itself never runs on more than one.
    pub fn shared() -> Rc<TimingStore> {
        SHARED.with(|shared| Rc::clone(shared))
    }

    // Fetches or creates the entry for the label and registers one more pass
    // through its scope. The elapsed time of that pass arrives separately via
    // `record` when the scope is left.
    pub(crate) fn enter(&self, label: &str) {
        let mut entries = self.entries.borrow_mut();
        let entry = entries
            .entry(label.to_string())
            .or_insert_with(|| TimingEntry::new(label));

        entry.iterations += 1;
    }

    pub(crate) fn record(&self, label: &str, elapsed: Duration) {
        if let Some(entry) = self.entries.borrow_mut().get_mut(label) {
            entry.record(elapsed);
        }
    }

    /// Returns a copy of the statistics stored for the label.
    pub fn get(&self, label: &str) -> Option<TimingEntry> {
        self.entries.borrow().get(label).cloned()
    }

    /// Returns copies of all entries, ordered by label.
    pub fn snapshot(&self) -> Vec<TimingEntry> {
        self.entries.borrow().values().cloned().collect()
    }

    /// Zeroes the statistics of every entry without removing the entries.
    pub fn reset_all(&self) {
        for entry in self.entries.borrow_mut().values_mut() {
            entry.reset();
        }
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

impl Default for TimingStore {
    fn default() -> Self {
        TimingStore::new()
    }
}

/// Guard measuring the wall-clock duration of the scope it lives in.
///
/// Creating the timer registers an iteration under its label and starts the
/// clock; dropping it folds the elapsed time into the label's entry. Each
/// timer finalizes exactly once, on every exit path from the scope.
pub struct ScopedTimer {
    store: Rc<TimingStore>,
    label: String,
    started: Instant,
}

impl ScopedTimer {
    /// Starts a timer on the process-wide store.
    ///
    /// Panics if the label is empty, which is a programming error in the
    /// test, not a runtime condition.
    pub fn new<S: Into<String>>(label: S) -> Self {
        Self::with_store(TimingStore::shared(), label)
    }

    /// Starts a timer on the given store.
    pub fn with_store<S: Into<String>>(store: Rc<TimingStore>, label: S) -> Self {
        let label = label.into();

        if label.is_empty() {
            panic!("scoped timer label must not be empty");
        }

        store.enter(&label);

        ScopedTimer {
            store,
            label,
            started: Instant::now(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        self.store.record(&self.label, self.started.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregates_known_samples() {
        let store = TimingStore::new();

        store.enter("x");
        store.record("x", Duration::from_millis(10));
        store.enter("x");
        store.record("x", Duration::from_millis(30));

        let entry = store.get("x").unwrap();
        assert_eq!(entry.iterations(), 2);
        assert_eq!(entry.total(), Duration::from_millis(40));
        assert_eq!(entry.min(), Duration::from_millis(10));
        assert_eq!(entry.max(), Duration::from_millis(30));
        assert_eq!(entry.average(), Duration::from_millis(20));
    }

    #[test]
    fn entry_starts_zero_initialized() {
        let store = TimingStore::new();

        store.enter("fresh");

        let entry = store.get("fresh").unwrap();
        assert_eq!(entry.label(), "fresh");
        assert_eq!(entry.iterations(), 1);
        assert_eq!(entry.total(), Duration::ZERO);
        assert_eq!(entry.min(), Duration::MAX);
        assert_eq!(entry.max(), Duration::ZERO);
    }

    #[test]
    fn average_of_nothing_is_zero() {
        assert_eq!(TimingEntry::new("idle").average(), Duration::ZERO);
    }

    #[test]
    fn timer_records_on_drop() {
        let store = Rc::new(TimingStore::new());

        {
            let _timer = ScopedTimer::with_store(Rc::clone(&store), "scope");
        }

        let entry = store.get("scope").unwrap();
        assert_eq!(entry.iterations(), 1);
        assert_eq!(entry.min(), entry.max());
        assert_eq!(entry.total(), entry.max());
    }

    #[test]
    fn nested_timers_share_the_store() {
        let store = Rc::new(TimingStore::new());

        {
            let _outer = ScopedTimer::with_store(Rc::clone(&store), "outer");
            for _ in 0..3 {
                let _inner = ScopedTimer::with_store(Rc::clone(&store), "inner");
            }
        }

        assert_eq!(store.get("outer").unwrap().iterations(), 1);
        assert_eq!(store.get("inner").unwrap().iterations(), 3);
        assert!(store.get("outer").unwrap().total() >= store.get("inner").unwrap().total());
    }

    #[test]
    fn moved_timer_finalizes_once() {
        let store = Rc::new(TimingStore::new());

        {
            let timer = ScopedTimer::with_store(Rc::clone(&store), "moved");
            let _owner = timer;
        }

        let entry = store.get("moved").unwrap();
        // A single sample: one iteration whose min, max and total coincide.
        assert_eq!(entry.iterations(), 1);
        assert_eq!(entry.min(), entry.max());
        assert_eq!(entry.total(), entry.min());
    }

    #[test]
    fn reset_all_keeps_labels() {
        let store = TimingStore::new();

        store.enter("a");
        store.record("a", Duration::from_millis(5));
        store.enter("b");

        store.reset_all();

        assert_eq!(store.len(), 2);
        let entry = store.get("a").unwrap();
        assert_eq!(entry.iterations(), 0);
        assert_eq!(entry.total(), Duration::ZERO);
        assert_eq!(entry.min(), Duration::MAX);
    }

    #[test]
    fn clear_removes_entries() {
        let store = TimingStore::new();

        store.enter("a");
        store.record("a", Duration::from_millis(5));
        store.clear();

        assert!(store.is_empty());
        assert!(store.get("a").is_none());

        // A later reference starts from scratch.
        store.enter("a");
        let entry = store.get("a").unwrap();
        assert_eq!(entry.iterations(), 1);
        assert_eq!(entry.total(), Duration::ZERO);
    }

    #[test]
    fn snapshot_is_ordered_by_label() {
        let store = TimingStore::new();

        store.enter("b");
        store.enter("a");
        store.enter("c");

        let labels = store
            .snapshot()
            .iter()
            .map(|entry| entry.label().to_string())
            .collect::<Vec<_>>();

        assert_eq!(labels, ["a", "b", "c"]);
    }

    #[test]
    #[should_panic]
    fn empty_label_is_fatal() {
        let store = Rc::new(TimingStore::new());
        let _timer = ScopedTimer::with_store(store, "");
    }
}
