//! The test case lifecycle engine.
//!
//! A [`TestCase`] owns a user-supplied [`TestHooks`] implementation and
//! drives it through a fixed sequence of phases. One run executes:
//!
//! * `initialize()` — registers sub-tests;
//! * the main phase — `pre_set_up()`, `set_up()`, `test_method()`,
//!   `tear_down()`, `post_tear_down()`;
//! * every registered sub-test, in registration order, each wrapped in the
//!   same `pre_set_up()`/`set_up()`/`tear_down()`/`post_tear_down()` hooks;
//! * `finalize()`.
//!
//! `pre_set_up` and `post_tear_down` belong to the [`TestKind`] the case was
//! created with, not to the test author. The plain [`UnitKind`] leaves them
//! empty; the benchmark kind uses them to scope timing capture to a single
//! phase.
//!
//! Failures never propagate as panics or early returns. A failed `set_up`
//! skips the phase body (and, at the top level, all sub-test bodies) but the
//! teardown hooks of every phase still run, and every failure is recorded as
//! a message in the case's [`Report`].

use std::path::Path;

use crate::report::Report;

/// Lifecycle hooks implemented by a test author. Every hook has a default
/// no-op implementation, so a test overrides only what it needs.
///
/// The hooks receive the mutable [`Report`] of the running case to record
/// assertions and messages; state shared between phases lives in the
/// implementing type itself.
pub trait TestHooks {
    /// Called first on every run. This is the place to register sub-tests.
    fn initialize(&mut self, _sub_tests: &mut SubTests<Self>)
    where
        Self: Sized,
    {
    }

    /// Called before the main test body and before every sub-test. Returning
    /// false marks the phase as skipped instead of executed.
    fn set_up(&mut self, _report: &mut Report) -> bool {
        true
    }

    /// The main test body. Not invoked when `set_up` failed.
    fn test_method(&mut self, _report: &mut Report) -> bool {
        true
    }

    /// Called after the main test body and after every sub-test, also when
    /// the body was skipped due to a `set_up` failure.
    fn tear_down(&mut self, _report: &mut Report) {}

    /// Called once after all phases finished.
    fn finalize(&mut self, _report: &mut Report) {}
}

/// Framework-side hooks wrapped around every phase. Implementations define a
/// kind of test (plain unit test, benchmark) without touching the lifecycle
/// logic itself.
pub trait TestKind {
    /// Invoked right before any call to `set_up`.
    fn pre_set_up(&mut self, _report: &mut Report) {}

    /// Invoked right after any call to `tear_down`. The scope argument names
    /// the finished phase (source file, or source file and sub-test name).
    fn post_tear_down(&mut self, _scope: &str, _report: &mut Report) {}
}

/// The kind of a plain unit test: no framework behavior around the phases.
pub struct UnitKind;

impl TestKind for UnitKind {}

type SubTestFn<H> = Box<dyn FnMut(&mut H, &mut Report) -> bool>;

/// Ordered registry of named sub-tests, filled inside
/// [`TestHooks::initialize`]. Registration order is execution order.
pub struct SubTests<H> {
    entries: Vec<(String, SubTestFn<H>)>,
}

impl<H> SubTests<H> {
    pub(crate) fn new() -> Self {
        SubTests {
            entries: Vec::new(),
        }
    }

    /// Registers a sub-test. The body gets mutable access to the hooks value
    /// and to the case's report; it returns its pass/fail verdict.
    pub fn add<S, F>(&mut self, name: S, body: F)
    where
        S: Into<String>,
        F: FnMut(&mut H, &mut Report) -> bool + 'static,
    {
        self.entries.push((name.into(), Box::new(body)));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One independently runnable test case.
pub struct TestCase<H: TestHooks> {
    name: String,
    source_file: String,
    hooks: H,
    kind: Box<dyn TestKind>,
    sub_tests: SubTests<H>,
    report: Report,
    current_sub_test: usize,
    in_sub_test: bool,
    passed_sub_tests: usize,
    has_run: bool,
}

impl<H: TestHooks> TestCase<H> {
    /// Creates a plain unit test case around the given hooks.
    pub fn new(hooks: H) -> Self {
        Self::with_kind(hooks, Box::new(UnitKind))
    }

    /// Creates a case of an explicit kind. Used by the benchmark
    /// constructors; custom kinds can plug in the same way.
    pub fn with_kind(hooks: H, kind: Box<dyn TestKind>) -> Self {
        TestCase {
            name: String::new(),
            source_file: String::new(),
            hooks,
            kind,
            sub_tests: SubTests::new(),
            report: Report::new(),
            current_sub_test: 0,
            in_sub_test: false,
            passed_sub_tests: 0,
            has_run: false,
        }
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the source file the test is defined in. Any directory components
    /// are stripped; only the file name is kept.
    pub fn with_source_file<S: Into<String>>(mut self, path: S) -> Self {
        self.source_file = file_name(&path.into());
        self
    }

    /// Name of the test. Falls back to "Unnamed Test" when neither a name
    /// nor a source file was given.
    pub fn name(&self) -> &str {
        if self.name.is_empty() && self.source_file.is_empty() {
            "Unnamed Test"
        } else {
            &self.name
        }
    }

    pub fn source_file(&self) -> &str {
        &self.source_file
    }

    /// A test has passed when it ran and recorded no error message. A case
    /// that never ran is not passed, whatever its sub-tests would say.
    pub fn is_passed(&self) -> bool {
        self.has_run && !self.report.has_errors()
    }

    pub fn error_messages(&self) -> &[String] {
        self.report.errors()
    }

    pub fn info_messages(&self) -> &[String] {
        self.report.infos()
    }

    pub fn sub_test_count(&self) -> usize {
        self.sub_tests.len()
    }

    pub fn passed_sub_test_count(&self) -> usize {
        self.passed_sub_tests
    }

    /// Name of the currently executing sub-test, valid also in its
    /// surrounding `set_up` and `tear_down` phases.
    pub fn current_sub_test_name(&self) -> Option<&str> {
        if self.in_sub_test {
            Some(&self.sub_tests.entries[self.current_sub_test].0)
        } else {
            None
        }
    }

    pub fn in_sub_test(&self) -> bool {
        self.in_sub_test
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Executes the full lifecycle and returns [`TestCase::is_passed`].
    ///
    /// All mutable state is reset first, so repeated runs on the same case
    /// produce independent results. Failures are recorded in the report and
    /// never propagate out of this call.
    pub fn run(&mut self) -> bool {
        self.reset();
        self.has_run = true;

        let mut sub_tests = SubTests::new();
        self.hooks.initialize(&mut sub_tests);
        self.sub_tests = sub_tests;

        let set_up_ok = self.run_main();
        self.run_sub_tests(!set_up_ok);
        self.hooks.finalize(&mut self.report);

        self.is_passed()
    }

    fn run_main(&mut self) -> bool {
        let label = self.main_label().to_string();

        self.kind.pre_set_up(&mut self.report);
        let set_up_ok = self.hooks.set_up(&mut self.report);

        if set_up_ok {
            if !self.hooks.test_method(&mut self.report) {
                self.report.add_error(format!("  <{}> failed!", label));
            }
        } else {
            self.report
                .add_error(format!("  <{}> set_up() failed!", label));
        }

        self.hooks.tear_down(&mut self.report);
        self.kind.post_tear_down(&label, &mut self.report);

        set_up_ok
    }

    // Sub-tests are attempted in registration order even after failures, so
    // a failing sub-test never hides the results of the ones after it. When
    // the top-level set_up failed, every sub-test is recorded as skipped
    // instead of executed, but still goes through its teardown hooks.
    fn run_sub_tests(&mut self, skip_all: bool) {
        for index in 0..self.sub_tests.entries.len() {
            self.in_sub_test = true;
            self.current_sub_test = index;

            let name = self.sub_tests.entries[index].0.clone();
            self.report.set_current_sub_test(Some(name.clone()));

            if skip_all {
                self.report
                    .add_error(format!("  <{}> SKIPPED due to set_up() failed!", name));
            } else {
                self.kind.pre_set_up(&mut self.report);

                if self.hooks.set_up(&mut self.report) {
                    let passed =
                        (self.sub_tests.entries[index].1)(&mut self.hooks, &mut self.report);

                    if passed {
                        self.passed_sub_tests += 1;
                    } else {
                        self.report.add_error(format!("  <{}> failed!", name));
                    }
                } else {
                    self.report
                        .add_error(format!("  <{}> SKIPPED due to set_up() failed!", name));
                }
            }

            self.hooks.tear_down(&mut self.report);
            let scope = self.scope_label();
            self.kind.post_tear_down(&scope, &mut self.report);
        }

        self.in_sub_test = false;
        self.report.set_current_sub_test(None);
    }

    fn main_label(&self) -> &str {
        if self.source_file.is_empty() {
            self.name()
        } else {
            &self.source_file
        }
    }

    fn scope_label(&self) -> String {
        match self.report.current_sub_test() {
            Some(name) if !self.source_file.is_empty() => {
                format!("{}::{}", self.source_file, name)
            }
            Some(name) => name.to_string(),
            None => self.main_label().to_string(),
        }
    }

    fn reset(&mut self) {
        self.has_run = false;
        self.report.reset();
        self.sub_tests = SubTests::new();
        self.current_sub_test = 0;
        self.in_sub_test = false;
        self.passed_sub_tests = 0;
    }
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
