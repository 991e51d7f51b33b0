//! Diagnostics collected during a test run.
//!
//! A [`Report`] is an append-only pair of message sequences (errors and
//! infos) together with the assertion helpers that feed the error sequence.
//! Assertions never abort the running (sub)test. They evaluate their
//! predicate, record a formatted message on failure and hand the predicate's
//! value back to the caller, so one failing check does not suppress the
//! diagnostics of the checks that follow it.

use std::fmt;

pub struct Report {
    errors: Vec<String>,
    infos: Vec<String>,
    current_sub_test: Option<String>,
}

fn failure(base: String, msg: Option<&str>) -> String {
    match msg {
        Some(msg) => format!("{}, {}", base, msg),
        None => format!("{}!", base),
    }
}

impl Report {
    pub fn new() -> Self {
        Report {
            errors: Vec::new(),
            infos: Vec::new(),
            current_sub_test: None,
        }
    }

    /// Appends the given message to the error messages.
    pub fn add_error<S: Into<String>>(&mut self, message: S) {
        self.errors.push(message.into());
    }

    /// Appends the given message to the informational messages.
    pub fn add_info<S: Into<String>>(&mut self, message: S) {
        self.infos.push(message.into());
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn infos(&self) -> &[String] {
        &self.infos
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Name of the sub-test being executed, if any. Valid also in the
    /// sub-test's surrounding `set_up` and `tear_down` hooks.
    pub fn current_sub_test(&self) -> Option<&str> {
        self.current_sub_test.as_deref()
    }

    pub(crate) fn set_current_sub_test(&mut self, name: Option<String>) {
        self.current_sub_test = name;
    }

    pub(crate) fn reset(&mut self) {
        self.errors.clear();
        self.infos.clear();
        self.current_sub_test = None;
    }

    /// Records an error if the statement does not hold.
    pub fn assert_true(&mut self, statement: bool, msg: Option<&str>) -> bool {
        if !statement {
            match msg {
                Some(msg) => self.add_error(format!("Assertion failed: {}", msg)),
                None => self.add_error("Assertion failed!"),
            }
        }

        statement
    }

    /// Records an error if the statement holds.
    pub fn assert_false(&mut self, statement: bool, msg: Option<&str>) -> bool {
        self.assert_true(!statement, msg)
    }

    /// Records an error if the checked value does not equal the expected one.
    pub fn assert_equals<T>(&mut self, expected: T, checked: T, msg: Option<&str>) -> bool
    where
        T: PartialEq + fmt::Display,
    {
        let holds = checked == expected;

        if !holds {
            self.add_error(failure(format!("{} should be {}", checked, expected), msg));
        }

        holds
    }

    /// Records an error if the checked value equals the other one.
    pub fn assert_not_equals<T>(&mut self, compared_to: T, checked: T, msg: Option<&str>) -> bool
    where
        T: PartialEq + fmt::Display,
    {
        let holds = checked != compared_to;

        if !holds {
            self.add_error(failure(
                format!("{} should NOT be {}", checked, compared_to),
                msg,
            ));
        }

        holds
    }

    /// Records an error if the checked value lies outside the closed interval.
    pub fn assert_between<T>(&mut self, min: T, max: T, checked: T, msg: Option<&str>) -> bool
    where
        T: PartialOrd + fmt::Display,
    {
        let holds = min <= checked && max >= checked;

        if !holds {
            self.add_error(failure(
                format!("out of range: {} <= {} <= {}", min, checked, max),
                msg,
            ));
        }

        holds
    }

    /// Records an error if the checked value is not less than the other one.
    pub fn assert_less<T>(&mut self, checked: T, compared_to: T, msg: Option<&str>) -> bool
    where
        T: PartialOrd + fmt::Display,
    {
        let holds = checked < compared_to;

        if !holds {
            self.add_error(failure(
                format!("{} should be < {}", checked, compared_to),
                msg,
            ));
        }

        holds
    }

    /// Records an error if the checked value is not less than or equal to the
    /// other one.
    pub fn assert_lequals<T>(&mut self, checked: T, compared_to: T, msg: Option<&str>) -> bool
    where
        T: PartialOrd + fmt::Display,
    {
        let holds = checked <= compared_to;

        if !holds {
            self.add_error(failure(
                format!("{} should be <= {}", checked, compared_to),
                msg,
            ));
        }

        holds
    }

    /// Records an error if the checked value is not greater than the other one.
    pub fn assert_greater<T>(&mut self, checked: T, compared_to: T, msg: Option<&str>) -> bool
    where
        T: PartialOrd + fmt::Display,
    {
        let holds = checked > compared_to;

        if !holds {
            self.add_error(failure(
                format!("{} should be > {}", checked, compared_to),
                msg,
            ));
        }

        holds
    }

    /// Records an error if the checked value is not greater than or equal to
    /// the other one.
    pub fn assert_gequals<T>(&mut self, checked: T, compared_to: T, msg: Option<&str>) -> bool
    where
        T: PartialOrd + fmt::Display,
    {
        let holds = checked >= compared_to;

        if !holds {
            self.add_error(failure(
                format!("{} should be >= {}", checked, compared_to),
                msg,
            ));
        }

        holds
    }

    /// Records an error if the option holds no value.
    pub fn assert_some<T>(&mut self, checked: &Option<T>, msg: Option<&str>) -> bool {
        let holds = checked.is_some();

        if !holds {
            self.add_error(failure(String::from("value is None"), msg));
        }

        holds
    }

    /// Records an error if the option holds a value.
    pub fn assert_none<T>(&mut self, checked: &Option<T>, msg: Option<&str>) -> bool {
        let holds = checked.is_none();

        if !holds {
            self.add_error(failure(String::from("value should be None"), msg));
        }

        holds
    }

    /// Equality check with an explicit tolerance. The values are considered
    /// equal if they are not farther apart than epsilon.
    pub fn assert_equals_eps(
        &mut self,
        expected: f64,
        checked: f64,
        epsilon: f64,
        msg: Option<&str>,
    ) -> bool {
        let holds = (expected - checked).abs() <= epsilon;

        if !holds {
            self.add_error(failure(format!("{} should be {}", checked, expected), msg));
        }

        holds
    }

    /// Inequality check with an explicit tolerance.
    pub fn assert_not_equals_eps(
        &mut self,
        compared_to: f64,
        checked: f64,
        epsilon: f64,
        msg: Option<&str>,
    ) -> bool {
        let holds = (compared_to - checked).abs() > epsilon;

        if !holds {
            self.add_error(failure(
                format!("{} should NOT be {}", checked, compared_to),
                msg,
            ));
        }

        holds
    }

    /// Ordering check with an explicit tolerance towards the greater side.
    pub fn assert_lequals_eps(
        &mut self,
        checked: f64,
        compared_to: f64,
        epsilon: f64,
        msg: Option<&str>,
    ) -> bool {
        let holds = checked < compared_to || (compared_to - checked).abs() <= epsilon;

        if !holds {
            self.add_error(failure(
                format!("{} should be <= {}", checked, compared_to),
                msg,
            ));
        }

        holds
    }

    /// Ordering check with an explicit tolerance towards the lesser side.
    pub fn assert_gequals_eps(
        &mut self,
        checked: f64,
        compared_to: f64,
        epsilon: f64,
        msg: Option<&str>,
    ) -> bool {
        let holds = checked > compared_to || (compared_to - checked).abs() <= epsilon;

        if !holds {
            self.add_error(failure(
                format!("{} should be >= {}", checked, compared_to),
                msg,
            ));
        }

        holds
    }

    /// Interval check with an explicit tolerance on both boundaries.
    pub fn assert_between_eps(
        &mut self,
        min: f64,
        max: f64,
        checked: f64,
        epsilon: f64,
        msg: Option<&str>,
    ) -> bool {
        let holds = (min < checked || (min - checked).abs() <= epsilon)
            && (max > checked || (max - checked).abs() <= epsilon);

        if !holds {
            self.add_error(failure(
                format!("out of range: {} <= {} <= {}", min, checked, max),
                msg,
            ));
        }

        holds
    }
}

impl Default for Report {
    fn default() -> Self {
        Report::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_assertions_accumulate_in_call_order() {
        let mut report = Report::new();

        assert!(!report.assert_true(false, Some("first")));
        assert!(!report.assert_equals(1, 2, None));
        assert!(!report.assert_less(5, 3, None));

        assert_eq!(
            report.errors(),
            [
                "Assertion failed: first",
                "2 should be 1!",
                "5 should be < 3!",
            ]
        );
    }

    #[test]
    fn passing_assertions_record_nothing() {
        let mut report = Report::new();

        assert!(report.assert_true(true, None));
        assert!(report.assert_equals("same", "same", None));
        assert!(report.assert_between(1, 10, 5, None));
        assert!(report.assert_not_equals(1, 2, None));
        assert!(report.assert_lequals(3, 3, None));
        assert!(report.assert_gequals(3, 3, None));

        assert!(!report.has_errors());
        assert!(report.infos().is_empty());
    }

    #[test]
    fn caller_message_is_appended() {
        let mut report = Report::new();

        report.assert_equals(1, 2, Some("red channel"));
        report.assert_greater(1, 2, None);

        assert_eq!(
            report.errors(),
            ["2 should be 1, red channel", "1 should be > 2!"]
        );
    }

    #[test]
    fn interval_failure_names_boundaries() {
        let mut report = Report::new();

        report.assert_between(1, 4, 7, None);

        assert_eq!(report.errors(), ["out of range: 1 <= 7 <= 4!"]);
    }

    #[test]
    fn epsilon_widens_equality() {
        let mut report = Report::new();

        assert!(report.assert_equals_eps(1.0, 1.05, 0.1, None));
        assert!(!report.assert_equals_eps(1.0, 1.2, 0.1, None));
        assert!(report.assert_not_equals_eps(1.0, 1.2, 0.1, None));
        assert!(!report.assert_not_equals_eps(1.0, 1.05, 0.1, None));

        assert_eq!(report.errors().len(), 2);
    }

    #[test]
    fn epsilon_widens_ordering() {
        let mut report = Report::new();

        assert!(report.assert_lequals_eps(3.05, 3.0, 0.1, None));
        assert!(report.assert_gequals_eps(2.95, 3.0, 0.1, None));
        assert!(report.assert_between_eps(1.0, 2.0, 2.05, 0.1, None));
        assert!(!report.assert_between_eps(1.0, 2.0, 2.5, 0.1, None));

        assert_eq!(report.errors().len(), 1);
    }

    #[test]
    fn option_checks() {
        let mut report = Report::new();
        let some = Some(1);
        let none: Option<i32> = None;

        assert!(report.assert_some(&some, None));
        assert!(report.assert_none(&none, None));
        assert!(!report.assert_none(&some, Some("leftover")));
        assert!(!report.assert_some(&none, None));

        assert_eq!(
            report.errors(),
            ["value should be None, leftover", "value is None!"]
        );
    }

    #[test]
    fn reset_clears_messages() {
        let mut report = Report::new();

        report.add_error("oops");
        report.add_info("note");
        report.reset();

        assert!(!report.has_errors());
        assert!(report.infos().is_empty());
    }
}
