use std::io::Write;
use std::mem;

use term::{
    color::{self, Color},
    Attr, StdoutTerminal,
};
use unicode_width::UnicodeWidthStr;

use super::Ui;
use crate::runner::{display_name, Case, RunSummary};
use crate::VERSION;

const NEWLINE: &'static str = "\n";
const WRAP_AT: usize = 100;

// Wraps the text at word boundaries so that no line is wider than `wrap_at`
// terminal columns. Words wider than the limit get a line of their own.
fn wrap(text: &str, wrap_at: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut col = 0;

    for word in text.split_whitespace() {
        let width = word.width();

        if col > 0 && col + 1 + width > wrap_at {
            lines.push(mem::take(&mut line));
            col = 0;
        }

        if col > 0 {
            line.push(' ');
            col += 1;
        }

        line.push_str(word);
        col += width;
    }

    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }

    lines
}

pub struct CliUi {
    terminal: Box<StdoutTerminal>,
    current_color: Option<Color>,
}

impl CliUi {
    pub fn new() -> Option<Self> {
        Some(CliUi {
            terminal: term::stdout()?,
            current_color: None,
        })
    }

    fn write<S: Into<String>>(&mut self, text: S) {
        write!(self.terminal, "{}", text.into()).unwrap();
    }

    fn writeln<S: Into<String>>(&mut self, text: S) {
        write!(self.terminal, "{}{}", text.into(), NEWLINE).unwrap();
    }

    fn newline(&mut self) {
        self.write(NEWLINE);
    }

    fn color(&mut self, color: Color) {
        self.terminal.fg(color).unwrap();
        self.current_color = Some(color);
    }

    fn bold(&mut self) {
        self.terminal.attr(Attr::Bold).unwrap();
    }

    fn reset(&mut self) {
        self.terminal.reset().unwrap();
        self.current_color = None;
    }

    fn reset_style(&mut self) {
        self.terminal.reset().unwrap();
        if let Some(color) = self.current_color {
            self.terminal.fg(color).unwrap();
        }
    }

    fn construct_bar(&self, len: usize, ch: char) -> String {
        (0..len).fold(String::with_capacity(len), |mut bar, _| {
            bar.push(ch);
            bar
        })
    }
}

impl Ui for CliUi {
    fn prolog(&mut self, n_cases: usize) {
        self.write("Running ");
        self.bold();
        self.write(format!("{}", n_cases));
        self.reset_style();
        self.writeln(format!(" test case(s), harness version {}", VERSION));
        self.newline();
    }

    fn running(&mut self, index: usize, total: usize) {
        self.writeln(format!("Running test {} / {} ...", index, total));
    }

    fn case(&mut self, case: &dyn Case) {
        for info in case.info_messages() {
            self.writeln(info.as_str());
        }

        if case.is_passed() {
            self.color(color::GREEN);
            self.write("Test passed: ");
            self.bold();
            self.write(format!(
                "{}({})",
                display_name(case),
                case.sub_test_count()
            ));
            self.reset_style();

            if !case.name().is_empty() && !case.source_file().is_empty() {
                self.write(format!(" in {}", case.source_file()));
            }

            self.writeln("!");
            self.reset();
        } else {
            self.color(color::RED);
            self.write("Test failed: ");
            self.bold();
            self.write(display_name(case));
            self.reset_style();

            if !case.name().is_empty() && !case.source_file().is_empty() {
                self.write(format!(" in {}", case.source_file()));
            }

            self.newline();

            for error in case.error_messages() {
                for line in wrap(error, WRAP_AT) {
                    self.writeln(format!("    {}", line));
                }
            }

            self.reset();
        }
    }

    fn epilog(&mut self, summary: &RunSummary) {
        let bar = self.construct_bar(56, '=');

        self.newline();
        self.writeln(bar.clone());

        if summary.all_passed() {
            self.color(color::GREEN);
        } else {
            self.color(color::RED);
        }

        self.bold();
        self.writeln(format!(
            "Passed tests: {} / {} (sub-tests: {} / {})",
            summary.passed, summary.total, summary.sub_tests_passed, summary.sub_tests_total
        ));
        self.reset();

        self.writeln(bar);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_keeps_short_lines_whole() {
        assert_eq!(wrap("a short line", 80), ["a short line"]);
    }

    #[test]
    fn wrap_splits_at_word_boundaries() {
        assert_eq!(
            wrap("alpha beta gamma delta", 11),
            ["alpha beta", "gamma delta"]
        );
    }

    #[test]
    fn wrap_gives_oversized_words_their_own_line() {
        assert_eq!(
            wrap("x abcdefghijklmnop y", 8),
            ["x", "abcdefghijklmnop", "y"]
        );
    }

    #[test]
    fn wrap_of_empty_text_is_one_empty_line() {
        assert_eq!(wrap("", 10), [""]);
    }
}
