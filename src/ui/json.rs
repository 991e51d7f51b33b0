use std::io::{self, Stdout, Write};

use chrono::prelude::*;
use serde::{Deserialize, Serialize};

use super::Ui;
use crate::runner::{Case, RunSummary};
use crate::VERSION;

#[derive(Serialize, Deserialize)]
struct Output {
    version: String,
    harness_version: String,
    utc_time: DateTime<Utc>,
    local_time: DateTime<Local>,
    cases: Vec<CaseOutput>,
    summary: Option<Summary>,
}

#[derive(Serialize, Deserialize)]
struct CaseOutput {
    name: String,
    source_file: String,
    passed: bool,
    sub_tests: usize,
    passed_sub_tests: usize,
    info_messages: Vec<String>,
    error_messages: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct Summary {
    total: usize,
    passed: usize,
    sub_tests_total: usize,
    sub_tests_passed: usize,
    all_passed: bool,
}

/// Collects all results and prints one JSON document in the epilog.
pub struct JsonUi {
    terminal: Stdout,
    output: Output,
}

impl JsonUi {
    pub fn new() -> Self {
        JsonUi {
            terminal: io::stdout(),
            output: Output {
                version: String::from("v1"),
                harness_version: String::from(VERSION),
                utc_time: Utc::now(),
                local_time: Local::now(),
                cases: Vec::new(),
                summary: None,
            },
        }
    }
}

impl Default for JsonUi {
    fn default() -> Self {
        JsonUi::new()
    }
}

impl Ui for JsonUi {
    fn case(&mut self, case: &dyn Case) {
        self.output.cases.push(CaseOutput {
            name: case.name().to_string(),
            source_file: case.source_file().to_string(),
            passed: case.is_passed(),
            sub_tests: case.sub_test_count(),
            passed_sub_tests: case.passed_sub_test_count(),
            info_messages: case.info_messages().to_vec(),
            error_messages: case.error_messages().to_vec(),
        });
    }

    fn epilog(&mut self, summary: &RunSummary) {
        self.output.summary = Some(Summary {
            total: summary.total,
            passed: summary.passed,
            sub_tests_total: summary.sub_tests_total,
            sub_tests_passed: summary.sub_tests_passed,
            all_passed: summary.all_passed(),
        });

        let serialized = serde_json::to_string_pretty(&self.output).unwrap();
        writeln!(self.terminal, "{}", serialized).unwrap();
    }
}
