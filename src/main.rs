//! Example benchmark suite driven through the harness, also serving as an
//! end-to-end smoke test of the crate.

use std::path::Path;
use std::process;
use std::thread;
use std::time::Duration;

use clap::{App, Arg};

use harrier::case::{SubTests, TestCase, TestHooks};
use harrier::config::{Config, DEFAULT_CONFIG_FILE};
use harrier::logger::Logger;
use harrier::report::Report;
use harrier::runner::{Case, Runner};
use harrier::stats::{ScopedTimer, TimingStore};
use harrier::ui::{CliUi, JsonUi, Ui, UiName};

// Sleep times in milliseconds, longer first: short sleeps are the least
// precise, so they run once the process has warmed up.
const SLEEPS_MS: [u64; 5] = [10, 5, 2, 1, 0];
const ITERATIONS_PER_SLEEP: u64 = 5;

struct SleepScopes;

impl TestHooks for SleepScopes {
    fn initialize(&mut self, sub_tests: &mut SubTests<Self>) {
        sub_tests.add("sleep_ladder", |hooks: &mut Self, report| {
            hooks.sleep_ladder(report)
        });
    }
}

impl SleepScopes {
    fn sleep_ladder(&mut self, report: &mut Report) -> bool {
        let store = TimingStore::shared();
        let mut passed = true;

        for sleep_ms in SLEEPS_MS.iter().copied() {
            let scope = format!("sleep-{}", sleep_ms);
            let overhead_scope = format!("sleep-oh-{}", sleep_ms);

            {
                // Measures the loop around the inner timers, so the
                // difference of the two totals is the measurement overhead.
                let _overhead = ScopedTimer::new(overhead_scope.clone());
                for _ in 0..ITERATIONS_PER_SLEEP {
                    let _timer = ScopedTimer::new(scope.clone());
                    thread::sleep(Duration::from_millis(sleep_ms));
                }
            }

            let entry = match store.get(&scope) {
                Some(entry) => entry,
                None => {
                    report.add_error(format!("no samples captured under {}", scope));
                    passed = false;
                    continue;
                }
            };

            passed &= report.assert_equals(ITERATIONS_PER_SLEEP, entry.iterations(), Some(scope.as_str()));
            passed &= report.assert_between(
                u128::from(sleep_ms * ITERATIONS_PER_SLEEP),
                5000,
                entry.total().as_millis(),
                Some(scope.as_str()),
            );
            passed &= report.assert_between(
                u128::from(sleep_ms),
                200,
                entry.min().as_millis(),
                Some(scope.as_str()),
            );
            passed &= report.assert_lequals(
                entry.min().as_millis(),
                entry.max().as_millis(),
                Some(scope.as_str()),
            );

            if let Some(overhead) = store.get(&overhead_scope) {
                report.add_info(format!(
                    "  {}: measurement overhead: {:?}",
                    scope,
                    overhead.total().saturating_sub(entry.total())
                ));
            }
        }

        passed
    }
}

fn main() {
    let matches = App::new("harrier")
        .version("0.1")
        .about("A minimal sequential test harness with scoped benchmarking")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("Path to the configuration file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("ui")
                .long("ui")
                .value_name("NAME")
                .help("Output format, either cli or json")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("log")
                .long("log")
                .value_name("FILE")
                .help("Write a diagnostic log to the given file")
                .takes_value(true),
        )
        .get_matches();

    let mut config = match matches.value_of("config") {
        Some(path) => match Config::load_from_file(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("harrier: {}", err);
                process::exit(2);
            }
        },
        None => {
            if Path::new(DEFAULT_CONFIG_FILE).is_file() {
                match Config::load_from_file(DEFAULT_CONFIG_FILE) {
                    Ok(config) => config,
                    Err(err) => {
                        eprintln!("harrier: {}", err);
                        process::exit(2);
                    }
                }
            } else {
                Config::default()
            }
        }
    };

    match matches.value_of("ui") {
        Some("cli") => config.ui = UiName::Cli,
        Some("json") => config.ui = UiName::Json,
        Some(other) => {
            eprintln!("harrier: unknown ui: {}", other);
            process::exit(2);
        }
        None => {}
    }

    if let Some(path) = matches.value_of("log") {
        config.log_file = Some(path.into());
    }

    let ui: Box<dyn Ui> = match config.ui {
        UiName::Cli => match CliUi::new() {
            Some(ui) => Box::new(ui),
            None => {
                eprintln!("harrier: cannot open the terminal");
                process::exit(2);
            }
        },
        UiName::Json => Box::new(JsonUi::new()),
    };

    let mut runner = Runner::new(ui);

    if let Some(path) = &config.log_file {
        match Logger::new(path) {
            Ok(logger) => runner = runner.with_logger(logger),
            Err(err) => {
                eprintln!("harrier: cannot open log file: {}", err);
                process::exit(2);
            }
        }
    }

    let mut cases: Vec<Box<dyn Case>> = vec![Box::new(
        TestCase::benchmark(SleepScopes).with_source_file(file!()),
    )];

    let summary = runner.run(&mut cases);

    process::exit(if summary.all_passed() { 0 } else { 1 });
}
