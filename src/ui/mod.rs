mod cli;
mod json;

pub use cli::CliUi;
pub use json::JsonUi;

use crate::runner::{Case, RunSummary};

/// Presentation of run progress and results. The engine itself never prints;
/// everything user-visible goes through an implementation of this trait.
pub trait Ui {
    fn prolog(&mut self, _n_cases: usize) {}
    fn running(&mut self, _index: usize, _total: usize) {}
    fn case(&mut self, case: &dyn Case);
    fn epilog(&mut self, summary: &RunSummary);
}

#[derive(Clone, Copy, Debug)]
pub enum UiName {
    Cli,
    Json,
}

impl Default for UiName {
    fn default() -> Self {
        UiName::Cli
    }
}
