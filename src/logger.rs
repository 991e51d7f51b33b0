use std::fmt;
use std::fs::File;
use std::io::{self, prelude::*};
use std::path::Path;
use std::time::Instant;

/// Diagnostic log written next to the regular test output. Each line is
/// stamped with the time elapsed since the logger was created.
pub struct Logger {
    file: File,
    timer: Instant,
}

impl Logger {
    pub fn new<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(Logger {
            file: File::create(path)?,
            timer: Instant::now(),
        })
    }

    pub fn info<M: fmt::Display>(&mut self, message: M) {
        self.log("info", message);
    }

    pub fn error<M: fmt::Display>(&mut self, message: M) {
        self.log("error", message);
    }

    fn log<M: fmt::Display>(&mut self, header: &str, message: M) {
        writeln!(
            self.file,
            "[{:>9.5}] {}: {}",
            self.timer.elapsed().as_secs_f32(),
            header,
            message
        )
        .unwrap();
    }
}
