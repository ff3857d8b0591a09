use crate::error::GrepUiError;
use crate::runner::ProcessGuard;
use crate::template;
use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Interval at which a caller should re-arm `poll` while a run is in flight.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Advisory shown when a run request arrives while one is already active.
pub const ALREADY_RUNNING_MSG: &str =
    "A command is already running; wait for it to finish or kill it first";

/// What `execute` did with a run request.
#[derive(Debug)]
pub enum ExecuteOutcome {
    /// Process spawned; call `poll` every `POLL_INTERVAL` until it finishes.
    Scheduled,
    /// A previous run is still active. Terminal for this request, nothing
    /// was spawned or queued.
    Rejected(String),
    /// Template resolution or spawn failed; the report is user-visible
    /// error text. No polling follows.
    Failed(String),
}

/// One voluntary completion check.
#[derive(Debug)]
pub enum PollStatus {
    /// No run in flight.
    Idle,
    /// Process still alive; re-arm and check again later.
    StillRunning,
    /// Run finished, report ready. The executor is idle again.
    Finished(String),
}

#[derive(Debug, Default)]
enum Phase {
    #[default]
    Idle,
    Waiting {
        resolved: String,
        output_path: PathBuf,
        max_lines: usize,
    },
}

/// Drives one command run end to end: resolve the template, hand it to the
/// guard, then answer completion checks until the capture is read.
#[derive(Debug, Default)]
pub struct CommandExecutor {
    guard: ProcessGuard,
    phase: Phase,
}

impl CommandExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `template` through `lookup` and start it as `/bin/sh -c`.
    pub fn execute<F>(
        &mut self,
        template: &str,
        lookup: F,
        output_path: &Path,
        max_lines: usize,
    ) -> ExecuteOutcome
    where
        F: Fn(&str) -> Option<String>,
    {
        let resolved = match template::resolve(template, lookup) {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!("Template resolution failed: {}", e);
                return ExecuteOutcome::Failed(error_report(&e));
            }
        };

        let argv = vec!["/bin/sh".to_string(), "-c".to_string(), resolved.clone()];

        match self.guard.run(&argv, output_path) {
            Ok(true) => {
                info!("Executing: {}", resolved);
                self.phase = Phase::Waiting {
                    resolved,
                    output_path: output_path.to_path_buf(),
                    max_lines,
                };
                ExecuteOutcome::Scheduled
            }
            Ok(false) => ExecuteOutcome::Rejected(ALREADY_RUNNING_MSG.to_string()),
            Err(e) => {
                warn!("Spawn failed: {}", e);
                ExecuteOutcome::Failed(error_report(&e))
            }
        }
    }

    /// One completion check. Callers re-arm this after `POLL_INTERVAL` for
    /// as long as it answers `StillRunning`; a capture-read failure still
    /// ends the run with an error-formatted report.
    pub fn poll(&mut self) -> PollStatus {
        let Phase::Waiting { .. } = &self.phase else {
            return PollStatus::Idle;
        };

        if self.guard.is_alive() {
            return PollStatus::StillRunning;
        }

        let Phase::Waiting {
            resolved,
            output_path,
            max_lines,
        } = std::mem::take(&mut self.phase)
        else {
            return PollStatus::Idle;
        };

        let report = match read_capture(&output_path, max_lines) {
            Ok(lines) => {
                info!("Run finished, captured {} line(s)", lines.len());
                build_report(&resolved, &lines)
            }
            Err(e) => {
                let e = GrepUiError::CaptureRead(e);
                warn!("{}", e);
                error_report(&e)
            }
        };

        PollStatus::Finished(report)
    }

    /// True while a run is in flight.
    pub fn is_scheduled(&self) -> bool {
        matches!(self.phase, Phase::Waiting { .. })
    }

    /// Cancel the active run, if any. Also clears the waiting phase so the
    /// next `poll` answers `Idle` instead of reading a half-written capture.
    pub fn kill(&mut self) -> bool {
        let killed = self.guard.kill();
        self.phase = Phase::Idle;
        killed
    }
}

/// Read the capture as UTF-8, keeping at most `max_lines` lines.
fn read_capture(path: &Path, max_lines: usize) -> std::io::Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);

    let mut lines = Vec::new();
    for line in reader.lines() {
        if lines.len() >= max_lines {
            break;
        }
        lines.push(line?);
    }

    Ok(lines)
}

fn build_report(resolved: &str, lines: &[String]) -> String {
    let mut report = String::from("Executed command: ");
    report.push_str(resolved);
    report.push_str("\n--\n\n");
    for line in lines {
        report.push_str(line);
        report.push('\n');
    }
    report
}

fn error_report(e: &GrepUiError) -> String {
    format!("Error: {}\n", e)
}
