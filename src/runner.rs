use crate::error::GrepUiError;
use log::{debug, info};
use std::fs::File;
use std::io;
use std::path::Path;
use std::process::{Child, Command, Stdio};

/// Tracks at most one live external process. Owned by whoever drives the run
/// pipeline; construct independent instances freely (tests do).
///
/// Not synchronized: callers are expected to drive it from a single thread.
#[derive(Debug, Default)]
pub struct ProcessGuard {
    child: Option<Child>,
}

impl ProcessGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `argv` with stdout and stderr redirected into a freshly
    /// truncated file at `output_path`.
    ///
    /// Returns `Ok(false)` with no side effect when a process is already
    /// tracked; the caller must retry later, nothing is queued.
    pub fn run(&mut self, argv: &[String], output_path: &Path) -> Result<bool, GrepUiError> {
        if self.child.is_some() {
            debug!("run rejected, a tracked process is still live");
            return Ok(false);
        }

        let (program, args) = argv.split_first().ok_or_else(|| {
            GrepUiError::Spawn(io::Error::new(io::ErrorKind::InvalidInput, "empty argv"))
        })?;

        let stdout = File::create(output_path).map_err(GrepUiError::Spawn)?;
        let stderr = stdout.try_clone().map_err(GrepUiError::Spawn)?;

        let child = Command::new(program)
            .args(args)
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .spawn()
            .map_err(GrepUiError::Spawn)?;

        info!("Spawned pid {} -> {:?}", child.id(), output_path);
        self.child = Some(child);
        Ok(true)
    }

    /// Liveness query with lazy cleanup: the first call after the process
    /// exits clears the tracked handle.
    pub fn is_alive(&mut self) -> bool {
        let Some(child) = self.child.as_mut() else {
            return false;
        };

        match child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                debug!("Tracked process exited with {}", status);
                self.child = None;
                false
            }
            Err(e) => {
                debug!("try_wait failed ({}), dropping handle", e);
                self.child = None;
                false
            }
        }
    }

    /// Force-terminate the tracked process, if any.
    pub fn kill(&mut self) -> bool {
        let Some(mut child) = self.child.take() else {
            return false;
        };

        info!("Killing pid {}", child.id());
        let _ = child.kill();
        // Reap so the child does not linger as a zombie
        let _ = child.wait();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    fn sh(script: &str) -> Vec<String> {
        vec!["/bin/sh".to_string(), "-c".to_string(), script.to_string()]
    }

    fn scratch_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("grepui-runner-{}-{}", std::process::id(), name));
        path
    }

    fn wait_until_dead(guard: &mut ProcessGuard) {
        for _ in 0..500 {
            if !guard.is_alive() {
                return;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("process did not exit in time");
    }

    #[test]
    fn test_run_rejects_second_process() {
        let mut guard = ProcessGuard::new();
        let out = scratch_path("reject.out");

        assert!(guard.run(&sh("sleep 5"), &out).unwrap());
        // Second request while the first is alive: rejected, not queued
        assert!(!guard.run(&sh("true"), &out).unwrap());

        assert!(guard.kill());
        let _ = std::fs::remove_file(&out);
    }

    #[test]
    fn test_is_alive_clears_exited_handle_once() {
        let mut guard = ProcessGuard::new();
        let out = scratch_path("exit.out");

        assert!(guard.run(&sh("exit 0"), &out).unwrap());
        wait_until_dead(&mut guard);

        // Handle already cleared, second query has nothing to clean
        assert!(!guard.is_alive());
        assert!(!guard.kill());
        let _ = std::fs::remove_file(&out);
    }

    #[test]
    fn test_run_truncates_previous_capture() {
        let mut guard = ProcessGuard::new();
        let out = scratch_path("trunc.out");

        assert!(guard.run(&sh("echo first-run-output"), &out).unwrap());
        wait_until_dead(&mut guard);

        assert!(guard.run(&sh("echo short"), &out).unwrap());
        wait_until_dead(&mut guard);

        let captured = std::fs::read_to_string(&out).unwrap();
        assert_eq!(captured, "short\n");
        let _ = std::fs::remove_file(&out);
    }

    #[test]
    fn test_capture_merges_stdout_and_stderr() {
        let mut guard = ProcessGuard::new();
        let out = scratch_path("merge.out");

        assert!(guard.run(&sh("echo out; echo err >&2"), &out).unwrap());
        wait_until_dead(&mut guard);

        let captured = std::fs::read_to_string(&out).unwrap();
        assert!(captured.contains("out"));
        assert!(captured.contains("err"));
        let _ = std::fs::remove_file(&out);
    }

    #[test]
    fn test_kill_then_run_again() {
        let mut guard = ProcessGuard::new();
        let out = scratch_path("kill.out");

        assert!(guard.run(&sh("sleep 5"), &out).unwrap());
        assert!(guard.kill());
        assert!(!guard.kill());

        // Slot is free again
        assert!(guard.run(&sh("true"), &out).unwrap());
        wait_until_dead(&mut guard);
        let _ = std::fs::remove_file(&out);
    }

    #[test]
    fn test_spawn_failure_is_reported() {
        let mut guard = ProcessGuard::new();
        let out = scratch_path("spawn.out");

        let argv = vec!["/no/such/binary".to_string()];
        let err = guard.run(&argv, &out).unwrap_err();
        assert!(matches!(err, GrepUiError::Spawn(_)));

        // Nothing tracked after a failed spawn
        assert!(!guard.is_alive());
        let _ = std::fs::remove_file(&out);
    }
}
