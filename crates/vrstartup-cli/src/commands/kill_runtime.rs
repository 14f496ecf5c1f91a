//! Force-terminate the VR runtime's processes.

use std::process::{Command, ExitStatus};

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::{Confirm, theme::ColorfulTheme};
use tracing::{debug, warn};

/// Runtime processes, in the order they are terminated.
pub(crate) const RUNTIME_PROCESSES: [&str; 3] = ["vrserver", "vrcompositor", "vrmonitor"];

/// What happened to one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KillResult {
    Killed,
    NotRunning,
    Failed(Option<i32>),
}

impl KillResult {
    fn from_status(status: ExitStatus) -> Self {
        if status.success() {
            return Self::Killed;
        }
        match status.code() {
            Some(code) if code == NOT_RUNNING_CODE => Self::NotRunning,
            code => Self::Failed(code),
        }
    }
}

/// Exit code the kill tool uses for "no such process".
#[cfg(windows)]
const NOT_RUNNING_CODE: i32 = 128;
#[cfg(not(windows))]
const NOT_RUNNING_CODE: i32 = 1;

/// The command that force-terminates every process named `name`.
pub(crate) fn kill_command(name: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("taskkill");
        cmd.args(["/F", "/IM", &format!("{name}.exe")]);
        cmd
    } else {
        let mut cmd = Command::new("pkill");
        cmd.args(["-KILL", "-x", name]);
        cmd
    }
}

/// Ask for confirmation, then terminate the runtime.
pub(crate) fn run_kill_runtime(yes: bool) -> Result<()> {
    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Force-close the VR runtime? Unsaved state in running VR apps is lost")
            .default(false)
            .interact()?;
        if !confirmed {
            println!("{}", "Cancelled.".dimmed());
            return Ok(());
        }
    }

    for name in RUNTIME_PROCESSES {
        print!("  Stopping {name}... ");
        let status = kill_command(name)
            .output()
            .with_context(|| format!("failed to run the kill command for {name}"))?
            .status;

        match KillResult::from_status(status) {
            KillResult::Killed => {
                debug!(process = name, "terminated");
                println!("{}", "OK".green());
            },
            KillResult::NotRunning => println!("{}", "not running".dimmed()),
            KillResult::Failed(code) => {
                warn!(process = name, ?code, "kill command failed");
                println!("{}", "FAIL".red());
            },
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_processes_cover_server_compositor_and_monitor() {
        assert_eq!(RUNTIME_PROCESSES, ["vrserver", "vrcompositor", "vrmonitor"]);
    }

    #[cfg(windows)]
    #[test]
    fn test_kill_command_uses_taskkill_by_image_name() {
        let cmd = kill_command("vrserver");
        assert_eq!(cmd.get_program(), "taskkill");
        assert_eq!(args(&cmd), ["/F", "/IM", "vrserver.exe"]);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_kill_command_matches_exact_process_name() {
        let cmd = kill_command("vrserver");
        assert_eq!(cmd.get_program(), "pkill");
        assert_eq!(args(&cmd), ["-KILL", "-x", "vrserver"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_codes_classified() {
        use std::os::unix::process::ExitStatusExt;

        assert_eq!(KillResult::from_status(ExitStatus::from_raw(0)), KillResult::Killed);
        assert_eq!(KillResult::from_status(ExitStatus::from_raw(1 << 8)), KillResult::NotRunning);
        assert_eq!(
            KillResult::from_status(ExitStatus::from_raw(3 << 8)),
            KillResult::Failed(Some(3))
        );
    }
}
