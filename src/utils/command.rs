//! External command execution.
//!
//! `exec!` runs a command to completion, captures its output, forwards the
//! interesting lines to the log and turns a non-zero exit status into an error.

use crate::log;
use anyhow::{Context, Result, bail};
use std::{
    ffi::OsString,
    path::Path,
    process::{Command, Output},
};

/// Run an external command with arguments.
///
/// # Examples
/// ```ignore
/// // Without working directory
/// exec!(["git"]; "status", "-s")?;
///
/// // With working directory
/// exec!(root; ["git"]; "commit", "-m", message)?;
/// ```
#[macro_export]
macro_rules! exec {
    ($root:expr; $cmd:expr; $($arg:expr),* $(,)?) => {{
        $crate::utils::command::exec(
            Some($root),
            &$crate::utils::command::to_cmd_vec($cmd),
            &$crate::utils::command::filter_args(&[$($crate::utils::command::to_os($arg)),*]),
        )
    }};
    ($cmd:expr; $($arg:expr),* $(,)?) => {{
        $crate::utils::command::exec(
            None,
            &$crate::utils::command::to_cmd_vec($cmd),
            &$crate::utils::command::filter_args(&[$($crate::utils::command::to_os($arg)),*]),
        )
    }};
}

// ============================================================================
// Argument Conversion
// ============================================================================

#[inline]
pub fn to_os<S: Into<OsString>>(s: S) -> OsString {
    s.into()
}

/// Anything usable as the program part of a command line.
pub trait ToCmd {
    fn to_cmd(self) -> Vec<OsString>;
}

impl<const N: usize> ToCmd for [&str; N] {
    #[inline]
    fn to_cmd(self) -> Vec<OsString> {
        self.into_iter().map(OsString::from).collect()
    }
}

#[inline]
pub fn to_cmd_vec<C: ToCmd>(cmd: C) -> Vec<OsString> {
    cmd.to_cmd()
}

/// Empty arguments are dropped, so optional flags can be passed as `""`.
#[inline]
pub fn filter_args(args: &[OsString]) -> Vec<OsString> {
    args.iter().filter(|a| !a.is_empty()).cloned().collect()
}

// ============================================================================
// Command Execution
// ============================================================================

/// Execute a command and capture its output.
///
/// # Errors
/// Returns error if the command cannot be spawned or exits unsuccessfully.
pub fn exec(root: Option<&Path>, cmd: &[OsString], args: &[OsString]) -> Result<Output> {
    let (name, mut command) = prepare(root, cmd, args)?;

    let output = command
        .output()
        .with_context(|| format!("Failed to execute `{name}`"))?;

    log_output(&name, &output)?;
    Ok(output)
}

fn prepare(root: Option<&Path>, cmd: &[OsString], args: &[OsString]) -> Result<(String, Command)> {
    let name = cmd
        .first()
        .and_then(|s| s.to_str())
        .context("Empty command")?
        .to_owned();

    let mut command = Command::new(&cmd[0]);
    command.args(&cmd[1..]).args(args);

    if let Some(dir) = root {
        command.current_dir(dir);
    }

    Ok((name, command))
}

// ============================================================================
// Output Filtering
// ============================================================================

/// Git prints advice on stderr even when it succeeds, e.g.
///
/// ```text
/// hint: Using 'master' as the name for the initial branch.
/// To github.com:user/repo.git
///    1a2b3c4..5d6e7f8  main -> main
/// ```
///
/// Lines starting with one of these prefixes are not forwarded to the log.
const NOISE_PREFIXES: &[&str] = &["hint:", "remote: ", "enumerating objects", "counting objects"];

fn is_noise(line: &str) -> bool {
    let lower = line.trim().to_ascii_lowercase();
    NOISE_PREFIXES.iter().any(|p| lower.starts_with(p))
}

fn forward(name: &str, output: &str) {
    output
        .lines()
        .filter(|line| !line.trim().is_empty() && !is_noise(line))
        .for_each(|line| log!(name; "{}", line.trim_end()));
}

/// Log command output, or fail with the first meaningful stderr line.
fn log_output(name: &str, output: &Output) -> Result<()> {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !output.status.success() {
        let reason = stderr
            .lines()
            .chain(stdout.lines())
            .map(str::trim)
            .find(|line| !line.is_empty() && !is_noise(line))
            .unwrap_or("no output");
        bail!("Command `{name}` failed with {}: {reason}", output.status);
    }

    forward(name, stdout.trim());
    forward(name, stderr.trim());

    Ok(())
}
