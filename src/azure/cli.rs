//! Azure CLI command execution.
//!
//! Provides utilities for running Azure CLI commands and capturing their output.

use colored::Colorize;
use regex::Regex;
use std::sync::OnceLock;
use tokio::process::Command;

/// Largest stdout accepted from a single command.
const MAX_OUTPUT_BYTES: usize = 10_000_000;

/// Regex for splitting command strings while preserving quoted substrings.
static COMMAND_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_command_regex() -> &'static Regex {
    COMMAND_REGEX.get_or_init(|| {
        Regex::new(r#"'([^']*)'\s*|\"([^\"]*)\"\s*|([^'\s]*)\s*"#).expect("Invalid Regex")
    })
}

/// Failure to run a command or a non-zero exit.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to execute command: {0}")]
    Spawn(String),
    #[error("command exited with {code:?}: {stderr}")]
    Failed { code: Option<i32>, stderr: String },
    #[error("response too large: {0} bytes")]
    TooLarge(usize),
    #[error("invalid UTF-8 in output: {0}")]
    Utf8(String),
}

/// Run a command line and return its stdout.
///
/// The command string is split on spaces, with quoted substrings preserved.
pub async fn run(cmd: &str) -> Result<String, CliError> {
    let cmds: Vec<String> = split_and_strip(cmd)
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    log::trace!("split cmds={:?}", cmds);
    run_args(&cmds).await
}

/// Run a program with an explicit argument list and return its stdout.
///
/// Use this when an argument (e.g. a JSON body) must not be split.
pub async fn run_args(args: &[String]) -> Result<String, CliError> {
    let (program, rest) = args
        .split_first()
        .ok_or_else(|| CliError::Spawn("empty command".to_string()))?;
    let display = format!("{program} {}", redact(rest).join(" "));
    log::debug!("run({cmd})", cmd = display.on_blue());

    let output = Command::new(program)
        .args(rest)
        .output()
        .await
        .map_err(|e| {
            log::error!("Command execution failed: {}", e);
            CliError::Spawn(e.to_string())
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        log::trace!(
            "code={code:?}, status={status}\n┎######\nstderr=\n{stderr}\n┖######",
            code = output.status.code(),
            status = output.status,
            stderr = stderr.red()
        );
        log::warn!(
            "{failed} to run {cmd}",
            failed = "failed".on_red(),
            cmd = display.on_blue()
        );
        return Err(CliError::Failed {
            code: output.status.code(),
            stderr,
        });
    }

    log::debug!("Success output.stdout.len(): {}", output.stdout.len());
    if output.stdout.len() > MAX_OUTPUT_BYTES {
        return Err(CliError::TooLarge(output.stdout.len()));
    }

    String::from_utf8(output.stdout).map_err(|e| CliError::Utf8(e.to_string()))
}

/// Split a command string on spaces, preserving quoted substrings.
fn split_and_strip(input: &str) -> Vec<&str> {
    get_command_regex()
        .find_iter(input)
        .map(|m| m.as_str().trim().trim_matches('\'').trim_matches('"'))
        .collect()
}

/// Replace request bodies with a placeholder so logs stay readable.
fn redact(args: &[String]) -> Vec<&str> {
    let mut out = Vec::with_capacity(args.len());
    let mut hide_next = false;
    for arg in args {
        if hide_next {
            out.push("<body>");
            hide_next = false;
        } else {
            hide_next = arg == "--body";
            out.push(arg.as_str());
        }
    }
    out
}
