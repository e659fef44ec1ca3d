// src/exec/runner.rs

//! Runs one external process to completion.

use std::process::Stdio;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{PluginError, Result};
use crate::exec::invocation::Invocation;
use crate::exec::scratch::ScratchDir;

/// Where stdout lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sink {
    Log(&'static str),
    Capture,
}

/// Run `invocation` and wait for it to exit.
///
/// - The child runs in `invocation.cwd` with the inherited environment,
///   overlaid by `invocation.env`, overlaid by `TMP`/`TEMP`/`TMPDIR` pointing
///   at a scratch directory that is removed before this function returns.
/// - stderr is always relayed to the log; stdout is relayed too unless
///   `capture_output` is set, in which case it is returned.
/// - Both streams are read concurrently with the child so neither pipe can
///   fill up and stall it.
/// - A non-zero exit is returned as [`PluginError::CommandFailed`].
pub async fn run_process(invocation: &Invocation) -> Result<Option<String>> {
    let (program, args) = invocation
        .argv
        .split_first()
        .ok_or_else(|| PluginError::ConfigError("cannot run an empty command".to_string()))?;

    let scratch = ScratchDir::acquire()?;
    let command_line = invocation.display_command();

    info!(
        command = %command_line,
        cwd = %invocation.cwd.display(),
        capture = invocation.capture_output,
        "starting process"
    );

    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(&invocation.cwd)
        .envs(&invocation.env)
        .envs(scratch.env_vars())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning `{command_line}`"))?;

    let stdout = child.stdout.take().context("child stdout was not piped")?;
    let stderr = child.stderr.take().context("child stderr was not piped")?;

    let stdout_sink = if invocation.capture_output {
        Sink::Capture
    } else {
        Sink::Log("<out> ")
    };
    let stdout_task = tokio::spawn(consume_lines(stdout, stdout_sink));
    let stderr_task = tokio::spawn(consume_lines(stderr, Sink::Log("<err> ")));

    let (status, captured, stderr_done) = tokio::join!(child.wait(), stdout_task, stderr_task);

    let status = status.with_context(|| format!("waiting for `{command_line}`"))?;
    let captured = captured
        .context("stdout reader panicked")?
        .context("reading child stdout")?;
    stderr_done
        .context("stderr reader panicked")?
        .context("reading child stderr")?;

    let code = status.code().unwrap_or(-1);
    info!(
        command = %command_line,
        exit_code = code,
        success = status.success(),
        "process exited"
    );

    debug!(scratch = %scratch.path().display(), "releasing scratch directory");
    drop(scratch);

    if !status.success() {
        return Err(PluginError::CommandFailed {
            argv: invocation.argv.clone(),
            command: command_line,
            code,
        });
    }

    Ok(captured)
}

/// Drain `reader` line by line until EOF.
///
/// Lines are split on raw `\n` bytes and decoded lossily, so non-UTF-8
/// output never stops the drain or fails the call.
async fn consume_lines<R>(reader: R, sink: Sink) -> std::io::Result<Option<String>>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut raw = Vec::new();
    let mut buffer = match sink {
        Sink::Capture => Some(String::new()),
        Sink::Log(_) => None,
    };

    loop {
        raw.clear();
        if reader.read_until(b'\n', &mut raw).await? == 0 {
            break;
        }
        let bytes = raw.strip_suffix(b"\n").unwrap_or(&raw);
        let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
        let line = String::from_utf8_lossy(bytes);

        match (&mut buffer, sink) {
            (Some(buf), _) => {
                buf.push_str(&line);
                buf.push('\n');
            }
            (None, Sink::Log(prefix)) => info!("{}{}", prefix, line),
            (None, Sink::Capture) => {}
        }
    }

    Ok(buffer)
}
