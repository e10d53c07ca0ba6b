//! Command execution for the aws cli.

use crate::config::MAX_CLI_OUTPUT_BYTES;
use crate::error::ApiError;
use colored::Colorize;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

/// Run `program` with `args` and return its stdout.
///
/// Arguments are passed as-is, no shell is involved. The child is killed when
/// `ctx` is cancelled.
///
/// # Returns
/// * `Ok(String)` - stdout on a zero exit status
/// * `Err(ApiError::Command)` - the process could not start or exited non-zero;
///   the message carries stderr
/// * `Err(ApiError::Cancelled)` - `ctx` fired before the process finished
pub async fn run(
    ctx: &CancellationToken,
    program: &str,
    args: &[String],
) -> Result<String, ApiError> {
    let cmd_line = format!("{program} {}", args.join(" "));
    log::debug!("run({cmd})", cmd = cmd_line.on_blue());

    let mut command = Command::new(program);
    command.args(args).kill_on_drop(true);
    let pending = command.output();

    let output = tokio::select! {
        biased;
        _ = ctx.cancelled() => {
            log::warn!("{} {cmd}", "cancelled".on_yellow(), cmd = cmd_line);
            return Err(ApiError::Cancelled);
        }
        out = pending => out.map_err(|e| {
            log::error!("Command execution failed: {}", e);
            ApiError::Command(format!("Failed to execute {program}: {e}"))
        })?,
    };

    if output.status.success() {
        log::debug!("Success cmd: {cmd_line}");
        log::debug!("Success output.stdout.len(): {}", output.stdout.len());

        if output.stdout.len() > MAX_CLI_OUTPUT_BYTES {
            return Err(ApiError::Command(format!(
                "Response too large: {} bytes for command: {cmd_line}",
                output.stdout.len()
            )));
        }
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::trace!(
            "code={code:?}, status={status}\n┎######\nstderr=\n{stderr}\n┖######",
            code = output.status.code(),
            status = output.status,
            stderr = stderr.red()
        );
        log::warn!(
            "{failed} to run {cmd}",
            failed = "failed".on_red(),
            cmd = cmd_line.on_blue()
        );
        return Err(ApiError::Command(stderr.trim().to_string()));
    }

    String::from_utf8(output.stdout).map_err(|e| ApiError::Parse(format!("Invalid UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_missing_program() {
        let ctx = CancellationToken::new();
        let err = run(&ctx, "definitely-not-a-real-program-42", &[])
            .await
            .expect_err("Program should not exist");
        assert!(matches!(err, ApiError::Command(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_run_cancelled_before_start() {
        let ctx = CancellationToken::new();
        ctx.cancel();
        let err = run(&ctx, "sleep", &["5".to_string()])
            .await
            .expect_err("Cancelled token");
        assert_eq!(err, ApiError::Cancelled);
    }

    #[tokio::test]
    async fn test_run_cancel_kills_running_child() {
        let ctx = CancellationToken::new();
        let cancel = ctx.clone();
        let canceller = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(50));
            cancel.cancel();
        });

        let started = std::time::Instant::now();
        let err = run(&ctx, "sleep", &["5".to_string()])
            .await
            .expect_err("Cancelled while running");
        assert_eq!(err, ApiError::Cancelled);
        assert!(
            started.elapsed() < std::time::Duration::from_secs(2),
            "took {:?}",
            started.elapsed()
        );
        canceller.join().expect("Canceller thread panicked");
    }
}
