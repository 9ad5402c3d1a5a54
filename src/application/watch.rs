//! Live display loop.
//!
//! Drives two periodic ticks on the current task: a fine display tick that
//! redraws the elapsed time in place, and a coarse durability tick that
//! rewrites the persisted snapshot and re-samples the system theme while no
//! explicit preference is stored. Both intervals are owned by the loop, so
//! at most one live pair exists per stopwatch and both die when the loop
//! returns.
//!
//! The loop owns the store while it runs: the durability tick rewrites the
//! snapshot from the state loaded at startup, so keys written by a second
//! invocation in the meantime are overwritten within one tick. There is no
//! multi-session coordination.

use std::io::Write;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};

use crate::domain::{AppError, Result};

use super::formatter::format_status;
use super::stopwatch::StopwatchService;
use super::theme::ThemeController;

/// Run the live display until Ctrl-C.
///
/// # Errors
/// Returns error if the terminal cannot be written to.
pub async fn run_watch(
    service: &StopwatchService<'_>,
    theme: &ThemeController<'_>,
    tick_ms: u64,
    persist_secs: u64,
) -> Result<()> {
    let (mut dark, _) = theme.effective();

    let mut display = interval(Duration::from_millis(tick_ms.max(1)));
    display.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut persist = interval(Duration::from_secs(persist_secs.max(1)));
    persist.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut stdout = std::io::stdout();
    tracing::debug!(tick_ms, persist_secs, "Watch loop started");

    loop {
        tokio::select! {
            _ = display.tick() => {
                let line = format_status(
                    service.phase(),
                    &service.formatted_elapsed(),
                    service.laps().len(),
                    dark,
                );
                // redraw in place; trailing spaces clear a shrinking line
                write!(stdout, "\r{line}    ")
                    .and_then(|()| stdout.flush())
                    .map_err(|e| AppError::io("Failed to write to terminal", e))?;
            }
            _ = persist.tick() => {
                service.persist_snapshot();
                if theme.follows_system() {
                    (dark, _) = theme.effective();
                }
            }
            _ = &mut ctrl_c => {
                break;
            }
        }
    }

    // leave the last reading on its own line and make it durable
    writeln!(stdout).map_err(|e| AppError::io("Failed to write to terminal", e))?;
    service.persist_snapshot();
    tracing::debug!("Watch loop stopped");

    Ok(())
}
