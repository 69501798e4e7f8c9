use std::io;
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

use netpong::SessionStatus;

use crate::tui::Tui;

const REDRAW_INTERVAL: Duration = Duration::from_millis(500);

/// Draws the session status until `stop` fires, then hands the terminal
/// back.
pub fn spawn_status_display(
    mut tui: Tui,
    status: watch::Receiver<SessionStatus>,
    stop: oneshot::Receiver<()>,
) -> JoinHandle<io::Result<Tui>> {
    tokio::spawn(async move {
        show_status(|current| tui.draw_status(current), status, stop).await?;
        Ok(tui)
    })
}

/// Redraws on every status change and periodically for resizes. Ends when
/// `stop` fires or its sender is dropped, or on the first draw error.
async fn show_status<F>(
    mut draw: F,
    mut status: watch::Receiver<SessionStatus>,
    mut stop: oneshot::Receiver<()>,
) -> io::Result<()>
where
    F: FnMut(&SessionStatus) -> io::Result<()>,
{
    let mut redraw = tokio::time::interval(REDRAW_INTERVAL);
    let mut watching = true;

    loop {
        let current = status.borrow_and_update().clone();
        draw(&current)?;

        tokio::select! {
            _ = &mut stop => return Ok(()),
            changed = status.changed(), if watching => {
                watching = changed.is_ok();
            }
            _ = redraw.tick() => {}
        }
    }
}
