//! One-shot timers that deliver a message to the event loop.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// A message scheduled for delivery after a delay.
///
/// Dropping the task cancels it; a cancelled task never sends.
#[derive(Debug)]
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Sends `msg` on `tx` once `delay` has elapsed.
    pub fn after<M>(delay: Duration, tx: &UnboundedSender<M>, msg: M) -> Self
    where
        M: Send + 'static,
    {
        let tx = tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the loop has exited.
            let _ = tx.send(msg);
        });
        Self { handle }
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
