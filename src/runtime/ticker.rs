//! The periodic tick task behind cursor-driven autoscroll.
//!
//! The task runs on the timer executor and only ever posts the owning
//! widget's id into the shell's tick channel; the embedder drains that
//! channel on the UI thread and dispatches tick events. Offsets are never
//! touched from the timer side.

use std::time::Duration;

use futures::StreamExt;
use futures::channel::mpsc;

pub type TickSender = mpsc::UnboundedSender<u64>;
pub type TickReceiver = mpsc::UnboundedReceiver<u64>;

pub struct Ticker {
    interval: Duration,
    task: Option<smol::Task<()>>,
}

impl std::fmt::Debug for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ticker")
            .field("interval", &self.interval)
            .field("running", &self.task.is_some())
            .finish()
    }
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            task: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Starts posting `id` into `ticks` every interval.
    pub fn start(&mut self, id: u64, ticks: TickSender) {
        debug_assert!(self.task.is_none(), "ticker already running");

        let interval = self.interval;
        self.task = Some(smol::spawn(async move {
            let mut timer = smol::Timer::interval(interval);
            loop {
                timer.next().await;
                if ticks.unbounded_send(id).is_err() {
                    break;
                }
            }
        }));
    }

    /// Stops the tick task. Dropping the task handle cancels it, so no tick
    /// is posted after this returns; ticks already in the channel are
    /// neutralized by the gesture's own guard.
    pub fn stop(&mut self) {
        self.task = None;
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
