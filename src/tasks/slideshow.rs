use std::time::Duration;

use anyhow::Result;
use tokio::select;
use tokio::sync::mpsc::Receiver;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::config::Preferences;
use crate::events::SlideshowCommand;
use crate::slideshow::{Notifier, Renderer, SlideshowDriver, TickId, TickScheduler};

/// Deadline-ordered tick queue polled by [`run`].
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    entries: Vec<(Instant, TickId)>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|(at, _)| *at).min()
    }

    /// Remove and return the earliest tick due at or before `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<TickId> {
        let (pos, _) = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, (at, _))| *at <= now)
            .min_by_key(|(_, (at, id))| (*at, *id))?;
        Some(self.entries.remove(pos).1)
    }
}

impl TickScheduler for TimerQueue {
    fn schedule(&mut self, delay: Duration) -> TickId {
        self.next_id += 1;
        let tick = TickId(self.next_id);
        self.entries.push((Instant::now() + delay, tick));
        tick
    }

    fn cancel(&mut self, tick: TickId) {
        self.entries.retain(|(_, id)| *id != tick);
    }
}

/// Drive a slideshow on the current task until cancelled.
///
/// Commands, due ticks and cancellation are handled one at a time by a single
/// `select!`, so a tick can never race a stop or a restart. The loop also ends
/// once the command channel is closed and no tick is pending. The driver is
/// handed back so callers can inspect the final state.
#[instrument(skip_all)]
pub async fn run<R, N, P>(
    mut driver: SlideshowDriver<TimerQueue, R, N>,
    prefs: P,
    mut commands: Receiver<SlideshowCommand>,
    cancel: CancellationToken,
) -> Result<SlideshowDriver<TimerQueue, R, N>>
where
    R: Renderer,
    N: Notifier,
    P: Preferences,
{
    let mut commands_open = true;

    loop {
        let deadline = driver.scheduler().next_deadline();
        if !commands_open && deadline.is_none() {
            debug!("no commands and no pending tick; exiting slideshow task");
            break;
        }

        select! {
            _ = cancel.cancelled() => {
                info!("cancel received; exiting slideshow task");
                driver.stop();
                break;
            }

            cmd = commands.recv(), if commands_open => match cmd {
                Some(SlideshowCommand::Start(images)) => {
                    if !driver.start(images, &prefs) {
                        warn!(
                            running = driver.is_running(),
                            "start with an empty image list ignored"
                        );
                    }
                }
                Some(SlideshowCommand::Stop) => driver.stop(),
                None => {
                    debug!("command channel closed");
                    commands_open = false;
                }
            },

            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                while let Some(tick) = driver.scheduler_mut().pop_due(Instant::now()) {
                    driver.on_tick(tick);
                }
            }
        }
    }

    Ok(driver)
}
