//! Timer-driven slideshow state machine.
//!
//! The driver never sleeps or spawns anything itself. It asks a
//! [`TickScheduler`] for a cancellable tick, and whoever owns the scheduler
//! calls [`SlideshowDriver::on_tick`] when that tick comes due. Ticks and
//! commands are therefore serialized by the caller's event loop.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::{DEFAULT_SLIDE_DURATION, Preferences, parse_slide_duration};
use crate::error::ShowError;
use crate::media::ImageList;

/// Identity of one scheduled tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TickId(pub u64);

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick#{}", self.0)
    }
}

/// Deferred, cancellable callbacks.
pub trait TickScheduler {
    /// Arrange for a tick after `delay`.
    fn schedule(&mut self, delay: Duration) -> TickId;

    /// Remove a pending tick. Once this returns the tick can no longer fire.
    fn cancel(&mut self, tick: TickId);
}

/// Whatever puts images on screen.
pub trait Renderer {
    /// Replace the displayed list; the first item becomes visible.
    fn show(&mut self, images: &ImageList);

    fn move_to(&mut self, index: usize, animate: bool);
}

/// User-visible messages (alerts, toasts).
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Stopped,
}

/// Everything the driver knows about the current show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideshowState {
    pub images: ImageList,
    pub current_index: usize,
    pub interval: Duration,
    pub running: bool,
}

impl Default for SlideshowState {
    fn default() -> Self {
        Self {
            images: ImageList::empty(),
            current_index: 0,
            interval: DEFAULT_SLIDE_DURATION,
            running: false,
        }
    }
}

pub struct SlideshowDriver<S, R, N> {
    state: SlideshowState,
    phase: Phase,
    pending: Option<TickId>,
    scheduler: S,
    renderer: R,
    notifier: N,
}

impl<S, R, N> SlideshowDriver<S, R, N>
where
    S: TickScheduler,
    R: Renderer,
    N: Notifier,
{
    pub fn new(scheduler: S, renderer: R, notifier: N) -> Self {
        Self {
            state: SlideshowState::default(),
            phase: Phase::Idle,
            pending: None,
            scheduler,
            renderer,
            notifier,
        }
    }

    pub fn state(&self) -> &SlideshowState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn pending_tick(&self) -> Option<TickId> {
        self.pending
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Start showing `images` from the first item.
    ///
    /// A running show is cancelled first. An empty list changes nothing and
    /// returns `false`.
    pub fn start<P>(&mut self, images: ImageList, prefs: &P) -> bool
    where
        P: Preferences + ?Sized,
    {
        if images.is_empty() {
            debug!("ignoring start with an empty image list");
            return false;
        }
        self.cancel_pending();

        let interval = self.slide_interval(prefs);
        info!(
            count = images.len(),
            interval = %humantime::format_duration(interval),
            "slideshow starting"
        );
        self.renderer.show(&images);
        self.state = SlideshowState {
            images,
            current_index: 0,
            interval,
            running: true,
        };
        self.phase = Phase::Running;
        self.pending = Some(self.scheduler.schedule(interval));
        true
    }

    /// Advance for the tick `tick`. Ticks other than the pending one are ignored.
    pub fn on_tick(&mut self, tick: TickId) {
        if self.phase != Phase::Running || self.pending != Some(tick) {
            debug!(%tick, phase = ?self.phase, "stale tick ignored");
            return;
        }
        self.pending = None;

        let next = self.state.current_index + 1;
        if next < self.state.images.len() {
            self.state.current_index = next;
            debug!(index = next, item = %self.state.images[next], "advancing");
            self.renderer.move_to(next, true);
            self.pending = Some(self.scheduler.schedule(self.state.interval));
        } else {
            info!(shown = self.state.images.len(), "slideshow finished");
            self.halt();
        }
    }

    /// Cancel the pending tick and leave the current image on screen.
    pub fn stop(&mut self) {
        self.cancel_pending();
        if self.phase == Phase::Running {
            info!(index = self.state.current_index, "slideshow stopped");
            self.halt();
        }
    }

    pub fn into_state(self) -> SlideshowState {
        self.state
    }

    fn halt(&mut self) {
        self.phase = Phase::Stopped;
        self.state.running = false;
    }

    fn cancel_pending(&mut self) {
        if let Some(tick) = self.pending.take() {
            debug!(%tick, "cancelling pending tick");
            self.scheduler.cancel(tick);
        }
    }

    fn slide_interval<P>(&mut self, prefs: &P) -> Duration
    where
        P: Preferences + ?Sized,
    {
        match parse_slide_duration(&prefs.slide_duration_text()) {
            Ok(interval) => interval,
            Err(err) => {
                warn!(
                    fallback = %humantime::format_duration(DEFAULT_SLIDE_DURATION),
                    "{err}"
                );
                self.notifier.notify(&ShowError::from(err).to_string());
                DEFAULT_SLIDE_DURATION
            }
        }
    }
}

/// In-memory [`TickScheduler`]; ticks fire only when the owner pops them.
#[derive(Debug, Default)]
pub struct ManualTicks {
    next_id: u64,
    pending: Vec<(TickId, Duration)>,
    scheduled: usize,
}

impl ManualTicks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending ticks in scheduling order.
    pub fn pending(&self) -> &[(TickId, Duration)] {
        &self.pending
    }

    /// Total number of ticks ever scheduled.
    pub fn scheduled(&self) -> usize {
        self.scheduled
    }

    /// Remove and return the oldest pending tick.
    pub fn pop(&mut self) -> Option<TickId> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0).0)
        }
    }
}

impl TickScheduler for ManualTicks {
    fn schedule(&mut self, delay: Duration) -> TickId {
        self.next_id += 1;
        let tick = TickId(self.next_id);
        self.pending.push((tick, delay));
        self.scheduled += 1;
        tick
    }

    fn cancel(&mut self, tick: TickId) {
        self.pending.retain(|(id, _)| *id != tick);
    }
}

impl Notifier for Vec<String> {
    fn notify(&mut self, message: &str) {
        self.push(message.to_owned());
    }
}
