use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use crate::events::Displayed;
use crate::media::ImageList;
use crate::slideshow::{Notifier, Renderer};

/// Headless renderer: logs what is on screen and reports it on an optional channel.
#[derive(Debug, Default)]
pub struct Viewer {
    images: ImageList,
    current: Option<usize>,
    displayed: Option<UnboundedSender<Displayed>>,
}

impl Viewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(displayed: UnboundedSender<Displayed>) -> Self {
        Self {
            displayed: Some(displayed),
            ..Self::default()
        }
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    fn display(&mut self, index: usize, animate: bool) {
        let Some(item) = self.images.get(index) else {
            warn!(index, count = self.images.len(), "move past end of list ignored");
            return;
        };
        info!(index, animate, item = %item, "displaying");
        self.current = Some(index);
        if let Some(tx) = &self.displayed
            && tx
                .send(Displayed {
                    index,
                    item: item.clone(),
                })
                .is_err()
        {
            // Nobody is listening any more; keep rendering to the log.
            self.displayed = None;
        }
    }
}

impl Renderer for Viewer {
    fn show(&mut self, images: &ImageList) {
        self.images = images.clone();
        self.current = None;
        self.display(0, false);
    }

    fn move_to(&mut self, index: usize, animate: bool) {
        self.display(index, animate);
    }
}

/// Surfaces user-visible messages as warnings in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, message: &str) {
        warn!(target: "slide_show::alert", "{message}");
    }
}
