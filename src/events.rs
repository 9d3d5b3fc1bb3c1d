use crate::media::{ImageItem, ImageList};

/// Commands accepted by the slideshow task.
#[derive(Debug, Clone)]
pub enum SlideshowCommand {
    /// Show a freshly enumerated list from its first item.
    Start(ImageList),
    Stop,
}

/// Emitted by the viewer whenever an item becomes the visible one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Displayed {
    pub index: usize,
    pub item: ImageItem,
}
