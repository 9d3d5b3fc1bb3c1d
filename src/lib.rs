pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod intent;
pub mod logging;
pub mod media;
pub mod scan;
pub mod slideshow;
pub mod uri;
pub mod tasks {
    pub mod slideshow;
    pub mod viewer;
}
