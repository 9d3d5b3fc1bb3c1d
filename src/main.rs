//! Binary entrypoint for slide-show.
//!
//! Resolves what to show, then runs the slideshow task until it finishes or
//! Ctrl-C is pressed.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use slide_show::app::{self, Show};
use slide_show::config::Configuration;
use slide_show::error::ShowError;
use slide_show::events::SlideshowCommand;
use slide_show::intent::{Action, Intent};
use slide_show::logging;
use slide_show::media::DirectoryReference;
use slide_show::scan::FsDocumentTree;
use slide_show::slideshow::{Notifier, SlideshowDriver};
use slide_show::tasks::slideshow::{self, TimerQueue};
use slide_show::tasks::viewer::{LogNotifier, Viewer};

#[derive(Debug, Parser)]
#[command(name = "slide-show", about = "Timed slideshow of the images in a directory")]
struct Cli {
    /// Path to YAML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory or document-tree URI to show
    #[arg(long, value_name = "DIR|URI", conflicts_with_all = ["view", "send"])]
    dir: Option<String>,

    /// Handle an "open with" request for this URI
    #[arg(long, value_name = "URI", conflicts_with = "send")]
    view: Option<String>,

    /// Handle a "send to" request carrying this stream URI
    #[arg(long, value_name = "URI")]
    send: Option<String>,

    /// Override the slide-duration preference (ms, as text)
    #[arg(long, value_name = "MILLIS")]
    slide_duration: Option<String>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn intent(&self) -> Intent {
        match (&self.view, &self.send) {
            (Some(uri), _) => Intent::view(uri.as_str()),
            (None, Some(uri)) => Intent::send(uri.as_str()),
            (None, None) => Intent::main(),
        }
    }
}

fn load_config(cli: &Cli) -> Result<Configuration> {
    let mut cfg = match &cli.config {
        Some(path) => Configuration::from_yaml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Configuration::default(),
    };
    if let Some(text) = &cli.slide_duration {
        cfg.slide_duration = text.clone();
    }
    cfg.validated().context("validating configuration")
}

fn resolve_show(
    cli: &Cli,
    cfg: &Configuration,
    tree: &FsDocumentTree,
) -> Result<Option<Show>, ShowError> {
    let intent = cli.intent();
    if intent.action != Action::Main {
        return app::handle_intent(&intent, cfg, tree);
    }
    let reference = match (&cli.dir, &cfg.start_directory) {
        (Some(location), _) => app::directory_reference(location),
        (None, Some(dir)) => DirectoryReference::PlainPath(dir.clone()),
        (None, None) => return Ok(None),
    };
    app::open_directory(reference, cfg, tree).map(Some)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let cfg = load_config(&cli)?;
    let tree_root = match &cfg.tree_root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("resolving current directory")?,
    };
    let tree = FsDocumentTree::new(cfg.tree_authority.clone(), tree_root);

    let mut notifier = LogNotifier;
    let show = match resolve_show(&cli, &cfg, &tree) {
        Ok(Some(show)) => show,
        Ok(None) => {
            info!("nothing to show; pass --dir, --view or --send");
            return Ok(());
        }
        Err(err @ ShowError::PermissionRequired(_)) => {
            notifier.notify(&err.to_string());
            warn!("set storage-access: true in the configuration and run again");
            return Ok(());
        }
        Err(err) => {
            notifier.notify(&err.to_string());
            return Ok(());
        }
    };
    info!(source = %show.source, count = show.images.len(), "showing");

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let (tx, rx) = mpsc::channel(4);
    tx.send(SlideshowCommand::Start(show.images))
        .await
        .context("queueing slideshow start")?;
    drop(tx);

    let driver = SlideshowDriver::new(TimerQueue::new(), Viewer::new(), notifier);
    let driver = slideshow::run(driver, cfg, rx, cancel).await?;
    ctrl_c.abort();

    let state = driver.into_state();
    info!(
        index = state.current_index,
        count = state.images.len(),
        "slideshow ended"
    );
    Ok(())
}
