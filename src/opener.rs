use std::process::Command;

use tracing::{info, warn};
use url::Url;

/// Capability that opens a resolved link. Fire-and-forget: failures stay
/// with the opener.
pub trait UrlOpener {
    fn open_url(&mut self, url: &Url);
}

/// Hands URLs to the platform's default handler.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open_url(&mut self, url: &Url) {
        info!(%url, "opening link");
        if let Err(e) = open_command(url.as_str()).spawn() {
            warn!(%url, error = %e, "failed to launch url handler");
        }
    }
}

#[cfg(target_os = "macos")]
fn open_command(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "windows")]
fn open_command(url: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", url]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn open_command(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}

/// Keeps every URL it is asked to open.
#[derive(Clone, Debug, Default)]
pub struct RecordingOpener {
    pub opened: Vec<Url>,
}

impl UrlOpener for RecordingOpener {
    fn open_url(&mut self, url: &Url) {
        self.opened.push(url.clone());
    }
}
