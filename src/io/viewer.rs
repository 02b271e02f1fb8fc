//! Open the written report in the platform's default viewer.
//!
//! Launch failures are never fatal: the file already exists on disk and can be
//! opened by hand.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{info, warn};

/// Ask the OS to open `path`. Returns whether the opener was launched.
pub fn open_in_viewer(path: &Path) -> bool {
    let mut cmd = opener_command(path);
    cmd.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());

    match cmd.spawn() {
        Ok(_) => {
            info!("opened {} in the default viewer", path.display());
            true
        }
        Err(e) => {
            warn!(
                "could not launch a viewer for {} ({e}); open it manually",
                path.display()
            );
            false
        }
    }
}

fn opener_command(path: &Path) -> Command {
    if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        // The empty string is the window title `start` expects first.
        cmd.args(["/C", "start", ""]).arg(path);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    }
}
