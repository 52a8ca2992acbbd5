use std::process::Command;

use tracing::{info, warn};

/// Platform command that hands `url` to the default browser.
pub fn launcher_command(url: &str) -> Command {
    #[cfg(target_os = "windows")]
    {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]).arg(url);
        cmd
    }
    #[cfg(target_os = "macos")]
    {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        cmd
    }
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        cmd
    }
}

/// Opens `url` in the system browser without blocking the caller.
pub fn open_url(url: &str) {
    let url = url.to_string();
    std::thread::spawn(move || match launcher_command(&url).status() {
        Ok(status) if status.success() => info!(%url, "opened in browser"),
        Ok(status) => warn!(%url, %status, "browser launcher exited with failure"),
        Err(e) => warn!(%url, error = %e, "could not launch browser"),
    });
}
