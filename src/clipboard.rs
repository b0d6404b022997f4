/*!
 * System clipboard access
 *
 * Text is piped into whichever clipboard command the platform offers. When
 * several are available they are tried in order until one succeeds.
 */

use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use thiserror::Error;
use tracing::{debug, warn};

/// Error type for clipboard operations
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// Failed to execute the command
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// No suitable clipboard mechanism was found
    #[error("No suitable clipboard mechanism found")]
    NoClipboardFound,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for clipboard operations
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Clipboard commands clipcat knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardProvider {
    /// tmux paste buffer, forwarded to the system clipboard with `-w`
    Tmux,
    /// Wayland
    WlCopy,
    /// X11 via xsel
    Xsel,
    /// X11 via xclip
    Xclip,
    /// macOS
    Pbcopy,
    /// Windows and WSL
    ClipExe,
    /// Android Termux
    Termux,
}

impl ClipboardProvider {
    /// Program and arguments that read the text from stdin
    pub fn command(self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::Tmux => ("tmux", &["load-buffer", "-w", "-"]),
            Self::WlCopy => ("wl-copy", &[]),
            Self::Xsel => ("xsel", &["-b", "-i"]),
            Self::Xclip => ("xclip", &["-selection", "clipboard", "-in"]),
            Self::Pbcopy => ("pbcopy", &[]),
            Self::ClipExe => ("clip.exe", &[]),
            Self::Termux => ("termux-clipboard-set", &[]),
        }
    }

    /// Copy text with this provider
    pub fn copy(self, text: &str) -> Result<()> {
        let (cmd, args) = self.command();
        pipe_to_command(cmd, args, text)
    }
}

/// Copy text to the first working clipboard provider
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let providers = detect_providers();
    if providers.is_empty() {
        return Err(ClipboardError::NoClipboardFound);
    }

    let mut last_error = None;
    for provider in providers {
        match provider.copy(text) {
            Ok(()) => {
                debug!(?provider, bytes = text.len(), "copied to clipboard");
                return Ok(());
            }
            Err(e) => {
                warn!(?provider, error = %e, "clipboard provider failed, trying next");
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or(ClipboardError::NoClipboardFound))
}

/// Check if a command is on the PATH
pub fn command_exists(command: &str) -> bool {
    let Some(paths) = env::var_os("PATH") else {
        return false;
    };
    env::split_paths(&paths).any(|dir| {
        let candidate = dir.join(command);
        candidate.is_file() || Path::new(&format!("{}.exe", candidate.display())).is_file()
    })
}

/// Clipboard providers usable on this machine, in order of preference
pub fn detect_providers() -> Vec<ClipboardProvider> {
    let mut candidates = Vec::with_capacity(4);

    // Inside tmux the paste buffer is what the user expects
    if env::var_os("TMUX").is_some() {
        candidates.push(ClipboardProvider::Tmux);
    }

    match platform() {
        "macos" => candidates.push(ClipboardProvider::Pbcopy),
        "windows" | "wsl" => candidates.push(ClipboardProvider::ClipExe),
        "android" => candidates.push(ClipboardProvider::Termux),
        "linux" => {
            if env::var_os("WAYLAND_DISPLAY").is_some() {
                candidates.push(ClipboardProvider::WlCopy);
            }
            candidates.push(ClipboardProvider::Xsel);
            candidates.push(ClipboardProvider::Xclip);
        }
        _ => {}
    }

    candidates
        .into_iter()
        .filter(|provider| command_exists(provider.command().0))
        .collect()
}

/// Write text to the stdin of a command and wait for it
fn pipe_to_command(cmd: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| ClipboardError::CommandFailed(format!("Failed to spawn {}: {}", cmd, e)))?;

    {
        let stdin = child.stdin.as_mut().ok_or_else(|| {
            ClipboardError::CommandFailed(format!("Failed to open stdin for {}", cmd))
        })?;
        stdin.write_all(text.as_bytes())?;
    }
    // Close stdin so the command sees EOF
    drop(child.stdin.take());

    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError::CommandFailed(format!(
            "{} exited with status: {}",
            cmd, status
        )))
    }
}

static PLATFORM: OnceLock<&'static str> = OnceLock::new();

/// Determine the platform (cached)
fn platform() -> &'static str {
    PLATFORM.get_or_init(|| {
        if cfg!(target_os = "macos") {
            "macos"
        } else if cfg!(target_os = "windows") {
            "windows"
        } else if cfg!(target_os = "android") {
            "android"
        } else if cfg!(target_os = "linux") {
            if env::var_os("WSL_DISTRO_NAME").is_some() {
                "wsl"
            } else {
                "linux"
            }
        } else {
            "unknown"
        }
    })
}
