//! Sound playback through an external player executable.

use std::ffi::CString;
use std::fmt;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use crate::config::{ConfigError, PlaybackConfig};

#[derive(Debug)]
pub enum PlaybackError {
    /// The player ran and exited unsuccessfully.
    Failed { status: ExitStatus, stderr: String },
    /// The player could not be started.
    Spawn { player: String, source: std::io::Error },
}

impl PlaybackError {
    /// Lines shown to the user, in order.
    pub fn user_lines(&self) -> Vec<String> {
        match self {
            PlaybackError::Failed { stderr, .. } => vec![
                "An error occurred when playing the sound.".to_string(),
                stderr.clone(),
            ],
            PlaybackError::Spawn { .. } => vec![self.to_string()],
        }
    }
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackError::Failed { status, .. } => {
                write!(f, "player exited with status {status}")
            }
            PlaybackError::Spawn { player, source } => {
                if source.kind() == std::io::ErrorKind::NotFound {
                    write!(f, "Cannot play sound: {player} not found")
                } else {
                    write!(f, "Cannot play sound: failed to run {player}: {source}")
                }
            }
        }
    }
}

impl std::error::Error for PlaybackError {}

/// Anything able to play a sound file.
///
/// Implementations may block until playback ends.
pub trait PlayerInvoker {
    fn play(&self, player: &str, sound_file: &Path) -> Result<(), PlaybackError>;
}

/// Runs `<player> <sound file>` as a child process and waits for it.
///
/// Stdin and stdout of the child are discarded, stderr is captured for the
/// error report.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandPlayer;

impl PlayerInvoker for CommandPlayer {
    fn play(&self, player: &str, sound_file: &Path) -> Result<(), PlaybackError> {
        let output = Command::new(player)
            .arg(sound_file)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| PlaybackError::Spawn {
                player: player.to_string(),
                source,
            })?;

        if output.status.success() {
            tracing::debug!(player, file = %sound_file.display(), "sound played");
            Ok(())
        } else {
            Err(PlaybackError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        }
    }
}

/// Readable by the current user, as checked by `access(2)`.
pub fn is_readable(path: &Path) -> bool {
    let Ok(path_c) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    unsafe { libc::access(path_c.as_ptr(), libc::R_OK) == 0 }
}

/// Fail with `Unreadable` unless the configured sound file can be read.
pub fn check_sound_file(config: &PlaybackConfig) -> Result<(), ConfigError> {
    if is_readable(&config.sound_file) {
        Ok(())
    } else {
        Err(ConfigError::Unreadable(config.sound_file.clone()))
    }
}
