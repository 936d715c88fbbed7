use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

use crate::host::{BufferProperty, Host};
use crate::player::{PlaybackError, PlayerInvoker};

pub struct RecordingHost {
    lines: RefCell<Vec<String>>,
    buffers: HashMap<String, (String, String)>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            lines: RefCell::new(Vec::new()),
            buffers: HashMap::new(),
        }
    }

    pub fn with_buffer(mut self, handle: &str, name: &str, nick: &str) -> Self {
        self.buffers
            .insert(handle.to_string(), (name.to_string(), nick.to_string()));
        self
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl Host for RecordingHost {
    fn print(&self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }

    fn error_prefix(&self) -> &str {
        "!!"
    }

    fn buffer_string(&self, buffer: &str, property: BufferProperty) -> String {
        self.buffers
            .get(buffer)
            .map(|(name, nick)| match property {
                BufferProperty::Name => name.clone(),
                BufferProperty::LocalNick => nick.clone(),
            })
            .unwrap_or_default()
    }
}

/// Records calls instead of spawning anything; fails when `stderr` is set.
#[derive(Default)]
pub struct CountingPlayer {
    pub calls: Cell<usize>,
    pub last: RefCell<Option<(String, PathBuf)>>,
    pub stderr: Option<String>,
}

impl CountingPlayer {
    pub fn failing(stderr: &str) -> Self {
        Self {
            stderr: Some(stderr.to_string()),
            ..Self::default()
        }
    }
}

impl PlayerInvoker for CountingPlayer {
    fn play(&self, player: &str, sound_file: &Path) -> Result<(), PlaybackError> {
        self.calls.set(self.calls.get() + 1);
        *self.last.borrow_mut() = Some((player.to_string(), sound_file.to_path_buf()));
        match &self.stderr {
            None => Ok(()),
            Some(stderr) => Err(PlaybackError::Failed {
                status: failed_status(),
                stderr: stderr.clone(),
            }),
        }
    }
}

fn failed_status() -> ExitStatus {
    // wait status for exit code 1
    ExitStatus::from_raw(1 << 8)
}
