//! A host driven by JSON lines on stdin.
//!
//! Each line is one object tagged by `"event"`:
//!
//! ```text
//! {"event":"buffer","handle":"0x1","name":"irc.libera.#rust","nick":"me"}
//! {"event":"print","buffer":"0x1","date":"1700000000","tags":"irc_privmsg,nick_bob","displayed":"1","highlight":"0","prefix":"bob","message":"hi"}
//! {"event":"command","buffer":"0x1","args":"off"}
//! ```
//!
//! Printed lines go to the output as `HH:MM:SS<TAB>line`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, BufRead, Write};

use serde::Deserialize;

use crate::config::ConfigStore;
use crate::host::{BufferProperty, Host, InboundMessageEvent, ReturnCode};
use crate::notifier::{Notifier, PRINT_HOOK};
use crate::player::PlayerInvoker;
use crate::tags::has_tag;

pub const ERROR_PREFIX: &str = "=!=\t";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    Buffer {
        handle: String,
        name: String,
        #[serde(default)]
        nick: String,
    },
    Print {
        buffer: String,
        #[serde(default)]
        date: String,
        #[serde(default)]
        tags: String,
        #[serde(default = "displayed_default")]
        displayed: String,
        #[serde(default)]
        highlight: String,
        #[serde(default)]
        prefix: String,
        #[serde(default)]
        message: String,
    },
    Command {
        buffer: String,
        #[serde(default)]
        args: String,
    },
}

fn displayed_default() -> String {
    "1".to_string()
}

#[derive(Debug, Clone, Default)]
struct BufferInfo {
    name: String,
    nick: String,
}

pub struct StdioHost<W: Write> {
    out: RefCell<W>,
    buffers: HashMap<String, BufferInfo>,
}

impl<W: Write> StdioHost<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
            buffers: HashMap::new(),
        }
    }

    pub fn set_buffer(&mut self, handle: &str, name: &str, nick: &str) {
        self.buffers.insert(
            handle.to_string(),
            BufferInfo {
                name: name.to_string(),
                nick: nick.to_string(),
            },
        );
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write> Host for StdioHost<W> {
    fn print(&self, line: &str) {
        let time = chrono::Local::now().format("%H:%M:%S");
        let mut out = self.out.borrow_mut();
        if let Err(err) = writeln!(out, "{time}\t{line}").and_then(|_| out.flush()) {
            tracing::warn!(%err, "failed to write output");
        }
    }

    fn error_prefix(&self) -> &str {
        ERROR_PREFIX
    }

    fn buffer_string(&self, buffer: &str, property: BufferProperty) -> String {
        let Some(info) = self.buffers.get(buffer) else {
            return String::new();
        };
        match property {
            BufferProperty::Name => info.name.clone(),
            BufferProperty::LocalNick => info.nick.clone(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub events: usize,
    pub malformed: usize,
    pub filtered: usize,
    pub command_errors: usize,
}

/// Feed every line of `input` to the plugin until EOF.
pub fn run<C, P, R, W>(
    notifier: &mut Notifier<C, P>,
    input: R,
    out: W,
) -> io::Result<(RunStats, W)>
where
    C: ConfigStore,
    P: PlayerInvoker,
    R: BufRead,
    W: Write,
{
    let mut host = StdioHost::new(out);
    let mut stats = RunStats::default();
    notifier.init(&host);

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event = match serde_json::from_str::<HostEvent>(&line) {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(%err, "skipping malformed event");
                stats.malformed += 1;
                continue;
            }
        };
        stats.events += 1;

        match event {
            HostEvent::Buffer { handle, name, nick } => {
                tracing::debug!(%handle, %name, "buffer registered");
                host.set_buffer(&handle, &name, &nick);
            }
            HostEvent::Print {
                buffer,
                date,
                tags,
                displayed,
                highlight,
                prefix,
                message,
            } => {
                if !PRINT_HOOK.tags.is_empty() && !has_tag(&tags, PRINT_HOOK.tags) {
                    stats.filtered += 1;
                    continue;
                }
                if let Some(when) = date
                    .parse::<i64>()
                    .ok()
                    .and_then(|secs| chrono::DateTime::<chrono::Utc>::from_timestamp(secs, 0))
                {
                    tracing::trace!(%buffer, %when, "line printed");
                }
                let event = InboundMessageEvent {
                    buffer,
                    date,
                    tags,
                    displayed: displayed != "0",
                    highlight: highlight == "1",
                    prefix,
                    message,
                };
                notifier.on_message(&host, &event);
            }
            HostEvent::Command { buffer, args } => {
                if notifier.on_command(&host, &buffer, &args) == ReturnCode::Error {
                    stats.command_errors += 1;
                }
            }
        }
    }

    notifier.shutdown();
    Ok((stats, host.into_inner()))
}
