//! Play a sound file for incoming chat messages, with per-buffer muting.

pub mod command;
pub mod config;
pub mod host;
pub mod mute;
pub mod notifier;
pub mod player;
pub mod stdio;
pub mod tags;

#[cfg(test)]
mod testing;

pub use config::{ConfigStore, MemoryStore, PlaybackConfig, TomlStore};
pub use host::{Host, InboundMessageEvent, ReturnCode};
pub use mute::MuteRegistry;
pub use notifier::{Notifier, NotifyError};
pub use player::{CommandPlayer, PlayerInvoker};
