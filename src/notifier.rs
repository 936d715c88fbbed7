//! Decides when to play the notification sound and handles `/psound`.

use std::fmt;

use crate::command::{self, Command};
use crate::config::{self, ConfigError, ConfigStore, PlaybackConfig};
use crate::host::{
    BufferProperty, CommandSpec, Host, InboundMessageEvent, PrintHook, Registration, ReturnCode,
};
use crate::mute::{format_muted, MuteRegistry};
use crate::player::{self, PlaybackError, PlayerInvoker};
use crate::tags;

pub const REGISTRATION: Registration = Registration {
    name: "psound",
    author: "psound developers",
    version: env!("CARGO_PKG_VERSION"),
    license: "BSD-3-Clause",
    description: "Play a soundfile for incoming messages",
    shutdown_fn: "",
    charset: "",
};

pub const COMMAND: CommandSpec = CommandSpec {
    name: "psound",
    description: "Play a soundfile for incoming messages",
    args: "test\n                        on|off [buffer]\n                        list",
    args_description: "Options:\n\
player        software used to play a sound.\n\
sound_file    path to the sound file to play.\n\
\n\
Commands:\n\
test          Try to play `sound_file` with `player`\n\
on  [buffer]  Enable sound notification for `buffer`.\n\
off [buffer]  Disable sound notification for `buffer`.\n\
list          Print the list of muted buffers.\n\
\n\
By default, sound notifications is enabled for all channel buffers.\n\
When you need to provide a buffer name, it is better to use the completion \
(Tab key) to cycle through valid values.\n\
If you do not provide a buffer name, the command is applied on the current buffer.",
    completion: "test || on %(buffers_names) || off %(buffers_names) || list",
};

/// Incoming and outgoing channel messages.
pub const PRINT_HOOK: PrintHook = PrintHook {
    buffer: "",
    tags: "irc_privmsg",
    message: "",
    strip_colors: true,
};

/// Why a sound was not played.
#[derive(Debug)]
pub enum NotifyError {
    Config(ConfigError),
    Playback(PlaybackError),
}

impl NotifyError {
    pub fn user_lines(&self) -> Vec<String> {
        match self {
            NotifyError::Config(err) => vec![err.to_string()],
            NotifyError::Playback(err) => err.user_lines(),
        }
    }
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyError::Config(err) => write!(f, "{err}"),
            NotifyError::Playback(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for NotifyError {}

impl From<ConfigError> for NotifyError {
    fn from(err: ConfigError) -> Self {
        NotifyError::Config(err)
    }
}

impl From<PlaybackError> for NotifyError {
    fn from(err: PlaybackError) -> Self {
        NotifyError::Playback(err)
    }
}

pub struct Notifier<C, P> {
    muted: MuteRegistry,
    config: C,
    player: P,
}

impl<C: ConfigStore, P: PlayerInvoker> Notifier<C, P> {
    pub fn new(config: C, player: P) -> Self {
        Self {
            muted: MuteRegistry::new(),
            config,
            player,
        }
    }

    /// Fill in option defaults. Failures are reported but do not stop the
    /// plugin from loading.
    pub fn init(&mut self, host: &dyn Host) -> ReturnCode {
        if let Err(err) = config::apply_defaults(&mut self.config) {
            print_error(host, &err.to_string());
        }
        tracing::info!(
            plugin = REGISTRATION.name,
            version = REGISTRATION.version,
            "plugin initialized"
        );
        ReturnCode::Ok
    }

    /// Play the configured sound, blocking until the player exits.
    ///
    /// The options are read again on every call.
    pub fn play_sound(&self) -> Result<(), NotifyError> {
        let playback = PlaybackConfig::load(&self.config)?;
        player::check_sound_file(&playback)?;
        self.player.play(&playback.player, &playback.sound_file)?;
        Ok(())
    }

    /// Play the sound and print whatever went wrong.
    pub fn notify(&self, host: &dyn Host) -> Result<(), NotifyError> {
        let result = self.play_sound();
        if let Err(err) = &result {
            tracing::debug!(%err, "sound not played");
            for line in err.user_lines() {
                print_error(host, &line);
            }
        }
        result
    }

    /// Print hook callback. Always reports success to the host.
    pub fn on_message(&self, host: &dyn Host, event: &InboundMessageEvent) -> ReturnCode {
        if !event.displayed {
            return ReturnCode::Ok;
        }

        let own_nick = host.buffer_string(&event.buffer, BufferProperty::LocalNick);
        if tags::sender_nick(&event.tags) == Some(own_nick.as_str()) {
            return ReturnCode::Ok;
        }

        let buffer_name = host.buffer_string(&event.buffer, BufferProperty::Name);
        if self.muted.is_muted(&buffer_name) {
            tracing::trace!(buffer = %buffer_name, "buffer muted");
            return ReturnCode::Ok;
        }

        let _ = self.notify(host);
        ReturnCode::Ok
    }

    /// `/psound` callback; `buffer` is the buffer the command was typed in.
    pub fn on_command(&mut self, host: &dyn Host, buffer: &str, args: &str) -> ReturnCode {
        let command = match command::parse(args) {
            Ok(Some(command)) => command,
            Ok(None) => return ReturnCode::Ok,
            Err(err) => {
                print_error(host, &err.to_string());
                return ReturnCode::Error;
            }
        };

        match command {
            Command::Test => {
                let _ = self.notify(host);
            }
            Command::On(target) => {
                let target = target.unwrap_or_else(|| current_buffer(host, buffer));
                if self.muted.unmute(&target) {
                    tracing::info!(buffer = %target, "buffer unmuted");
                }
            }
            Command::Off(target) => {
                let target = target.unwrap_or_else(|| current_buffer(host, buffer));
                if self.muted.mute(&target) {
                    tracing::info!(buffer = %target, "buffer muted");
                }
            }
            Command::List => host.print(&format_muted(&self.muted.list_muted())),
        }
        ReturnCode::Ok
    }

    /// Mute state is dropped with the plugin.
    pub fn shutdown(&mut self) -> ReturnCode {
        tracing::info!(discarded = self.muted.len(), "plugin shutting down");
        self.muted = MuteRegistry::new();
        ReturnCode::Ok
    }

    pub fn muted(&self) -> &MuteRegistry {
        &self.muted
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn player(&self) -> &P {
        &self.player
    }
}

fn current_buffer(host: &dyn Host, buffer: &str) -> String {
    host.buffer_string(buffer, BufferProperty::Name)
}

fn print_error(host: &dyn Host, msg: &str) {
    host.print_error(&format!("{}: {msg}", REGISTRATION.name));
}
