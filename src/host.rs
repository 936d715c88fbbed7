//! The boundary between the plugin and the chat client hosting it.

/// Result of a hook callback, as the host expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnCode {
    Ok,
    Error,
}

/// Data the host needs to register the plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: &'static str,
    pub author: &'static str,
    pub version: &'static str,
    pub license: &'static str,
    pub description: &'static str,
    pub shutdown_fn: &'static str,
    pub charset: &'static str,
}

/// Help and completion data for the plugin command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub args: &'static str,
    pub args_description: &'static str,
    pub completion: &'static str,
}

/// Which printed lines the plugin wants to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintHook {
    pub buffer: &'static str,
    pub tags: &'static str,
    pub message: &'static str,
    pub strip_colors: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferProperty {
    Name,
    LocalNick,
}

impl BufferProperty {
    pub fn key(self) -> &'static str {
        match self {
            BufferProperty::Name => "name",
            BufferProperty::LocalNick => "localvar_nick",
        }
    }
}

/// A line printed by the host, as delivered to the print hook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundMessageEvent {
    /// Opaque buffer handle; resolved through [`Host::buffer_string`].
    pub buffer: String,
    /// Seconds since the epoch, as the host sends it.
    pub date: String,
    /// Comma separated tags.
    pub tags: String,
    pub displayed: bool,
    pub highlight: bool,
    pub prefix: String,
    pub message: String,
}

/// Services the host offers to the plugin.
pub trait Host {
    /// Print a line in the core buffer.
    fn print(&self, line: &str);

    /// Marker prepended to error lines.
    fn error_prefix(&self) -> &str;

    fn print_error(&self, line: &str) {
        self.print(&format!("{}{}", self.error_prefix(), line));
    }

    /// String property of a buffer; empty when unknown.
    fn buffer_string(&self, buffer: &str, property: BufferProperty) -> String;
}
