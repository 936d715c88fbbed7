//! Parsing of the comma separated tag list attached to printed lines.
//!
//! A private message line carries tags such as
//! `irc_privmsg,notify_message,prefix_nick_white,nick_alice,log1`.

const NICK_PREFIX: &str = "nick_";

/// Sender nick of a line: the remainder of the first `nick_<name>` tag.
///
/// Tags are matched whole, so `prefix_nick_white` is not a nick tag. An empty
/// remainder (`nick_`) does not count as a match.
pub fn sender_nick(tags: &str) -> Option<&str> {
    tags.split(',')
        .filter_map(|tag| tag.strip_prefix(NICK_PREFIX))
        .find(|nick| !nick.is_empty())
}

/// Whether the tag list contains `tag` exactly.
pub fn has_tag(tags: &str, tag: &str) -> bool {
    tags.split(',').any(|t| t == tag)
}
