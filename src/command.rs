//! Parsing of `/psound` arguments.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Test,
    /// Enable notification; `None` means the buffer the command was typed in.
    On(Option<String>),
    Off(Option<String>),
    List,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Unknown(String),
    UnbalancedQuote,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(name) => write!(f, "Unknown command {name}"),
            CommandError::UnbalancedQuote => write!(f, "Unmatched quote in arguments"),
        }
    }
}

impl std::error::Error for CommandError {}

/// Parse the raw argument string. Empty input gives `Ok(None)`.
pub fn parse(args: &str) -> Result<Option<Command>, CommandError> {
    let words = split_words(args)?;
    let mut words = words.into_iter();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let command = match name.as_str() {
        "test" => Command::Test,
        "on" => Command::On(words.next()),
        "off" => Command::Off(words.next()),
        "list" => Command::List,
        _ => return Err(CommandError::Unknown(name)),
    };
    Ok(Some(command))
}

#[derive(Clone, Copy, PartialEq)]
enum Quote {
    None,
    Single,
    Double,
}

/// Split like a POSIX shell: blanks separate words, quotes group them and
/// backslash escapes the next character.
pub fn split_words(input: &str) -> Result<Vec<String>, CommandError> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut quote = Quote::None;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match quote {
            Quote::Single => {
                if c == '\'' {
                    quote = Quote::None;
                } else {
                    word.push(c);
                }
            }
            Quote::Double => match c {
                '"' => quote = Quote::None,
                '\\' => {
                    let next = chars.next().ok_or(CommandError::UnbalancedQuote)?;
                    if !matches!(next, '"' | '\\' | '$' | '`') {
                        word.push('\\');
                    }
                    word.push(next);
                }
                _ => word.push(c),
            },
            Quote::None => match c {
                c if c.is_whitespace() => {
                    if in_word {
                        words.push(std::mem::take(&mut word));
                        in_word = false;
                    }
                }
                '\'' => {
                    quote = Quote::Single;
                    in_word = true;
                }
                '"' => {
                    quote = Quote::Double;
                    in_word = true;
                }
                '\\' => {
                    // trailing backslash stands for itself
                    word.push(chars.next().unwrap_or('\\'));
                    in_word = true;
                }
                _ => {
                    word.push(c);
                    in_word = true;
                }
            },
        }
    }

    if quote != Quote::None {
        return Err(CommandError::UnbalancedQuote);
    }
    if in_word {
        words.push(word);
    }
    Ok(words)
}
