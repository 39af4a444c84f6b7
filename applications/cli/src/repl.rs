//! Line commands
//!
//! Lines starting with `/` are commands; anything else is chat. Item
//! numbers are 1-based as printed.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Talk to the assistant
    Chat(String),
    /// Generate from the conversation so far
    Create,
    Search(String),
    /// Play search result n
    Play(usize),
    /// Queue search result n, or show the queue
    Queue(Option<usize>),
    Dequeue(usize),
    ClearQueue,
    Next,
    Previous,
    TogglePause,
    /// Seek to a percentage of the track
    Seek(f64),
    Retry,
    Now,
    Playlists,
    /// Make saved playlist n active
    Open(usize),
    /// Play song n of the active playlist
    Song(usize),
    /// Append search result n to the active playlist
    Add(usize),
    /// Delete saved playlist n
    Delete(usize),
    /// Write the active playlist as CSV
    Export(Option<String>),
    /// Import a CSV file as a new playlist
    Import(String),
    Share,
    Summary,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Unknown command: /{0} (try /help)")]
    Unknown(String),

    #[error("/{command} needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("Not a valid number: {0}")]
    InvalidNumber(String),
}

pub const HELP: &str = "\
Chat with the assistant by typing a message. Commands:
  /create             make a playlist from the conversation so far
  /search <query>     search for songs
  /play <n>           play search result n
  /queue [n]          queue search result n, or show the queue
  /dequeue <n>        remove queue entry n
  /clear              empty the queue
  /next, /prev        move through the active playlist
  /pause              toggle play/pause
  /seek <percent>     jump to a position (0-100)
  /retry              retry a failed load
  /now                show what is playing
  /playlists          list saved playlists
  /open <n>           make saved playlist n active
  /song <n>           play song n of the active playlist
  /add <n>            add search result n to the active playlist
  /delete <n>         delete saved playlist n
  /export [file]      save the active playlist as CSV
  /import <file>      load a CSV file as a new playlist
  /share              print the active playlist as shareable text
  /summary            ask the assistant to review the active playlist
  /quit               exit";

/// Parse one input line; blank lines give `None`
pub fn parse(line: &str) -> Option<Result<Command, CommandError>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Some(Ok(Command::Chat(line.to_string())));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    let arg = (!arg.is_empty()).then_some(arg);

    Some(match name.to_lowercase().as_str() {
        "create" => Ok(Command::Create),
        "search" | "s" => required(arg, "search", "a query").map(|q| Command::Search(q.to_string())),
        "play" | "p" => index(arg, "play").map(Command::Play),
        "queue" | "q" => arg.map(parse_index).transpose().map(Command::Queue),
        "dequeue" => index(arg, "dequeue").map(Command::Dequeue),
        "clear" => Ok(Command::ClearQueue),
        "next" | "n" => Ok(Command::Next),
        "prev" | "previous" => Ok(Command::Previous),
        "pause" | "resume" => Ok(Command::TogglePause),
        "seek" => required(arg, "seek", "a percentage")
            .and_then(parse_percent)
            .map(Command::Seek),
        "retry" => Ok(Command::Retry),
        "now" => Ok(Command::Now),
        "playlists" | "list" => Ok(Command::Playlists),
        "open" => index(arg, "open").map(Command::Open),
        "song" => index(arg, "song").map(Command::Song),
        "add" => index(arg, "add").map(Command::Add),
        "delete" => index(arg, "delete").map(Command::Delete),
        "export" => Ok(Command::Export(arg.map(str::to_string))),
        "import" => required(arg, "import", "a file").map(|f| Command::Import(f.to_string())),
        "share" => Ok(Command::Share),
        "summary" => Ok(Command::Summary),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    })
}

fn required<'a>(
    arg: Option<&'a str>,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, CommandError> {
    arg.ok_or(CommandError::MissingArgument { command, argument })
}

fn index(arg: Option<&str>, command: &'static str) -> Result<usize, CommandError> {
    required(arg, command, "a number").and_then(parse_index)
}

/// 1-based item number to a 0-based index
fn parse_index(arg: &str) -> Result<usize, CommandError> {
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CommandError::InvalidNumber(arg.to_string())),
    }
}

/// Percentage to a ratio; the session clamps out-of-range values
fn parse_percent(arg: &str) -> Result<f64, CommandError> {
    arg.trim_end_matches('%')
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .map(|p| p / 100.0)
        .ok_or_else(|| CommandError::InvalidNumber(arg.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(line: &str) -> Command {
        parse(line).unwrap().unwrap()
    }

    #[test]
    fn plain_text_is_chat() {
        assert_eq!(
            ok("  something for a road trip "),
            Command::Chat("something for a road trip".into())
        );
    }

    #[test]
    fn blank_is_ignored() {
        assert!(parse("   ").is_none());
    }

    #[test]
    fn numbers_are_one_based() {
        assert_eq!(ok("/play 1"), Command::Play(0));
        assert_eq!(ok("/dequeue 3"), Command::Dequeue(2));
        assert_eq!(
            parse("/play 0").unwrap(),
            Err(CommandError::InvalidNumber("0".into()))
        );
    }

    #[test]
    fn queue_argument_is_optional() {
        assert_eq!(ok("/queue"), Command::Queue(None));
        assert_eq!(ok("/q 2"), Command::Queue(Some(1)));
    }

    #[test]
    fn search_keeps_whole_query() {
        assert_eq!(
            ok("/search  miles davis  so what"),
            Command::Search("miles davis  so what".into())
        );
        assert_eq!(
            parse("/search").unwrap(),
            Err(CommandError::MissingArgument {
                command: "search",
                argument: "a query"
            })
        );
    }

    #[test]
    fn seek_takes_percent() {
        assert_eq!(ok("/seek 50"), Command::Seek(0.5));
        assert_eq!(ok("/seek 25%"), Command::Seek(0.25));
        assert!(matches!(
            parse("/seek half").unwrap(),
            Err(CommandError::InvalidNumber(_))
        ));
    }

    #[test]
    fn export_file_optional() {
        assert_eq!(ok("/export"), Command::Export(None));
        assert_eq!(ok("/export mix.csv"), Command::Export(Some("mix.csv".into())));
    }

    #[test]
    fn commands_are_case_insensitive() {
        assert_eq!(ok("/NEXT"), Command::Next);
    }

    #[test]
    fn unknown_command() {
        assert_eq!(
            parse("/dance").unwrap(),
            Err(CommandError::Unknown("dance".into()))
        );
    }
}
