//! Playlist export and sharing formats
//!
//! - CSV: header `Song Title,Artist`, one fully quoted row per song
//! - Share text: `Check out this playlist: <name>`, a blank line, then
//!   `<n>. "<title>" by <artist>` per song

use crate::error::{CoreError, Result};
use crate::types::{Playlist, Song};

/// Header row of exported CSV files
pub const CSV_HEADER: &str = "Song Title,Artist";

/// Render a playlist as CSV
pub fn to_csv(playlist: &Playlist) -> String {
    let mut out = String::from(CSV_HEADER);
    for song in &playlist.songs {
        out.push('\n');
        out.push_str(&quote(&song.title));
        out.push(',');
        out.push_str(&quote(&song.artist));
    }
    out
}

/// File name for an exported playlist: whitespace runs become `-`
pub fn export_file_name(playlist: &Playlist) -> String {
    let stem = playlist.name.split_whitespace().collect::<Vec<_>>().join("-");
    format!("{}.csv", stem)
}

/// Parse CSV produced by [`to_csv`] (or any two-column CSV with the same header)
pub fn parse_csv(input: &str) -> Result<Vec<Song>> {
    let mut rows = split_records(input)?.into_iter();

    match rows.next() {
        Some((_, header)) if header.len() == 2 && header[0] == "Song Title" => {}
        Some((line, _)) => {
            return Err(CoreError::MalformedCsv {
                line,
                reason: format!("expected header `{}`", CSV_HEADER),
            })
        }
        None => return Ok(Vec::new()),
    }

    rows.map(|(line, mut fields)| {
        if fields.len() != 2 {
            return Err(CoreError::MalformedCsv {
                line,
                reason: format!("expected 2 fields, found {}", fields.len()),
            });
        }
        let artist = fields.pop().unwrap_or_default();
        let title = fields.pop().unwrap_or_default();
        Ok(Song { title, artist })
    })
    .collect()
}

/// Numbered song list: `1. "Title" by Artist` per line
pub fn song_list(songs: &[Song]) -> String {
    songs
        .iter()
        .enumerate()
        .map(|(index, song)| format!("{}. \"{}\" by {}", index + 1, song.title, song.artist))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Plain-text rendering handed to a share target or the clipboard
pub fn share_text(playlist: &Playlist) -> String {
    format!(
        "Check out this playlist: {}\n\n{}",
        playlist.name,
        song_list(&playlist.songs)
    )
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Split CSV text into records of fields, tagged with their 1-based line
fn split_records(input: &str) -> Result<Vec<(usize, Vec<String>)>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            ('"', true) => in_quotes = false,
            ('"', false) if field.is_empty() => in_quotes = true,
            (',', false) => fields.push(std::mem::take(&mut field)),
            ('\r', false) if chars.peek() == Some(&'\n') => {}
            ('\n', false) => {
                fields.push(std::mem::take(&mut field));
                if !(fields.len() == 1 && fields[0].is_empty()) {
                    records.push((record_line, std::mem::take(&mut fields)));
                }
                fields.clear();
                line += 1;
                record_line = line;
            }
            ('\n', true) => {
                line += 1;
                field.push(c);
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(CoreError::MalformedCsv {
            line: record_line,
            reason: "unterminated quoted field".to_string(),
        });
    }

    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push((record_line, fields));
    }

    Ok(records)
}
