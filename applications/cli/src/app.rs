//! Command handling
//!
//! Ties the chat session, the playlist library and the player together.
//! Output goes to stdout; logs go to stderr.

use std::path::Path;

use tunesmith_assistant::{ChatSession, ChatTurn};
use tunesmith_core::{export, Playlist, SearchHit, Song};
use tunesmith_playback::{format_time, PlaybackEvent, PlaybackState, Player};
use tunesmith_storage::PlaylistLibrary;

use crate::repl::{Command, HELP};

pub struct App {
    player: Player,
    chat: ChatSession,
    library: PlaylistLibrary,
    hits: Vec<SearchHit>,
}

impl App {
    pub fn new(player: Player, chat: ChatSession, library: PlaylistLibrary) -> Self {
        Self {
            player,
            chat,
            library,
            hits: Vec::new(),
        }
    }

    /// Reopen the playlist that was active last session
    pub async fn restore(&self) {
        if let Some(playlist) = self.library.active() {
            println!("Active playlist: {} ({} songs)", playlist.name, playlist.len());
            self.player.open_playlist(playlist).await;
        }
        if !self.library.is_persistent() {
            println!("Note: {}", tunesmith_core::ErrorKind::StorageUnavailable.user_message());
        }
    }

    /// Run one command; `false` means quit
    pub async fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Chat(message) => {
                if let Some(turn) = self.chat.send(&message).await {
                    self.show_turn(turn).await;
                }
            }
            Command::Create => match self.chat.create_from_conversation().await {
                Some(turn) => self.show_turn(turn).await,
                None => println!("Tell me what you're in the mood for first."),
            },
            Command::Search(query) => self.search(&query).await,
            Command::Play(n) => {
                if let Some(hit) = self.hit(n) {
                    self.player.play_hit(&hit).await;
                }
            }
            Command::Queue(Some(n)) => {
                if let Some(hit) = self.hit(n) {
                    println!("Queued: {}", hit.title);
                    self.player.enqueue(tunesmith_core::Track::from_hit(&hit)).await;
                }
            }
            Command::Queue(None) => self.show_queue().await,
            Command::Dequeue(n) => match self.player.dequeue(n).await {
                Some(entry) => println!("Removed: {}", entry.name),
                None => println!("No queue entry {}", n + 1),
            },
            Command::ClearQueue => {
                self.player.clear_queue().await;
                println!("Queue cleared");
            }
            Command::Next => self.player.next().await,
            Command::Previous => self.player.previous().await,
            Command::TogglePause => self.player.toggle_play_pause().await,
            Command::Seek(ratio) => {
                if let Err(e) = self.player.seek(ratio).await {
                    println!("Cannot seek: {}", e);
                }
            }
            Command::Retry => self.player.retry().await,
            Command::Now => self.show_now().await,
            Command::Playlists => self.show_playlists(),
            Command::Open(n) => self.open(n).await,
            Command::Song(n) => {
                if let Err(e) = self.player.play_from_playlist(n).await {
                    println!("Cannot play song {}: {}", n + 1, e);
                }
            }
            Command::Add(n) => self.add_hit(n).await,
            Command::Delete(n) => self.delete(n).await,
            Command::Export(file) => self.export(file.as_deref()).await,
            Command::Import(file) => self.import(&file).await,
            Command::Share => match self.library.active() {
                Some(playlist) => println!("{}", export::share_text(playlist)),
                None => println!("No active playlist"),
            },
            Command::Summary => match self.library.active() {
                Some(playlist) => println!("{}", self.chat.summarize(playlist).await),
                None => println!("No active playlist"),
            },
            Command::Help => println!("{}", HELP),
            Command::Quit => return false,
        }
        true
    }

    // ===== Chat =====

    async fn show_turn(&mut self, turn: ChatTurn) {
        println!("{}", turn.text());
        if let ChatTurn::PlaylistCreated {
            playlist, failure, ..
        } = turn
        {
            if let Some(kind) = failure {
                println!("({})", kind.user_message());
            }
            self.save_and_open(playlist).await;
        }
    }

    async fn save_and_open(&mut self, playlist: Playlist) {
        let id = self.library.add(playlist).await;
        match self.library.set_active(&id).await {
            Ok(playlist) => {
                self.player.open_playlist(playlist).await;
                println!("Saved as playlist 1. Use /song <n> to start listening.");
            }
            Err(e) => tracing::error!(error = %e, "Saved playlist vanished"),
        }
    }

    // ===== Search =====

    async fn search(&mut self, query: &str) {
        match self.player.search(query).await {
            Ok(hits) if hits.is_empty() => println!("No results for \"{}\"", query),
            Ok(hits) => {
                for (i, hit) in hits.iter().enumerate() {
                    println!("{:>2}. {}", i + 1, hit.title);
                }
                self.hits = hits;
            }
            Err(e) => {
                tracing::error!(error = %e, query, "Search failed");
                println!("Search failed: {}", e);
            }
        }
    }

    fn hit(&self, index: usize) -> Option<SearchHit> {
        let hit = self.hits.get(index).cloned();
        if hit.is_none() {
            println!("No search result {} (run /search first)", index + 1);
        }
        hit
    }

    async fn add_hit(&mut self, index: usize) {
        let Some(hit) = self.hit(index) else {
            return;
        };
        let Some(id) = self.library.active().map(|p| p.id.clone()) else {
            println!("No active playlist");
            return;
        };
        let song = song_from_title(&hit.title);
        match self.library.append_song(&id, song).await {
            Ok(()) => {
                if let Some(playlist) = self.library.active() {
                    println!("Added to {}", playlist.name);
                }
                self.player
                    .append_to_playlist(tunesmith_core::Track::from_hit(&hit))
                    .await;
            }
            Err(e) => println!("Cannot add: {}", e),
        }
    }

    // ===== Library =====

    fn show_playlists(&self) {
        if self.library.is_empty() {
            println!("No saved playlists yet");
            return;
        }
        let active = self.library.active().map(|p| p.id.clone());
        for (i, playlist) in self.library.playlists().iter().enumerate() {
            let marker = if Some(&playlist.id) == active.as_ref() {
                "*"
            } else {
                " "
            };
            println!(
                "{}{:>2}. {} ({} songs, {})",
                marker,
                i + 1,
                playlist.name,
                playlist.len(),
                playlist.created_date
            );
        }
    }

    async fn open(&mut self, index: usize) {
        let Some(id) = self.library.at(index).map(|p| p.id.clone()) else {
            println!("No playlist {}", index + 1);
            return;
        };
        match self.library.set_active(&id).await {
            Ok(playlist) => {
                for (i, song) in playlist.songs.iter().enumerate() {
                    println!("{:>2}. {}", i + 1, song.display_name());
                }
                self.player.open_playlist(playlist).await;
            }
            Err(e) => println!("Cannot open: {}", e),
        }
    }

    async fn delete(&mut self, index: usize) {
        let Some(id) = self.library.at(index).map(|p| p.id.clone()) else {
            println!("No playlist {}", index + 1);
            return;
        };
        match self.library.delete(&id).await {
            Ok(playlist) => println!("Deleted {}", playlist.name),
            Err(e) => println!("Cannot delete: {}", e),
        }
    }

    async fn export(&self, file: Option<&str>) {
        let Some(playlist) = self.library.active() else {
            println!("No active playlist");
            return;
        };
        let file = file.map_or_else(|| export::export_file_name(playlist), str::to_string);
        match tokio::fs::write(&file, export::to_csv(playlist)).await {
            Ok(()) => println!("Exported {} to {}", playlist.name, file),
            Err(e) => println!("Cannot write {}: {}", file, e),
        }
    }

    async fn import(&mut self, file: &str) {
        let text = match tokio::fs::read_to_string(file).await {
            Ok(text) => text,
            Err(e) => {
                println!("Cannot read {}: {}", file, e);
                return;
            }
        };
        let name = Path::new(file)
            .file_stem()
            .map(|s| s.to_string_lossy().replace('-', " "))
            .unwrap_or_default();
        match self.library.import_csv(&name, &text).await {
            Ok(_) => println!("Imported {} as playlist 1", file),
            Err(e) => println!("Cannot import {}: {}", file, e),
        }
    }

    // ===== Playback =====

    async fn show_queue(&self) {
        let queue = self.player.queue().await;
        if queue.is_empty() {
            println!("Queue is empty");
        }
        for (i, entry) in queue.iter().enumerate() {
            println!("{:>2}. {}", i + 1, entry.name);
        }
    }

    async fn show_now(&self) {
        let snapshot = self.player.snapshot().await;
        let Some(track) = &snapshot.current_track else {
            println!("Nothing playing");
            return;
        };
        println!(
            "{} [{:?}] {} / {}",
            track.name,
            snapshot.state,
            format_time(snapshot.position_seconds),
            format_time(snapshot.duration_seconds)
        );
        if snapshot.cursor_index >= 0 {
            println!("Playlist position {}", snapshot.cursor_index + 1);
        }
        if snapshot.queue_len > 0 {
            println!("{} queued", snapshot.queue_len);
        }
        if let Some(kind) = snapshot.last_error {
            println!("Last error: {}", kind.user_message());
        }
    }
}

/// Song for a search result title
///
/// Video titles are usually `Artist - Title`.
pub fn song_from_title(title: &str) -> Song {
    match title.split_once(" - ") {
        Some((artist, song)) if !artist.trim().is_empty() && !song.trim().is_empty() => {
            Song::new(song.trim(), artist.trim())
        }
        _ => Song::new(title.trim(), "Unknown artist"),
    }
}

/// One-line description of a playback event, if worth printing
pub fn describe(event: &PlaybackEvent) -> Option<String> {
    match event {
        PlaybackEvent::TrackChanged { name, .. } => Some(format!("Now playing: {}", name)),
        PlaybackEvent::StateChanged {
            state: PlaybackState::Loading,
        } => Some("Loading...".to_string()),
        PlaybackEvent::StateChanged {
            state: PlaybackState::Paused,
        } => Some("Paused".to_string()),
        PlaybackEvent::PreviewChanged { embed_url } => Some(format!("Preview: {}", embed_url)),
        PlaybackEvent::Error { kind, message } => {
            Some(format!("{} ({})", kind.user_message(), message))
        }
        _ => None,
    }
}
