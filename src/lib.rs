//! Apple Music Discord Presence Daemon Library
//!
//! This library keeps a Discord rich-presence display synchronized with the
//! track currently playing in the Apple Music desktop player. Bare track
//! metadata from the player is enriched with artwork and store links fetched
//! from the iTunes Search API, with MusicBrainz / Cover Art Archive as a
//! fallback, and cached on disk between runs.
//!
//! # Modules
//!
//! - `config` - Configuration management and environment variables
//! - `discord` - Discord IPC transport (unix socket rich-presence client)
//! - `management` - Extras cache and the metadata resolution engine
//! - `player` - Apple Music observer (scripted OS automation queries)
//! - `presence` - Polling state machine and the supervisor loop
//! - `search` - iTunes / MusicBrainz / artwork-upload HTTP clients
//! - `types` - Data structures and type definitions
//! - `utils` - String normalization and other pure helpers

pub mod config;
pub mod discord;
pub mod management;
pub mod player;
pub mod presence;
pub mod search;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Uses a boxed dynamic error trait object with Send + Sync bounds so it can
/// travel across await points in async contexts.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Accepts the same arguments as `println!`.
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Accepts the same arguments as `println!`.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Reserved for unrecoverable startup conditions; the run loop never calls
/// this. Accepts the same arguments as `println!`.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues: failed searches, cache write errors,
/// transport reconnects. Accepts the same arguments as `println!`.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
