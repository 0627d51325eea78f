//! Go Text Protocol (GTP) front end.
//!
//! GTP is a text-based protocol for communicating with Go-playing programs.
//! This module exposes the rules engine through the board-management subset
//! of GTP version 2, so graphical interfaces and scripted drivers can place
//! stones, undo, and inspect the board. There is no `genmove`: the crate is
//! a rules kernel, not a move generator.
//!
//! ## Supported Commands
//!
//! - `name` - Return engine name
//! - `version` - Return engine version
//! - `protocol_version` - Return GTP protocol version (2)
//! - `list_commands` - List all supported commands
//! - `known_command <cmd>` - Check if a command is supported
//! - `quit` - Exit the loop
//! - `boardsize <size>` - Re-create the game at the given size (2-25)
//! - `clear_board` - Reset the board to empty
//! - `komi <value>` - Accepted for protocol compatibility; scoring is out
//!   of scope, so the value is discarded
//! - `play <color> <vertex>` - Play a move (or `pass`)
//! - `undo` - Take back the last move
//! - `showboard` - Print the current position and capture counts
//!
//! Vertex syntax: column letters skip `I`; row 1 is the bottom of the board.

use std::io::{self, BufRead, Write};

use crate::game::{Game, GameOptions};
use crate::position::{Color, Point};

/// The list of known GTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "known_command",
    "komi",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "undo",
    "version",
];

/// GTP engine state.
pub struct GtpEngine {
    /// The game being driven
    game: Game,
    /// Options the game was built with; `boardsize` and `clear_board`
    /// re-create the game from these
    options: GameOptions,
}

impl Default for GtpEngine {
    fn default() -> Self {
        Self::new(GameOptions::default())
    }
}

impl GtpEngine {
    /// Create a GTP engine driving a fresh game with the given options.
    pub fn new(options: GameOptions) -> Self {
        Self {
            game: Game::with_options(options),
            options,
        }
    }

    /// Run the GTP command loop, reading from stdin and writing to stdout.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        for line in stdin.lock().lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Parse optional command ID
            let (id, command_line) = Self::parse_id(line);

            // Parse command and arguments
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];

            // Execute command
            let (success, message) = self.execute(&command, args);

            // Format and send response
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(stdout, "\n{prefix}{id_str} {message}\n")?;
            stdout.flush()?;

            // Quit if requested
            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let mut chars = trimmed.char_indices();

        // Check if line starts with a digit
        if let Some((_, c)) = chars.next() {
            if c.is_ascii_digit() {
                // Find end of number
                let end = chars
                    .find(|(_, c)| !c.is_ascii_digit())
                    .map(|(i, _)| i)
                    .unwrap_or(trimmed.len());

                if let Ok(id) = trimmed[..end].parse::<u32>() {
                    return (Some(id), trimmed[end..].trim());
                }
            }
        }

        (None, trimmed)
    }

    /// Execute a GTP command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, "goban-engine".to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => {
                let commands = KNOWN_COMMANDS.join("\n");
                (true, commands)
            }

            "known_command" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                let known = KNOWN_COMMANDS.contains(&args[0].to_lowercase().as_str());
                (true, if known { "true" } else { "false" }.to_string())
            }

            "quit" => (true, String::new()),

            "boardsize" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                match args[0].parse::<usize>() {
                    Ok(size) if (2..=25).contains(&size) => {
                        self.options.size = size;
                        self.game = Game::with_options(self.options);
                        (true, String::new())
                    }
                    Ok(size) => (false, format!("unacceptable size: {size}")),
                    Err(_) => (false, "invalid size".to_string()),
                }
            }

            "clear_board" => {
                self.game = Game::with_options(self.options);
                (true, String::new())
            }

            "komi" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                match args[0].parse::<f32>() {
                    Ok(_) => (true, String::new()),
                    Err(_) => (false, "invalid komi".to_string()),
                }
            }

            "play" => {
                if args.len() < 2 {
                    return (false, "missing arguments".to_string());
                }

                let Some(color) = parse_color(args[0]) else {
                    return (false, "invalid color".to_string());
                };

                let vertex = args[1].to_lowercase();
                if vertex == "pass" {
                    self.game.pass(Some(color));
                    return (true, String::new());
                }

                let Some((x, y)) = parse_vertex(&vertex, self.game.size()) else {
                    return (false, "invalid vertex".to_string());
                };

                match self.game.play(x, y, Some(color)) {
                    Ok(_) => (true, String::new()),
                    Err(err) => (false, format!("illegal move: {err}")),
                }
            }

            "undo" => match self.game.pop_position() {
                Some(_) => (true, String::new()),
                None => (false, "cannot undo".to_string()),
            },

            "showboard" => {
                let board = format!(
                    "\n{}black captures: {}\nwhite captures: {}",
                    self.game.current_position(),
                    self.game.capture_count(Color::Black),
                    self.game.capture_count(Color::White),
                );
                (true, board)
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }
}

/// Parse a GTP color argument.
fn parse_color(s: &str) -> Option<Color> {
    match s.to_lowercase().as_str() {
        "b" | "black" => Some(Color::Black),
        "w" | "white" => Some(Color::White),
        _ => None,
    }
}

/// Parse a GTP vertex like `D4` into board coordinates.
///
/// Column letters skip `I` (Go convention to avoid confusion with `J`);
/// row 1 is the bottom of the board.
fn parse_vertex(s: &str, size: usize) -> Option<Point> {
    let bytes = s.as_bytes();
    if bytes.len() < 2 {
        return None;
    }

    let col_char = bytes[0].to_ascii_uppercase();
    if !col_char.is_ascii_uppercase() || col_char == b'I' {
        return None;
    }
    let mut x = (col_char - b'A') as usize;
    if col_char > b'I' {
        x -= 1;
    }

    let row: usize = s[1..].parse().ok()?;
    if row == 0 || row > size || x >= size {
        return None;
    }

    Some((x, size - row))
}

/// Convert board coordinates to a GTP vertex string.
#[allow(dead_code)]
fn format_vertex((x, y): Point, size: usize) -> String {
    let mut col = b'A' + x as u8;
    if col >= b'I' {
        col += 1;
    }
    format!("{}{}", col as char, size - y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine9() -> GtpEngine {
        GtpEngine::new(GameOptions {
            size: 9,
            ..GameOptions::default()
        })
    }

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = GtpEngine::parse_id("123 name");
        assert_eq!(id, Some(123));
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = GtpEngine::parse_id("name");
        assert_eq!(id, None);
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_parse_vertex() {
        assert_eq!(parse_vertex("a1", 9), Some((0, 8)));
        assert_eq!(parse_vertex("d4", 9), Some((3, 5)));
        assert_eq!(parse_vertex("j9", 9), Some((8, 0)));
        // I is skipped
        assert_eq!(parse_vertex("i5", 9), None);
        // off the board
        assert_eq!(parse_vertex("k5", 9), None);
        assert_eq!(parse_vertex("a10", 9), None);
        assert_eq!(parse_vertex("a0", 9), None);
    }

    #[test]
    fn test_vertex_roundtrip() {
        for &v in &["A1", "D4", "H5", "J9", "T19"] {
            let size = 19;
            let pt = parse_vertex(&v.to_lowercase(), size).unwrap();
            assert_eq!(format_vertex(pt, size), v);
        }
    }

    #[test]
    fn test_name_and_protocol() {
        let mut engine = engine9();
        let (success, response) = engine.execute("name", &[]);
        assert!(success);
        assert_eq!(response, "goban-engine");

        let (success, response) = engine.execute("protocol_version", &[]);
        assert!(success);
        assert_eq!(response, "2");
    }

    #[test]
    fn test_known_command() {
        let mut engine = engine9();

        let (success, response) = engine.execute("known_command", &["play"]);
        assert!(success);
        assert_eq!(response, "true");

        let (success, response) = engine.execute("known_command", &["genmove"]);
        assert!(success);
        assert_eq!(response, "false");
    }

    #[test]
    fn test_boardsize() {
        let mut engine = engine9();

        let (success, _) = engine.execute("boardsize", &["13"]);
        assert!(success);
        assert_eq!(engine.game.size(), 13);

        let (success, _) = engine.execute("boardsize", &["40"]);
        assert!(!success);
    }

    #[test]
    fn test_play_undo_clear() {
        let mut engine = engine9();

        let (success, _) = engine.execute("play", &["black", "e5"]);
        assert!(success);
        assert_eq!(engine.game.history_len(), 2);

        // e5 on 9x9 is (4, 4)
        assert_eq!(engine.game.stone(4, 4), Some(Some(Color::Black)));

        let (success, _) = engine.execute("undo", &[]);
        assert!(success);
        assert_eq!(engine.game.history_len(), 1);

        // nothing left to undo
        let (success, _) = engine.execute("undo", &[]);
        assert!(!success);

        engine.execute("play", &["b", "c3"]);
        let (success, _) = engine.execute("clear_board", &[]);
        assert!(success);
        assert_eq!(engine.game.history_len(), 1);
        assert_eq!(engine.game.stone(2, 6), Some(None));
    }

    #[test]
    fn test_play_rejects_occupied() {
        let mut engine = engine9();
        engine.execute("play", &["black", "e5"]);
        let (success, message) = engine.execute("play", &["white", "e5"]);
        assert!(!success);
        assert!(message.contains("illegal move"));
    }

    #[test]
    fn test_play_pass() {
        let mut engine = engine9();
        let (success, _) = engine.execute("play", &["black", "pass"]);
        assert!(success);
        assert_eq!(engine.game.history_len(), 2);
        assert_eq!(engine.game.current_position().turn(), Color::White);
    }

    #[test]
    fn test_unknown_command() {
        let mut engine = engine9();
        let (success, message) = engine.execute("genmove", &["black"]);
        assert!(!success);
        assert!(message.contains("unknown command"));
    }
}
