use std::io::{self, Write};

use crate::board::default_threads;
use crate::engine::{TimeConfig, DEFAULT_HASH_MB, DEFAULT_MOVE_OVERHEAD_MS};

const MAX_HASH_MB: usize = 65_536;
const MAX_THREADS: usize = 256;
const MAX_MOVE_OVERHEAD_MS: u64 = 5_000;

/// Side effects of a `setoption` the session has to carry out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciOptionAction {
    ReinitHash(usize),
    SetThreads(usize),
    LoadBook(String),
    UnloadBook,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UciOptions {
    pub hash_mb: usize,
    pub threads: usize,
    pub move_overhead_ms: u64,
    pub book_file: String,
    pub own_book: bool,
}

impl Default for UciOptions {
    fn default() -> Self {
        UciOptions {
            hash_mb: DEFAULT_HASH_MB,
            threads: default_threads(),
            move_overhead_ms: DEFAULT_MOVE_OVERHEAD_MS,
            book_file: String::new(),
            own_book: false,
        }
    }
}

impl UciOptions {
    #[must_use]
    pub fn time_config(&self) -> TimeConfig {
        TimeConfig {
            move_overhead_ms: self.move_overhead_ms,
        }
    }

    /// Write the `uci` handshake: identification, options, `uciok`.
    pub fn print<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "id name bitchess {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(out, "id author bitchess developers")?;
        writeln!(
            out,
            "option name Hash type spin default {DEFAULT_HASH_MB} min 1 max {MAX_HASH_MB}"
        )?;
        writeln!(
            out,
            "option name Threads type spin default {} min 1 max {MAX_THREADS}",
            default_threads()
        )?;
        writeln!(
            out,
            "option name Move Overhead type spin default {DEFAULT_MOVE_OVERHEAD_MS} min 0 max {MAX_MOVE_OVERHEAD_MS}"
        )?;
        writeln!(out, "option name BookFile type string default <empty>")?;
        writeln!(out, "option name OwnBook type check default false")?;
        writeln!(out, "uciok")
    }

    pub fn apply_setoption(&mut self, name: &str, value: Option<&str>) -> Option<UciOptionAction> {
        let normalized = name.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "hash" => {
                let mb = value
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(DEFAULT_HASH_MB)
                    .clamp(1, MAX_HASH_MB);
                if mb != self.hash_mb {
                    self.hash_mb = mb;
                    return Some(UciOptionAction::ReinitHash(mb));
                }
            }
            "threads" => {
                if let Some(v) = value.and_then(|v| v.parse::<usize>().ok()) {
                    self.threads = v.clamp(1, MAX_THREADS);
                    return Some(UciOptionAction::SetThreads(self.threads));
                }
            }
            "move overhead" => {
                if let Some(v) = value.and_then(|v| v.parse::<u64>().ok()) {
                    self.move_overhead_ms = v.min(MAX_MOVE_OVERHEAD_MS);
                }
            }
            "bookfile" => {
                let path = value.map(str::trim).unwrap_or_default();
                if path.is_empty() || path == "<empty>" {
                    self.book_file.clear();
                    return Some(UciOptionAction::UnloadBook);
                }
                self.book_file = path.to_string();
                return Some(UciOptionAction::LoadBook(self.book_file.clone()));
            }
            "ownbook" => {
                if let Some(v) = value {
                    self.own_book = matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1");
                }
            }
            _ => log::warn!("unknown option '{name}'"),
        }
        None
    }
}

#[must_use]
pub fn parse_setoption(parts: &[&str]) -> Option<(String, Option<String>)> {
    if parts.first() != Some(&"setoption") {
        return None;
    }

    let mut name_parts: Vec<&str> = Vec::new();
    let mut value_parts: Vec<&str> = Vec::new();
    let mut mode = "";

    for part in parts.iter().skip(1) {
        match *part {
            "name" if mode != "value" => mode = "name",
            "value" if mode == "name" => mode = "value",
            _ => match mode {
                "name" => name_parts.push(part),
                "value" => value_parts.push(part),
                _ => {}
            },
        }
    }

    if name_parts.is_empty() {
        return None;
    }

    let name = name_parts.join(" ");
    let value = if value_parts.is_empty() {
        None
    } else {
        Some(value_parts.join(" "))
    };

    Some((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multi_word_names() {
        let parts = ["setoption", "name", "Move", "Overhead", "value", "250"];
        assert_eq!(
            parse_setoption(&parts),
            Some(("Move Overhead".to_string(), Some("250".to_string())))
        );
        assert_eq!(
            parse_setoption(&["setoption", "name", "OwnBook"]),
            Some(("OwnBook".to_string(), None))
        );
        assert_eq!(parse_setoption(&["setoption", "value", "3"]), None);
        assert_eq!(parse_setoption(&["go"]), None);
    }

    #[test]
    fn values_may_contain_keywords() {
        let parts = ["setoption", "name", "BookFile", "value", "my", "name", "value", "book"];
        let (name, value) = parse_setoption(&parts).unwrap();
        assert_eq!(name, "BookFile");
        assert_eq!(value.as_deref(), Some("my name value book"));
    }

    #[test]
    fn applies_known_options() {
        let mut opts = UciOptions::default();
        assert_eq!(
            opts.apply_setoption("Hash", Some("16")),
            Some(UciOptionAction::ReinitHash(16))
        );
        assert_eq!(opts.apply_setoption("hash", Some("16")), None);
        assert_eq!(
            opts.apply_setoption("Threads", Some("0")),
            Some(UciOptionAction::SetThreads(1))
        );
        assert_eq!(opts.apply_setoption("Move Overhead", Some("30")), None);
        assert_eq!(opts.time_config().move_overhead_ms, 30);
        opts.apply_setoption("OwnBook", Some("true"));
        assert!(opts.own_book);
    }

    #[test]
    fn book_file_actions() {
        let mut opts = UciOptions::default();
        assert_eq!(
            opts.apply_setoption("BookFile", Some("book.json")),
            Some(UciOptionAction::LoadBook("book.json".to_string()))
        );
        assert_eq!(opts.book_file, "book.json");
        assert_eq!(
            opts.apply_setoption("BookFile", Some("<empty>")),
            Some(UciOptionAction::UnloadBook)
        );
        assert!(opts.book_file.is_empty());
    }

    #[test]
    fn handshake_lists_options() {
        let mut out = Vec::new();
        UciOptions::default().print(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("id name bitchess"));
        for name in ["Hash", "Threads", "Move Overhead", "BookFile", "OwnBook"] {
            assert!(text.contains(&format!("option name {name} type")));
        }
        assert!(text.ends_with("uciok\n"));
    }
}
