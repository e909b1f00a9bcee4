//! Parsing of UCI input lines.

use crate::board::Color;
use crate::engine::TimeControl;

/// Options of a `go` command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoOptions {
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
    pub movestogo: Option<u64>,
    pub movetime: Option<u64>,
    pub depth: Option<u32>,
    pub nodes: Option<u64>,
    pub infinite: bool,
}

impl GoOptions {
    /// Parse the tokens following `go`. Unknown tokens and malformed
    /// numbers are skipped.
    #[must_use]
    pub fn parse(args: &[&str]) -> Self {
        let mut opts = GoOptions::default();
        let mut i = 0;
        while i < args.len() {
            let value = args.get(i + 1).copied();
            let consumed = match args[i] {
                "wtime" => set_number(&mut opts.wtime, value),
                "btime" => set_number(&mut opts.btime, value),
                "winc" => set_number(&mut opts.winc, value),
                "binc" => set_number(&mut opts.binc, value),
                "movestogo" => set_number(&mut opts.movestogo, value),
                "movetime" => set_number(&mut opts.movetime, value),
                "depth" => set_number(&mut opts.depth, value),
                "nodes" => set_number(&mut opts.nodes, value),
                "infinite" => {
                    opts.infinite = true;
                    false
                }
                other => {
                    log::debug!("ignoring go token '{other}'");
                    false
                }
            };
            i += if consumed { 2 } else { 1 };
        }
        opts
    }

    /// Clock situation for the side to move.
    #[must_use]
    pub fn time_control(&self, side: Color) -> TimeControl {
        if self.infinite {
            return TimeControl::Infinite;
        }
        if let Some(time_ms) = self.movetime {
            return TimeControl::MoveTime { time_ms };
        }
        let (time, inc) = match side {
            Color::White => (self.wtime, self.winc),
            Color::Black => (self.btime, self.binc),
        };
        match time {
            Some(time_left_ms) => TimeControl::Incremental {
                time_left_ms,
                inc_ms: inc.unwrap_or(0),
                movestogo: self.movestogo,
            },
            None if self.depth.is_some() => TimeControl::Depth,
            None => TimeControl::Infinite,
        }
    }
}

fn set_number<T: std::str::FromStr>(slot: &mut Option<T>, value: Option<&str>) -> bool {
    match value.and_then(|v| v.parse().ok()) {
        Some(n) => {
            *slot = Some(n);
            true
        }
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciCommand {
    Uci,
    IsReady,
    UciNewGame,
    Position(Vec<String>),
    Go(GoOptions),
    Perft(usize),
    SetOption(Vec<String>),
    Display,
    Stop,
    Quit,
    Unknown(String),
}

/// Parse one input line; blank lines yield `None`.
#[must_use]
pub fn parse_uci_command(line: &str) -> Option<UciCommand> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let (&head, rest) = parts.split_first()?;

    let owned_parts = || parts.iter().map(|p| (*p).to_string()).collect::<Vec<String>>();

    let cmd = match head {
        "uci" => UciCommand::Uci,
        "isready" => UciCommand::IsReady,
        "ucinewgame" => UciCommand::UciNewGame,
        "position" => UciCommand::Position(owned_parts()),
        "go" => UciCommand::Go(GoOptions::parse(rest)),
        "perft" => {
            let depth = rest.first().and_then(|v| v.parse::<usize>().ok()).unwrap_or(1);
            UciCommand::Perft(depth)
        }
        "setoption" => UciCommand::SetOption(owned_parts()),
        "d" => UciCommand::Display,
        "stop" => UciCommand::Stop,
        "quit" => UciCommand::Quit,
        _ => UciCommand::Unknown(line.trim().to_string()),
    };

    Some(cmd)
}
