//! Universal Chess Interface (UCI) protocol implementation.
//!
//! Handles communication with chess GUIs following the UCI specification.
//! Protocol output goes to the session's writer (stdout in the binary);
//! diagnostics go through `log`.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use crate::board::{Board, FenError, MoveParseError};
use crate::book::{BookLookup, OpeningBook};
use crate::engine::{EngineController, SearchParams};

pub mod command;
pub mod options;
pub mod report;

use command::{parse_uci_command, GoOptions, UciCommand};
use options::{parse_setoption, UciOptionAction, UciOptions};
use report::{format_bestmove, format_final_info, format_iteration};

/// Error type for UCI position command parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciError {
    /// Invalid FEN string
    InvalidFen(FenError),
    /// Invalid move in the move list
    InvalidMove { move_str: String, error: MoveParseError },
    /// Missing required parts in the command
    MissingParts,
}

impl fmt::Display for UciError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UciError::InvalidFen(e) => write!(f, "Invalid FEN: {e}"),
            UciError::InvalidMove { move_str, error } => {
                write!(f, "Invalid move '{move_str}': {error}")
            }
            UciError::MissingParts => write!(f, "Missing required parts in position command"),
        }
    }
}

impl std::error::Error for UciError {}

impl From<FenError> for UciError {
    fn from(e: FenError) -> Self {
        UciError::InvalidFen(e)
    }
}

/// Parse a UCI position command, returning an error on failure.
///
/// Supports both "position startpos" and "position fen <fen>" formats,
/// optionally followed by "moves <move1> <move2> ...". FEN fields after the
/// placement may be omitted. `board` is only replaced when the whole command
/// is valid.
pub fn try_parse_position_command(board: &mut Board, parts: &[&str]) -> Result<(), UciError> {
    let (&kind, rest) = parts
        .get(1..)
        .and_then(<[&str]>::split_first)
        .ok_or(UciError::MissingParts)?;

    let (fields, moves) = match rest.iter().position(|&t| t == "moves") {
        Some(i) => (&rest[..i], &rest[i + 1..]),
        None => (rest, &[][..]),
    };

    let mut next = match kind {
        "startpos" => Board::new(),
        "fen" if !fields.is_empty() => Board::try_from_fen(&fields.join(" "))?,
        _ => return Err(UciError::MissingParts),
    };

    for &mv in moves {
        next.make_move_uci(mv).map_err(|error| UciError::InvalidMove {
            move_str: mv.to_string(),
            error,
        })?;
    }

    *board = next;
    Ok(())
}

fn write_line<W: Write>(out: &Mutex<W>, line: &str) {
    let mut out = out.lock();
    if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
        log::error!("failed to write '{line}': {e}");
    }
}

/// One UCI conversation: engine state, options and the output sink.
pub struct UciSession<W: Write + Send + 'static> {
    engine: EngineController,
    options: UciOptions,
    book: Option<OpeningBook>,
    out: Arc<Mutex<W>>,
    infinite_search: bool,
}

impl<W: Write + Send + 'static> UciSession<W> {
    pub fn new(out: W) -> Self {
        let options = UciOptions::default();
        let mut engine = EngineController::new(options.hash_mb);
        engine.set_threads(options.threads);
        UciSession {
            engine,
            options,
            book: None,
            out: Arc::new(Mutex::new(out)),
            infinite_search: false,
        }
    }

    /// Shared handle to the output sink
    pub fn output(&self) -> Arc<Mutex<W>> {
        Arc::clone(&self.out)
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        self.engine.board()
    }

    #[must_use]
    pub fn options(&self) -> &UciOptions {
        &self.options
    }

    fn send(&self, line: &str) {
        write_line(&self.out, line);
    }

    /// Handle one input line. Returns `false` once `quit` was received.
    pub fn handle_line(&mut self, line: &str) -> bool {
        let Some(command) = parse_uci_command(line) else {
            return true;
        };

        match command {
            UciCommand::Uci => {
                let mut out = self.out.lock();
                if let Err(e) = self.options.print(&mut *out).and_then(|()| out.flush()) {
                    log::error!("failed to write handshake: {e}");
                }
            }
            UciCommand::IsReady => self.send("readyok"),
            UciCommand::UciNewGame => self.engine.new_game(),
            UciCommand::Position(parts) => {
                let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
                let mut board = self.engine.board().clone();
                match try_parse_position_command(&mut board, &parts) {
                    Ok(()) => self.engine.set_board(board),
                    Err(e) => log::warn!("ignoring position command: {e}"),
                }
            }
            UciCommand::Go(opts) => self.go(&opts),
            UciCommand::Perft(depth) => self.perft(depth),
            UciCommand::SetOption(parts) => {
                let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
                match parse_setoption(&parts) {
                    Some((name, value)) => {
                        if let Some(action) =
                            self.options.apply_setoption(&name, value.as_deref())
                        {
                            self.apply_action(action);
                        }
                    }
                    None => log::warn!("malformed setoption command"),
                }
            }
            UciCommand::Display => self.display(),
            UciCommand::Stop => self.engine.stop_search(),
            UciCommand::Quit => {
                self.engine.stop_search();
                return false;
            }
            UciCommand::Unknown(text) => log::warn!("unknown command: {text}"),
        }
        true
    }

    /// Called at end of input: lets a bounded search finish, stops an infinite one.
    pub fn finish(&mut self) {
        if self.infinite_search {
            self.engine.stop_search();
        } else {
            self.engine.wait_for_search();
        }
    }

    fn apply_action(&mut self, action: UciOptionAction) {
        match action {
            UciOptionAction::ReinitHash(mb) => self.engine.resize_hash(mb),
            UciOptionAction::SetThreads(n) => self.engine.set_threads(n),
            UciOptionAction::LoadBook(path) => match OpeningBook::load(&path) {
                Ok(book) => self.book = Some(book),
                Err(e) => {
                    log::warn!("{e}");
                    self.book = None;
                }
            },
            UciOptionAction::UnloadBook => self.book = None,
        }
    }

    fn go(&mut self, opts: &GoOptions) {
        self.engine.stop_search();
        let side = self.engine.board().side_to_move();

        if self.options.own_book {
            if let Some(mv) = self.book.as_ref().and_then(|b| b.choose_move(self.engine.board())) {
                log::info!("book move {mv}");
                self.send(&format_bestmove(Some(mv)));
                return;
            }
        }

        let time = opts
            .time_control(side)
            .compute_limits(&self.options.time_config());
        if let Some(limits) = time {
            log::debug!("time budget optimal {:?} max {:?}", limits.optimal, limits.max);
        }
        let params = SearchParams {
            depth: opts.depth,
            time,
            nodes: opts.nodes,
            infinite: opts.infinite,
        };
        self.infinite_search = opts.infinite;

        let info_out = Arc::clone(&self.out);
        self.engine.set_info_callback(Some(Arc::new(move |info| {
            write_line(&info_out, &format_iteration(info, side));
        })));

        let out = Arc::clone(&self.out);
        let started = self.engine.start_search(params, move |result| {
            write_line(&out, &format_final_info(&result, side));
            write_line(&out, &format_bestmove(result.best_move));
        });
        if let Err(e) = started {
            log::error!("could not start search: {e}");
            self.send(&format_bestmove(None));
        }
    }

    fn perft(&mut self, depth: usize) {
        self.engine.stop_search();
        let mut board = self.engine.board().clone();
        let start = Instant::now();
        let divide = board.perft_divide(depth);
        let nodes: u64 = if depth == 0 {
            1
        } else {
            divide.iter().map(|(_, n)| n).sum()
        };
        for (mv, count) in &divide {
            self.send(&format!("{mv}: {count}"));
        }
        self.send("");
        self.send(&format!("Nodes searched: {nodes}"));
        self.send(&format!(
            "info string perft depth {depth} nodes {nodes} time {}",
            start.elapsed().as_millis()
        ));
    }

    fn display(&self) {
        let board = self.engine.board();
        self.send(&board.to_string());
        self.send(&format!("Fen: {}", board.to_fen()));
        self.send(&format!("Key: {:016x}", board.hash()));
    }
}

/// Read commands from stdin until `quit` or end of input.
pub fn run_uci_loop() -> io::Result<()> {
    let stdin = io::stdin();
    let mut session = UciSession::new(io::stdout());

    for line in stdin.lock().lines() {
        let line = line?;
        log::trace!("<< {line}");
        if !session.handle_line(&line) {
            return Ok(());
        }
    }

    session.finish();
    Ok(())
}
