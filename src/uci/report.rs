//! Formatting of engine output lines.
//!
//! Search scores are White-relative; UCI wants them from the side to move,
//! so every formatter takes the side that was to move at the root.

use std::fmt::Write as _;

use crate::board::{Color, Move, SearchIterationInfo, SearchResult, MATE_THRESHOLD, MAX_SCORE};

/// `score cp N` or `score mate N` from the side to move's point of view.
///
/// `plies` is the distance to mate for mate scores.
#[must_use]
pub fn format_score(score: i32, plies: Option<i32>, side: Color) -> String {
    let relative = if side == Color::White { score } else { -score };
    match plies {
        Some(plies) if relative.abs() >= MATE_THRESHOLD => {
            let moves = (plies.abs() + 1) / 2;
            if relative > 0 || moves == 0 {
                format!("mate {moves}")
            } else {
                format!("mate -{moves}")
            }
        }
        _ => format!("cp {relative}"),
    }
}

fn mate_plies(score: i32, depth: u32) -> Option<i32> {
    (score.abs() >= MATE_THRESHOLD).then(|| depth as i32 - (score.abs() - MAX_SCORE))
}

fn info_line(
    depth: u32,
    score: i32,
    side: Color,
    nodes: u64,
    nps: u64,
    best_move: Option<Move>,
    time_ms: u64,
) -> String {
    let mut line = format!(
        "info depth {depth} score {} nodes {nodes} nps {nps}",
        format_score(score, mate_plies(score, depth), side)
    );
    if let Some(mv) = best_move {
        let _ = write!(line, " pv {mv}");
    }
    let _ = write!(line, " time {time_ms}");
    line
}

/// Per-iteration `info` line.
#[must_use]
pub fn format_iteration(info: &SearchIterationInfo, side: Color) -> String {
    let mut line = info_line(
        info.depth,
        info.score,
        side,
        info.nodes,
        info.nps,
        info.best_move,
        info.time_ms,
    );
    let _ = write!(line, " hashfull {}", info.hashfull);
    line
}

/// Closing `info` line for a finished search.
#[must_use]
pub fn format_final_info(result: &SearchResult, side: Color) -> String {
    let time_ms = result.elapsed.as_millis() as u64;
    let nps = if time_ms > 0 {
        result.nodes * 1000 / time_ms
    } else {
        result.nodes
    };
    info_line(
        result.depth,
        result.score,
        side,
        result.nodes,
        nps,
        result.best_move,
        time_ms,
    )
}

/// `bestmove` line; `0000` when there is no legal move.
#[must_use]
pub fn format_bestmove(best_move: Option<Move>) -> String {
    match best_move {
        Some(mv) => format!("bestmove {mv}"),
        None => "bestmove 0000".to_string(),
    }
}
