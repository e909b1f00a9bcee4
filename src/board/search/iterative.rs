use std::time::{Duration, Instant};

use crate::sync::StopFlag;
use crate::tt::{BoundType, TranspositionTable};

use super::super::{Board, Move};
use super::alpha_beta::terminal_score;
use super::smp::{search_root, RootLimits};
use super::{SearchConfig, SearchIterationInfo, SearchResult, MAX_PLY};

/// Search `board` one ply deeper per iteration until a limit is reached.
///
/// An iteration interrupted by the stop flag, the node limit or
/// `max_time` is thrown away; the result always comes from the deepest
/// completed iteration. No new iteration starts once `optimal_time` has
/// elapsed. If not even depth 1 completes, the first legal move is returned
/// so callers always have something to play.
pub fn iterative_deepening(
    board: &Board,
    config: &SearchConfig,
    tt: &TranspositionTable,
    stop: &StopFlag,
) -> SearchResult {
    let start = Instant::now();
    let mut root = board.clone();
    let mut moves: Vec<Move> = root.generate_legal_moves().iter().copied().collect();
    let root_hash = root.hash();

    let mut result = SearchResult {
        best_move: moves.first().copied(),
        score: 0,
        depth: 0,
        nodes: 0,
        elapsed: Duration::ZERO,
    };
    if moves.is_empty() {
        result.score = terminal_score(&root, 0);
        result.elapsed = start.elapsed();
        return result;
    }

    let max_depth = config
        .max_depth
        .unwrap_or(MAX_PLY as u32)
        .clamp(1, MAX_PLY as u32);
    let deadline = config.max_time.map(|limit| start + limit);
    let limits = RootLimits::new(stop, deadline, config.node_limit);

    for depth in 1..=max_depth {
        let pv_move = result.best_move.filter(|_| result.depth > 0);
        if let Some(mv) = pv_move.or_else(|| tt.best_move_deepest(root_hash)) {
            promote(&mut moves, mv);
        }

        let outcome = search_root(&root, &moves, depth, tt, config.threads, &limits);
        let Some(best) = outcome.best else {
            log::debug!(
                "depth {depth} interrupted ({:?}) after {} nodes",
                stop.reason(),
                outcome.nodes
            );
            break;
        };

        tt.store(root_hash, depth, best.score, BoundType::Exact, Some(best.mv));
        result = SearchResult {
            best_move: Some(best.mv),
            score: best.score,
            depth,
            nodes: outcome.nodes,
            elapsed: start.elapsed(),
        };
        report(&result, tt, config);

        if stop.is_stopped() || config.optimal_time.is_some_and(|t| start.elapsed() >= t) {
            break;
        }
    }

    result.nodes = limits.nodes();
    result.elapsed = start.elapsed();
    result
}

/// Move `mv` to the front of the root list, keeping the rest in order.
fn promote(moves: &mut [Move], mv: Move) {
    if let Some(pos) = moves.iter().position(|m| m.same_squares(mv)) {
        moves[..=pos].rotate_right(1);
    }
}

fn report(result: &SearchResult, tt: &TranspositionTable, config: &SearchConfig) {
    let time_ms = result.elapsed.as_millis() as u64;
    let nps = if time_ms > 0 {
        result.nodes * 1000 / time_ms
    } else {
        result.nodes
    };
    log::debug!(
        "depth {} score {} nodes {} nps {} best {}",
        result.depth,
        result.score,
        result.nodes,
        nps,
        result.best_move.map_or_else(|| "none".to_string(), Move::to_uci),
    );

    if let Some(callback) = &config.info_callback {
        callback(&SearchIterationInfo {
            depth: result.depth,
            nodes: result.nodes,
            nps,
            time_ms,
            score: result.score,
            best_move: result.best_move,
            hashfull: tt.hashfull_per_mille(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn promote_keeps_relative_order() {
        let mut board = Board::new();
        let mut moves: Vec<Move> = board.generate_legal_moves().iter().copied().collect();
        let original = moves.clone();
        promote(&mut moves, original[4]);
        assert_eq!(moves[0], original[4]);
        assert_eq!(&moves[1..5], &original[0..4]);
        assert_eq!(&moves[5..], &original[5..]);
    }

    #[test]
    fn reports_every_completed_depth() {
        let seen = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&seen);
        let config = SearchConfig::depth(3)
            .with_threads(2)
            .with_info_callback(Arc::new(move |info| {
                counter.fetch_add(1, Ordering::Relaxed);
                assert!(info.best_move.is_some());
            }));
        let tt = TranspositionTable::new(4);
        let result = iterative_deepening(&Board::new(), &config, &tt, &StopFlag::new());
        assert_eq!(result.depth, 3);
        assert_eq!(seen.load(Ordering::Relaxed), 3);
        assert!(result.best_move.is_some());
    }

    #[test]
    fn stopped_before_start_still_returns_a_move() {
        let tt = TranspositionTable::new(1);
        let result = iterative_deepening(
            &Board::new(),
            &SearchConfig::depth(5),
            &tt,
            &StopFlag::stopped(),
        );
        assert_eq!(result.depth, 0);
        assert!(result.best_move.is_some());
    }

    #[test]
    fn no_legal_moves() {
        let board = Board::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
        let tt = TranspositionTable::new(1);
        let result = iterative_deepening(&board, &SearchConfig::depth(3), &tt, &StopFlag::new());
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, super::super::MAX_SCORE);
    }

    #[test]
    fn node_limit_ends_the_search() {
        let tt = TranspositionTable::new(1);
        let config = SearchConfig::default().with_nodes(5_000).with_threads(1);
        let result = iterative_deepening(&Board::new(), &config, &tt, &StopFlag::new());
        assert!(result.depth < MAX_PLY as u32);
        assert!(result.best_move.is_some());
    }
}
