//! Edge case tests for special chess positions and moves.

use std::str::FromStr;

use crate::board::{Board, FenError, Move, MoveParseError, MoveType, Piece, PieceKind, Square};

#[test]
fn test_stalemate_position() {
    let mut board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    assert!(!board.is_checkmate());
    assert!(board.is_stalemate());
    assert!(board.generate_legal_moves().is_empty());
}

#[test]
fn test_all_four_promotions_generated() {
    let mut board = Board::from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1");
    let moves = board.generate_legal_moves();
    let promotions: Vec<PieceKind> = moves
        .iter()
        .filter_map(|m| m.promotion.map(Piece::kind))
        .collect();
    assert_eq!(
        promotions,
        vec![
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen
        ]
    );
}

#[test]
fn test_en_passant_removes_correct_pawn() {
    let mut board =
        Board::from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 1");
    let ep = board.parse_uci_move("e5d6").unwrap();
    assert_eq!(ep.move_type, MoveType::EnPassant);
    assert_eq!(ep.captured, Some(Piece::BLACK_PAWN));

    let undo = board.make_move(ep);
    assert_eq!(board.piece_at(Square::from_str("d5").unwrap()), None);
    assert_eq!(
        board.piece_at(Square::from_str("d6").unwrap()),
        Some(Piece::WHITE_PAWN)
    );
    assert_eq!(board.piece_at(Square::from_str("e5").unwrap()), None);

    board.undo_move(undo);
    assert_eq!(
        board.piece_at(Square::from_str("d5").unwrap()),
        Some(Piece::BLACK_PAWN)
    );
    assert_eq!(
        board.piece_at(Square::from_str("e5").unwrap()),
        Some(Piece::WHITE_PAWN),
        "White pawn should be back on e5"
    );
}

#[test]
fn test_en_passant_illegal_when_it_exposes_king() {
    // Both pawns leave the fifth rank, opening the rook onto the king
    let mut board = Board::from_fen("8/8/8/KPp4r/8/8/8/4k3 w - c6 0 1");
    assert!(board.parse_uci_move("b5c6").is_err());
}

#[test]
fn test_castling_blocked_by_check() {
    let mut board = Board::from_fen("r3k2r/8/8/8/4Q3/8/8/R3K2R b KQkq - 0 1");
    let moves = board.generate_legal_moves();
    assert!(
        !moves.iter().any(|m| m.is_castle()),
        "Castling should not be available when in check"
    );
}

#[test]
fn test_castling_without_rights() {
    let mut board = Board::from_fen("r4rk1/8/8/8/8/8/8/R3K2R w - - 0 1");
    assert!(!board.generate_legal_moves().iter().any(|m| m.is_castle()));

    let mut board = Board::from_fen("r4rk1/8/8/8/8/8/8/R3K2R w KQ - 0 1");
    assert!(
        board.generate_legal_moves().iter().any(|m| m.is_castle()),
        "Some castling should be available"
    );
}

#[test]
fn test_double_check_only_king_can_move() {
    let mut board = Board::from_fen("4r1k1/8/8/8/8/Q2n4/8/4K3 w - - 0 1");
    let moves = board.generate_legal_moves();
    assert!(!moves.is_empty());
    for mv in moves.iter() {
        assert_eq!(
            mv.from,
            Square::E1,
            "Only king should be able to move in double check"
        );
    }
}

#[test]
fn test_checkmate_back_rank() {
    let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
    let mate_move = board.parse_uci_move("a1a8").unwrap();
    board.make_move(mate_move);
    assert!(board.is_checkmate());
    assert!(!board.is_stalemate());
}

#[test]
fn test_fen_parsing_errors() {
    assert!(Board::try_from_fen("").is_err());
    assert!(matches!(
        Board::try_from_fen("rnbxkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
        Err(FenError::InvalidPiece { .. })
    ));
    assert!(
        Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1").is_err()
    );
    assert!(
        Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w XYZ - 0 1").is_err()
    );
}

#[test]
fn test_placement_only_fen_defaults() {
    let board = Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").unwrap();
    assert!(board.white_to_move());
    assert!(board.castling_rights().is_empty());
    assert_eq!(board.en_passant(), None);
    assert_eq!(board.halfmove_clock(), 0);
    assert_eq!(board.fullmove_number(), 1);
}

#[test]
fn test_square_parsing() {
    assert_eq!(Square::from_str("a1").unwrap(), Square::A1);
    assert_eq!(Square::from_str("h8").unwrap(), Square::H8);
    assert_eq!(Square::from_str("e4").unwrap(), Square::from_rank_file(4, 4));
    assert_eq!(Square::E1.to_string(), "e1");

    assert!(Square::from_str("i1").is_err());
    assert!(Square::from_str("a9").is_err());
    assert!(Square::from_str("").is_err());
    assert!(Square::from_str("a").is_err());
}

#[test]
fn test_square_try_from() {
    assert!(Square::try_from(0usize).is_ok());
    assert!(Square::try_from(63usize).is_ok());
    assert!(Square::try_from(64usize).is_err());
}

#[test]
fn test_move_convenience_methods() {
    let quiet = Move::quiet(
        Piece::WHITE_PAWN,
        Square::from_rank_file(6, 4),
        Square::from_rank_file(4, 4),
    );
    assert!(!quiet.is_capture());
    assert!(!quiet.is_promotion());
    assert_eq!(quiet.to_uci(), "e2e4");

    let capture = Move::capture(
        Piece::WHITE_KNIGHT,
        Square::G1,
        Square::from_rank_file(5, 7),
        Piece::BLACK_BISHOP,
    );
    assert!(capture.is_capture());
    assert!(!capture.is_promotion());

    let promo = Move::promotion(
        Piece::WHITE_PAWN,
        Square::from_rank_file(1, 0),
        Square::A8,
        Piece::WHITE_QUEEN,
        None,
    );
    assert!(!promo.is_capture());
    assert!(promo.is_promotion());
    assert_eq!(promo.to_uci(), "a7a8q");

    let promo_cap = Move::promotion(
        Piece::WHITE_PAWN,
        Square::from_rank_file(1, 0),
        Square::B8,
        Piece::WHITE_ROOK,
        Some(Piece::BLACK_KNIGHT),
    );
    assert!(promo_cap.is_capture());
    assert!(promo_cap.is_promotion());
    assert_eq!(promo_cap.move_type, MoveType::PromotionCapture);

    let castle = Move::castle(Piece::WHITE_KING, Square::E1, Square::G1);
    assert!(!castle.is_capture());
    assert!(castle.is_castle());
    assert_eq!(castle.to_uci(), "e1g1");

    let ep = Move::en_passant(
        Piece::WHITE_PAWN,
        Square::from_rank_file(3, 4),
        Square::from_rank_file(2, 5),
        Piece::BLACK_PAWN,
    );
    assert!(ep.is_capture());
    assert_eq!(ep.move_type, MoveType::EnPassant);
}

#[test]
fn test_uci_move_errors() {
    let mut board = Board::new();
    assert!(matches!(board.parse_uci_move("e2"), Err(MoveParseError::InvalidLength { .. })));
    assert!(matches!(board.parse_uci_move("e2e5"), Err(MoveParseError::IllegalMove { .. })));
    assert!(board.parse_uci_move("e2e4").is_ok());
}

#[test]
fn test_board_from_str() {
    let board: Board = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        .parse()
        .unwrap();
    assert!(board.white_to_move());

    let result: Result<Board, _> = "invalid fen".parse();
    assert!(result.is_err());
}
