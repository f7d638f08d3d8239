//! Position-level integration tests.


use crate::position::{Color, FenError, Piece, Position, Square};

const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[test]
fn test_startpos_basics() {
    let pos = Position::startpos();
    assert_eq!(pos.to_fen(), STARTPOS_FEN);
    assert_eq!(pos.side_to_move(), Color::White);
    assert_eq!(pos.legal_moves().len(), 20);
    assert_eq!(pos.game_ply(), 0);
    assert_eq!(pos.fullmove_number(), 1);
    assert!(!pos.is_check());
    assert!(pos.parent().is_none());
    assert_ne!(pos.hash(), 0);
}

#[test]
fn test_fen_round_trip_exact() {
    for fen in [
        STARTPOS_FEN,
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1",
        "8/8/8/8/8/8/8/K1k5 w - - 57 30",
    ] {
        let pos = Position::from_fen(fen);
        assert_eq!(pos.to_fen(), fen);
        let reparsed = Position::from_fen(&pos.to_fen());
        assert_eq!(reparsed.hash(), pos.hash());
    }
}

#[test]
fn test_fen_missing_trailing_fields() {
    let pos = Position::from_fen("8/8/8/8/8/8/8/K1k5 w - -");
    assert_eq!(pos.halfmove_clock(), 0);
    assert_eq!(pos.fullmove_number(), 1);
    assert_eq!(pos.to_fen(), "8/8/8/8/8/8/8/K1k5 w - - 0 1");
}

#[test]
fn test_fen_rejects_malformed_input() {
    assert!(matches!(
        Position::try_from_fen("8/8/8/8"),
        Err(FenError::TooFewParts { found: 1 })
    ));
    assert!(matches!(
        Position::try_from_fen("8/8/8/8/8/8/8 w - - 0 1"),
        Err(FenError::WrongRankCount { found: 7 })
    ));
    assert!(matches!(
        Position::try_from_fen("9/8/8/8/8/8/8/K1k5 w - - 0 1"),
        Err(FenError::InvalidPiece { .. })
    ));
    assert!(matches!(
        Position::try_from_fen("8/8/8/8/8/8/7/K1k5 w - - 0 1"),
        Err(FenError::WrongFileCount { files: 7, .. })
    ));
    assert!(matches!(
        Position::try_from_fen("ppppppppp/8/8/8/8/8/8/K1k5 w - - 0 1"),
        Err(FenError::WrongFileCount { .. })
    ));
    assert!(matches!(
        Position::try_from_fen("8/8/8/8/8/8/8/K1x5 w - - 0 1"),
        Err(FenError::InvalidPiece { char: 'x' })
    ));
    assert!(matches!(
        Position::try_from_fen("8/8/8/8/8/8/8/K1k5 x - - 0 1"),
        Err(FenError::InvalidSideToMove { .. })
    ));
    assert!(matches!(
        Position::try_from_fen("8/8/8/8/8/8/8/K1k5 w Kx - 0 1"),
        Err(FenError::InvalidCastling { char: 'x' })
    ));
    assert!(matches!(
        Position::try_from_fen("8/8/8/8/8/8/8/K1k5 w - e9 0 1"),
        Err(FenError::InvalidEnPassant { .. })
    ));
}

#[test]
fn test_fen_rejects_illegal_positions() {
    assert!(matches!(
        Position::try_from_fen("8/8/8/8/8/8/8/K7 w - - 0 1"),
        Err(FenError::MissingKing {
            color: Color::Black
        })
    ));
    assert!(matches!(
        Position::try_from_fen("kk6/8/8/8/8/8/8/K7 w - - 0 1"),
        Err(FenError::TooManyKings {
            color: Color::Black
        })
    ));
    assert!(matches!(
        Position::try_from_fen("k7/8/8/8/8/8/8/K6P w - - 0 1"),
        Err(FenError::PawnOnBackRank { .. })
    ));
    // White to move while the black king hangs in check.
    assert!(matches!(
        Position::try_from_fen("k7/R7/8/8/8/8/8/K7 w - - 0 1"),
        Err(FenError::SideNotToMoveInCheck)
    ));
}

#[test]
fn test_dead_en_passant_field_is_normalized() {
    // No black pawn can capture on e3, so the field is dropped on parse and
    // the position hashes like its EP-free twin.
    let with_ep =
        Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
    let without =
        Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1");
    assert_eq!(with_ep.en_passant_target(), None);
    assert_eq!(with_ep.hash(), without.hash());
    assert_eq!(with_ep.to_fen(), without.to_fen());
}

#[test]
fn test_live_en_passant_field_is_kept() {
    // A black pawn on d4 really can capture on e3.
    let pos =
        Position::from_fen("rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3");
    assert_eq!(pos.en_passant_target(), Some(Square::new(2, 4)));
    assert!(pos.to_fen().contains(" e3 "));
    let capture = pos.parse_uci_move("d4e3").unwrap();
    assert!(capture.is_en_passant());
}

#[test]
fn test_zobrist_transposition() {
    // Two different move orders reaching the same position hash identically.
    let a = Position::startpos()
        .do_uci_move("g1f3")
        .unwrap()
        .do_uci_move("g8f6")
        .unwrap();
    let b = Position::startpos()
        .do_uci_move("g1f3")
        .unwrap()
        .do_uci_move("g8f6")
        .unwrap();
    assert_eq!(a.hash(), b.hash());

    // Returning the knights restores the starting key.
    let home = a
        .do_uci_move("f3g1")
        .unwrap()
        .do_uci_move("f6g8")
        .unwrap();
    assert_eq!(home.hash(), Position::startpos().hash());
}

#[test]
fn test_parent_chain_records_history() {
    let start = Position::startpos();
    let after = start.do_uci_move("e2e4").unwrap().do_uci_move("c7c5").unwrap();
    assert_eq!(after.game_ply(), 2);
    assert_eq!(after.last_move().unwrap().to_string(), "c7c5");

    let parent = after.parent().unwrap();
    assert_eq!(parent.last_move().unwrap().to_string(), "e2e4");
    let grandparent = parent.parent().unwrap();
    assert_eq!(grandparent.to_fen(), start.to_fen());
    assert!(grandparent.parent().is_none());
}

#[test]
fn test_uci_position_string() {
    let start = Position::startpos();
    assert_eq!(
        start.to_uci_position(),
        format!("position fen {STARTPOS_FEN}")
    );

    // Pawn moves reset the halfmove clock, so the base stays current.
    let e4 = start.do_uci_move("e2e4").unwrap();
    assert_eq!(e4.to_uci_position(), format!("position fen {}", e4.to_fen()));

    // Reversible moves accumulate in the moves list.
    let pos = e4
        .do_uci_move("e7e5")
        .unwrap()
        .do_uci_move("g1f3")
        .unwrap()
        .do_uci_move("b8c6")
        .unwrap();
    assert_eq!(
        pos.to_uci_position(),
        format!(
            "position fen {} moves g1f3 b8c6",
            e4.do_uci_move("e7e5").unwrap().to_fen()
        )
    );
}

#[test]
fn test_capturing_a_rook_clears_its_right() {
    // Bishop takes the h8 rook: black loses kingside castling.
    let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1")
        .do_uci_move("h1h8")
        .unwrap();
    assert!(!pos.castling().has(Color::Black, true));
    assert!(pos.castling().has(Color::Black, false));
    assert!(!pos.castling().has(Color::White, true));
}

#[test]
fn test_rook_move_clears_one_right() {
    let pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1")
        .do_uci_move("a1a2")
        .unwrap();
    assert!(pos.castling().has(Color::White, true));
    assert!(!pos.castling().has(Color::White, false));
}

#[test]
fn test_promotion_replaces_the_pawn() {
    let pos = Position::from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1")
        .do_uci_move("a7a8q")
        .unwrap();
    assert_eq!(
        pos.piece_at(Square::new(7, 0)),
        Some((Color::White, Piece::Queen))
    );
    assert!(pos.pieces(Piece::Pawn, Color::White).is_empty());
    assert_eq!(pos.halfmove_clock(), 0);
}

#[test]
fn test_flip_mirrors_everything() {
    let pos =
        Position::from_fen("r3k2r/ppp2ppp/8/3pP3/8/8/PPP2PPP/R3K2R w Kq d6 0 5");
    let flipped = pos.flip();

    assert_eq!(flipped.side_to_move(), Color::Black);
    // White kingside becomes black kingside; black queenside becomes white
    // queenside.
    assert!(flipped.castling().has(Color::Black, true));
    assert!(flipped.castling().has(Color::White, false));
    assert!(!flipped.castling().has(Color::White, true));
    assert!(!flipped.castling().has(Color::Black, false));
    // The d6 EP target mirrors to d3.
    assert_eq!(flipped.en_passant_target(), Some(Square::new(2, 3)));

    // Flipping twice restores the original board.
    assert_eq!(flipped.flip().to_fen(), pos.to_fen());
}

#[test]
fn test_flip_swaps_piece_colors() {
    let pos = Position::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1");
    let flipped = pos.flip();
    assert_eq!(
        flipped.piece_at(Square::new(6, 4)),
        Some((Color::Black, Piece::Pawn))
    );
    assert_eq!(flipped.to_fen(), "4k3/4p3/8/8/8/8/8/4K3 b - - 0 1");
}

#[test]
fn test_attack_queries() {
    let pos = Position::startpos();
    // e3 is covered by exactly the d2 and f2 pawns.
    let attackers = pos.attacks_to(Square::new(2, 4), Color::White);
    assert_eq!(attackers.popcount(), 2);
    assert!(attackers.contains(Square::new(1, 3)));
    assert!(attackers.contains(Square::new(1, 5)));

    assert!(pos.is_attacked(Square::new(2, 0), Color::White));
    assert!(!pos.is_attacked(Square::new(4, 4), Color::White));
}

#[test]
fn test_pinned_pieces() {
    // The e4 knight is pinned against the king by the e8 rook, and the c3
    // pawn by the a5 bishop.
    let pos = Position::from_fen("4r2k/8/8/b7/4N3/2P5/8/4K3 w - - 0 1");
    let pinned = pos.pinned_pieces(Color::White);
    assert!(pinned.contains(Square::new(3, 4)));
    assert!(pinned.contains(Square::new(2, 2)));
    assert_eq!(pinned.popcount(), 2);

    // Blocking with two pieces on the ray is not a pin.
    let two = Position::from_fen("4r2k/8/8/4P3/4N3/8/8/4K3 w - - 0 1");
    assert!(two.pinned_pieces(Color::White).is_empty());
}

#[test]
fn test_display_is_fen() {
    let pos = Position::startpos();
    assert_eq!(pos.to_string(), pos.to_fen());
}

#[cfg(feature = "serde")]
#[test]
fn test_serde_round_trip() {
    use crate::position::Move;

    let mv = Move::new_promotion(Square::new(6, 0), Square::new(7, 0), Piece::Queen);
    let json = serde_json::to_string(&mv).unwrap();
    let back: Move = serde_json::from_str(&json).unwrap();
    assert_eq!(mv, back);

    let sq = Square::new(3, 4);
    let json = serde_json::to_string(&sq).unwrap();
    assert_eq!(serde_json::from_str::<Square>(&json).unwrap(), sq);
}
