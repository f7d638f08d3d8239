//! Move execution: building the successor of a position.

use std::sync::Arc;

use super::attack_tables::PAWN_ATTACKS;
use super::error::{MoveParseError, SanError};
use super::types::{Color, Move, Piece, Square};
use super::Position;

impl Position {
    /// Apply a legal move, producing the successor position.
    ///
    /// The successor keeps an `Arc` back-reference to this position so that
    /// repetition detection and history serialization can walk the game.
    ///
    /// Passing a move that is not in `legal_moves()` is a contract violation;
    /// debug builds assert, release builds leave the result unspecified.
    #[must_use]
    pub fn do_move(&self, m: Move) -> Position {
        debug_assert!(
            self.legal_moves().iter().any(|&lm| lm == m),
            "do_move called with illegal move {m}"
        );

        let parent = Arc::new(self.clone());
        let mut pos = (*parent).clone();
        pos.parent = Some(parent);

        let us = self.side_to_move;
        let them = us.opponent();
        let from = m.from();
        let to = m.to();

        pos.side_to_move = them;
        pos.en_passant_target = None;
        pos.halfmove_clock += 1;
        pos.game_ply += 1;
        pos.last_move = Some(m);

        if m.is_en_passant() {
            let captured = match us {
                Color::White => Square::from_index(to.index() - 8),
                Color::Black => Square::from_index(to.index() + 8),
            };
            pos.remove_piece(captured, them, Piece::Pawn);
            pos.move_piece(from, to, us, Piece::Pawn);
            pos.halfmove_clock = 0;
        } else if m.is_castle() {
            pos.move_piece(from, to, us, Piece::King);
            pos.king_square[us.index()] = to;
            // Rook hops over the king: h-file rook to the king's left for
            // kingside, a-file rook to the king's right for queenside.
            let (rook_from, rook_to) = if to.index() > from.index() {
                (to.index() + 1, to.index() - 1)
            } else {
                (to.index() - 2, to.index() + 1)
            };
            pos.move_piece(
                Square::from_index(rook_from),
                Square::from_index(rook_to),
                us,
                Piece::Rook,
            );
        } else {
            if let Some((cap_color, cap_piece)) = self.piece_at(to) {
                pos.remove_piece(to, cap_color, cap_piece);
                pos.halfmove_clock = 0;
            }

            let moving = self.piece_on(from).expect("do_move origin is occupied");
            if let Some(promo) = m.promotion() {
                pos.remove_piece(from, us, Piece::Pawn);
                pos.set_piece(to, us, promo);
                pos.halfmove_clock = 0;
            } else {
                pos.move_piece(from, to, us, moving);
                if moving == Piece::King {
                    pos.king_square[us.index()] = to;
                }
            }

            if moving == Piece::Pawn {
                pos.halfmove_clock = 0;
                let (from_idx, to_idx) = (from.index(), to.index());
                if from_idx.abs_diff(to_idx) == 16 {
                    // Record the transit square only when an enemy pawn is
                    // actually positioned to capture on it.
                    let transit = Square::from_index((from_idx + to_idx) / 2);
                    let enemy_pawns = pos.pieces(Piece::Pawn, them).0;
                    if PAWN_ATTACKS[us.index()][transit.index()] & enemy_pawns != 0 {
                        pos.en_passant_target = Some(transit);
                    }
                }
            }
        }

        pos.castling.discard_square(from);
        pos.castling.discard_square(to);

        pos.checkers = pos.attacks_to(pos.king_square(them), us);
        pos.hash = pos.compute_hash();

        pos.debug_validate();
        pos
    }

    /// Parse a UCI move against this position and apply it.
    pub fn do_uci_move(&self, uci: &str) -> Result<Position, MoveParseError> {
        let m = self.parse_uci_move(uci)?;
        Ok(self.do_move(m))
    }

    /// Parse a SAN move against this position and apply it.
    pub fn do_san_move(&self, san: &str) -> Result<Position, SanError> {
        let m = self.parse_san(san)?;
        Ok(self.do_move(m))
    }
}
