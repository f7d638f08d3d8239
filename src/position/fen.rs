//! FEN parsing and emission, plus UCI-facing serialization.

use std::str::FromStr;

use super::attack_tables::PAWN_ATTACKS;
use super::error::{FenError, MoveParseError};
use super::types::{
    file_to_index, rank_to_index, Bitboard, Color, Move, Piece, Square, CASTLE_BLACK_K,
    CASTLE_BLACK_Q, CASTLE_WHITE_K, CASTLE_WHITE_Q,
};
use super::Position;

impl Position {
    /// Parse a position from FEN notation.
    ///
    /// Requires at least the placement, side, castling, and en passant
    /// fields; the halfmove clock and fullmove number default to 0 and 1.
    /// The position is validated before being returned: both kings present
    /// and unique, no pawns on the back ranks, and the side that just moved
    /// not left in check.
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        let mut pos = Position::bare();
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        // Piece placement, rank 8 down to rank 1.
        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount { found: ranks.len() });
        }
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx;
            let mut file = 0usize;
            for c in rank_str.chars() {
                if let Some(run) = c.to_digit(10) {
                    if run == 0 || run > 8 {
                        return Err(FenError::InvalidPiece { char: c });
                    }
                    file += run as usize;
                } else {
                    let color = if c.is_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                    if file >= 8 {
                        return Err(FenError::WrongFileCount {
                            rank,
                            files: file + 1,
                        });
                    }
                    pos.set_piece(Square::new(rank, file), color, piece);
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::WrongFileCount { rank, files: file });
            }
        }

        match parts[1] {
            "w" => pos.side_to_move = Color::White,
            "b" => pos.side_to_move = Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        }

        for c in parts[2].chars() {
            match c {
                'K' => pos.castling.set(Color::White, true),
                'Q' => pos.castling.set(Color::White, false),
                'k' => pos.castling.set(Color::Black, true),
                'q' => pos.castling.set(Color::Black, false),
                '-' => {}
                _ => return Err(FenError::InvalidCastling { char: c }),
            }
        }

        let ep_field = if parts[3] == "-" {
            None
        } else {
            match Square::from_str(parts[3]) {
                Ok(sq) => Some(sq),
                Err(_) => {
                    return Err(FenError::InvalidEnPassant {
                        found: parts[3].to_string(),
                    })
                }
            }
        };

        let halfmove: u32 = parts.get(4).and_then(|s| s.parse().ok()).unwrap_or(0);
        let fullmove: u32 = parts.get(5).and_then(|s| s.parse().ok()).unwrap_or(1);
        pos.halfmove_clock = halfmove;
        pos.game_ply =
            2 * fullmove.saturating_sub(1) + u32::from(pos.side_to_move == Color::Black);

        pos.validate_placement()?;

        // Keep the EP square only when a capture is actually available, so
        // that positions equal up to a dead EP field hash identically.
        pos.en_passant_target = ep_field.filter(|&ep| pos.en_passant_is_capturable(ep));

        pos.refresh();

        if pos.is_attacked(
            pos.king_square(pos.side_to_move.opponent()),
            pos.side_to_move,
        ) {
            return Err(FenError::SideNotToMoveInCheck);
        }

        pos.debug_validate();
        Ok(pos)
    }

    /// Parse a position from FEN notation.
    ///
    /// # Panics
    /// Panics if the FEN string is invalid. Use `try_from_fen` for fallible
    /// parsing.
    #[must_use]
    pub fn from_fen(fen: &str) -> Self {
        Self::try_from_fen(fen).expect("Invalid FEN string")
    }

    fn validate_placement(&self) -> Result<(), FenError> {
        for color in [Color::White, Color::Black] {
            let kings = self.pieces(Piece::King, color);
            if kings.is_empty() {
                return Err(FenError::MissingKing { color });
            }
            if !kings.is_single() {
                return Err(FenError::TooManyKings { color });
            }
        }

        let pawns = self.pieces(Piece::Pawn, Color::White).0
            | self.pieces(Piece::Pawn, Color::Black).0;
        let back_ranks = Bitboard::RANK_1.0 | Bitboard::RANK_8.0;
        if pawns & back_ranks != 0 {
            let sq = Bitboard(pawns & back_ranks).first();
            return Err(FenError::PawnOnBackRank {
                square: sq.to_string(),
            });
        }

        Ok(())
    }

    /// Whether a pawn of the side to move can actually capture on `ep`.
    pub(crate) fn en_passant_is_capturable(&self, ep: Square) -> bool {
        let us = self.side_to_move;
        let them = us.opponent();
        let target_rank = match us {
            Color::White => 5,
            Color::Black => 2,
        };
        if ep.rank() != target_rank {
            return false;
        }
        let captured = match us {
            Color::White => ep.index() - 8,
            Color::Black => ep.index() + 8,
        };

        !self.all_occupied.contains(ep)
            && self.pieces(Piece::Pawn, them).contains(Square::from_index(captured))
            && PAWN_ATTACKS[them.index()][ep.index()] & self.pieces(Piece::Pawn, us).0 != 0
    }

    /// Emit the position in FEN notation.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows: Vec<String> = Vec::new();
        for rank in (0..8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8 {
                if let Some((color, piece)) = self.piece_at(Square::new(rank, file)) {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(piece.to_fen_char(color));
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let active = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };

        let mut castling = String::new();
        if self.castling.as_u8() & CASTLE_WHITE_K != 0 {
            castling.push('K');
        }
        if self.castling.as_u8() & CASTLE_WHITE_Q != 0 {
            castling.push('Q');
        }
        if self.castling.as_u8() & CASTLE_BLACK_K != 0 {
            castling.push('k');
        }
        if self.castling.as_u8() & CASTLE_BLACK_Q != 0 {
            castling.push('q');
        }
        if castling.is_empty() {
            castling.push('-');
        }

        // The EP field is emitted only when the capture is actually possible,
        // which the stored target already guarantees.
        let ep = self
            .en_passant_target
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            rows.join("/"),
            active,
            castling,
            ep,
            self.halfmove_clock,
            self.fullmove_number()
        )
    }

    /// Parse a move in UCI long algebraic notation (e.g. "e2e4", "e7e8q").
    ///
    /// Castling arrives as the king's two-square move and en passant as a
    /// plain pawn capture; both are resolved by matching against the legal
    /// move list, which carries the flags.
    pub fn parse_uci_move(&self, uci: &str) -> Result<Move, MoveParseError> {
        let chars: Vec<char> = uci.chars().collect();
        if chars.len() < 4 || chars.len() > 5 {
            return Err(MoveParseError::InvalidLength { len: chars.len() });
        }

        if !('a'..='h').contains(&chars[0])
            || !('1'..='8').contains(&chars[1])
            || !('a'..='h').contains(&chars[2])
            || !('1'..='8').contains(&chars[3])
        {
            return Err(MoveParseError::InvalidSquare {
                notation: uci.to_string(),
            });
        }

        let from = Square::new(rank_to_index(chars[1]), file_to_index(chars[0]));
        let to = Square::new(rank_to_index(chars[3]), file_to_index(chars[2]));

        let promotion = if chars.len() == 5 {
            let piece = Piece::from_char(chars[4])
                .ok_or(MoveParseError::InvalidPromotion { char: chars[4] })?;
            if matches!(piece, Piece::Pawn | Piece::King) {
                return Err(MoveParseError::InvalidPromotion { char: chars[4] });
            }
            Some(piece)
        } else {
            None
        };

        self.legal_moves()
            .find(from, to, promotion)
            .ok_or(MoveParseError::IllegalMove {
                notation: uci.to_string(),
            })
    }

    /// Serialize the game so far as a UCI position command.
    ///
    /// The base position is the ancestor reached by walking back
    /// `min(game_ply, halfmove_clock)` plies (clamped to recorded history);
    /// the moves that lead from it to this position follow in order.
    #[must_use]
    pub fn to_uci_position(&self) -> String {
        let mut back = self.game_ply.min(self.halfmove_clock);
        let mut moves: Vec<Move> = Vec::new();
        let mut root: &Position = self;

        while back > 0 {
            let Some(prev) = root.parent.as_deref() else {
                break;
            };
            if let Some(m) = root.last_move {
                moves.push(m);
            }
            root = prev;
            back -= 1;
        }

        let mut out = format!("position fen {}", root.to_fen());
        if !moves.is_empty() {
            out.push_str(" moves");
            for m in moves.iter().rev() {
                out.push(' ');
                out.push_str(&m.to_string());
            }
        }
        out
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::try_from_fen(s)
    }
}
