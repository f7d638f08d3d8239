//! Fluent builder for constructing positions piece by piece.
//!
//! Handy for tests and tooling where writing a FEN string is clumsier than
//! naming the handful of pieces involved.
//!
//! # Example
//! ```
//! use chess_position::{Color, Piece, PositionBuilder, Square};
//!
//! let pos = PositionBuilder::new()
//!     .piece(Square::new(0, 4), Color::White, Piece::King)
//!     .piece(Square::new(7, 4), Color::Black, Piece::King)
//!     .piece(Square::new(1, 0), Color::White, Piece::Pawn)
//!     .build();
//! assert_eq!(pos.to_fen(), "4k3/8/8/8/8/8/P7/4K3 w - - 0 1");
//! ```

use super::types::{CastlingRights, Color, Piece, Square};
use super::Position;

/// A fluent builder for `Position` values.
#[derive(Clone, Debug)]
pub struct PositionBuilder {
    pieces: Vec<(Square, Color, Piece)>,
    side_to_move: Option<Color>,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Default for PositionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionBuilder {
    /// An empty builder: no pieces, White to move, no rights.
    #[must_use]
    pub fn new() -> Self {
        PositionBuilder {
            pieces: Vec::new(),
            side_to_move: None,
            castling: CastlingRights::none(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Place a piece, replacing whatever was on the square.
    #[must_use]
    pub fn piece(mut self, square: Square, color: Color, piece: Piece) -> Self {
        self.pieces.retain(|(sq, _, _)| *sq != square);
        self.pieces.push((square, color, piece));
        self
    }

    /// Clear a square.
    #[must_use]
    pub fn clear(mut self, square: Square) -> Self {
        self.pieces.retain(|(sq, _, _)| *sq != square);
        self
    }

    /// Set the side to move.
    #[must_use]
    pub fn side_to_move(mut self, color: Color) -> Self {
        self.side_to_move = Some(color);
        self
    }

    /// Set castling rights wholesale.
    #[must_use]
    pub fn castling(mut self, rights: CastlingRights) -> Self {
        self.castling = rights;
        self
    }

    /// Grant one castling right.
    #[must_use]
    pub fn castle(mut self, color: Color, kingside: bool) -> Self {
        self.castling.set(color, kingside);
        self
    }

    /// Set the en passant target square.
    ///
    /// Kept only if a pawn of the side to move can actually capture there.
    #[must_use]
    pub fn en_passant(mut self, target: Square) -> Self {
        self.en_passant = Some(target);
        self
    }

    /// Set the halfmove clock.
    #[must_use]
    pub fn halfmove_clock(mut self, clock: u32) -> Self {
        self.halfmove_clock = clock;
        self
    }

    /// Set the fullmove number.
    #[must_use]
    pub fn fullmove_number(mut self, number: u32) -> Self {
        self.fullmove_number = number.max(1);
        self
    }

    /// Freeze the builder into a position.
    ///
    /// # Panics
    /// Panics if either side is missing a king; every other field is taken
    /// as given.
    #[must_use]
    pub fn build(self) -> Position {
        let mut pos = Position::bare();

        for (square, color, piece) in self.pieces {
            pos.set_piece(square, color, piece);
        }

        assert!(
            pos.pieces(Piece::King, Color::White).is_single()
                && pos.pieces(Piece::King, Color::Black).is_single(),
            "PositionBuilder::build requires exactly one king per side"
        );

        pos.side_to_move = self.side_to_move.unwrap_or(Color::White);
        pos.castling = self.castling;
        pos.halfmove_clock = self.halfmove_clock;
        pos.game_ply = 2 * (self.fullmove_number - 1)
            + u32::from(pos.side_to_move == Color::Black);

        if let Some(ep) = self.en_passant {
            if pos.en_passant_is_capturable(ep) {
                pos.en_passant_target = Some(ep);
            }
        }
        pos.refresh();

        pos
    }
}
