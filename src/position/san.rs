//! Standard Algebraic Notation (SAN) support.
//!
//! Examples: "e4", "Nf3", "Bxc6+", "O-O", "e8=Q#".

use super::error::SanError;
use super::types::{Move, Piece, Square};
use super::Position;

impl Position {
    /// Format a legal move in Standard Algebraic Notation.
    #[must_use]
    pub fn move_to_san(&self, m: Move) -> String {
        let mut san = String::new();

        if m.is_castle() {
            san.push_str(if m.is_castle_kingside() { "O-O" } else { "O-O-O" });
        } else {
            let piece = self.piece_on(m.from()).unwrap_or(Piece::Pawn);
            let is_capture = self.piece_at(m.to()).is_some() || m.is_en_passant();

            if piece == Piece::Pawn {
                if is_capture {
                    san.push((b'a' + m.from().file() as u8) as char);
                }
            } else {
                san.push(piece.to_char().to_ascii_uppercase());
                let (need_file, need_rank) = self.disambiguation(m, piece);
                if need_file {
                    san.push((b'a' + m.from().file() as u8) as char);
                }
                if need_rank {
                    san.push((b'1' + m.from().rank() as u8) as char);
                }
            }

            if is_capture {
                san.push('x');
            }
            san.push_str(&m.to().to_string());

            if let Some(promo) = m.promotion() {
                san.push('=');
                san.push(promo.to_char().to_ascii_uppercase());
            }
        }

        let after = self.do_move(m);
        if after.is_checkmate() {
            san.push('#');
        } else if after.is_check() {
            san.push('+');
        }

        san
    }

    /// What the origin needs to be unambiguous among same-type moves to the
    /// same destination: unique file -> file letter, else unique rank -> rank
    /// digit, else the full origin square.
    fn disambiguation(&self, m: Move, piece: Piece) -> (bool, bool) {
        let mut file_clash = false;
        let mut rank_clash = false;
        let mut any = false;

        for other in self.legal_moves().iter() {
            if other.to() != m.to()
                || other.from() == m.from()
                || self.piece_on(other.from()) != Some(piece)
            {
                continue;
            }
            any = true;
            if other.from().file() == m.from().file() {
                file_clash = true;
            }
            if other.from().rank() == m.from().rank() {
                rank_clash = true;
            }
        }

        match (any, file_clash, rank_clash) {
            (false, _, _) => (false, false),
            (true, false, _) => (true, false),
            (true, true, false) => (false, true),
            (true, true, true) => (true, true),
        }
    }

    /// Parse a move in Standard Algebraic Notation.
    ///
    /// Accepts check and capture decorations ("+", "#", "x", "=") and both
    /// letter and digit castling spellings. The move must match exactly one
    /// legal move.
    pub fn parse_san(&self, san: &str) -> Result<Move, SanError> {
        let san = san.trim();
        if san.is_empty() {
            return Err(SanError::Empty);
        }

        // Castling is recognized by prefix, longest first.
        let stripped = san.trim_end_matches(['+', '#']);
        if stripped == "O-O-O" || stripped == "0-0-0" {
            return self.find_castling_move(false, san);
        }
        if stripped == "O-O" || stripped == "0-0" {
            return self.find_castling_move(true, san);
        }

        // Drop the decorations; what remains is piece letter, origin hints,
        // destination, and possibly a promotion letter.
        let mut chars: Vec<char> = san
            .chars()
            .filter(|c| !matches!(c, 'x' | 'X' | '+' | '#' | '=' | '-'))
            .collect();

        let promotion = match chars.last().copied() {
            Some(c) if chars.len() > 2 && matches!(c.to_ascii_uppercase(), 'N' | 'B' | 'R' | 'Q') =>
            {
                chars.pop();
                Some(Piece::from_char(c).ok_or(SanError::InvalidPromotion { char: c })?)
            }
            _ => None,
        };

        let piece = match chars.first().copied() {
            Some(c) if matches!(c, 'N' | 'B' | 'R' | 'Q' | 'K') => {
                chars.remove(0);
                Piece::from_char(c).ok_or(SanError::InvalidPiece { char: c })?
            }
            Some(_) => Piece::Pawn,
            None => return Err(SanError::Empty),
        };

        if chars.len() < 2 || chars.len() > 4 {
            return Err(SanError::InvalidSquare {
                notation: san.to_string(),
            });
        }

        // The last two characters name the destination.
        let rank_ch = chars.pop().expect("length checked");
        let file_ch = chars.pop().expect("length checked");
        if !('a'..='h').contains(&file_ch) || !('1'..='8').contains(&rank_ch) {
            return Err(SanError::InvalidSquare {
                notation: san.to_string(),
            });
        }
        let dest = Square::new(
            rank_ch as usize - '1' as usize,
            file_ch as usize - 'a' as usize,
        );

        // Whatever precedes constrains the origin file and/or rank.
        let mut from_file: Option<usize> = None;
        let mut from_rank: Option<usize> = None;
        for c in chars {
            match c {
                'a'..='h' => from_file = Some(c as usize - 'a' as usize),
                '1'..='8' => from_rank = Some(c as usize - '1' as usize),
                _ => {
                    return Err(SanError::InvalidSquare {
                        notation: san.to_string(),
                    })
                }
            }
        }

        let mut matched: Option<Move> = None;
        for &m in self.legal_moves().iter() {
            if m.to() != dest
                || m.is_castle()
                || self.piece_on(m.from()) != Some(piece)
                || m.promotion() != promotion
            {
                continue;
            }
            if from_file.is_some_and(|f| m.from().file() != f) {
                continue;
            }
            if from_rank.is_some_and(|r| m.from().rank() != r) {
                continue;
            }
            if matched.is_some() {
                return Err(SanError::AmbiguousMove {
                    san: san.to_string(),
                });
            }
            matched = Some(m);
        }

        matched.ok_or(SanError::NoMatchingMove {
            san: san.to_string(),
        })
    }

    fn find_castling_move(&self, kingside: bool, san: &str) -> Result<Move, SanError> {
        self.legal_moves()
            .iter()
            .copied()
            .find(|m| {
                if kingside {
                    m.is_castle_kingside()
                } else {
                    m.is_castle_queenside()
                }
            })
            .ok_or(SanError::NoMatchingMove {
                san: san.to_string(),
            })
    }
}
