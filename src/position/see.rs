//! Static Exchange Evaluation (SEE).
//!
//! Evaluates the capture sequence on a single square to estimate whether an
//! exchange wins, loses, or breaks even in material.

use super::attack_tables::{bishop_attacks, rook_attacks};
use super::types::{bit_for_square, Bitboard, Color, Piece, Square};
use super::Position;

/// Exchange values; the king is worth more than any realistic material swing.
const SEE_VALUES: [i32; 6] = [1, 3, 3, 5, 9, 100];

impl Position {
    /// Static exchange evaluation of a capture from `from` to `to`.
    ///
    /// Returns the expected material balance of the full exchange sequence on
    /// `to`, in pawn units, from the perspective of the side to move.
    /// Returns 0 when `to` is not a capture target.
    #[must_use]
    pub fn see(&self, from: Square, to: Square) -> i32 {
        let victim = match self.piece_on(to) {
            Some(piece) => piece,
            None if self.en_passant_target == Some(to) => Piece::Pawn,
            None => return 0,
        };
        let Some((_, attacker)) = self.piece_at(from) else {
            return 0;
        };

        const MAX_EXCHANGES: usize = 32;
        let mut swap = [0i32; MAX_EXCHANGES];
        swap[0] = SEE_VALUES[victim.index()];

        // Remove the first attacker, then rescan so X-ray attackers behind it
        // join the exchange.
        let mut occ = Bitboard(self.all_occupied.0 ^ bit_for_square(from).0);
        let mut attackers = Bitboard(self.attackers_to(to, occ).0 & occ.0);

        let diag_sliders = self.diagonal_sliders();
        let straight_sliders = self.straight_sliders();

        let mut side = self.side_to_move.opponent();
        let mut last_capturer = attacker;
        let mut n = 1;

        loop {
            let side_attackers = Bitboard(attackers.0 & self.occupancy(side).0);
            if side_attackers.is_empty() || n >= MAX_EXCHANGES {
                break;
            }

            swap[n] = -swap[n - 1] + SEE_VALUES[last_capturer.index()];

            let (piece, piece_bb) = self.least_valuable_attacker(side_attackers, side);
            occ.0 ^= piece_bb.0;
            attackers.0 &= occ.0;

            // Uncovered X-ray attackers slide into the exchange.
            attackers.0 |= bishop_attacks(to.index(), occ.0) & diag_sliders & occ.0;
            attackers.0 |= rook_attacks(to.index(), occ.0) & straight_sliders & occ.0;

            side = side.opponent();
            last_capturer = piece;
            n += 1;

            // A "capture" by the king into remaining defenders is illegal;
            // score it as losing the king and stop.
            if piece == Piece::King
                && attackers.0 & self.occupancy(side).0 != 0
                && n < MAX_EXCHANGES
            {
                swap[n] = SEE_VALUES[Piece::King.index()];
                n += 1;
                break;
            }
        }

        while n > 1 {
            n -= 1;
            swap[n - 1] = (-swap[n]).min(swap[n - 1]);
        }
        swap[0]
    }

    /// The least valuable piece of `side` among `candidates`, as a singleton
    /// bitboard together with its type.
    fn least_valuable_attacker(&self, candidates: Bitboard, side: Color) -> (Piece, Bitboard) {
        for piece_idx in 0..6 {
            let piece = Piece::from_index(piece_idx);
            let subset = candidates.0 & self.pieces(piece, side).0;
            if subset != 0 {
                return (piece, Bitboard(subset & subset.wrapping_neg()));
            }
        }
        // Candidates are always drawn from this side's pieces.
        unreachable!("attacker set out of sync with piece bitboards")
    }
}
