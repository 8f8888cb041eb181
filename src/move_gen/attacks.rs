use crate::{
    coordinates::Square,
    piece::{Color, PieceType},
    position::Board,
    r#move::CastlingRight,
};

use super::generation::pseudo_legal_moves;

/// The set of squares a side can move a piece onto, ignoring its own king safety.
///
/// This is the reachability grid used for check detection and for restricting king moves and
/// castling paths. A pawn's forward pushes are not part of it since they never threaten.
#[derive(Clone, PartialEq, Eq)]
pub struct AttackMap {
    attacked: [bool; Square::COUNT],
}

impl AttackMap {
    /// Creates an attack map with no attacked square.
    pub fn empty() -> Self {
        Self {
            attacked: [false; Square::COUNT],
        }
    }

    /// Returns true if the square is attacked.
    pub fn get(&self, square: Square) -> bool {
        self.attacked[usize::from(square)]
    }

    fn set(&mut self, square: Square) {
        self.attacked[usize::from(square)] = true;
    }
}

/// Computes the attack map of a side over a board.
///
/// Every piece of the attacking side is run through the move generator in attack-only mode: no en
/// passant target, no castling rights and no attack map are supplied, so the generator reports raw
/// reachability and never recurses back into this function. Pawn destinations on the pawn's own
/// file are the non-threatening forward pushes and are excluded.
pub fn attack_map(board: &Board, attacker: Color) -> AttackMap {
    let mut map = AttackMap::empty();
    for (square, piece) in board.pieces(attacker) {
        let moves = pseudo_legal_moves(board, square, None, CastlingRight::empty(), None);
        for mv in moves {
            if piece.piece_type() == PieceType::Pawn && mv.to_square().file() == square.file() {
                continue;
            }
            map.set(mv.to_square());
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    #[test]
    fn test_pawn_forward_square_is_not_attacked() {
        let position = Position::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        let map = attack_map(position.board(), Color::White);

        assert!(!map.get(Square::E3));
        assert!(!map.get(Square::E4));
        assert!(map.get(Square::D3));
        assert!(map.get(Square::F3));
    }

    #[test]
    fn test_pawn_diagonal_is_attacked_even_when_empty() {
        let position = Position::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        let map = attack_map(position.board(), Color::White);
        // No piece stands on d3 or f3; the squares are still threatened.
        assert!(map.get(Square::D3));
        assert!(map.get(Square::F3));
    }

    #[test]
    fn test_defended_own_piece_square_is_attacked() {
        // The knight on c3 is defended by the b2 pawn, so c3 counts as attacked by White.
        let position = Position::from_fen("4k3/8/8/8/8/2N5/1P6/4K3 w - - 0 1").unwrap();
        let map = attack_map(position.board(), Color::White);
        assert!(map.get(Square::C3));
    }

    #[test]
    fn test_knight_attacks() {
        let position = Position::from_fen("4k3/8/8/8/4N3/8/8/4K3 w - - 0 1").unwrap();
        let map = attack_map(position.board(), Color::White);
        for square in [
            Square::D6,
            Square::F6,
            Square::C5,
            Square::G5,
            Square::C3,
            Square::G3,
            Square::D2,
            Square::F2,
        ] {
            assert!(map.get(square), "{square} should be attacked");
        }
        assert!(!map.get(Square::E5));
    }

    #[test]
    fn test_slider_attacks_stop_at_blockers() {
        let position = Position::from_fen("4k3/8/8/8/1R2p3/8/8/4K3 w - - 0 1").unwrap();
        let map = attack_map(position.board(), Color::White);
        assert!(map.get(Square::C4));
        assert!(map.get(Square::D4));
        // The pawn itself can be captured, squares behind it cannot be reached.
        assert!(map.get(Square::E4));
        assert!(!map.get(Square::F4));
    }

    #[test]
    fn test_king_contributes_to_the_attack_map() {
        let position = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let map = attack_map(position.board(), Color::White);
        assert!(map.get(Square::D1));
        assert!(map.get(Square::D2));
        assert!(map.get(Square::E2));
        assert!(map.get(Square::F2));
        assert!(map.get(Square::F1));
        assert!(!map.get(Square::E1));
    }
}
