use crate::{
    coordinates::{File, Rank, Square},
    piece::{Color, Piece, PieceType},
    position::Board,
    r#move::{CastlingRight, CastlingSide, Move},
};

use super::attacks::{attack_map, AttackMap};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Generates the pseudo-legal moves of the piece standing on `from`.
///
/// A pseudo-legal move obeys the movement rules of the piece but may still leave the mover's own
/// king in check; `filter_king_safety` turns the list into legal moves.
///
/// The optional parameters carry the position context:
/// * `en_passant` - the en passant target square, when one exists.
/// * `castling` - the castling rights still held; pass `CastlingRight::empty()` to generate
///   without castling.
/// * `attacks` - the opponent's attack map. When supplied, king destinations and castling paths
///   through attacked squares are excluded. When absent the generator is in attack-only mode:
///   pawn diagonals are emitted unconditionally, because attack computation needs "could capture"
///   rather than "currently can". The attack map builder itself calls this function without a
///   map, which is what keeps check detection from recursing.
///
/// Returns an empty list for an empty square.
pub fn pseudo_legal_moves(
    board: &Board,
    from: Square,
    en_passant: Option<Square>,
    castling: CastlingRight,
    attacks: Option<&AttackMap>,
) -> Vec<Move> {
    let Some(piece) = board[from] else {
        return Vec::new();
    };

    let mut moves = Vec::new();
    let color = piece.color();
    match piece.piece_type() {
        PieceType::Pawn => pawn_moves(board, from, color, en_passant, attacks, &mut moves),
        PieceType::Knight => step_moves(board, from, color, &KNIGHT_OFFSETS, &mut moves),
        PieceType::King => king_moves(board, from, color, castling, attacks, &mut moves),
        PieceType::Bishop => ray_moves(board, from, color, &BISHOP_DIRECTIONS, &mut moves),
        PieceType::Rook => ray_moves(board, from, color, &ROOK_DIRECTIONS, &mut moves),
        PieceType::Queen => ray_moves(board, from, color, &QUEEN_DIRECTIONS, &mut moves),
    }
    moves
}

/// Keeps only the moves that do not leave the mover's own king attacked.
///
/// Every candidate is simulated on a fresh scratch copy of the board, then the opponent's attack
/// map is recomputed over the result. A side whose king is absent from the board has every move
/// rejected. The input order is preserved.
pub fn filter_king_safety(board: &Board, moves: Vec<Move>) -> Vec<Move> {
    moves
        .into_iter()
        .filter(|mv| {
            let Some(piece) = board[mv.from_square()] else {
                return false;
            };
            let mut scratch = board.clone();
            scratch.make_move(mv);
            let enemy_attacks = attack_map(&scratch, piece.color().opposite());
            match scratch.king_square(piece.color()) {
                Some(king) => !enemy_attacks.get(king),
                None => false,
            }
        })
        .collect()
}

/// Generates the legal moves of the piece standing on `from`: pseudo-legal generation followed by
/// the king-safety filter.
pub fn legal_moves(
    board: &Board,
    from: Square,
    en_passant: Option<Square>,
    castling: CastlingRight,
    attacks: Option<&AttackMap>,
) -> Vec<Move> {
    filter_king_safety(
        board,
        pseudo_legal_moves(board, from, en_passant, castling, attacks),
    )
}

fn pawn_moves(
    board: &Board,
    from: Square,
    color: Color,
    en_passant: Option<Square>,
    attacks: Option<&AttackMap>,
    moves: &mut Vec<Move>,
) {
    let direction: i8 = match color {
        Color::White => 1,
        Color::Black => -1,
    };

    // A pawn on the last rank has no forward square; it would have promoted already.
    let Some(one_forward) = from.offset(0, direction) else {
        return;
    };

    if board[one_forward].is_none() {
        moves.push(Move::new_quiet(from, one_forward));
        if from.rank() == Rank::R2.relative_to_color(color) {
            if let Some(two_forward) = one_forward.offset(0, direction) {
                if board[two_forward].is_none() {
                    moves.push(Move::new_quiet(from, two_forward));
                }
            }
        }
    }

    for file_delta in [-1i8, 1] {
        let Some(to) = from.offset(file_delta, direction) else {
            continue;
        };
        match board[to] {
            Some(victim) if victim.color() != color => {
                moves.push(Move::new_capture(from, to, victim, to));
            }
            _ => {
                if attacks.is_none() {
                    moves.push(Move::new_quiet(from, to));
                }
            }
        }
    }

    if let Some(target) = en_passant {
        let file_distance =
            (u8::from(target.file()) as i8 - u8::from(from.file()) as i8).abs();
        if file_distance == 1 && target.rank() == one_forward.rank() {
            let victim_square = Square::new(target.file(), from.rank());
            if let Some(victim) = board[victim_square] {
                if victim.color() != color && victim.piece_type() == PieceType::Pawn {
                    moves.push(Move::new_capture(from, target, victim, victim_square));
                }
            }
        }
    }
}

/// Generates the fixed-offset moves of knights and kings, filtered only by same-color occupancy.
fn step_moves(
    board: &Board,
    from: Square,
    color: Color,
    offsets: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(file_delta, rank_delta) in offsets {
        let Some(to) = from.offset(file_delta, rank_delta) else {
            continue;
        };
        match board[to] {
            Some(occupant) if occupant.color() == color => {}
            Some(victim) => moves.push(Move::new_capture(from, to, victim, to)),
            None => moves.push(Move::new_quiet(from, to)),
        }
    }
}

/// Generates the ray moves of sliders: empty squares are quiet moves, the first occupied square
/// yields a capture if it holds an opposing piece and terminates the ray either way.
fn ray_moves(
    board: &Board,
    from: Square,
    color: Color,
    directions: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(file_delta, rank_delta) in directions {
        let mut current = from;
        while let Some(to) = current.offset(file_delta, rank_delta) {
            match board[to] {
                None => {
                    moves.push(Move::new_quiet(from, to));
                    current = to;
                }
                Some(occupant) => {
                    if occupant.color() != color {
                        moves.push(Move::new_capture(from, to, occupant, to));
                    }
                    break;
                }
            }
        }
    }
}

fn king_moves(
    board: &Board,
    from: Square,
    color: Color,
    castling: CastlingRight,
    attacks: Option<&AttackMap>,
    moves: &mut Vec<Move>,
) {
    let mut steps = Vec::new();
    step_moves(board, from, color, &KING_OFFSETS, &mut steps);
    if let Some(map) = attacks {
        steps.retain(|mv| !map.get(mv.to_square()));
    }
    moves.append(&mut steps);
    castle_moves(board, from, color, castling, attacks, moves);
}

fn castle_moves(
    board: &Board,
    from: Square,
    color: Color,
    castling: CastlingRight,
    attacks: Option<&AttackMap>,
    moves: &mut Vec<Move>,
) {
    let rank = Rank::R1.relative_to_color(color);
    // A displaced king cannot castle, whatever the rights field claims.
    if from != Square::new(File::E, rank) {
        return;
    }
    let rook = Piece::new(color, PieceType::Rook);

    if castling.contains(CastlingRight::new(color, CastlingSide::Kingside)) {
        let rook_from = Square::new(File::H, rank);
        let f_square = Square::new(File::F, rank);
        let g_square = Square::new(File::G, rank);
        if board[rook_from] == Some(rook)
            && board[f_square].is_none()
            && board[g_square].is_none()
            && attacks.map_or(true, |map| {
                !map.get(from) && !map.get(f_square) && !map.get(g_square)
            })
        {
            moves.push(Move::new_castle(
                from,
                g_square,
                CastlingSide::Kingside,
                rook_from,
                f_square,
            ));
        }
    }

    if castling.contains(CastlingRight::new(color, CastlingSide::Queenside)) {
        let rook_from = Square::new(File::A, rank);
        let b_square = Square::new(File::B, rank);
        let c_square = Square::new(File::C, rank);
        let d_square = Square::new(File::D, rank);
        if board[rook_from] == Some(rook)
            && board[b_square].is_none()
            && board[c_square].is_none()
            && board[d_square].is_none()
            && attacks.map_or(true, |map| {
                !map.get(from) && !map.get(d_square) && !map.get(c_square)
            })
        {
            moves.push(Move::new_castle(
                from,
                c_square,
                CastlingSide::Queenside,
                rook_from,
                d_square,
            ));
        }
    }
}
