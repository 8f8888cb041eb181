use thiserror::Error;

use crate::{
    coordinates::{CoordinatesError, Square},
    game::Status,
    move_gen::{attacks::attack_map, generation::legal_moves},
    piece::{Piece, PieceType},
    position::Position,
    r#move::{CastlingSide, Move},
};

/// Represents errors that can occur when parsing chess move notation.
#[derive(Error, Debug, PartialEq)]
pub enum NotationError {
    /// Error when the source square of the notation is invalid.
    #[error("Invalid source square: {0}")]
    InvalidFromSquare(CoordinatesError),

    /// Error when the destination square of the notation is invalid.
    #[error("Invalid destination square: {0}")]
    InvalidToSquare(CoordinatesError),

    /// Error when the overall notation format is incorrect.
    #[error("Invalid move notation: {0}")]
    InvalidNotation(String),
}

/// The rendering choices of the notation renderer.
///
/// The double-plus checkmate marker is a house style inherited from the game's original display;
/// callers preferring the conventional "#" can configure it here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotationStyle {
    pub check_suffix: String,
    pub checkmate_suffix: String,
}

impl Default for NotationStyle {
    fn default() -> Self {
        Self {
            check_suffix: "+".to_string(),
            checkmate_suffix: "++".to_string(),
        }
    }
}

/// Parses a move in coordinate notation ("e2e4") into its source and destination squares.
///
/// The squares are only syntactically validated; whether they describe a legal move is for the
/// game session to decide.
pub fn parse_coordinate_notation(notation: &str) -> Result<(Square, Square), NotationError> {
    if !notation.is_ascii() || notation.len() != 4 {
        return Err(NotationError::InvalidNotation(notation.to_string()));
    }
    let from = Square::try_from(&notation[0..2]).map_err(NotationError::InvalidFromSquare)?;
    let to = Square::try_from(&notation[2..4]).map_err(NotationError::InvalidToSquare)?;
    Ok((from, to))
}

/// Renders a move in standard algebraic notation.
///
/// # Parameters
/// * `before` - The position the move was played from.
/// * `mv` - The applied move.
/// * `after` - The resulting position, used for the promotion piece.
/// * `status` - The status of the resulting position, used for the check and mate suffixes.
/// * `style` - The suffix configuration.
///
/// Castling renders as the fixed "0-0" and "0-0-0" tokens. Other moves are disambiguated against
/// every same-type, same-color piece that could legally reach the same destination: none means no
/// disambiguator, a candidate sharing the origin's rank selects the origin file, one sharing the
/// origin's file selects the origin rank, and anything else spells out the full origin square.
pub fn standard_algebraic(
    before: &Position,
    mv: &Move,
    after: &Position,
    status: Status,
    style: &NotationStyle,
) -> String {
    if let Some(side) = mv.castling_side() {
        return match side {
            CastlingSide::Kingside => "0-0".to_string(),
            CastlingSide::Queenside => "0-0-0".to_string(),
        };
    }

    let Some(piece) = before[mv.from_square()] else {
        // A move rendered against the wrong position; fall back to coordinates.
        return mv.to_string();
    };

    let suffix = match status {
        Status::Check => style.check_suffix.as_str(),
        Status::Checkmate => style.checkmate_suffix.as_str(),
        _ => "",
    };

    let mut base = String::new();
    if mv.is_capture() {
        base.push('x');
    }
    base.push_str(&mv.to_square().to_string());

    if piece.piece_type() == PieceType::Pawn {
        let mut rendered = String::new();
        if mv.is_capture() {
            rendered.push_str(&mv.from_square().file().to_string());
        }
        rendered.push_str(&base);
        if let Some(promoted) = after[mv.to_square()] {
            if promoted.piece_type() != PieceType::Pawn {
                rendered.push('=');
                rendered.push(char::from(promoted.piece_type()));
            }
        }
        rendered.push_str(suffix);
        return rendered;
    }

    format!(
        "{}{}{}{}",
        char::from(piece.piece_type()),
        disambiguator(before, mv, piece),
        base,
        suffix
    )
}

/// Computes the disambiguator of a non-pawn move: which part of the origin square must be spelled
/// out so that no other piece of the same type could be the mover.
fn disambiguator(before: &Position, mv: &Move, piece: Piece) -> String {
    let board = before.board();
    let enemy_attacks = attack_map(board, piece.color().opposite());
    let mut duplicate = false;
    let mut shares_rank = false;
    let mut shares_file = false;

    for (square, other) in board.pieces(piece.color()) {
        if square == mv.from_square() || other != piece {
            continue;
        }
        let reaches = legal_moves(
            board,
            square,
            before.en_passant_square(),
            before.castling_rights(),
            Some(&enemy_attacks),
        )
        .iter()
        .any(|candidate| candidate.to_square() == mv.to_square());
        if reaches {
            duplicate = true;
            shares_rank |= square.rank() == mv.from_square().rank();
            shares_file |= square.file() == mv.from_square().file();
        }
    }

    if !duplicate {
        String::new()
    } else if shares_rank && !shares_file {
        mv.from_square().file().to_string()
    } else if shares_file && !shares_rank {
        mv.from_square().rank().to_string()
    } else {
        mv.from_square().to_string()
    }
}
