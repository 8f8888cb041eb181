use std::fmt::Display;

use bitflags::bitflags;

use crate::{
    coordinates::Square,
    piece::{Color, Piece},
};

/// Represents both sides a king can castle towards.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CastlingSide {
    Kingside = 0,
    Queenside = 1,
}

impl CastlingSide {
    /// Number of castling sides.
    pub const COUNT: usize = 2;

    /// Represents both castling sides.
    pub const ALL_SIDES: [CastlingSide; CastlingSide::COUNT] =
        [CastlingSide::Kingside, CastlingSide::Queenside];
}

bitflags! {
    /// The set of castling rights still held in a position.
    ///
    /// Each of the four rights is an independent flag, so the usual set operations of `bitflags`
    /// can be used to combine, test and remove them.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct CastlingRight: u8 {
        const WHITE_KINGSIDE = 0b0001;
        const WHITE_QUEENSIDE = 0b0010;
        const BLACK_KINGSIDE = 0b0100;
        const BLACK_QUEENSIDE = 0b1000;
    }
}

impl CastlingRight {
    /// Creates the right for a given color and castling side.
    pub fn new(color: Color, side: CastlingSide) -> Self {
        match (color, side) {
            (Color::White, CastlingSide::Kingside) => CastlingRight::WHITE_KINGSIDE,
            (Color::White, CastlingSide::Queenside) => CastlingRight::WHITE_QUEENSIDE,
            (Color::Black, CastlingSide::Kingside) => CastlingRight::BLACK_KINGSIDE,
            (Color::Black, CastlingSide::Queenside) => CastlingRight::BLACK_QUEENSIDE,
        }
    }

    /// Returns both rights of a color.
    pub fn both(color: Color) -> Self {
        CastlingRight::new(color, CastlingSide::Kingside)
            | CastlingRight::new(color, CastlingSide::Queenside)
    }
}

impl Display for CastlingRight {
    /// Formats the rights with the FEN letters, or "-" when no right is held.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        if self.contains(CastlingRight::WHITE_KINGSIDE) {
            write!(f, "K")?;
        }
        if self.contains(CastlingRight::WHITE_QUEENSIDE) {
            write!(f, "Q")?;
        }
        if self.contains(CastlingRight::BLACK_KINGSIDE) {
            write!(f, "k")?;
        }
        if self.contains(CastlingRight::BLACK_QUEENSIDE) {
            write!(f, "q")?;
        }
        Ok(())
    }
}

/// The variant of a move, carrying only the data relevant to that variant.
///
/// A capture records the captured piece and the square it stands on, which differs from the
/// destination square only for an en passant capture. A castling move records the rook's origin
/// and destination; the king's squares are carried by the `Move` itself.
///
/// Promotion is not a variant: a pawn reaching the last rank promotes when the move is applied,
/// and the promotion piece can be changed afterwards through the game session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveKind {
    Quiet,
    Capture {
        victim: Piece,
        square: Square,
    },
    Castle {
        side: CastlingSide,
        rook_from: Square,
        rook_to: Square,
    },
}

/// Represents a move in a chess game.
///
/// A move produced by the generator is pseudo-legal; it becomes legal only once it has passed the
/// king-safety filter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Move {
    from: Square,
    to: Square,
    kind: MoveKind,
}

impl Move {
    /// Creates a new quiet move.
    pub fn new_quiet(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            kind: MoveKind::Quiet,
        }
    }

    /// Creates a new capture of `victim` standing on `victim_square`.
    pub fn new_capture(from: Square, to: Square, victim: Piece, victim_square: Square) -> Self {
        Self {
            from,
            to,
            kind: MoveKind::Capture {
                victim,
                square: victim_square,
            },
        }
    }

    /// Creates a new castling move.
    pub fn new_castle(
        from: Square,
        to: Square,
        side: CastlingSide,
        rook_from: Square,
        rook_to: Square,
    ) -> Self {
        Self {
            from,
            to,
            kind: MoveKind::Castle {
                side,
                rook_from,
                rook_to,
            },
        }
    }

    /// Returns the origin square of the move.
    pub fn from_square(&self) -> Square {
        self.from
    }

    /// Returns the destination square of the move.
    pub fn to_square(&self) -> Square {
        self.to
    }

    /// Returns the variant of the move.
    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    /// Returns true if the move captures a piece.
    pub fn is_capture(&self) -> bool {
        matches!(self.kind, MoveKind::Capture { .. })
    }

    /// Returns the castling side of the move, or `None` for a non-castling move.
    pub fn castling_side(&self) -> Option<CastlingSide> {
        match self.kind {
            MoveKind::Castle { side, .. } => Some(side),
            _ => None,
        }
    }
}

impl Display for Move {
    /// Formats the move in coordinate notation, for example "e2e4".
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}
