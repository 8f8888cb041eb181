use std::fmt::Display;
use std::ops::Index;

use thiserror::Error;

use crate::{
    coordinates::{File, Rank, Square},
    piece::{Color, Piece, PieceType},
    r#move::{CastlingRight, Move, MoveKind},
};

/// The FEN string of the standard starting position.
pub const STARTING_POSITION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Error type for parsing a FEN (Forsyth-Edwards Notation) string.
#[derive(Error, Debug, PartialEq)]
pub enum FenError {
    #[error("Invalid piece placement field")]
    InvalidPiecePlacement,

    #[error("Invalid active color field")]
    InvalidActiveColor,

    #[error("Invalid castling availability field")]
    InvalidCastlingAvailability,

    #[error("Invalid en passant square field")]
    InvalidEnPassantSquare,

    #[error("Invalid halfmove clock field")]
    InvalidHalfmoveClock,

    #[error("Invalid fullmove number field")]
    InvalidFullmoveNumber,

    #[error("Missing field in FEN string")]
    MissingField,

    #[error("Unexpected extra field in FEN string")]
    ExtraField,
}

//======================================================================================================================
// Board implementation
//======================================================================================================================

/// The 8x8 piece grid of a position.
///
/// The board is a plain mailbox: one `Option<Piece>` per square. The legality filter clones it to
/// simulate candidate moves, so the type stays small and `Clone` stays cheap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; Square::COUNT],
}

impl Board {
    /// Creates an empty board.
    pub fn empty() -> Self {
        Self {
            squares: [None; Square::COUNT],
        }
    }

    /// Puts a piece on a square, replacing whatever was there.
    pub fn put_piece(&mut self, piece: Piece, square: Square) {
        self.squares[usize::from(square)] = Some(piece);
    }

    /// Removes and returns the piece on a square.
    pub fn remove_piece(&mut self, square: Square) -> Option<Piece> {
        self.squares[usize::from(square)].take()
    }

    /// Relocates the content of `from` onto `to`, leaving `from` empty.
    pub fn move_piece(&mut self, from: Square, to: Square) {
        self.squares[usize::from(to)] = self.squares[usize::from(from)].take();
    }

    /// Applies a move mechanically: the captured piece is removed, the rook of a castling move is
    /// relocated, and the moving piece is relocated. No rights or clock bookkeeping happens here;
    /// this is exactly the board mutation the legality filter needs to simulate a candidate.
    pub fn make_move(&mut self, mv: &Move) {
        match mv.kind() {
            MoveKind::Quiet => {}
            MoveKind::Capture { square, .. } => {
                self.remove_piece(square);
            }
            MoveKind::Castle {
                rook_from, rook_to, ..
            } => {
                self.move_piece(rook_from, rook_to);
            }
        }
        self.move_piece(mv.from_square(), mv.to_square());
    }

    /// Returns the square of the king of a color, or `None` when that king is absent.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king = Piece::new(color, PieceType::King);
        Square::ALL_SQUARES
            .into_iter()
            .find(|&square| self[square] == Some(king))
    }

    /// Returns the number of pieces on the board.
    pub fn piece_count(&self) -> usize {
        self.squares.iter().filter(|square| square.is_some()).count()
    }

    /// Iterates over the squares occupied by pieces of a color.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::ALL_SQUARES
            .into_iter()
            .filter_map(move |square| match self[square] {
                Some(piece) if piece.color() == color => Some((square, piece)),
                _ => None,
            })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Index<Square> for Board {
    type Output = Option<Piece>;

    fn index(&self, index: Square) -> &Self::Output {
        &self.squares[usize::from(index)]
    }
}

//======================================================================================================================
// Position implementation
//======================================================================================================================

/// A chess position.
///
/// A position is a self-describing snapshot: board, side to move, castling rights, en passant
/// target and the two move counters. Everything needed to generate legal moves is here, except
/// the cross-position history used for threefold repetition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    board: Board,
    side_to_move: Color,
    castling_rights: CastlingRight,
    en_passant_square: Option<Square>,
    halfmove_clock: u16,
    fullmove_number: u16,
}

impl Position {
    fn read_piece_placement(&mut self, piece_placement: &str) -> Result<(), FenError> {
        let rows: Vec<&str> = piece_placement.split('/').collect();
        if rows.len() != Rank::COUNT {
            return Err(FenError::InvalidPiecePlacement);
        }

        for (row_index, row) in rows.iter().enumerate() {
            let rank = Rank::from(Rank::R8 as u8 - row_index as u8);
            let mut file = 0u8;
            for c in row.chars() {
                if let Some(run_length) = c.to_digit(10) {
                    if !(1..=8).contains(&run_length) {
                        return Err(FenError::InvalidPiecePlacement);
                    }
                    file += run_length as u8;
                } else {
                    let piece = Piece::try_from(c).map_err(|_| FenError::InvalidPiecePlacement)?;
                    if file >= File::COUNT as u8 {
                        return Err(FenError::InvalidPiecePlacement);
                    }
                    self.board.put_piece(piece, Square::new(File::from(file), rank));
                    file += 1;
                }
                if file > File::COUNT as u8 {
                    return Err(FenError::InvalidPiecePlacement);
                }
            }
            if file != File::COUNT as u8 {
                return Err(FenError::InvalidPiecePlacement);
            }
        }
        Ok(())
    }

    fn read_active_color(&mut self, active_color: &str) -> Result<(), FenError> {
        self.side_to_move = match active_color {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(FenError::InvalidActiveColor),
        };
        Ok(())
    }

    fn read_castling(&mut self, castling_availability: &str) -> Result<(), FenError> {
        if castling_availability == "-" {
            self.castling_rights = CastlingRight::empty();
            return Ok(());
        }
        if castling_availability.is_empty() {
            return Err(FenError::InvalidCastlingAvailability);
        }

        for c in castling_availability.chars() {
            let right = match c {
                'K' => CastlingRight::WHITE_KINGSIDE,
                'Q' => CastlingRight::WHITE_QUEENSIDE,
                'k' => CastlingRight::BLACK_KINGSIDE,
                'q' => CastlingRight::BLACK_QUEENSIDE,
                _ => return Err(FenError::InvalidCastlingAvailability),
            };
            self.castling_rights |= right;
        }
        Ok(())
    }

    fn read_en_passant_square(&mut self, en_passant_square: &str) -> Result<(), FenError> {
        self.en_passant_square = match en_passant_square {
            "-" => None,
            _ => Some(
                Square::try_from(en_passant_square)
                    .map_err(|_| FenError::InvalidEnPassantSquare)?,
            ),
        };
        Ok(())
    }

    /// Creates a new chess position from a FEN (Forsyth-Edwards Notation) string.
    ///
    /// A FEN string contains 6 fields separated by spaces:
    ///
    /// 1. Piece placement: Each rank is described from 8 to 1, separated by '/'. Letters represent
    ///    pieces (P=pawn, N=knight, B=bishop, R=rook, Q=queen, K=king). Uppercase is white,
    ///    lowercase is black. Digits represent runs of empty squares. Each rank must describe
    ///    exactly 8 columns.
    ///
    /// 2. Active color: "w" means White moves next, "b" means Black moves next.
    ///
    /// 3. Castling availability: Combination of "K" (white kingside), "Q" (white queenside),
    ///    "k" (black kingside), "q" (black queenside), or "-" if no castling is possible.
    ///
    /// 4. En passant target square: The square a double-pushed pawn passed over, in algebraic
    ///    notation (e.g., "e3"), or "-" if not available.
    ///
    /// 5. Halfmove clock: Number of halfmoves since the last pawn advance or piece capture.
    ///
    /// 6. Fullmove number: The number of complete moves. Starts at 1 and increments after Black's
    ///    move.
    ///
    /// Any malformed field is a decode failure: no position is produced and no partial state is
    /// exposed.
    ///
    /// # See also
    /// [The PGN specifications](https://ia902908.us.archive.org/26/items/pgn-standard-1994-03-12/PGN_standard_1994-03-12.txt)
    /// that defines the FEN format at section 16.1.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut position = Position::default();

        let mut fields = fen.split_whitespace();
        position.read_piece_placement(fields.next().ok_or(FenError::MissingField)?)?;
        position.read_active_color(fields.next().ok_or(FenError::MissingField)?)?;
        position.read_castling(fields.next().ok_or(FenError::MissingField)?)?;
        position.read_en_passant_square(fields.next().ok_or(FenError::MissingField)?)?;

        position.halfmove_clock = fields
            .next()
            .ok_or(FenError::MissingField)?
            .parse()
            .map_err(|_| FenError::InvalidHalfmoveClock)?;

        position.fullmove_number = fields
            .next()
            .ok_or(FenError::MissingField)?
            .parse()
            .map_err(|_| FenError::InvalidFullmoveNumber)?;

        if fields.next().is_some() {
            return Err(FenError::ExtraField);
        }

        Ok(position)
    }

    /// Creates a new chess position with the initial board setup.
    pub fn new() -> Self {
        Self::from_fen(STARTING_POSITION)
            .expect("the starting position FEN will always be successfully parsed")
    }

    fn piece_placement(&self) -> String {
        let mut placement = String::new();
        for row_index in 0..Rank::COUNT as u8 {
            let rank = Rank::from(Rank::R8 as u8 - row_index);
            if row_index > 0 {
                placement.push('/');
            }
            let mut empty_run = 0;
            for file in File::ALL_FILES {
                match self.board[Square::new(file, rank)] {
                    Some(piece) => {
                        if empty_run > 0 {
                            placement.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        placement.push(char::from(piece));
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                placement.push_str(&empty_run.to_string());
            }
        }
        placement
    }

    /// Returns the subset of the position that affects future legality: piece placement, side to
    /// move, castling rights and en passant target. Two positions with equal signatures are
    /// interchangeable for the rest of the game, which makes the signature the key of the
    /// repetition tracker.
    pub fn layout_signature(&self) -> String {
        let en_passant = match self.en_passant_square {
            Some(square) => square.to_string(),
            None => "-".to_string(),
        };
        let side = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };
        format!(
            "{} {} {} {}",
            self.piece_placement(),
            side,
            self.castling_rights,
            en_passant
        )
    }

    /// Encodes the position as a FEN string.
    ///
    /// Encoding is the exact inverse of `from_fen`: for every well-formed position `p`,
    /// `Position::from_fen(&p.to_fen())` is structurally equal to `p`.
    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {}",
            self.layout_signature(),
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Returns the board of the position.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the color of the side to move.
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Returns the castling rights still held in the position.
    pub fn castling_rights(&self) -> CastlingRight {
        self.castling_rights
    }

    /// Returns the en passant target square of the position.
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    /// Returns the number of halfmoves since the last pawn advance or capture.
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    /// Returns the fullmove number of the position.
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Puts a piece on a square of the position, replacing whatever was there.
    pub fn put_piece(&mut self, piece: Piece, square: Square) {
        self.board.put_piece(piece, square);
    }

    /// Produces the successor position of a legal move.
    ///
    /// The piece is relocated, the captured piece removed, the rook of a castling move relocated,
    /// and a pawn reaching the last rank is promoted to a queen (the session layer can cycle the
    /// promotion piece afterwards). Castling rights, the en passant target, both counters and the
    /// side to move are updated.
    ///
    /// No validation is performed here: the caller must have obtained the move from the legality
    /// filter for this position and side.
    pub fn apply(&self, mv: &Move) -> Position {
        let mut next = self.clone();
        let moving = self.board[mv.from_square()];

        next.board.make_move(mv);

        let mut pawn_move = false;
        if let Some(piece) = moving {
            if piece.piece_type() == PieceType::Pawn {
                pawn_move = true;
                if mv.to_square().rank() == Rank::R8.relative_to_color(piece.color()) {
                    next.board
                        .put_piece(Piece::new(piece.color(), PieceType::Queen), mv.to_square());
                }
            }
        }

        // A right dies as soon as its king or rook origin square is vacated or captured on.
        next.castling_rights
            .remove(castling_rights_mask(mv.from_square()) | castling_rights_mask(mv.to_square()));

        next.en_passant_square = match moving {
            Some(piece)
                if piece.piece_type() == PieceType::Pawn
                    && (u8::from(mv.from_square().rank()) as i8
                        - u8::from(mv.to_square().rank()) as i8)
                        .abs()
                        == 2 =>
            {
                let passed_over = Rank::from(
                    (u8::from(mv.from_square().rank()) + u8::from(mv.to_square().rank())) / 2,
                );
                Some(Square::new(mv.from_square().file(), passed_over))
            }
            _ => None,
        };

        next.halfmove_clock = if pawn_move || mv.is_capture() {
            0
        } else {
            self.halfmove_clock + 1
        };

        if self.side_to_move == Color::Black {
            next.fullmove_number = self.fullmove_number + 1;
        }

        next.side_to_move = self.side_to_move.opposite();
        next
    }
}

/// Returns the castling rights tied to a square: the rights a side loses when that square is
/// vacated or captured on.
fn castling_rights_mask(square: Square) -> CastlingRight {
    match square {
        Square::E1 => CastlingRight::both(Color::White),
        Square::A1 => CastlingRight::WHITE_QUEENSIDE,
        Square::H1 => CastlingRight::WHITE_KINGSIDE,
        Square::E8 => CastlingRight::both(Color::Black),
        Square::A8 => CastlingRight::BLACK_QUEENSIDE,
        Square::H8 => CastlingRight::BLACK_KINGSIDE,
        _ => CastlingRight::empty(),
    }
}

impl Default for Position {
    fn default() -> Self {
        Self {
            board: Board::empty(),
            side_to_move: Color::White,
            castling_rights: CastlingRight::empty(),
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }
}

impl Index<Square> for Position {
    type Output = Option<Piece>;

    fn index(&self, index: Square) -> &Self::Output {
        &self.board[index]
    }
}

impl Display for Position {
    /// Formats the position as an 8x8 character grid with the side to move below it.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row_index in 0..Rank::COUNT as u8 {
            let rank = Rank::from(Rank::R8 as u8 - row_index);
            write!(f, "{} ", rank)?;
            for file in File::ALL_FILES {
                match self.board[Square::new(file, rank)] {
                    Some(piece) => write!(f, " {}", char::from(piece))?,
                    None => write!(f, " .")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h")?;
        write!(f, "{} to move", self.side_to_move)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod board_tests {
        use super::*;

        #[test]
        fn test_put_remove_and_move_piece() {
            let mut board = Board::empty();
            board.put_piece(Piece::WHITE_QUEEN, Square::E4);
            assert_eq!(board[Square::E4], Some(Piece::WHITE_QUEEN));

            board.move_piece(Square::E4, Square::E8);
            assert_eq!(board[Square::E4], None);
            assert_eq!(board[Square::E8], Some(Piece::WHITE_QUEEN));

            assert_eq!(board.remove_piece(Square::E8), Some(Piece::WHITE_QUEEN));
            assert_eq!(board[Square::E8], None);
        }

        #[test]
        fn test_king_square() {
            let position = Position::new();
            assert_eq!(position.board().king_square(Color::White), Some(Square::E1));
            assert_eq!(position.board().king_square(Color::Black), Some(Square::E8));
            assert_eq!(Board::empty().king_square(Color::White), None);
        }

        #[test]
        fn test_piece_count() {
            assert_eq!(Position::new().board().piece_count(), 32);
            assert_eq!(Board::empty().piece_count(), 0);
        }

        #[test]
        fn test_make_move_en_passant_removes_the_passed_pawn() {
            let position =
                Position::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3")
                    .unwrap();
            let mut board = position.board().clone();
            let mv = Move::new_capture(Square::E5, Square::F6, Piece::BLACK_PAWN, Square::F5);
            board.make_move(&mv);
            assert_eq!(board[Square::F6], Some(Piece::WHITE_PAWN));
            assert_eq!(board[Square::F5], None);
            assert_eq!(board[Square::E5], None);
        }
    }

    mod fen_tests {
        use super::*;

        #[test]
        fn test_new_initial_position() {
            let position = Position::new();

            assert_eq!(position[Square::A1], Some(Piece::WHITE_ROOK));
            assert_eq!(position[Square::B1], Some(Piece::WHITE_KNIGHT));
            assert_eq!(position[Square::C1], Some(Piece::WHITE_BISHOP));
            assert_eq!(position[Square::D1], Some(Piece::WHITE_QUEEN));
            assert_eq!(position[Square::E1], Some(Piece::WHITE_KING));
            assert_eq!(position[Square::F1], Some(Piece::WHITE_BISHOP));
            assert_eq!(position[Square::G1], Some(Piece::WHITE_KNIGHT));
            assert_eq!(position[Square::H1], Some(Piece::WHITE_ROOK));

            for file in File::ALL_FILES {
                assert_eq!(position[Square::new(file, Rank::R2)], Some(Piece::WHITE_PAWN));
                assert_eq!(position[Square::new(file, Rank::R7)], Some(Piece::BLACK_PAWN));
            }

            for rank in Rank::ALL_RANKS[2..6].iter() {
                for file in File::ALL_FILES {
                    assert_eq!(position[Square::new(file, *rank)], None);
                }
            }

            assert_eq!(position[Square::E8], Some(Piece::BLACK_KING));
            assert_eq!(position.side_to_move(), Color::White);
            assert_eq!(position.castling_rights(), CastlingRight::all());
            assert_eq!(position.en_passant_square(), None);
            assert_eq!(position.halfmove_clock(), 0);
            assert_eq!(position.fullmove_number(), 1);
        }

        #[test]
        fn test_from_fen_black_to_play() {
            let position =
                Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
                    .unwrap();
            assert_eq!(position.side_to_move(), Color::Black);
            assert_eq!(position.en_passant_square(), Some(Square::E3));
        }

        #[test]
        fn test_from_fen_partial_castling_rights() {
            let position =
                Position::from_fen("1nbqkbnr/rppppppp/p7/8/8/7P/PPPPPPPR/RNBQKBN1 w Qk - 2 3")
                    .unwrap();
            assert_eq!(
                position.castling_rights(),
                CastlingRight::BLACK_KINGSIDE | CastlingRight::WHITE_QUEENSIDE
            );
        }

        #[test]
        fn test_from_fen_wrong_field_count() {
            assert_eq!(
                Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -"),
                Err(FenError::MissingField)
            );
            assert_eq!(
                Position::from_fen(
                    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 extra"
                ),
                Err(FenError::ExtraField)
            );
        }

        #[test]
        fn test_from_fen_bad_piece_placement() {
            // Wrong number of rows
            assert_eq!(
                Position::from_fen("8/8/8/8/8/8/8 w - - 0 1"),
                Err(FenError::InvalidPiecePlacement)
            );
            // A row summing to less than 8 columns
            assert_eq!(
                Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPP/RNBQKBNR w KQkq - 0 1"),
                Err(FenError::InvalidPiecePlacement)
            );
            // A row summing to more than 8 columns
            assert_eq!(
                Position::from_fen("rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
                Err(FenError::InvalidPiecePlacement)
            );
            // An unrecognized character
            assert_eq!(
                Position::from_fen("rnbqkbnr/ppppXppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
                Err(FenError::InvalidPiecePlacement)
            );
            // A zero run length
            assert_eq!(
                Position::from_fen("rnbqkbnr/pppppppp/80/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
                Err(FenError::InvalidPiecePlacement)
            );
        }

        #[test]
        fn test_from_fen_bad_active_color() {
            assert_eq!(
                Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1"),
                Err(FenError::InvalidActiveColor)
            );
        }

        #[test]
        fn test_from_fen_bad_castling() {
            assert_eq!(
                Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KX - 0 1"),
                Err(FenError::InvalidCastlingAvailability)
            );
        }

        #[test]
        fn test_from_fen_bad_en_passant() {
            assert_eq!(
                Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e9 0 1"),
                Err(FenError::InvalidEnPassantSquare)
            );
            assert_eq!(
                Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq z3 0 1"),
                Err(FenError::InvalidEnPassantSquare)
            );
        }

        #[test]
        fn test_from_fen_bad_counters() {
            assert_eq!(
                Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - x 1"),
                Err(FenError::InvalidHalfmoveClock)
            );
            assert_eq!(
                Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 -1"),
                Err(FenError::InvalidFullmoveNumber)
            );
        }

        #[test]
        fn test_round_trip() {
            let fens = [
                STARTING_POSITION,
                "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
                "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 4 10",
                "8/8/8/8/8/4k3/8/4K3 w - - 12 56",
                "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1",
            ];
            for fen in fens {
                let position = Position::from_fen(fen).unwrap();
                assert_eq!(position.to_fen(), fen);
                assert_eq!(Position::from_fen(&position.to_fen()).unwrap(), position);
            }
        }

        #[test]
        fn test_layout_signature_excludes_counters() {
            let first =
                Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
                    .unwrap();
            let second =
                Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 4 3")
                    .unwrap();
            assert_eq!(first.layout_signature(), second.layout_signature());
            assert_ne!(first.to_fen(), second.to_fen());
        }
    }

    mod apply_tests {
        use super::*;
        use crate::r#move::CastlingSide;

        #[test]
        fn test_apply_quiet_move() {
            let position = Position::new();
            let next = position.apply(&Move::new_quiet(Square::G1, Square::F3));

            assert_eq!(next[Square::G1], None);
            assert_eq!(next[Square::F3], Some(Piece::WHITE_KNIGHT));
            assert_eq!(next.side_to_move(), Color::Black);
            assert_eq!(next.halfmove_clock(), 1);
            assert_eq!(next.fullmove_number(), 1);
            assert_eq!(next.en_passant_square(), None);
            // The original position is untouched.
            assert_eq!(position[Square::G1], Some(Piece::WHITE_KNIGHT));
        }

        #[test]
        fn test_apply_double_push_sets_en_passant_target() {
            let position = Position::new();
            let next = position.apply(&Move::new_quiet(Square::E2, Square::E4));
            assert_eq!(next.en_passant_square(), Some(Square::E3));
            assert_eq!(next.halfmove_clock(), 0);

            let after_reply = next.apply(&Move::new_quiet(Square::G8, Square::F6));
            assert_eq!(after_reply.en_passant_square(), None);
            assert_eq!(after_reply.fullmove_number(), 2);
        }

        #[test]
        fn test_apply_capture_resets_halfmove_clock() {
            let position =
                Position::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2")
                    .unwrap();
            let mv = Move::new_capture(Square::E4, Square::D5, Piece::BLACK_PAWN, Square::D5);
            let next = position.apply(&mv);
            assert_eq!(next[Square::D5], Some(Piece::WHITE_PAWN));
            assert_eq!(next.halfmove_clock(), 0);
        }

        #[test]
        fn test_apply_castle_moves_the_rook() {
            let position =
                Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
            let mv = Move::new_castle(
                Square::E1,
                Square::G1,
                CastlingSide::Kingside,
                Square::H1,
                Square::F1,
            );
            let next = position.apply(&mv);
            assert_eq!(next[Square::G1], Some(Piece::WHITE_KING));
            assert_eq!(next[Square::F1], Some(Piece::WHITE_ROOK));
            assert_eq!(next[Square::E1], None);
            assert_eq!(next[Square::H1], None);
            assert_eq!(next.castling_rights(), CastlingRight::both(Color::Black));
        }

        #[test]
        fn test_apply_king_move_loses_both_rights() {
            let position =
                Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
            let next = position.apply(&Move::new_quiet(Square::E1, Square::D1));
            assert_eq!(next.castling_rights(), CastlingRight::both(Color::Black));
        }

        #[test]
        fn test_apply_rook_move_loses_one_right() {
            let position =
                Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
            let next = position.apply(&Move::new_quiet(Square::A1, Square::B1));
            assert_eq!(
                next.castling_rights(),
                CastlingRight::WHITE_KINGSIDE | CastlingRight::both(Color::Black)
            );
        }

        #[test]
        fn test_apply_rook_captured_on_origin_loses_the_right() {
            let position = Position::from_fen("r3k3/8/8/8/8/8/8/4K2B w q - 0 1").unwrap();
            let mv = Move::new_capture(Square::H1, Square::A8, Piece::BLACK_ROOK, Square::A8);
            let next = position.apply(&mv);
            assert_eq!(next.castling_rights(), CastlingRight::empty());
        }

        #[test]
        fn test_apply_promotes_to_queen_by_default() {
            let position = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
            let next = position.apply(&Move::new_quiet(Square::A7, Square::A8));
            assert_eq!(next[Square::A8], Some(Piece::WHITE_QUEEN));
            assert_eq!(next.halfmove_clock(), 0);
        }
    }
}
