use std::fmt::Display;

use thiserror::Error;

use crate::{
    coordinates::{Rank, Square},
    move_gen::{attacks::attack_map, generation::legal_moves},
    notation::{standard_algebraic, NotationStyle},
    piece::{Color, Piece, PieceType},
    position::{FenError, Position},
    r#move::Move,
    repetition::RepetitionTracker,
};

/// The classification of a position for the side to move.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    Normal,
    Check,
    Checkmate,
    Stalemate,
}

impl Display for Status {
    /// Formats the status with the labels the rendering layer consumes.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Normal => write!(f, "normal"),
            Status::Check => write!(f, "check"),
            Status::Checkmate => write!(f, "checkmate"),
            Status::Stalemate => write!(f, "stalemate"),
        }
    }
}

/// Errors of the game session.
#[derive(Error, Debug, PartialEq)]
pub enum GameError {
    /// The FEN string of a load could not be decoded; the session keeps its prior state.
    #[error("Invalid FEN string: {0}")]
    Fen(#[from] FenError),

    /// The side to move has no king on the board. This cannot arise from valid play, but FEN
    /// accepts arbitrary piece placements, so it is reported rather than crashing or returning
    /// wrong legality results.
    #[error("The {0} king is missing from the board")]
    MissingKing(Color),

    /// The move is not in the legal move list of its origin square.
    #[error("Illegal move from {from} to {to}")]
    IllegalMove { from: Square, to: Square },

    /// `cycle_promotion` was called with no promotion pending.
    #[error("There is no pending promotion to cycle")]
    NoPendingPromotion,

    /// `undo` was called on an empty history.
    #[error("There is no move to undo")]
    EmptyHistory,
}

/// One applied move of the game: the position it was played from, the move itself, and its
/// rendering in standard algebraic notation.
#[derive(Clone)]
pub struct HistoryEntry {
    position: Position,
    mv: Move,
    san: String,
}

impl HistoryEntry {
    /// Returns the position the move was played from.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Returns the applied move.
    pub fn mv(&self) -> &Move {
        &self.mv
    }

    /// Returns the move in standard algebraic notation.
    pub fn san(&self) -> &str {
        &self.san
    }
}

/// A chess game session.
///
/// The session owns everything the core rules need across moves: the current position, the
/// history of applied moves, and the repetition tracker. Rules computations themselves are pure;
/// the session calls them after every change and caches their results, so a rendering layer can
/// read the per-square legal moves and the status without computing anything itself.
#[derive(Clone)]
pub struct Game {
    position: Position,
    history: Vec<HistoryEntry>,
    repetitions: RepetitionTracker,
    legal: [Vec<Move>; Square::COUNT],
    status: Status,
    pending_promotion: Option<Square>,
    style: NotationStyle,
}

impl Game {
    /// Creates a session on the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Position::new())
            .expect("the starting position is always classifiable")
    }

    /// Creates a session on a position decoded from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        Self::from_position(Position::from_fen(fen)?)
    }

    fn from_position(position: Position) -> Result<Self, GameError> {
        let mut repetitions = RepetitionTracker::new();
        repetitions.record(&position);
        let mut game = Game {
            position,
            history: Vec::new(),
            repetitions,
            legal: std::array::from_fn(|_| Vec::new()),
            status: Status::Normal,
            pending_promotion: None,
            style: NotationStyle::default(),
        };
        game.refresh()?;
        Ok(game)
    }

    /// Replaces the notation style used to render the moves of this session.
    pub fn set_notation_style(&mut self, style: NotationStyle) {
        self.style = style;
    }

    /// Returns the current position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Returns the status of the current position.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Returns the legal moves of the piece standing on a square. Squares without a piece of the
    /// side to move have an empty list.
    pub fn legal_moves(&self, square: Square) -> &[Move] {
        &self.legal[usize::from(square)]
    }

    /// Returns the total number of legal moves of the side to move.
    pub fn legal_move_count(&self) -> usize {
        self.legal.iter().map(Vec::len).sum()
    }

    /// Returns the legal move going from one square to another, when one exists.
    pub fn find_move(&self, from: Square, to: Square) -> Option<Move> {
        self.legal[usize::from(from)]
            .iter()
            .find(|mv| mv.to_square() == to)
            .copied()
    }

    /// Returns the applied moves of the game.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Returns the square of a freshly promoted pawn whose promotion piece can still be cycled.
    pub fn pending_promotion(&self) -> Option<Square> {
        self.pending_promotion
    }

    /// Returns how many times the current layout has occurred in the game.
    pub fn repetition_count(&self) -> u32 {
        self.repetitions.count(&self.position)
    }

    /// Applies a legal move and advances the session.
    ///
    /// The move must come from the legal move list of its origin square; anything else is refused
    /// with `IllegalMove` and the session is left untouched. Applying a move finalizes any pending
    /// promotion. The new position is recorded in the repetition tracker, the status and legal
    /// move lists are recomputed, and the move is appended to the history with its notation.
    pub fn play(&mut self, mv: &Move) -> Result<(), GameError> {
        let from = mv.from_square();
        if !self.legal[usize::from(from)].contains(mv) {
            return Err(GameError::IllegalMove {
                from,
                to: mv.to_square(),
            });
        }

        self.pending_promotion = None;
        let before = self.position.clone();
        let moving = before[from];

        if let Some(piece) = moving {
            if piece.piece_type() == PieceType::Pawn
                && mv.to_square().rank() == Rank::R8.relative_to_color(piece.color())
            {
                self.pending_promotion = Some(mv.to_square());
            }
        }

        self.position = before.apply(mv);
        self.repetitions.record(&self.position);
        self.history.push(HistoryEntry {
            position: before,
            mv: *mv,
            san: String::new(),
        });
        let refreshed = self.refresh();
        // The notation needs the resulting status for its suffix, so the entry is patched once
        // the new position is classified.
        self.rewrite_last_san();
        refreshed
    }

    /// Cycles the promotion piece of the last move through Queen, Rook, Bishop and Knight.
    ///
    /// The default promotion piece is a queen; calling this repeatedly before the next
    /// interaction rotates through the other choices. The repetition tracker, the status, the
    /// legal move lists and the recorded notation all follow the cycled piece.
    pub fn cycle_promotion(&mut self) -> Result<PieceType, GameError> {
        let square = self
            .pending_promotion
            .ok_or(GameError::NoPendingPromotion)?;
        let piece = self.position[square].ok_or(GameError::NoPendingPromotion)?;
        let promoted = next_promotion_type(piece.piece_type());

        self.repetitions.forget(&self.position);
        self.position
            .put_piece(Piece::new(piece.color(), promoted), square);
        self.repetitions.record(&self.position);
        let refreshed = self.refresh();
        self.rewrite_last_san();
        refreshed.map(|_| promoted)
    }

    /// Takes back the last applied move.
    ///
    /// Undo is symmetric with `play`: the occurrence the move recorded is removed from the
    /// repetition tracker and the prior position is restored, so that apply-then-undo is a strict
    /// identity on both.
    pub fn undo(&mut self) -> Result<(), GameError> {
        let entry = self.history.pop().ok_or(GameError::EmptyHistory)?;
        self.repetitions.forget(&self.position);
        self.position = entry.position;
        self.pending_promotion = None;
        self.refresh()
    }

    /// Resets the session to the standard starting position, clearing the history and the
    /// repetition tracker.
    pub fn reset(&mut self) {
        let style = self.style.clone();
        let mut game = Game::new();
        game.style = style;
        *self = game;
    }

    /// Replaces the session with a position decoded from a FEN string.
    ///
    /// On a decode failure the session keeps its prior state unchanged.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), GameError> {
        let mut game = Game::from_fen(fen)?;
        game.style = self.style.clone();
        *self = game;
        Ok(())
    }

    /// Recomputes the cached legal move lists and the status of the current position.
    fn refresh(&mut self) -> Result<(), GameError> {
        let side = self.position.side_to_move();
        let enemy_attacks = attack_map(self.position.board(), side.opposite());
        let king = self
            .position
            .board()
            .king_square(side)
            .ok_or(GameError::MissingKing(side))?;

        let mut any_move = false;
        for square in Square::ALL_SQUARES {
            let moves = match self.position[square] {
                Some(piece) if piece.color() == side => legal_moves(
                    self.position.board(),
                    square,
                    self.position.en_passant_square(),
                    self.position.castling_rights(),
                    Some(&enemy_attacks),
                ),
                _ => Vec::new(),
            };
            any_move |= !moves.is_empty();
            self.legal[usize::from(square)] = moves;
        }

        // Draw overrides: a third occurrence of the layout or two bare kings leave no progress
        // to make. Both empty every move list and classify as stalemate even when moves would
        // otherwise exist.
        let bare_kings = self.position.board().piece_count() == 2
            && self
                .position
                .board()
                .king_square(side.opposite())
                .is_some();
        if bare_kings || self.repetitions.count(&self.position) >= 3 {
            for moves in self.legal.iter_mut() {
                moves.clear();
            }
            self.status = Status::Stalemate;
            return Ok(());
        }

        self.status = match (enemy_attacks.get(king), any_move) {
            (true, false) => Status::Checkmate,
            (true, true) => Status::Check,
            (false, false) => Status::Stalemate,
            (false, true) => Status::Normal,
        };
        Ok(())
    }

    /// Re-renders the notation of the last history entry against the current position and status.
    fn rewrite_last_san(&mut self) {
        let san = self.history.last().map(|entry| {
            standard_algebraic(
                &entry.position,
                &entry.mv,
                &self.position,
                self.status,
                &self.style,
            )
        });
        if let Some(san) = san {
            if let Some(entry) = self.history.last_mut() {
                entry.san = san;
            }
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// The promotion cycling order: Queen, then Rook, Bishop, Knight, and back to Queen.
fn next_promotion_type(piece_type: PieceType) -> PieceType {
    match piece_type {
        PieceType::Queen => PieceType::Rook,
        PieceType::Rook => PieceType::Bishop,
        PieceType::Bishop => PieceType::Knight,
        _ => PieceType::Queen,
    }
}
