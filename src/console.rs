use std::io::{self, BufRead, Write};

use crate::{
    coordinates::Square,
    game::Game,
    notation::parse_coordinate_notation,
};

/// Entry point for the interactive console front end.
///
/// The console is a rendering layer over the game session: it prints the board, the status label
/// and the move history, and routes the user's input to the session's entry points. It computes
/// no legality or status itself.
///
/// The loop runs until a "quit" command or the end of standard input.
pub fn run_console(game: Game) -> io::Result<()> {
    let console = Console { game };
    console.run()
}

struct Console {
    game: Game,
}

impl Console {
    fn run(mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut out = io::stdout();

        self.print_state(&mut out)?;
        writeln!(out, "Type \"help\" for the command list.")?;

        for line in stdin.lock().lines() {
            let line = line?;
            let command = line.trim();
            if command.is_empty() {
                continue;
            }
            if command == "quit" || command == "exit" {
                break;
            }
            self.handle_command(command, &mut out)?;
        }
        Ok(())
    }

    fn handle_command(&mut self, command: &str, out: &mut impl Write) -> io::Result<()> {
        match command {
            "help" => self.print_help(out),
            "fen" => writeln!(out, "{}", self.game.position().to_fen()),
            "board" => self.print_state(out),
            "history" => self.print_history(out),
            "moves" => self.print_all_moves(out),
            "undo" => match self.game.undo() {
                Ok(()) => self.print_state(out),
                Err(error) => writeln!(out, "error: {error}"),
            },
            "reset" => {
                self.game.reset();
                self.print_state(out)
            }
            "cycle" => match self.game.cycle_promotion() {
                Ok(piece_type) => {
                    writeln!(out, "promotion piece is now a {piece_type}")?;
                    self.print_state(out)
                }
                Err(error) => writeln!(out, "error: {error}"),
            },
            _ => {
                if let Some(fen) = command.strip_prefix("load ") {
                    return match self.game.load_fen(fen.trim()) {
                        Ok(()) => self.print_state(out),
                        Err(error) => writeln!(out, "error: {error}"),
                    };
                }
                if let Some(square) = command.strip_prefix("moves ") {
                    return self.print_square_moves(square.trim(), out);
                }
                self.play_coordinate_move(command, out)
            }
        }
    }

    fn play_coordinate_move(&mut self, command: &str, out: &mut impl Write) -> io::Result<()> {
        let (from, to) = match parse_coordinate_notation(command) {
            Ok(squares) => squares,
            Err(error) => return writeln!(out, "error: {error}"),
        };
        let Some(mv) = self.game.find_move(from, to) else {
            return writeln!(out, "error: {from}{to} is not a legal move");
        };
        match self.game.play(&mv) {
            Ok(()) => {
                if let Some(entry) = self.game.history().last() {
                    writeln!(out, "played {}", entry.san())?;
                }
                if self.game.pending_promotion().is_some() {
                    writeln!(out, "promoted to a queen; type \"cycle\" for another piece")?;
                }
                self.print_state(out)
            }
            Err(error) => writeln!(out, "error: {error}"),
        }
    }

    fn print_state(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "{}", self.game.position())?;
        writeln!(out, "status: {}", self.game.status())
    }

    fn print_help(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "commands:")?;
        writeln!(out, "  e2e4        play a move in coordinate notation")?;
        writeln!(out, "  moves [sq]  list the legal moves, optionally of one square")?;
        writeln!(out, "  cycle       change the promotion piece of the last move")?;
        writeln!(out, "  undo        take back the last move")?;
        writeln!(out, "  history     show the game in algebraic notation")?;
        writeln!(out, "  fen         print the position as a FEN string")?;
        writeln!(out, "  load <fen>  replace the position")?;
        writeln!(out, "  board       reprint the board")?;
        writeln!(out, "  reset       start a new game")?;
        writeln!(out, "  quit        leave")
    }

    fn print_history(&self, out: &mut impl Write) -> io::Result<()> {
        if self.game.history().is_empty() {
            return writeln!(out, "no move has been played");
        }
        for (index, pair) in self.game.history().chunks(2).enumerate() {
            let white = pair[0].san();
            match pair.get(1) {
                Some(entry) => writeln!(out, "{}. {} {}", index + 1, white, entry.san())?,
                None => writeln!(out, "{}. {}", index + 1, white)?,
            }
        }
        Ok(())
    }

    fn print_all_moves(&self, out: &mut impl Write) -> io::Result<()> {
        let mut any = false;
        for square in Square::ALL_SQUARES {
            let moves = self.game.legal_moves(square);
            if moves.is_empty() {
                continue;
            }
            any = true;
            let rendered: Vec<String> = moves.iter().map(|mv| mv.to_string()).collect();
            writeln!(out, "{}: {}", square, rendered.join(" "))?;
        }
        if !any {
            writeln!(out, "no legal move")?;
        }
        Ok(())
    }

    fn print_square_moves(&self, square: &str, out: &mut impl Write) -> io::Result<()> {
        let square = match Square::try_from(square) {
            Ok(square) => square,
            Err(error) => return writeln!(out, "error: {error}"),
        };
        let moves = self.game.legal_moves(square);
        if moves.is_empty() {
            return writeln!(out, "no legal move from {square}");
        }
        let rendered: Vec<String> = moves.iter().map(|mv| mv.to_string()).collect();
        writeln!(out, "{}: {}", square, rendered.join(" "))
    }
}
