use clap::Parser;
use ferrite::{
    config::get_config,
    console::run_console,
    coordinates::Square,
    game::Game,
};
use thiserror::Error;

#[derive(Error, Debug)]
enum FerriteError {
    #[error("Configuration error: {0}")]
    Config(#[from] ferrite::config::ConfigError),

    #[error("{0}")]
    Game(#[from] ferrite::game::GameError),

    #[error("Input error: {0}")]
    Io(#[from] std::io::Error),
}

mod arguments {
    use std::path::PathBuf;

    use clap::{Parser, Subcommand};

    /// A chess rules engine with a small console front end
    #[derive(Parser)]
    #[command(
        name = "ferrite",
        version = "0.1.0",
        about = "A chess rules engine with a small console front end",
        subcommand_negates_reqs = true // This allows the user to run the program without any subcommands
    )]
    pub struct FerriteArgs {
        /// Path to an optional configuration file
        #[arg(short, long)]
        pub config: Option<PathBuf>,

        #[command(subcommand)]
        pub command: Option<Commands>,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Commands {
        /// Play an interactive game in the terminal (default command)
        Play {
            /// FEN string of the position to start from
            #[arg(short, long)]
            fen: Option<String>,
        },

        /// List the legal moves of a position in algebraic notation
        Moves {
            /// FEN string of the position
            #[arg(short, long, default_value = ferrite::position::STARTING_POSITION)]
            fen: String,
        },

        /// Classify a position as normal, check, checkmate or stalemate
        Status {
            /// FEN string of the position
            #[arg(short, long, default_value = ferrite::position::STARTING_POSITION)]
            fen: String,
        },
    }
}

fn new_game(fen: Option<&str>) -> Result<Game, FerriteError> {
    let mut game = match fen {
        Some(fen) => Game::from_fen(fen)?,
        None => Game::new(),
    };
    game.set_notation_style(get_config().notation_style());
    Ok(game)
}

/// Prints every legal move of the side to move, rendered in algebraic notation by replaying each
/// one on a copy of the session.
fn print_moves(game: &Game) {
    for square in Square::ALL_SQUARES {
        for mv in game.legal_moves(square) {
            let mut preview = game.clone();
            let san = match preview.play(mv) {
                Ok(()) => preview
                    .history()
                    .last()
                    .map(|entry| entry.san().to_string())
                    .unwrap_or_default(),
                Err(_) => continue,
            };
            println!("{mv}  {san}");
        }
    }
}

fn run() -> Result<(), FerriteError> {
    // Parse command line arguments
    let args = arguments::FerriteArgs::parse();

    // Initialize the configuration
    ferrite::config::initialize(args.config)?;

    // Run the command
    match args.command.unwrap_or(arguments::Commands::Play { fen: None }) {
        arguments::Commands::Play { fen } => {
            let game = new_game(fen.as_deref())?;
            run_console(game)?;
        }
        arguments::Commands::Moves { fen } => {
            let game = new_game(Some(&fen))?;
            print_moves(&game);
        }
        arguments::Commands::Status { fen } => {
            let game = new_game(Some(&fen))?;
            println!("{}", game.status());
        }
    }

    Ok(())
}

/// Main entry point for the ferrite binary.
fn main() {
    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
