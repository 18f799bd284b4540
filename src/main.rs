use std::io::{self, BufRead, Write};

use clap::Parser;

use chesskit::ai::opponent::{Opponent, Strength};
use chesskit::ai::uci::{EngineError, MoveSearch};
use chesskit::config::AppConfig;
use chesskit::engine::game::{Game, MoveOutcome};
use chesskit::engine::types::{ChessError, Color, PieceKind, Square};
use chesskit::view::GameSnapshot;

/// Play chess in the terminal against a UCI engine.
#[derive(Debug, Parser)]
#[command(name = "chesskit", version)]
struct Cli {
    /// Opponent strength: easy, medium or hard.
    #[arg(long)]
    strength: Option<Strength>,

    /// Path to the UCI engine binary.
    #[arg(long)]
    engine_path: Option<String>,

    /// Two human players, no engine.
    #[arg(long)]
    two_player: bool,

    /// Print the game state as JSON after every move.
    #[arg(long)]
    json: bool,
}

/// Backend used when no engine is available; every query falls through to
/// the opponent's random picker.
struct NoSearch;

impl MoveSearch for NoSearch {
    fn best_move(&mut self, _position: &str) -> Result<Option<String>, EngineError> {
        Ok(None)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chesskit=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    let strength = cli.strength.unwrap_or(config.default_strength);
    let engine_path = cli.engine_path.unwrap_or(config.engine_path);

    let mut opponent = if cli.two_player {
        None
    } else {
        Some(match Opponent::with_engine(&engine_path, strength) {
            Ok(opp) => opp,
            Err(err) => {
                tracing::warn!(%err, path = %engine_path, "engine unavailable, moves will be random");
                Opponent::new(Box::new(NoSearch))
            }
        })
    };

    let mut game = Game::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("chesskit v{}", env!("CARGO_PKG_VERSION"));
    println!("Enter moves in coordinate notation (e2e4), 'moves e2' to list, 'quit' to leave.");
    show(&game, cli.json);

    while !game.status().is_game_over() {
        print!("{}> ", color_name(game.turn()));
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let input = line?;
        let input = input.trim();

        match input {
            "" => continue,
            "quit" | "exit" => break,
            _ if input.starts_with("moves ") => {
                list_moves(&mut game, &input[6..]);
                continue;
            }
            _ => {}
        }

        match game.play_coordinate_move(input) {
            Ok(MoveOutcome::PromotionPending { .. }) => {
                let kind = ask_promotion(&mut lines)?;
                if let Err(err) = game.resolve_promotion(kind) {
                    println!("{err}");
                    continue;
                }
            }
            Ok(MoveOutcome::Played(_)) => {}
            Err(err) => {
                println!("{err}");
                continue;
            }
        }
        show(&game, cli.json);

        if game.status().is_game_over() {
            break;
        }

        if let Some(opp) = opponent.as_mut() {
            match opp.choose_move(&mut game) {
                Ok(mv) => println!("engine plays {mv}"),
                Err(err) => {
                    println!("{err}");
                    break;
                }
            }
            show(&game, cli.json);
        }
    }

    match game.status() {
        s if s.is_game_over() => {
            println!("Checkmate. {} wins.", color_name(!game.turn()));
        }
        _ => println!("Goodbye."),
    }
    Ok(())
}

fn show(game: &Game, json: bool) {
    if json {
        match serde_json::to_string(&GameSnapshot::of(game)) {
            Ok(s) => println!("{s}"),
            Err(err) => println!("snapshot error: {err}"),
        }
    } else {
        println!("{}", game.board());
        if game.status() == chesskit::GameStatus::Check {
            println!("{} is in check.", color_name(game.turn()));
        }
    }
}

fn list_moves(game: &mut Game, square: &str) {
    let Some(sq) = Square::from_coordinate(square.trim()) else {
        println!("{}", ChessError::InvalidSquare(square.to_string()));
        return;
    };
    let dests = game.legal_destinations_from(sq);
    if dests.is_empty() {
        println!("no moves from {sq}");
    } else {
        let list: Vec<String> = dests.iter().map(|d| d.to_coordinate()).collect();
        println!("{sq}: {}", list.join(" "));
    }
}

fn ask_promotion(
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> io::Result<PieceKind> {
    loop {
        print!("promote to (q/r/b/n)> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            // Input ended mid-prompt; a queen is the only sensible default.
            return Ok(PieceKind::Queen);
        };
        let text = line?;
        if let Some(kind) = text.trim().chars().next().and_then(PieceKind::from_promotion_char) {
            return Ok(kind);
        }
        println!("expected one of q, r, b, n");
    }
}

fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "white",
        Color::Black => "black",
    }
}
